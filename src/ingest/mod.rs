pub mod fixture;
pub mod provider;
