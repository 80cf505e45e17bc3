//! Forecast assembly on top of the hydrology models.
//!
//! Submodules:
//! - `forecast` - per-basin pipeline, summaries, and the multi-basin run.

pub mod forecast;
