//! Quantitative hydrology models.
//!
//! Every function here is pure: inputs in, a fresh result out. Nothing in
//! this tree performs I/O, logs, or keeps state between calls, so the
//! functions are safe to call from any number of threads.

pub mod accumulation;
pub mod reservoir;
pub mod return_period;
pub mod routing;
pub mod runoff;
pub mod thiessen;
pub mod travel_time;
pub mod trend;
