//! vnflood_service: rainfall-driven flood alerting for Vietnamese river basins.
//!
//! # Module structure
//!
//! ```text
//! vnflood_service
//! ├── model       - shared data types (RainfallObservation, FloodThreshold, HydroError, …)
//! ├── basins      - basin registry with areas, thresholds and Thiessen weights
//! ├── config      - basins.toml loader layered over the registry
//! ├── logging     - console / file logger for the service layer
//! ├── hydrology   - pure numerical models
//! │   ├── thiessen       - areal rainfall
//! │   ├── accumulation   - rolling N-day sums
//! │   ├── runoff         - SCS curve number + rational peak
//! │   ├── routing        - Muskingum-Cunge
//! │   ├── reservoir      - storage mass balance
//! │   ├── travel_time    - Manning velocity, kinematic wave celerity
//! │   ├── return_period  - Gumbel EV1
//! │   └── trend          - least-squares rainfall trend
//! ├── alert
//! │   └── severity       - safe / watch / warning / danger ladder
//! ├── ingest
//! │   ├── provider       - rainfall and peak-history provider traits
//! │   └── fixture        - Open-Meteo shaped JSON file provider
//! └── analysis
//!     └── forecast       - basin forecast pipeline and summaries
//! ```

pub mod alert;
pub mod analysis;
pub mod basins;
pub mod config;
pub mod hydrology;
pub mod ingest;
pub mod logging;
pub mod model;
