//! Core data types for the Vietnamese basin flood alerting service.
//!
//! This module defines the shared domain model imported by all other modules.
//! It contains no logic beyond small accessors, no I/O, and no global state.
//! Every record here is a value object: built fresh by one computation and
//! owned by whoever asked for it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Rainfall types
// ---------------------------------------------------------------------------

/// One daily rainfall value for one monitoring station, as handed over by
/// an external weather provider.
///
/// `depth_mm` is `None` when the provider reported the day but had no value
/// (Open-Meteo emits `null`). Missing values are never coerced to zero here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainfallObservation {
    pub station_id: String,
    pub date: NaiveDate,
    pub depth_mm: Option<f64>,
}

/// Thiessen weights for one basin: station id → area of influence.
pub type StationWeights = HashMap<String, f64>;

/// One station's share of an areal rainfall estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationContribution {
    pub station_id: String,
    pub rainfall_mm: f64,
    pub weight: f64,
    pub weighted_rainfall_mm: f64,
}

/// Area-averaged rainfall for a basin on one day, with the breakdown that
/// produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArealRainfall {
    pub basin_average_mm: f64,
    pub weighted_sum: f64,
    pub total_weight: f64,
    pub stations: Vec<StationContribution>,
}

impl ArealRainfall {
    pub fn contributing_stations(&self) -> usize {
        self.stations.len()
    }
}

/// Ordered `(date, area-averaged depth)` pairs for one basin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasinRainfallSeries {
    pub basin: String,
    pub points: Vec<(NaiveDate, f64)>,
}

impl BasinRainfallSeries {
    pub fn depths(&self) -> Vec<f64> {
        self.points.iter().map(|(_, depth)| *depth).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Runoff
// ---------------------------------------------------------------------------

/// SCS Curve Number runoff estimate for one rainfall depth on one basin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunoffEstimate {
    pub runoff_depth_mm: f64,
    /// Q / P, in [0, 1].
    pub runoff_coefficient: f64,
    pub peak_discharge_m3s: f64,
    /// S = 25400/CN - 254.
    pub potential_retention_mm: f64,
    /// Ia = 0.2 S.
    pub initial_abstraction_mm: f64,
    pub curve_number: f64,
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// Muskingum-Cunge routing coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoutingCoefficients {
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
}

impl RoutingCoefficients {
    pub fn sum(&self) -> f64 {
        self.c1 + self.c2 + self.c3
    }
}

/// Outcome of routing an inflow hydrograph through one reach.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingResult {
    pub inflow: Vec<f64>,
    pub outflow: Vec<f64>,
    pub coefficients: RoutingCoefficients,
    pub k_hours: f64,
    pub x: f64,
    pub dt_hours: f64,
    pub peak_inflow: f64,
    pub peak_outflow: f64,
    pub peak_inflow_index: usize,
    pub peak_outflow_index: usize,
    pub peak_attenuation_percent: f64,
    /// Negative when the outflow peaks before the inflow.
    pub lag_time_hours: f64,
    /// Set when `lag_time_hours < 0`; the result is still returned.
    pub lag_anomaly: bool,
}

// ---------------------------------------------------------------------------
// Reservoir
// ---------------------------------------------------------------------------

/// Reservoir storage and the fluxes acting on it over one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReservoirState {
    pub storage_m3: f64,
    pub inflow_m3s: f64,
    pub outflow_m3s: f64,
    pub evaporation_m3s: f64,
    pub seepage_m3s: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageTrend {
    Increasing,
    Decreasing,
    Stable,
}

/// One explicit-Euler mass-balance step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReservoirStep {
    pub previous_storage_m3: f64,
    pub new_storage_m3: f64,
    /// dS/dt = inflow - outflow - evaporation - seepage.
    pub net_inflow_m3s: f64,
    /// dS/dt * dt before the non-negativity clamp.
    pub delta_storage_m3: f64,
    pub dt_hours: f64,
    pub change_percent: f64,
    pub status: StorageTrend,
    pub state: ReservoirState,
}

// ---------------------------------------------------------------------------
// Travel time and wave celerity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VelocityClass {
    VerySlow,
    Slow,
    Moderate,
    Fast,
    VeryFast,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TravelTime {
    pub distance_km: f64,
    pub velocity_m_s: f64,
    pub velocity_km_h: f64,
    pub travel_time_hours: f64,
    pub travel_time_minutes: f64,
    pub travel_time_days: f64,
    pub velocity_class: VelocityClass,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaveCelerity {
    pub discharge_m3s: f64,
    pub cross_section_area_m2: f64,
    pub mean_velocity: f64,
    pub wave_celerity: f64,
    /// celerity / velocity; 0 when the velocity is 0.
    pub celerity_ratio: f64,
}

// ---------------------------------------------------------------------------
// Return period
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnCategory {
    InsufficientData,
    Common,
    Moderate,
    Rare,
    VeryRare,
    Extreme,
}

/// A return period in years, or "beyond anything the record can resolve"
/// when the Gumbel CDF is within 1e-4 of 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnPeriod {
    Years(f64),
    Unbounded,
}

impl ReturnPeriod {
    pub fn years(&self) -> Option<f64> {
        match self {
            ReturnPeriod::Years(t) => Some(*t),
            ReturnPeriod::Unbounded => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GumbelParams {
    pub mu: f64,
    pub beta: f64,
    pub mean: f64,
    pub std: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReturnPeriodEstimate {
    /// `None` only for `InsufficientData`.
    pub return_period: Option<ReturnPeriod>,
    pub probability_percent: Option<f64>,
    pub category: ReturnCategory,
    pub gumbel_params: Option<GumbelParams>,
    pub cdf: Option<f64>,
}

// ---------------------------------------------------------------------------
// Reservoir discharge
// ---------------------------------------------------------------------------

/// Operator telemetry for one reservoir: gate positions, water level and
/// total release.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReservoirTelemetry {
    pub name: String,
    /// Bottom outlet gates currently open.
    pub deep_gates_open: u32,
    /// Surface spillway gates currently open.
    pub surface_gates_open: u32,
    pub water_level_m: Option<f64>,
    /// Normal retention level (MNDBT).
    pub normal_level_m: Option<f64>,
    /// Turbines plus spillways, m³/s.
    pub total_discharge_m3s: f64,
}

impl ReservoirTelemetry {
    pub fn spillway_open(&self) -> bool {
        self.deep_gates_open > 0 || self.surface_gates_open > 0
    }

    /// Water level as a percentage of the normal retention level. `None`
    /// unless both levels are known and the normal level is positive.
    pub fn water_level_percent(&self) -> Option<f64> {
        match (self.water_level_m, self.normal_level_m) {
            (Some(level), Some(normal)) if normal > 0.0 && level.is_finite() && normal.is_finite() => {
                Some(level / normal * 100.0)
            }
            _ => None,
        }
    }
}

/// Downstream risk from a reservoir release, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DischargeSeverity {
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DischargeAlert {
    pub severity: DischargeSeverity,
    pub spillway_open: bool,
    pub high_water: bool,
    pub high_discharge: bool,
    pub water_level_percent: Option<f64>,
    /// Vietnamese summary of what triggered the alert.
    pub reason: String,
    pub recommendations: Vec<String>,
}

// ---------------------------------------------------------------------------
// Trend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    InsufficientData,
    IncreasingFast,
    Increasing,
    Stable,
    Decreasing,
    DecreasingFast,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendAnalysis {
    pub trend: Trend,
    pub slope_mm_per_day: f64,
    pub recent_avg_mm: Option<f64>,
    pub recent_max_mm: Option<f64>,
}

// ---------------------------------------------------------------------------
// Threshold types
// ---------------------------------------------------------------------------

/// One tier of a basin's rainfall thresholds, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdLevel {
    pub daily_mm: f64,
    pub accumulated_3d_mm: f64,
}

/// Rainfall alert thresholds for one basin.
///
/// Tiers in ascending order: watch < warning < danger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloodThreshold {
    pub watch: ThresholdLevel,
    pub warning: ThresholdLevel,
    pub danger: ThresholdLevel,
}

/// Alert severities, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Safe,
    Watch,
    Warning,
    Danger,
}

impl Severity {
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Safe => 0,
            Severity::Watch => 1,
            Severity::Warning => 2,
            Severity::Danger => 3,
        }
    }

    /// Published alert level: 1 (safe) to 4 (danger). Level 0 is reserved
    /// for days that could not be assessed.
    pub fn alert_level(&self) -> u8 {
        self.rank() + 1
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Safe => "safe",
            Severity::Watch => "watch",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityClassification {
    pub severity: Severity,
    pub alert_level: u8,
    pub recommendations: Vec<String>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised by the hydrology functions. Only genuinely invalid inputs
/// produce one; degenerate-but-valid inputs get a documented fallback value.
#[derive(Debug, Clone, PartialEq)]
pub enum HydroError {
    /// A value lies outside its documented domain.
    InvalidParameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },
    /// Muskingum-Cunge coefficients fail the stability check.
    UnstableRoutingParameters { c1: f64, c2: f64, c3: f64, sum: f64 },
}

impl HydroError {
    pub(crate) fn invalid(name: &'static str, value: f64, expected: &'static str) -> Self {
        HydroError::InvalidParameter {
            name,
            value,
            expected,
        }
    }
}

impl std::fmt::Display for HydroError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HydroError::InvalidParameter {
                name,
                value,
                expected,
            } => write!(f, "Invalid parameter: {} = {} (expected {})", name, value, expected),
            HydroError::UnstableRoutingParameters { c1, c2, c3, sum } => write!(
                f,
                "Unstable routing parameters: C1={:.4}, C2={:.4}, C3={:.4} (sum {:.4}); \
                 reduce dt or increase K",
                c1, c2, c3, sum
            ),
        }
    }
}

impl std::error::Error for HydroError {}
