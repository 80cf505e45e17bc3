//! Basin configuration loader - parses basins.toml
//!
//! Keeps Thiessen weights, runoff parameters, channel geometry, reservoir
//! telemetry snapshots and annual peak histories out of the code, so they
//! can be tuned without recompiling. Any basin missing from the file, and
//! any field missing from a basin entry, falls back to the static registry
//! in `basins` and the estimator defaults.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::basins::{self, Basin, BASIN_REGISTRY};
use crate::hydrology::accumulation::DEFAULT_WINDOW_DAYS;
use crate::hydrology::routing::DEFAULT_X;
use crate::hydrology::runoff::{DEFAULT_CURVE_NUMBER, DEFAULT_TIME_OF_CONCENTRATION_HOURS, LandCover};
use crate::model::{FloodThreshold, ReservoirState, ReservoirTelemetry, StationWeights, ThresholdLevel};

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "VNFLOOD_BASINS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "basins.toml";

// ---------------------------------------------------------------------------
// TOML structures
// ---------------------------------------------------------------------------

/// Root structure of basins.toml
#[derive(Debug, Deserialize)]
struct BasinFile {
    #[serde(default)]
    basin: Vec<BasinEntry>,
}

/// One `[[basin]]` table. Only `code` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct BasinEntry {
    pub code: String,
    pub area_km2: Option<f64>,
    /// Takes precedence over `land_cover`.
    pub curve_number: Option<f64>,
    pub land_cover: Option<LandCover>,
    pub time_of_concentration_hours: Option<f64>,
    pub accumulation_window_days: Option<usize>,
    /// Replaces the registry weights entirely when present.
    pub weights: Option<HashMap<String, f64>>,
    pub thresholds: Option<ThresholdConfig>,
    pub channel: Option<ChannelConfig>,
    #[serde(default)]
    pub reservoir: Vec<ReservoirConfig>,
    #[serde(default)]
    pub historical_peaks_m3s: Vec<f64>,
}

/// Threshold table as written in TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdConfig {
    pub watch: LevelConfig,
    pub warning: LevelConfig,
    pub danger: LevelConfig,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LevelConfig {
    pub daily: f64,
    pub accumulated_3d: f64,
}

/// Main-stem reach used for travel time and routing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub length_km: f64,
    /// Bed slope, m/m.
    pub slope: f64,
    pub manning_n: f64,
    pub hydraulic_radius_m: f64,
    pub width_m: f64,
    pub depth_m: f64,
    /// Muskingum K. Defaults to the Manning travel time of the reach.
    pub muskingum_k_hours: Option<f64>,
    #[serde(default = "default_muskingum_x")]
    pub muskingum_x: f64,
}

fn default_muskingum_x() -> f64 {
    DEFAULT_X
}

/// Latest telemetry for one reservoir in the basin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservoirConfig {
    pub name: String,
    pub storage_m3: f64,
    pub inflow_m3s: f64,
    pub outflow_m3s: f64,
    #[serde(default)]
    pub evaporation_m3s: f64,
    #[serde(default)]
    pub seepage_m3s: f64,
    #[serde(default)]
    pub deep_gates_open: u32,
    #[serde(default)]
    pub surface_gates_open: u32,
    pub water_level_m: Option<f64>,
    /// Normal retention level.
    pub normal_level_m: Option<f64>,
}

impl ReservoirConfig {
    pub fn state(&self) -> ReservoirState {
        ReservoirState {
            storage_m3: self.storage_m3,
            inflow_m3s: self.inflow_m3s,
            outflow_m3s: self.outflow_m3s,
            evaporation_m3s: self.evaporation_m3s,
            seepage_m3s: self.seepage_m3s,
        }
    }

    /// Gate and level readings for discharge alerting. Total discharge is
    /// the configured outflow.
    pub fn telemetry(&self) -> ReservoirTelemetry {
        ReservoirTelemetry {
            name: self.name.clone(),
            deep_gates_open: self.deep_gates_open,
            surface_gates_open: self.surface_gates_open,
            water_level_m: self.water_level_m,
            normal_level_m: self.normal_level_m,
            total_discharge_m3s: self.outflow_m3s,
        }
    }

    fn validate(&self) -> Result<(), String> {
        let values = [
            ("storage_m3", Some(self.storage_m3)),
            ("inflow_m3s", Some(self.inflow_m3s)),
            ("outflow_m3s", Some(self.outflow_m3s)),
            ("evaporation_m3s", Some(self.evaporation_m3s)),
            ("seepage_m3s", Some(self.seepage_m3s)),
            ("water_level_m", self.water_level_m),
            ("normal_level_m", self.normal_level_m),
        ];
        if let Some((field, value)) = values
            .iter()
            .find_map(|(field, v)| v.filter(|x| !x.is_finite()).map(|x| (field, x)))
        {
            return Err(format!("reservoir '{}': {} must be finite, got {}", self.name, field, value));
        }
        if self.storage_m3 < 0.0 {
            return Err(format!("reservoir '{}': storage_m3 must be >= 0", self.name));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Everything the forecast pipeline needs for one basin, with defaults
/// already applied. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct BasinConfig {
    pub code: String,
    pub name: String,
    pub area_km2: f64,
    pub curve_number: f64,
    pub time_of_concentration_hours: f64,
    pub accumulation_window_days: usize,
    pub weights: StationWeights,
    pub thresholds: FloodThreshold,
    pub channel: Option<ChannelConfig>,
    pub reservoirs: Vec<ReservoirConfig>,
    pub historical_peaks_m3s: Vec<f64>,
}

impl From<&Basin> for BasinConfig {
    fn from(basin: &Basin) -> Self {
        BasinConfig {
            code: basin.code.to_string(),
            name: basin.name.to_string(),
            area_km2: basin.area_km2,
            curve_number: DEFAULT_CURVE_NUMBER,
            time_of_concentration_hours: DEFAULT_TIME_OF_CONCENTRATION_HOURS,
            accumulation_window_days: DEFAULT_WINDOW_DAYS,
            weights: basin.weights(),
            thresholds: basin.thresholds,
            channel: None,
            reservoirs: Vec::new(),
            historical_peaks_m3s: Vec::new(),
        }
    }
}

/// Converts the TOML threshold table to the model type.
impl From<&ThresholdConfig> for FloodThreshold {
    fn from(config: &ThresholdConfig) -> Self {
        let level = |l: &LevelConfig| ThresholdLevel {
            daily_mm: l.daily,
            accumulated_3d_mm: l.accumulated_3d,
        };
        FloodThreshold {
            watch: level(&config.watch),
            warning: level(&config.warning),
            danger: level(&config.danger),
        }
    }
}

impl BasinConfig {
    /// Applies one TOML entry on top of the registry defaults.
    fn overlay(mut self, entry: &BasinEntry) -> Self {
        if let Some(area) = entry.area_km2 {
            self.area_km2 = area;
        }
        if let Some(cn) = entry.curve_number.or(entry.land_cover.map(|lc| lc.curve_number())) {
            self.curve_number = cn;
        }
        if let Some(tc) = entry.time_of_concentration_hours {
            self.time_of_concentration_hours = tc;
        }
        if let Some(window) = entry.accumulation_window_days {
            self.accumulation_window_days = window;
        }
        if let Some(weights) = &entry.weights {
            self.weights = weights.clone();
        }
        if let Some(thresholds) = &entry.thresholds {
            self.thresholds = thresholds.into();
        }
        self.channel = entry.channel;
        self.reservoirs = entry.reservoir.clone();
        self.historical_peaks_m3s = entry.historical_peaks_m3s.clone();
        self
    }

    /// Checks what the hydrology functions cannot: that the threshold
    /// tiers are ordered, the weights are usable, and no reservoir reading
    /// or historical peak is NaN or infinite.
    fn validate(&self) -> Result<(), String> {
        let t = &self.thresholds;
        let daily_ordered =
            t.watch.daily_mm < t.warning.daily_mm && t.warning.daily_mm < t.danger.daily_mm;
        let acc_ordered = t.watch.accumulated_3d_mm < t.warning.accumulated_3d_mm
            && t.warning.accumulated_3d_mm < t.danger.accumulated_3d_mm;
        if !daily_ordered || !acc_ordered {
            return Err(format!("{}: thresholds must ascend watch < warning < danger", self.code));
        }
        if let Some((id, w)) = self.weights.iter().find(|(_, w)| !(**w >= 0.0)) {
            return Err(format!("{}: station '{}' has invalid weight {}", self.code, id, w));
        }
        if self.accumulation_window_days == 0 {
            return Err(format!("{}: accumulation_window_days must be >= 1", self.code));
        }
        if let Some(peak) = self.historical_peaks_m3s.iter().find(|p| !p.is_finite()) {
            return Err(format!("{}: historical_peaks_m3s contains {}", self.code, peak));
        }
        for reservoir in &self.reservoirs {
            reservoir
                .validate()
                .map_err(|e| format!("{}: {}", self.code, e))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Registry defaults for every basin, in registry order.
pub fn default_config() -> Vec<BasinConfig> {
    BASIN_REGISTRY.iter().map(BasinConfig::from).collect()
}

/// Parses basins.toml content and merges it over the registry.
///
/// # Errors
/// Malformed TOML, an unknown or duplicated basin code, unordered
/// thresholds, a negative station weight, or a non-finite reservoir
/// reading or historical peak.
pub fn parse_config(contents: &str) -> Result<Vec<BasinConfig>, Box<dyn std::error::Error>> {
    let file: BasinFile = toml::from_str(contents)?;

    let mut seen = HashSet::new();
    for entry in &file.basin {
        let Some(basin) = basins::find_basin(&entry.code) else {
            return Err(format!("unknown basin code '{}' in config", entry.code).into());
        };
        if !seen.insert(basin.code) {
            return Err(format!("basin '{}' configured more than once", basin.code).into());
        }
    }

    let mut configs = Vec::with_capacity(BASIN_REGISTRY.len());
    for basin in BASIN_REGISTRY {
        let base = BasinConfig::from(basin);
        let config = match file
            .basin
            .iter()
            .find(|e| e.code.eq_ignore_ascii_case(basin.code))
        {
            Some(entry) => base.overlay(entry),
            None => base,
        };
        config.validate()?;
        configs.push(config);
    }
    Ok(configs)
}

/// Loads and resolves a basins.toml file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Vec<BasinConfig>, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path.as_ref())
        .map_err(|e| format!("Failed to read {}: {}", path.as_ref().display(), e))?;
    parse_config(&contents)
}

/// Config file location: `$VNFLOOD_BASINS_CONFIG`, else `basins.toml`.
pub fn config_path() -> String {
    std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

/// Builds an O(1) lookup keyed by basin code.
pub fn config_map(configs: Vec<BasinConfig>) -> HashMap<String, BasinConfig> {
    configs.into_iter().map(|c| (c.code.clone(), c)).collect()
}
