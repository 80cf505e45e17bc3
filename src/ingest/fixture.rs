//! Rainfall provider backed by a JSON file of Open-Meteo daily payloads.
//!
//! Expected shape (one Open-Meteo `daily` block per station, plus optional
//! annual peak histories keyed by basin code):
//!
//! ```json
//! {
//!   "stations": {
//!     "lao_cai": {
//!       "daily": {
//!         "time": ["2024-09-07", "2024-09-08"],
//!         "precipitation_sum": [185.2, null]
//!       }
//!     }
//!   },
//!   "annual_peaks_m3s": { "HONG": [18500.0, 22000.0, 15800.0] }
//! }
//! ```
//!
//! `null` depths become `None`. They are never read as 0.

use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::config::BasinConfig;
use crate::ingest::provider::{PeakHistoryProvider, RainfallProvider};
use crate::model::RainfallObservation;

// ============================================================================
// JSON Structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct FixtureFile {
    stations: HashMap<String, StationPayload>,
    #[serde(default)]
    annual_peaks_m3s: HashMap<String, Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct StationPayload {
    daily: DailyBlock,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    time: Vec<String>,
    precipitation_sum: Vec<Option<f64>>,
}

// ============================================================================
// Provider
// ============================================================================

/// Parsed fixture, ready to serve any basin.
#[derive(Debug, Clone, Default)]
pub struct FixtureProvider {
    observations: HashMap<String, Vec<RainfallObservation>>,
    peaks: HashMap<String, Vec<f64>>,
}

impl FixtureProvider {
    pub fn station_count(&self) -> usize {
        self.observations.len()
    }
}

fn parse_station(station_id: &str, daily: DailyBlock) -> Result<Vec<RainfallObservation>, Box<dyn std::error::Error>> {
    if daily.time.len() != daily.precipitation_sum.len() {
        return Err(format!(
            "station '{}': {} dates but {} precipitation values",
            station_id,
            daily.time.len(),
            daily.precipitation_sum.len()
        )
        .into());
    }

    let mut observations = Vec::with_capacity(daily.time.len());
    for (date_str, depth) in daily.time.iter().zip(daily.precipitation_sum) {
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|e| format!("station '{}': bad date '{}': {}", station_id, date_str, e))?;
        if let Some(d) = depth {
            if !(d >= 0.0) || !d.is_finite() {
                return Err(format!("station '{}': invalid depth {} on {}", station_id, d, date).into());
            }
        }
        observations.push(RainfallObservation {
            station_id: station_id.to_string(),
            date,
            depth_mm: depth,
        });
    }
    Ok(observations)
}

/// Parses fixture JSON.
///
/// # Errors
/// Malformed JSON, mismatched array lengths, unparseable dates, or a
/// negative depth.
pub fn parse_fixture(json: &str) -> Result<FixtureProvider, Box<dyn std::error::Error>> {
    let file: FixtureFile = serde_json::from_str(json)?;

    let mut observations = HashMap::with_capacity(file.stations.len());
    for (station_id, payload) in file.stations {
        let parsed = parse_station(&station_id, payload.daily)?;
        observations.insert(station_id, parsed);
    }

    let peaks = file
        .annual_peaks_m3s
        .into_iter()
        .map(|(code, p)| (code.to_ascii_uppercase(), p))
        .collect();

    Ok(FixtureProvider { observations, peaks })
}

/// Reads and parses a fixture file.
pub fn load_fixture<P: AsRef<Path>>(path: P) -> Result<FixtureProvider, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path.as_ref())
        .map_err(|e| format!("Failed to read {}: {}", path.as_ref().display(), e))?;
    parse_fixture(&contents)
}

impl RainfallProvider for FixtureProvider {
    fn daily_rainfall(
        &self,
        basin: &BasinConfig,
    ) -> Result<Vec<RainfallObservation>, Box<dyn std::error::Error>> {
        let mut station_ids: Vec<&String> = basin.weights.keys().collect();
        station_ids.sort();

        Ok(station_ids
            .into_iter()
            .filter_map(|id| self.observations.get(id))
            .flatten()
            .cloned()
            .collect())
    }
}

impl PeakHistoryProvider for FixtureProvider {
    fn annual_peaks(&self, basin_code: &str) -> Option<Vec<f64>> {
        self.peaks.get(&basin_code.to_ascii_uppercase()).cloned()
    }
}
