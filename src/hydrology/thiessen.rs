//! Areal rainfall by Thiessen weighting.
//!
//!   P_basin = Σ(P_i × A_i) / Σ(A_i)
//!
//! where A_i is the station's area of influence (or any non-negative proxy
//! for it). Only stations that have both an observation and a positive
//! weight contribute. A basin with no contributing weight averages to 0.

use std::collections::HashMap;

use crate::model::{ArealRainfall, StationContribution, StationWeights};

/// Basin-average rainfall depth (mm) for one day.
pub fn estimate(observations: &HashMap<String, Option<f64>>, weights: &StationWeights) -> f64 {
    estimate_detailed(observations, weights).basin_average_mm
}

/// Same as [`estimate`], keeping the per-station breakdown.
///
/// Stations whose observation is `None` are skipped, as are stations with a
/// missing, zero, or negative weight. The breakdown is sorted by station id.
pub fn estimate_detailed(
    observations: &HashMap<String, Option<f64>>,
    weights: &StationWeights,
) -> ArealRainfall {
    let mut stations: Vec<StationContribution> = observations
        .iter()
        .filter_map(|(station_id, depth)| {
            let rainfall_mm = (*depth)?;
            let weight = weights.get(station_id).copied().unwrap_or(0.0);
            if weight > 0.0 && rainfall_mm.is_finite() {
                Some(StationContribution {
                    station_id: station_id.clone(),
                    rainfall_mm,
                    weight,
                    weighted_rainfall_mm: rainfall_mm * weight,
                })
            } else {
                None
            }
        })
        .collect();
    stations.sort_by(|a, b| a.station_id.cmp(&b.station_id));

    let weighted_sum: f64 = stations.iter().map(|s| s.weighted_rainfall_mm).sum();
    let total_weight: f64 = stations.iter().map(|s| s.weight).sum();

    let basin_average_mm = if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        0.0
    };

    ArealRainfall {
        basin_average_mm,
        weighted_sum,
        total_weight,
        stations,
    }
}
