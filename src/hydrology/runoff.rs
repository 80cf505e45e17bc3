//! SCS Curve Number runoff and a rational-method peak discharge.
//!
//! 1. Runoff depth:
//!      S  = 25400 / CN - 254        (mm)
//!      Ia = 0.2 S
//!      Q  = 0                        if P <= Ia
//!      Q  = (P - Ia)² / (P - Ia + S) otherwise
//!
//! 2. Peak discharge, simplified rational form:
//!      C  = Q / P
//!      i  = Q / Tc                   (mm/h)
//!      Qp = C × i × A / 3.6          (m³/s, A in km²)
//!
//! The peak formula is an approximation that treats the runoff depth as if
//! it fell uniformly over the time of concentration. It is not the NRCS
//! unit-hydrograph method and should only be used for ranking severity.

use serde::{Deserialize, Serialize};

use crate::model::{HydroError, RunoffEstimate};

pub const MIN_CURVE_NUMBER: f64 = 30.0;
pub const MAX_CURVE_NUMBER: f64 = 100.0;

pub const DEFAULT_CURVE_NUMBER: f64 = 75.0;
pub const DEFAULT_TIME_OF_CONCENTRATION_HOURS: f64 = 6.0;

/// mm/h × km² → m³/s
const RATIONAL_UNIT_FACTOR: f64 = 3.6;

/// Reference land covers with their AMC-II curve numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandCover {
    UrbanHighDensity,
    UrbanMediumDensity,
    Agricultural,
    ForestGood,
    ForestPoor,
    Grassland,
    Water,
}

impl LandCover {
    pub fn curve_number(&self) -> f64 {
        match self {
            LandCover::UrbanHighDensity => 85.0,
            LandCover::UrbanMediumDensity => 75.0,
            LandCover::Agricultural => 70.0,
            LandCover::ForestGood => 55.0,
            LandCover::ForestPoor => 70.0,
            LandCover::Grassland => 65.0,
            LandCover::Water => 100.0,
        }
    }
}

/// Estimates runoff depth and peak discharge for one rainfall depth.
///
/// # Errors
/// `InvalidParameter` when `curve_number` is outside [30, 100],
/// `time_of_concentration_hours <= 0`, or rainfall/area are negative or
/// not finite. Values are never clamped into range.
pub fn estimate(
    rainfall_mm: f64,
    area_km2: f64,
    curve_number: f64,
    time_of_concentration_hours: f64,
) -> Result<RunoffEstimate, HydroError> {
    if !(MIN_CURVE_NUMBER..=MAX_CURVE_NUMBER).contains(&curve_number) {
        return Err(HydroError::invalid("curve_number", curve_number, "within [30, 100]"));
    }
    if !(time_of_concentration_hours > 0.0) || !time_of_concentration_hours.is_finite() {
        return Err(HydroError::invalid(
            "time_of_concentration_hours",
            time_of_concentration_hours,
            "> 0",
        ));
    }
    if !(rainfall_mm >= 0.0) || !rainfall_mm.is_finite() {
        return Err(HydroError::invalid("rainfall_mm", rainfall_mm, ">= 0"));
    }
    if !(area_km2 >= 0.0) || !area_km2.is_finite() {
        return Err(HydroError::invalid("area_km2", area_km2, ">= 0"));
    }

    let potential_retention_mm = 25400.0 / curve_number - 254.0;
    let initial_abstraction_mm = 0.2 * potential_retention_mm;

    let runoff_depth_mm = if rainfall_mm <= initial_abstraction_mm {
        0.0
    } else {
        let excess = rainfall_mm - initial_abstraction_mm;
        excess * excess / (excess + potential_retention_mm)
    };

    let runoff_coefficient = if rainfall_mm > 0.0 {
        runoff_depth_mm / rainfall_mm
    } else {
        0.0
    };

    let intensity_mm_h = runoff_depth_mm / time_of_concentration_hours;
    let peak_discharge_m3s = runoff_coefficient * intensity_mm_h * area_km2 / RATIONAL_UNIT_FACTOR;

    Ok(RunoffEstimate {
        runoff_depth_mm,
        runoff_coefficient,
        peak_discharge_m3s,
        potential_retention_mm,
        initial_abstraction_mm,
        curve_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() < tol,
            "expected {expected} +/- {tol}, got {actual}"
        );
    }

    #[test]
    fn test_retention_and_abstraction_for_cn_75() {
        let r = estimate(100.0, 1000.0, 75.0, 6.0).unwrap();
        assert_approx(r.potential_retention_mm, 84.6667, 1e-3);
        assert_approx(r.initial_abstraction_mm, 16.9333, 1e-3);
    }

    #[test]
    fn test_runoff_depth_matches_hand_calculation() {
        // P=100, CN=75: excess = 83.0667, Q = 83.0667² / 167.7333 = 41.1371
        let r = estimate(100.0, 1000.0, 75.0, 6.0).unwrap();
        assert_approx(r.runoff_depth_mm, 41.1371, 1e-3);
        assert_approx(r.runoff_coefficient, 0.411371, 1e-5);
        // Qp = 0.411371 * (41.1371 / 6) * 1000 / 3.6
        assert_approx(r.peak_discharge_m3s, 783.456, 0.01);
    }

    #[test]
    fn test_no_runoff_at_or_below_initial_abstraction() {
        let ia = estimate(0.0, 500.0, 70.0, 6.0).unwrap().initial_abstraction_mm;
        for p in [0.0, ia * 0.5, ia] {
            let r = estimate(p, 500.0, 70.0, 6.0).unwrap();
            assert_eq!(r.runoff_depth_mm, 0.0, "P={} should produce no runoff", p);
            assert_eq!(r.peak_discharge_m3s, 0.0);
        }
    }

    #[test]
    fn test_zero_rainfall_has_zero_coefficient() {
        let r = estimate(0.0, 500.0, 100.0, 6.0).unwrap();
        assert_eq!(r.runoff_coefficient, 0.0);
        assert!(r.peak_discharge_m3s.is_finite());
    }

    #[test]
    fn test_runoff_non_decreasing_in_rainfall() {
        let mut previous = 0.0;
        for step in 0..200 {
            let p = step as f64 * 2.5;
            let q = estimate(p, 1000.0, 65.0, 4.0).unwrap().runoff_depth_mm;
            assert!(q >= previous, "Q dropped from {} to {} at P={}", previous, q, p);
            previous = q;
        }
    }

    #[test]
    fn test_impervious_surface_runs_off_everything() {
        let r = estimate(50.0, 10.0, LandCover::Water.curve_number(), 1.0).unwrap();
        assert_approx(r.runoff_depth_mm, 50.0, 1e-9);
        assert_approx(r.runoff_coefficient, 1.0, 1e-12);
    }

    #[test]
    fn test_rejects_out_of_range_curve_number() {
        for cn in [29.9, 100.1, 0.0, f64::NAN] {
            assert!(
                matches!(
                    estimate(50.0, 10.0, cn, 6.0),
                    Err(HydroError::InvalidParameter { name: "curve_number", .. })
                ),
                "CN={} should be rejected",
                cn
            );
        }
    }

    #[test]
    fn test_rejects_non_positive_time_of_concentration() {
        for tc in [0.0, -1.0] {
            assert!(matches!(
                estimate(50.0, 10.0, 75.0, tc),
                Err(HydroError::InvalidParameter { name: "time_of_concentration_hours", .. })
            ));
        }
    }

    #[test]
    fn test_land_cover_curve_numbers_are_in_domain() {
        let covers = [
            LandCover::UrbanHighDensity,
            LandCover::UrbanMediumDensity,
            LandCover::Agricultural,
            LandCover::ForestGood,
            LandCover::ForestPoor,
            LandCover::Grassland,
            LandCover::Water,
        ];
        for cover in covers {
            let cn = cover.curve_number();
            assert!((MIN_CURVE_NUMBER..=MAX_CURVE_NUMBER).contains(&cn), "{:?} -> {}", cover, cn);
        }
    }
}
