//! Muskingum-Cunge flood routing through a single channel reach.
//!
//!   O(j+1) = C1·I(j+1) + C2·I(j) + C3·O(j)
//!
//!   D  = 2K(1-X) + Δt
//!   C1 = (Δt - 2KX) / D
//!   C2 = (Δt + 2KX) / D
//!   C3 = (2K(1-X) - Δt) / D
//!
//! K is the reach storage constant (≈ travel time, seconds), X the weighting
//! factor (0 = pure reservoir, 0.5 = pure translation), Δt the step.
//! The scheme is only accepted when every coefficient is non-negative and
//! their sum is within `STABILITY_TOLERANCE` of 1.

use crate::model::{HydroError, RoutingCoefficients, RoutingResult};

pub const STABILITY_TOLERANCE: f64 = 1e-3;

pub const DEFAULT_X: f64 = 0.2;
pub const DEFAULT_DT_SECONDS: f64 = 3600.0;

/// Computes the routing coefficients and checks them for stability.
///
/// # Errors
/// - `InvalidParameter` for K <= 0, dt <= 0, or X outside [0, 0.5].
/// - `UnstableRoutingParameters` when any coefficient is negative.
pub fn coefficients(k_seconds: f64, x: f64, dt_seconds: f64) -> Result<RoutingCoefficients, HydroError> {
    if !(k_seconds > 0.0) || !k_seconds.is_finite() {
        return Err(HydroError::invalid("k_seconds", k_seconds, "> 0"));
    }
    if !(0.0..=0.5).contains(&x) {
        return Err(HydroError::invalid("x", x, "within [0, 0.5]"));
    }
    if !(dt_seconds > 0.0) || !dt_seconds.is_finite() {
        return Err(HydroError::invalid("dt_seconds", dt_seconds, "> 0"));
    }

    let denom = 2.0 * k_seconds * (1.0 - x) + dt_seconds;
    let c = RoutingCoefficients {
        c1: (dt_seconds - 2.0 * k_seconds * x) / denom,
        c2: (dt_seconds + 2.0 * k_seconds * x) / denom,
        c3: (2.0 * k_seconds * (1.0 - x) - dt_seconds) / denom,
    };

    let sum = c.sum();
    let stable = (sum - 1.0).abs() < STABILITY_TOLERANCE && c.c1 >= 0.0 && c.c2 >= 0.0 && c.c3 >= 0.0;
    if !stable {
        return Err(HydroError::UnstableRoutingParameters {
            c1: c.c1,
            c2: c.c2,
            c3: c.c3,
            sum,
        });
    }
    Ok(c)
}

/// Routes `inflow` (m³/s, one value per Δt) through the reach.
///
/// The outflow starts at the inflow (`O(0) = I(0)`). Peaks are located by
/// first occurrence of the maximum. A negative lag is reported through
/// `lag_anomaly` rather than rejected.
pub fn route(inflow: &[f64], k_seconds: f64, x: f64, dt_seconds: f64) -> Result<RoutingResult, HydroError> {
    let c = coefficients(k_seconds, x, dt_seconds)?;
    let Some(&first) = inflow.first() else {
        return Err(HydroError::invalid("inflow.len", 0.0, "at least one value"));
    };

    let mut outflow = Vec::with_capacity(inflow.len());
    outflow.push(first);
    for j in 0..inflow.len() - 1 {
        let next = c.c1 * inflow[j + 1] + c.c2 * inflow[j] + c.c3 * outflow[j];
        outflow.push(next);
    }

    let (peak_inflow_index, peak_inflow) = first_max(inflow);
    let (peak_outflow_index, peak_outflow) = first_max(&outflow);

    let peak_attenuation_percent = if peak_inflow > 0.0 {
        (peak_inflow - peak_outflow) / peak_inflow * 100.0
    } else {
        0.0
    };
    let lag_time_hours =
        (peak_outflow_index as f64 - peak_inflow_index as f64) * dt_seconds / 3600.0;

    Ok(RoutingResult {
        inflow: inflow.to_vec(),
        outflow,
        coefficients: c,
        k_hours: k_seconds / 3600.0,
        x,
        dt_hours: dt_seconds / 3600.0,
        peak_inflow,
        peak_outflow,
        peak_inflow_index,
        peak_outflow_index,
        peak_attenuation_percent,
        lag_time_hours,
        lag_anomaly: lag_time_hours < 0.0,
    })
}

/// Index and value of the maximum; ties go to the earliest index.
fn first_max(values: &[f64]) -> (usize, f64) {
    let mut best = (0, values[0]);
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > best.1 {
            best = (i, v);
        }
    }
    best
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

    fn triangular_hydrograph() -> Vec<f64> {
        vec![
            100.0, 300.0, 800.0, 1500.0, 2200.0, 1800.0, 1200.0, 700.0, 400.0, 250.0, 150.0, 100.0,
        ]
    }

    #[test]
    fn test_coefficients_for_one_hour_reach() {
        // D = 2*3600*0.8 + 3600 = 9360
        let c = coefficients(3600.0, 0.2, 3600.0).unwrap();
        assert_approx(c.c1, 2160.0 / 9360.0, 1e-12);
        assert_approx(c.c2, 5040.0 / 9360.0, 1e-12);
        assert_approx(c.c3, 2160.0 / 9360.0, 1e-12);
        assert_approx(c.sum(), 1.0, 1e-12);
    }

    #[test]
    fn test_short_reach_is_rejected_as_unstable() {
        match coefficients(100.0, 0.2, 3600.0) {
            Err(HydroError::UnstableRoutingParameters { c3, sum, .. }) => {
                assert!(c3 < 0.0, "C3 should be negative, got {}", c3);
                assert_approx(sum, 1.0, 1e-9);
            }
            other => panic!("expected UnstableRoutingParameters, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_c1_is_rejected() {
        // dt < 2KX makes C1 negative.
        let err = coefficients(36_000.0, 0.5, 3600.0).unwrap_err();
        assert!(matches!(err, HydroError::UnstableRoutingParameters { c1, .. } if c1 < 0.0));
    }

    #[test]
    fn test_invalid_parameters_rejected_before_stability() {
        assert!(matches!(
            route(&[1.0], 0.0, 0.2, 3600.0),
            Err(HydroError::InvalidParameter { name: "k_seconds", .. })
        ));
        assert!(matches!(
            route(&[1.0], 3600.0, 0.6, 3600.0),
            Err(HydroError::InvalidParameter { name: "x", .. })
        ));
        assert!(matches!(
            route(&[1.0], 3600.0, 0.2, -5.0),
            Err(HydroError::InvalidParameter { name: "dt_seconds", .. })
        ));
        assert!(matches!(
            route(&[], 3600.0, 0.2, 3600.0),
            Err(HydroError::InvalidParameter { name: "inflow.len", .. })
        ));
    }

    #[test]
    fn test_outflow_starts_at_inflow_and_keeps_length() {
        let inflow = triangular_hydrograph();
        let r = route(&inflow, 7200.0, 0.2, 3600.0).unwrap();
        assert_eq!(r.outflow.len(), inflow.len());
        assert_eq!(r.outflow[0], inflow[0]);
        assert_eq!(r.inflow, inflow);
    }

    #[test]
    fn test_recurrence_second_value() {
        let inflow = [100.0, 500.0, 300.0];
        let r = route(&inflow, 3600.0, 0.2, 3600.0).unwrap();
        let c = r.coefficients;
        let expected = c.c1 * 500.0 + c.c2 * 100.0 + c.c3 * 100.0;
        assert_approx(r.outflow[1], expected, 1e-9);
    }

    #[test]
    fn test_peak_is_attenuated_and_delayed() {
        let r = route(&triangular_hydrograph(), 7200.0, 0.2, 3600.0).unwrap();
        assert!(r.peak_outflow < r.peak_inflow, "routing should attenuate the peak");
        assert_eq!(r.peak_inflow_index, 4);
        assert_eq!(r.peak_outflow_index, 6);
        assert_approx(r.peak_attenuation_percent, 25.05, 0.01);
        assert_eq!(r.lag_time_hours, 2.0);
        assert!(!r.lag_anomaly);
        assert_approx(r.k_hours, 2.0, 1e-12);
    }

    #[test]
    fn test_constant_inflow_passes_through_unchanged() {
        let inflow = vec![250.0; 10];
        let r = route(&inflow, 5400.0, 0.3, 3600.0).unwrap();
        for q in &r.outflow {
            assert_approx(*q, 250.0, 1e-9);
        }
        assert_approx(r.peak_attenuation_percent, 0.0, 1e-9);
        assert_eq!(r.lag_time_hours, 0.0);
    }

    #[test]
    fn test_zero_inflow_has_zero_attenuation() {
        let r = route(&[0.0, 0.0, 0.0], 3600.0, 0.2, 3600.0).unwrap();
        assert_eq!(r.peak_attenuation_percent, 0.0);
        assert!(r.outflow.iter().all(|q| q.is_finite()));
    }

    #[test]
    fn test_peak_ties_resolve_to_first_occurrence() {
        assert_eq!(first_max(&[1.0, 5.0, 5.0, 2.0]), (1, 5.0));
    }
}
