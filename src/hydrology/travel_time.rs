//! Flood travel time along a reach (Manning) and kinematic wave celerity.
//!
//!   V = (1/n) · R^(2/3) · S^(1/2)
//!   c = 5/3 · V                    (wide rectangular channel)

use crate::model::{HydroError, TravelTime, VelocityClass, WaveCelerity};

pub const MIN_MANNING_N: f64 = 0.01;
pub const MAX_MANNING_N: f64 = 0.20;

const KINEMATIC_WAVE_FACTOR: f64 = 5.0 / 3.0;

impl VelocityClass {
    /// Buckets a mean velocity in m/s.
    pub fn from_velocity(velocity_m_s: f64) -> Self {
        if velocity_m_s < 0.3 {
            VelocityClass::VerySlow
        } else if velocity_m_s < 0.6 {
            VelocityClass::Slow
        } else if velocity_m_s < 1.0 {
            VelocityClass::Moderate
        } else if velocity_m_s < 2.0 {
            VelocityClass::Fast
        } else {
            VelocityClass::VeryFast
        }
    }
}

fn require_positive(name: &'static str, value: f64) -> Result<(), HydroError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(HydroError::invalid(name, value, "> 0"))
    }
}

/// Time for a flood wave to travel `distance_km` at the Manning velocity.
///
/// # Errors
/// `InvalidParameter` for a non-positive distance, slope, or hydraulic
/// radius, or a Manning coefficient outside [0.01, 0.20].
pub fn travel_time(
    distance_km: f64,
    slope: f64,
    manning_n: f64,
    hydraulic_radius_m: f64,
) -> Result<TravelTime, HydroError> {
    require_positive("distance_km", distance_km)?;
    require_positive("slope", slope)?;
    if !(MIN_MANNING_N..=MAX_MANNING_N).contains(&manning_n) {
        return Err(HydroError::invalid("manning_n", manning_n, "within [0.01, 0.20]"));
    }
    require_positive("hydraulic_radius_m", hydraulic_radius_m)?;

    let velocity_m_s = hydraulic_radius_m.powf(2.0 / 3.0) * slope.sqrt() / manning_n;
    let travel_time_seconds = distance_km * 1000.0 / velocity_m_s;
    let travel_time_hours = travel_time_seconds / 3600.0;

    Ok(TravelTime {
        distance_km,
        velocity_m_s,
        velocity_km_h: velocity_m_s * 3.6,
        travel_time_hours,
        travel_time_minutes: travel_time_seconds / 60.0,
        travel_time_days: travel_time_hours / 24.0,
        velocity_class: VelocityClass::from_velocity(velocity_m_s),
    })
}

/// Mean velocity and kinematic wave celerity for a rectangular section.
///
/// A zero or negative cross-section gives a velocity (and celerity) of 0.
pub fn wave_celerity(discharge_m3s: f64, width_m: f64, depth_m: f64) -> WaveCelerity {
    let cross_section_area_m2 = width_m * depth_m;
    let mean_velocity = if cross_section_area_m2 > 0.0 {
        discharge_m3s / cross_section_area_m2
    } else {
        0.0
    };
    let wave_celerity = KINEMATIC_WAVE_FACTOR * mean_velocity;
    let celerity_ratio = if mean_velocity != 0.0 {
        wave_celerity / mean_velocity
    } else {
        0.0
    };

    WaveCelerity {
        discharge_m3s,
        cross_section_area_m2,
        mean_velocity,
        wave_celerity,
        celerity_ratio,
    }
}
