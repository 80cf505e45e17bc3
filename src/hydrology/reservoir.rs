//! Reservoir mass balance.
//!
//!   dS/dt = I(t) - O(t) - E(t) - L(t)
//!
//! advanced by a single explicit-Euler step. Callers own the time loop;
//! nothing here iterates or remembers a previous call.

use crate::model::{HydroError, ReservoirState, ReservoirStep, StorageTrend};

/// Advances `storage_m3` by one step of `dt_seconds`.
///
/// The new storage is clamped at zero. `status` follows the sign of the
/// requested change; `change_percent` is the realised change relative to
/// the prior storage, 0 when the reservoir started empty.
///
/// # Errors
/// `InvalidParameter` for negative storage, non-positive `dt_seconds`, or
/// a flux that is NaN or infinite.
pub fn step(
    storage_m3: f64,
    inflow_m3s: f64,
    outflow_m3s: f64,
    evaporation_m3s: f64,
    seepage_m3s: f64,
    dt_seconds: f64,
) -> Result<ReservoirStep, HydroError> {
    if !(storage_m3 >= 0.0) || !storage_m3.is_finite() {
        return Err(HydroError::invalid("storage_m3", storage_m3, ">= 0"));
    }
    if !(dt_seconds > 0.0) || !dt_seconds.is_finite() {
        return Err(HydroError::invalid("dt_seconds", dt_seconds, "> 0"));
    }
    for (name, flux) in [
        ("inflow_m3s", inflow_m3s),
        ("outflow_m3s", outflow_m3s),
        ("evaporation_m3s", evaporation_m3s),
        ("seepage_m3s", seepage_m3s),
    ] {
        if !flux.is_finite() {
            return Err(HydroError::invalid(name, flux, "a finite rate"));
        }
    }

    let net_inflow_m3s = inflow_m3s - outflow_m3s - evaporation_m3s - seepage_m3s;
    let delta_storage_m3 = net_inflow_m3s * dt_seconds;
    let new_storage_m3 = (storage_m3 + delta_storage_m3).max(0.0);

    let change_percent = if storage_m3 > 0.0 {
        (new_storage_m3 - storage_m3) / storage_m3 * 100.0
    } else {
        0.0
    };

    let status = if delta_storage_m3 > 0.0 {
        StorageTrend::Increasing
    } else if delta_storage_m3 < 0.0 {
        StorageTrend::Decreasing
    } else {
        StorageTrend::Stable
    };

    Ok(ReservoirStep {
        previous_storage_m3: storage_m3,
        new_storage_m3,
        net_inflow_m3s,
        delta_storage_m3,
        dt_hours: dt_seconds / 3600.0,
        change_percent,
        status,
        state: ReservoirState {
            storage_m3: new_storage_m3,
            inflow_m3s,
            outflow_m3s,
            evaporation_m3s,
            seepage_m3s,
        },
    })
}

/// Steps an existing state forward, reusing its fluxes.
pub fn step_state(state: &ReservoirState, dt_seconds: f64) -> Result<ReservoirStep, HydroError> {
    step(
        state.storage_m3,
        state.inflow_m3s,
        state.outflow_m3s,
        state.evaporation_m3s,
        state.seepage_m3s,
        dt_seconds,
    )
}
