//! Return period of a peak discharge from a Gumbel (EV1) fit of annual peaks.
//!
//! Parameters are estimated by the method of moments:
//!
//!   β = σ · √6 / π
//!   μ = mean - γ · β           (γ = Euler-Mascheroni)
//!   F(x) = exp(-exp(-(x - μ) / β))
//!   T = 1 / (1 - F)
//!
//! σ is the population standard deviation of the sample.

use std::f64::consts::PI;

use crate::model::{GumbelParams, ReturnCategory, ReturnPeriod, ReturnPeriodEstimate};

pub const MIN_HISTORY_LEN: usize = 3;

const EULER_MASCHERONI: f64 = 0.5772156649;

/// Below this standard deviation the sample is treated as constant.
const DEGENERATE_STD: f64 = 0.01;

/// CDF values at or above this are beyond what the fit can resolve.
const CDF_CEILING: f64 = 0.9999;

impl ReturnCategory {
    /// Buckets a finite return period in years.
    pub fn from_years(years: f64) -> Self {
        if years < 2.0 {
            ReturnCategory::Common
        } else if years < 10.0 {
            ReturnCategory::Moderate
        } else if years < 50.0 {
            ReturnCategory::Rare
        } else if years < 100.0 {
            ReturnCategory::VeryRare
        } else {
            ReturnCategory::Extreme
        }
    }
}

/// Estimates how rare `discharge_m3s` is given `historical_peaks`.
///
/// Never fails. NaN or infinite peaks are dropped from the record before
/// fitting. Fewer than three usable peaks, or a non-finite discharge, gives
/// `InsufficientData`; a constant record gives a one-year, 100% "common"
/// result.
pub fn estimate(discharge_m3s: f64, historical_peaks: &[f64]) -> ReturnPeriodEstimate {
    let historical_peaks: Vec<f64> = historical_peaks.iter().copied().filter(|p| p.is_finite()).collect();
    if historical_peaks.len() < MIN_HISTORY_LEN || !discharge_m3s.is_finite() {
        return ReturnPeriodEstimate {
            return_period: None,
            probability_percent: None,
            category: ReturnCategory::InsufficientData,
            gumbel_params: None,
            cdf: None,
        };
    }

    let n = historical_peaks.len() as f64;
    let mean = historical_peaks.iter().sum::<f64>() / n;
    let variance = historical_peaks.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n;
    let std = variance.sqrt();

    if std < DEGENERATE_STD {
        return ReturnPeriodEstimate {
            return_period: Some(ReturnPeriod::Years(1.0)),
            probability_percent: Some(100.0),
            category: ReturnCategory::Common,
            gumbel_params: Some(GumbelParams {
                mu: mean,
                beta: 0.0,
                mean,
                std,
            }),
            cdf: None,
        };
    }

    let beta = std * 6f64.sqrt() / PI;
    let mu = mean - EULER_MASCHERONI * beta;
    let cdf = (-(-(discharge_m3s - mu) / beta).exp()).exp();

    let (return_period, probability_percent, category) = if cdf >= CDF_CEILING {
        (ReturnPeriod::Unbounded, 0.0, ReturnCategory::Extreme)
    } else {
        let years = 1.0 / (1.0 - cdf);
        (ReturnPeriod::Years(years), 100.0 / years, ReturnCategory::from_years(years))
    };

    ReturnPeriodEstimate {
        return_period: Some(return_period),
        probability_percent: Some(probability_percent),
        category,
        gumbel_params: Some(GumbelParams { mu, beta, mean, std }),
        cdf: Some(cdf),
    }
}
