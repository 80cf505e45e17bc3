//! Short-horizon rainfall trend from a least-squares slope.

use crate::model::{Trend, TrendAnalysis};

pub const DEFAULT_TREND_WINDOW: usize = 3;

impl Trend {
    /// Buckets a slope in mm/day.
    pub fn from_slope(slope_mm_per_day: f64) -> Self {
        if slope_mm_per_day > 10.0 {
            Trend::IncreasingFast
        } else if slope_mm_per_day > 5.0 {
            Trend::Increasing
        } else if slope_mm_per_day > -5.0 {
            Trend::Stable
        } else if slope_mm_per_day > -10.0 {
            Trend::Decreasing
        } else {
            Trend::DecreasingFast
        }
    }
}

/// Classifies the last `window` values of `daily` by their OLS slope
/// against the day index.
pub fn analyze(daily: &[f64], window: usize) -> TrendAnalysis {
    if window < 2 || daily.len() < window {
        return TrendAnalysis {
            trend: Trend::InsufficientData,
            slope_mm_per_day: 0.0,
            recent_avg_mm: None,
            recent_max_mm: None,
        };
    }

    let recent = &daily[daily.len() - window..];
    let n = recent.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = recent.iter().sum::<f64>() / n;

    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (i, y) in recent.iter().enumerate() {
        let dx = i as f64 - x_mean;
        sxy += dx * (y - y_mean);
        sxx += dx * dx;
    }
    let slope_mm_per_day = sxy / sxx;
    let recent_max = recent.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    TrendAnalysis {
        trend: Trend::from_slope(slope_mm_per_day),
        slope_mm_per_day,
        recent_avg_mm: Some(y_mean),
        recent_max_mm: Some(recent_max),
    }
}
