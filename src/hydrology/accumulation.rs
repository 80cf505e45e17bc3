//! Rolling accumulated rainfall.
//!
//! `accumulated[i]` is the sum of the last `window_days` daily values ending
//! at `i`. Near the start of the series the window is truncated to whatever
//! prefix exists; nothing is padded.

use crate::model::HydroError;

pub const DEFAULT_WINDOW_DAYS: usize = 3;

/// Returns a series of the same length as `daily`.
///
/// Fails with `InvalidParameter` when `window_days` is 0.
pub fn accumulate(daily: &[f64], window_days: usize) -> Result<Vec<f64>, HydroError> {
    if window_days == 0 {
        return Err(HydroError::invalid("window_days", 0.0, ">= 1"));
    }

    let accumulated = (0..daily.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window_days);
            daily[start..=i].iter().sum()
        })
        .collect();
    Ok(accumulated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_day_window_truncates_at_start() {
        let acc = accumulate(&[10.0, 20.0, 150.0, 30.0, 10.0], 3).unwrap();
        assert_eq!(acc, vec![10.0, 30.0, 180.0, 200.0, 190.0]);
    }

    #[test]
    fn test_window_of_one_is_identity() {
        let daily = [3.5, 0.0, 42.1, 7.25];
        assert_eq!(accumulate(&daily, 1).unwrap(), daily.to_vec());
    }

    #[test]
    fn test_length_preserved_for_any_window() {
        let daily = [1.0, 2.0, 3.0, 4.0];
        for window in 1..=8 {
            let acc = accumulate(&daily, window).unwrap();
            assert_eq!(acc.len(), daily.len(), "window {} changed the length", window);
        }
    }

    #[test]
    fn test_accumulated_never_below_daily_for_non_negative_rain() {
        let daily = [0.0, 12.0, 0.0, 80.0, 5.0, 0.0];
        let acc = accumulate(&daily, 3).unwrap();
        for (d, a) in daily.iter().zip(&acc) {
            assert!(a >= d, "accumulated {} below daily {}", a, d);
        }
    }

    #[test]
    fn test_window_larger_than_series_sums_prefix() {
        let acc = accumulate(&[5.0, 5.0], 7).unwrap();
        assert_eq!(acc, vec![5.0, 10.0]);
    }

    #[test]
    fn test_empty_series_and_zero_window() {
        assert!(accumulate(&[], 3).unwrap().is_empty());
        assert!(matches!(
            accumulate(&[1.0], 0),
            Err(HydroError::InvalidParameter { name: "window_days", .. })
        ));
    }
}
