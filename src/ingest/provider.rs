//! Seams for the external data sources the forecast depends on.
//!
//! Fetching from weather APIs or scraping reservoir dashboards happens
//! elsewhere; the forecast only sees already-parsed series through these
//! traits.

use crate::config::BasinConfig;
use crate::model::RainfallObservation;

/// Supplies daily rainfall per monitoring station.
pub trait RainfallProvider {
    /// Observations for the stations weighted in `basin`, in any order.
    ///
    /// A day the provider covered but had no value for is reported with
    /// `depth_mm: None`; it must not be replaced by 0 or dropped.
    fn daily_rainfall(
        &self,
        basin: &BasinConfig,
    ) -> Result<Vec<RainfallObservation>, Box<dyn std::error::Error>>;
}

/// Supplies a basin's annual peak discharge history (m³/s).
pub trait PeakHistoryProvider {
    /// `None` when the provider has no record for the basin.
    fn annual_peaks(&self, basin_code: &str) -> Option<Vec<f64>>;
}

/// Peak histories written into basins.toml.
impl PeakHistoryProvider for Vec<BasinConfig> {
    fn annual_peaks(&self, basin_code: &str) -> Option<Vec<f64>> {
        self.iter()
            .find(|c| c.code.eq_ignore_ascii_case(basin_code))
            .filter(|c| !c.historical_peaks_m3s.is_empty())
            .map(|c| c.historical_peaks_m3s.clone())
    }
}

/// Tries each provider in turn and returns the first history found.
pub fn first_peak_history(providers: &[&dyn PeakHistoryProvider], basin_code: &str) -> Option<Vec<f64>> {
    providers.iter().find_map(|p| p.annual_peaks(basin_code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_config;

    struct Fixed(Vec<f64>);

    impl PeakHistoryProvider for Fixed {
        fn annual_peaks(&self, _basin_code: &str) -> Option<Vec<f64>> {
            Some(self.0.clone())
        }
    }

    #[test]
    fn test_config_without_peaks_has_no_history() {
        let configs = default_config();
        assert_eq!(configs.annual_peaks("HONG"), None);
    }

    #[test]
    fn test_config_peaks_are_returned_by_code() {
        let mut configs = default_config();
        configs[0].historical_peaks_m3s = vec![1.0, 2.0, 3.0];
        let code = configs[0].code.clone();
        assert_eq!(
            configs.annual_peaks(&code.to_lowercase()),
            Some(vec![1.0, 2.0, 3.0])
        );
    }

    #[test]
    fn test_first_provider_with_history_wins() {
        let configs = default_config();
        let fixed = Fixed(vec![9.0, 9.5, 10.0]);
        let providers: [&dyn PeakHistoryProvider; 2] = [&configs, &fixed];
        assert_eq!(first_peak_history(&providers, "MEKONG"), Some(vec![9.0, 9.5, 10.0]));
        assert_eq!(first_peak_history(&providers[..1], "MEKONG"), None);
    }
}
