/// End-to-end forecast tests against the checked-in configuration and
/// rainfall fixture.
///
/// These tests read:
/// - basins.toml at the crate root
/// - data/rainfall_sample.json (7 days, 2024-09-06..2024-09-12)
///
/// Run with: cargo test --test forecast_pipeline

use chrono::NaiveDate;
use std::path::PathBuf;

use vnflood_service::analysis::forecast::{forecast_basin, run_forecasts, summarize};
use vnflood_service::basins::{all_basin_codes, find_basin};
use vnflood_service::config::{self, BasinConfig};
use vnflood_service::ingest::fixture::{self, FixtureProvider};
use vnflood_service::ingest::provider::{PeakHistoryProvider, RainfallProvider};
use vnflood_service::model::{DischargeSeverity, RainfallObservation, ReturnCategory, Severity};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn repo_file(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

fn load_repo_config() -> Vec<BasinConfig> {
    config::load_config(repo_file("basins.toml"))
        .unwrap_or_else(|e| panic!("basins.toml should load: {}", e))
}

fn load_sample() -> FixtureProvider {
    fixture::load_fixture(repo_file("data/rainfall_sample.json"))
        .unwrap_or_else(|e| panic!("rainfall_sample.json should load: {}", e))
}

fn lao_cai_series(depths: &[f64]) -> Vec<RainfallObservation> {
    depths
        .iter()
        .enumerate()
        .map(|(i, d)| RainfallObservation {
            station_id: "lao_cai".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 9, 7 + i as u32).unwrap(),
            depth_mm: Some(*d),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn test_repo_config_covers_every_registry_basin() {
    let basins = load_repo_config();
    let codes: Vec<&str> = basins.iter().map(|b| b.code.as_str()).collect();
    assert_eq!(codes, all_basin_codes(), "config must list basins in registry order");
}

#[test]
fn test_repo_config_overrides_are_applied() {
    let by_code = config::config_map(load_repo_config());

    let hong = &by_code["HONG"];
    assert_eq!(hong.time_of_concentration_hours, 24.0);
    assert!(hong.channel.is_some(), "HONG has a main-stem reach configured");
    assert_eq!(hong.reservoirs.len(), 2);
    assert!(hong.historical_peaks_m3s.len() >= 3);

    let dongnai = &by_code["DONGNAI"];
    assert_eq!(dongnai.curve_number, 72.0);
    assert!(dongnai.channel.is_none());
    assert!(dongnai.historical_peaks_m3s.is_empty(), "DONGNAI peaks come from the fixture");
}

// ---------------------------------------------------------------------------
// Single basin
// ---------------------------------------------------------------------------

#[test]
fn test_hong_storm_scenario() {
    let hong = BasinConfig::from(find_basin("HONG").unwrap());
    let f = forecast_basin(&hong, &lao_cai_series(&[10.0, 20.0, 150.0, 30.0, 10.0]), None).unwrap();

    let acc: Vec<f64> = f.days.iter().map(|d| d.accumulated_mm).collect();
    assert_eq!(acc, vec![10.0, 30.0, 180.0, 200.0, 190.0]);

    let severities: Vec<Severity> = f.days.iter().map(|d| d.classification.severity).collect();
    assert_eq!(
        severities,
        vec![Severity::Safe, Severity::Safe, Severity::Warning, Severity::Safe, Severity::Safe],
        "day 3 (150 mm) crosses the 150 mm warning line"
    );
    assert_eq!(f.warnings.len(), 1);
    assert_eq!(f.warnings[0].date, NaiveDate::from_ymd_opt(2024, 9, 9).unwrap());
    assert_eq!(f.return_period.category, ReturnCategory::InsufficientData);
}

// ---------------------------------------------------------------------------
// Full run over the sample fixture
// ---------------------------------------------------------------------------

#[test]
fn test_sample_fixture_serves_every_basin() {
    let provider = load_sample();
    for basin in load_repo_config() {
        let obs = provider.daily_rainfall(&basin).unwrap();
        assert!(!obs.is_empty(), "{} should have observations in the sample", basin.code);
    }
}

#[test]
fn test_full_run_over_sample() {
    let basins = load_repo_config();
    let provider = load_sample();
    let peak_sources: [&dyn PeakHistoryProvider; 2] = [&provider, &basins];

    let run = run_forecasts(&basins, &provider, &peak_sources);
    assert!(run.failures.is_empty(), "unexpected failures: {:?}", run.failures);
    assert_eq!(run.forecasts.len(), basins.len());

    for f in &run.forecasts {
        assert_eq!(f.days.len(), 7, "{} should cover the 7 sample days", f.basin);
        let s = summarize(f);
        let counted = s.danger_count + s.warning_count + s.watch_count + s.safe_count + s.not_assessed_count;
        assert_eq!(counted, f.days.len(), "{} summary must account for every day", f.basin);
        assert!(f.peak_discharge_m3s >= 0.0);
    }
}

#[test]
fn test_full_run_attaches_channel_and_reservoirs() {
    let basins = load_repo_config();
    let provider = load_sample();
    let peak_sources: [&dyn PeakHistoryProvider; 2] = [&provider, &basins];
    let run = run_forecasts(&basins, &provider, &peak_sources);

    let hong = run.forecasts.iter().find(|f| f.basin == "HONG").unwrap();
    let channel = hong.channel.as_ref().expect("HONG channel analysis");
    assert_eq!(channel.routing.outflow.len(), hong.days.len());
    assert_eq!(channel.routing.dt_hours, 24.0);
    assert_eq!(hong.reservoirs.len(), 2);
    let hoa_binh = hong.reservoirs[0].discharge_alert.as_ref().expect("Hoa Binh has gates open");
    assert_eq!(hoa_binh.severity, DischargeSeverity::Critical);
    assert_eq!(hong.reservoirs[1].discharge_alert, None, "Son La reports no gates or levels");
    assert_ne!(hong.return_period.category, ReturnCategory::InsufficientData);

    let dongnai = run.forecasts.iter().find(|f| f.basin == "DONGNAI").unwrap();
    assert!(dongnai.channel.is_none());
    assert_eq!(dongnai.reservoirs.len(), 1);
    let tri_an = dongnai.reservoirs[0].discharge_alert.as_ref().expect("Tri An is near full and releasing");
    assert_eq!(tri_an.severity, DischargeSeverity::Medium);
    assert!(
        dongnai.return_period.gumbel_params.is_some(),
        "DONGNAI history is supplied by the fixture"
    );
}

#[test]
fn test_fixture_peaks_take_precedence_over_config() {
    let basins = load_repo_config();
    let json = r#"{
        "stations": {},
        "annual_peaks_m3s": { "HONG": [1.0, 2.0, 3.0] }
    }"#;
    let provider = fixture::parse_fixture(json).unwrap();
    let peak_sources: [&dyn PeakHistoryProvider; 2] = [&provider, &basins];

    let run = run_forecasts(&basins, &provider, &peak_sources);
    let hong = run.forecasts.iter().find(|f| f.basin == "HONG").unwrap();
    let params = hong.return_period.gumbel_params.expect("three peaks are enough");
    assert_eq!(params.mean, 2.0);
}
