//! Basin flood forecast from a rainfall fixture.
//!
//! Usage:
//!   cargo run -- data/rainfall_sample.json
//!
//! Options:
//!   --basin CODE     Only forecast one basin (HONG, MEKONG, DONGNAI, CENTRAL)
//!   --config PATH    basins.toml location (default: $VNFLOOD_BASINS_CONFIG or ./basins.toml)
//!   --summary        Print per-basin severity counts instead of full forecasts
//!   --verbose        Include debug logging
//!
//! Environment (.env is honoured):
//!   VNFLOOD_BASINS_CONFIG - config file location
//!   VNFLOOD_LOG_FILE      - append log lines to this file
//!
//! The JSON report goes to stdout; progress and logs go to stderr.

use chrono::Utc;
use serde::Serialize;
use std::env;
use std::path::Path;

use vnflood_service::analysis::forecast::{BasinForecast, BasinSummary, run_forecasts, summarize};
use vnflood_service::config::{self, BasinConfig};
use vnflood_service::ingest::fixture;
use vnflood_service::ingest::provider::PeakHistoryProvider;
use vnflood_service::logging::{self, Component, LogLevel};

#[derive(Serialize)]
struct Failure {
    basin: String,
    reason: String,
}

#[derive(Serialize)]
struct Report {
    generated_at: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    basins: Vec<BasinForecast>,
    summaries: Vec<BasinSummary>,
    failures: Vec<Failure>,
}

const USAGE: &str =
    "usage: vnflood_service <rainfall.json> [--basin CODE] [--config PATH] [--summary] [--verbose]";

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    fixture_path: String,
    basin: Option<String>,
    config_path: Option<String>,
    summary_only: bool,
    verbose: bool,
}

/// Parses everything after the program name in a single pass.
fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<CliArgs, String> {
    let mut parsed = CliArgs::default();
    let mut fixture_path = None;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--basin" => {
                parsed.basin = Some(args.next().ok_or("--basin needs a basin code")?);
            }
            "--config" => {
                parsed.config_path = Some(args.next().ok_or("--config needs a path")?);
            }
            "--summary" => parsed.summary_only = true,
            "--verbose" => parsed.verbose = true,
            flag if flag.starts_with("--") => return Err(format!("unknown option '{}'", flag)),
            extra if fixture_path.is_some() => return Err(format!("unexpected argument '{}'", extra)),
            path => fixture_path = Some(path.to_string()),
        }
    }

    parsed.fixture_path = fixture_path.ok_or("missing rainfall fixture path")?;
    Ok(parsed)
}

/// 1 when every basin failed, 0 otherwise.
fn exit_status(forecast_count: usize, failure_count: usize) -> i32 {
    if forecast_count == 0 && failure_count > 0 { 1 } else { 0 }
}

fn load_basins(path: &str) -> Result<Vec<BasinConfig>, Box<dyn std::error::Error>> {
    if !Path::new(path).exists() {
        logging::warn(
            Component::Config,
            None,
            &format!("{} not found, using built-in basin registry", path),
        );
        return Ok(config::default_config());
    }
    config::load_config(path)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let args = match parse_args(env::args().skip(1)) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{}\n{}", e, USAGE);
            std::process::exit(2);
        }
    };
    let verbose = args.verbose;
    let config_path = args.config_path.clone().unwrap_or_else(config::config_path);
    let fixture_path = &args.fixture_path;

    let log_file = env::var("VNFLOOD_LOG_FILE").ok();
    let min_level = if verbose { LogLevel::Debug } else { LogLevel::Info };
    logging::init_logger(min_level, log_file.as_deref(), verbose);

    eprintln!("🌧️  Vietnam basin flood forecast");
    eprintln!("================================\n");

    eprintln!("⚙️  Loading basin configuration from {}...", config_path);
    let mut basins = match load_basins(&config_path) {
        Ok(b) => b,
        Err(e) => {
            logging::log_load_failure(Component::Config, "load basins.toml", e.as_ref());
            return Err(e);
        }
    };
    if let Some(code) = &args.basin {
        basins.retain(|b| b.code.eq_ignore_ascii_case(code));
        if basins.is_empty() {
            return Err(format!("unknown basin '{}'", code).into());
        }
    }
    eprintln!("✓ {} basin(s) configured\n", basins.len());

    eprintln!("📥 Reading rainfall from {}...", fixture_path);
    let provider = match fixture::load_fixture(fixture_path) {
        Ok(p) => p,
        Err(e) => {
            logging::log_load_failure(Component::Rainfall, "load rainfall fixture", e.as_ref());
            return Err(e);
        }
    };
    eprintln!("✓ {} station(s) loaded\n", provider.station_count());

    eprintln!("🌊 Running forecasts...");
    let peak_sources: [&dyn PeakHistoryProvider; 2] = [&provider, &basins];
    let run = run_forecasts(&basins, &provider, &peak_sources);

    let summaries: Vec<BasinSummary> = run.forecasts.iter().map(summarize).collect();
    for s in &summaries {
        let highest = s.highest_severity.map(|h| h.as_str()).unwrap_or("not assessed");
        eprintln!(
            "   {:<8} highest={:<8} danger={} warning={} watch={} safe={}",
            s.basin, highest, s.danger_count, s.warning_count, s.watch_count, s.safe_count
        );
    }
    eprintln!();

    let report = Report {
        generated_at: Utc::now().to_rfc3339(),
        basins: if args.summary_only { Vec::new() } else { run.forecasts },
        summaries,
        failures: run
            .failures
            .into_iter()
            .map(|(basin, reason)| Failure { basin, reason })
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    let status = exit_status(report.summaries.len(), report.failures.len());
    if status != 0 {
        std::process::exit(status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_all_options() {
        let parsed = parse_args(args(&[
            "--basin", "hong", "data/rain.json", "--config", "alt.toml", "--summary", "--verbose",
        ]))
        .unwrap();
        assert_eq!(
            parsed,
            CliArgs {
                fixture_path: "data/rain.json".to_string(),
                basin: Some("hong".to_string()),
                config_path: Some("alt.toml".to_string()),
                summary_only: true,
                verbose: true,
            }
        );
    }

    #[test]
    fn test_fixture_path_equal_to_an_option_value_is_kept() {
        let parsed = parse_args(args(&["--config", "same.json", "same.json"])).unwrap();
        assert_eq!(parsed.fixture_path, "same.json");
        assert_eq!(parsed.config_path.as_deref(), Some("same.json"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(args(&[])).unwrap_err().contains("missing"));
        assert!(parse_args(args(&["rain.json", "--basin"])).unwrap_err().contains("--basin"));
        assert!(parse_args(args(&["rain.json", "--fast"])).unwrap_err().contains("unknown option"));
        assert!(parse_args(args(&["a.json", "b.json"])).unwrap_err().contains("unexpected"));
    }

    #[test]
    fn test_exit_status_only_fails_when_every_basin_failed() {
        assert_eq!(exit_status(4, 0), 0);
        assert_eq!(exit_status(3, 1), 0);
        assert_eq!(exit_status(0, 4), 1);
        assert_eq!(exit_status(0, 0), 0, "nothing configured is not a failure");
    }
}
