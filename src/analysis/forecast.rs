//! Basin forecast pipeline.
//!
//! Composes the hydrology models for one basin:
//!
//!   station rainfall → Thiessen per day → rolling accumulation
//!     → per-day severity and SCS-CN runoff
//!     → horizon peak discharge → Gumbel return period
//!     → (channel configured) travel time, wave celerity, routed hydrograph
//!     → (reservoirs configured) one-day storage outlook and discharge alert
//!
//! The horizon covers every calendar day from the first observed date to
//! the last, so an N-day accumulation always spans N real days.
//!
//! The pipeline itself never fabricates rainfall. A day on which no
//! weighted station reported a value (or that has no rows at all) is kept
//! in the output as "not assessed" (alert level 0) instead of being scored
//! as dry. Such days contribute 0 mm to the accumulation windows and are
//! left out of the trend fit.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::alert::{discharge, severity};
use crate::config::BasinConfig;
use crate::hydrology::{accumulation, reservoir, return_period, routing, runoff, thiessen, travel_time, trend};
use crate::ingest::provider::{PeakHistoryProvider, RainfallProvider, first_peak_history};
use crate::logging::{self, Component};
use crate::model::{
    BasinRainfallSeries, DischargeAlert, HydroError, RainfallObservation, ReservoirStep, ReturnPeriodEstimate,
    RoutingResult, RunoffEstimate, Severity, SeverityClassification, TravelTime, TrendAnalysis,
    WaveCelerity,
};

/// Daily series are routed with a one-day step.
pub const DAILY_STEP_SECONDS: f64 = 86_400.0;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One day of the forecast horizon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAssessment {
    pub date: NaiveDate,
    pub daily_rain_mm: f64,
    pub accumulated_mm: f64,
    pub contributing_stations: usize,
    pub classification: SeverityClassification,
    /// `None` on days that were not assessed.
    pub runoff: Option<RunoffEstimate>,
}

impl DailyAssessment {
    pub fn is_assessed(&self) -> bool {
        self.contributing_stations > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelAnalysis {
    pub travel_time: TravelTime,
    /// At the horizon peak discharge.
    pub wave_celerity: WaveCelerity,
    /// Daily runoff peaks routed to the basin outlet.
    pub routing: RoutingResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReservoirOutlook {
    pub name: String,
    pub next_day: ReservoirStep,
    /// `None` when the current release warrants no downstream alert.
    pub discharge_alert: Option<DischargeAlert>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasinForecast {
    pub basin: String,
    pub basin_name: String,
    pub rainfall: BasinRainfallSeries,
    pub days: Vec<DailyAssessment>,
    pub max_daily_rain_mm: f64,
    /// `None` when no day had rain.
    pub max_daily_date: Option<NaiveDate>,
    /// Days classified warning or danger.
    pub warnings: Vec<DailyAssessment>,
    pub peak_discharge_m3s: f64,
    pub return_period: ReturnPeriodEstimate,
    pub trend: TrendAnalysis,
    pub channel: Option<ChannelAnalysis>,
    pub reservoirs: Vec<ReservoirOutlook>,
}

/// Per-severity day counts for one basin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasinSummary {
    pub basin: String,
    pub basin_name: String,
    pub danger_count: usize,
    pub warning_count: usize,
    pub watch_count: usize,
    pub safe_count: usize,
    pub not_assessed_count: usize,
    /// `None` when no day could be assessed.
    pub highest_severity: Option<Severity>,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Groups observations by date (ascending) and station.
///
/// A duplicate (station, date) pair keeps the last reported value, except
/// that a missing value never replaces a reported one.
fn group_by_date(rainfall: &[RainfallObservation]) -> BTreeMap<NaiveDate, HashMap<String, Option<f64>>> {
    let mut by_date: BTreeMap<NaiveDate, HashMap<String, Option<f64>>> = BTreeMap::new();
    for obs in rainfall {
        let day = by_date.entry(obs.date).or_default();
        match (day.get(&obs.station_id), obs.depth_mm) {
            (Some(Some(_)), None) => {}
            _ => {
                day.insert(obs.station_id.clone(), obs.depth_mm);
            }
        }
    }
    by_date
}

/// Expands the grouped observations to every calendar day from the first
/// observed date to the last. A day with no row at all gets an empty map,
/// which Thiessen reports as zero contributing stations.
fn fill_calendar(
    mut by_date: BTreeMap<NaiveDate, HashMap<String, Option<f64>>>,
) -> Vec<(NaiveDate, HashMap<String, Option<f64>>)> {
    let (Some(&first), Some(&last)) = (by_date.keys().next(), by_date.keys().next_back()) else {
        return Vec::new();
    };

    let mut days = Vec::new();
    let mut date = Some(first);
    while let Some(d) = date.filter(|d| *d <= last) {
        days.push((d, by_date.remove(&d).unwrap_or_default()));
        date = d.succ_opt();
    }
    days
}

fn analyze_channel(
    basin: &BasinConfig,
    days: &[DailyAssessment],
    peak_discharge_m3s: f64,
) -> Result<Option<ChannelAnalysis>, HydroError> {
    let Some(channel) = basin.channel else {
        return Ok(None);
    };
    if days.is_empty() {
        return Ok(None);
    }

    let travel_time = travel_time::travel_time(
        channel.length_km,
        channel.slope,
        channel.manning_n,
        channel.hydraulic_radius_m,
    )?;
    let wave_celerity = travel_time::wave_celerity(peak_discharge_m3s, channel.width_m, channel.depth_m);

    let k_hours = channel.muskingum_k_hours.unwrap_or(travel_time.travel_time_hours);
    let inflow: Vec<f64> = days
        .iter()
        .map(|d| d.runoff.map(|r| r.peak_discharge_m3s).unwrap_or(0.0))
        .collect();
    let routing = routing::route(&inflow, k_hours * 3600.0, channel.muskingum_x, DAILY_STEP_SECONDS)?;

    Ok(Some(ChannelAnalysis {
        travel_time,
        wave_celerity,
        routing,
    }))
}

/// Runs the full forecast for one basin.
///
/// `historical_peaks` feeds the return-period estimate; `None` (or fewer
/// than three peaks) yields an `insufficient_data` estimate.
///
/// # Errors
/// Propagates `InvalidParameter` from an out-of-domain basin parameter
/// (curve number, time of concentration, channel geometry) and
/// `UnstableRoutingParameters` from the channel routing.
pub fn forecast_basin(
    basin: &BasinConfig,
    rainfall: &[RainfallObservation],
    historical_peaks: Option<&[f64]>,
) -> Result<BasinForecast, HydroError> {
    let calendar = fill_calendar(group_by_date(rainfall));

    let areal: Vec<(NaiveDate, _)> = calendar
        .iter()
        .map(|(date, obs)| (*date, thiessen::estimate_detailed(obs, &basin.weights)))
        .collect();

    let series = BasinRainfallSeries {
        basin: basin.code.clone(),
        points: areal.iter().map(|(date, a)| (*date, a.basin_average_mm)).collect(),
    };
    let daily = series.depths();
    let accumulated = accumulation::accumulate(&daily, basin.accumulation_window_days)?;

    let mut days = Vec::with_capacity(areal.len());
    for (i, (date, a)) in areal.iter().enumerate() {
        let contributing_stations = a.contributing_stations();
        let (classification, runoff) = if contributing_stations == 0 {
            (severity::not_assessed(), None)
        } else {
            let estimate = runoff::estimate(
                daily[i],
                basin.area_km2,
                basin.curve_number,
                basin.time_of_concentration_hours,
            )?;
            (
                severity::classify(daily[i], accumulated[i], &basin.thresholds),
                Some(estimate),
            )
        };
        days.push(DailyAssessment {
            date: *date,
            daily_rain_mm: daily[i],
            accumulated_mm: accumulated[i],
            contributing_stations,
            classification,
            runoff,
        });
    }

    let mut max_daily_rain_mm = 0.0;
    let mut max_daily_date = None;
    for day in &days {
        if day.daily_rain_mm > max_daily_rain_mm {
            max_daily_rain_mm = day.daily_rain_mm;
            max_daily_date = Some(day.date);
        }
    }

    let warnings = days
        .iter()
        .filter(|d| d.classification.severity >= Severity::Warning)
        .cloned()
        .collect();

    let peak_discharge_m3s = days
        .iter()
        .filter_map(|d| d.runoff.map(|r| r.peak_discharge_m3s))
        .fold(0.0, f64::max);

    let return_period = return_period::estimate(peak_discharge_m3s, historical_peaks.unwrap_or(&[]));
    let assessed_rain: Vec<f64> = days
        .iter()
        .filter(|d| d.is_assessed())
        .map(|d| d.daily_rain_mm)
        .collect();
    let trend = trend::analyze(&assessed_rain, trend::DEFAULT_TREND_WINDOW);
    let channel = analyze_channel(basin, &days, peak_discharge_m3s)?;

    let mut reservoirs = Vec::with_capacity(basin.reservoirs.len());
    for r in &basin.reservoirs {
        reservoirs.push(ReservoirOutlook {
            name: r.name.clone(),
            next_day: reservoir::step_state(&r.state(), DAILY_STEP_SECONDS)?,
            discharge_alert: discharge::classify(&r.telemetry()),
        });
    }

    Ok(BasinForecast {
        basin: basin.code.clone(),
        basin_name: basin.name.clone(),
        rainfall: series,
        days,
        max_daily_rain_mm,
        max_daily_date,
        warnings,
        peak_discharge_m3s,
        return_period,
        trend,
        channel,
        reservoirs,
    })
}

/// Counts days per severity. Unassessed days are counted separately.
pub fn summarize(forecast: &BasinForecast) -> BasinSummary {
    let mut summary = BasinSummary {
        basin: forecast.basin.clone(),
        basin_name: forecast.basin_name.clone(),
        danger_count: 0,
        warning_count: 0,
        watch_count: 0,
        safe_count: 0,
        not_assessed_count: 0,
        highest_severity: None,
    };

    for day in &forecast.days {
        if !day.is_assessed() {
            summary.not_assessed_count += 1;
            continue;
        }
        let s = day.classification.severity;
        match s {
            Severity::Danger => summary.danger_count += 1,
            Severity::Warning => summary.warning_count += 1,
            Severity::Watch => summary.watch_count += 1,
            Severity::Safe => summary.safe_count += 1,
        }
        summary.highest_severity = summary.highest_severity.max(Some(s));
    }
    summary
}

// ---------------------------------------------------------------------------
// Multi-basin run
// ---------------------------------------------------------------------------

/// Outcome of forecasting every configured basin.
#[derive(Debug, Default)]
pub struct ForecastRun {
    pub forecasts: Vec<BasinForecast>,
    /// (basin code, reason) for each basin that could not be forecast.
    pub failures: Vec<(String, String)>,
}

/// Forecasts each basin independently; one basin failing does not stop
/// the others. Failures are logged and returned.
pub fn run_forecasts(
    basins: &[BasinConfig],
    rainfall: &dyn RainfallProvider,
    peak_sources: &[&dyn PeakHistoryProvider],
) -> ForecastRun {
    let mut run = ForecastRun::default();

    for basin in basins {
        let observations = match rainfall.daily_rainfall(basin) {
            Ok(obs) => obs,
            Err(e) => {
                logging::log_load_failure(Component::Rainfall, &format!("rainfall for {}", basin.code), e.as_ref());
                run.failures.push((basin.code.clone(), e.to_string()));
                continue;
            }
        };
        logging::debug(
            Component::Rainfall,
            Some(&basin.code),
            &format!("{} observations", observations.len()),
        );

        let peaks = first_peak_history(peak_sources, &basin.code);
        match forecast_basin(basin, &observations, peaks.as_deref()) {
            Ok(forecast) => {
                for outlook in &forecast.reservoirs {
                    if let Some(alert) = &outlook.discharge_alert {
                        logging::warn(
                            Component::Forecast,
                            Some(&basin.code),
                            &format!("{} discharge {:?}: {}", outlook.name, alert.severity, alert.reason),
                        );
                    }
                }
                logging::info(
                    Component::Forecast,
                    Some(&basin.code),
                    &format!(
                        "{} days, {} warning day(s), peak {:.0} m³/s",
                        forecast.days.len(),
                        forecast.warnings.len(),
                        forecast.peak_discharge_m3s
                    ),
                );
                run.forecasts.push(forecast);
            }
            Err(e) => {
                logging::log_hydro_failure(&basin.code, "forecast", &e);
                run.failures.push((basin.code.clone(), e.to_string()));
            }
        }
    }

    logging::log_run_summary(basins.len(), run.forecasts.len(), run.failures.len());
    run
}
