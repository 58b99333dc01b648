//! Command handlers for the CLI.
//!
//! Each command lives in its own submodule. The shared pieces here turn
//! command-line options plus configuration into the inputs the engine needs:
//! a coordinate, a display timezone, a day and that day's sun times.

pub mod exposure;
pub mod films;
pub mod help;
pub mod reciprocity;
pub mod status;
pub mod timeline;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::fs;
use std::sync::Arc;

use crate::args::LocationOptions;
use crate::common::utils::private_path;
use crate::config::Config;
use crate::geo::{Coordinate, SunTimes};
use crate::phase::timeline::{Timeline, build_timeline_with_window};
use crate::time::FixedTimeSource;
use crate::time::source::{self, init_time_source, parse_instant};

/// Resolved inputs for one day at one place.
#[derive(Debug, Clone)]
pub struct DayContext {
    pub coordinate: Coordinate,
    pub timezone: Tz,
    pub date: NaiveDate,
    pub sun_times: SunTimes,
    /// Sun times came from `--sun-json` rather than the offline estimate
    pub from_provider: bool,
}

/// Command-line coordinates win over configured ones.
pub fn resolve_coordinate(config: &Config, location: &LocationOptions) -> Result<Coordinate> {
    match (location.latitude, location.longitude) {
        (Some(lat), Some(lon)) => Coordinate::new(lat, lon),
        (None, None) => config.coordinate()?.context(
            "No location configured. Pass --lat and --lon, or set latitude and longitude in gloaming.toml",
        ),
        _ => anyhow::bail!("--lat and --lon must be given together"),
    }
}

/// Display timezone: `--tz`, then the configuration, then UTC.
pub fn resolve_timezone(config: &Config, location: &LocationOptions) -> Result<Tz> {
    if let Some(ref name) = location.timezone {
        return name
            .parse::<Tz>()
            .map_err(|_| anyhow::anyhow!("Unknown timezone '{name}'"));
    }
    Ok(config.timezone()?.unwrap_or(Tz::UTC))
}

/// Pin the process time source to `--at`, if given.
pub fn pin_instant(config: &Config, location: &LocationOptions) -> Result<()> {
    if let Some(ref text) = location.at {
        let tz = resolve_timezone(config, location)?;
        let instant = parse_instant(text, tz)?;
        init_time_source(Arc::new(FixedTimeSource::new(instant)));
    }
    Ok(())
}

impl DayContext {
    pub fn resolve(config: &Config, location: &LocationOptions) -> Result<Self> {
        let coordinate = resolve_coordinate(config, location)?;
        let timezone = resolve_timezone(config, location)?;
        let date = match location.date {
            Some(date) => date,
            None => source::now().with_timezone(&timezone).date_naive(),
        };
        Self::for_date(coordinate, timezone, date, location)
    }

    pub fn for_date(
        coordinate: Coordinate,
        timezone: Tz,
        date: NaiveDate,
        location: &LocationOptions,
    ) -> Result<Self> {
        let (sun_times, from_provider) = match location.sun_json {
            Some(ref path) => {
                let json = fs::read_to_string(path).with_context(|| {
                    format!("Failed to read sun times from {}", private_path(path))
                })?;
                let times = SunTimes::from_api_json(&json).with_context(|| {
                    format!("Failed to parse sun times from {}", private_path(path))
                })?;
                (times, true)
            }
            None => (
                SunTimes::estimate(coordinate, date).with_context(|| {
                    format!("Could not estimate sunrise and sunset for {date} at {coordinate}")
                })?,
                false,
            ),
        };

        Ok(Self {
            coordinate,
            timezone,
            date,
            sun_times,
            from_provider,
        })
    }

    pub fn timeline(&self, config: &Config) -> Timeline {
        build_timeline_with_window(&self.sun_times, self.coordinate, config.search_window())
    }

    /// Same place, another day. Provider data only covers one day, so this
    /// always uses the offline estimate.
    pub fn shifted(&self, days: i64) -> Result<Self> {
        let date = self.date + chrono::Duration::days(days);
        if self.from_provider {
            log_pipe!();
            log_warning!(
                "Sun times from --sun-json cover {} only; using the offline estimate for {date}",
                self.date
            );
        }
        Self::for_date(self.coordinate, self.timezone, date, &LocationOptions::default())
    }

    pub fn format_time(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.timezone)
            .format("%H:%M")
            .to_string()
    }
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
