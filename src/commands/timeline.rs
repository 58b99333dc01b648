//! Timeline command: the day's light phases.

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

use super::{DayContext, print_json};
use crate::args::{GlobalOptions, LocationOptions};
use crate::common::utils::format_minutes;
use crate::config::Config;
use crate::geo::{Coordinate, SunTimes, log_solar_debug_info};
use crate::phase::{BlueHourWindow, PhaseSegment, Timeline};

#[derive(Serialize)]
struct TimelineReport<'a> {
    date: NaiveDate,
    coordinate: Coordinate,
    timezone: String,
    source: &'static str,
    approximate: bool,
    sun_times: &'a SunTimes,
    segments: &'a [PhaseSegment],
    next_blue_hour: Option<BlueHourWindow>,
}

pub fn handle_timeline_command(
    global: &GlobalOptions,
    location: &LocationOptions,
    config: &Config,
) -> Result<()> {
    let day = DayContext::resolve(config, location)?;
    let timeline = day.timeline(config);
    let now = crate::time::source::now();
    let next_blue_hour = timeline.next_blue_hour(now);

    if global.json {
        return print_json(&TimelineReport {
            date: day.date,
            coordinate: day.coordinate,
            timezone: day.timezone.name().to_string(),
            source: if day.from_provider { "provider" } else { "estimate" },
            approximate: timeline.is_approximate(),
            sun_times: &day.sun_times,
            segments: timeline.segments(),
            next_blue_hour,
        });
    }

    if global.debug_enabled {
        if crate::time::source::is_fixed() {
            log_debug!("Clock pinned to {}", now.to_rfc3339());
        }
        log_solar_debug_info(&day.sun_times, day.coordinate, day.timezone);
    }

    log_block_start!("Light phases for {} at {}", day.date, day.coordinate);
    log_indented!("Times in {}", day.timezone.name());
    log_pipe!();
    print_segments(&day, &timeline);

    if timeline.is_approximate() {
        log_pipe!();
        log_warning!("Boundaries marked ~ were estimated; the sun never crossed that elevation in the search window");
    }

    if let Some(window) = next_blue_hour
        && window.start > now
    {
        log_block_start!(
            "Next {}: {} → {} (in {})",
            window.phase.display_name().to_lowercase(),
            day.format_time(window.start),
            day.format_time(window.end),
            format_minutes((window.start - now).num_minutes())
        );
    }

    Ok(())
}

fn print_segments(day: &DayContext, timeline: &Timeline) {
    for segment in timeline.segments() {
        let marker = if segment.approximate { "~" } else { " " };
        log_indented!(
            "{}{} {:<22}\x1b[0m {} → {}{}  {}",
            segment.accent.ansi_code(),
            segment.id.symbol(),
            segment.label,
            day.format_time(segment.start),
            day.format_time(segment.end),
            marker,
            format_minutes(segment.duration().num_minutes())
        );
    }
}
