//! Status command: which light phase an instant falls in.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{DayContext, print_json};
use crate::args::{GlobalOptions, LocationOptions};
use crate::common::utils::{format_minutes, progress_bar};
use crate::config::Config;
use crate::phase::{PhaseState, Timeline};

#[derive(Serialize)]
struct StatusReport<'a> {
    now: DateTime<Utc>,
    date: chrono::NaiveDate,
    timezone: String,
    source: &'static str,
    state: &'a PhaseState,
}

/// Timeline whose span contains `now`.
///
/// A day's timeline starts at that morning's blue hour and ends at the next
/// one, so early hours belong to the previous day's timeline.
pub fn timeline_containing(
    day: &DayContext,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<(DayContext, Timeline)> {
    let mut day = day.clone();
    let mut timeline = day.timeline(config);

    for _ in 0..2 {
        let shift = match (timeline.start(), timeline.end()) {
            (Some(start), _) if now < start => -1,
            (_, Some(end)) if now >= end => 1,
            _ => break,
        };
        day = day.shifted(shift)?;
        timeline = day.timeline(config);
    }

    Ok((day, timeline))
}

pub fn handle_status_command(
    global: &GlobalOptions,
    location: &LocationOptions,
    config: &Config,
) -> Result<()> {
    let day = DayContext::resolve(config, location)?;
    let now = crate::time::source::now();
    let (day, timeline) = timeline_containing(&day, config, now)?;

    let state = timeline
        .state_at(now)
        .ok_or_else(|| anyhow::anyhow!("Timeline for {} is empty", day.date))?;

    if global.json {
        return print_json(&StatusReport {
            now,
            date: day.date,
            timezone: day.timezone.name().to_string(),
            source: if day.from_provider { "provider" } else { "estimate" },
            state: &state,
        });
    }

    log_block_start!(
        "{} at {}",
        day.coordinate,
        now.with_timezone(&day.timezone).format("%Y-%m-%d %H:%M %Z")
    );
    log_indented!(
        "Current: {}{} {}\x1b[0m ({} → {})",
        state.current.accent.ansi_code(),
        state.current.id.symbol(),
        state.current.label,
        day.format_time(state.current.start),
        day.format_time(state.current.end)
    );
    log_indented!("         {}", progress_bar(state.progress, 20));
    log_indented!(
        "Next:    {} in {}",
        state.next.label,
        format_minutes(state.minutes_until_transition)
    );

    if state.current.approximate || state.next.approximate {
        log_pipe!();
        log_warning!("Phase boundaries around now were estimated");
    }

    if global.debug_enabled {
        log_pipe!();
        log_debug!("Timeline for {} spans:", day.date);
        for segment in timeline.segments() {
            log_indented!(
                "{:<24} {} → {}",
                segment.label,
                segment.start.to_rfc3339(),
                segment.end.to_rfc3339()
            );
        }
    }

    Ok(())
}
