//! Reciprocity command: corrected exposure time for a film stock.

use anyhow::{Context, Result};
use serde::Serialize;

use super::print_json;
use crate::args::GlobalOptions;
use crate::config::Config;
use crate::exposure::format::format_shutter;
use crate::exposure::nd::{NdFilter, nd_shutter};
use crate::reciprocity::{FilmStock, ReciprocityCurvePoint};

#[derive(Serialize)]
struct ReciprocityReport<'a> {
    film: &'a FilmStock,
    metered_seconds: f64,
    nd_filter: Option<&'static str>,
    /// Metered time after the ND filter, before correction
    base_seconds: f64,
    multiplier: f64,
    corrected_seconds: f64,
    compensation_stops: f64,
    curve: Vec<ReciprocityCurvePoint>,
}

pub fn handle_reciprocity_command(
    global: &GlobalOptions,
    config: &Config,
    shutter_seconds: f64,
    film: Option<&str>,
    nd: Option<&'static NdFilter>,
) -> Result<()> {
    let table = config.film_table()?;
    let key = film
        .or(config.film.as_deref())
        .context("No film selected. Pass --film <key> or set film in gloaming.toml")?;
    let stock = table.require(key)?;
    let profile = stock.profile;

    let base_seconds = match nd {
        Some(filter) => nd_shutter(shutter_seconds, filter.stops as f64),
        None => shutter_seconds,
    };

    let report = ReciprocityReport {
        film: stock,
        metered_seconds: shutter_seconds,
        nd_filter: nd.map(|f| f.name),
        base_seconds,
        multiplier: profile.multiplier(base_seconds),
        corrected_seconds: profile.corrected_seconds(base_seconds),
        compensation_stops: profile.compensation_stops(base_seconds),
        curve: profile.default_curve(),
    };

    if global.json {
        return print_json(&report);
    }

    log_block_start!("{} · ISO {} · {}", stock.name, stock.iso, stock.kind);
    if let Some(filter) = nd {
        log_indented!(
            "Metered {} behind {} → {}",
            format_shutter(shutter_seconds),
            filter.name,
            format_shutter(base_seconds)
        );
    }

    if report.multiplier <= 1.0 {
        log_decorated!(
            "{} needs no correction (failure starts after {})",
            format_shutter(base_seconds),
            format_shutter(profile.t1)
        );
    } else {
        log_decorated!(
            "Expose {} instead of {} (×{:.2}, +{:.1} stops)",
            format_shutter(report.corrected_seconds),
            format_shutter(base_seconds),
            report.multiplier,
            report.compensation_stops
        );
        if report.multiplier >= profile.max_multiplier {
            log_indented!("Correction is at this film's cap of ×{}", profile.max_multiplier);
        }
    }

    log_block_start!("Correction table:");
    for point in &report.curve {
        log_indented!(
            "{:>8} → {}",
            format_shutter(point.base_seconds),
            format_shutter(point.corrected_seconds)
        );
    }

    if global.debug_enabled {
        log_pipe!();
        log_debug!(
            "t1 = {}s, p = {}, max_multiplier = {}{}",
            profile.t1,
            profile.p,
            profile.max_multiplier,
            if stock.custom { " (custom)" } else { "" }
        );
    }

    Ok(())
}
