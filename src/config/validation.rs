//! Configuration validation.
//!
//! Rejects values the engine cannot work with before any command runs.

use anyhow::Result;
use chrono_tz::Tz;

use super::Config;
use crate::common::constants::*;

pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(lat) = config.latitude
        && !(-90.0..=90.0).contains(&lat)
    {
        anyhow::bail!("latitude must be between -90 and 90 degrees (got {})", lat);
    }

    if let Some(lon) = config.longitude
        && !(-180.0..=180.0).contains(&lon)
    {
        anyhow::bail!(
            "longitude must be between -180 and 180 degrees (got {})",
            lon
        );
    }

    if config.latitude.is_some() != config.longitude.is_some() {
        anyhow::bail!("latitude and longitude must be configured together");
    }

    if let Some(ref name) = config.timezone
        && name.parse::<Tz>().is_err()
    {
        anyhow::bail!(
            "timezone '{}' is not a known IANA timezone (e.g. \"Europe/London\")",
            name
        );
    }

    if let Some(window) = config.search_window_minutes
        && !(MINIMUM_SEARCH_WINDOW_MINUTES..=MAXIMUM_SEARCH_WINDOW_MINUTES).contains(&window)
    {
        anyhow::bail!(
            "search_window_minutes ({}) must be between {} and {} minutes",
            window,
            MINIMUM_SEARCH_WINDOW_MINUTES,
            MAXIMUM_SEARCH_WINDOW_MINUTES
        );
    }

    if let Some(tolerance) = config.ev_tolerance
        && !(0.0..=MAXIMUM_EV_TOLERANCE).contains(&tolerance)
    {
        anyhow::bail!(
            "ev_tolerance ({}) must be between 0 and {} EV",
            tolerance,
            MAXIMUM_EV_TOLERANCE
        );
    }

    if let Some(ref film) = config.film
        && film.trim().is_empty()
    {
        anyhow::bail!("film must not be empty");
    }

    if let Some(ref gear) = config.gear {
        validate_gear_list("apertures", gear.apertures.as_deref())?;
        validate_gear_list("shutter_speeds", gear.shutter_speeds.as_deref())?;
        validate_gear_list("isos", gear.isos.as_deref())?;
    }

    Ok(())
}

fn validate_gear_list(name: &str, values: Option<&[f64]>) -> Result<()> {
    let Some(values) = values else {
        return Ok(());
    };

    if values.is_empty() {
        anyhow::bail!("[gear] {} must list at least one value", name);
    }

    if let Some(bad) = values.iter().find(|v| !(v.is_finite() && **v > 0.0)) {
        anyhow::bail!("[gear] {} values must be positive (got {})", name, bad);
    }

    Ok(())
}
