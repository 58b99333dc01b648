//! Configuration for gloaming.
//!
//! Settings live in `gloaming.toml` under `$XDG_CONFIG_HOME/gloaming/`, or in the
//! directory given with `--config`. Every field is optional and a missing file
//! means all defaults, so the CLI works with nothing but command-line flags.
//!
//! ```toml
//! #[Location]
//! latitude = 35.6895          # Decimal degrees (-90 to 90)
//! longitude = 139.6917        # Decimal degrees (-180 to 180)
//! timezone = "Asia/Tokyo"     # IANA name used for displaying times
//!
//! #[Light phases]
//! search_window_minutes = 120 # Crossing search window around sunrise/sunset (10-360)
//!
//! #[Exposure]
//! ev_tolerance = 0.3          # Residual EV reported as exact (0-3)
//! film = "kodak_portra400"    # Default stock for reciprocity
//!
//! [gear]                      # Restrict solving to what your camera offers
//! apertures = [2.8, 4, 5.6, 8, 11, 16]
//! shutter_speeds = [0.001, 0.002, 0.004, 0.008, 0.0167, 0.0333, 0.0667, 0.125, 0.25, 0.5, 1]
//! isos = [100, 200, 400, 800]
//!
//! [[films]]                   # Custom stocks; a matching key replaces a built-in
//! key = "my_pan100"
//! name = "Bulk-rolled Pan 100"
//! kind = "bw-classic"
//! t1 = 8
//! p = 0.7
//! max_multiplier = 8
//! ```
//!
//! ## Validation
//!
//! [`validation::validate_config`] rejects out-of-range coordinates, unknown
//! timezones, window and tolerance limits, and empty or non-positive gear lists.
//! Film entries are validated when the [`FilmTable`] is assembled.

pub mod loading;
pub mod validation;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::common::constants::*;
use crate::exposure::{DiscreteValueSet, ExposureSolver};
use crate::geo::Coordinate;
use crate::reciprocity::{CustomFilm, FilmTable};

pub use loading::{get_config_path, get_custom_config_dir, load, load_from_path, set_config_dir};

/// Restricted value sets for the exposure solver.
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GearConfig {
    pub apertures: Option<Vec<f64>>,
    pub shutter_speeds: Option<Vec<f64>>,
    pub isos: Option<Vec<f64>>,
}

/// Settings loaded from `gloaming.toml`.
///
/// Fields stay optional after loading; accessors apply the defaults so the
/// command layer can tell "configured" from "defaulted" when it needs to.
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// IANA timezone name, e.g. "Europe/London"
    pub timezone: Option<String>,
    /// Default film key for `reciprocity`
    pub film: Option<String>,
    pub search_window_minutes: Option<i64>,
    pub ev_tolerance: Option<f64>,
    pub gear: Option<GearConfig>,
    #[serde(default)]
    pub films: Vec<CustomFilm>,
}

impl Config {
    /// Warn about fields kept only so older files still parse.
    pub fn warn_legacy_fields(&self) {
        let legacy: Vec<&str> = self
            .films
            .iter()
            .filter(|film| film.has_legacy_fields())
            .map(|film| film.key.as_str())
            .collect();

        if legacy.is_empty() {
            return;
        }

        log_pipe!();
        log_warning!("Config fields 't2' and 'log_k' are deprecated and will be ignored.");
        log_indented!("Reciprocity now uses only t1, p and max_multiplier");
        log_indented!("Affected films: {}", legacy.join(", "));
    }

    /// Configured location, if both coordinates are present.
    pub fn coordinate(&self) -> Result<Option<Coordinate>> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Coordinate::new(lat, lon).map(Some),
            (None, None) => Ok(None),
            _ => anyhow::bail!("latitude and longitude must be configured together"),
        }
    }

    pub fn timezone(&self) -> Result<Option<Tz>> {
        self.timezone
            .as_deref()
            .map(|name| {
                name.parse::<Tz>()
                    .map_err(|_| anyhow::anyhow!("Unknown timezone '{name}'"))
            })
            .transpose()
    }

    pub fn search_window(&self) -> chrono::Duration {
        chrono::Duration::minutes(
            self.search_window_minutes
                .unwrap_or(DEFAULT_SEARCH_WINDOW_MINUTES),
        )
    }

    pub fn ev_tolerance(&self) -> f64 {
        self.ev_tolerance.unwrap_or(DEFAULT_EV_TOLERANCE)
    }

    /// Solver over the configured gear, standard sets where none is given.
    pub fn solver(&self) -> Result<ExposureSolver> {
        let gear = self.gear.clone().unwrap_or_default();
        let apertures = match gear.apertures {
            Some(values) => DiscreteValueSet::new(values).context("Invalid [gear] apertures")?,
            None => DiscreteValueSet::standard_apertures(),
        };
        let shutter_speeds = match gear.shutter_speeds {
            Some(values) => {
                DiscreteValueSet::new(values).context("Invalid [gear] shutter_speeds")?
            }
            None => DiscreteValueSet::standard_shutter_speeds(),
        };
        let isos = match gear.isos {
            Some(values) => DiscreteValueSet::new(values).context("Invalid [gear] isos")?,
            None => DiscreteValueSet::standard_isos(),
        };
        Ok(ExposureSolver::new(apertures, shutter_speeds, isos))
    }

    /// Built-in films with the configured custom films layered on top.
    pub fn film_table(&self) -> Result<FilmTable> {
        FilmTable::builtin()?
            .with_custom(&self.films)
            .context("Invalid [[films]] entry in configuration")
    }

    pub fn log_config(&self) {
        log_block_start!("Configuration");

        match self.coordinate() {
            Ok(Some(coordinate)) => log_indented!("Location: {}", coordinate),
            _ => log_indented!("Location: not set"),
        }
        if let Some(ref tz) = self.timezone {
            log_indented!("Timezone: {}", tz);
        }
        log_indented!(
            "Search window: {} minutes",
            self.search_window_minutes
                .unwrap_or(DEFAULT_SEARCH_WINDOW_MINUTES)
        );
        log_indented!("EV tolerance: ±{:.2}", self.ev_tolerance());
        if let Some(ref film) = self.film {
            log_indented!("Film: {}", film);
        }
        if self.gear.is_some() {
            log_indented!("Gear: restricted value sets");
        }
        if !self.films.is_empty() {
            log_indented!("Custom films: {}", self.films.len());
        }
    }
}
