//! Reciprocity failure correction for long film exposures.
//!
//! Film loses sensitivity once an exposure runs past a stock-specific toe
//! time `t1`. Past that point the metered time is stretched by a power law,
//! capped at `max_multiplier`:
//!
//! ```text
//! multiplier = min(max(1, t / t1) ^ p, max_multiplier)
//! corrected  = t * multiplier
//! ```
//!
//! Profiles come from the [`films`] table, which loads and validates the
//! built-in data plus any user films from the configuration.

pub mod films;

pub use films::{CustomFilm, FilmKind, FilmStock, FilmTable};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::common::constants::RECIPROCITY_CHECKPOINTS;

/// Continuous reciprocity model for one film stock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReciprocityProfile {
    pub t1: f64,
    pub p: f64,
    pub max_multiplier: f64,
}

/// One row of a rendered correction table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReciprocityCurvePoint {
    pub base_seconds: f64,
    pub corrected_seconds: f64,
}

impl ReciprocityProfile {
    pub fn new(t1: f64, p: f64, max_multiplier: f64) -> Result<Self> {
        if !(t1.is_finite() && t1 > 0.0) {
            anyhow::bail!("t1 must be a positive number of seconds (got {t1})");
        }
        if !(p.is_finite() && p > 0.0) {
            anyhow::bail!("p must be positive (got {p})");
        }
        if !(max_multiplier.is_finite() && max_multiplier >= 1.0) {
            anyhow::bail!("max_multiplier must be at least 1 (got {max_multiplier})");
        }
        Ok(Self {
            t1,
            p,
            max_multiplier,
        })
    }

    /// Factor applied to a metered time. Exactly 1 up to and including `t1`.
    pub fn multiplier(&self, base_seconds: f64) -> f64 {
        if base_seconds <= self.t1 {
            return 1.0;
        }
        (base_seconds / self.t1)
            .powf(self.p)
            .min(self.max_multiplier)
    }

    pub fn corrected_seconds(&self, base_seconds: f64) -> f64 {
        if base_seconds <= 0.0 {
            return base_seconds;
        }
        base_seconds * self.multiplier(base_seconds)
    }

    /// Extra exposure the correction adds, in stops.
    pub fn compensation_stops(&self, base_seconds: f64) -> f64 {
        self.multiplier(base_seconds).log2()
    }

    pub fn curve(&self, checkpoints: &[f64]) -> Vec<ReciprocityCurvePoint> {
        checkpoints
            .iter()
            .map(|&base_seconds| ReciprocityCurvePoint {
                base_seconds,
                corrected_seconds: self.corrected_seconds(base_seconds),
            })
            .collect()
    }

    /// Curve over the standard checkpoints, 1 s to one hour.
    pub fn default_curve(&self) -> Vec<ReciprocityCurvePoint> {
        self.curve(&RECIPROCITY_CHECKPOINTS)
    }
}
