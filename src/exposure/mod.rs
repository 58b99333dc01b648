//! Exposure value algebra.
//!
//! EV = log2(N² / t) + log2(S / 100) for aperture N, shutter time t in seconds
//! and ISO S. Solving always works on unrounded EV; [`round_ev`] is for display.

pub mod dof;
pub mod format;
pub mod nd;
pub mod scenes;
pub mod solver;
pub mod values;

pub use solver::{EquivalentExposure, ExposureSolver};
pub use values::DiscreteValueSet;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Aperture, shutter time and sensitivity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExposureTriple {
    /// f-number
    pub aperture: f64,
    pub shutter_seconds: f64,
    pub iso: u32,
}

impl ExposureTriple {
    pub fn new(aperture: f64, shutter_seconds: f64, iso: u32) -> Result<Self> {
        if !(aperture.is_finite() && aperture > 0.0) {
            anyhow::bail!("aperture must be a positive f-number (got {aperture})");
        }
        if !(shutter_seconds.is_finite() && shutter_seconds > 0.0) {
            anyhow::bail!("shutter speed must be positive (got {shutter_seconds}s)");
        }
        if iso == 0 {
            anyhow::bail!("ISO must be positive");
        }
        Ok(Self {
            aperture,
            shutter_seconds,
            iso,
        })
    }

    pub fn ev(&self) -> f64 {
        exposure_value(self.aperture, self.shutter_seconds, self.iso as f64)
    }

    pub fn get(&self, param: ExposureParam) -> f64 {
        match param {
            ExposureParam::Aperture => self.aperture,
            ExposureParam::Shutter => self.shutter_seconds,
            ExposureParam::Iso => self.iso as f64,
        }
    }

    /// Copy with one parameter replaced; ISO is rounded to a whole number.
    pub fn with(&self, param: ExposureParam, value: f64) -> Self {
        let mut triple = *self;
        match param {
            ExposureParam::Aperture => triple.aperture = value,
            ExposureParam::Shutter => triple.shutter_seconds = value,
            ExposureParam::Iso => triple.iso = value.round().max(1.0) as u32,
        }
        triple
    }
}

impl fmt::Display for ExposureTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} · {} · ISO {}",
            format::format_aperture(self.aperture),
            format::format_shutter(self.shutter_seconds),
            self.iso
        )
    }
}

/// One of the three exposure parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExposureParam {
    Aperture,
    Shutter,
    Iso,
}

impl ExposureParam {
    pub const ALL: [ExposureParam; 3] = [Self::Aperture, Self::Shutter, Self::Iso];

    /// The parameter that is neither `a` nor `b`; None if they are equal.
    pub fn remaining(a: ExposureParam, b: ExposureParam) -> Option<ExposureParam> {
        if a == b {
            return None;
        }
        Self::ALL.into_iter().find(|p| *p != a && *p != b)
    }
}

impl fmt::Display for ExposureParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Aperture => "aperture",
            Self::Shutter => "shutter",
            Self::Iso => "iso",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ExposureParam {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "aperture" | "a" | "f" => Ok(Self::Aperture),
            "shutter" | "s" | "t" => Ok(Self::Shutter),
            "iso" | "i" => Ok(Self::Iso),
            other => anyhow::bail!("Unknown exposure parameter '{other}' (use aperture, shutter or iso)"),
        }
    }
}

/// EV for an aperture, shutter time (seconds) and ISO.
pub fn exposure_value(aperture: f64, shutter_seconds: f64, iso: f64) -> f64 {
    (aperture * aperture / shutter_seconds).log2() + (iso / 100.0).log2()
}

/// Round EV to one decimal for display.
pub fn round_ev(ev: f64) -> f64 {
    (ev * 10.0).round() / 10.0
}
