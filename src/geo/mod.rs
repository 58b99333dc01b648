//! Solar geometry for a point on Earth.
//!
//! ## Module Structure
//!
//! - [`ephemeris`]: solar elevation from instant and coordinates (NOAA low-precision model)
//! - [`crossing`]: bisection search for the instant the sun crosses a given elevation
//! - [`provider`]: sunrise/sunset/twilight instants from a provider payload or offline estimate
//! - [`display`]: debug output of solar calculations
//!
//! Everything below `provider` is pure math over UTC instants and never fails; range
//! checks happen once when a [`Coordinate`] is built.

pub mod crossing;
pub mod display;
pub mod ephemeris;
pub mod provider;

pub use crossing::{Crossing, Direction, find_crossing};
pub use display::log_solar_debug_info;
pub use ephemeris::{SolarPosition, solar_elevation, solar_position};
pub use provider::SunTimes;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::common::constants::ESTIMATE_LATITUDE_CAP;

#[cfg(test)]
mod tests;

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting values outside the valid ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            anyhow::bail!("latitude must be between -90 and 90 degrees (got {latitude})");
        }
        if !(-180.0..=180.0).contains(&longitude) {
            anyhow::bail!("longitude must be between -180 and 180 degrees (got {longitude})");
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude clamped to the range where the offline sunrise estimate stays usable.
    pub fn capped_latitude(&self) -> f64 {
        self.latitude
            .clamp(-ESTIMATE_LATITUDE_CAP, ESTIMATE_LATITUDE_CAP)
    }

    pub fn is_capped(&self) -> bool {
        self.latitude.abs() > ESTIMATE_LATITUDE_CAP
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ns = if self.latitude >= 0.0 { 'N' } else { 'S' };
        let ew = if self.longitude >= 0.0 { 'E' } else { 'W' };
        write!(
            f,
            "{:.4}°{ns}, {:.4}°{ew}",
            self.latitude.abs(),
            self.longitude.abs()
        )
    }
}
