//! Bisection search for elevation-angle crossings.
//!
//! Given a time window in which the sun is known to move through a target
//! elevation in one direction, the search halves the window until the
//! midpoint is within [`CROSSING_TOLERANCE_DEGREES`] of the target or the
//! window is narrower than a second. It never fails: a window that does not
//! actually bracket the target still yields an instant, flagged as not
//! converged so callers can substitute an estimate.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use super::Coordinate;
use super::ephemeris::solar_elevation;
use crate::common::constants::{
    CROSSING_MAX_ITERATIONS, CROSSING_MIN_BRACKET_MS, CROSSING_TOLERANCE_DEGREES,
};

/// Which way the sun moves through the target elevation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Morning: elevation increasing
    Ascending,
    /// Evening: elevation decreasing
    Descending,
}

/// Result of a crossing search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Crossing {
    pub instant: DateTime<Utc>,
    pub iterations: u32,
    /// Elevation at `instant` is within tolerance of the target
    pub converged: bool,
}

fn instant_from_ms(ms: i64) -> DateTime<Utc> {
    // Bisection only produces values between two valid instants
    Utc.timestamp_millis_opt(ms)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Find when the sun crosses `target` degrees between `start` and `end`.
///
/// A reversed window is searched as if its ends were swapped.
pub fn find_crossing(
    target: f64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    direction: Direction,
    coordinate: Coordinate,
) -> Crossing {
    let elevation_at = |ms: i64| {
        solar_elevation(
            instant_from_ms(ms),
            coordinate.latitude,
            coordinate.longitude,
        )
    };

    let (mut lo, mut hi) = {
        let (a, b) = (start.timestamp_millis(), end.timestamp_millis());
        (a.min(b), a.max(b))
    };

    let mut iterations = 0;
    while iterations < CROSSING_MAX_ITERATIONS && hi - lo >= CROSSING_MIN_BRACKET_MS {
        iterations += 1;
        let mid = lo + (hi - lo) / 2;
        let elevation = elevation_at(mid);

        if (elevation - target).abs() < CROSSING_TOLERANCE_DEGREES {
            return Crossing {
                instant: instant_from_ms(mid),
                iterations,
                converged: true,
            };
        }

        let before_crossing = match direction {
            Direction::Ascending => elevation < target,
            Direction::Descending => elevation > target,
        };
        if before_crossing {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let mid = lo + (hi - lo) / 2;
    Crossing {
        instant: instant_from_ms(mid),
        iterations,
        converged: (elevation_at(mid) - target).abs() < CROSSING_TOLERANCE_DEGREES,
    }
}
