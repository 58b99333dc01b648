//! Time source abstraction for real and pinned clocks.
//!
//! The CLI normally reads the system clock. `--at` pins "now" to a fixed
//! instant so phase state and countdowns can be inspected for any moment
//! without waiting for it.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Global time source instance, defaults to RealTimeSource
static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

/// Trait for abstracting the current instant
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Whether "now" is pinned rather than read from the system clock
    fn is_fixed(&self) -> bool;
}

pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn is_fixed(&self) -> bool {
        false
    }
}

/// Clock pinned to a single instant.
pub struct FixedTimeSource {
    instant: DateTime<Utc>,
}

impl FixedTimeSource {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }

    fn is_fixed(&self) -> bool {
        true
    }
}

/// Initialize the global time source (call once at startup)
pub fn init_time_source(source: Arc<dyn TimeSource>) {
    TIME_SOURCE.set(source).ok();
}

/// Current instant from the global time source
pub fn now() -> DateTime<Utc> {
    TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource)).now()
}

pub fn is_fixed() -> bool {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .is_fixed()
}

/// Parse a user supplied instant.
///
/// Accepts RFC 3339 (`2024-06-21T04:30:00Z`, `2024-06-21T13:30:00+09:00`) or a
/// wall-clock time `YYYY-MM-DD HH:MM[:SS]` interpreted in `tz`.
pub fn parse_instant(s: &str, tz: Tz) -> Result<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
        return Ok(instant.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M"))
        .with_context(|| {
            format!("Invalid time '{s}'. Use RFC 3339 or YYYY-MM-DD HH:MM[:SS]")
        })?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| anyhow::anyhow!("Time '{s}' does not exist in timezone {tz}"))
}
