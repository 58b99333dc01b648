//! Sunrise, sunset and twilight instants for one day.
//!
//! The timeline builder only needs absolute instants. They come either from a
//! twilight provider payload (the sunrise-sunset.org JSON shape, requested with
//! `formatted=0`) or from an offline estimate using the `sunrise` crate.

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sunrise::{Coordinates, SolarDay, SolarEvent};

use super::Coordinate;
use super::crossing::{Direction, find_crossing};
use crate::common::constants::CIVIL_TWILIGHT_ELEVATION;

/// Boundary instants for one day at one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SunTimes {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub civil_twilight_begin: DateTime<Utc>,
    pub civil_twilight_end: DateTime<Utc>,
    pub solar_noon: Option<DateTime<Utc>>,
    pub nautical_twilight_begin: Option<DateTime<Utc>>,
    pub nautical_twilight_end: Option<DateTime<Utc>>,
    pub astronomical_twilight_begin: Option<DateTime<Utc>>,
    pub astronomical_twilight_end: Option<DateTime<Utc>>,
    pub day_length_seconds: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ApiResults {
    sunrise: String,
    sunset: String,
    civil_twilight_begin: String,
    civil_twilight_end: String,
    solar_noon: Option<String>,
    nautical_twilight_begin: Option<String>,
    nautical_twilight_end: Option<String>,
    astronomical_twilight_begin: Option<String>,
    astronomical_twilight_end: Option<String>,
    day_length: Option<DayLength>,
}

/// `day_length` is a number of seconds with `formatted=0`, `HH:MM:SS` otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DayLength {
    Seconds(u64),
    Clock(String),
}

impl DayLength {
    fn seconds(&self) -> Result<u64> {
        match self {
            DayLength::Seconds(s) => Ok(*s),
            DayLength::Clock(text) => {
                let parts: Vec<&str> = text.split(':').collect();
                if parts.len() != 3 {
                    anyhow::bail!("Invalid day_length '{text}', expected HH:MM:SS");
                }
                let mut total = 0u64;
                for part in parts {
                    let value: u64 = part
                        .parse()
                        .with_context(|| format!("Invalid day_length '{text}'"))?;
                    total = total * 60 + value;
                }
                Ok(total)
            }
        }
    }
}

fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>> {
    let instant = DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("Invalid {field} timestamp '{value}'"))?
        .with_timezone(&Utc);

    // The provider reports 1970-01-01T00:00:01 when the event does not happen that day
    if instant.year() == 1970 {
        anyhow::bail!("No {field} at this location on the requested date");
    }
    Ok(instant)
}

fn parse_optional(field: &str, value: Option<&String>) -> Result<Option<DateTime<Utc>>> {
    value.map(|v| parse_timestamp(field, v)).transpose()
}

impl SunTimes {
    /// Parse a provider payload of the form `{"results": {...}, "status": "OK"}`.
    pub fn from_api_json(json: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(json).context("Provider response is not valid JSON")?;

        let status = value
            .get("status")
            .and_then(|s| s.as_str())
            .unwrap_or("MISSING");
        if status != "OK" {
            anyhow::bail!("Provider returned status {status}");
        }

        let results: ApiResults = serde_json::from_value(
            value
                .get("results")
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("Provider response has no results"))?,
        )
        .context("Provider results are missing required fields")?;

        let times = Self {
            sunrise: parse_timestamp("sunrise", &results.sunrise)?,
            sunset: parse_timestamp("sunset", &results.sunset)?,
            civil_twilight_begin: parse_timestamp(
                "civil_twilight_begin",
                &results.civil_twilight_begin,
            )?,
            civil_twilight_end: parse_timestamp(
                "civil_twilight_end",
                &results.civil_twilight_end,
            )?,
            solar_noon: parse_optional("solar_noon", results.solar_noon.as_ref())?,
            nautical_twilight_begin: parse_optional(
                "nautical_twilight_begin",
                results.nautical_twilight_begin.as_ref(),
            )?,
            nautical_twilight_end: parse_optional(
                "nautical_twilight_end",
                results.nautical_twilight_end.as_ref(),
            )?,
            astronomical_twilight_begin: parse_optional(
                "astronomical_twilight_begin",
                results.astronomical_twilight_begin.as_ref(),
            )?,
            astronomical_twilight_end: parse_optional(
                "astronomical_twilight_end",
                results.astronomical_twilight_end.as_ref(),
            )?,
            day_length_seconds: results.day_length.as_ref().map(DayLength::seconds).transpose()?,
        };

        times.validate()?;
        Ok(times)
    }

    /// Estimate the day's instants offline.
    ///
    /// Sunrise and sunset come from the `sunrise` crate at a latitude capped to
    /// ±65°; civil twilight is located with the elevation search at the same
    /// capped latitude so the four instants stay consistent. When the sun never
    /// reaches -6° the civil twilight fields equal sunrise and sunset.
    pub fn estimate(coordinate: Coordinate, date: NaiveDate) -> Result<Self> {
        let capped = Coordinate {
            latitude: coordinate.capped_latitude(),
            longitude: coordinate.longitude,
        };
        let coord = Coordinates::new(capped.latitude, capped.longitude)
            .ok_or_else(|| anyhow::anyhow!("Invalid coordinates"))?;
        let solar_day = SolarDay::new(coord, date);
        let sunrise = solar_day.event_time(SolarEvent::Sunrise);
        let sunset = solar_day.event_time(SolarEvent::Sunset);

        // Where the sun never gets down to -6° (white nights) civil twilight
        // collapses onto sunrise/sunset instead of the edge of the search window.
        let window = Duration::hours(2);
        let dawn = find_crossing(
            CIVIL_TWILIGHT_ELEVATION,
            sunrise - window,
            sunrise,
            Direction::Ascending,
            capped,
        );
        let civil_twilight_begin = if dawn.converged { dawn.instant } else { sunrise };
        let dusk = find_crossing(
            CIVIL_TWILIGHT_ELEVATION,
            sunset,
            sunset + window,
            Direction::Descending,
            capped,
        );
        let civil_twilight_end = if dusk.converged { dusk.instant } else { sunset };

        let day_length = sunset - sunrise;
        let times = Self {
            sunrise,
            sunset,
            civil_twilight_begin,
            civil_twilight_end,
            solar_noon: Some(sunrise + day_length / 2),
            nautical_twilight_begin: None,
            nautical_twilight_end: None,
            astronomical_twilight_begin: None,
            astronomical_twilight_end: None,
            day_length_seconds: u64::try_from(day_length.num_seconds()).ok(),
        };

        times.validate()?;
        Ok(times)
    }

    /// Check the ordering civil dawn ≤ sunrise < sunset ≤ civil dusk.
    pub fn validate(&self) -> Result<()> {
        if self.civil_twilight_begin > self.sunrise {
            anyhow::bail!("civil_twilight_begin is after sunrise");
        }
        if self.sunrise >= self.sunset {
            anyhow::bail!("sunrise must be before sunset");
        }
        if self.sunset > self.civil_twilight_end {
            anyhow::bail!("civil_twilight_end is before sunset");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::constants::test_constants::*;
    use chrono::TimeZone;

    const LONDON_EQUINOX: &str = r#"{
        "results": {
            "sunrise": "2024-03-20T06:02:51+00:00",
            "sunset": "2024-03-20T18:14:38+00:00",
            "solar_noon": "2024-03-20T12:08:45+00:00",
            "day_length": 43907,
            "civil_twilight_begin": "2024-03-20T05:30:13+00:00",
            "civil_twilight_end": "2024-03-20T18:47:16+00:00",
            "nautical_twilight_begin": "2024-03-20T04:51:10+00:00",
            "nautical_twilight_end": "2024-03-20T19:26:19+00:00",
            "astronomical_twilight_begin": "2024-03-20T04:10:48+00:00",
            "astronomical_twilight_end": "2024-03-20T20:06:42+00:00"
        },
        "status": "OK",
        "tzid": "UTC"
    }"#;

    #[test]
    fn test_from_api_json_parses_all_fields() {
        let times = SunTimes::from_api_json(LONDON_EQUINOX).unwrap();
        assert_eq!(
            times.sunrise,
            Utc.with_ymd_and_hms(2024, 3, 20, 6, 2, 51).unwrap()
        );
        assert_eq!(times.day_length_seconds, Some(43907));
        assert!(times.nautical_twilight_begin.is_some());
        assert!(times.civil_twilight_begin < times.sunrise);
    }

    #[test]
    fn test_from_api_json_clock_day_length() {
        let json = LONDON_EQUINOX.replace("43907", "\"12:11:47\"");
        let times = SunTimes::from_api_json(&json).unwrap();
        assert_eq!(times.day_length_seconds, Some(12 * 3600 + 11 * 60 + 47));
    }

    #[test]
    fn test_from_api_json_rejects_bad_status() {
        let json = r#"{"results": "", "status": "INVALID_REQUEST"}"#;
        let err = SunTimes::from_api_json(json).unwrap_err();
        assert!(err.to_string().contains("INVALID_REQUEST"));
    }

    #[test]
    fn test_from_api_json_rejects_missing_event() {
        let json = LONDON_EQUINOX.replace("2024-03-20T06:02:51+00:00", "1970-01-01T00:00:01+00:00");
        assert!(SunTimes::from_api_json(&json).is_err());
    }

    #[test]
    fn test_from_api_json_rejects_misordered_times() {
        let json = LONDON_EQUINOX.replace("2024-03-20T05:30:13+00:00", "2024-03-20T06:30:13+00:00");
        assert!(SunTimes::from_api_json(&json).is_err());
    }

    #[test]
    fn test_estimate_is_ordered_and_plausible() {
        let coord = Coordinate::new(TEST_TOKYO_LAT, TEST_TOKYO_LON).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let times = SunTimes::estimate(coord, date).unwrap();

        // Tokyo midsummer sunrise is about 19:25 UTC the previous day
        let expected = Utc.with_ymd_and_hms(2024, 6, 20, 19, 25, 0).unwrap();
        assert!((times.sunrise - expected).num_minutes().abs() < 10);
        assert!(times.civil_twilight_begin < times.sunrise);
        assert!(times.sunset < times.civil_twilight_end);
        let dawn_gap = (times.sunrise - times.civil_twilight_begin).num_minutes();
        assert!((20..=45).contains(&dawn_gap));
    }

    #[test]
    fn test_estimate_caps_polar_latitude() {
        let coord = Coordinate::new(78.2232, 15.6267).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        assert!(coord.is_capped());
        assert!(SunTimes::estimate(coord, date).is_ok());
    }
}
