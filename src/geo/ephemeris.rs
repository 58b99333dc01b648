//! Solar position from the NOAA low-precision ephemeris.
//!
//! Accurate to roughly a hundredth of a degree within a few centuries of J2000,
//! which is far below what matters for locating twilight bands. Outside that span
//! the model drifts slowly but still returns finite angles.

use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;

const MS_PER_DAY: f64 = 86_400_000.0;
const UNIX_EPOCH_JULIAN_DAY: f64 = 2_440_587.5;
const J2000_JULIAN_DAY: f64 = 2_451_545.0;
const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Intermediate quantities of one elevation calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarPosition {
    /// Degrees
    pub declination: f64,
    /// Minutes
    pub equation_of_time: f64,
    /// Degrees, in [-180, 180]; negative before local solar noon
    pub hour_angle: f64,
    /// Degrees above the horizon
    pub elevation: f64,
}

pub fn julian_day(instant: DateTime<Utc>) -> f64 {
    instant.timestamp_millis() as f64 / MS_PER_DAY + UNIX_EPOCH_JULIAN_DAY
}

pub fn julian_century(julian_day: f64) -> f64 {
    (julian_day - J2000_JULIAN_DAY) / DAYS_PER_CENTURY
}

/// Orbital terms shared by declination and the equation of time.
struct SunOrbit {
    mean_longitude: f64,
    mean_anomaly: f64,
    eccentricity: f64,
    apparent_longitude: f64,
    obliquity: f64,
}

impl SunOrbit {
    fn at(t: f64) -> Self {
        let mean_longitude = (280.46646 + t * (36000.76983 + 0.0003032 * t)).rem_euclid(360.0);
        let mean_anomaly = 357.52911 + t * (35999.05029 - 0.0001537 * t);
        let eccentricity = 0.016708634 - t * (0.000042037 + 0.0000001267 * t);

        let m = mean_anomaly.to_radians();
        let center = m.sin() * (1.914602 - t * (0.004817 + 0.000014 * t))
            + (2.0 * m).sin() * (0.019993 - 0.000101 * t)
            + (3.0 * m).sin() * 0.000289;

        let true_longitude = mean_longitude + center;
        let omega = (125.04 - 1934.136 * t).to_radians();
        let apparent_longitude = true_longitude - 0.00569 - 0.00478 * omega.sin();

        let seconds = 21.448 - t * (46.815 + t * (0.00059 - t * 0.001813));
        let mean_obliquity = 23.0 + (26.0 + seconds / 60.0) / 60.0;
        let obliquity = mean_obliquity + 0.00256 * omega.cos();

        Self {
            mean_longitude,
            mean_anomaly,
            eccentricity,
            apparent_longitude,
            obliquity,
        }
    }

    fn declination(&self) -> f64 {
        let sin_dec = self.obliquity.to_radians().sin() * self.apparent_longitude.to_radians().sin();
        sin_dec.clamp(-1.0, 1.0).asin().to_degrees()
    }

    fn equation_of_time(&self) -> f64 {
        let y = (self.obliquity.to_radians() / 2.0).tan().powi(2);
        let l0 = self.mean_longitude.to_radians();
        let m = self.mean_anomaly.to_radians();
        let e = self.eccentricity;

        let radians = y * (2.0 * l0).sin() - 2.0 * e * m.sin()
            + 4.0 * e * y * m.sin() * (2.0 * l0).cos()
            - 0.5 * y * y * (4.0 * l0).sin()
            - 1.25 * e * e * (2.0 * m).sin();

        4.0 * radians.to_degrees()
    }
}

/// Solar declination in degrees.
pub fn solar_declination(instant: DateTime<Utc>) -> f64 {
    SunOrbit::at(julian_century(julian_day(instant))).declination()
}

/// Equation of time in minutes (apparent minus mean solar time).
pub fn equation_of_time(instant: DateTime<Utc>) -> f64 {
    SunOrbit::at(julian_century(julian_day(instant))).equation_of_time()
}

fn wrap_hour_angle(degrees: f64) -> f64 {
    let wrapped = (degrees + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid maps +180 to -180; keep the sign the raw value had
    if wrapped == -180.0 && degrees > 0.0 {
        180.0
    } else {
        wrapped
    }
}

/// Full position calculation for an instant and location.
pub fn solar_position(instant: DateTime<Utc>, latitude: f64, longitude: f64) -> SolarPosition {
    let orbit = SunOrbit::at(julian_century(julian_day(instant)));
    let declination = orbit.declination();
    let equation_of_time = orbit.equation_of_time();

    let utc_minutes = instant.hour() as f64 * 60.0
        + instant.minute() as f64
        + instant.second() as f64 / 60.0
        + instant.nanosecond() as f64 / 60_000_000_000.0;
    let true_solar_time = utc_minutes + equation_of_time + 4.0 * longitude;
    let hour_angle = wrap_hour_angle(true_solar_time / 4.0 - 180.0);

    let (lat, dec, ha) = (
        latitude.to_radians(),
        declination.to_radians(),
        hour_angle.to_radians(),
    );
    let sin_elevation = lat.sin() * dec.sin() + lat.cos() * dec.cos() * ha.cos();
    let elevation = sin_elevation.clamp(-1.0, 1.0).asin().to_degrees();

    SolarPosition {
        declination,
        equation_of_time,
        hour_angle,
        elevation,
    }
}

/// Solar elevation angle in degrees, positive above the horizon.
pub fn solar_elevation(instant: DateTime<Utc>, latitude: f64, longitude: f64) -> f64 {
    solar_position(instant, latitude, longitude).elevation
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_julian_day_epochs() {
        let epoch = Utc.timestamp_opt(0, 0).unwrap();
        assert_eq!(julian_day(epoch), UNIX_EPOCH_JULIAN_DAY);

        let j2000 = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert!((julian_day(j2000) - J2000_JULIAN_DAY).abs() < 1e-9);
        assert!(julian_century(julian_day(j2000)).abs() < 1e-12);
    }

    #[test]
    fn test_declination_at_solstices_and_equinox() {
        let june = Utc.with_ymd_and_hms(2024, 6, 20, 21, 0, 0).unwrap();
        assert!((solar_declination(june) - 23.44).abs() < 0.05);

        let december = Utc.with_ymd_and_hms(2024, 12, 21, 9, 0, 0).unwrap();
        assert!((solar_declination(december) + 23.44).abs() < 0.05);

        let march = Utc.with_ymd_and_hms(2024, 3, 20, 3, 6, 0).unwrap();
        assert!(solar_declination(march).abs() < 0.05);
    }

    #[test]
    fn test_equation_of_time_extremes() {
        // Early November: sundial runs about 16.4 minutes fast
        let november = Utc.with_ymd_and_hms(2024, 11, 3, 12, 0, 0).unwrap();
        assert!((equation_of_time(november) - 16.4).abs() < 0.3);

        // Mid February: about 14.2 minutes slow
        let february = Utc.with_ymd_and_hms(2024, 2, 11, 12, 0, 0).unwrap();
        assert!((equation_of_time(february) + 14.2).abs() < 0.3);
    }

    #[test]
    fn test_noon_elevation_on_equator_at_equinox() {
        // Greenwich meridian, equinox: the sun is nearly overhead near 12:07 UTC
        let noon = Utc.with_ymd_and_hms(2024, 3, 20, 12, 7, 0).unwrap();
        let position = solar_position(noon, 0.0, 0.0);
        assert!(position.elevation > 89.5);
        assert!(position.hour_angle.abs() < 0.5);
    }

    #[test]
    fn test_midnight_sun_and_polar_night() {
        let june_midnight = Utc.with_ymd_and_hms(2024, 6, 21, 0, 0, 0).unwrap();
        // North pole stays above the horizon, south pole below
        assert!(solar_elevation(june_midnight, 90.0, 0.0) > 23.0);
        assert!(solar_elevation(june_midnight, -90.0, 0.0) < -23.0);
    }

    #[test]
    fn test_hour_angle_wrap() {
        assert_eq!(wrap_hour_angle(0.0), 0.0);
        assert_eq!(wrap_hour_angle(190.0), -170.0);
        assert_eq!(wrap_hour_angle(-190.0), 170.0);
        assert_eq!(wrap_hour_angle(180.0), 180.0);
        assert_eq!(wrap_hour_angle(-180.0), -180.0);
        assert_eq!(wrap_hour_angle(540.0), 180.0);
    }

    #[test]
    fn test_far_future_stays_finite() {
        let far = Utc.with_ymd_and_hms(2600, 1, 1, 0, 0, 0).unwrap();
        let elevation = solar_elevation(far, 45.0, 10.0);
        assert!(elevation.is_finite());
        assert!((-90.0..=90.0).contains(&elevation));
    }
}
