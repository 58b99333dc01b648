#[cfg(test)]
mod solar_tests {
    use crate::common::constants::test_constants::*;
    use crate::common::constants::*;
    use crate::geo::*;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn tokyo_midsummer() -> (Coordinate, SunTimes) {
        let coord = Coordinate::new(TEST_TOKYO_LAT, TEST_TOKYO_LON).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        (coord, SunTimes::estimate(coord, date).unwrap())
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(40.7128, -74.0060).is_ok());
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());

        assert!(Coordinate::new(91.0, 0.0).is_err());
        assert!(Coordinate::new(-91.0, 0.0).is_err());
        assert!(Coordinate::new(0.0, 181.0).is_err());
        assert!(Coordinate::new(0.0, -360.0).is_err());
    }

    #[test]
    fn test_coordinate_display() {
        let coord = Coordinate::new(TEST_SYDNEY_LAT, TEST_SYDNEY_LON).unwrap();
        assert_eq!(coord.to_string(), "33.8688°S, 151.2093°E");
    }

    /// Blue hour begins before sunrise and golden hour begins between it and sunrise.
    #[test]
    fn test_tokyo_morning_crossings_ordering() {
        let (coord, times) = tokyo_midsummer();
        let window = Duration::hours(2);

        let blue_start = find_crossing(
            CIVIL_TWILIGHT_ELEVATION,
            times.sunrise - window,
            times.sunrise,
            Direction::Ascending,
            coord,
        );
        assert!(blue_start.converged);
        assert!(blue_start.instant < times.sunrise);

        let golden_start = find_crossing(
            BLUE_GOLDEN_ELEVATION,
            blue_start.instant,
            times.sunrise + window,
            Direction::Ascending,
            coord,
        );
        assert!(golden_start.converged);
        assert!(golden_start.instant > blue_start.instant);
        assert!(golden_start.instant < times.sunrise);

        // Both are within tolerance of their targets
        let e6 = solar_elevation(blue_start.instant, coord.latitude, coord.longitude);
        let e4 = solar_elevation(golden_start.instant, coord.latitude, coord.longitude);
        assert!((e6 - CIVIL_TWILIGHT_ELEVATION).abs() < CROSSING_TOLERANCE_DEGREES);
        assert!((e4 - BLUE_GOLDEN_ELEVATION).abs() < CROSSING_TOLERANCE_DEGREES);
    }

    /// Elevation rises from solar midnight to solar noon and falls afterwards.
    #[test]
    fn test_elevation_monotonic_around_noon() {
        let (lat, lon) = (TEST_LONDON_LAT, TEST_LONDON_LON);
        // Solar noon in London on the equinox is about 12:08 UTC
        let noon = Utc.with_ymd_and_hms(2024, 3, 20, 12, 8, 0).unwrap();
        let midnight = noon - Duration::hours(12);

        let mut previous = solar_elevation(midnight, lat, lon);
        let mut t = midnight + Duration::minutes(10);
        while t < noon - Duration::minutes(10) {
            let current = solar_elevation(t, lat, lon);
            assert!(current > previous, "elevation fell at {t}");
            previous = current;
            t += Duration::minutes(10);
        }

        let mut t = noon + Duration::minutes(10);
        let mut previous = solar_elevation(noon, lat, lon);
        while t < noon + Duration::hours(11) {
            let current = solar_elevation(t, lat, lon);
            assert!(current < previous, "elevation rose at {t}");
            previous = current;
            t += Duration::minutes(10);
        }
    }

    /// The estimated sunrise sits where the model puts the sun at the refraction horizon.
    #[test]
    fn test_estimate_agrees_with_ephemeris() {
        for (lat, lon) in [
            (TEST_TOKYO_LAT, TEST_TOKYO_LON),
            (TEST_LONDON_LAT, TEST_LONDON_LON),
            (TEST_SYDNEY_LAT, TEST_SYDNEY_LON),
        ] {
            let coord = Coordinate::new(lat, lon).unwrap();
            let date = NaiveDate::from_ymd_opt(2024, 10, 5).unwrap();
            let times = SunTimes::estimate(coord, date).unwrap();

            let at_sunrise = solar_elevation(times.sunrise, lat, lon);
            let at_sunset = solar_elevation(times.sunset, lat, lon);
            assert!((at_sunrise - SUNRISE_ELEVATION).abs() < 0.5, "{coord}: {at_sunrise}");
            assert!((at_sunset - SUNRISE_ELEVATION).abs() < 0.5, "{coord}: {at_sunset}");
        }
    }

    /// Trondheim at midsummer: the sun sets but bottoms out near -3°.
    #[test]
    fn test_white_night_has_no_civil_twilight() {
        let coord = Coordinate::new(63.4305, 10.3951).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let times = SunTimes::estimate(coord, date).unwrap();

        assert_eq!(times.civil_twilight_begin, times.sunrise);
        assert_eq!(times.civil_twilight_end, times.sunset);

        let timeline = crate::phase::build_timeline(&times, coord);
        let hours = &timeline.hours;
        assert!(hours.morning_blue_start.is_estimated());
        assert_eq!(
            hours.morning_blue_start.instant,
            times.sunrise + Duration::minutes(FALLBACK_MORNING_BLUE_START)
        );
        assert!(hours.evening_blue_end.is_estimated());
        assert_eq!(
            hours.evening_blue_end.instant,
            times.sunset + Duration::minutes(FALLBACK_EVENING_BLUE_END)
        );
        assert!(timeline.is_approximate());
    }

    #[test]
    fn test_southern_hemisphere_seasons() {
        let coord = Coordinate::new(TEST_SYDNEY_LAT, TEST_SYDNEY_LON).unwrap();
        let december = SunTimes::estimate(coord, NaiveDate::from_ymd_opt(2024, 12, 21).unwrap())
            .unwrap();
        let june =
            SunTimes::estimate(coord, NaiveDate::from_ymd_opt(2024, 6, 21).unwrap()).unwrap();

        assert!(december.day_length_seconds > june.day_length_seconds);
    }

    #[cfg(test)]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        /// Latitudes where every day of the year has a sunrise and a civil dawn.
        fn latitude_strategy() -> impl Strategy<Value = f64> {
            -55.0..=55.0
        }

        fn longitude_strategy() -> impl Strategy<Value = f64> {
            -180.0..=180.0
        }

        fn instant_strategy() -> impl Strategy<Value = chrono::DateTime<Utc>> {
            // 2000-01-01 through 2049-12-31
            (946_684_800i64..2_524_521_600i64).prop_map(|s| Utc.timestamp_opt(s, 0).unwrap())
        }

        proptest! {
            #[test]
            fn test_elevation_is_bounded(
                lat in -90.0..=90.0f64,
                lon in longitude_strategy(),
                instant in instant_strategy()
            ) {
                let elevation = solar_elevation(instant, lat, lon);
                prop_assert!(elevation.is_finite());
                prop_assert!((-90.0..=90.0).contains(&elevation));
            }

            #[test]
            fn test_morning_blue_hour_crossing_converges(
                lat in latitude_strategy(),
                lon in longitude_strategy(),
                day in 0u32..365
            ) {
                let coord = Coordinate::new(lat, lon).unwrap();
                let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(day as i64);
                let times = SunTimes::estimate(coord, date).unwrap();

                let crossing = find_crossing(
                    CIVIL_TWILIGHT_ELEVATION,
                    times.sunrise - Duration::hours(2),
                    times.sunrise,
                    Direction::Ascending,
                    coord,
                );
                prop_assert!(crossing.converged);
                prop_assert!(crossing.iterations <= CROSSING_MAX_ITERATIONS);
                let elevation = solar_elevation(crossing.instant, lat, lon);
                prop_assert!((elevation - CIVIL_TWILIGHT_ELEVATION).abs() < CROSSING_TOLERANCE_DEGREES);
            }
        }
    }
}
