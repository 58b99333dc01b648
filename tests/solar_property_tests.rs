use chrono::{Duration, NaiveDate};
use gloaming::geo::{Coordinate, SunTimes, solar_elevation};
use gloaming::phase::build_timeline;
use proptest::prelude::*;

/// Latitudes where civil twilight happens every day of the year.
fn mid_latitude_strategy() -> impl Strategy<Value = f64> {
    -55.0..=55.0
}

fn longitude_strategy() -> impl Strategy<Value = f64> {
    -180.0..=180.0
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2040, 1u32..=365).prop_filter_map("valid ordinal", |(year, day)| {
        NaiveDate::from_yo_opt(year, day)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_timeline_tiles_without_gaps(
        lat in mid_latitude_strategy(),
        lon in longitude_strategy(),
        date in date_strategy(),
    ) {
        let coordinate = Coordinate::new(lat, lon).unwrap();
        let sun_times = SunTimes::estimate(coordinate, date).unwrap();
        let timeline = build_timeline(&sun_times, coordinate);

        prop_assert_eq!(timeline.segments.len(), 7);
        for pair in timeline.segments.windows(2) {
            prop_assert_eq!(pair[0].end, pair[1].start);
        }
        for segment in &timeline.segments {
            prop_assert!(segment.start <= segment.end);
        }

        let span = timeline.end().unwrap() - timeline.start().unwrap();
        prop_assert!(span > Duration::hours(23) && span < Duration::hours(26));
    }

    #[test]
    fn test_every_instant_in_timeline_resolves_to_its_segment(
        lat in mid_latitude_strategy(),
        lon in longitude_strategy(),
        date in date_strategy(),
        fraction in 0.0f64..1.0,
    ) {
        let coordinate = Coordinate::new(lat, lon).unwrap();
        let sun_times = SunTimes::estimate(coordinate, date).unwrap();
        let timeline = build_timeline(&sun_times, coordinate);

        let start = timeline.start().unwrap();
        let span_ms = (timeline.end().unwrap() - start).num_milliseconds();
        let instant = start + Duration::milliseconds((span_ms as f64 * fraction) as i64);

        let state = timeline.state_at(instant).unwrap();
        prop_assert!(state.current.contains(instant));
        prop_assert!((0.0..=1.0).contains(&state.progress));
        prop_assert!(state.minutes_until_transition >= 0);
    }

    #[test]
    fn test_estimated_civil_twilight_sits_near_minus_six(
        lat in mid_latitude_strategy(),
        lon in longitude_strategy(),
        date in date_strategy(),
    ) {
        let coordinate = Coordinate::new(lat, lon).unwrap();
        let sun_times = SunTimes::estimate(coordinate, date).unwrap();

        for instant in [sun_times.civil_twilight_begin, sun_times.civil_twilight_end] {
            let elevation = solar_elevation(instant, lat, lon);
            prop_assert!((elevation + 6.0).abs() < 0.5, "elevation {elevation} at {instant}");
        }
    }
}
