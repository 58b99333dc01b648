//! Day timeline of blue hour, golden hour, daylight and night.
//!
//! Six boundaries are located with the elevation search, each inside a window
//! anchored on the supplied sunrise or sunset:
//!
//! | boundary              | target | window                          |
//! |-----------------------|--------|---------------------------------|
//! | morning blue start    | -6°    | sunrise - w .. sunrise          |
//! | morning golden start  | -4°    | previous .. sunrise + w         |
//! | morning golden end    | +6°    | previous .. sunrise + w         |
//! | evening golden start  | +6°    | sunset - w .. sunset            |
//! | evening blue start    | -4°    | sunset .. sunset + w            |
//! | evening blue end      | -6°    | previous .. sunset + w          |
//!
//! A boundary the search cannot pin down is estimated from the twilight rate
//! (degrees per minute between civil twilight and sunrise/sunset), or from
//! fixed offsets when that rate is unavailable. Boundaries are then forced
//! into non-decreasing order so the segments always tile without gaps.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::{LightPhase, PhaseSegment};
use crate::common::constants::*;
use crate::geo::{Coordinate, Direction, SunTimes, find_crossing};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundarySource {
    /// Found by the elevation search within tolerance
    Searched,
    /// Extrapolated from the twilight rate or fixed offsets
    Estimated,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Boundary {
    pub instant: DateTime<Utc>,
    pub source: BoundarySource,
}

impl Boundary {
    pub fn is_estimated(&self) -> bool {
        self.source == BoundarySource::Estimated
    }
}

/// The six elevation crossings of one day, in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoldenBlueHours {
    /// -6° rising
    pub morning_blue_start: Boundary,
    /// -4° rising; also the end of morning blue hour
    pub morning_golden_start: Boundary,
    /// +6° rising
    pub morning_golden_end: Boundary,
    /// +6° setting
    pub evening_golden_start: Boundary,
    /// -4° setting; also the end of evening golden hour
    pub evening_blue_start: Boundary,
    /// -6° setting
    pub evening_blue_end: Boundary,
}

impl GoldenBlueHours {
    fn boundaries(&self) -> [Boundary; 6] {
        [
            self.morning_blue_start,
            self.morning_golden_start,
            self.morning_golden_end,
            self.evening_golden_start,
            self.evening_blue_start,
            self.evening_blue_end,
        ]
    }

    pub fn is_approximate(&self) -> bool {
        self.boundaries().iter().any(Boundary::is_estimated)
    }
}

/// Linear model of elevation change around sunrise or sunset.
struct TwilightRate {
    anchor: DateTime<Utc>,
    /// Degrees per minute; None when civil twilight and the anchor coincide
    degrees_per_minute: Option<f64>,
    /// +1 for the morning (rising), -1 for the evening (setting)
    sign: f64,
}

impl TwilightRate {
    fn new(anchor: DateTime<Utc>, civil: DateTime<Utc>, sign: f64) -> Self {
        let minutes = (anchor - civil).num_milliseconds().abs() as f64 / 60_000.0;
        let rate = (SUNRISE_ELEVATION - CIVIL_TWILIGHT_ELEVATION) / minutes;
        Self {
            anchor,
            degrees_per_minute: (minutes > 0.0 && rate.is_finite()).then_some(rate),
            sign,
        }
    }

    fn estimate(&self, target: f64, fallback_minutes: i64) -> DateTime<Utc> {
        match self.degrees_per_minute {
            Some(rate) => {
                let minutes = self.sign * (target - SUNRISE_ELEVATION) / rate;
                self.anchor + Duration::milliseconds((minutes * 60_000.0).round() as i64)
            }
            None => self.anchor + Duration::minutes(fallback_minutes),
        }
    }
}

fn locate(
    target: f64,
    window: (DateTime<Utc>, DateTime<Utc>),
    direction: Direction,
    coordinate: Coordinate,
    estimate: impl FnOnce() -> DateTime<Utc>,
) -> Boundary {
    let crossing = find_crossing(target, window.0, window.1, direction, coordinate);
    if crossing.converged {
        Boundary {
            instant: crossing.instant,
            source: BoundarySource::Searched,
        }
    } else {
        Boundary {
            instant: estimate(),
            source: BoundarySource::Estimated,
        }
    }
}

/// Clamp each boundary to be no earlier than the one before it.
fn enforce_order(boundaries: &mut [Boundary]) {
    for i in 1..boundaries.len() {
        let previous = boundaries[i - 1].instant;
        if boundaries[i].instant < previous {
            boundaries[i] = Boundary {
                instant: previous,
                source: BoundarySource::Estimated,
            };
        }
    }
}

/// Locate the blue and golden hour boundaries for one day.
pub fn calculate_golden_blue_hours(
    sun_times: &SunTimes,
    coordinate: Coordinate,
    window: Duration,
) -> GoldenBlueHours {
    let sunrise = sun_times.sunrise;
    let sunset = sun_times.sunset;
    let morning = TwilightRate::new(sunrise, sun_times.civil_twilight_begin, 1.0);
    let evening = TwilightRate::new(sunset, sun_times.civil_twilight_end, -1.0);

    let m6 = locate(
        CIVIL_TWILIGHT_ELEVATION,
        (sunrise - window, sunrise),
        Direction::Ascending,
        coordinate,
        || morning.estimate(CIVIL_TWILIGHT_ELEVATION, FALLBACK_MORNING_BLUE_START),
    );
    let m4 = locate(
        BLUE_GOLDEN_ELEVATION,
        (m6.instant, sunrise + window),
        Direction::Ascending,
        coordinate,
        || morning.estimate(BLUE_GOLDEN_ELEVATION, FALLBACK_MORNING_GOLDEN_START),
    );
    let m_plus6 = locate(
        GOLDEN_DAYLIGHT_ELEVATION,
        (m4.instant, sunrise + window),
        Direction::Ascending,
        coordinate,
        || morning.estimate(GOLDEN_DAYLIGHT_ELEVATION, FALLBACK_MORNING_GOLDEN_END),
    );

    let e_plus6 = locate(
        GOLDEN_DAYLIGHT_ELEVATION,
        (sunset - window, sunset),
        Direction::Descending,
        coordinate,
        || evening.estimate(GOLDEN_DAYLIGHT_ELEVATION, FALLBACK_EVENING_GOLDEN_START),
    );
    let e4 = locate(
        BLUE_GOLDEN_ELEVATION,
        (sunset, sunset + window),
        Direction::Descending,
        coordinate,
        || evening.estimate(BLUE_GOLDEN_ELEVATION, FALLBACK_EVENING_BLUE_START),
    );
    let e6 = locate(
        CIVIL_TWILIGHT_ELEVATION,
        (e4.instant, sunset + window),
        Direction::Descending,
        coordinate,
        || evening.estimate(CIVIL_TWILIGHT_ELEVATION, FALLBACK_EVENING_BLUE_END),
    );

    let mut ordered = [m6, m4, m_plus6, e_plus6, e4, e6];
    enforce_order(&mut ordered);
    let [m6, m4, m_plus6, e_plus6, e4, e6] = ordered;

    GoldenBlueHours {
        morning_blue_start: m6,
        morning_golden_start: m4,
        morning_golden_end: m_plus6,
        evening_golden_start: e_plus6,
        evening_blue_start: e4,
        evening_blue_end: e6,
    }
}

/// Next blue hour relative to some instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlueHourWindow {
    pub phase: LightPhase,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Ordered, gapless light-phase segments covering one day plus the next morning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub hours: GoldenBlueHours,
    pub segments: Vec<PhaseSegment>,
}

impl Timeline {
    pub fn segments(&self) -> &[PhaseSegment] {
        &self.segments
    }

    pub fn segment(&self, id: LightPhase) -> Option<&PhaseSegment> {
        self.segments.iter().find(|s| s.id == id)
    }

    /// Whether any segment edge was estimated.
    pub fn is_approximate(&self) -> bool {
        self.segments.iter().any(|s| s.approximate)
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.segments.first().map(|s| s.start)
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.segments.last().map(|s| s.end)
    }

    /// First blue hour that starts after `now`; tomorrow morning's if all have started.
    pub fn next_blue_hour(&self, now: DateTime<Utc>) -> Option<BlueHourWindow> {
        let windows: Vec<BlueHourWindow> = self
            .segments
            .iter()
            .filter(|s| s.id.is_blue_hour())
            .map(|s| BlueHourWindow {
                phase: s.id,
                start: s.start,
                end: s.end,
            })
            .collect();

        windows
            .iter()
            .find(|w| w.start > now)
            .or_else(|| windows.last())
            .copied()
    }
}

/// Build the timeline with the default two-hour search windows.
pub fn build_timeline(sun_times: &SunTimes, coordinate: Coordinate) -> Timeline {
    build_timeline_with_window(
        sun_times,
        coordinate,
        Duration::minutes(DEFAULT_SEARCH_WINDOW_MINUTES),
    )
}

pub fn build_timeline_with_window(
    sun_times: &SunTimes,
    coordinate: Coordinate,
    window: Duration,
) -> Timeline {
    let hours = calculate_golden_blue_hours(sun_times, coordinate, window);
    let day = Duration::hours(24);

    let rollover = |b: Boundary| Boundary {
        instant: b.instant + day,
        source: b.source,
    };
    let mut edges = [
        hours.morning_blue_start,
        hours.morning_golden_start,
        hours.morning_golden_end,
        hours.evening_golden_start,
        hours.evening_blue_start,
        hours.evening_blue_end,
        rollover(hours.morning_blue_start),
        rollover(hours.morning_golden_start),
    ];
    enforce_order(&mut edges);

    let segments = LightPhase::ALL
        .iter()
        .enumerate()
        .map(|(i, &id)| {
            let (start, end) = (edges[i], edges[i + 1]);
            PhaseSegment::new(
                id,
                start.instant,
                end.instant,
                start.is_estimated() || end.is_estimated(),
            )
        })
        .collect();

    Timeline { hours, segments }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::constants::test_constants::*;
    use crate::geo::solar_elevation;
    use chrono::{NaiveDate, TimeZone};

    fn london_equinox() -> (Coordinate, SunTimes) {
        let coord = Coordinate::new(TEST_LONDON_LAT, TEST_LONDON_LON).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        (coord, SunTimes::estimate(coord, date).unwrap())
    }

    /// Tromsø on the winter solstice: the sun peaks near -3°, never reaching +6°.
    fn tromso_polar_night(civil_gap_minutes: i64) -> (Coordinate, SunTimes) {
        let coord = Coordinate::new(69.6492, 18.9553).unwrap();
        let sunrise = Utc.with_ymd_and_hms(2024, 12, 21, 10, 30, 0).unwrap();
        let sunset = Utc.with_ymd_and_hms(2024, 12, 21, 12, 30, 0).unwrap();
        let gap = Duration::minutes(civil_gap_minutes);
        let times = SunTimes {
            sunrise,
            sunset,
            civil_twilight_begin: sunrise - gap,
            civil_twilight_end: sunset + gap,
            solar_noon: None,
            nautical_twilight_begin: None,
            nautical_twilight_end: None,
            astronomical_twilight_begin: None,
            astronomical_twilight_end: None,
            day_length_seconds: None,
        };
        (coord, times)
    }

    fn assert_tiles(timeline: &Timeline) {
        assert_eq!(timeline.segments.len(), 7);
        for pair in timeline.segments.windows(2) {
            assert_eq!(pair[0].end, pair[1].start, "gap after {}", pair[0].id);
        }
        for segment in &timeline.segments {
            assert!(segment.start <= segment.end, "{} is reversed", segment.id);
        }
    }

    #[test]
    fn test_mid_latitude_timeline_is_fully_searched() {
        let (coord, times) = london_equinox();
        let timeline = build_timeline(&times, coord);

        assert_tiles(&timeline);
        assert!(!timeline.is_approximate());

        let hours = &timeline.hours;
        let checks = [
            (hours.morning_blue_start, CIVIL_TWILIGHT_ELEVATION),
            (hours.morning_golden_start, BLUE_GOLDEN_ELEVATION),
            (hours.morning_golden_end, GOLDEN_DAYLIGHT_ELEVATION),
            (hours.evening_golden_start, GOLDEN_DAYLIGHT_ELEVATION),
            (hours.evening_blue_start, BLUE_GOLDEN_ELEVATION),
            (hours.evening_blue_end, CIVIL_TWILIGHT_ELEVATION),
        ];
        for (boundary, target) in checks {
            let elevation = solar_elevation(boundary.instant, coord.latitude, coord.longitude);
            assert!((elevation - target).abs() < CROSSING_TOLERANCE_DEGREES);
        }

        assert!(hours.morning_golden_start.instant < times.sunrise);
        assert!(hours.morning_golden_end.instant > times.sunrise);
        assert!(hours.evening_blue_start.instant > times.sunset);
    }

    #[test]
    fn test_segment_order_and_rollover() {
        let (coord, times) = london_equinox();
        let timeline = build_timeline(&times, coord);

        let ids: Vec<_> = timeline.segments.iter().map(|s| s.id).collect();
        assert_eq!(ids, LightPhase::ALL.to_vec());

        let morning = timeline.segment(LightPhase::MorningBlueHour).unwrap();
        let next = timeline.segment(LightPhase::NextMorningBlueHour).unwrap();
        assert_eq!(next.start, morning.start + Duration::hours(24));
        assert_eq!(next.end, morning.end + Duration::hours(24));

        let night = timeline.segment(LightPhase::Night).unwrap();
        assert_eq!(night.end, next.start);
        // Equinox blue hour lasts roughly ten minutes in London
        let blue = morning.duration().num_minutes();
        assert!((7..=15).contains(&blue), "blue hour lasted {blue} minutes");
    }

    #[test]
    fn test_fixed_offset_fallback_without_twilight_rate() {
        let (coord, times) = tromso_polar_night(0);
        let timeline = build_timeline(&times, coord);

        assert_tiles(&timeline);
        assert!(timeline.is_approximate());

        let hours = &timeline.hours;
        assert!(hours.morning_golden_end.is_estimated());
        assert_eq!(
            hours.morning_golden_end.instant,
            times.sunrise + Duration::minutes(FALLBACK_MORNING_GOLDEN_END)
        );
        assert!(hours.evening_golden_start.is_estimated());
        assert_eq!(
            hours.evening_golden_start.instant,
            times.sunset + Duration::minutes(FALLBACK_EVENING_GOLDEN_START)
        );
        assert!(timeline.segment(LightPhase::Daylight).unwrap().approximate);
    }

    #[test]
    fn test_twilight_rate_fallback() {
        let (coord, times) = tromso_polar_night(40);
        let hours = calculate_golden_blue_hours(&times, coord, Duration::hours(2));

        // 6.833° above sunrise at 5.167° per 40 minutes
        let expected = 40.0 * (GOLDEN_DAYLIGHT_ELEVATION - SUNRISE_ELEVATION)
            / (SUNRISE_ELEVATION - CIVIL_TWILIGHT_ELEVATION);
        let morning = (hours.morning_golden_end.instant - times.sunrise).num_seconds() as f64 / 60.0;
        let evening = (times.sunset - hours.evening_golden_start.instant).num_seconds() as f64 / 60.0;
        assert!((morning - expected).abs() < 0.1);
        assert!((evening - expected).abs() < 0.1);
        assert!(hours.is_approximate());
    }

    #[test]
    fn test_enforce_order_clamps_and_flags() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 6, 0, 0).unwrap();
        let searched = |minutes| Boundary {
            instant: t0 + Duration::minutes(minutes),
            source: BoundarySource::Searched,
        };
        let mut boundaries = [searched(0), searched(10), searched(5), searched(20)];
        enforce_order(&mut boundaries);

        assert_eq!(boundaries[2].instant, boundaries[1].instant);
        assert!(boundaries[2].is_estimated());
        assert!(!boundaries[3].is_estimated());
    }

    #[test]
    fn test_next_blue_hour() {
        let (coord, times) = london_equinox();
        let timeline = build_timeline(&times, coord);
        let hours = &timeline.hours;

        let before_dawn = hours.morning_blue_start.instant - Duration::minutes(30);
        let next = timeline.next_blue_hour(before_dawn).unwrap();
        assert_eq!(next.phase, LightPhase::MorningBlueHour);

        let midday = times.sunrise + Duration::hours(5);
        let next = timeline.next_blue_hour(midday).unwrap();
        assert_eq!(next.phase, LightPhase::EveningBlueHour);
        assert_eq!(next.start, hours.evening_blue_start.instant);

        let late = hours.evening_blue_end.instant + Duration::hours(1);
        let next = timeline.next_blue_hour(late).unwrap();
        assert_eq!(next.phase, LightPhase::NextMorningBlueHour);

        // Past every window: still report tomorrow morning
        let far = late + Duration::days(3);
        assert_eq!(
            timeline.next_blue_hour(far).unwrap().phase,
            LightPhase::NextMorningBlueHour
        );
    }
}
