//! Current and next light phase for a given instant.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::PhaseSegment;
use super::timeline::Timeline;

/// Where an instant sits on a timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseState {
    pub current: PhaseSegment,
    pub next: PhaseSegment,
    /// Fraction of `current` already elapsed, in [0, 1]
    pub progress: f64,
    /// Whole minutes until `current` ends, never negative
    pub minutes_until_transition: i64,
}

fn calculate_progress(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let total_ms = end.timestamp_millis() - start.timestamp_millis();
    if total_ms <= 0 {
        return 0.0;
    }
    let elapsed_ms = now.timestamp_millis() - start.timestamp_millis();
    (elapsed_ms as f64 / total_ms as f64).clamp(0.0, 1.0)
}

/// Resolve the phase containing `now`.
///
/// Segments are half-open `[start, end)`. When no segment contains `now`
/// (before the first or after the last), the last segment is reported as
/// current. The next segment wraps around to the first. Returns `None` only
/// for an empty segment list.
pub fn resolve_phase_state(segments: &[PhaseSegment], now: DateTime<Utc>) -> Option<PhaseState> {
    if segments.is_empty() {
        return None;
    }

    let index = segments
        .iter()
        .position(|s| s.contains(now))
        .unwrap_or(segments.len() - 1);
    let current = &segments[index];
    let next = &segments[(index + 1) % segments.len()];

    let remaining_ms = (current.end - now).num_milliseconds() as f64;
    let minutes_until_transition = ((remaining_ms / 60_000.0).round() as i64).max(0);

    Some(PhaseState {
        current: current.clone(),
        next: next.clone(),
        progress: calculate_progress(now, current.start, current.end),
        minutes_until_transition,
    })
}

impl Timeline {
    pub fn state_at(&self, now: DateTime<Utc>) -> Option<PhaseState> {
        resolve_phase_state(&self.segments, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::LightPhase;
    use chrono::{Duration, TimeZone};

    fn t(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 21, hour, minute, 0).unwrap()
    }

    fn sample_segments() -> Vec<PhaseSegment> {
        let edges = [
            t(3, 0),
            t(3, 20),
            t(4, 10),
            t(19, 0),
            t(19, 50),
            t(20, 10),
            t(23, 59) + Duration::hours(3) + Duration::minutes(1),
            t(23, 59) + Duration::hours(3) + Duration::minutes(21),
        ];
        LightPhase::ALL
            .iter()
            .enumerate()
            .map(|(i, &id)| PhaseSegment::new(id, edges[i], edges[i + 1], false))
            .collect()
    }

    #[test]
    fn test_resolves_containing_segment() {
        let segments = sample_segments();
        let state = resolve_phase_state(&segments, t(3, 30)).unwrap();

        assert_eq!(state.current.id, LightPhase::MorningGoldenHour);
        assert_eq!(state.next.id, LightPhase::Daylight);
        assert!((state.progress - 0.2).abs() < 1e-9);
        assert_eq!(state.minutes_until_transition, 40);
    }

    #[test]
    fn test_boundary_belongs_to_later_segment() {
        let segments = sample_segments();
        let state = resolve_phase_state(&segments, t(4, 10)).unwrap();
        assert_eq!(state.current.id, LightPhase::Daylight);
        assert_eq!(state.progress, 0.0);
    }

    #[test]
    fn test_outside_timeline_defaults_to_last_segment() {
        let segments = sample_segments();

        let before = resolve_phase_state(&segments, t(1, 0)).unwrap();
        assert_eq!(before.current.id, LightPhase::NextMorningBlueHour);
        assert_eq!(before.next.id, LightPhase::MorningBlueHour);
        assert_eq!(before.progress, 0.0);

        let after = resolve_phase_state(&segments, t(23, 0) + Duration::hours(10)).unwrap();
        assert_eq!(after.current.id, LightPhase::NextMorningBlueHour);
        assert_eq!(after.progress, 1.0);
        assert_eq!(after.minutes_until_transition, 0);
    }

    #[test]
    fn test_minutes_round_to_nearest() {
        let segments = sample_segments();
        // 20:10 - 19:59:31 = 10m 29s
        let now = t(19, 59) + Duration::seconds(31);
        let state = resolve_phase_state(&segments, now).unwrap();
        assert_eq!(state.current.id, LightPhase::EveningBlueHour);
        assert_eq!(state.minutes_until_transition, 10);

        // 20:10 - 19:59:29 = 10m 31s
        let now = t(19, 59) + Duration::seconds(29);
        let state = resolve_phase_state(&segments, now).unwrap();
        assert_eq!(state.minutes_until_transition, 11);
    }

    #[test]
    fn test_zero_length_segment_progress() {
        let instant = t(12, 0);
        let segments = vec![
            PhaseSegment::new(LightPhase::Daylight, instant, instant, true),
            PhaseSegment::new(LightPhase::Night, instant, instant + Duration::hours(1), true),
        ];
        // An empty segment never contains anything
        let state = resolve_phase_state(&segments, instant).unwrap();
        assert_eq!(state.current.id, LightPhase::Night);

        assert_eq!(calculate_progress(instant, instant, instant), 0.0);
    }

    #[test]
    fn test_empty_timeline() {
        assert!(resolve_phase_state(&[], t(12, 0)).is_none());
    }
}
