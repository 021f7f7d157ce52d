//! # Event Ordering
//!
//! Total order over timeline events. Keys are tried in priority order and
//! the first one where both sides carry a value that differs decides:
//!
//! ```text
//! 1. ordinal              (write-time sequence number, authoritative)
//! 2. created_at           (parsed; unparseable text counts as absent)
//! 3. occurred_at_seconds  (match clock)
//! 4. source_index         (input position, always present)
//! ```
//!
//! When only one side has a value for a key, that side sorts first.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::cmp::Ordering;

use crate::models::{MatchEvent, TimelineEvent};

/// Offset-carrying formats beyond RFC 3339 (e.g. Postgres `+00`)
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];

/// Formats without an offset, read as UTC
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse a stored timestamp. Returns `None` for anything unrecognized.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Compare two events by ordinal, timestamp and match clock.
///
/// Returns `Equal` when none of the keys separates them; callers that
/// need a strict order use [`compare_timeline`].
pub fn compare_events(a: &MatchEvent, b: &MatchEvent) -> Ordering {
    compare_present(a.ordinal, b.ordinal)
        .or_else(|| compare_present(event_time(a), event_time(b)))
        .or_else(|| compare_present(match_clock(a), match_clock(b)))
        .unwrap_or(Ordering::Equal)
}

/// [`compare_events`] with input position as the final tie-break
pub fn compare_timeline(a: &TimelineEvent, b: &TimelineEvent) -> Ordering {
    compare_events(&a.event, &b.event).then_with(|| a.source_index.cmp(&b.source_index))
}

/// Stable sort of a merged timeline
pub fn sort_timeline(events: &mut [TimelineEvent]) {
    events.sort_by(compare_timeline);
}

fn event_time(event: &MatchEvent) -> Option<DateTime<Utc>> {
    event.created_at.as_deref().and_then(parse_timestamp)
}

fn match_clock(event: &MatchEvent) -> Option<f64> {
    event.occurred_at_seconds.filter(|s| !s.is_nan())
}

/// `Some` when this key decides the order, `None` to fall through
fn compare_present<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Option<Ordering> {
    match (a, b) {
        (Some(a), Some(b)) => match a.partial_cmp(&b) {
            Some(Ordering::Equal) | None => None,
            decided => decided,
        },
        (Some(_), None) => Some(Ordering::Less),
        (None, Some(_)) => Some(Ordering::Greater),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(event: MatchEvent, idx: usize) -> TimelineEvent {
        TimelineEvent::new(event, idx)
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 2, 10, 15, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-02T10:15:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-02T12:15:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-02 10:15:00+00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-02T10:15:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-02 10:15:00.000"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-02T10:15"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-03-02"),
            Some(Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-13-45T99:00:00Z"), None);
    }

    #[test]
    fn test_ordinal_beats_created_at() {
        let a = MatchEvent::new("goal").with_ordinal(5).with_created_at("2024-01-01T00:00:00Z");
        let b = MatchEvent::new("goal").with_ordinal(3).with_created_at("2024-06-01T00:00:00Z");
        assert_eq!(compare_events(&a, &b), Ordering::Greater);
        assert_eq!(compare_events(&b, &a), Ordering::Less);
    }

    #[test]
    fn test_present_value_sorts_first() {
        let with_ordinal = MatchEvent::new("goal").with_ordinal(100);
        let without = MatchEvent::new("goal").with_created_at("2020-01-01T00:00:00Z");
        assert_eq!(compare_events(&with_ordinal, &without), Ordering::Less);
        assert_eq!(compare_events(&without, &with_ordinal), Ordering::Greater);
    }

    #[test]
    fn test_equal_ordinal_falls_through_to_time() {
        let a = MatchEvent::new("goal").with_ordinal(1).with_created_at("2024-01-01T10:00:05Z");
        let b = MatchEvent::new("goal").with_ordinal(1).with_created_at("2024-01-01T10:00:01Z");
        assert_eq!(compare_events(&a, &b), Ordering::Greater);
    }

    #[test]
    fn test_unparseable_time_is_absent() {
        let a = MatchEvent::new("goal").with_created_at("not a date").with_clock(10.0);
        let b = MatchEvent::new("goal").with_created_at("also not").with_clock(5.0);
        assert_eq!(compare_events(&a, &b), Ordering::Greater);

        // The side whose timestamp parses counts as having one
        let parsed = MatchEvent::new("goal")
            .with_created_at("2024-01-01T00:00:00Z")
            .with_clock(99.0);
        assert_eq!(compare_events(&parsed, &a), Ordering::Less);
    }

    #[test]
    fn test_nan_clock_is_absent() {
        let a = MatchEvent::new("goal").with_clock(f64::NAN);
        let b = MatchEvent::new("goal").with_clock(3.0);
        assert_eq!(compare_events(&a, &b), Ordering::Greater);
    }

    #[test]
    fn test_source_index_breaks_ties() {
        let a = entry(MatchEvent::new("goal").with_ordinal(1).with_clock(3.0), 4);
        let b = entry(MatchEvent::new("goal").with_ordinal(1).with_clock(3.0), 2);
        assert_eq!(compare_timeline(&a, &b), Ordering::Greater);
        assert_eq!(compare_timeline(&a, &a), Ordering::Equal);
    }

    #[test]
    fn test_sort_timeline() {
        let mut events = vec![
            entry(MatchEvent::new("c").with_clock(30.0), 0),
            entry(MatchEvent::new("a").with_ordinal(2), 1),
            entry(MatchEvent::new("z"), 2),
            entry(MatchEvent::new("b").with_created_at("2024-01-01T00:00:00Z"), 3),
            entry(MatchEvent::new("first").with_ordinal(1), 4),
        ];
        sort_timeline(&mut events);
        let order: Vec<&str> = events.iter().map(|e| e.event_type()).collect();
        assert_eq!(order, vec!["first", "a", "b", "c", "z"]);
    }
}
