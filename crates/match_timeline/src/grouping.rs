//! # Correlation Grouper
//!
//! Splits a raw event log into pass-through events and correlation
//! groups. Raw rows that share a correlation id describe one logical
//! action:
//!
//! - `substitution_in` / `substitution_out` → [`SubstitutionGroup`]
//! - `position_switch` / `goalie_enters` / `goalie_exits` → [`PositionSwitchGroup`]
//!
//! Everything else (no correlation id, or a type outside both families)
//! passes straight through, tagged with its input position.
//!
//! Groups report the earliest timing seen across their members, not the
//! timing of whichever row happened to arrive last.

use std::collections::HashMap;

use crate::models::event_types;
use crate::models::{EventData, MatchEvent, Period, PlayerId, TimelineEvent};
use crate::names::{primary_name, NameMap};
use crate::ordering::parse_timestamp;

/// Earliest-known timing across a group's members
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupTiming {
    pub created_at: Option<String>,
    pub occurred_at_seconds: Option<f64>,
    pub ordinal: Option<i64>,
    pub period: Option<Period>,
}

impl GroupTiming {
    pub fn absorb(&mut self, event: &MatchEvent) {
        if let Some(candidate) = event.created_at.as_deref() {
            self.absorb_created_at(candidate);
        }
        if let Some(seconds) = event.occurred_at_seconds.filter(|s| !s.is_nan()) {
            self.occurred_at_seconds =
                Some(self.occurred_at_seconds.map_or(seconds, |cur| cur.min(seconds)));
        }
        if let Some(ordinal) = event.ordinal {
            self.ordinal = Some(self.ordinal.map_or(ordinal, |cur| cur.min(ordinal)));
        }
        if self.period.is_none() {
            self.period = event.period.clone();
        }
    }

    // A parseable timestamp replaces an unparseable one; two unparseable
    // values keep the first.
    fn absorb_created_at(&mut self, candidate: &str) {
        let replace = match self.created_at.as_deref() {
            None => true,
            Some(current) => match (parse_timestamp(current), parse_timestamp(candidate)) {
                (Some(cur), Some(new)) => new < cur,
                (None, Some(_)) => true,
                _ => false,
            },
        };
        if replace {
            self.created_at = Some(candidate.to_string());
        }
    }
}

/// Substitution rows merged under one correlation id
#[derive(Debug, Clone, Default)]
pub struct SubstitutionGroup {
    pub correlation_id: String,
    pub players_on: Vec<PlayerId>,
    pub players_off: Vec<PlayerId>,
    pub players_on_names: Vec<String>,
    pub players_off_names: Vec<String>,
    pub timing: GroupTiming,
    /// Payload of the first member
    pub base_data: EventData,
    /// Input positions of the members, ascending
    pub source_indices: Vec<usize>,
}

impl SubstitutionGroup {
    fn new(correlation_id: &str) -> Self {
        Self { correlation_id: correlation_id.to_string(), ..Default::default() }
    }

    fn push(&mut self, index: usize, event: &MatchEvent, names: &NameMap) {
        if self.source_indices.is_empty() {
            self.base_data = event.data.clone();
        }
        self.source_indices.push(index);
        self.timing.absorb(event);

        let Some(player_id) = event.player_id.as_deref() else { return };
        let (ids, id_names) = if event.event_type == event_types::SUBSTITUTION_IN {
            (&mut self.players_on, &mut self.players_on_names)
        } else {
            (&mut self.players_off, &mut self.players_off_names)
        };
        if ids.iter().any(|id| id == player_id) {
            return;
        }
        ids.push(player_id.to_string());
        if let Some(name) = primary_name(&event.data).or_else(|| names.get(player_id)) {
            id_names.push(name.to_string());
        }
    }

    pub fn first_index(&self) -> usize {
        self.source_indices.first().copied().unwrap_or_default()
    }
}

/// Position / goalkeeper rows merged under one correlation id
#[derive(Debug, Clone, Default)]
pub struct PositionSwitchGroup {
    pub correlation_id: String,
    /// Member events in arrival order
    pub members: Vec<MatchEvent>,
    pub timing: GroupTiming,
    pub source_indices: Vec<usize>,
}

impl PositionSwitchGroup {
    fn new(correlation_id: &str) -> Self {
        Self { correlation_id: correlation_id.to_string(), ..Default::default() }
    }

    fn push(&mut self, index: usize, event: &MatchEvent) {
        self.source_indices.push(index);
        self.timing.absorb(event);
        self.members.push(event.clone());
    }

    pub fn first_index(&self) -> usize {
        self.source_indices.first().copied().unwrap_or_default()
    }
}

/// Correlation id → group, kept in first-seen order
#[derive(Debug)]
struct GroupArena<G> {
    index: HashMap<String, usize>,
    groups: Vec<G>,
}

impl<G> GroupArena<G> {
    fn new() -> Self {
        Self { index: HashMap::new(), groups: Vec::new() }
    }

    fn entry(&mut self, correlation_id: &str, create: impl FnOnce(&str) -> G) -> &mut G {
        let slot = match self.index.get(correlation_id).copied() {
            Some(slot) => slot,
            None => {
                self.groups.push(create(correlation_id));
                self.index.insert(correlation_id.to_string(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        &mut self.groups[slot]
    }

    fn into_groups(self) -> Vec<G> {
        self.groups
    }
}

/// Result of one grouping pass
#[derive(Debug, Default)]
pub struct GroupedEvents {
    pub passthrough: Vec<TimelineEvent>,
    pub substitutions: Vec<SubstitutionGroup>,
    pub position_switches: Vec<PositionSwitchGroup>,
}

/// Partition `events` in a single pass
pub fn group_events(events: &[MatchEvent], names: &NameMap) -> GroupedEvents {
    let mut substitutions = GroupArena::new();
    let mut position_switches = GroupArena::new();
    let mut passthrough = Vec::new();

    for (index, event) in events.iter().enumerate() {
        match event.correlation_key() {
            Some(cid) if event_types::is_substitution_part(&event.event_type) => {
                substitutions.entry(cid, SubstitutionGroup::new).push(index, event, names);
            }
            Some(cid) if event_types::is_position_part(&event.event_type) => {
                position_switches.entry(cid, PositionSwitchGroup::new).push(index, event);
            }
            _ => passthrough.push(TimelineEvent::new(event.clone(), index)),
        }
    }

    GroupedEvents {
        passthrough,
        substitutions: substitutions.into_groups(),
        position_switches: position_switches.into_groups(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition() {
        let events = vec![
            MatchEvent::new("match_started").with_ordinal(1),
            MatchEvent::new("substitution_in").with_correlation("c1").with_player("p1"),
            MatchEvent::new("substitution_out").with_correlation("c1").with_player("p2"),
            MatchEvent::new("position_switch").with_correlation("c2").with_player("p3"),
            MatchEvent::new("goal").with_correlation("c1").with_player("p4"),
            MatchEvent::new("substitution_in").with_player("p5"),
        ];
        let grouped = group_events(&events, &NameMap::new());

        assert_eq!(grouped.substitutions.len(), 1);
        assert_eq!(grouped.position_switches.len(), 1);
        let passthrough: Vec<usize> = grouped.passthrough.iter().map(|e| e.source_index).collect();
        assert_eq!(passthrough, vec![0, 4, 5]);

        let sub = &grouped.substitutions[0];
        assert_eq!(sub.players_on, vec!["p1"]);
        assert_eq!(sub.players_off, vec!["p2"]);
        assert_eq!(sub.source_indices, vec![1, 2]);
    }

    #[test]
    fn test_duplicate_player_suppressed() {
        let events = vec![
            MatchEvent::new("substitution_in")
                .with_correlation("c1")
                .with_player("p1")
                .with_data("player_name", "Ana"),
            MatchEvent::new("substitution_in")
                .with_correlation("c1")
                .with_player("p1")
                .with_data("player_name", "Ana"),
        ];
        let grouped = group_events(&events, &NameMap::new());
        let sub = &grouped.substitutions[0];
        assert_eq!(sub.players_on.len(), 1);
        assert_eq!(sub.players_on_names, vec!["Ana"]);
    }

    #[test]
    fn test_names_fall_back_to_index() {
        let mut names = NameMap::new();
        names.insert_if_absent("p2", "Bo");
        let events = vec![
            MatchEvent::new("substitution_out").with_correlation("c1").with_player("p2"),
            MatchEvent::new("substitution_in").with_correlation("c1").with_player("p9"),
        ];
        let sub = &group_events(&events, &names).substitutions[0];
        assert_eq!(sub.players_off_names, vec!["Bo"]);
        assert!(sub.players_on_names.is_empty());
    }

    #[test]
    fn test_earliest_timing_kept() {
        let events = vec![
            MatchEvent::new("substitution_in")
                .with_correlation("c1")
                .with_ordinal(7)
                .with_clock(610.0)
                .with_created_at("2024-01-01T10:00:09Z"),
            MatchEvent::new("substitution_out")
                .with_correlation("c1")
                .with_ordinal(6)
                .with_clock(600.0)
                .with_created_at("2024-01-01T10:00:02Z")
                .with_period(Period::Number(2)),
            MatchEvent::new("substitution_out")
                .with_correlation("c1")
                .with_ordinal(8)
                .with_period(Period::Number(3)),
        ];
        let timing = &group_events(&events, &NameMap::new()).substitutions[0].timing;
        assert_eq!(timing.ordinal, Some(6));
        assert_eq!(timing.occurred_at_seconds, Some(600.0));
        assert_eq!(timing.created_at.as_deref(), Some("2024-01-01T10:00:02Z"));
        assert_eq!(timing.period, Some(Period::Number(2)));
    }

    #[test]
    fn test_parseable_created_at_replaces_garbage() {
        let mut timing = GroupTiming::default();
        timing.absorb(&MatchEvent::new("x").with_created_at("garbage"));
        timing.absorb(&MatchEvent::new("x").with_created_at("more garbage"));
        assert_eq!(timing.created_at.as_deref(), Some("garbage"));
        timing.absorb(&MatchEvent::new("x").with_created_at("2024-01-01T00:00:00Z"));
        assert_eq!(timing.created_at.as_deref(), Some("2024-01-01T00:00:00Z"));
        timing.absorb(&MatchEvent::new("x").with_created_at("garbage again"));
        assert_eq!(timing.created_at.as_deref(), Some("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn test_position_group_keeps_arrival_order() {
        let events = vec![
            MatchEvent::new("goalie_exits").with_correlation("k").with_player("g1"),
            MatchEvent::new("position_switch").with_correlation("k").with_player("p1"),
            MatchEvent::new("goalie_enters").with_correlation("k").with_player("g2"),
        ];
        let group = &group_events(&events, &NameMap::new()).position_switches[0];
        let order: Vec<&str> = group.members.iter().map(|e| e.event_type.as_str()).collect();
        assert_eq!(order, vec!["goalie_exits", "position_switch", "goalie_enters"]);
        assert_eq!(group.first_index(), 0);
    }

    #[test]
    fn test_groups_in_first_seen_order() {
        let events = vec![
            MatchEvent::new("substitution_in").with_correlation("z"),
            MatchEvent::new("substitution_in").with_correlation("a"),
            MatchEvent::new("substitution_out").with_correlation("z"),
        ];
        let grouped = group_events(&events, &NameMap::new());
        let ids: Vec<&str> =
            grouped.substitutions.iter().map(|g| g.correlation_id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a"]);
    }

    #[test]
    fn test_blank_correlation_passes_through() {
        let events = vec![
            MatchEvent::new("substitution_in").with_correlation(" ").with_player("p1"),
            MatchEvent::new("goalie_enters").with_correlation("").with_player("g1"),
        ];
        let grouped = group_events(&events, &NameMap::new());

        assert!(grouped.substitutions.is_empty());
        assert!(grouped.position_switches.is_empty());
        assert_eq!(grouped.passthrough.len(), 2);
    }
}
