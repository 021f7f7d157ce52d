//! Storage-level event type → UI-level event type.
//!
//! Presentation-facing only; the consolidation pipeline never applies it.
//! Unknown tags map to themselves.

use crate::models::TimelineEvent;

pub fn to_ui_event_type(tag: &str) -> &str {
    match tag {
        "match_started" => "match_start",
        "match_ended" => "match_end",
        "period_started" => "period_start",
        "period_ended" => "period_end",
        "substitution_in" | "substitution_out" | "substitution" => "substitution",
        "goalie_enters" => "goalie_assignment",
        "goalie_exits" | "goalie_switch" => "goalie_switch",
        "position_switch" | "position_switch_group" => "position_change",
        "player_reactivated" | "player_activated" => "player_activated",
        other => other,
    }
}

/// Rewrite `event_type` in place for display
pub fn apply_ui_event_types(events: &mut [TimelineEvent]) {
    for entry in events.iter_mut() {
        let mapped = to_ui_event_type(&entry.event.event_type);
        if mapped != entry.event.event_type {
            entry.event.event_type = mapped.to_string();
        }
    }
}
