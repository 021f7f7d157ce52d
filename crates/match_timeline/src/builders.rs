//! # Composite Event Builders
//!
//! One finished correlation group becomes exactly one timeline event.
//!
//! ## Substitutions
//! `substitution` with `playersOff` / `playersOn` (and the parallel name
//! lists when any name resolved). The first member's payload is the base.
//!
//! ## Position and goalkeeper groups
//! ```text
//! goalie exit present, or any switch from/to the goalie position
//!     → goalie_switch          (old/new goalie ids, names, positions)
//! goalie enter only, no exit, no position switches at all
//!     → goalie_enters          (enter payload + goalieId / goalieName)
//! otherwise
//!     → position_switch_group  (positionChanges)
//! ```
//! The plain-assignment rule is deliberately narrow: an enter event next
//! to unrelated position switches yields a `position_switch_group`.

use serde_json::{json, Value};
use tracing::trace;

use crate::config::TimelineConfig;
use crate::grouping::{GroupTiming, PositionSwitchGroup, SubstitutionGroup};
use crate::models::event_types;
use crate::models::payload::{id_field, str_field};
use crate::models::{EventData, MatchEvent, PlayerId, TimelineEvent};
use crate::names::{primary_name, NameMap};

const OLD_POSITION_KEYS: &[&str] =
    &["old_position", "oldPosition", "from_position", "fromPosition"];
const NEW_POSITION_KEYS: &[&str] = &["new_position", "newPosition", "to_position", "toPosition"];
const PREVIOUS_POSITION_KEYS: &[&str] =
    &["previous_position", "previousPosition", "old_position", "oldPosition"];
const GOALIE_ID_KEYS: &[&str] = &["goalie_id", "goalieId"];

/// One player's move inside a position group
#[derive(Debug, Clone, PartialEq)]
pub struct PositionChange {
    pub player_id: Option<PlayerId>,
    pub player_name: Option<String>,
    pub old_position: Option<String>,
    pub new_position: Option<String>,
}

impl PositionChange {
    fn from_event(event: &MatchEvent, names: &NameMap) -> Self {
        let data = &event.data;
        Self {
            player_id: event.player_id.clone(),
            player_name: resolve_name(event, names),
            old_position: str_field(data, OLD_POSITION_KEYS).map(str::to_string),
            new_position: str_field(data, NEW_POSITION_KEYS).map(str::to_string),
        }
    }

    fn to_value(&self) -> Value {
        json!({
            "playerId": self.player_id,
            "playerName": self.player_name,
            "oldPosition": self.old_position,
            "newPosition": self.new_position,
        })
    }

    fn is_player(&self, id: Option<&str>) -> bool {
        id.is_some() && self.player_id.as_deref() == id
    }
}

/// Merge a substitution group into one `substitution` event
pub fn build_substitution(group: &SubstitutionGroup, config: &TimelineConfig) -> TimelineEvent {
    let mut data = group.base_data.clone();
    data.insert("playersOff".to_string(), json!(group.players_off));
    data.insert("playersOn".to_string(), json!(group.players_on));
    if !group.players_off_names.is_empty() {
        data.insert("playersOffNames".to_string(), json!(group.players_off_names));
    }
    if !group.players_on_names.is_empty() {
        data.insert("playersOnNames".to_string(), json!(group.players_on_names));
    }

    let player_id = group.players_on.first().or_else(|| group.players_off.first()).cloned();
    trace!(
        correlation_id = %group.correlation_id,
        on = group.players_on.len(),
        off = group.players_off.len(),
        "substitution group finalized"
    );

    composite(
        event_types::SUBSTITUTION,
        config.substitution_id(&group.correlation_id),
        &group.correlation_id,
        &group.timing,
        player_id,
        data,
        group.first_index(),
    )
}

/// Merge a position / goalkeeper group into one event
pub fn build_position_group(
    group: &PositionSwitchGroup,
    names: &NameMap,
    config: &TimelineConfig,
) -> TimelineEvent {
    let mut changes = Vec::new();
    let mut enter: Option<&MatchEvent> = None;
    let mut exit: Option<&MatchEvent> = None;

    for member in &group.members {
        match member.event_type.as_str() {
            event_types::GOALIE_ENTERS if enter.is_none() => enter = Some(member),
            event_types::GOALIE_EXITS if exit.is_none() => exit = Some(member),
            // Repeated enter/exit rows add nothing
            event_types::GOALIE_ENTERS | event_types::GOALIE_EXITS => {}
            _ => changes.push(PositionChange::from_event(member, names)),
        }
    }

    let is_goalie = |position: &Option<String>| {
        position.as_deref().is_some_and(|p| config.is_goalie_position(p))
    };
    let old_goalie_entry = changes.iter().find(|c| is_goalie(&c.old_position));
    let new_goalie_entry = changes.iter().find(|c| is_goalie(&c.new_position));

    let (event_type, player_id, data) =
        if exit.is_some() || old_goalie_entry.is_some() || new_goalie_entry.is_some() {
            let (player_id, data) = goalie_switch_data(
                &changes,
                enter,
                exit,
                old_goalie_entry,
                new_goalie_entry,
                names,
            );
            (event_types::GOALIE_SWITCH, player_id, data)
        } else if let (Some(enter), true) = (enter, changes.is_empty()) {
            let (player_id, data) = goalie_enter_data(enter, names);
            (event_types::GOALIE_ENTERS, player_id, data)
        } else {
            let mut data = EventData::new();
            data.insert("positionChanges".to_string(), changes_value(&changes));
            (event_types::POSITION_SWITCH_GROUP, None, data)
        };

    trace!(
        correlation_id = %group.correlation_id,
        members = group.members.len(),
        event_type,
        "position group finalized"
    );

    composite(
        event_type,
        config.position_id(&group.correlation_id),
        &group.correlation_id,
        &group.timing,
        player_id,
        data,
        group.first_index(),
    )
}

fn goalie_switch_data(
    changes: &[PositionChange],
    enter: Option<&MatchEvent>,
    exit: Option<&MatchEvent>,
    old_goalie_entry: Option<&PositionChange>,
    new_goalie_entry: Option<&PositionChange>,
    names: &NameMap,
) -> (Option<PlayerId>, EventData) {
    let old_goalie_id = exit
        .and_then(goalie_of)
        .or_else(|| old_goalie_entry.and_then(|c| c.player_id.clone()));
    let new_goalie_id = enter
        .and_then(goalie_of)
        .or_else(|| new_goalie_entry.and_then(|c| c.player_id.clone()));

    let old_goalie_name = exit
        .and_then(|e| primary_name(&e.data).map(str::to_string))
        .or_else(|| old_goalie_entry.and_then(|c| c.player_name.clone()))
        .or_else(|| lookup(names, old_goalie_id.as_deref()));
    let new_goalie_name = enter
        .and_then(|e| primary_name(&e.data).map(str::to_string))
        .or_else(|| new_goalie_entry.and_then(|c| c.player_name.clone()))
        .or_else(|| lookup(names, new_goalie_id.as_deref()));

    // Where the outgoing goalie went, and where the incoming one came from
    let old_goalie_move =
        old_goalie_entry.or_else(|| changes.iter().find(|c| c.is_player(old_goalie_id.as_deref())));
    let new_goalie_move =
        new_goalie_entry.or_else(|| changes.iter().find(|c| c.is_player(new_goalie_id.as_deref())));
    let old_goalie_new_position = old_goalie_move
        .and_then(|c| c.new_position.clone())
        .or_else(|| exit.and_then(|e| str_field(&e.data, NEW_POSITION_KEYS).map(str::to_string)));
    let new_goalie_previous_position = new_goalie_move
        .and_then(|c| c.old_position.clone())
        .or_else(|| {
            enter.and_then(|e| str_field(&e.data, PREVIOUS_POSITION_KEYS).map(str::to_string))
        });

    let mut data = EventData::new();
    insert_opt(&mut data, "oldGoalieId", &old_goalie_id);
    insert_opt(&mut data, "newGoalieId", &new_goalie_id);
    insert_opt(&mut data, "oldGoalieName", &old_goalie_name);
    insert_opt(&mut data, "newGoalieName", &new_goalie_name);
    insert_opt(&mut data, "oldGoalieNewPosition", &old_goalie_new_position);
    insert_opt(&mut data, "newGoaliePreviousPosition", &new_goalie_previous_position);
    if !changes.is_empty() {
        data.insert("positionChanges".to_string(), changes_value(changes));
    }

    (new_goalie_id.or(old_goalie_id), data)
}

fn goalie_enter_data(enter: &MatchEvent, names: &NameMap) -> (Option<PlayerId>, EventData) {
    let goalie_id = goalie_of(enter);
    let goalie_name = primary_name(&enter.data)
        .map(str::to_string)
        .or_else(|| lookup(names, goalie_id.as_deref()));

    let mut data = enter.data.clone();
    insert_opt(&mut data, "goalieId", &goalie_id);
    insert_opt(&mut data, "goalieName", &goalie_name);
    (goalie_id, data)
}

/// Goalie on an enter/exit record: the event's player, else the payload id
fn goalie_of(event: &MatchEvent) -> Option<PlayerId> {
    event.player_id.clone().or_else(|| id_field(&event.data, GOALIE_ID_KEYS))
}

fn composite(
    event_type: &str,
    id: String,
    correlation_id: &str,
    timing: &GroupTiming,
    player_id: Option<PlayerId>,
    data: EventData,
    source_index: usize,
) -> TimelineEvent {
    let event = MatchEvent {
        id: Some(id),
        event_type: event_type.to_string(),
        player_id,
        correlation_id: Some(correlation_id.to_string()),
        created_at: timing.created_at.clone(),
        occurred_at_seconds: timing.occurred_at_seconds,
        ordinal: timing.ordinal,
        period: timing.period.clone(),
        data,
    };
    TimelineEvent::new(event, source_index)
}

fn resolve_name(event: &MatchEvent, names: &NameMap) -> Option<String> {
    primary_name(&event.data)
        .map(str::to_string)
        .or_else(|| lookup(names, event.player_id.as_deref()))
}

fn lookup(names: &NameMap, id: Option<&str>) -> Option<String> {
    id.and_then(|id| names.get(id)).map(str::to_string)
}

fn changes_value(changes: &[PositionChange]) -> Value {
    Value::Array(changes.iter().map(PositionChange::to_value).collect())
}

fn insert_opt(data: &mut EventData, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        data.insert(key.to_string(), Value::String(value.clone()));
    }
}
