//! # Name Resolution Index
//!
//! Builds a player id → display name map by scanning every payload in the
//! event log. Rows carry names in many places (the acting player's own
//! name, substitution lists, goalie hand-overs), so the index collects all
//! of them. The first name seen for an id wins.
//!
//! The index is only an enrichment aid: ids without a name leave the
//! derived name fields empty downstream.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::payload::{id_field, id_list, name_list, str_field};
use crate::models::{EventData, MatchEvent, PlayerId};

/// Payload fields holding the acting player's name, in priority order
const PRIMARY_NAME_KEYS: &[&str] = &[
    "display_name",
    "displayName",
    "player_name",
    "playerName",
    "scorer_name",
    "scorerName",
    "goalie_name",
    "goalieName",
    "previous_goalie_name",
    "previousGoalieName",
];

const NAME_MAP_KEYS: &[&str] = &["player_names", "playerNames"];

/// (id keys, parallel name keys) for list-shaped hints
const LIST_HINTS: &[(&[&str], &[&str])] = &[
    (&["players_off", "playersOff"], &["players_off_names", "playersOffNames"]),
    (&["players_on", "playersOn"], &["players_on_names", "playersOnNames"]),
];

/// (id keys, name keys) for single id/name pairs
const PAIR_HINTS: &[(&[&str], &[&str])] = &[
    (&["source_player_id", "sourcePlayerId"], &["source_player_name", "sourcePlayerName"]),
    (&["target_player_id", "targetPlayerId"], &["target_player_name", "targetPlayerName"]),
    (&["swap_player_id", "swapPlayerId"], &["swap_player_name", "swapPlayerName"]),
    (&["goalie_id", "goalieId"], &["goalie_name", "goalieName"]),
    (
        &["previous_goalie_id", "previousGoalieId"],
        &["previous_goalie_name", "previousGoalieName"],
    ),
];

/// Name of the acting player as written in the payload
pub fn primary_name(data: &EventData) -> Option<&str> {
    str_field(data, PRIMARY_NAME_KEYS)
}

/// Player id → display name, first writer wins
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameMap {
    names: BTreeMap<PlayerId, String>,
}

impl NameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from an event log
    pub fn from_events(events: &[MatchEvent]) -> Self {
        let mut map = Self::new();
        map.extend_from_events(events);
        map
    }

    /// Fold more events in; existing entries are never replaced
    pub fn extend_from_events(&mut self, events: &[MatchEvent]) {
        for event in events {
            self.absorb(event);
        }
    }

    /// Insert unless the id already has a name. Returns whether it was inserted.
    pub fn insert_if_absent(&mut self, id: impl Into<PlayerId>, name: impl Into<String>) -> bool {
        let id = id.into();
        if self.names.contains_key(&id) {
            return false;
        }
        self.names.insert(id, name.into());
        true
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(id, name)| (id.as_str(), name.as_str()))
    }

    fn absorb(&mut self, event: &MatchEvent) {
        let data = &event.data;
        let primary = primary_name(data);

        if let (Some(id), Some(name)) = (event.player_id.as_deref(), primary) {
            self.insert_if_absent(id, name);
        }

        if let Some(hints) = NAME_MAP_KEYS.iter().find_map(|key| data.get(*key)?.as_object()) {
            for (id, name) in hints {
                if let Some(name) = name.as_str().filter(|n| !n.trim().is_empty()) {
                    self.insert_if_absent(id.as_str(), name);
                }
            }
        }

        for (id_keys, name_keys) in LIST_HINTS {
            let names = name_list(data, name_keys);
            for (pos, id) in id_list(data, id_keys).into_iter().enumerate() {
                let Some(id) = id else { continue };
                let name = names.get(pos).cloned().flatten();
                if let Some(name) = name.as_deref().or(primary) {
                    self.insert_if_absent(id, name);
                }
            }
        }

        for (id_keys, name_keys) in PAIR_HINTS {
            if let (Some(id), Some(name)) = (id_field(data, id_keys), str_field(data, name_keys)) {
                self.insert_if_absent(id, name);
            }
        }
    }
}

impl FromIterator<(PlayerId, String)> for NameMap {
    fn from_iter<I: IntoIterator<Item = (PlayerId, String)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (id, name) in iter {
            map.insert_if_absent(id, name);
        }
        map
    }
}
