//! JSON entry points for services and the CLI.
//!
//! Accepted request shapes:
//!
//! ```text
//! [ {event}, ... ]                                    bare event array
//! { "events": [...], "player_names": { id: name } }   envelope with name hints
//! null                                                treated as no events
//! ```
//!
//! Supplied `player_names` take precedence; names found in the events fill
//! the remaining gaps.

use schemars::schema::RootSchema;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::config::TimelineConfig;
use crate::error::Result;
use crate::models::{MatchEvent, PlayerId};
use crate::names::NameMap;
use crate::timeline::consolidate_with_config;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EventLogRequest {
    Events(Vec<MatchEvent>),
    Envelope(EventLogEnvelope),
}

#[derive(Debug, Default, Deserialize)]
struct EventLogEnvelope {
    #[serde(default)]
    events: Option<Vec<MatchEvent>>,
    #[serde(default, alias = "playerNames")]
    player_names: Option<BTreeMap<PlayerId, String>>,
}

/// A decoded event log with its resolved name index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    pub events: Vec<MatchEvent>,
    pub names: NameMap,
}

/// Decode a request body into events plus a name index
pub fn parse_event_log(input: &str) -> Result<EventLog> {
    let request: Option<EventLogRequest> = serde_json::from_str(input)?;
    let (events, supplied) = match request {
        None => (Vec::new(), None),
        Some(EventLogRequest::Events(events)) => (events, None),
        Some(EventLogRequest::Envelope(envelope)) => {
            (envelope.events.unwrap_or_default(), envelope.player_names)
        }
    };

    let mut names: NameMap = supplied.unwrap_or_default().into_iter().collect();
    names.extend_from_events(&events);
    Ok(EventLog { events, names })
}

/// Consolidate a JSON event log; returns the timeline as a JSON array
pub fn consolidate_json(input: &str) -> Result<String> {
    consolidate_json_with_config(input, &TimelineConfig::default())
}

pub fn consolidate_json_with_config(input: &str, config: &TimelineConfig) -> Result<String> {
    let log = parse_event_log(input)?;
    let timeline = consolidate_with_config(&log.events, Some(&log.names), config);
    Ok(serde_json::to_string(&timeline)?)
}

/// JSON Schema of one event log record
pub fn event_log_schema() -> RootSchema {
    schemars::schema_for!(MatchEvent)
}
