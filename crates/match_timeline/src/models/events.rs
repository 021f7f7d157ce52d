use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::payload::id_from_value;

/// Player identifier, normalized to text (storage may hand out integers)
pub type PlayerId = String;

/// Open payload; its keys depend on `event_type`
pub type EventData = Map<String, Value>;

/// Storage-level event type tags
pub mod event_types {
    pub const MATCH_STARTED: &str = "match_started";
    pub const MATCH_ENDED: &str = "match_ended";
    pub const PERIOD_STARTED: &str = "period_started";
    pub const PERIOD_ENDED: &str = "period_ended";
    pub const GOAL: &str = "goal";
    pub const SUBSTITUTION_IN: &str = "substitution_in";
    pub const SUBSTITUTION_OUT: &str = "substitution_out";
    pub const POSITION_SWITCH: &str = "position_switch";
    pub const GOALIE_ENTERS: &str = "goalie_enters";
    pub const GOALIE_EXITS: &str = "goalie_exits";
    pub const PLAYER_ACTIVATED: &str = "player_activated";
    pub const PLAYER_REACTIVATED: &str = "player_reactivated";

    // Composite types synthesized by the engine
    pub const SUBSTITUTION: &str = "substitution";
    pub const GOALIE_SWITCH: &str = "goalie_switch";
    pub const POSITION_SWITCH_GROUP: &str = "position_switch_group";

    pub fn is_substitution_part(tag: &str) -> bool {
        tag == SUBSTITUTION_IN || tag == SUBSTITUTION_OUT
    }

    pub fn is_position_part(tag: &str) -> bool {
        tag == POSITION_SWITCH || tag == GOALIE_ENTERS || tag == GOALIE_EXITS
    }
}

/// Match period: numbered (1, 2, ...) or labelled ("extra_time")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Period {
    Number(i64),
    Label(String),
}

/// One event log record.
///
/// Raw records and engine-synthesized composites share this shape so
/// downstream consumers never need to tell them apart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct MatchEvent {
    #[serde(default, deserialize_with = "de_opt_id", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de_tag")]
    #[schemars(with = "String")]
    pub event_type: String,
    #[serde(default, deserialize_with = "de_opt_id", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub player_id: Option<PlayerId>,
    #[serde(default, deserialize_with = "de_opt_id", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub correlation_id: Option<String>,
    /// ISO-8601 text, kept verbatim
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub created_at: Option<String>,
    /// In-match clock (seconds)
    #[serde(default, deserialize_with = "de_opt_f64", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub occurred_at_seconds: Option<f64>,
    /// Write-time sequence number
    #[serde(default, deserialize_with = "de_opt_i64", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<i64>")]
    pub ordinal: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_period", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<Period>")]
    pub period: Option<Period>,
    #[serde(default, deserialize_with = "de_data")]
    #[schemars(with = "EventData")]
    pub data: EventData,
}

impl MatchEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self { event_type: event_type.into(), ..Default::default() }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_player(mut self, player_id: impl Into<PlayerId>) -> Self {
        self.player_id = Some(player_id.into());
        self
    }

    pub fn with_correlation(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    pub fn with_clock(mut self, seconds: f64) -> Self {
        self.occurred_at_seconds = Some(seconds);
        self
    }

    pub fn with_ordinal(mut self, ordinal: i64) -> Self {
        self.ordinal = Some(ordinal);
        self
    }

    pub fn with_period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    /// Set one payload field
    pub fn with_data(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    /// Correlation id, ignoring blank strings
    pub fn correlation_key(&self) -> Option<&str> {
        self.correlation_id.as_deref().filter(|cid| !cid.trim().is_empty())
    }
}

/// A consolidated timeline entry.
///
/// `source_index` is the smallest input position among the raw events
/// that produced this entry. It only breaks ordering ties and is not
/// serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    #[serde(flatten)]
    pub event: MatchEvent,
    #[serde(skip)]
    pub source_index: usize,
}

impl TimelineEvent {
    pub fn new(event: MatchEvent, source_index: usize) -> Self {
        Self { event, source_index }
    }

    pub fn event_type(&self) -> &str {
        &self.event.event_type
    }

    pub fn into_event(self) -> MatchEvent {
        self.event
    }
}

// ============================================================================
// Lenient field decoding
// ============================================================================
//
// A wrongly-typed scalar degrades to absent instead of rejecting the log.

fn de_tag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        _ => String::new(),
    })
}

fn de_opt_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn de_opt_period<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Period>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => whole_number(&n).map(Period::Number),
        Some(Value::String(s)) => Some(Period::Label(s)),
        _ => None,
    })
}

/// Integral JSON number as i64; fractions and out-of-range values are absent
fn whole_number(n: &serde_json::Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn de_opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(id_from_value))
}

fn de_opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite()))
}

fn de_opt_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => whole_number(&n),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

// `data: null` and non-object payloads decode as an empty payload
fn de_data<'de, D: Deserializer<'de>>(deserializer: D) -> Result<EventData, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Object(map)) => map,
        _ => EventData::new(),
    })
}
