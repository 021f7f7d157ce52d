//! # match_timeline - Match Event Consolidation Engine
//!
//! Turns a raw match event log into a chronological, UI-ready timeline.
//!
//! ## Features
//! - Correlated raw records (substitution in/out, position and goalkeeper
//!   switches) merged into one composite event per correlation id
//! - Deterministic total ordering (ordinal, timestamp, match clock, input position)
//! - Player name resolution from whatever payload hints the log carries
//! - JSON API for service and CLI integration
//!
//! ```rust
//! use match_timeline::{consolidate, MatchEvent};
//!
//! let events = vec![
//!     MatchEvent::new("substitution_in")
//!         .with_correlation("c1")
//!         .with_player("p1")
//!         .with_ordinal(2),
//!     MatchEvent::new("substitution_out")
//!         .with_correlation("c1")
//!         .with_player("p2")
//!         .with_ordinal(1),
//! ];
//! let timeline = consolidate(&events, None);
//! assert_eq!(timeline.len(), 1);
//! assert_eq!(timeline[0].event.event_type, "substitution");
//! ```

pub mod api;
pub mod builders;
pub mod config;
pub mod error;
pub mod grouping;
pub mod models;
pub mod names;
pub mod ordering;
pub mod timeline;
pub mod ui_types;

pub use api::{
    consolidate_json, consolidate_json_with_config, event_log_schema, parse_event_log, EventLog,
};
pub use config::TimelineConfig;
pub use error::{Result, TimelineError};
pub use models::{event_types, EventData, MatchEvent, Period, PlayerId, TimelineEvent};
pub use names::NameMap;
pub use ordering::{compare_events, compare_timeline, parse_timestamp, sort_timeline};
pub use timeline::{
    consolidate, consolidate_batch, consolidate_with_config, consolidate_with_summary,
    TimelineSummary,
};
pub use ui_types::{apply_ui_event_types, to_ui_event_type};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
