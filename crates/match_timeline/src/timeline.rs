//! # Timeline Consolidation
//!
//! ```text
//! raw events ─┬─► group_events ─► pass-through ───────────────┐
//!             │                 ─► substitution groups ─► build ├─► sort ─► timeline
//!             │                 ─► position groups ─────► build ┘
//!             └─► NameMap (read-only, feeds grouping and builders)
//! ```
//!
//! Every call owns its working state; nothing survives between calls.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::builders::{build_position_group, build_substitution};
use crate::config::TimelineConfig;
use crate::grouping::group_events;
use crate::models::{MatchEvent, TimelineEvent};
use crate::names::NameMap;
use crate::ordering::sort_timeline;

/// Batches above this size are consolidated in parallel
const PARALLEL_BATCH_THRESHOLD: usize = 8;

/// Counts from one consolidation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineSummary {
    pub input_events: usize,
    pub passthrough_events: usize,
    pub substitution_groups: usize,
    pub position_groups: usize,
    pub output_events: usize,
}

/// Consolidate an event log with the default configuration.
///
/// When `names` is `None` the index is derived from `events`.
pub fn consolidate(events: &[MatchEvent], names: Option<&NameMap>) -> Vec<TimelineEvent> {
    consolidate_with_summary(events, names, &TimelineConfig::default()).0
}

pub fn consolidate_with_config(
    events: &[MatchEvent],
    names: Option<&NameMap>,
    config: &TimelineConfig,
) -> Vec<TimelineEvent> {
    consolidate_with_summary(events, names, config).0
}

pub fn consolidate_with_summary(
    events: &[MatchEvent],
    names: Option<&NameMap>,
    config: &TimelineConfig,
) -> (Vec<TimelineEvent>, TimelineSummary) {
    let derived;
    let names = match names {
        Some(names) => names,
        None => {
            derived = NameMap::from_events(events);
            &derived
        }
    };

    let grouped = group_events(events, names);
    let mut summary = TimelineSummary {
        input_events: events.len(),
        passthrough_events: grouped.passthrough.len(),
        substitution_groups: grouped.substitutions.len(),
        position_groups: grouped.position_switches.len(),
        output_events: 0,
    };

    let mut timeline = grouped.passthrough;
    timeline.reserve(summary.substitution_groups + summary.position_groups);
    timeline.extend(grouped.substitutions.iter().map(|group| build_substitution(group, config)));
    timeline.extend(
        grouped
            .position_switches
            .iter()
            .map(|group| build_position_group(group, names, config)),
    );
    sort_timeline(&mut timeline);

    summary.output_events = timeline.len();
    debug!(
        input = summary.input_events,
        passthrough = summary.passthrough_events,
        substitutions = summary.substitution_groups,
        position_groups = summary.position_groups,
        output = summary.output_events,
        named_players = names.len(),
        "timeline consolidated"
    );

    (timeline, summary)
}

/// Consolidate several independent match logs
pub fn consolidate_batch(
    matches: &[Vec<MatchEvent>],
    config: &TimelineConfig,
) -> Vec<Vec<TimelineEvent>> {
    if matches.len() > PARALLEL_BATCH_THRESHOLD {
        matches
            .par_iter()
            .map(|events| consolidate_with_config(events, None, config))
            .collect()
    } else {
        matches
            .iter()
            .map(|events| consolidate_with_config(events, None, config))
            .collect()
    }
}
