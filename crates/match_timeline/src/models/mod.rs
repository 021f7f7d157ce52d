pub mod events;
pub mod payload;

pub use events::{event_types, EventData, MatchEvent, Period, PlayerId, TimelineEvent};
