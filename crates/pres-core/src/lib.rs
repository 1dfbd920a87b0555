//! Core scheduling logic for student presentations.
//!
//! This crate contains the fundamental types and logic for:
//! - Calendar: choosing presentation dates and expanding them into slots
//! - Topics: grouping participants and assigning topics to rooms
//! - Placement: seating participants two to a (room, slot) cell
//! - Schedules: generating independent variants and exporting them as CSV

pub mod assignment;
pub mod calendar;
pub mod config;
pub mod error;
pub mod export;
pub mod placement;
pub mod schedule;
pub mod topic;
pub mod types;

/// Participants sharing one (room, date, period) cell.
pub const SEATS_PER_CELL: usize = 2;

pub use assignment::{
    AssignmentChoice, AssignmentPrompt, AssignmentResolver, AutomaticAssignment,
    ManualAssignment, RoomClaims, RoomTopicMap, TopicConflict,
};
pub use calendar::{DateFrequency, SlotCalendar};
pub use config::{ConfigError, MAX_SCHEDULES, ScheduleConfig};
pub use error::ScheduleError;
pub use export::{to_csv, write_csv};
pub use placement::{Diagnostics, PlacementOutcome, VariantStatus, place_participants};
pub use schedule::{ScheduleSet, ScheduleVariant};
pub use topic::{TopicGroup, TopicGroups, TopicKey};
pub use types::{
    Participant, ParticipantId, PeriodId, Placement, RoomId, Slot, ValidationError,
};
