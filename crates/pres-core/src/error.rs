//! Errors that abort a scheduling run.
//!
//! Anything that only affects individual participants (forced or missing
//! placements, rejected topic claims) is reported through
//! [`Diagnostics`](crate::Diagnostics) instead.

use thiserror::Error;

use crate::config::ConfigError;

/// Fatal scheduling errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Not enough seats for every participant; detected before placement.
    #[error(
        "insufficient capacity: {capacity} seats across the selected dates for {participants} participants"
    )]
    InsufficientCapacity { capacity: usize, participants: usize },

    /// The assignment resolver gave up before placement began.
    #[error("room assignment for schedule {variant} was not completed: {reason}")]
    AssignmentAborted { variant: usize, reason: String },

    /// A manual edit targeted a variant that does not exist.
    #[error("no schedule numbered {0}")]
    UnknownVariant(usize),
}
