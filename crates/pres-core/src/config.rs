//! Scheduling configuration and its validation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{PeriodId, RoomId};

/// Upper bound on the number of variants generated in one run.
pub const MAX_SCHEDULES: u32 = 100;

/// Configuration validation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("number of schedules must be between 1 and {MAX_SCHEDULES}, got {0}")]
    ScheduleCount(u32),

    #[error("at least one period must be configured")]
    NoPeriods,

    #[error("at least one room must be configured")]
    NoRooms,

    #[error("period {0} is listed more than once")]
    DuplicatePeriod(PeriodId),

    #[error("room {0} is listed more than once")]
    DuplicateRoom(RoomId),

    #[error("number of days must be at least 1")]
    NoDays,

    #[error("coverage threshold must be a percentage between 0 and 100, got {0}")]
    Threshold(u8),

    #[error("manual assignment names unknown room {0}")]
    UnknownRoom(RoomId),
}

/// Inputs that shape every variant of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// How many independent variants to generate.
    pub number_of_schedules: u32,

    /// Periods in schedule order.
    pub periods: Vec<PeriodId>,

    /// Rooms in preference order; also the spillover and tie-break order.
    pub rooms: Vec<RoomId>,

    /// Maximum number of presentation dates to select.
    pub number_of_days: u32,

    /// Percentage of participants that must be available on a date for it
    /// to be preferred over frequency ranking.
    pub coverage_threshold: u8,

    /// Shuffle topics before round-robin room assignment.
    pub shuffle_topics: bool,

    /// Base seed for topic shuffling. Variant `n` uses `seed + n - 1`.
    pub seed: Option<u64>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            number_of_schedules: 1,
            periods: default_periods(),
            rooms: Vec::new(),
            number_of_days: 1,
            coverage_threshold: 100,
            shuffle_topics: false,
            seed: None,
        }
    }
}

/// Periods 2 through 6, the usual school-day presentation window.
pub fn default_periods() -> Vec<PeriodId> {
    (2..=6)
        .filter_map(|p: u32| PeriodId::new(p.to_string()).ok())
        .collect()
}

impl ScheduleConfig {
    /// Checks ranges and uniqueness of every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_SCHEDULES).contains(&self.number_of_schedules) {
            return Err(ConfigError::ScheduleCount(self.number_of_schedules));
        }
        if self.periods.is_empty() {
            return Err(ConfigError::NoPeriods);
        }
        if self.rooms.is_empty() {
            return Err(ConfigError::NoRooms);
        }
        if self.number_of_days == 0 {
            return Err(ConfigError::NoDays);
        }
        if self.coverage_threshold > 100 {
            return Err(ConfigError::Threshold(self.coverage_threshold));
        }

        let mut seen = HashSet::new();
        for period in &self.periods {
            if !seen.insert(period.as_str()) {
                return Err(ConfigError::DuplicatePeriod(period.clone()));
            }
        }

        let mut seen = HashSet::new();
        for room in &self.rooms {
            if !seen.insert(room.as_str()) {
                return Err(ConfigError::DuplicateRoom(room.clone()));
            }
        }

        Ok(())
    }
}
