//! Core type definitions with validation.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation. Surrounding whitespace is trimmed.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                let trimmed = id.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                if trimmed.len() == id.len() {
                    Ok(Self(id))
                } else {
                    Ok(Self(trimmed.to_string()))
                }
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

define_string_id!(
    /// A validated participant identifier.
    ///
    /// Usually the participant's email address; must be non-empty.
    ParticipantId, "participant ID"
);

define_string_id!(
    /// A validated room identifier.
    RoomId, "room ID"
);

define_string_id!(
    /// A validated period identifier (e.g. "2" for second period).
    ///
    /// `Ord` compares the text lexically ("10" < "9"); schedule order is the
    /// position in the configured period list instead.
    PeriodId, "period ID"
);

/// One schedulable time unit: a (date, period) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub date: NaiveDate,
    pub period: PeriodId,
}

impl Slot {
    pub fn new(date: NaiveDate, period: PeriodId) -> Self {
        Self { date, period }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} period {}", self.date, self.period)
    }
}

/// A validated participant record, as produced by ingestion.
///
/// Participants are never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    /// Display name used in placements and exports.
    pub name: String,
    /// Raw topic text; grouping normalizes it.
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub project_name: String,
    /// Declared availability, in the order it was given.
    #[serde(default)]
    pub availability: Vec<Slot>,
}

/// One participant seated in one (room, slot) cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub participant_id: ParticipantId,
    pub participant_name: String,
    pub topic: String,
    pub project_name: String,
    pub date: NaiveDate,
    pub period: PeriodId,
    pub room: RoomId,
    /// Set when the slot lies outside the participant's declared availability.
    #[serde(default)]
    pub forced: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, day).unwrap()
    }

    #[test]
    fn test_participant_id_rejects_empty() {
        assert!(ParticipantId::new("").is_err());
        assert!(ParticipantId::new("   ").is_err());
        assert!(ParticipantId::new("ada@example.edu").is_ok());
    }

    #[test]
    fn test_room_id_trims_whitespace() {
        let room = RoomId::new("  B-204 ").unwrap();
        assert_eq!(room.as_str(), "B-204");
    }

    #[test]
    fn test_period_id_serde_rejects_empty() {
        let result: Result<PeriodId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_period_id_ord_is_lexical() {
        assert!(PeriodId::new("10").unwrap() < PeriodId::new("9").unwrap());
    }

    #[test]
    fn test_empty_error_names_field() {
        let err = RoomId::new("").unwrap_err();
        assert_eq!(err.to_string(), "room ID cannot be empty");
    }

    #[test]
    fn test_participant_deserializes_with_defaults() {
        let json = r#"{
            "id": "ada@example.edu",
            "name": "Ada Lovelace",
            "availability": [{"date": "2025-05-12", "period": "3"}]
        }"#;
        let participant: Participant = serde_json::from_str(json).unwrap();
        assert_eq!(participant.topic, "");
        assert_eq!(participant.project_name, "");
        assert_eq!(
            participant.availability,
            [Slot::new(date(12), PeriodId::new("3").unwrap())]
        );
    }

    #[test]
    fn test_placement_forced_defaults_to_false() {
        let json = r#"{
            "participant_id": "ada@example.edu",
            "participant_name": "Ada Lovelace",
            "topic": "Robotics",
            "project_name": "Line follower",
            "date": "2025-05-12",
            "period": "3",
            "room": "A1"
        }"#;
        let placement: Placement = serde_json::from_str(json).unwrap();
        assert!(!placement.forced);
        assert_eq!(placement.period.as_str(), "3");
    }
}
