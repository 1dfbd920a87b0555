//! Multi-variant schedule generation.
//!
//! A run validates the configuration, builds the slot calendar and topic
//! groups, checks capacity, asks the resolver for each variant's room-topic
//! choice, and then places every variant independently.

use chrono::NaiveDate;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assignment::{
    AssignmentChoice, AssignmentPrompt, AssignmentResolver, RoomTopicMap, TopicConflict,
};
use crate::calendar::SlotCalendar;
use crate::config::ScheduleConfig;
use crate::error::ScheduleError;
use crate::placement::{Diagnostics, VariantStatus, place_participants};
use crate::topic::TopicGroups;
use crate::types::{Participant, PeriodId, Placement, RoomId};

/// One complete, independent placement solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleVariant {
    /// 1-based position in the set.
    pub number: usize,
    pub dates: Vec<NaiveDate>,
    pub periods: Vec<PeriodId>,
    pub rooms: Vec<RoomId>,
    pub room_topics: RoomTopicMap,
    /// Shuffle seed used for automatic assignment, if any.
    pub seed: Option<u64>,
    pub placements: Vec<Placement>,
    pub diagnostics: Diagnostics,
    /// Set once the placement list has been replaced by an edit.
    #[serde(default)]
    pub edited: bool,
}

impl ScheduleVariant {
    pub fn status(&self) -> VariantStatus {
        self.diagnostics.status()
    }
}

/// Every variant produced by one run, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSet {
    variants: Vec<ScheduleVariant>,
}

/// A variant whose room-topic decision has been made but not yet placed.
struct PendingVariant {
    number: usize,
    room_topics: RoomTopicMap,
    conflicts: Vec<TopicConflict>,
    seed: Option<u64>,
}

impl ScheduleSet {
    /// Generates `config.number_of_schedules` variants.
    ///
    /// Only configuration and capacity problems fail the run; participants
    /// that had to be forced or could not be seated are reported in each
    /// variant's diagnostics.
    pub fn generate<R>(
        participants: &[Participant],
        config: &ScheduleConfig,
        resolver: &mut R,
    ) -> Result<Self, ScheduleError>
    where
        R: AssignmentResolver + ?Sized,
    {
        config.validate()?;

        let calendar = SlotCalendar::build(
            participants,
            &config.periods,
            config.number_of_days as usize,
            config.coverage_threshold,
        );
        calendar.check_capacity(config.rooms.len())?;
        let topics = TopicGroups::from_participants(participants);

        let base_seed = config
            .shuffle_topics
            .then(|| config.seed.unwrap_or_else(|| rand::rng().random()));
        if let Some(seed) = base_seed {
            tracing::debug!(seed, "shuffling topics before room assignment");
        }

        let mut pending = Vec::with_capacity(config.number_of_schedules as usize);
        for number in 1..=config.number_of_schedules as usize {
            let prompt = AssignmentPrompt {
                variant: number,
                rooms: &config.rooms,
                topics: &topics,
                room_capacity: calendar.room_capacity(),
            };
            let variant = match resolver.resolve(&prompt)? {
                AssignmentChoice::Automatic => {
                    let seed = base_seed.map(|base| base.wrapping_add(number as u64 - 1));
                    PendingVariant {
                        number,
                        room_topics: RoomTopicMap::automatic(&config.rooms, &topics, seed),
                        conflicts: Vec::new(),
                        seed,
                    }
                }
                AssignmentChoice::Manual(assignment) => {
                    let (room_topics, conflicts) =
                        RoomTopicMap::manual(&config.rooms, &assignment)?;
                    PendingVariant {
                        number,
                        room_topics,
                        conflicts,
                        seed: None,
                    }
                }
            };
            pending.push(variant);
        }

        let variants = pending
            .into_par_iter()
            .map(|variant| {
                let outcome = place_participants(
                    participants,
                    &topics,
                    &calendar,
                    &config.rooms,
                    &variant.room_topics,
                );
                let diagnostics = Diagnostics {
                    conflicts: variant.conflicts,
                    ..outcome.diagnostics
                };
                tracing::info!(
                    variant = variant.number,
                    placed = outcome.placements.len(),
                    forced = diagnostics.forced.len(),
                    unplaced = diagnostics.unplaced.len(),
                    conflicts = diagnostics.conflicts.len(),
                    "generated schedule"
                );
                ScheduleVariant {
                    number: variant.number,
                    dates: calendar.selected_dates().to_vec(),
                    periods: config.periods.clone(),
                    rooms: config.rooms.clone(),
                    room_topics: variant.room_topics,
                    seed: variant.seed,
                    placements: outcome.placements,
                    diagnostics,
                    edited: false,
                }
            })
            .collect();

        Ok(Self { variants })
    }

    pub fn variants(&self) -> &[ScheduleVariant] {
        &self.variants
    }

    /// Looks up a variant by its 1-based number.
    pub fn variant(&self, number: usize) -> Option<&ScheduleVariant> {
        number
            .checked_sub(1)
            .and_then(|index| self.variants.get(index))
    }

    /// Replaces a variant's placements wholesale with an edited list.
    ///
    /// The list is accepted as-is and becomes the export source for that
    /// variant; occupancy rules are not re-checked.
    pub fn replace_placements(
        &mut self,
        number: usize,
        placements: Vec<Placement>,
    ) -> Result<(), ScheduleError> {
        let variant = number
            .checked_sub(1)
            .and_then(|index| self.variants.get_mut(index))
            .ok_or(ScheduleError::UnknownVariant(number))?;
        tracing::debug!(
            variant = number,
            before = variant.placements.len(),
            after = placements.len(),
            "replacing placements"
        );
        variant.placements = placements;
        variant.edited = true;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}
