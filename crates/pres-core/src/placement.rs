//! Participant placement.
//!
//! Seats every participant in a (room, slot) cell of the calendar, at most
//! [`SEATS_PER_CELL`] per cell.
//!
//! # Algorithm Summary
//!
//! Participants are visited room by room (room-list order), topic by topic
//! within a room (claim order), then in input order within a topic. Topics no
//! room claimed come last, in first-seen order.
//!
//! Each participant runs through an ordered chain of search strategies and
//! takes the first hit:
//!
//! 1. [`Strategy::AffineRoom`]: the room that claimed the participant's
//!    topic, restricted to declared availability. A cell that is empty or
//!    holds one participant of the same topic is preferred over any other
//!    cell with a free seat.
//! 2. [`Strategy::OtherRooms`]: the same two passes in every other room, in
//!    room-list order.
//! 3. [`Strategy::Forced`]: the first free seat anywhere, ignoring
//!    availability; recorded as a forced placement.
//!
//! A participant no strategy can seat is recorded as unplaced and the run
//! carries on. Slots are always scanned in calendar order, so ties go to the
//! earliest date, then the earliest period, then room-list order, then
//! participant input order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::SEATS_PER_CELL;
use crate::assignment::{RoomTopicMap, TopicConflict};
use crate::calendar::SlotCalendar;
use crate::topic::TopicGroups;
use crate::types::{Participant, ParticipantId, Placement, RoomId};

/// Non-fatal problems collected during one variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Participants seated outside their declared availability.
    pub forced: Vec<ParticipantId>,
    /// Participants no room had a seat for.
    pub unplaced: Vec<ParticipantId>,
    /// Manual topic claims rejected because another room held the topic.
    pub conflicts: Vec<TopicConflict>,
}

/// Overall result of one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantStatus {
    /// Everyone seated within their availability.
    Complete,
    /// Everyone seated, some by force.
    Forced,
    /// Some participants could not be seated.
    Partial,
}

impl fmt::Display for VariantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complete => write!(f, "complete"),
            Self::Forced => write!(f, "forced"),
            Self::Partial => write!(f, "partial"),
        }
    }
}

impl Diagnostics {
    pub fn status(&self) -> VariantStatus {
        if !self.unplaced.is_empty() {
            VariantStatus::Partial
        } else if !self.forced.is_empty() {
            VariantStatus::Forced
        } else {
            VariantStatus::Complete
        }
    }
}

/// Placements plus diagnostics for one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementOutcome {
    pub placements: Vec<Placement>,
    pub diagnostics: Diagnostics,
}

/// Search strategies in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    /// The room holding the participant's topic.
    AffineRoom(usize),
    /// Every room except the affine one, in room-list order.
    OtherRooms { skip: Option<usize> },
    /// Any free seat, availability ignored.
    Forced,
}

impl Strategy {
    fn chain(affine: Option<usize>) -> Vec<Self> {
        let mut chain = Vec::with_capacity(3);
        if let Some(room) = affine {
            chain.push(Self::AffineRoom(room));
        }
        chain.push(Self::OtherRooms { skip: affine });
        chain.push(Self::Forced);
        chain
    }
}

/// Occupants of each (room, slot) cell, as participant indices.
#[derive(Debug)]
struct Occupancy {
    slot_count: usize,
    cells: Vec<Vec<usize>>,
}

impl Occupancy {
    fn new(room_count: usize, slot_count: usize) -> Self {
        Self {
            slot_count,
            cells: vec![Vec::with_capacity(SEATS_PER_CELL); room_count * slot_count],
        }
    }

    fn occupants(&self, room: usize, slot: usize) -> &[usize] {
        &self.cells[room * self.slot_count + slot]
    }

    fn has_seat(&self, room: usize, slot: usize) -> bool {
        self.occupants(room, slot).len() < SEATS_PER_CELL
    }

    fn seat(&mut self, room: usize, slot: usize, participant: usize) {
        let cell = &mut self.cells[room * self.slot_count + slot];
        debug_assert!(cell.len() < SEATS_PER_CELL, "cell over capacity");
        cell.push(participant);
    }
}

/// Read-only inputs shared by every participant search.
struct SearchContext<'a> {
    participants: &'a [Participant],
    topics: &'a TopicGroups,
    rooms: &'a [RoomId],
    /// `available[p][s]`: participant `p` declared calendar slot `s`.
    available: Vec<Vec<bool>>,
    slot_count: usize,
}

impl SearchContext<'_> {
    /// Empty cell, or a single occupant sharing the participant's topic.
    fn is_preferred(&self, occupancy: &Occupancy, room: usize, slot: usize, participant: usize) -> bool {
        match occupancy.occupants(room, slot) {
            [] => true,
            [other] => self.topics.group_of(*other) == self.topics.group_of(participant),
            _ => false,
        }
    }

    /// Both availability-respecting passes against a single room.
    fn search_room(&self, occupancy: &Occupancy, room: usize, participant: usize) -> Option<usize> {
        let available = &self.available[participant];
        let open = |slot: &usize| available[*slot] && occupancy.has_seat(room, *slot);

        (0..self.slot_count)
            .filter(open)
            .find(|&slot| self.is_preferred(occupancy, room, slot, participant))
            .or_else(|| (0..self.slot_count).find(open))
    }

    fn search(&self, strategy: Strategy, occupancy: &Occupancy, participant: usize) -> Option<(usize, usize)> {
        match strategy {
            Strategy::AffineRoom(room) => self
                .search_room(occupancy, room, participant)
                .map(|slot| (room, slot)),
            Strategy::OtherRooms { skip } => (0..self.rooms.len())
                .filter(|&room| Some(room) != skip)
                .find_map(|room| {
                    self.search_room(occupancy, room, participant)
                        .map(|slot| (room, slot))
                }),
            Strategy::Forced => (0..self.slot_count).find_map(|slot| {
                (0..self.rooms.len())
                    .find(|&room| occupancy.has_seat(room, slot))
                    .map(|room| (room, slot))
            }),
        }
    }
}

/// Seats every participant for one variant.
///
/// `participants` must be the same slice `topics` was built from.
pub fn place_participants(
    participants: &[Participant],
    topics: &TopicGroups,
    calendar: &SlotCalendar,
    rooms: &[RoomId],
    room_topics: &RoomTopicMap,
) -> PlacementOutcome {
    let slots = calendar.slots();
    let available = participants
        .iter()
        .map(|p| {
            let mut row = vec![false; slots.len()];
            for slot in &p.availability {
                if let Some(index) = calendar.slot_index(slot.date, &slot.period) {
                    row[index] = true;
                }
            }
            row
        })
        .collect();
    let context = SearchContext {
        participants,
        topics,
        rooms,
        available,
        slot_count: slots.len(),
    };

    let mut occupancy = Occupancy::new(rooms.len(), slots.len());
    let mut forced_flags = vec![false; participants.len()];
    let mut diagnostics = Diagnostics::default();

    for (participant, affine) in visit_order(topics, room_topics) {
        let person = &context.participants[participant];
        let hit = Strategy::chain(affine).into_iter().find_map(|strategy| {
            context
                .search(strategy, &occupancy, participant)
                .map(|cell| (strategy, cell))
        });

        match hit {
            Some((strategy, (room, slot))) => {
                occupancy.seat(room, slot, participant);
                if strategy == Strategy::Forced {
                    tracing::warn!(
                        participant = %person.id,
                        room = %rooms[room],
                        slot = %slots[slot],
                        "no available slot with a free seat, placing outside availability"
                    );
                    forced_flags[participant] = true;
                    diagnostics.forced.push(person.id.clone());
                } else {
                    tracing::debug!(
                        participant = %person.id,
                        room = %rooms[room],
                        slot = %slots[slot],
                        ?strategy,
                        "placed participant"
                    );
                }
            }
            None => {
                tracing::warn!(participant = %person.id, "no free seat left, participant unplaced");
                diagnostics.unplaced.push(person.id.clone());
            }
        }
    }

    let mut placements = Vec::with_capacity(participants.len());
    for (slot_index, slot) in slots.iter().enumerate() {
        for (room_index, room) in rooms.iter().enumerate() {
            for &participant in occupancy.occupants(room_index, slot_index) {
                let person = &participants[participant];
                placements.push(Placement {
                    participant_id: person.id.clone(),
                    participant_name: person.name.clone(),
                    topic: person.topic.clone(),
                    project_name: person.project_name.clone(),
                    date: slot.date,
                    period: slot.period.clone(),
                    room: room.clone(),
                    forced: forced_flags[participant],
                });
            }
        }
    }

    PlacementOutcome {
        placements,
        diagnostics,
    }
}

/// Participant indices in processing order, each with its affine room.
fn visit_order(topics: &TopicGroups, room_topics: &RoomTopicMap) -> Vec<(usize, Option<usize>)> {
    let claimed = room_topics
        .rooms()
        .iter()
        .enumerate()
        .flat_map(|(room, claims)| claims.topics.iter().map(move |topic| (topic, Some(room))));
    let unclaimed = room_topics.unclaimed(topics).map(|topic| (topic, None));

    claimed
        .chain(unclaimed)
        .filter_map(|(topic, room)| topics.get(topic).map(|group| (group, room)))
        .flat_map(|(group, room)| group.members.iter().map(move |&p| (p, room)))
        .collect()
}
