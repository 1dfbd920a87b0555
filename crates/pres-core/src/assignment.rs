//! Room-topic commitments.
//!
//! Each topic is committed to at most one room. Commitments only decide
//! which room a participant tries first; any room can take spillover.
//!
//! The map is produced either automatically (round-robin, optionally after a
//! seeded shuffle) or from a manual mapping supplied through an
//! [`AssignmentResolver`], which is how the engine waits on a human choice
//! before placement starts.

use std::collections::HashMap;
use std::fmt;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::error::ScheduleError;
use crate::topic::{TopicGroups, TopicKey};
use crate::types::RoomId;

/// Topics committed to one room, in claim order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomClaims {
    pub room: RoomId,
    pub topics: Vec<TopicKey>,
}

/// Room to topics map with one-room-per-topic exclusivity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomTopicMap {
    rooms: Vec<RoomClaims>,
}

/// A rejected manual claim on a topic another room already holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicConflict {
    pub topic: TopicKey,
    pub claimed_by: RoomId,
    pub rejected: RoomId,
}

/// Manually chosen topics per room.
///
/// Claims are resolved in configured room order, so the order of rooms here
/// does not matter. Repeated rooms (including spellings that only differ in
/// surrounding whitespace) merge their topic lists in the order given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualAssignment(Vec<(RoomId, Vec<String>)>);

impl ManualAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds topics to a room's claim list.
    pub fn claim<I, S>(&mut self, room: RoomId, topics: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let topics = topics.into_iter().map(Into::into);
        match self.0.iter_mut().find(|(r, _)| *r == room) {
            Some((_, claimed)) => claimed.extend(topics),
            None => self.0.push((room, topics.collect())),
        }
    }

    pub fn topics_for(&self, room: &RoomId) -> &[String] {
        self.0
            .iter()
            .find(|(r, _)| r == room)
            .map_or(&[], |(_, topics)| topics.as_slice())
    }

    /// Rooms in the order they were first given.
    pub fn rooms(&self) -> impl Iterator<Item = &RoomId> {
        self.0.iter().map(|(room, _)| room)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(RoomId, Vec<String>)> for ManualAssignment {
    fn from_iter<T: IntoIterator<Item = (RoomId, Vec<String>)>>(iter: T) -> Self {
        let mut assignment = Self::new();
        for (room, topics) in iter {
            assignment.claim(room, topics);
        }
        assignment
    }
}

impl Serialize for ManualAssignment {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_map(self.0.iter().map(|(room, topics)| (room, topics)))
    }
}

impl<'de> Deserialize<'de> for ManualAssignment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ManualVisitor;

        impl<'de> serde::de::Visitor<'de> for ManualVisitor {
            type Value = ManualAssignment;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of room IDs to topic lists")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut assignment = ManualAssignment::new();
                while let Some((room, topics)) = map.next_entry::<RoomId, Vec<String>>()? {
                    assignment.claim(room, topics);
                }
                Ok(assignment)
            }
        }

        deserializer.deserialize_map(ManualVisitor)
    }
}

impl RoomTopicMap {
    /// Round-robin topics over rooms: `topic[i] -> room[i mod R]`.
    ///
    /// With a seed the topic order is shuffled first; the same seed always
    /// yields the same map.
    pub fn automatic(rooms: &[RoomId], topics: &TopicGroups, seed: Option<u64>) -> Self {
        let mut order: Vec<TopicKey> = topics.keys().cloned().collect();
        if let Some(seed) = seed {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            order.shuffle(&mut rng);
        }

        let mut claims: Vec<RoomClaims> = rooms
            .iter()
            .map(|room| RoomClaims {
                room: room.clone(),
                topics: Vec::new(),
            })
            .collect();
        if !claims.is_empty() {
            let room_count = claims.len();
            for (i, topic) in order.into_iter().enumerate() {
                claims[i % room_count].topics.push(topic);
            }
        }

        Self { rooms: claims }
    }

    /// Builds the map from a manual assignment.
    ///
    /// The first room (in configured order) to claim a topic keeps it; later
    /// claims are returned as conflicts. The first room outside the
    /// configuration, in the order the assignment lists rooms, is rejected.
    pub fn manual(
        rooms: &[RoomId],
        assignment: &ManualAssignment,
    ) -> Result<(Self, Vec<TopicConflict>), ConfigError> {
        if let Some(unknown) = assignment.rooms().find(|room| !rooms.contains(room)) {
            return Err(ConfigError::UnknownRoom(unknown.clone()));
        }

        let mut owner: HashMap<TopicKey, RoomId> = HashMap::new();
        let mut conflicts = Vec::new();
        let mut claims = Vec::with_capacity(rooms.len());

        for room in rooms {
            let mut topics = Vec::new();
            for raw in assignment.topics_for(room) {
                let topic = TopicKey::normalize(raw);
                match owner.get(&topic) {
                    Some(holder) if holder == room => {}
                    Some(holder) => {
                        tracing::warn!(
                            %topic,
                            claimed_by = %holder,
                            rejected = %room,
                            "topic already claimed by another room"
                        );
                        conflicts.push(TopicConflict {
                            topic,
                            claimed_by: holder.clone(),
                            rejected: room.clone(),
                        });
                    }
                    None => {
                        owner.insert(topic.clone(), room.clone());
                        topics.push(topic);
                    }
                }
            }
            claims.push(RoomClaims {
                room: room.clone(),
                topics,
            });
        }

        Ok((Self { rooms: claims }, conflicts))
    }

    /// Claims in room order.
    pub fn rooms(&self) -> &[RoomClaims] {
        &self.rooms
    }

    /// Index of the room holding `topic`, if any.
    pub fn affine_room(&self, topic: &TopicKey) -> Option<usize> {
        self.rooms
            .iter()
            .position(|claims| claims.topics.contains(topic))
    }

    /// Topics no room has claimed, in group order.
    pub fn unclaimed<'a>(&'a self, topics: &'a TopicGroups) -> impl Iterator<Item = &'a TopicKey> {
        topics.keys().filter(|key| self.affine_room(key).is_none())
    }
}

/// What a resolver is shown before deciding how rooms get their topics.
#[derive(Debug, Clone, Copy)]
pub struct AssignmentPrompt<'a> {
    /// 1-based variant number.
    pub variant: usize,
    pub rooms: &'a [RoomId],
    pub topics: &'a TopicGroups,
    /// Seats per room across the calendar.
    pub room_capacity: usize,
}

/// How a variant's room-topic map should be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentChoice {
    Automatic,
    Manual(ManualAssignment),
}

/// Supplies the room-topic decision for each variant.
///
/// Called once per variant, sequentially, before any placement runs.
pub trait AssignmentResolver {
    fn resolve(&mut self, prompt: &AssignmentPrompt<'_>) -> Result<AssignmentChoice, ScheduleError>;
}

impl<F> AssignmentResolver for F
where
    F: FnMut(&AssignmentPrompt<'_>) -> Result<AssignmentChoice, ScheduleError>,
{
    fn resolve(&mut self, prompt: &AssignmentPrompt<'_>) -> Result<AssignmentChoice, ScheduleError> {
        self(prompt)
    }
}

/// Resolver that always picks automatic assignment.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutomaticAssignment;

impl AssignmentResolver for AutomaticAssignment {
    fn resolve(&mut self, _prompt: &AssignmentPrompt<'_>) -> Result<AssignmentChoice, ScheduleError> {
        Ok(AssignmentChoice::Automatic)
    }
}
