//! Topic normalization and grouping.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Participant;

/// Normalized topic used for grouping and room claims.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TopicKey {
    /// A non-empty topic, trimmed and lower-cased.
    Named(String),
    /// Participants who gave no topic.
    Unspecified,
}

impl TopicKey {
    /// Trims and case-folds a raw topic; blank text maps to [`Self::Unspecified`].
    pub fn normalize(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::Unspecified
        } else {
            Self::Named(trimmed.to_lowercase())
        }
    }

    /// The normalized text, empty for [`Self::Unspecified`].
    pub fn as_str(&self) -> &str {
        match self {
            Self::Named(topic) => topic,
            Self::Unspecified => "",
        }
    }
}

impl fmt::Display for TopicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(topic) => write!(f, "{topic}"),
            Self::Unspecified => write!(f, "(no topic)"),
        }
    }
}

impl Serialize for TopicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TopicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::normalize(&s))
    }
}

/// Participants sharing one normalized topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicGroup {
    pub key: TopicKey,
    /// First spelling seen for this topic, for display.
    pub label: String,
    /// Indices into the participant slice, in input order.
    pub members: Vec<usize>,
}

/// Participants partitioned by topic, groups in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicGroups {
    groups: Vec<TopicGroup>,
    index: HashMap<TopicKey, usize>,
    /// Group position of each participant.
    membership: Vec<usize>,
}

impl TopicGroups {
    pub fn from_participants(participants: &[Participant]) -> Self {
        let mut groups: Vec<TopicGroup> = Vec::new();
        let mut index: HashMap<TopicKey, usize> = HashMap::new();
        let mut membership = Vec::with_capacity(participants.len());

        for (position, participant) in participants.iter().enumerate() {
            let key = TopicKey::normalize(&participant.topic);
            let group = *index.entry(key.clone()).or_insert_with(|| {
                groups.push(TopicGroup {
                    key,
                    label: participant.topic.trim().to_string(),
                    members: Vec::new(),
                });
                groups.len() - 1
            });
            groups[group].members.push(position);
            membership.push(group);
        }

        Self {
            groups,
            index,
            membership,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TopicGroup> {
        self.groups.iter()
    }

    pub fn get(&self, key: &TopicKey) -> Option<&TopicGroup> {
        self.index.get(key).map(|&i| &self.groups[i])
    }

    /// Group position of the participant at `participant` in the input slice.
    pub fn group_of(&self, participant: usize) -> usize {
        self.membership[participant]
    }

    pub fn keys(&self) -> impl Iterator<Item = &TopicKey> {
        self.groups.iter().map(|g| &g.key)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParticipantId;

    fn participant(id: &str, topic: &str) -> Participant {
        Participant {
            id: ParticipantId::new(id).unwrap(),
            name: id.to_string(),
            topic: topic.to_string(),
            project_name: String::new(),
            availability: Vec::new(),
        }
    }

    #[test]
    fn test_normalize_trims_and_folds_case() {
        assert_eq!(
            TopicKey::normalize("  Marine Biology "),
            TopicKey::Named("marine biology".to_string())
        );
        assert_eq!(TopicKey::normalize(""), TopicKey::Unspecified);
        assert_eq!(TopicKey::normalize(" \t "), TopicKey::Unspecified);
    }

    #[test]
    fn test_groups_in_first_seen_order_with_stable_members() {
        let participants = vec![
            participant("a", "Robotics"),
            participant("b", "Chemistry"),
            participant("c", "robotics "),
            participant("d", ""),
            participant("e", "CHEMISTRY"),
        ];
        let groups = TopicGroups::from_participants(&participants);

        let summary: Vec<(String, Vec<usize>)> = groups
            .iter()
            .map(|g| (g.key.to_string(), g.members.clone()))
            .collect();
        assert_eq!(
            summary,
            [
                ("robotics".to_string(), vec![0, 2]),
                ("chemistry".to_string(), vec![1, 4]),
                ("(no topic)".to_string(), vec![3]),
            ]
        );
        assert_eq!(groups.group_of(4), 1);
        assert_eq!(groups.get(&TopicKey::Unspecified).unwrap().members, [3]);
    }

    #[test]
    fn test_label_keeps_first_spelling() {
        let participants = vec![participant("a", " Robotics"), participant("b", "ROBOTICS")];
        let groups = TopicGroups::from_participants(&participants);

        let group = groups.get(&TopicKey::normalize("robotics")).unwrap();
        assert_eq!(group.label, "Robotics");
    }

    #[test]
    fn test_serde_uses_normalized_text() {
        let key: TopicKey = serde_json::from_str("\" Ecology \"").unwrap();
        assert_eq!(key, TopicKey::Named("ecology".to_string()));
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"ecology\"");
        assert_eq!(
            serde_json::to_string(&TopicKey::Unspecified).unwrap(),
            "\"\""
        );
    }
}
