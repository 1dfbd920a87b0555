//! Interactive room assignment over a line-oriented terminal.
//!
//! For each schedule the user is shown the topic list and asked whether to
//! assign topics to rooms by hand. Answering no (or just pressing enter)
//! keeps automatic round-robin assignment for that schedule.

use std::io::{self, BufRead, Write};

use pres_core::{
    AssignmentChoice, AssignmentPrompt, AssignmentResolver, ManualAssignment, ScheduleError,
    TopicGroup,
};

/// Resolver that asks on `input` and writes questions to `output`.
pub struct PromptResolver<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptResolver<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Reads one trimmed line; end of input is an error.
    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{question} ")?;
        self.output.flush()?;
        self.read_line()
    }

    fn choose(&mut self, prompt: &AssignmentPrompt<'_>) -> io::Result<AssignmentChoice> {
        writeln!(
            self.output,
            "Schedule {}: {} topics, {} rooms, {} seats per room",
            prompt.variant,
            prompt.topics.len(),
            prompt.rooms.len(),
            prompt.room_capacity
        )?;
        let groups: Vec<&TopicGroup> = prompt.topics.iter().collect();
        for (i, group) in groups.iter().enumerate() {
            let noun = if group.members.len() == 1 { "student" } else { "students" };
            let name = if group.label.is_empty() {
                group.key.to_string()
            } else {
                group.label.clone()
            };
            writeln!(
                self.output,
                "  {}. {name} ({} {noun})",
                i + 1,
                group.members.len()
            )?;
        }

        let answer = self.ask("Assign topics to rooms manually? [y/N]")?;
        if !matches!(answer.to_lowercase().as_str(), "y" | "yes") {
            return Ok(AssignmentChoice::Automatic);
        }

        let mut assignment = ManualAssignment::new();
        for room in prompt.rooms {
            let picks = loop {
                let answer = self.ask(&format!(
                    "Topics for room {room} (numbers, comma-separated; blank for none):"
                ))?;
                match parse_picks(&answer, prompt.topics.len()) {
                    Ok(picks) => break picks,
                    Err(bad) => writeln!(self.output, "  not a topic number: {bad}")?,
                }
            };
            // Claim order is processing order, so keep the order typed.
            let mut topics: Vec<&str> = Vec::with_capacity(picks.len());
            for pick in picks {
                let topic = groups[pick].key.as_str();
                if !topics.contains(&topic) {
                    topics.push(topic);
                }
            }
            assignment.claim(room.clone(), topics);
        }

        Ok(AssignmentChoice::Manual(assignment))
    }
}

impl<R: BufRead, W: Write> AssignmentResolver for PromptResolver<R, W> {
    fn resolve(&mut self, prompt: &AssignmentPrompt<'_>) -> Result<AssignmentChoice, ScheduleError> {
        self.choose(prompt)
            .map_err(|e| ScheduleError::AssignmentAborted {
                variant: prompt.variant,
                reason: e.to_string(),
            })
    }
}

/// Parses 1-based topic numbers into 0-based indices.
fn parse_picks(answer: &str, topic_count: usize) -> Result<Vec<usize>, String> {
    answer
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| match s.parse::<usize>() {
            Ok(n) if (1..=topic_count).contains(&n) => Ok(n - 1),
            _ => Err(s.to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use pres_core::{Participant, ParticipantId, RoomId, TopicGroups};

    use insta::assert_snapshot;

    fn participant(id: &str, topic: &str) -> Participant {
        Participant {
            id: ParticipantId::new(id).unwrap(),
            name: id.to_string(),
            topic: topic.to_string(),
            project_name: String::new(),
            availability: Vec::new(),
        }
    }

    fn topics() -> TopicGroups {
        TopicGroups::from_participants(&[
            participant("a", "Robotics"),
            participant("b", "Chemistry"),
            participant("c", "robotics"),
        ])
    }

    fn rooms() -> Vec<RoomId> {
        vec![RoomId::new("101").unwrap(), RoomId::new("102").unwrap()]
    }

    fn resolve(input: &str) -> (Result<AssignmentChoice, ScheduleError>, String) {
        let topics = topics();
        let rooms = rooms();
        let prompt = AssignmentPrompt {
            variant: 1,
            rooms: &rooms,
            topics: &topics,
            room_capacity: 10,
        };
        let mut output = Vec::new();
        let result = PromptResolver::new(input.as_bytes(), &mut output).resolve(&prompt);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_blank_answer_keeps_automatic() {
        let (result, output) = resolve("\n");
        assert_eq!(result, Ok(AssignmentChoice::Automatic));
        assert_snapshot!(output, @r"
        Schedule 1: 2 topics, 2 rooms, 10 seats per room
          1. Robotics (2 students)
          2. Chemistry (1 student)
        Assign topics to rooms manually? [y/N]
        ");
    }

    #[test]
    fn test_manual_answers_build_assignment() {
        let (result, output) = resolve("y\n2\nx, 1\n1\n");

        let mut expected = ManualAssignment::new();
        expected.claim(RoomId::new("101").unwrap(), ["chemistry"]);
        expected.claim(RoomId::new("102").unwrap(), ["robotics"]);
        assert_eq!(result, Ok(AssignmentChoice::Manual(expected)));
        assert!(output.contains("not a topic number: x"));
    }

    #[test]
    fn test_manual_picks_keep_typed_order() {
        let (result, _) = resolve("y\n2,1,2\n\n");

        let mut expected = ManualAssignment::new();
        expected.claim(RoomId::new("101").unwrap(), ["chemistry", "robotics"]);
        expected.claim(RoomId::new("102").unwrap(), Vec::<String>::new());
        assert_eq!(result, Ok(AssignmentChoice::Manual(expected)));
    }

    #[test]
    fn test_unnamed_topic_is_listed_as_no_topic() {
        let topics = TopicGroups::from_participants(&[participant("a", " ")]);
        let rooms = rooms();
        let prompt = AssignmentPrompt {
            variant: 3,
            rooms: &rooms,
            topics: &topics,
            room_capacity: 4,
        };
        let mut output = Vec::new();
        PromptResolver::new("n\n".as_bytes(), &mut output)
            .resolve(&prompt)
            .unwrap();
        assert!(String::from_utf8(output).unwrap().contains("  1. (no topic) (1 student)"));
    }

    #[test]
    fn test_closed_input_aborts() {
        let (result, _) = resolve("yes\n1\n");
        assert!(matches!(
            result,
            Err(ScheduleError::AssignmentAborted { variant: 1, ref reason }) if reason == "input closed"
        ));
    }

    #[test]
    fn test_parse_picks_range_checks() {
        assert_eq!(parse_picks("1, 3", 3), Ok(vec![0, 2]));
        assert_eq!(parse_picks("", 3), Ok(vec![]));
        assert_eq!(parse_picks("4", 3), Err("4".to_string()));
        assert_eq!(parse_picks("0", 3), Err("0".to_string()));
    }
}
