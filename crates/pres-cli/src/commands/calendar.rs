//! Calendar command: shows how dates would be chosen for a run.

use std::io::Write;

use anyhow::Result;

use pres_core::{Participant, ScheduleConfig, SlotCalendar};

pub fn run<W: Write>(writer: &mut W, participants: &[Participant], config: &ScheduleConfig) -> Result<()> {
    let calendar = SlotCalendar::build(
        participants,
        &config.periods,
        config.number_of_days as usize,
        config.coverage_threshold,
    );

    writeln!(
        writer,
        "Date availability ({} students, threshold {}%):",
        participants.len(),
        config.coverage_threshold
    )?;
    if calendar.date_frequency().is_empty() {
        writeln!(writer, "  no availability recorded")?;
        return Ok(());
    }
    for entry in calendar.date_frequency() {
        let marker = if calendar.selected_dates().contains(&entry.date) {
            "*"
        } else {
            " "
        };
        writeln!(writer, "{marker} {}  {:>3}", entry.date, entry.participants)?;
    }

    writeln!(writer)?;
    writeln!(writer, "Slots:")?;
    for slot in calendar.slots() {
        writeln!(
            writer,
            "  {:<24} {:>3} available",
            slot.to_string(),
            calendar.slot_frequency(slot)
        )?;
    }

    writeln!(writer)?;
    writeln!(
        writer,
        "Seats: {} per room, {} across {} rooms",
        calendar.room_capacity(),
        calendar.room_capacity() * config.rooms.len(),
        config.rooms.len()
    )?;
    if let Err(err) = calendar.check_capacity(config.rooms.len()) {
        writeln!(writer, "Warning: {err}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;
    use pres_core::{ParticipantId, PeriodId, RoomId, Slot};

    use insta::assert_snapshot;

    fn participant(id: &str, slots: &[(u32, &str)]) -> Participant {
        Participant {
            id: ParticipantId::new(id).unwrap(),
            name: id.to_string(),
            topic: String::new(),
            project_name: String::new(),
            availability: slots
                .iter()
                .map(|(day, p)| {
                    Slot::new(
                        NaiveDate::from_ymd_opt(2025, 5, *day).unwrap(),
                        PeriodId::new(*p).unwrap(),
                    )
                })
                .collect(),
        }
    }

    fn config(rooms: &[&str]) -> ScheduleConfig {
        ScheduleConfig {
            periods: vec![PeriodId::new("2").unwrap(), PeriodId::new("3").unwrap()],
            rooms: rooms.iter().map(|r| RoomId::new(*r).unwrap()).collect(),
            ..ScheduleConfig::default()
        }
    }

    #[test]
    fn test_calendar_command_marks_selected_dates() {
        let participants = vec![
            participant("a", &[(13, "2"), (12, "2")]),
            participant("b", &[(12, "2"), (12, "3")]),
            participant("c", &[(12, "3")]),
        ];
        let mut output = Vec::new();
        run(&mut output, &participants, &config(&["101"])).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        Date availability (3 students, threshold 100%):
          2025-05-13    1
        * 2025-05-12    3

        Slots:
          2025-05-12 period 2        2 available
          2025-05-12 period 3        2 available

        Seats: 4 per room, 4 across 1 rooms
        ");
    }

    #[test]
    fn test_calendar_command_warns_on_capacity() {
        let participants: Vec<Participant> = (0..5)
            .map(|i| participant(&format!("p{i}"), &[(12, "2")]))
            .collect();
        let mut output = Vec::new();
        run(&mut output, &participants, &config(&["101"])).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Warning: insufficient capacity: 4 seats"));
    }

    #[test]
    fn test_calendar_command_without_availability() {
        let mut output = Vec::new();
        run(&mut output, &[], &config(&["101"])).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        Date availability (0 students, threshold 100%):
          no availability recorded
        ");
    }
}
