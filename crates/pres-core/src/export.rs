//! CSV export of a single schedule variant.
//!
//! Every (date, period, room) cell gets exactly two rows, blank-filled when
//! fewer than two participants sit there. All fields are quoted.

use std::collections::BTreeMap;
use std::io;

use chrono::NaiveDate;

use crate::SEATS_PER_CELL;
use crate::schedule::ScheduleVariant;
use crate::types::Placement;

const HEADER: [&str; 6] = [
    "Date",
    "Period",
    "Room",
    "Student Name",
    "Project Title",
    "Topic",
];

/// Cell ordering key: calendar cells first by position, stray cells after.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum CellKey {
    Calendar(usize, usize, usize),
    Extra(NaiveDate, String, String),
}

/// Renders the variant's current placements as CSV.
pub fn to_csv(variant: &ScheduleVariant) -> String {
    let mut cells: BTreeMap<CellKey, (NaiveDate, &str, &str, Vec<&Placement>)> = BTreeMap::new();

    for (d, date) in variant.dates.iter().enumerate() {
        for (p, period) in variant.periods.iter().enumerate() {
            for (r, room) in variant.rooms.iter().enumerate() {
                cells.insert(
                    CellKey::Calendar(d, p, r),
                    (*date, period.as_str(), room.as_str(), Vec::new()),
                );
            }
        }
    }

    for placement in &variant.placements {
        let key = cell_key(variant, placement);
        cells
            .entry(key)
            .or_insert_with(|| {
                (
                    placement.date,
                    placement.period.as_str(),
                    placement.room.as_str(),
                    Vec::new(),
                )
            })
            .3
            .push(placement);
    }

    let mut out = String::new();
    write_row(&mut out, HEADER);
    for (date, period, room, occupants) in cells.into_values() {
        let date = date.to_string();
        for seat in 0..occupants.len().max(SEATS_PER_CELL) {
            match occupants.get(seat) {
                Some(p) => write_row(
                    &mut out,
                    [
                        date.as_str(),
                        period,
                        room,
                        p.participant_name.as_str(),
                        p.project_name.as_str(),
                        p.topic.as_str(),
                    ],
                ),
                None => write_row(&mut out, [date.as_str(), period, room, "", "", ""]),
            }
        }
    }
    out
}

/// Writes [`to_csv`] output for the variant to `writer`.
pub fn write_csv<W: io::Write>(mut writer: W, variant: &ScheduleVariant) -> io::Result<()> {
    writer.write_all(to_csv(variant).as_bytes())
}

fn cell_key(variant: &ScheduleVariant, placement: &Placement) -> CellKey {
    let date = variant.dates.binary_search(&placement.date).ok();
    let period = variant.periods.iter().position(|p| *p == placement.period);
    let room = variant.rooms.iter().position(|r| *r == placement.room);
    match (date, period, room) {
        (Some(d), Some(p), Some(r)) => CellKey::Calendar(d, p, r),
        _ => CellKey::Extra(
            placement.date,
            placement.period.to_string(),
            placement.room.to_string(),
        ),
    }
}

fn write_row<const N: usize>(out: &mut String, fields: [&str; N]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    }
    out.push('\n');
}
