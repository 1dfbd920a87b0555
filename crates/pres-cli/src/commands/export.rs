//! Export command: re-renders one schedule of a saved set as CSV.
//!
//! A replacement placement list, such as one produced by an external editor,
//! substitutes the schedule's placements wholesale before export.

use std::io::Write;

use anyhow::{Context, Result};

use pres_core::{Placement, ScheduleSet};

pub fn run<W: Write>(
    writer: &mut W,
    mut set: ScheduleSet,
    number: usize,
    placements: Option<Vec<Placement>>,
) -> Result<()> {
    if let Some(placements) = placements {
        set.replace_placements(number, placements)
            .context("failed to apply edited placements")?;
    }
    let variant = set
        .variant(number)
        .with_context(|| format!("schedule set has no schedule {number}"))?;

    pres_core::write_csv(writer, variant)?;
    Ok(())
}
