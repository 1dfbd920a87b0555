//! Generate command: builds a schedule set and writes one CSV per schedule.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use pres_core::{AssignmentResolver, Participant, ScheduleConfig, ScheduleSet, ScheduleVariant};

/// Where generated schedules go.
#[derive(Debug, Clone)]
pub enum Output {
    /// `schedule-<n>.csv` files in this directory, plus a summary on the writer.
    Csv(PathBuf),
    /// The whole set as JSON on the writer.
    Json,
}

pub fn run<W, R>(
    writer: &mut W,
    participants: &[Participant],
    config: &ScheduleConfig,
    resolver: &mut R,
    output: &Output,
) -> Result<ScheduleSet>
where
    W: Write,
    R: AssignmentResolver + ?Sized,
{
    let set = ScheduleSet::generate(participants, config, resolver)
        .context("failed to generate schedules")?;

    match output {
        Output::Json => {
            serde_json::to_writer_pretty(&mut *writer, &set)?;
            writeln!(writer)?;
        }
        Output::Csv(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
            let mut files = Vec::with_capacity(set.len());
            for variant in set.variants() {
                let path = dir.join(csv_file_name(variant.number));
                fs::write(&path, pres_core::to_csv(variant))
                    .with_context(|| format!("failed to write {}", path.display()))?;
                files.push(path);
            }
            write_summary(writer, &set, participants.len(), &files)?;
        }
    }

    Ok(set)
}

pub fn csv_file_name(number: usize) -> String {
    format!("schedule-{number}.csv")
}

/// Human-readable overview of every schedule in the set.
pub fn write_summary<W: Write>(
    writer: &mut W,
    set: &ScheduleSet,
    participant_count: usize,
    files: &[PathBuf],
) -> Result<()> {
    let noun = if set.len() == 1 { "schedule" } else { "schedules" };
    writeln!(
        writer,
        "Generated {} {noun} for {participant_count} students",
        set.len()
    )?;

    if let Some(first) = set.variants().first() {
        let dates: Vec<String> = first.dates.iter().map(ToString::to_string).collect();
        writeln!(writer, "Dates: {}", dates.join(", "))?;
    }

    for (variant, file) in set.variants().iter().zip(files) {
        write_variant(writer, variant, file)?;
    }
    Ok(())
}

fn write_variant<W: Write>(writer: &mut W, variant: &ScheduleVariant, file: &Path) -> Result<()> {
    let diagnostics = &variant.diagnostics;
    writeln!(writer)?;
    writeln!(
        writer,
        "Schedule {} [{}] -> {}",
        variant.number,
        variant.status(),
        file.display()
    )?;
    if let Some(seed) = variant.seed {
        writeln!(writer, "  seed: {seed}")?;
    }
    for claims in variant.room_topics.rooms() {
        let topics: Vec<String> = claims.topics.iter().map(ToString::to_string).collect();
        let topics = if topics.is_empty() {
            "-".to_string()
        } else {
            topics.join(", ")
        };
        writeln!(writer, "  room {}: {topics}", claims.room)?;
    }
    writeln!(
        writer,
        "  placed: {}, forced: {}, unplaced: {}",
        variant.placements.len(),
        diagnostics.forced.len(),
        diagnostics.unplaced.len()
    )?;
    for id in &diagnostics.forced {
        writeln!(writer, "  forced outside availability: {id}")?;
    }
    for id in &diagnostics.unplaced {
        writeln!(writer, "  could not place: {id}")?;
    }
    for conflict in &diagnostics.conflicts {
        writeln!(
            writer,
            "  topic {} already held by room {}, ignored for room {}",
            conflict.topic, conflict.claimed_by, conflict.rejected
        )?;
    }
    Ok(())
}
