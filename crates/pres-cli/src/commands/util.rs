//! Shared utilities for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use pres_core::{Participant, PeriodId};

/// Conservative bound on the number of periods a range may expand to.
const MAX_PERIOD_RANGE: u32 = 64;

/// Parse a period list as either a numeric range or comma-separated IDs.
///
/// Supports:
/// - Range: "2-6" (expands to 2, 3, 4, 5, 6)
/// - List: "2,3,4" or "A, B, Lunch"
pub fn parse_periods(s: &str) -> Result<Vec<PeriodId>> {
    let s = s.trim();

    let range = s
        .split_once('-')
        .map(|(start, end)| (start.trim().parse::<u32>(), end.trim().parse::<u32>()));
    if let Some((Ok(start), Ok(end))) = range {
        if start > end {
            anyhow::bail!("Invalid period range: {s}. Start must not exceed end");
        }
        if end - start >= MAX_PERIOD_RANGE {
            anyhow::bail!("Period range too large: {s}");
        }
        return (start..=end)
            .map(|p| PeriodId::new(p.to_string()).context("invalid period"))
            .collect();
    }

    s.split(',')
        .map(|p| {
            PeriodId::new(p).with_context(|| {
                format!("Invalid periods: {s:?}. Use a range (e.g., 2-6) or a list (e.g., 2,3,4)")
            })
        })
        .collect()
}

/// Reads and deserializes a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

/// Reads the participants file (a JSON array of participant records).
pub fn read_participants(path: &Path) -> Result<Vec<Participant>> {
    let participants: Vec<Participant> = read_json(path)?;
    tracing::debug!(count = participants.len(), path = %path.display(), "read participants");
    Ok(participants)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(periods: &[PeriodId]) -> Vec<&str> {
        periods.iter().map(PeriodId::as_str).collect()
    }

    #[test]
    fn test_parse_periods_range() {
        assert_eq!(ids(&parse_periods("2-6").unwrap()), ["2", "3", "4", "5", "6"]);
        assert_eq!(ids(&parse_periods(" 3 - 3 ").unwrap()), ["3"]);
    }

    #[test]
    fn test_parse_periods_list() {
        assert_eq!(ids(&parse_periods("2,4, 7").unwrap()), ["2", "4", "7"]);
        assert_eq!(ids(&parse_periods("A,Lunch").unwrap()), ["A", "Lunch"]);
    }

    #[test]
    fn test_parse_periods_rejects_bad_input() {
        assert!(parse_periods("6-2").is_err());
        assert!(parse_periods("1-1000").is_err());
        assert!(parse_periods("2,,3").is_err());
        assert!(parse_periods("").is_err());
    }

    #[test]
    fn test_non_numeric_dash_is_a_single_id() {
        assert_eq!(ids(&parse_periods("late-am").unwrap()), ["late-am"]);
    }

    #[test]
    fn test_read_participants() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("participants.json");
        fs::write(
            &path,
            r#"[{"id": "ada@example.com", "name": "Ada", "topic": "Computing",
                 "availability": [{"date": "2025-05-12", "period": "2"}]}]"#,
        )
        .unwrap();

        let participants = read_participants(&path).unwrap();
        assert_eq!(participants.len(), 1);
        assert_eq!(participants[0].id.as_str(), "ada@example.com");
        assert!(participants[0].project_name.is_empty());
    }

    #[test]
    fn test_read_json_reports_path() {
        let err = read_json::<Vec<Participant>>(Path::new("/nonexistent/p.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/p.json"));
    }
}
