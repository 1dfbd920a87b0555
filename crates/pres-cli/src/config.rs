//! Configuration loading and management.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use pres_core::{RoomId, ScheduleConfig};

use crate::cli::ScheduleArgs;
use crate::commands::util::parse_periods;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Number of schedules to generate.
    pub schedules: u32,

    /// Periods as a range ("2-6") or a comma-separated list.
    pub periods: String,

    /// Rooms in preference order.
    pub rooms: Vec<String>,

    /// Number of presentation days.
    pub days: u32,

    /// Percentage of students that must share a date for it to be preferred.
    pub coverage_threshold: u8,

    /// Shuffle topics before room assignment.
    pub shuffle_topics: bool,

    /// Base seed for topic shuffling.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schedules: 1,
            periods: "2-6".to_string(),
            rooms: Vec::new(),
            days: 1,
            coverage_threshold: 100,
            shuffle_topics: false,
            seed: None,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (PRES_*)
        figment = figment.merge(Env::prefixed("PRES_"));

        figment.extract()
    }

    /// Applies command-line overrides on top of the loaded values.
    pub fn apply(&mut self, args: &ScheduleArgs) {
        if !args.rooms.is_empty() {
            self.rooms.clone_from(&args.rooms);
        }
        if let Some(periods) = &args.periods {
            self.periods.clone_from(periods);
        }
        if let Some(days) = args.days {
            self.days = days;
        }
        if let Some(schedules) = args.schedules {
            self.schedules = schedules;
        }
        if let Some(threshold) = args.threshold {
            self.coverage_threshold = threshold;
        }
        if args.shuffle || args.seed.is_some() {
            self.shuffle_topics = true;
        }
        if args.seed.is_some() {
            self.seed = args.seed;
        }
    }

    /// Builds the engine configuration. Range checks happen in the engine.
    pub fn schedule_config(&self) -> Result<ScheduleConfig> {
        let periods = parse_periods(&self.periods)?;
        let rooms = self
            .rooms
            .iter()
            .map(|room| RoomId::new(room.as_str()).with_context(|| format!("invalid room {room:?}")))
            .collect::<Result<Vec<_>>>()?;

        Ok(ScheduleConfig {
            number_of_schedules: self.schedules,
            periods,
            rooms,
            number_of_days: self.days,
            coverage_threshold: self.coverage_threshold,
            shuffle_topics: self.shuffle_topics,
            seed: self.seed,
        })
    }
}

/// Returns the platform-specific config directory for pres.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("pres"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pres_core::PeriodId;

    #[test]
    fn test_dirs_config_path_ends_with_pres() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "pres");
    }

    #[test]
    fn test_default_config_matches_engine_defaults() {
        let config = Config::default().schedule_config().unwrap();
        let engine = ScheduleConfig::default();
        assert_eq!(config.periods, engine.periods);
        assert_eq!(config.number_of_schedules, engine.number_of_schedules);
        assert_eq!(config.number_of_days, engine.number_of_days);
        assert_eq!(config.coverage_threshold, engine.coverage_threshold);
    }

    #[test]
    fn test_load_from_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "rooms = [\"101\", \"102\"]\nperiods = \"3,4\"\ndays = 2\n",
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.rooms, ["101", "102"]);
        assert_eq!(config.days, 2);
        assert_eq!(
            config.schedule_config().unwrap().periods,
            [PeriodId::new("3").unwrap(), PeriodId::new("4").unwrap()]
        );
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = Config {
            rooms: vec!["101".to_string()],
            ..Config::default()
        };
        config.apply(&ScheduleArgs {
            rooms: vec!["A".to_string(), "B".to_string()],
            days: Some(3),
            seed: Some(9),
            ..ScheduleArgs::default()
        });

        assert_eq!(config.rooms, ["A", "B"]);
        assert_eq!(config.days, 3);
        assert_eq!(config.periods, "2-6");
        assert!(config.shuffle_topics);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_blank_room_is_rejected() {
        let config = Config {
            rooms: vec!["  ".to_string()],
            ..Config::default()
        };
        let err = config.schedule_config().unwrap_err();
        assert!(err.to_string().contains("invalid room"));
    }
}
