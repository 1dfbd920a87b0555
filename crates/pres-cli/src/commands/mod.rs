//! CLI subcommand implementations.

pub mod calendar;
pub mod export;
pub mod generate;
pub mod prompt;
pub mod util;
