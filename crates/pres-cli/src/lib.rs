//! Presentation scheduler CLI library.
//!
//! This crate provides the CLI interface for the presentation scheduler.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, GenerateArgs, ScheduleArgs};
pub use config::Config;
