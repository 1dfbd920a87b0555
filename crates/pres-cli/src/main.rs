use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pres_cli::commands::generate::{self, Output};
use pres_cli::commands::prompt::PromptResolver;
use pres_cli::commands::{calendar, export, util};
use pres_cli::{Cli, Commands, Config, ScheduleArgs};
use pres_core::{
    AssignmentChoice, AssignmentPrompt, AutomaticAssignment, ManualAssignment, ScheduleConfig,
    ScheduleError, ScheduleSet,
};

/// Load config and merge command-line overrides into an engine configuration.
fn load_config(config_path: Option<&Path>, args: &ScheduleArgs) -> Result<ScheduleConfig> {
    let mut config = Config::load_from(config_path).context("failed to load configuration")?;
    config.apply(args);
    tracing::debug!(?config, "loaded configuration");
    config.schedule_config()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so `--json` and `export` output stays clean
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let stdout = io::stdout();
    match &cli.command {
        Some(Commands::Generate(args)) => {
            let config = load_config(cli.config.as_deref(), &args.schedule)?;
            let participants = util::read_participants(&args.participants)?;
            let output = if args.json {
                Output::Json
            } else {
                Output::Csv(args.out.clone())
            };

            let mut writer = stdout.lock();
            if let Some(path) = &args.manual {
                let manual: ManualAssignment = util::read_json(path)?;
                let mut resolver = |_: &AssignmentPrompt<'_>| -> Result<AssignmentChoice, ScheduleError> {
                    Ok(AssignmentChoice::Manual(manual.clone()))
                };
                generate::run(&mut writer, &participants, &config, &mut resolver, &output)?;
            } else if args.interactive {
                // Questions go to stderr so they never mix with JSON output
                let mut resolver = PromptResolver::new(io::stdin().lock(), io::stderr());
                generate::run(&mut writer, &participants, &config, &mut resolver, &output)?;
            } else {
                generate::run(
                    &mut writer,
                    &participants,
                    &config,
                    &mut AutomaticAssignment,
                    &output,
                )?;
            }
            writer.flush()?;
        }
        Some(Commands::Calendar {
            participants,
            schedule,
        }) => {
            let config = load_config(cli.config.as_deref(), schedule)?;
            let participants = util::read_participants(participants)?;
            calendar::run(&mut stdout.lock(), &participants, &config)?;
        }
        Some(Commands::Export {
            set,
            schedule,
            placements,
            out,
        }) => {
            let set: ScheduleSet = util::read_json(set)?;
            let placements = placements.as_deref().map(util::read_json).transpose()?;
            match out {
                Some(path) => {
                    let mut file = std::fs::File::create(path)
                        .with_context(|| format!("failed to create {}", path.display()))?;
                    export::run(&mut file, set, *schedule, placements)?;
                }
                None => export::run(&mut stdout.lock(), set, *schedule, placements)?,
            }
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
