// rrule-calc command line
// Expands one recurrence rule and prints its occurrences

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use rrule_calc::services::recurrence::{expand, RecurrenceRequest};
use rrule_calc::services::settings::SettingsService;

/// Expand an iCalendar RRULE into concrete occurrence dates.
#[derive(Debug, Parser)]
#[command(name = "rrule-calc", version, about)]
struct Cli {
    /// Recurrence rule, e.g. "FREQ=WEEKLY;BYDAY=TU,TH;COUNT=4"
    #[arg(long)]
    rule: String,

    /// First occurrence, e.g. "1997-09-02 09:00:00" or 19970902T090000
    #[arg(long)]
    start: String,

    /// Last date to consider; a bare date covers the whole day
    #[arg(long)]
    end: Option<String>,

    /// IANA timezone of start and end (defaults to the settings file)
    #[arg(long = "tz")]
    timezone: Option<String>,

    /// Date to leave out (repeatable)
    #[arg(long = "exdate")]
    exceptions: Vec<String>,

    /// Extra date to include (repeatable)
    #[arg(long = "rdate")]
    additions: Vec<String>,

    /// Settings file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print a JSON array instead of one occurrence per line
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();
    let settings = SettingsService::load_or_default(cli.config.as_deref())?;

    let request = RecurrenceRequest {
        rule: cli.rule,
        start: Some(cli.start),
        end: cli.end,
        timezone: cli.timezone,
        exceptions: cli.exceptions,
        additions: cli.additions,
    };

    let occurrences = expand(&request, &settings);
    log::info!(
        "Expanded '{}' into {} occurrences",
        request.rule,
        occurrences.len()
    );

    if cli.json {
        let json = serde_json::to_string_pretty(&occurrences)
            .context("Failed to serialize occurrences")?;
        println!("{}", json);
    } else {
        for occurrence in &occurrences {
            println!("{}", occurrence);
        }
    }

    Ok(())
}
