//! `sejour` CLI: check booking drafts, tariff grids and stay durations.
//!
//! ## Usage
//!
//! ```sh
//! # Nights and hours of a stay
//! sejour duration --from 2024-07-10 --to 2024-07-13
//! sejour duration --from 2024-07-10 --from-time 10:00 --to 2024-07-10 --to-time 11:30
//!
//! # Absolute hours across a DST change
//! sejour duration --from 2024-03-31 --from-time 01:00 --to 2024-03-31 --to-time 04:00 \
//!   --timezone Europe/Paris
//!
//! # Build a draft from a file and report each stay
//! sejour check-draft -i booking.json
//!
//! # ... and print the submission payload
//! sejour check-draft -i booking.json --payload
//!
//! # Weekdays a new tariff detail would steal from a grid
//! sejour check-tariff -i tariff.json --days 3,4
//!
//! # Local price estimate
//! sejour --config engine.json estimate -i booking.json
//! ```

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::io::{self, Read};
use std::process;
use tracing::{debug, warn};

use sejour_engine::draft::Inventory;
use sejour_engine::tariff::DetailIssue;
use sejour_engine::{
    BookingDraft, ClockPolicy, DateRange, EngineConfig, GuestInfo, SejourError, StayInput, Tariff,
    WeekdaySet,
};

#[derive(Parser)]
#[command(
    name = "sejour",
    version,
    about = "Stay duration, room overlap and tariff conflict checks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log more (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the nights and hours between two dates
    Duration {
        /// Arrival date (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,
        /// Departure date (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,
        /// Arrival time (HH:MM)
        #[arg(long, value_parser = parse_time)]
        from_time: Option<NaiveTime>,
        /// Departure time (HH:MM)
        #[arg(long, value_parser = parse_time)]
        to_time: Option<NaiveTime>,
        /// Measure hours as absolute time in this IANA timezone
        #[arg(long)]
        timezone: Option<String>,
    },
    /// Build a booking draft from a JSON file and report each stay
    CheckDraft {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Print the submission payload after the report
        #[arg(long)]
        payload: bool,
        /// Fail if any stay is rejected
        #[arg(long)]
        strict: bool,
    },
    /// Report weekdays a candidate detail shares with a tariff grid
    CheckTariff {
        /// Tariff grid file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Candidate weekdays, 1 = Monday .. 7 = Sunday (e.g. "3,4")
        #[arg(long)]
        days: String,
        /// Id of the detail being edited, excluded from the check
        #[arg(long)]
        detail_id: Option<i64>,
    },
    /// Print the local HT/VAT/TTC estimate of a booking file
    Estimate {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

/// A booking file: guest, the rooms and tariffs to check against, and the
/// stay forms in the order they were entered.
#[derive(Deserialize)]
struct BookingFile {
    #[serde(default)]
    guest: GuestInfo,
    #[serde(flatten)]
    inventory: Inventory,
    #[serde(default)]
    stays: Vec<StayInput>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Duration {
            from,
            to,
            from_time,
            to_time,
            timezone,
        } => {
            let clock = match timezone.as_deref() {
                Some(tz) => ClockPolicy::zoned(tz)?,
                None => config.hour_clock,
            };
            let (nights, hours) = match DateRange::new(from, to, from_time, to_time) {
                Ok(range) => (
                    sejour_engine::nights(&range),
                    sejour_engine::hours_with(&range, clock),
                ),
                Err(err) => {
                    warn!(%err, "incomplete stay, nothing to count");
                    (0, 0)
                }
            };
            println!("nights: {}", nights);
            println!("hours:  {}", hours);
        }
        Commands::CheckDraft {
            input,
            payload,
            strict,
        } => {
            let file = read_booking(input.as_deref())?;
            let (draft, rejected) = build_draft(file, config);

            if strict && rejected > 0 {
                anyhow::bail!("{} stay(s) rejected", rejected);
            }
            if payload {
                let submission = draft
                    .submission()
                    .context("Draft cannot be submitted")?;
                println!("{}", serde_json::to_string_pretty(&submission)?);
            }
        }
        Commands::CheckTariff {
            input,
            days,
            detail_id,
        } => {
            let raw = read_input(input.as_deref())?;
            let tariff: Tariff = serde_json::from_str(&raw).context("Invalid tariff JSON")?;
            let candidate = WeekdaySet::from_csv(&days)?;

            match tariff.check_days(candidate, detail_id) {
                None => println!("No conflicts: {} available", candidate.labels()),
                Some(DetailIssue::DayConflict(clash)) => {
                    println!("Conflicting weekdays: {}", clash.labels());
                    process::exit(1);
                }
                Some(issue) => anyhow::bail!("{}", issue),
            }
        }
        Commands::Estimate { input } => {
            let file = read_booking(input.as_deref())?;
            let tariffs = file.inventory.tariffs.clone();
            let (draft, _) = build_draft(file, config);

            let quote = sejour_engine::estimate(&draft, &tariffs);
            println!("HT:   {}", quote.totals.ht);
            println!("VAT:  {}", quote.totals.vat);
            println!("TTC:  {}", quote.totals.ttc);
            if !quote.complete {
                println!("(estimate incomplete: some units have no price)");
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path))?;
            EngineConfig::from_json(&raw).with_context(|| format!("Invalid config: {}", path))
        }
        None => Ok(EngineConfig::default()),
    }
}

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|e| format!("expected HH:MM, got '{}': {}", s, e))
}

fn read_booking(path: Option<&str>) -> Result<BookingFile> {
    let raw = read_input(path)?;
    serde_json::from_str(&raw).context("Invalid booking JSON")
}

/// Add each stay form in order, printing one line per form. Returns the
/// draft and the number of rejected forms.
fn build_draft(file: BookingFile, config: EngineConfig) -> (BookingDraft, usize) {
    let mut draft = BookingDraft::new(file.guest, config);
    let total = file.stays.len();
    let mut rejected = 0;

    for (index, input) in file.stays.into_iter().enumerate() {
        let number = index + 1;
        match draft.add_stay(input, &file.inventory) {
            Ok(ids) => {
                let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
                println!("stay {}: accepted as {}", number, ids.join(", "));
            }
            Err(SejourError::StayRejected(issues)) => {
                rejected += 1;
                println!("stay {}: rejected", number);
                for issue in issues {
                    println!("  {}: {}", issue.field(), issue);
                }
            }
            Err(other) => {
                rejected += 1;
                warn!(stay = number, %other, "stay could not be added");
                println!("stay {}: rejected ({})", number, other);
            }
        }
    }

    debug!(stays = draft.len(), rejected, "draft built");
    println!("{} of {} stay form(s) accepted", total - rejected, total);
    (draft, rejected)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
