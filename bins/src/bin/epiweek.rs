// SPDX-License-Identifier: MIT

//!
//! The EpiCalendar command line tool
//!

use chrono::{Local, NaiveDate};
use clap::{CommandFactory, Parser, ValueEnum, builder::PossibleValue};
use epi_calendar_core::{
    CalendarError, CalendarRules, EpiWeek, EpiWeekCalendar, EpiWeekRange, Preset,
};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, TermLogger, TerminalMode,
};
use std::fs;
use std::path::PathBuf;

#[macro_use]
extern crate log;
extern crate simplelog;

/// EpiCalendar entry point
///
/// One of:
/// - Find the epi-week of a date
/// - Find the dates of an epi-week
/// - Count the weeks between two epi-weeks
/// - Resolve a named period
/// - Count the weeks in an epi-year
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    // Setup logging
    let config_log = ConfigBuilder::new()
        .add_filter_allow_str("epi_calendar")
        .add_filter_allow_str("epiweek")
        .build();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    CombinedLogger::init(vec![TermLogger::new(
        level,
        config_log,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )])?;

    let calendar = EpiWeekCalendar::new(load_rules(&args)?);
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    debug!("Using {:?} with today = {today}", calendar.rules());

    match run(&args, &calendar, today) {
        Ok(Some(output)) => println!("{output}"),
        Ok(None) => {
            eprintln!("CLI Error: invalid options");
            Cli::command().print_long_help()?;
            std::process::exit(1);
        }
        Err(error) => {
            eprintln!("Error: {error}");
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Work out the rules to use (a JSON rules file, ISO, or MMWR by default)
fn load_rules(args: &Cli) -> Result<CalendarRules, Box<dyn std::error::Error>> {
    match (&args.rules, args.iso) {
        (Some(path), _) => {
            info!("Loading rules from {}", path.display());
            let data = fs::read_to_string(path)?;
            let rules: CalendarRules = serde_json::from_str(&data)?;
            info!("Rules loaded = {rules:?}");
            Ok(rules)
        }
        (None, true) => Ok(CalendarRules::iso()),
        (None, false) => Ok(CalendarRules::mmwr()),
    }
}

/// Carry out the command.  `Ok(None)` means the options don't suit the
/// command.
fn run(
    args: &Cli,
    calendar: &EpiWeekCalendar,
    today: NaiveDate,
) -> Result<Option<String>, CalendarError> {
    let output = match (&args.cli_command, args.date, args.year, args.week) {
        //----------------------------------------------------------------------
        // Valid
        //----------------------------------------------------------------------
        (Command::Week, date, None, None) => {
            let week = calendar.epi_week_of(date.unwrap_or(today));
            Some(week.to_string())
        }
        (Command::Dates, None, Some(year), Some(week)) => {
            let dates = calendar.epi_week_to_date_range(year, week)?;
            if !calendar.is_valid(EpiWeek::new(year, week)?) {
                warn!("{year} has no week {week}, the dates are those of the next week");
            }
            Some(format!("{} {}", dates.start, dates.end))
        }
        (Command::Count, None, None, None) => match (args.from, args.to) {
            (Some(from), Some(to)) => {
                let range = EpiWeekRange::new(from, to);
                Some(format!(
                    "{range}: {} weeks (exact: {})",
                    range.week_count(),
                    calendar.exact_week_count(range)
                ))
            }
            _ => None,
        },
        (Command::Preset, None, None, None) => args.preset.map(|preset| {
            let range = calendar.preset_range(preset, today);
            format!("{preset}: {range}")
        }),
        (Command::WeeksInYear, None, Some(year), None) => {
            Some(calendar.weeks_in_year(year).to_string())
        }
        //----------------------------------------------------------------------
        // Invalid
        //----------------------------------------------------------------------
        _ => None,
    };

    Ok(output)
}

/// EpiCalendar CLI args using [clap]
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Epidemiological week calculator",
    after_help = "Weeks are written YYYY-Www (e.g. 2025-W01), dates YYYY-MM-DD"
)]
pub struct Cli {
    // Calendar command
    #[arg(value_enum)]
    pub cli_command: Command,

    /// Calendar date
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Epidemiological year
    #[arg(long)]
    pub year: Option<i32>,

    /// Week number
    #[arg(long)]
    pub week: Option<i64>,

    /// First week of a range
    #[arg(long)]
    pub from: Option<EpiWeek>,

    /// Last week of a range
    #[arg(long)]
    pub to: Option<EpiWeek>,

    /// Named period (e.g. last_4_weeks, respiratory_season)
    #[arg(long)]
    pub preset: Option<Preset>,

    /// Date to treat as today (defaults to the local date)
    #[arg(long)]
    pub today: Option<NaiveDate>,

    /// Path to a JSON rules file
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Use ISO-8601 weeks instead of MMWR weeks
    #[arg(long, conflicts_with = "rules")]
    pub iso: bool,

    /// Log debugging information
    #[arg(long, short)]
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Week,
    Dates,
    Count,
    Preset,
    WeeksInYear,
}

impl ValueEnum for Command {
    fn value_variants<'a>() -> &'a [Self] {
        &[
            Self::Week,
            Self::Dates,
            Self::Count,
            Self::Preset,
            Self::WeeksInYear,
        ]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            Command::Week => Some(
                PossibleValue::new("week").help("Epi-week of --date (default today)"),
            ),
            Command::Dates => Some(
                PossibleValue::new("dates").help("First and last day of --year and --week"),
            ),
            Command::Count => Some(
                PossibleValue::new("count").help("Number of weeks from --from to --to"),
            ),
            Command::Preset => {
                Some(PossibleValue::new("preset").help("Weeks covered by --preset"))
            }
            Command::WeeksInYear => Some(
                PossibleValue::new("weeks-in-year").help("Number of weeks in --year"),
            ),
        }
    }
}
