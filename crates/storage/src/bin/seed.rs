use std::fmt;

use chrono::{Duration, NaiveDate, Utc};
use quiz_core::catalog::theme_for_week;
use quiz_core::model::{ProgressEntry, QuizSummary, Subject};
use storage::repository::Storage;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    weeks: u32,
    today: Option<NaiveDate>,
    append: bool,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidWeeks { raw: String },
    InvalidToday { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidWeeks { raw } => write!(f, "invalid --weeks value: {raw}"),
            ArgsError::InvalidToday { raw } => {
                write!(f, "invalid --today value (expected YYYY-MM-DD): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("QUIZ_DB_URL").unwrap_or_else(|_| "sqlite://progress.sqlite3?mode=rwc".into());
        let mut weeks = std::env::var("QUIZ_SEED_WEEKS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(3);
        let mut today = None;
        let mut append = false;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--weeks" => {
                    let value = require_value(&mut args, "--weeks")?;
                    weeks = value
                        .parse::<u32>()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or(ArgsError::InvalidWeeks { raw: value.clone() })?;
                }
                "--today" => {
                    let value = require_value(&mut args, "--today")?;
                    let parsed = NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                        .map_err(|_| ArgsError::InvalidToday { raw: value.clone() })?;
                    today = Some(parsed);
                }
                "--append" => append = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            weeks,
            today,
            append,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite://progress.sqlite3?mode=rwc)");
    eprintln!("  --weeks <n>               Number of weeks of demo history (default: 3)");
    eprintln!("  --today <yyyy-mm-dd>      Date of the most recent entry");
    eprintln!("  --append                  Keep existing history and add after it");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  QUIZ_DB_URL, QUIZ_SEED_WEEKS");
}

/// One quiz per subject per week, with scores that vary from week to week.
fn demo_history(
    weeks: u32,
    today: NaiveDate,
) -> Result<Vec<ProgressEntry>, quiz_core::error::Error> {
    let mut entries = Vec::new();
    for week in 1..=weeks {
        let theme = theme_for_week(week);
        let week_start = today - Duration::weeks(i64::from(weeks - week));
        for (offset, subject) in Subject::ALL.iter().enumerate() {
            let step = u32::try_from(offset).unwrap_or(0);
            let correct = (week + step * 2) % 6;
            let summary = QuizSummary::from_counts(*subject, correct.min(5), 5)?;
            let date = week_start + Duration::days(i64::from(step));
            entries.push(ProgressEntry::from_summary(&summary, week, theme.name, date));
        }
    }
    Ok(entries)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let today = args.today.unwrap_or_else(|| Utc::now().date_naive());

    let mut history = if args.append {
        storage.progress.load_progress().await?.unwrap_or_default()
    } else {
        Vec::new()
    };
    let seeded = demo_history(args.weeks, today)?;
    let added = seeded.len();
    history.extend(seeded);
    storage.progress.save_progress(&history).await?;

    println!(
        "Seeded {added} progress entries over {} weeks into {} ({} total)",
        args.weeks,
        args.db_url,
        history.len()
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
