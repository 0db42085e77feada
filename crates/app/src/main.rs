use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use quiz_core::catalog::{BuiltinQuestionBank, THEMES, theme_by_id};
use quiz_core::model::{Locale, Subject};
use services::report::ExportFormat;
use services::{AppServices, Clock, DEFAULT_TIME_LIMIT_SECS};
use storage::repository::Storage;

mod terminal;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingSubject,
    UnknownArg(String),
    UnknownCommand(String),
    InvalidDbUrl { raw: String },
    InvalidWeek { raw: String },
    InvalidTimeLimit { raw: String },
    InvalidSubject { raw: String },
    InvalidLocale { raw: String },
    InvalidTheme { raw: String },
    InvalidFormat { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingSubject => write!(f, "quiz requires --subject"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidWeek { raw } => write!(f, "invalid --week value: {raw}"),
            ArgsError::InvalidTimeLimit { raw } => write!(f, "invalid --time-limit value: {raw}"),
            ArgsError::InvalidSubject { raw } => {
                write!(f, "invalid --subject value (reading, spelling, grammar, math): {raw}")
            }
            ArgsError::InvalidLocale { raw } => write!(f, "invalid --locale value (en, de): {raw}"),
            ArgsError::InvalidTheme { raw } => {
                let known: Vec<&str> = THEMES.iter().map(|theme| theme.id).collect();
                write!(f, "invalid --theme value ({}): {raw}", known.join(", "))
            }
            ArgsError::InvalidFormat { raw } => write!(f, "invalid --format value (json, html): {raw}"),
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz quiz    --subject <s> [--week <n>] [--theme <id>] [--locale en|de] [--time-limit <secs>] [--db <url>]");
    eprintln!("  quiz report  [--format json|html] [--out <path>|-] [--week <n>] [--db <url>]");
    eprintln!("  quiz history [--week <n>] [--db <url>]");
    eprintln!();
    eprintln!("Common flags:");
    eprintln!("  -v, --verbose             Log progress at info level");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://progress.sqlite3");
    eprintln!("  --week 1");
    eprintln!("  --theme <the theme the week rotates to>");
    eprintln!("  --time-limit {DEFAULT_TIME_LIMIT_SECS}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_WEEK, QUIZ_THEME, QUIZ_LOCALE, QUIZ_LOG (tracing filter)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Quiz,
    Report,
    History,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "quiz" => Some(Self::Quiz),
            "report" | "export" => Some(Self::Report),
            "history" => Some(Self::History),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Args {
    db_url: String,
    week: u32,
    week_given: bool,
    locale: Locale,
    verbose: bool,
    subject: Option<Subject>,
    theme_id: Option<String>,
    time_limit: u32,
    format: ExportFormat,
    out: Option<PathBuf>,
}

impl Args {
    fn parse(cmd: Command, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("QUIZ_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://progress.sqlite3".into(), normalize_sqlite_url);
        let mut week = std::env::var("QUIZ_WEEK")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|week| *week > 0)
            .unwrap_or(1);
        let mut locale = std::env::var("QUIZ_LOCALE")
            .ok()
            .and_then(|value| value.parse::<Locale>().ok())
            .unwrap_or_default();
        let mut theme_id = std::env::var("QUIZ_THEME")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let mut week_given = false;
        let mut verbose = false;
        let mut subject = None;
        let mut time_limit = DEFAULT_TIME_LIMIT_SECS;
        let mut format = ExportFormat::Json;
        let mut out = None;

        while let Some(arg) = args.next() {
            match (cmd, arg.as_str()) {
                (_, "--db") => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                (_, "--week") => {
                    let value = require_value(args, "--week")?;
                    week = value
                        .parse::<u32>()
                        .ok()
                        .filter(|week| *week > 0)
                        .ok_or(ArgsError::InvalidWeek { raw: value.clone() })?;
                    week_given = true;
                }
                (_, "--verbose" | "-v") => verbose = true,
                (Command::Quiz, "--subject") => {
                    let value = require_value(args, "--subject")?;
                    let parsed = value
                        .parse::<Subject>()
                        .map_err(|_| ArgsError::InvalidSubject { raw: value.clone() })?;
                    subject = Some(parsed);
                }
                (Command::Quiz, "--theme") => {
                    let value = require_value(args, "--theme")?;
                    if theme_by_id(&value).is_none() {
                        return Err(ArgsError::InvalidTheme { raw: value });
                    }
                    theme_id = Some(value);
                }
                (Command::Quiz, "--locale") => {
                    let value = require_value(args, "--locale")?;
                    locale = value
                        .parse::<Locale>()
                        .map_err(|_| ArgsError::InvalidLocale { raw: value.clone() })?;
                }
                (Command::Quiz, "--time-limit") => {
                    let value = require_value(args, "--time-limit")?;
                    time_limit = value
                        .parse::<u32>()
                        .ok()
                        .filter(|secs| *secs > 0)
                        .ok_or(ArgsError::InvalidTimeLimit { raw: value.clone() })?;
                }
                (Command::Report, "--format") => {
                    let value = require_value(args, "--format")?;
                    format = value
                        .parse::<ExportFormat>()
                        .map_err(|_| ArgsError::InvalidFormat { raw: value.clone() })?;
                }
                (Command::Report, "--out") => {
                    let value = require_value(args, "--out")?;
                    out = Some(PathBuf::from(value));
                }
                (_, "--help" | "-h") => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if cmd == Command::Quiz && subject.is_none() {
            return Err(ArgsError::MissingSubject);
        }

        Ok(Self {
            db_url,
            week,
            week_given,
            locale,
            verbose,
            subject,
            theme_id,
            time_limit,
            format,
            out,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let level = if verbose { "info" } else { "warn" };

    let filter = tracing_subscriber::EnvFilter::try_from_env("QUIZ_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| format!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);

    let cmd = match argv.next() {
        None => {
            print_usage();
            return Ok(());
        }
        Some(first) if matches!(first.as_str(), "--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) => Command::from_arg(&first).ok_or_else(|| {
            print_usage();
            ArgsError::UnknownCommand(first)
        })?,
    };

    let args = Args::parse(cmd, &mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    init_tracing(args.verbose)?;

    // Open + migrate SQLite at startup. The ledger is loaded exactly once here.
    prepare_sqlite_file(&args.db_url)?;
    let storage = Storage::sqlite(&args.db_url).await?;
    let clock = Clock::default_clock();
    let mut app = AppServices::from_storage(&storage, clock, Arc::new(BuiltinQuestionBank::new()))
        .await?
        .with_time_limit(args.time_limit);

    match cmd {
        Command::Quiz => {
            let subject = args.subject.ok_or(ArgsError::MissingSubject)?;
            let theme = app
                .quiz_loop()
                .resolve_theme(args.week, args.theme_id.as_deref())?;
            terminal::run_quiz(&mut app, args.week, theme, subject, args.locale).await
        }
        Command::Report => export_report(&app, &args).await,
        Command::History => {
            print_history(&app, args.week_given.then_some(args.week));
            Ok(())
        }
    }
}

async fn export_report(app: &AppServices, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let report = app
        .reports()
        .export(app.ledger().all(), args.week, args.format)?;

    match args.out.as_deref() {
        Some(path) if path.as_os_str() == "-" => println!("{}", report.body),
        Some(path) => {
            tokio::fs::write(path, report.body.as_bytes()).await?;
            println!("Wrote {} ({})", path.display(), report.mime_type);
        }
        None => {
            tokio::fs::write(&report.file_name, report.body.as_bytes()).await?;
            println!("Wrote {} ({})", report.file_name, report.mime_type);
        }
    }
    Ok(())
}

fn print_history(app: &AppServices, week: Option<u32>) {
    let ledger = app.ledger();
    let entries: Vec<_> = match week {
        Some(week) => ledger.for_week(week).cloned().collect(),
        None => ledger.all().to_vec(),
    };

    if entries.is_empty() {
        println!("No sessions recorded yet.");
        return;
    }

    for entry in &entries {
        println!(
            "Week {} - {} | {} | Accuracy: {:.1}% ({}/{}) | Focus Area: {}",
            entry.week(),
            entry.theme_name(),
            entry.date(),
            entry.accuracy(),
            entry.correct_answers(),
            entry.total_questions(),
            entry.focus_area().label(),
        );
    }

    let summary = app.reports().summary(&entries);
    println!();
    println!(
        "{} sessions, {} questions, overall accuracy {:.1}%",
        summary.total_sessions, summary.total_questions, summary.overall_accuracy
    );
    for line in summary.recommendation_lines() {
        println!("• {line}");
    }
}

#[tokio::main]
async fn main() {
    // Exit explicitly: a pending stdin read would otherwise hold runtime shutdown.
    let code = match run().await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            2
        }
    };
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(cmd: Command, raw: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = raw.iter().map(|s| (*s).to_owned());
        Args::parse(cmd, &mut iter)
    }

    #[test]
    fn quiz_requires_subject() {
        assert!(matches!(parse(Command::Quiz, &[]), Err(ArgsError::MissingSubject)));
        let args = parse(Command::Quiz, &["--subject", "Math", "--week", "4"]).unwrap();
        assert_eq!(args.subject, Some(Subject::Math));
        assert_eq!(args.week, 4);
        assert!(args.week_given);
    }

    #[test]
    fn theme_is_chosen_apart_from_week() {
        let args = parse(
            Command::Quiz,
            &["--subject", "reading", "--week", "2", "--theme", "taylor-swift"],
        )
        .unwrap();
        assert_eq!(args.week, 2);
        assert_eq!(args.theme_id.as_deref(), Some("taylor-swift"));

        assert!(matches!(
            parse(Command::Quiz, &["--subject", "math", "--theme", "jungle"]),
            Err(ArgsError::InvalidTheme { .. })
        ));
        assert!(matches!(
            parse(Command::Report, &["--theme", "taylor-swift"]),
            Err(ArgsError::UnknownArg(_))
        ));
    }

    #[test]
    fn flags_are_scoped_to_their_command() {
        assert!(matches!(
            parse(Command::History, &["--format", "html"]),
            Err(ArgsError::UnknownArg(_))
        ));
        let args = parse(Command::Report, &["--format", "html", "--out", "-"]).unwrap();
        assert_eq!(args.format, ExportFormat::Html);
        assert_eq!(args.out, Some(PathBuf::from("-")));
    }

    #[test]
    fn rejects_week_zero() {
        assert!(matches!(
            parse(Command::Report, &["--week", "0"]),
            Err(ArgsError::InvalidWeek { .. })
        ));
    }

    #[test]
    fn relative_sqlite_paths_become_absolute() {
        let url = normalize_sqlite_url("sqlite:data/progress.sqlite3".into());
        assert!(url.starts_with("sqlite://"));
        assert!(url.ends_with("data/progress.sqlite3"));
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), "sqlite::memory:");
    }
}
