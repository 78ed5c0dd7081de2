use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use quiz_core::DEFAULT_SAMPLE_SIZE;

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidSampleSize { raw: String },
    InvalidPause { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidSampleSize { raw } => {
                write!(f, "invalid --sample-size value (expected 1 or more): {raw}")
            }
            ArgsError::InvalidPause { raw } => write!(f, "invalid --pause-ms value: {raw}"),
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

fn parse_sample_size(raw: &str) -> Result<usize, ArgsError> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ArgsError::InvalidSampleSize { raw: raw.to_owned() })
}

/// Where unit question files come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionOrigin {
    Dir(PathBuf),
    Http(String),
}

/// Where the best score is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreStore {
    Sqlite(String),
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play,
    HighScore,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "high-score" => Some(Self::HighScore),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub command: Command,
    pub questions: QuestionOrigin,
    pub store: ScoreStore,
    pub sample_size: usize,
    /// How long answer feedback stays up before the next question.
    pub feedback_pause: Duration,
}

/// Outcome of parsing the command line.
#[derive(Debug, PartialEq, Eq)]
pub enum Parsed {
    Run(Config),
    Help,
}

impl Config {
    /// Build the config from environment defaults, then apply CLI flags.
    ///
    /// Recognized environment: `QUIZ_DB_URL`, `QUIZ_QUESTIONS_DIR`,
    /// `QUIZ_BASE_URL`, `QUIZ_SAMPLE_SIZE`.
    pub fn parse(
        env: impl Fn(&str) -> Option<String>,
        args: impl IntoIterator<Item = String>,
    ) -> Result<Parsed, ArgsError> {
        let mut args = args.into_iter().peekable();
        let command = match args.peek().map(String::as_str) {
            Some(first) if !first.starts_with('-') => {
                let cmd = Command::from_arg(first)
                    .ok_or_else(|| ArgsError::UnknownArg(first.to_owned()))?;
                args.next();
                cmd
            }
            _ => Command::Play,
        };

        let mut db_url = env("QUIZ_DB_URL")
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| "sqlite://quiz.sqlite3".into(), normalize_sqlite_url);
        let mut questions = match env("QUIZ_BASE_URL").filter(|v| !v.trim().is_empty()) {
            Some(url) => QuestionOrigin::Http(url),
            None => QuestionOrigin::Dir(
                env("QUIZ_QUESTIONS_DIR").map_or_else(|| PathBuf::from("."), PathBuf::from),
            ),
        };
        let mut sample_size = match env("QUIZ_SAMPLE_SIZE") {
            Some(raw) => parse_sample_size(&raw)?,
            None => DEFAULT_SAMPLE_SIZE,
        };
        let mut memory = false;
        let mut feedback_pause = Duration::from_millis(2000);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--memory" => memory = true,
                "--questions" => {
                    let value = require_value(&mut args, "--questions")?;
                    questions = QuestionOrigin::Dir(PathBuf::from(value));
                }
                "--base-url" => {
                    let value = require_value(&mut args, "--base-url")?;
                    questions = QuestionOrigin::Http(value);
                }
                "--sample-size" => {
                    let value = require_value(&mut args, "--sample-size")?;
                    sample_size = parse_sample_size(&value)?;
                }
                "--pause-ms" => {
                    let value = require_value(&mut args, "--pause-ms")?;
                    let millis: u64 = value
                        .trim()
                        .parse()
                        .map_err(|_| ArgsError::InvalidPause { raw: value.clone() })?;
                    feedback_pause = Duration::from_millis(millis);
                }
                "--help" | "-h" => return Ok(Parsed::Help),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let store = if memory {
            ScoreStore::Memory
        } else {
            ScoreStore::Sqlite(db_url)
        };

        Ok(Parsed::Run(Self {
            command,
            questions,
            store,
            sample_size,
            feedback_pause,
        }))
    }
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [play]     [options]");
    eprintln!("  cargo run -p app -- high-score [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --questions <dir>     Root containing questions/<subject>/<unit>.json (default: .)");
    eprintln!("  --base-url <url>      Fetch question files over HTTP instead");
    eprintln!("  --db <sqlite_url>     High score database (default: sqlite://quiz.sqlite3)");
    eprintln!("  --memory              Keep the high score in memory only");
    eprintln!("  --sample-size <n>     Questions per session (default: 10)");
    eprintln!("  --pause-ms <ms>       Feedback pause before the next question (default: 2000)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_QUESTIONS_DIR, QUIZ_BASE_URL, QUIZ_SAMPLE_SIZE, RUST_LOG");
}

fn normalize_sqlite_url(raw: String) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Make sure the database file and its directory exist before connecting.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    fn run_config(parsed: Parsed) -> Config {
        match parsed {
            Parsed::Run(config) => config,
            Parsed::Help => panic!("expected run config"),
        }
    }

    #[test]
    fn defaults_without_env_or_flags() {
        let config = run_config(Config::parse(no_env, Vec::new()).unwrap());
        assert_eq!(config.command, Command::Play);
        assert_eq!(config.questions, QuestionOrigin::Dir(PathBuf::from(".")));
        assert_eq!(
            config.store,
            ScoreStore::Sqlite("sqlite://quiz.sqlite3".into())
        );
        assert_eq!(config.sample_size, DEFAULT_SAMPLE_SIZE);
        assert_eq!(config.feedback_pause, Duration::from_millis(2000));
    }

    #[test]
    fn env_then_flags() {
        let env = |key: &str| match key {
            "QUIZ_BASE_URL" => Some("https://example.com/quiz".to_string()),
            "QUIZ_SAMPLE_SIZE" => Some("5".to_string()),
            _ => None,
        };
        let config = run_config(
            Config::parse(env, args(&["play", "--sample-size", "3", "--memory", "--pause-ms", "0"]))
                .unwrap(),
        );
        assert_eq!(
            config.questions,
            QuestionOrigin::Http("https://example.com/quiz".into())
        );
        assert_eq!(config.sample_size, 3);
        assert_eq!(config.store, ScoreStore::Memory);
        assert_eq!(config.feedback_pause, Duration::ZERO);
    }

    #[test]
    fn high_score_subcommand() {
        let config = run_config(
            Config::parse(no_env, args(&["high-score", "--db", "sqlite://scores.db"])).unwrap(),
        );
        assert_eq!(config.command, Command::HighScore);
        assert_eq!(config.store, ScoreStore::Sqlite("sqlite://scores.db".into()));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            Config::parse(no_env, args(&["--sample-size", "0"])).unwrap_err(),
            ArgsError::InvalidSampleSize { raw: "0".into() }
        );
        assert_eq!(
            Config::parse(no_env, args(&["--db"])).unwrap_err(),
            ArgsError::MissingValue { flag: "--db" }
        );
        assert_eq!(
            Config::parse(no_env, args(&["dance"])).unwrap_err(),
            ArgsError::UnknownArg("dance".into())
        );
        assert_eq!(Config::parse(no_env, args(&["-h"])).unwrap(), Parsed::Help);
    }
}
