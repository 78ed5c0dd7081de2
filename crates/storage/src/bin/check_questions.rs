use std::fmt;
use std::path::PathBuf;

use quiz_core::model::{Catalog, SubjectId};
use storage::fs::FsQuestionSource;
use storage::repository::{QuestionSource, SourceError};

#[derive(Debug, Clone)]
struct Args {
    root: PathBuf,
    subject: Option<SubjectId>,
    allow_missing: bool,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSubject { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSubject { raw } => write!(f, "invalid --subject value: {raw}"),
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
        let mut root = std::env::var("QUIZ_QUESTIONS_DIR").map_or_else(|_| PathBuf::from("."), PathBuf::from);
        let mut subject = None;
        let mut allow_missing = false;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--questions" => {
                    root = PathBuf::from(require_value(&mut args, "--questions")?);
                }
                "--subject" => {
                    let value = require_value(&mut args, "--subject")?;
                    let parsed = SubjectId::new(value.trim())
                        .map_err(|_| ArgsError::InvalidSubject { raw: value.clone() })?;
                    subject = Some(parsed);
                }
                "--allow-missing" => allow_missing = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            root,
            subject,
            allow_missing,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin check-questions -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --questions <dir>   Directory containing questions/<subject>/<unit>.json (default: .)");
    eprintln!("  --subject <id>      Only check one subject");
    eprintln!("  --allow-missing     Do not fail on units without a file");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_QUESTIONS_DIR");
}

async fn run() -> Result<bool, Box<dyn std::error::Error>> {
    let args = Args::parse().inspect_err(|_| print_usage())?;
    let catalog = Catalog::builtin();
    let source = FsQuestionSource::new(&args.root);
    println!("checking question files under {}", source.root().display());

    let mut ok = true;
    for subject in catalog.subjects() {
        if args.subject.as_ref().is_some_and(|only| only != subject.id()) {
            continue;
        }
        for unit in subject.units() {
            match source.fetch(unit).await {
                Ok(set) => println!("ok       {:<40} {} questions", unit.resource(), set.len()),
                Err(SourceError::NotFound { .. }) if args.allow_missing => {
                    println!("missing  {}", unit.resource());
                }
                Err(err) => {
                    ok = false;
                    println!("error    {err}");
                }
            }
        }
    }

    Ok(ok)
}

#[tokio::main]
async fn main() {
    match run().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    }
}
