use std::fmt;
use std::io;
use std::path::PathBuf;

use services::QuizService;
use storage::{InMemorySource, JsonFileSource, sample_dataset};
use tracing_subscriber::EnvFilter;

mod console;

use console::Console;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDataset { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDataset { raw } => write!(f, "invalid --dataset value: {raw:?}"),
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

struct Args {
    dataset: Option<PathBuf>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut dataset = std::env::var("QUIZ_DATASET")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--dataset" | "-d" => {
                    let value = require_value(args, "--dataset")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDataset { raw: value });
                    }
                    dataset = Some(PathBuf::from(value));
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { dataset })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--dataset <path>]");
    eprintln!();
    eprintln!("Without a dataset the bundled sample quiz is used.");
    eprintln!("Create an editable copy with `cargo run -p storage --bin seed`.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DATASET   dataset path (overridden by --dataset)");
    eprintln!("  RUST_LOG       log filter (default: info)");
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(&mut std::env::args().skip(1)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // An integrity failure aborts startup; no session is opened.
    let service = match &args.dataset {
        Some(path) => QuizService::load(&JsonFileSource::new(path))?,
        None => {
            tracing::info!("no dataset given, using the bundled sample");
            QuizService::load(&InMemorySource::new(sample_dataset()))?
        }
    };

    let session = service.start_session();
    let stdin = io::stdin();
    let mut console = Console::new(session, stdin.lock(), io::stdout());
    console.run(service.title())?;
    Ok(())
}

fn main() {
    // stdout belongs to the quiz; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
