use std::fmt;
use std::path::PathBuf;

use storage::{Dataset, JsonFileSource, QuestionSource, sample_dataset};

#[derive(Debug, Clone)]
struct Args {
    out: PathBuf,
    title: Option<String>,
    force: bool,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidOut { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidOut { raw } => write!(f, "invalid --out value: {raw:?}"),
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
        let mut out = std::env::var("QUIZ_DATASET").unwrap_or_else(|_| "quiz.json".into());
        let mut title = None;
        let mut force = false;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--out" => {
                    let value = require_value(&mut args, "--out")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidOut { raw: value });
                    }
                    out = value;
                }
                "--title" => {
                    title = Some(require_value(&mut args, "--title")?);
                }
                "--force" => force = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            out: PathBuf::from(out),
            title,
            force,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Writes the bundled sample quiz as a JSON dataset.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --out <path>              Output file (default: quiz.json)");
    eprintln!("  --title <text>            Override the dataset title");
    eprintln!("  --force                   Overwrite an existing file");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  QUIZ_DATASET");
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    if args.out.exists() && !args.force {
        return Err(format!(
            "{} already exists (pass --force to overwrite)",
            args.out.display()
        )
        .into());
    }

    let sample = sample_dataset();
    let dataset = Dataset::new(args.title.or(sample.title), sample.questions);
    JsonFileSource::write(&args.out, &dataset)?;

    // Round-trip through the loader before reporting success.
    let bank = JsonFileSource::new(&args.out).load_bank()?;

    println!(
        "Wrote {} questions to {}",
        bank.len(),
        args.out.display()
    );
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
