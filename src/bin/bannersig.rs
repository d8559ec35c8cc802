//! CLI for bannersig - annotates a banner workbook and writes `<stem>_processed.xlsx`
//!
//! Usage:
//!   bannersig <input.xlsx>                       # output next to the input
//!   bannersig <input.xlsx> -o out.xlsx           # explicit output path
//!   bannersig <input.xlsx> --report report.json  # also write the run report

use std::path::PathBuf;
use std::process::ExitCode;

use bannersig::{process_file, AnalysisConfig, ProcessingError};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(about = "Mark significant differences in survey banner tables.", version)]
struct Args {
    /// Banner workbook to process.
    input: PathBuf,

    /// Output workbook (default: `<input stem>_processed.xlsx` next to the input).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file overriding analysis settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the run report as JSON to this file.
    #[arg(long)]
    report: Option<PathBuf>,
}

fn run(args: &Args) -> Result<(), ProcessingError> {
    let config = match &args.config {
        Some(path) => AnalysisConfig::from_json_file(path)?,
        None => AnalysisConfig::default(),
    };

    let report = process_file(&args.input, args.output.as_deref(), &config)?;

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)?;
    }
    for failure in report.failures() {
        eprintln!("skipped {failure}");
    }
    if let Some(output) = &report.output {
        println!("{}", output.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(input = %args.input.display(), %err, "processing failed");
            if let ProcessingError::NoSheetsProcessed { failures } = &err {
                for failure in failures {
                    eprintln!("  {failure}");
                }
            }
            ExitCode::FAILURE
        }
    }
}
