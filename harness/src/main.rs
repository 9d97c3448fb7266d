mod checks;
mod report;
mod suite;

use clap::{Parser, Subcommand};
use report::Severity;
use std::path::PathBuf;
use std::process::ExitCode;
use suite::{analyze_file, run_suite, SuiteOptions, DEFAULT_NIST_SIZE, DEFAULT_SIZE};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kaos-harness")]
#[command(about = "Statistical test harness for the KAOS keystream")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the fixed test keystream and run the full suite
    Suite {
        /// Keystream bytes to generate
        #[arg(long, default_value_t = DEFAULT_SIZE)]
        size: usize,

        /// Bytes used by the bit-level tests
        #[arg(long, default_value_t = DEFAULT_NIST_SIZE)]
        nist_size: usize,
    },

    /// Run the stream tests on an existing file
    Analyze {
        /// File to analyze (e.g. a keystream dump)
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let (report, status) = match cli.command {
        Commands::Suite { size, nist_size } => run_suite(&SuiteOptions { size, nist_size })?,
        Commands::Analyze { file } => analyze_file(&file)?,
    };
    print!("{}", report);

    if status == Severity::Fail {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
