//! `polycats`: convert a Polygon package into a CATS package.
use cats::SampleMode;
use clap::{Parser, ValueEnum};
use polycats_core::{convert, ConvertConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

/// Convert a Polygon problem package into a CATS problem package
#[derive(Parser, Debug)]
#[command(name = "polycats")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Package directory or .zip archive
    #[arg(value_name = "PACKAGE")]
    package: PathBuf,

    /// Output directory (default: $POLYCATS_OUT, then ./cats)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// How samples are written
    #[arg(long, value_enum)]
    samples: Option<Samples>,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    report: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Samples {
    Inline,
    Files,
}

impl From<Samples> for SampleMode {
    fn from(samples: Samples) -> Self {
        match samples {
            Samples::Inline => SampleMode::Inline,
            Samples::Files => SampleMode::Files,
        }
    }
}

fn level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(level(cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => match ConvertConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => ConvertConfig::default(),
    };
    if let Some(samples) = cli.samples {
        config.samples = samples.into();
    }

    // Output directory can be overridden with POLYCATS_OUT
    let output = cli.output.unwrap_or_else(|| {
        std::env::var("POLYCATS_OUT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("cats"))
    });

    let report = match convert(&cli.package, &output, &config) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.report {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                tracing::error!("failed to serialize report: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", report.output.display());
    }
    ExitCode::SUCCESS
}
