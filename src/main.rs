//! Formulary extraction - Entry point

use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, Subcommand};
use formulary_extract::{
    run_counseling, run_dilution, run_extract, run_segment, ExtractConfig, SegmentConfig,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "formulary-extract", version, about = "Extract structured formulary data from drug-reference texts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract page-marked text from a PDF
    Extract {
        #[arg(value_name = "PDF", value_hint = clap::ValueHint::FilePath)]
        input: PathBuf,
        #[arg(long, short = 'o', value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
        output: PathBuf,
        /// Page selection, e.g. "1-10,21-30"
        #[arg(long)]
        pages: Option<String>,
        /// Keep column alignment
        #[arg(long)]
        layout: bool,
        #[arg(long)]
        password: Option<String>,
    },
    /// Split formulary text into drug entries
    Segment {
        #[arg(value_name = "TXT", value_hint = clap::ValueHint::FilePath)]
        input: PathBuf,
        #[arg(long, short = 'o', value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
        output: PathBuf,
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        start_marker: Option<String>,
        #[arg(long)]
        max_line_length: Option<usize>,
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        id_prefix: Option<String>,
    },
    /// Parse the injectable dilution guideline text
    Dilution {
        #[arg(value_name = "TXT", value_hint = clap::ValueHint::FilePath)]
        input: PathBuf,
        #[arg(long, short = 'o', value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
        output: PathBuf,
    },
    /// Render counseling medications as a JS module
    Counseling {
        #[arg(value_name = "JSON", value_hint = clap::ValueHint::FilePath)]
        input: PathBuf,
        #[arg(long, short = 'o', value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "formulary_extract=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match Cli::parse().command {
        Command::Extract {
            input,
            output,
            pages,
            layout,
            password,
        } => {
            let config = ExtractConfig {
                pages,
                layout,
                password,
            };
            let report = run_extract(&input, &output, &config)?;
            println!(
                "Extracted {} pages ({} characters) to {}",
                report.pages,
                report.characters,
                report.output.display()
            );
        }
        Command::Segment {
            input,
            output,
            start_marker,
            max_line_length,
            id_prefix,
        } => {
            let defaults = SegmentConfig::default();
            let config = SegmentConfig {
                start_marker: start_marker.unwrap_or(defaults.start_marker),
                max_line_length: max_line_length.unwrap_or(defaults.max_line_length),
                id_prefix: id_prefix.unwrap_or(defaults.id_prefix),
                ..defaults
            };
            let report = run_segment(&input, &output, config)?;
            println!("Extracted {} drug entries", report.accepted);
            println!("Rejected {} invalid entries", report.rejected);
            println!(
                "Boundaries: {}, orphaned lines: {}",
                report.boundaries, report.orphaned_lines
            );
            println!("Saved to {}", report.output.display());
        }
        Command::Dilution { input, output } => {
            let page_marker = SegmentConfig::default().page_marker;
            let report = run_dilution(&input, &output, &page_marker)?;
            println!(
                "Parsed {} drugs from dilution guideline to {}",
                report.entries,
                report.output.display()
            );
        }
        Command::Counseling { input, output } => {
            let today = chrono::Local::now().date_naive();
            let report = run_counseling(&input, &output, today)?;
            println!(
                "Updated {} with {} medications",
                report.output.display(),
                report.medications
            );
        }
    }

    Ok(())
}
