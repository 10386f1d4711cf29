//! Command-line interface for tei-beacon.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Config;
use crate::error::Result;
use crate::pipeline::{export, ExportMode, ExportReport};

/// TEI Beacon - Publish authority links from TEI registers as BEACON and RDF.
#[derive(Parser)]
#[command(name = "tei-beacon")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write one BEACON file per register and authority file.
    Beacon(ExportArgs),

    /// Write the register entities as Turtle and RDF/XML.
    Rdf(ExportArgs),

    /// Write both BEACON and RDF output.
    All(ExportArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Path to the YAML configuration
    #[arg(short, long, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Output directory (default: output_dir from the configuration)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl Commands {
    fn into_parts(self) -> (ExportMode, ExportArgs) {
        match self {
            Self::Beacon(args) => (ExportMode::Beacon, args),
            Self::Rdf(args) => (ExportMode::Rdf, args),
            Self::All(args) => (ExportMode::All, args),
        }
    }
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let (mode, args) = cli.command.into_parts();
    export_command(mode, &args.config, args.output.as_deref())
}

/// Execute an export command.
fn export_command(mode: ExportMode, config_path: &Path, output: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    println!(
        "{} {}",
        style("Exporting").bold(),
        style(config.file_location.display()).cyan()
    );
    println!();

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message("Extracting authority identifiers...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    // Validation and the input check happen inside export, before any output
    let timestamp = chrono::Local::now().naive_local();
    let report = match export(&config, mode, output, timestamp) {
        Ok(report) => report,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.finish_and_clear();
    print_report(&report);

    println!();
    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        output.unwrap_or(&config.output_dir).display()
    );

    Ok(())
}

fn print_report(report: &ExportReport) {
    for register in &report.registers {
        if let Some(reason) = &register.skipped {
            println!(
                "  {}: {}",
                style(&register.register).yellow(),
                style(reason).yellow()
            );
            continue;
        }
        println!(
            "  {}: {} items, {} without authority",
            style(&register.register).green(),
            register.items,
            register.missing
        );
        for (authority, count) in &register.authorities {
            println!("    {authority}: {count}");
        }
    }
    if report.rdf_files.is_some() {
        println!("  RDF triples: {}", report.triples);
    }
}
