// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "focal")]
#[command(about = "Thin-lens optics calculator for sizing camera lenses")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the lens report for one camera profile
    Report {
        #[command(flatten)]
        profile: cli::ProfileArgs,

        #[command(flatten)]
        detection: cli::DetectionArgs,

        /// Focus at this distance in metres instead of the hyperfocal
        /// distance
        #[arg(long, value_name = "M")]
        focus: Option<f64>,
    },

    /// Export blur-vs-distance series as CSV or JSON
    Sweep {
        #[command(flatten)]
        profile: cli::ProfileArgs,

        #[command(flatten)]
        sweep: cli::SweepArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: cli::ExportFormat,

        /// Output file or directory (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Chart blur against distance in the terminal
    Chart {
        #[command(flatten)]
        profile: cli::ProfileArgs,

        #[command(flatten)]
        sweep: cli::SweepArgs,
    },

    /// Print usable distance bands for candidate fields of view
    Coverage {
        #[command(flatten)]
        profile: cli::ProfileArgs,

        #[command(flatten)]
        detection: cli::DetectionArgs,

        /// Candidate fields of view in degrees
        #[arg(long, value_name = "DEG", value_delimiter = ',', num_args = 1..,
              default_values_t = [44.0, 31.0, 24.0, 17.0, 12.0])]
        fovs: Vec<f64>,
    },

    /// List built-in camera profiles
    Profiles,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=focal=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            profile,
            detection,
            focus,
        } => cli::print_report(&profile, &detection, focus)?,
        Commands::Sweep {
            profile,
            sweep,
            format,
            output,
        } => cli::export_sweep(&profile, &sweep, format, output)?,
        Commands::Chart { profile, sweep } => cli::show_chart(&profile, &sweep)?,
        Commands::Coverage {
            profile,
            detection,
            fovs,
        } => cli::print_coverage(&profile, &detection, &fovs)?,
        Commands::Profiles => cli::list_profiles()?,
    }

    Ok(())
}
