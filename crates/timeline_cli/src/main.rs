//! Timeline CLI
//!
//! Raw match event log (JSON) → consolidated, ordered timeline

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use timeline_cli::{run_consolidate, run_names, write_output, ConsolidateOptions};
#[cfg(feature = "cli")]
use tracing_subscriber::EnvFilter;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "timeline_cli")]
#[command(about = "Consolidate and order match report events", long_about = None)]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Consolidate an event log into a timeline
    Consolidate {
        /// Input JSON file path (stdin if omitted)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output JSON file path (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,

        /// YAML config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Rewrite event types to their UI names
        #[arg(long, default_value = "false")]
        ui_types: bool,

        /// Pretty-print the JSON output
        #[arg(long, default_value = "false")]
        pretty: bool,
    },

    /// Print the player name index resolved from an event log
    Names {
        /// Input JSON file path (stdin if omitted)
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Consolidate {
            input,
            output,
            config,
            ui_types,
            pretty,
        } => {
            let opts = ConsolidateOptions { input, config, ui_types, pretty };
            let (json, summary) = run_consolidate(&opts)?;
            write_output(output.as_deref(), &json)?;

            if output.is_some() {
                eprintln!(
                    "{} events → {} timeline entries ({} substitutions, {} position groups)",
                    summary.input_events,
                    summary.output_events,
                    summary.substitution_groups,
                    summary.position_groups
                );
            }
        }

        Commands::Names { input } => {
            let names = run_names(input.as_deref())?;
            write_output(None, &serde_json::to_string_pretty(&names)?)?;
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("timeline_cli is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
