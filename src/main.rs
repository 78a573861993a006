mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

use passage::diagnostics;

/// Environment variable holding the log filter, e.g. `PASSAGE_LOG=passage=debug`.
const LOG_ENV: &str = "PASSAGE_LOG";

#[derive(Parser)]
#[command(name = "passage", about = "Parse, validate, and normalize scripture citations")]
/// Top-level CLI arguments.
struct Cli {
    /// Selected subcommand.
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
/// Available subcommands.
enum Commands {
    /// List the books of the canon with their chapter counts and aliases
    Books {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Parse citations and print them in canonical form
    Parse {
        /// Citations such as "gen 1:1-3, 2:4"
        #[arg(required = true)]
        citations: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Report invalid citations instead of stopping at the first one
        #[arg(long)]
        lenient: bool,
    },
}

/// Send tracing output to stderr, filtered by `PASSAGE_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| return EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Books { json } => commands::books(json).map(|()| return ExitCode::SUCCESS),
        Commands::Parse {
            citations,
            json,
            lenient,
        } => commands::parse(&citations, json, lenient),
    };

    return match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(2)
        },
    };
}
