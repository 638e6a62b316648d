mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "pathway")]
#[command(version, about = "Pathway CLI - validate route tables and try lookups", long_about = None)]
struct Cli {
    /// Route file(s); later files extend earlier ones
    #[arg(short, long = "config", global = true, default_value = "routes.toml")]
    config: Vec<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the route table and report syntax errors or ambiguous routes
    Check,

    /// Print routes in the order lookups try them
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Look up one or more paths or URLs
    #[command(name = "match")]
    Match {
        /// Paths or absolute URLs to look up
        #[arg(required = true)]
        paths: Vec<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(log_level(cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load_all(&cli.config)?;

    match cli.command {
        Commands::Check => {
            commands::check::execute(&config)?;
        }
        Commands::List { json } => {
            commands::list::execute(&config, json)?;
        }
        Commands::Match { paths, json } => {
            commands::lookup::execute(&config, &paths, json)?;
        }
    }

    Ok(())
}

fn log_level(verbose: u8) -> tracing::Level {
    match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}
