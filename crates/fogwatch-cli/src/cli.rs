//! CLI argument definitions for fogwatch.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fogwatch")]
#[command(about = "Dead by Daylight game state inference tools", version)]
pub struct Args {
    /// Settings file
    #[arg(long, value_name = "FILE", default_value = "fogwatch.toml", env = "FOGWATCH_CONFIG")]
    pub config: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Replay recorded region results through the engine
    Replay {
        /// Recording file (JSON lines)
        snapshots: String,
        /// Map directory file (JSON, realm -> files)
        #[arg(long, value_name = "FILE")]
        maps: Option<String>,
        /// Output state changes as JSON lines
        #[arg(long)]
        json: bool,
        /// Print state changes without colors
        #[arg(long)]
        no_color: bool,
    },
    /// Print the similarity score of two strings
    Similarity { a: String, b: String },
    /// List the killer catalog
    Killers {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
