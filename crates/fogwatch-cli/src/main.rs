mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use fogwatch_core::Settings;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("fogwatch=info,fogwatch_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Replay {
            snapshots,
            maps,
            json,
            no_color,
        } => {
            let settings = Settings::load_or_default(&args.config);
            commands::replay::run(&snapshots, maps.as_deref(), settings, json, !no_color)
        }
        Command::Similarity { a, b } => commands::similarity::run(&a, &b),
        Command::Killers { json } => commands::killers::run(json),
    }
}
