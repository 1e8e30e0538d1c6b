//! Tally command-line application.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::Args;
use clap::Parser;
use cli::Cli;
use log::{debug, info};
use renderer::TerminalRenderer;
use tally_core::StoreBuilder;

fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        command,
    } = Args::parse();

    let store = StoreBuilder::new()
        .with_database_path(database_file)
        .build()
        .context("Failed to open the task store")?;

    if store.is_dirty() {
        info!("Stored items were repaired while loading");
    }

    let renderer = TerminalRenderer::new(!no_color);
    debug!("Rich output: {}", renderer.is_rich());

    let cli = Cli::new(store, renderer);
    match command {
        Some(command) => cli.run(command),
        None => {
            cli.list();
            Ok(())
        }
    }
}
