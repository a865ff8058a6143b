//! Arcade Bot - unified CLI
//!
//! Serves the HTTP interaction endpoint or plays a game in the terminal.

use anyhow::Result;
use arcade_bot::cli::{Cli, Command};
use arcade_bot::{BotConfig, MessageBoard, SessionTable, console, logging, server};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = BotConfig::load_or_default(&cli.config)?.with_rng_seed(cli.seed);

    match cli.command {
        Command::Serve { port, host } => {
            logging::init_tracing(config.logging())?;
            run_server(config.with_server(host, port)).await
        }
        Command::Play { game } => {
            // Keep the terminal for the game; logs go to the files only.
            logging::init_tracing(&config.logging().clone().with_console(false))?;
            console::play(game, &config).await
        }
    }
}

/// Run the HTTP interaction endpoint
#[instrument(skip(config))]
async fn run_server(config: BotConfig) -> Result<()> {
    if config.token().is_none() {
        warn!(
            var = %config.bot().token_env(),
            "No platform token configured, serving local interactions only"
        );
    }
    let table = SessionTable::new(&config, Arc::new(MessageBoard::new()));
    info!(bot = %config.bot().name(), "Starting Arcade Bot");
    server::serve(table, config.server().host(), *config.server().port()).await
}
