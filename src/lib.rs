//! Arcade Bot library - the application around the game engine
//!
//! Turns platform input into engine moves, runs every session as its own
//! task with an idle timer, and renders sessions into interactive views.
//!
//! # Architecture
//!
//! - **Config**: TOML configuration and the bot's identity
//! - **Input**: component ids, typed replies and slash commands
//! - **Render**: views with buttons, selects and prompts; the message board
//! - **Table**: per-session actors and inactivity timeouts
//! - **Server**: HTTP interaction endpoint
//!
//! # Example
//!
//! ```no_run
//! use arcade_bot::{BotConfig, MessageBoard, SessionTable};
//! use arcade_games::{GameKind, Participant, PlayerId};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = BotConfig::default();
//! let table = SessionTable::new(&config, Arc::new(MessageBoard::new()));
//! let view = table
//!     .start(GameKind::TicTacToe, Participant::human(PlayerId(7), "alice"), None)
//!     .await?;
//! println!("{}", view.content());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod table;

pub mod cli;
pub mod console;
pub mod input;
pub mod logging;
pub mod render;
pub mod server;

pub use config::{
    BotConfig, BotSection, ConfigError, DuelSection, GuessSection, LoggingSection, ServerSection,
    TimeoutSection,
};
pub use input::{Command, InputError};
pub use render::{MessageBoard, Renderer, View};
pub use table::{SessionTable, TableError};
