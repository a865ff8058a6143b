//! Command-line interface for arcade_bot.

use arcade_games::GameKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Arcade Bot - turn-based mini-games for chat
#[derive(Parser, Debug)]
#[command(name = "arcade_bot")]
#[command(about = "Chat bot hosting tic-tac-toe, guessing, rock-paper-scissors and insult duels", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true, default_value = "arcade_bot.toml")]
    pub config: PathBuf,

    /// Fixed RNG seed, overriding the config file
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP interaction endpoint
    Serve {
        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Play one game against the AI in this terminal
    Play {
        /// Game to play: tictactoe, guess, rps or duel
        game: GameKind,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_parses_game() {
        let cli = Cli::try_parse_from(["arcade_bot", "play", "duel"]).expect("valid args");
        assert!(matches!(cli.command, Command::Play { game: GameKind::Duel }));
        assert_eq!(cli.config, PathBuf::from("arcade_bot.toml"));
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::try_parse_from(["arcade_bot", "serve", "--port", "8080", "--seed", "4"])
            .expect("valid args");
        assert_eq!(cli.seed, Some(4));
        assert!(matches!(
            cli.command,
            Command::Serve {
                port: Some(8080),
                host: None
            }
        ));
    }

    #[test]
    fn test_unknown_game_rejected() {
        assert!(Cli::try_parse_from(["arcade_bot", "play", "chess"]).is_err());
    }
}
