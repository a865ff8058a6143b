//! Bot configuration loaded from TOML.

use arcade_games::{GameKind, GameSettings, Participant, PlayerId};
use derive_getters::Getters;
use derive_setters::Setters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Top-level configuration for the bot process.
#[derive(Debug, Clone, Default, PartialEq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Identity of the bot itself.
    bot: BotSection,
    /// Idle windows per game.
    timeouts: TimeoutSection,
    /// Guessing-game rules.
    guess: GuessSection,
    /// Insult-duel rules.
    duel: DuelSection,
    /// Log destinations.
    logging: LoggingSection,
    /// HTTP listener.
    server: ServerSection,
    /// Fixed seed for reproducible games; entropy when absent.
    rng_seed: Option<u64>,
}

/// `[bot]` section.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct BotSection {
    /// Display name of the bot (and of the AI seat).
    name: String,
    /// Platform user id of the bot; challenging it plays the AI.
    user_id: u64,
    /// Environment variable holding the platform token.
    token_env: String,
}

impl Default for BotSection {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            user_id: 1,
            token_env: "ARCADE_BOT_TOKEN".to_string(),
        }
    }
}

fn default_bot_name() -> String {
    "Arcade".to_string()
}

/// `[timeouts]` section, in seconds.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutSection {
    /// Tic-tac-toe idle window.
    tictactoe_secs: u64,
    /// Guessing-game idle window.
    guess_secs: u64,
    /// Rock-paper-scissors idle window.
    rps_secs: u64,
    /// Insult-duel idle window.
    duel_secs: u64,
}

impl Default for TimeoutSection {
    fn default() -> Self {
        Self {
            tictactoe_secs: 300,
            guess_secs: 180,
            rps_secs: 120,
            duel_secs: 300,
        }
    }
}

impl TimeoutSection {
    /// Idle window for a game kind.
    pub fn idle_for(&self, kind: GameKind) -> Duration {
        let secs = match kind {
            GameKind::TicTacToe => self.tictactoe_secs,
            GameKind::Guess => self.guess_secs,
            GameKind::Rps => self.rps_secs,
            GameKind::Duel => self.duel_secs,
        };
        Duration::from_secs(secs)
    }
}

/// `[guess]` section.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct GuessSection {
    /// Lowest possible secret.
    low: i64,
    /// Highest possible secret.
    high: i64,
    /// Guesses before the house wins.
    attempts: u32,
}

impl Default for GuessSection {
    fn default() -> Self {
        Self {
            low: 1,
            high: 100,
            attempts: 7,
        }
    }
}

/// `[duel]` section.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelSection {
    /// Starting lives per duelist.
    lives: u8,
    /// Probability that the AI defender answers correctly.
    ai_accuracy: f64,
}

impl Default for DuelSection {
    fn default() -> Self {
        Self {
            lives: 3,
            ai_accuracy: 0.5,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct LoggingSection {
    /// Default filter when `RUST_LOG` is unset.
    #[setters(into)]
    level: String,
    /// Echo logs to stdout.
    console: bool,
    /// Directory for `info.log` and `error.log`.
    dir: PathBuf,
    /// Write the log files at all.
    files: bool,
    /// Size at which `info.log` rolls over; 0 never rolls.
    max_bytes: u64,
    /// Rolled copies of `info.log` kept as `info.log.1` and up.
    backups: u32,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console: true,
            dir: PathBuf::from("."),
            files: true,
            max_bytes: 5 * 1024 * 1024,
            backups: 5,
        }
    }
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Interface to bind.
    host: String,
    /// Port to bind.
    port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl BotConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(bot_name = %config.bot.name, "Config loaded successfully");
        Ok(config)
    }

    /// Parses and validates configuration text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when it exists, otherwise falls back to defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Rejects settings no game could run with.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.guess.low > self.guess.high {
            return Err(ConfigError::new(format!(
                "guess.low ({}) is above guess.high ({})",
                self.guess.low, self.guess.high
            )));
        }
        if self.guess.attempts == 0 {
            return Err(ConfigError::new("guess.attempts must be at least 1".to_string()));
        }
        if self.duel.lives == 0 {
            return Err(ConfigError::new("duel.lives must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.duel.ai_accuracy) {
            return Err(ConfigError::new(format!(
                "duel.ai_accuracy ({}) must lie in 0.0..=1.0",
                self.duel.ai_accuracy
            )));
        }
        let timeouts = &self.timeouts;
        if [
            timeouts.tictactoe_secs,
            timeouts.guess_secs,
            timeouts.rps_secs,
            timeouts.duel_secs,
        ]
        .contains(&0)
        {
            return Err(ConfigError::new("timeouts must be positive".to_string()));
        }
        Ok(())
    }

    /// Engine rules derived from the `[guess]` and `[duel]` sections.
    pub fn game_settings(&self) -> GameSettings {
        GameSettings::default()
            .with_guess_low(self.guess.low)
            .with_guess_high(self.guess.high)
            .with_guess_attempts(self.guess.attempts)
            .with_duel_lives(self.duel.lives)
            .with_duel_ai_accuracy(self.duel.ai_accuracy)
    }

    /// The bot's own participant.
    pub fn house(&self) -> Participant {
        Participant::ai(PlayerId(self.bot.user_id), self.bot.name.clone())
    }

    /// Platform token from the environment. The value is never logged.
    #[instrument(skip(self), fields(var = %self.bot.token_env))]
    pub fn token(&self) -> Option<String> {
        match std::env::var(&self.bot.token_env) {
            Ok(token) if !token.trim().is_empty() => {
                debug!("Token found");
                Some(token)
            }
            _ => {
                warn!("Token variable unset or empty");
                None
            }
        }
    }

    /// Overrides the listener address.
    pub fn with_server(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.server.host = host;
        }
        if let Some(port) = port {
            self.server.port = port;
        }
        self
    }

    /// Overrides the random seed.
    pub fn with_rng_seed(mut self, seed: Option<u64>) -> Self {
        if seed.is_some() {
            self.rng_seed = seed;
        }
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
