//! Tunable rules shared by every session an engine creates.

use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};

/// Per-variant knobs; every field has a default matching the classic bot.
#[derive(Debug, Clone, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct GameSettings {
    /// Smallest number the guessing game may pick.
    guess_low: i64,
    /// Largest number the guessing game may pick.
    guess_high: i64,
    /// Guesses allowed before the house wins.
    guess_attempts: u32,
    /// Lives each duelist starts with.
    duel_lives: u8,
    /// Chance that the AI defender picks the right retort.
    duel_ai_accuracy: f64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            guess_low: 1,
            guess_high: 100,
            guess_attempts: 7,
            duel_lives: 3,
            duel_ai_accuracy: 0.5,
        }
    }
}
