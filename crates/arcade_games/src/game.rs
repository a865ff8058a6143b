//! Variant dispatch: one tagged state, free functions matched on the tag.

use crate::duel::{Duel, Riposte};
use crate::guess::{GuessGame, Hint};
use crate::rps::{Hand, RpsRound};
use crate::tictactoe::{Mark, Position, Square, TicTacToe};
use crate::{EngineError, GameSettings, Seat};
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString};
use tracing::instrument;

/// The games the bot can host.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum GameKind {
    /// Tic-tac-toe on a 3x3 board.
    TicTacToe,
    /// Guess the house's secret number.
    Guess,
    /// Rock-paper-scissors.
    Rps,
    /// Insult sword-fighting.
    Duel,
}

impl GameKind {
    /// Title used in status messages.
    pub fn title(self) -> &'static str {
        match self {
            GameKind::TicTacToe => "Tic-tac-toe",
            GameKind::Guess => "Guess the number",
            GameKind::Rps => "Rock, paper, scissors",
            GameKind::Duel => "Insult duel",
        }
    }

    /// False for games that are always played against the house.
    pub fn accepts_human_opponent(self) -> bool {
        !matches!(self, GameKind::Guess)
    }
}

/// A submitted move. Which shape is legal depends on the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Tic-tac-toe: claim a cell.
    Place(Position),
    /// Guessing game: a number.
    Guess(i64),
    /// Rock-paper-scissors: a hand.
    Throw(Hand),
    /// Insult duel: a retort index.
    Retort(usize),
}

/// What an accepted move did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Play {
    /// A mark was placed.
    Placed {
        /// Cell claimed.
        position: Position,
        /// Mark written.
        mark: Mark,
    },
    /// A guess was judged.
    Guessed {
        /// The number guessed.
        guess: i64,
        /// Its hint.
        hint: Hint,
        /// Guesses left afterwards.
        attempts_left: u32,
    },
    /// A hidden choice was locked in.
    Committed,
    /// Both hands are on the table.
    Revealed {
        /// First seat's hand.
        first: Hand,
        /// Second seat's hand.
        second: Hand,
    },
    /// A duel round was resolved.
    Riposte(Riposte),
}

/// Terminal evaluation of a game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Nobody has won yet.
    Ongoing,
    /// The seat won.
    Won(Seat),
    /// Nobody can win.
    Draw,
}

/// Variant payload of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "lowercase")]
pub enum GameState {
    /// Tic-tac-toe board.
    TicTacToe(TicTacToe),
    /// Guessing game.
    Guess(GuessGame),
    /// Pending hands.
    Rps(RpsRound),
    /// Lives and insult pool.
    Duel(Duel),
}

impl GameState {
    /// Fresh state for a game kind.
    #[instrument(skip(rng))]
    pub fn new<R: Rng + ?Sized>(kind: GameKind, settings: &GameSettings, rng: &mut R) -> Self {
        match kind {
            GameKind::TicTacToe => GameState::TicTacToe(TicTacToe::new()),
            GameKind::Guess => GameState::Guess(GuessGame::new(settings, rng)),
            GameKind::Rps => GameState::Rps(RpsRound::new()),
            GameKind::Duel => GameState::Duel(Duel::new(settings, rng)),
        }
    }

    /// The tag.
    pub fn kind(&self) -> GameKind {
        match self {
            GameState::TicTacToe(_) => GameKind::TicTacToe,
            GameState::Guess(_) => GameKind::Guess,
            GameState::Rps(_) => GameKind::Rps,
            GameState::Duel(_) => GameKind::Duel,
        }
    }
}

/// Win, draw or keep going.
pub fn evaluate_terminal(state: &GameState) -> Outcome {
    match state {
        GameState::TicTacToe(game) => game.evaluate(),
        GameState::Guess(game) => game.evaluate(),
        GameState::Rps(round) => round.evaluate(),
        GameState::Duel(duel) => duel.evaluate(),
    }
}

/// Seat expected to move next; `None` while both may act (or nobody can).
pub fn seat_to_move(state: &GameState) -> Option<Seat> {
    match state {
        GameState::TicTacToe(game) => {
            let placed = game
                .board()
                .squares()
                .iter()
                .filter(|s| **s != Square::Empty)
                .count();
            Some(if placed % 2 == 0 { Seat::First } else { Seat::Second })
        }
        GameState::Guess(_) => Some(Seat::First),
        GameState::Rps(_) => None,
        GameState::Duel(duel) => duel.defender(),
    }
}

/// Validates and then applies `mv` for `seat`.
///
/// Turn order is not checked here. On error the state is untouched.
#[instrument(skip(state, rng))]
pub fn apply_move<R: Rng + ?Sized>(
    state: &mut GameState,
    seat: Seat,
    mv: &Move,
    rng: &mut R,
) -> Result<Play, EngineError> {
    match state {
        GameState::TicTacToe(game) => {
            let pos = game.validate(mv)?;
            Ok(game.apply(seat, pos))
        }
        GameState::Guess(game) => {
            let guess = game.validate(mv)?;
            Ok(game.apply(guess))
        }
        GameState::Rps(round) => {
            let hand = round.validate(seat, mv)?;
            Ok(round.apply(seat, hand))
        }
        GameState::Duel(duel) => {
            let retort = duel.validate(mv)?;
            Ok(duel.apply(retort, rng))
        }
    }
}

/// The AI's move for `seat`, if the AI has something to do right now.
#[instrument(skip(state, rng))]
pub fn ai_reply<R: Rng + ?Sized>(
    state: &GameState,
    seat: Seat,
    settings: &GameSettings,
    rng: &mut R,
) -> Option<Move> {
    match state {
        GameState::TicTacToe(game) => game.ai_reply(seat, rng),
        GameState::Guess(_) => None,
        GameState::Rps(round) => round.ai_reply(seat, rng),
        GameState::Duel(duel) => duel.ai_reply(seat, *settings.duel_ai_accuracy(), rng),
    }
}
