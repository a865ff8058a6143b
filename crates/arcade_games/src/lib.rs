//! Turn-based game sessions for a chat bot.
//!
//! One [`Session`] shape carries a tagged [`GameState`]; the free functions
//! [`apply_move`], [`evaluate_terminal`] and [`ai_reply`] dispatch on the
//! tag. The [`Engine`] wraps them with turn checks, AI replies, expiry and
//! logging.
//!
//! ```
//! use arcade_games::{Engine, GameKind, GameSettings, Move, Participant, PlayerId, Position};
//!
//! let house = Participant::ai(PlayerId(1), "Arcade");
//! let mut engine = Engine::seeded(42, GameSettings::default(), house);
//!
//! let alice = Participant::human(PlayerId(7), "alice");
//! let mut session = engine.create(GameKind::TicTacToe, alice, None)?;
//!
//! // The AI answers in the same update.
//! let update = engine.submit_move(&mut session, PlayerId(7), Move::Place(Position::Center))?;
//! assert_eq!(update.events().len(), 2);
//! # Ok::<(), arcade_games::EngineError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod engine;
mod error;
mod game;
mod log;
mod participant;
mod session;
mod settings;

pub mod duel;
pub mod guess;
pub mod rps;
pub mod tictactoe;

pub use engine::Engine;
pub use error::EngineError;
pub use game::{
    GameKind, GameState, Move, Outcome, Play, ai_reply, apply_move, evaluate_terminal,
    seat_to_move,
};
pub use log::{GameLog, TracingLog};
pub use participant::{Participant, ParticipantKind, PlayerId, Seat};
pub use session::{Phase, Session, SessionId, SessionUpdate, TurnEvent};
pub use settings::GameSettings;
pub use tictactoe::Position;
