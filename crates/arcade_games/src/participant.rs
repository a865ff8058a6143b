//! Player identities and seating.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Opaque platform identity of a player.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[display("{}", _0)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

/// Whether a seat is driven by a person or by the bot itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantKind {
    /// A person clicking buttons.
    Human,
    /// The bot playing the opposing side.
    Ai,
}

/// A player seated in a session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Participant {
    /// Platform identity.
    id: PlayerId,
    /// Display name (mention text on the platform).
    name: String,
    /// Human or AI.
    kind: ParticipantKind,
}

impl Participant {
    /// Creates a human participant.
    #[instrument(skip(name))]
    pub fn human(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: ParticipantKind::Human,
        }
    }

    /// Creates the bot's own participant.
    #[instrument(skip(name))]
    pub fn ai(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: ParticipantKind::Ai,
        }
    }

    /// Returns true for the bot's seat.
    pub fn is_ai(&self) -> bool {
        self.kind == ParticipantKind::Ai
    }

    /// Re-seats this identity as the AI (used when someone challenges the bot).
    pub(crate) fn into_ai(self) -> Self {
        Self {
            kind: ParticipantKind::Ai,
            ..self
        }
    }
}

/// One of the two seats of a session.
///
/// The challenger always sits in [`Seat::First`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    /// The player who started the game.
    First,
    /// The opponent, or the AI.
    Second,
}

impl Seat {
    /// Both seats in order.
    pub const BOTH: [Seat; 2] = [Seat::First, Seat::Second];

    /// Returns the opposite seat.
    pub fn other(self) -> Self {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }

    /// Index into per-seat arrays.
    pub fn index(self) -> usize {
        match self {
            Seat::First => 0,
            Seat::Second => 1,
        }
    }
}
