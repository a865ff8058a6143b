//! Session state shared by every game variant.

use crate::{GameKind, GameState, Participant, ParticipantKind, Play, PlayerId, Seat};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Unique identifier for a game session.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wraps an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Lifecycle stage of a session. Everything but `InProgress` is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "phase", content = "winner", rename_all = "snake_case")]
pub enum Phase {
    /// Accepting moves.
    InProgress,
    /// Someone won.
    Won(PlayerId),
    /// Nobody won.
    Draw,
    /// Nobody moved within the idle window.
    Expired,
}

impl Phase {
    /// True for `Won`, `Draw` and `Expired`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Phase::InProgress)
    }
}

/// One game between two seats.
#[derive(Debug, Clone, Getters, Serialize)]
pub struct Session {
    /// Session identifier.
    id: SessionId,
    /// Challenger first, opponent (or the AI) second.
    participants: [Participant; 2],
    /// Variant payload.
    state: GameState,
    /// Seat expected to move; `None` for simultaneous rounds and finished games.
    turn: Option<Seat>,
    /// Lifecycle stage.
    phase: Phase,
    /// When the game started.
    created_at: DateTime<Utc>,
    /// Last accepted move (or creation).
    last_activity_at: DateTime<Utc>,
    /// Accepted moves, human and AI.
    moves: u32,
}

impl Session {
    pub(crate) fn new(id: SessionId, participants: [Participant; 2], state: GameState) -> Self {
        let now = Utc::now();
        let turn = crate::seat_to_move(&state);
        Self {
            id,
            participants,
            state,
            turn,
            phase: Phase::InProgress,
            created_at: now,
            last_activity_at: now,
            moves: 0,
        }
    }

    /// The game being played.
    pub fn kind(&self) -> GameKind {
        self.state.kind()
    }

    /// Participant in a seat.
    pub fn participant(&self, seat: Seat) -> &Participant {
        &self.participants[seat.index()]
    }

    /// Seat occupied by a player, if seated.
    pub fn seat_of(&self, player: PlayerId) -> Option<Seat> {
        Seat::BOTH
            .into_iter()
            .find(|seat| *self.participant(*seat).id() == player)
    }

    /// Seat played by the bot, if any.
    pub fn ai_seat(&self) -> Option<Seat> {
        Seat::BOTH
            .into_iter()
            .find(|seat| *self.participant(*seat).kind() == ParticipantKind::Ai)
    }

    /// True when the bot plays one side.
    pub fn is_ai_game(&self) -> bool {
        self.ai_seat().is_some()
    }

    /// Participant whose move is awaited.
    pub fn to_move(&self) -> Option<&Participant> {
        self.turn.map(|seat| self.participant(seat))
    }

    /// Winner, once the phase is `Won`.
    pub fn winner(&self) -> Option<&Participant> {
        match self.phase {
            Phase::Won(id) => self.seat_of(id).map(|seat| self.participant(seat)),
            _ => None,
        }
    }

    /// True once the session reached a final phase.
    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub(crate) fn set_turn(&mut self, turn: Option<Seat>) {
        self.turn = turn;
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn touch(&mut self, accepted: u32) {
        self.moves += accepted;
        self.last_activity_at = Utc::now();
    }
}

/// One accepted move inside an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnEvent {
    /// Seat that moved.
    pub seat: Seat,
    /// True for moves computed by the AI.
    pub by_ai: bool,
    /// What happened.
    pub play: Play,
}

/// Snapshot handed to the rendering boundary after every change.
#[derive(Debug, Clone, Getters, Serialize)]
pub struct SessionUpdate {
    /// Session state after the change.
    session: Session,
    /// Moves applied by this change: the human move first, then any AI reply.
    events: Vec<TurnEvent>,
}

impl SessionUpdate {
    pub(crate) fn new(session: Session, events: Vec<TurnEvent>) -> Self {
        Self { session, events }
    }

    /// Phase after the change.
    pub fn phase(&self) -> Phase {
        *self.session.phase()
    }

    /// True when this update closes the session.
    pub fn is_final(&self) -> bool {
        self.session.is_terminal()
    }
}
