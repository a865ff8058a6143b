//! Engine error taxonomy.

/// Reasons a game request is rejected.
///
/// Every variant is recoverable by the caller: the session is left untouched
/// and the input boundary turns the error into a non-fatal notice.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum EngineError {
    /// The actor is not the participant expected to move, has already
    /// committed this round, or is not seated in the session.
    #[display("It's not your turn")]
    NotYourTurn,

    /// The move targets an occupied or out-of-range slot, or is the wrong
    /// kind of move for the game.
    #[display("Invalid move: {}", _0)]
    InvalidMove(#[error(not(source))] String),

    /// The session already reached a terminal phase.
    #[display("The game is already over")]
    GameAlreadyOver,

    /// A player named themselves as opponent.
    #[display("You can't challenge yourself")]
    SelfChallengeRejected,
}

impl EngineError {
    /// Builds an [`EngineError::InvalidMove`] from any message.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidMove(reason.into())
    }
}
