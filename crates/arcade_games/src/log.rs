//! Observation hook for session activity.
//!
//! The engine never reaches for a global logger; whoever builds an
//! [`Engine`](crate::Engine) hands it a [`GameLog`].

use crate::{EngineError, PlayerId, Session, TurnEvent};
use std::sync::Arc;
use tracing::{debug, info};

/// Receives session lifecycle events. Purely observational.
pub trait GameLog {
    /// A session was created.
    fn session_created(&self, session: &Session);

    /// A move was accepted (human or AI).
    fn move_applied(&self, session: &Session, event: &TurnEvent);

    /// A move was refused.
    fn move_rejected(&self, session: &Session, actor: PlayerId, error: &EngineError);

    /// The session reached `Won` or `Draw`.
    fn session_finished(&self, session: &Session);

    /// The session timed out.
    fn session_expired(&self, session: &Session);
}

impl<T: GameLog + ?Sized> GameLog for Arc<T> {
    fn session_created(&self, session: &Session) {
        (**self).session_created(session)
    }

    fn move_applied(&self, session: &Session, event: &TurnEvent) {
        (**self).move_applied(session, event)
    }

    fn move_rejected(&self, session: &Session, actor: PlayerId, error: &EngineError) {
        (**self).move_rejected(session, actor, error)
    }

    fn session_finished(&self, session: &Session) {
        (**self).session_finished(session)
    }

    fn session_expired(&self, session: &Session) {
        (**self).session_expired(session)
    }
}

/// Emits every event through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl GameLog for TracingLog {
    fn session_created(&self, session: &Session) {
        let [first, second] = session.participants();
        info!(
            session_id = %session.id(),
            game = %session.kind(),
            challenger = %first.id(),
            opponent = %second.id(),
            ai = session.is_ai_game(),
            "Session created"
        );
    }

    fn move_applied(&self, session: &Session, event: &TurnEvent) {
        let player = session.participant(event.seat);
        if event.by_ai {
            info!(session_id = %session.id(), play = ?event.play, "AI moved");
        } else {
            info!(
                session_id = %session.id(),
                player_id = %player.id(),
                play = ?event.play,
                "Move accepted"
            );
        }
    }

    fn move_rejected(&self, session: &Session, actor: PlayerId, error: &EngineError) {
        debug!(session_id = %session.id(), player_id = %actor, error = %error, "Move rejected");
    }

    fn session_finished(&self, session: &Session) {
        info!(
            session_id = %session.id(),
            game = %session.kind(),
            phase = ?session.phase(),
            moves = session.moves(),
            "Session finished"
        );
    }

    fn session_expired(&self, session: &Session) {
        info!(
            session_id = %session.id(),
            game = %session.kind(),
            moves = session.moves(),
            "Session expired after inactivity"
        );
    }
}
