//! The session engine: creation, move submission and expiry.

use crate::{
    EngineError, GameKind, GameLog, GameSettings, GameState, Move, Outcome, Participant, Phase,
    PlayerId, Seat, Session, SessionId, SessionUpdate, TracingLog, TurnEvent, ai_reply, apply_move,
    evaluate_terminal, seat_to_move,
};
use derive_getters::Getters;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument, warn};

/// Creates sessions and drives them forward.
///
/// Holds the random source used for secrets and AI tie-breaks, the log that
/// observes every transition, and the bot's own identity, which fills the
/// second seat whenever no human opponent is named.
#[derive(Debug, Getters)]
pub struct Engine<R = ChaCha8Rng, L = TracingLog> {
    /// Rules applied to new sessions.
    settings: GameSettings,
    /// The bot's participant.
    house: Participant,
    #[getter(skip)]
    rng: R,
    #[getter(skip)]
    log: L,
}

impl Engine {
    /// Engine with a reproducible ChaCha stream and tracing output.
    #[instrument(skip(settings, house))]
    pub fn seeded(seed: u64, settings: GameSettings, house: Participant) -> Self {
        Self::new(settings, house, ChaCha8Rng::seed_from_u64(seed), TracingLog)
    }
}

impl<R: Rng, L: GameLog> Engine<R, L> {
    /// Builds an engine from its parts.
    pub fn new(settings: GameSettings, house: Participant, rng: R, log: L) -> Self {
        Self {
            settings,
            house: house.into_ai(),
            rng,
            log,
        }
    }

    /// Starts a session.
    ///
    /// An omitted opponent, or the bot itself, becomes the AI seat. Games
    /// played against the house ignore any named opponent.
    #[instrument(skip(self, challenger, opponent), fields(challenger = %challenger.id()))]
    pub fn create(
        &mut self,
        kind: GameKind,
        challenger: Participant,
        opponent: Option<Participant>,
    ) -> Result<Session, EngineError> {
        let opponent = match opponent {
            Some(opp) if opp.id() == challenger.id() => {
                warn!(player_id = %challenger.id(), "Player tried to challenge themselves");
                return Err(EngineError::SelfChallengeRejected);
            }
            Some(opp) if kind.accepts_human_opponent() && opp.id() != self.house.id() => opp,
            _ => self.house.clone(),
        };

        let state = GameState::new(kind, &self.settings, &mut self.rng);
        Ok(self.start(state, challenger, opponent))
    }

    /// Seats two participants around a prepared state, skipping the
    /// opponent checks of [`Engine::create`]. Used to replay or stage games.
    ///
    /// A staged state that is already decided opens in its final phase, and
    /// one where the AI is on move gets the AI's reply before it is returned.
    #[instrument(skip(self, state, challenger, opponent))]
    pub fn start(
        &mut self,
        state: GameState,
        challenger: Participant,
        opponent: Participant,
    ) -> Session {
        let id = SessionId::new(format!("{}-{:08x}", state.kind(), self.rng.r#gen::<u32>()));
        let mut session = Session::new(id, [challenger, opponent], state);
        self.log.session_created(&session);
        self.settle(&mut session);

        let mut events = Vec::new();
        self.play_ai(&mut session, &mut events);
        if !events.is_empty() {
            session.touch(events.len() as u32);
        }
        if session.is_terminal() {
            self.log.session_finished(&session);
        }
        session
    }

    /// Applies a move from `actor`, then any AI reply, as one update.
    ///
    /// Nothing is written unless every check passes.
    #[instrument(skip(self, session), fields(session_id = %session.id()))]
    pub fn submit_move(
        &mut self,
        session: &mut Session,
        actor: PlayerId,
        mv: Move,
    ) -> Result<SessionUpdate, EngineError> {
        match self.try_move(session, actor, &mv) {
            Ok(update) => Ok(update),
            Err(e) => {
                self.log.move_rejected(session, actor, &e);
                Err(e)
            }
        }
    }

    fn try_move(
        &mut self,
        session: &mut Session,
        actor: PlayerId,
        mv: &Move,
    ) -> Result<SessionUpdate, EngineError> {
        if session.is_terminal() {
            return Err(EngineError::GameAlreadyOver);
        }

        let seat = session
            .seat_of(actor)
            .filter(|seat| !session.participant(*seat).is_ai())
            .ok_or(EngineError::NotYourTurn)?;
        if session.turn().is_some_and(|turn| turn != seat) {
            return Err(EngineError::NotYourTurn);
        }

        let play = apply_move(session.state_mut(), seat, mv, &mut self.rng)?;
        let mut events = vec![TurnEvent {
            seat,
            by_ai: false,
            play,
        }];
        self.log.move_applied(session, &events[0]);
        self.settle(session);
        self.play_ai(session, &mut events);

        session.touch(events.len() as u32);
        if session.is_terminal() {
            self.log.session_finished(session);
        }
        Ok(SessionUpdate::new(session.clone(), events))
    }

    /// Applies AI moves for as long as the AI is on move.
    fn play_ai(&mut self, session: &mut Session, events: &mut Vec<TurnEvent>) {
        while let Some((ai_seat, reply)) = self.pending_ai_move(session) {
            match apply_move(session.state_mut(), ai_seat, &reply, &mut self.rng) {
                Ok(play) => {
                    let event = TurnEvent {
                        seat: ai_seat,
                        by_ai: true,
                        play,
                    };
                    self.log.move_applied(session, &event);
                    events.push(event);
                    self.settle(session);
                }
                Err(e) => {
                    warn!(error = %e, ?reply, "AI produced an illegal move");
                    break;
                }
            }
        }
    }

    /// The AI's move, when the AI holds a seat and it is its turn to act.
    fn pending_ai_move(&mut self, session: &Session) -> Option<(Seat, Move)> {
        if session.is_terminal() {
            return None;
        }
        let ai_seat = session.ai_seat()?;
        if session.turn().is_some_and(|turn| turn != ai_seat) {
            return None;
        }
        let reply = ai_reply(session.state(), ai_seat, &self.settings, &mut self.rng)?;
        debug!(?reply, "AI reply computed");
        Some((ai_seat, reply))
    }

    /// Re-evaluates the state: records a final phase or advances the turn.
    fn settle(&self, session: &mut Session) {
        match evaluate_terminal(session.state()) {
            Outcome::Won(seat) => {
                let winner = *session.participant(seat).id();
                session.set_phase(Phase::Won(winner));
                session.set_turn(None);
            }
            Outcome::Draw => {
                session.set_phase(Phase::Draw);
                session.set_turn(None);
            }
            Outcome::Ongoing => {
                let turn = seat_to_move(session.state());
                session.set_turn(turn);
            }
        }
    }

    /// Times out an idle session. Returns `None` if it was already final.
    #[instrument(skip(self, session), fields(session_id = %session.id()))]
    pub fn expire(&mut self, session: &mut Session) -> Option<SessionUpdate> {
        if session.is_terminal() {
            debug!(phase = ?session.phase(), "Expiry ignored for finished session");
            return None;
        }
        session.set_phase(Phase::Expired);
        session.set_turn(None);
        self.log.session_expired(session);
        Some(SessionUpdate::new(session.clone(), Vec::new()))
    }
}
