//! Session table: one actor task per session, each with an idle timer.

use crate::render::{Renderer, View, render, render_opening};
use crate::{BotConfig, TimeoutSection};
use arcade_games::{
    Engine, EngineError, GameKind, GameSettings, Move, Participant, PlayerId, Session, SessionId,
    SessionUpdate, TracingLog,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, instrument, warn};

/// Pending commands per session before senders wait.
const MAILBOX: usize = 16;

/// Failures when routing a request to a session.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum TableError {
    /// No running session has this id.
    #[display("Session {} not found", _0)]
    #[from(ignore)]
    SessionNotFound(#[error(not(source))] SessionId),

    /// The session ended while the request was in flight.
    #[display("Session {} is closed", _0)]
    #[from(ignore)]
    SessionClosed(#[error(not(source))] SessionId),

    /// The engine refused the request.
    #[display("{}", _0)]
    Engine(#[error(source)] EngineError),
}

enum SessionCommand {
    Move {
        actor: PlayerId,
        mv: Move,
        reply: oneshot::Sender<Result<SessionUpdate, EngineError>>,
    },
    Snapshot {
        reply: oneshot::Sender<Session>,
    },
}

#[derive(Debug)]
struct TableState {
    sessions: HashMap<SessionId, mpsc::Sender<SessionCommand>>,
    seeds: ChaCha8Rng,
}

/// Routes requests to running sessions.
///
/// Each session lives in its own task that owns the [`Session`] and its
/// [`Engine`]; the table only keeps the index of mailboxes.
#[derive(Clone)]
pub struct SessionTable {
    state: Arc<Mutex<TableState>>,
    renderer: Arc<dyn Renderer>,
    settings: GameSettings,
    house: Participant,
    timeouts: TimeoutSection,
}

impl std::fmt::Debug for SessionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTable")
            .field("house", &self.house)
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}

impl SessionTable {
    /// Builds a table from configuration.
    #[instrument(skip(config, renderer))]
    pub fn new(config: &BotConfig, renderer: Arc<dyn Renderer>) -> Self {
        let seeds = match config.rng_seed() {
            Some(seed) => {
                info!(seed, "Using fixed RNG seed");
                ChaCha8Rng::seed_from_u64(*seed)
            }
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            state: Arc::new(Mutex::new(TableState {
                sessions: HashMap::new(),
                seeds,
            })),
            renderer,
            settings: config.game_settings(),
            house: config.house(),
            timeouts: config.timeouts().clone(),
        }
    }

    /// The bot's participant.
    pub fn house(&self) -> &Participant {
        &self.house
    }

    /// Starts a session, shows its first view and spawns its actor.
    #[instrument(skip(self, challenger, opponent), fields(challenger = %challenger.id()))]
    pub async fn start(
        &self,
        kind: GameKind,
        challenger: Participant,
        opponent: Option<Participant>,
    ) -> Result<View, TableError> {
        let mut state = self.state.lock().await;
        let (engine, session) = loop {
            let rng = ChaCha8Rng::seed_from_u64(state.seeds.r#gen());
            let mut engine = Engine::new(self.settings.clone(), self.house.clone(), rng, TracingLog);
            let session = engine.create(kind, challenger.clone(), opponent.clone())?;
            if !state.sessions.contains_key(session.id()) {
                break (engine, session);
            }
            warn!(session_id = %session.id(), "Session id collision, drawing again");
        };

        let id = session.id().clone();
        let (tx, rx) = mpsc::channel(MAILBOX);
        state.sessions.insert(id.clone(), tx);
        drop(state);

        let view = render_opening(&session);
        self.renderer.publish(&view).await;

        let actor = SessionActor {
            engine,
            session,
            idle: self.timeouts.idle_for(kind),
            renderer: Arc::clone(&self.renderer),
            table: Arc::clone(&self.state),
        };
        tokio::spawn(actor.run(rx));
        info!(session_id = %id, game = %kind, "Session started");
        Ok(view)
    }

    /// Forwards a move to its session and waits for the outcome.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn submit(
        &self,
        session_id: &SessionId,
        actor: PlayerId,
        mv: Move,
    ) -> Result<SessionUpdate, TableError> {
        let mailbox = self.mailbox(session_id).await?;
        let (reply, response) = oneshot::channel();
        let closed = || TableError::SessionClosed(session_id.clone());
        mailbox
            .send(SessionCommand::Move { actor, mv, reply })
            .await
            .map_err(|_| closed())?;
        let update = response.await.map_err(|_| closed())??;
        Ok(update)
    }

    /// Current state of a running session.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn snapshot(&self, session_id: &SessionId) -> Result<Session, TableError> {
        let mailbox = self.mailbox(session_id).await?;
        let (reply, response) = oneshot::channel();
        let closed = || TableError::SessionClosed(session_id.clone());
        mailbox
            .send(SessionCommand::Snapshot { reply })
            .await
            .map_err(|_| closed())?;
        response.await.map_err(|_| closed())
    }

    /// Ids of the running sessions.
    pub async fn active(&self) -> Vec<SessionId> {
        let state = self.state.lock().await;
        let mut ids: Vec<_> = state.sessions.keys().cloned().collect();
        ids.sort();
        ids
    }

    async fn mailbox(
        &self,
        session_id: &SessionId,
    ) -> Result<mpsc::Sender<SessionCommand>, TableError> {
        self.state
            .lock()
            .await
            .sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| {
                debug!("Session not found");
                TableError::SessionNotFound(session_id.clone())
            })
    }
}

struct SessionActor {
    engine: Engine<ChaCha8Rng, TracingLog>,
    session: Session,
    idle: Duration,
    renderer: Arc<dyn Renderer>,
    table: Arc<Mutex<TableState>>,
}

impl SessionActor {
    #[instrument(skip_all, fields(session_id = %self.session.id()))]
    async fn run(mut self, mut rx: mpsc::Receiver<SessionCommand>) {
        let mut deadline = Instant::now() + self.idle;
        loop {
            tokio::select! {
                command = rx.recv() => match command {
                    Some(SessionCommand::Move { actor, mv, reply }) => {
                        let result = self.engine.submit_move(&mut self.session, actor, mv);
                        if let Ok(update) = &result {
                            deadline = Instant::now() + self.idle;
                            self.renderer.publish(&render(update)).await;
                        }
                        let _ = reply.send(result);
                        if self.session.is_terminal() {
                            break;
                        }
                    }
                    Some(SessionCommand::Snapshot { reply }) => {
                        let _ = reply.send(self.session.clone());
                    }
                    None => break,
                },
                _ = sleep_until(deadline) => {
                    if let Some(update) = self.engine.expire(&mut self.session) {
                        self.renderer.publish(&render(&update)).await;
                    }
                    break;
                }
            }
        }

        self.table.lock().await.sessions.remove(self.session.id());
        debug!(phase = ?self.session.phase(), "Session actor stopped");
    }
}
