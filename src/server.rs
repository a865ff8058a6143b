//! HTTP interaction endpoint standing in for the chat gateway.

use crate::input::{Command, parse_command, parse_component, parse_reply};
use crate::render::{View, notice, render, render_session};
use crate::{InputError, SessionTable, TableError};
use arcade_games::{EngineError, Participant, PlayerId, SessionId};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// A platform user as sent in interaction payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Platform id.
    pub id: u64,
    /// Display name.
    pub name: String,
}

impl User {
    fn participant(&self) -> Participant {
        Participant::human(PlayerId(self.id), self.name.clone())
    }
}

/// Incoming interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Interaction {
    /// A slash command such as `/rps <@20>`.
    Command {
        /// Who typed it.
        user: User,
        /// Raw command text.
        text: String,
        /// Users mentioned in the text.
        #[serde(default)]
        mentions: Vec<User>,
    },
    /// A button click or select choice.
    Component {
        /// Who clicked.
        user: User,
        /// Session shown in the clicked message.
        session_id: SessionId,
        /// Component id, e.g. `ttt:4`.
        custom_id: String,
    },
    /// A typed reply to a game message.
    Reply {
        /// Who typed it.
        user: User,
        /// Session replied to.
        session_id: SessionId,
        /// Reply text.
        text: String,
    },
}

/// Outgoing answer: a view to show or a notice for the sender only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionResponse {
    /// New or updated game message.
    View(View),
    /// Text only the sender sees.
    Notice {
        /// Message text.
        content: String,
        /// Always true for rejections.
        ephemeral: bool,
    },
}

impl InteractionResponse {
    fn notice(content: String) -> Self {
        Self::Notice {
            content,
            ephemeral: true,
        }
    }
}

/// Builds the router.
pub fn router(table: SessionTable) -> Router {
    Router::new()
        .route("/interactions", post(interact))
        .route("/sessions/{id}", get(session_view))
        .route("/health", get(health))
        .with_state(table)
}

/// Binds and serves until the process stops.
#[instrument(skip(table))]
pub async fn serve(table: SessionTable, host: &str, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!("Server ready at http://{}:{}/", host, port);
    axum::serve(listener, router(table)).await?;
    Ok(())
}

fn table_error(err: TableError) -> Response {
    let status = match err {
        TableError::SessionNotFound(_) | TableError::SessionClosed(_) => StatusCode::NOT_FOUND,
        TableError::Engine(_) => StatusCode::OK,
    };
    let content = match &err {
        TableError::Engine(e) => notice(e),
        _ => "That game is no longer running.".to_string(),
    };
    debug!(error = %err, "Interaction rejected");
    (status, Json(InteractionResponse::notice(content))).into_response()
}

fn input_error(err: InputError) -> Response {
    debug!(error = %err, "Malformed interaction");
    let content = notice(&EngineError::from(err));
    Json(InteractionResponse::notice(content)).into_response()
}

#[instrument(skip(table, interaction))]
async fn interact(State(table): State<SessionTable>, Json(interaction): Json<Interaction>) -> Response {
    match interaction {
        Interaction::Command {
            user,
            text,
            mentions,
        } => {
            let Command::Start { kind, opponent } = match parse_command(&text) {
                Ok(command) => command,
                Err(e) => return input_error(e),
            };
            let opponent = opponent.map(|id| {
                mentions
                    .iter()
                    .find(|m| m.id == id.0)
                    .map(User::participant)
                    .unwrap_or_else(|| Participant::human(id, format!("<@{}>", id)))
            });
            info!(user = user.id, game = %kind, "Game requested");
            match table.start(kind, user.participant(), opponent).await {
                Ok(view) => Json(InteractionResponse::View(view)).into_response(),
                Err(e) => table_error(e),
            }
        }
        Interaction::Component {
            user,
            session_id,
            custom_id,
        } => match parse_component(&custom_id) {
            Ok(mv) => submit(&table, &session_id, &user, mv).await,
            Err(e) => input_error(e),
        },
        Interaction::Reply {
            user,
            session_id,
            text,
        } => match parse_reply(&text) {
            Ok(mv) => submit(&table, &session_id, &user, mv).await,
            Err(e) => input_error(e),
        },
    }
}

async fn submit(
    table: &SessionTable,
    session_id: &SessionId,
    user: &User,
    mv: arcade_games::Move,
) -> Response {
    match table.submit(session_id, PlayerId(user.id), mv).await {
        Ok(update) => Json(InteractionResponse::View(render(&update))).into_response(),
        Err(e) => table_error(e),
    }
}

#[instrument(skip(table))]
async fn session_view(State(table): State<SessionTable>, Path(id): Path<String>) -> Response {
    match table.snapshot(&SessionId::new(id)).await {
        Ok(session) => Json(render_session(&session)).into_response(),
        Err(e) => table_error(e),
    }
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    sessions: usize,
}

async fn health(State(table): State<SessionTable>) -> Json<Health> {
    Json(Health {
        status: "ok",
        sessions: table.active().await.len(),
    })
}
