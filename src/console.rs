//! Local play against the AI on stdin/stdout.

use crate::input::{parse_component, parse_reply};
use crate::render::{Control, Renderer, View, notice};
use crate::{BotConfig, InputError, SessionTable};
use arcade_games::{EngineError, GameKind, Move, Participant, PlayerId, SessionId};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, instrument};

/// Player id used for the person at the keyboard.
pub const CONSOLE_PLAYER: PlayerId = PlayerId(u64::MAX);

/// Prints each view as plain text.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleRenderer;

#[async_trait]
impl Renderer for ConsoleRenderer {
    async fn publish(&self, view: &View) {
        println!("{}", text_view(view));
    }
}

/// Plain-text rendering of a view: content, then numbered choices.
pub fn text_view(view: &View) -> String {
    let mut out = format!("\n{}\n", view.content());
    for row in view.rows() {
        let line: Vec<String> = row
            .iter()
            .map(|control| match control {
                Control::Button(button) => button.label().clone(),
                Control::Select(select) => select
                    .options()
                    .iter()
                    .enumerate()
                    .map(|(i, option)| format!("  {}. {}", i + 1, option.label()))
                    .collect::<Vec<_>>()
                    .join("\n"),
                Control::TextPrompt(prompt) => format!("> {}", prompt.placeholder()),
            })
            .collect();
        let separator = if row.iter().all(|c| matches!(c, Control::Button(_))) {
            " "
        } else {
            "\n"
        };
        out.push_str(&line.join(separator));
        out.push('\n');
    }
    out
}

/// Maps a typed console line to a move.
///
/// Cells are typed 1-9, hands by name, retorts by their number in the list
/// and guesses as plain numbers.
pub fn console_move(kind: GameKind, view: &View, line: &str) -> Result<Move, InputError> {
    let line = line.trim();
    match kind {
        GameKind::TicTacToe => {
            let cell = line
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .ok_or_else(|| InputError::NotANumber(line.to_string()))?;
            parse_component(&format!("ttt:{}", cell))
        }
        GameKind::Guess => parse_reply(line),
        GameKind::Rps => parse_component(&format!("rps:{}", line)),
        GameKind::Duel => {
            let choice = line
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .ok_or_else(|| InputError::NotANumber(line.to_string()))?;
            let value = view
                .controls()
                .find_map(|control| match control {
                    Control::Select(select) => select.options().get(choice),
                    _ => None,
                })
                .map(|option| option.value().clone())
                .ok_or_else(|| InputError::BadPayload {
                    kind: "duel".to_string(),
                    payload: line.to_string(),
                })?;
            parse_component(&value)
        }
    }
}

/// Plays one game against the AI until it ends or stdin closes.
#[instrument(skip(config))]
pub async fn play(kind: GameKind, config: &BotConfig) -> anyhow::Result<()> {
    let table = SessionTable::new(config, Arc::new(ConsoleRenderer));
    let you = Participant::human(CONSOLE_PLAYER, "you");
    let mut view = table.start(kind, you, None).await?;
    let session_id: SessionId = view.session_id().clone();
    info!(session_id = %session_id, "Console game started");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while !*view.closed() {
        let Some(line) = lines.next_line().await? else {
            info!("Input closed, leaving game");
            break;
        };
        let mv = match console_move(kind, &view, &line) {
            Ok(mv) => mv,
            Err(e) => {
                println!("{}", notice(&EngineError::from(e)));
                continue;
            }
        };
        match table.submit(&session_id, CONSOLE_PLAYER, mv).await {
            Ok(update) => view = crate::render::render(&update),
            Err(crate::TableError::Engine(e)) => println!("{}", notice(&e)),
            Err(e) => {
                println!("{}", e);
                break;
            }
        }
    }
    Ok(())
}
