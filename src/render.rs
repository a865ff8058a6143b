//! Rendering boundary: session snapshots to views, views to messages.

use arcade_games::duel::{BARBS, Duel};
use arcade_games::guess::GuessGame;
use arcade_games::rps::{Hand, RpsRound};
use arcade_games::tictactoe::{Mark, Square, TicTacToe};
use arcade_games::{
    EngineError, GameKind, GameState, Move, Participant, Phase, Play, Position, Seat, Session,
    SessionId, SessionUpdate, TurnEvent,
};
use async_trait::async_trait;
use derive_getters::Getters;
use derive_new::new;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use strum::IntoEnumIterator;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::input::{DUEL_PREFIX, component_id};

/// Label of an empty tic-tac-toe cell.
pub const EMPTY_CELL: &str = "⬜";

/// Button colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    /// Call to action.
    Primary,
    /// Neutral.
    Secondary,
    /// Green.
    Success,
    /// Red.
    Danger,
}

/// A clickable button.
#[derive(Debug, Clone, PartialEq, Serialize, Getters, new)]
pub struct Button {
    /// Text or emoji on the button.
    label: String,
    /// Id sent back on click.
    custom_id: String,
    /// Colour.
    style: ButtonStyle,
    /// Greyed out.
    disabled: bool,
}

/// One entry of a select menu.
#[derive(Debug, Clone, PartialEq, Serialize, Getters, new)]
pub struct SelectOption {
    /// Text shown.
    label: String,
    /// Component id sent back on selection.
    value: String,
}

/// A drop-down menu.
#[derive(Debug, Clone, PartialEq, Serialize, Getters, new)]
pub struct Select {
    /// Id of the menu itself.
    custom_id: String,
    /// Hint shown before a choice.
    placeholder: String,
    /// Choices.
    options: Vec<SelectOption>,
    /// Greyed out.
    disabled: bool,
}

/// Invitation to type a reply.
#[derive(Debug, Clone, PartialEq, Serialize, Getters, new)]
pub struct TextPrompt {
    /// Hint shown in the input box.
    placeholder: String,
    /// Replies are no longer read.
    disabled: bool,
}

/// Anything a player can interact with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Control {
    /// Button.
    Button(Button),
    /// Select menu.
    Select(Select),
    /// Typed reply.
    TextPrompt(TextPrompt),
}

impl Control {
    /// True when the control no longer accepts input.
    pub fn is_disabled(&self) -> bool {
        match self {
            Control::Button(button) => button.disabled,
            Control::Select(select) => select.disabled,
            Control::TextPrompt(prompt) => prompt.disabled,
        }
    }
}

/// Message content plus its controls.
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
pub struct View {
    /// Session the view belongs to.
    session_id: SessionId,
    /// Game shown.
    kind: GameKind,
    /// Status text.
    content: String,
    /// Control rows, top to bottom.
    rows: Vec<Vec<Control>>,
    /// The session reached a final phase.
    closed: bool,
}

impl View {
    /// Every control, row by row.
    pub fn controls(&self) -> impl Iterator<Item = &Control> {
        self.rows.iter().flatten()
    }

    /// Buttons only.
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.controls().filter_map(|control| match control {
            Control::Button(button) => Some(button),
            _ => None,
        })
    }
}

/// Renders the state after an update, narrating the moves it applied.
#[instrument(skip(update), fields(session_id = %update.session().id()))]
pub fn render(update: &SessionUpdate) -> View {
    build(update.session(), update.events())
}

/// Renders a session as it stands.
pub fn render_session(session: &Session) -> View {
    build(session, &[])
}

/// First view of a new session, headed by who started it.
pub fn render_opening(session: &Session) -> View {
    let mut view = build(session, &[]);
    let challenger = session.participant(Seat::First);
    view.content = format!("{}\n{}", announce(challenger, session.kind()), view.content);
    view
}

fn build(session: &Session, events: &[TurnEvent]) -> View {
    let closed = session.is_terminal();
    let (content, rows) = match session.state() {
        GameState::TicTacToe(game) => tictactoe_view(session, game, closed),
        GameState::Guess(game) => guess_view(session, game, closed),
        GameState::Rps(round) => rps_view(session, round, closed),
        GameState::Duel(duel) => duel_view(session, duel, events, closed),
    };
    View {
        session_id: session.id().clone(),
        kind: session.kind(),
        content,
        rows,
        closed,
    }
}

fn name(session: &Session, seat: Seat) -> &str {
    session.participant(seat).name()
}

fn winner_seat(session: &Session) -> Option<Seat> {
    match session.phase() {
        Phase::Won(id) => session.seat_of(*id),
        _ => None,
    }
}

const EXPIRED: &str = "⌛ The game expired after inactivity.";

fn tictactoe_view(session: &Session, game: &TicTacToe, closed: bool) -> (String, Vec<Vec<Control>>) {
    let x = name(session, Seat::First);
    let o = name(session, Seat::Second);
    let mut content = if session.is_ai_game() {
        format!("**Tic-tac-toe against the AI!** 🤖\n{} is ❌.", x)
    } else {
        format!("**Tic-tac-toe, player vs player!** 🤝\n{} (❌) vs. {} (⭕).", x, o)
    };
    content.push_str("\n\n");
    let status = match (session.phase(), winner_seat(session), session.to_move()) {
        (Phase::Won(_), Some(seat), _) => format!(
            "🎉 **{}** won the game with {}! 🎉",
            name(session, seat),
            Mark::for_seat(seat).symbol()
        ),
        (Phase::Draw, _, _) => "🤝 **It's a draw!** 🤝".to_string(),
        (Phase::Expired, _, _) => EXPIRED.to_string(),
        (_, _, Some(player)) => format!(
            "Turn of **{}** ({}). Pick a cell!",
            player.name(),
            session
                .seat_of(*player.id())
                .map(|seat| Mark::for_seat(seat).symbol())
                .unwrap_or_default()
        ),
        _ => String::new(),
    };
    content.push_str(&status);

    let rows = Position::ALL
        .chunks(3)
        .map(|row| {
            row.iter()
                .map(|pos| {
                    let (label, style, taken) = match game.board().get(*pos) {
                        Square::Occupied(mark) => {
                            let style = match mark.seat() {
                                Seat::First => ButtonStyle::Danger,
                                Seat::Second => ButtonStyle::Success,
                            };
                            (mark.symbol(), style, true)
                        }
                        Square::Empty => (EMPTY_CELL, ButtonStyle::Secondary, false),
                    };
                    let custom_id = component_id(&Move::Place(*pos)).unwrap_or_default();
                    Control::Button(Button::new(
                        label.to_string(),
                        custom_id,
                        style,
                        taken || closed,
                    ))
                })
                .collect()
        })
        .collect();
    (content, rows)
}

fn guess_view(session: &Session, game: &GuessGame, closed: bool) -> (String, Vec<Vec<Control>>) {
    let (low, high) = game.range();
    let player = name(session, Seat::First);
    let mut content = format!(
        "**Guess the number!** 🔢\n{}, I'm thinking of a number between {} and {}.\n",
        player, low, high
    );
    for (guess, hint) in game.guesses() {
        content.push_str(&format!("\n`{}` is {}", guess, hint));
    }
    content.push_str("\n\n");
    let status = match (session.phase(), winner_seat(session)) {
        (Phase::Won(_), Some(Seat::First)) => format!(
            "🎉 **{}** found {} in {} attempts! 🎉",
            player,
            game.secret(),
            game.attempts_used()
        ),
        (Phase::Won(_), _) => format!("💀 Out of attempts! The number was {}.", game.secret()),
        (Phase::Expired, _) => format!("{} The number was {}.", EXPIRED, game.secret()),
        _ => format!(
            "Attempts left: {}. Type your guess!",
            game.attempts_left()
        ),
    };
    content.push_str(&status);

    let prompt = TextPrompt::new(format!("A number between {} and {}", low, high), closed);
    (content, vec![vec![Control::TextPrompt(prompt)]])
}

fn hand_text(hand: Hand) -> String {
    format!("{} {}", hand.emoji(), hand)
}

fn rps_view(session: &Session, round: &RpsRound, closed: bool) -> (String, Vec<Vec<Control>>) {
    let first = name(session, Seat::First);
    let second = name(session, Seat::Second);
    let mut content = format!("**Rock, paper, scissors!** ✊\n{} vs. {}\n\n", first, second);
    let status = match (round.revealed(), session.phase()) {
        (Some((a, b)), phase) => {
            let result = match (phase, winner_seat(session)) {
                (Phase::Won(_), Some(seat)) => format!("🎉 **{}** wins! 🎉", name(session, seat)),
                _ => "🤝 **It's a draw!** 🤝".to_string(),
            };
            format!(
                "{}: {} vs. {}: {}\n{}",
                first,
                hand_text(a),
                second,
                hand_text(b),
                result
            )
        }
        (None, Phase::Expired) => EXPIRED.to_string(),
        (None, _) => Seat::BOTH
            .iter()
            .map(|seat| {
                if round.has_chosen(*seat) {
                    format!("✅ {} has chosen.", name(session, *seat))
                } else {
                    format!("⏳ {} is choosing...", name(session, *seat))
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
    };
    content.push_str(&status);

    let buttons = Hand::iter()
        .map(|hand| {
            let custom_id = component_id(&Move::Throw(hand)).unwrap_or_default();
            Control::Button(Button::new(
                hand_text(hand),
                custom_id,
                ButtonStyle::Primary,
                closed,
            ))
        })
        .collect();
    (content, vec![buttons])
}

fn hearts(lives: u8) -> String {
    if lives == 0 {
        "💀".to_string()
    } else {
        "❤️".repeat(usize::from(lives))
    }
}

fn duel_view(
    session: &Session,
    duel: &Duel,
    events: &[TurnEvent],
    closed: bool,
) -> (String, Vec<Vec<Control>>) {
    let mut content = format!(
        "**Insult duel!** ⚔️\n{} {} vs. {} {}\n",
        name(session, Seat::First),
        hearts(duel.lives(Seat::First)),
        name(session, Seat::Second),
        hearts(duel.lives(Seat::Second)),
    );
    if !closed {
        content.push_str(&format!(
            "Round {} · insults left in the pool: {}\n",
            duel.rounds().len() + 1,
            duel.remaining()
        ));
    }

    for event in events {
        if let Play::Riposte(riposte) = event.play {
            let attacker = name(session, riposte.attacker);
            let defender = name(session, riposte.attacker.other());
            let verdict = if riposte.parried {
                format!("Parried! {} loses a life.", attacker)
            } else {
                format!("Touché! {} loses a life.", defender)
            };
            content.push_str(&format!(
                "\n*{}*: \"{}\"\n*{}*: \"{}\"\n{}\n",
                attacker,
                BARBS[riposte.insult].insult,
                defender,
                BARBS[riposte.retort].retort,
                verdict
            ));
        }
    }
    content.push('\n');

    let status = match (session.phase(), winner_seat(session), duel.current()) {
        (Phase::Won(_), Some(seat), _) => format!("🏆 **{}** wins the duel! 🏆", name(session, seat)),
        (Phase::Draw, _, _) => "🤝 **Out of insults, and the duel is a draw!** 🤝".to_string(),
        (Phase::Expired, _, _) => EXPIRED.to_string(),
        (_, _, Some(exchange)) => format!(
            "**{}**: \"{}\"\n{}, pick your retort!",
            name(session, exchange.attacker()),
            BARBS[exchange.insult()].insult,
            name(session, exchange.defender())
        ),
        _ => String::new(),
    };
    content.push_str(&status);

    let options = duel
        .current()
        .filter(|_| !closed)
        .map(|exchange| {
            exchange
                .options()
                .iter()
                .map(|index| {
                    SelectOption::new(
                        BARBS[*index].retort.to_string(),
                        component_id(&Move::Retort(*index)).unwrap_or_default(),
                    )
                })
                .collect()
        })
        .unwrap_or_default();
    let select = Select::new(
        DUEL_PREFIX.to_string(),
        "Pick your retort".to_string(),
        options,
        closed,
    );
    (content, vec![vec![Control::Select(select)]])
}

/// Ephemeral text for a rejected request.
pub fn notice(err: &EngineError) -> String {
    match err {
        EngineError::NotYourTurn => "Wait for your turn! 🕰️".to_string(),
        EngineError::InvalidMove(reason) => {
            let mut chars = reason.chars();
            match chars.next() {
                Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
                None => "That move isn't allowed.".to_string(),
            }
        }
        EngineError::GameAlreadyOver => "This game is already over.".to_string(),
        EngineError::SelfChallengeRejected => "You can't play against yourself. 😅".to_string(),
    }
}

/// Opening line announcing a new game.
pub fn announce(challenger: &Participant, kind: GameKind) -> String {
    format!("{} started a game of {}.", challenger.name(), kind.title())
}

/// Receives every view the table produces.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Shows `view`, creating or editing the session's message.
    async fn publish(&self, view: &View);
}

/// Identifier of a posted message.
pub type MessageId = u64;

/// A posted message and the latest view shown in it.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct Message {
    /// Message id.
    id: MessageId,
    /// Current content.
    view: View,
    /// Times the message was edited after posting.
    edits: u32,
}

/// In-memory message store standing in for a chat channel.
///
/// The board owns the messages; each session keeps only a weak link, so a
/// deleted message stays deleted and later views for it are dropped.
#[derive(Debug, Default)]
pub struct MessageBoard {
    messages: Mutex<HashMap<MessageId, Arc<Mutex<Message>>>>,
    links: Mutex<HashMap<SessionId, Weak<Mutex<Message>>>>,
    next_id: AtomicU64,
}

impl MessageBoard {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deletes a message. Returns false when it was already gone.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: MessageId) -> bool {
        let removed = self.messages.lock().await.remove(&id).is_some();
        debug!(removed, "Message deletion requested");
        removed
    }

    /// The message currently showing a session, if it still exists.
    pub async fn message_for(&self, session_id: &SessionId) -> Option<Message> {
        let link = self.links.lock().await.get(session_id).cloned()?;
        let message = link.upgrade()?;
        let message = message.lock().await.clone();
        Some(message)
    }

    /// Number of live messages.
    pub async fn len(&self) -> usize {
        self.messages.lock().await.len()
    }

    /// True when no message is live.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn post(&self, view: &View) -> Arc<Mutex<Message>> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let message = Arc::new(Mutex::new(Message {
            id,
            view: view.clone(),
            edits: 0,
        }));
        self.messages.lock().await.insert(id, Arc::clone(&message));
        info!(message_id = id, session_id = %view.session_id, "Message posted");
        message
    }
}

#[async_trait]
impl Renderer for MessageBoard {
    #[instrument(skip(self, view), fields(session_id = %view.session_id, closed = view.closed))]
    async fn publish(&self, view: &View) {
        let mut links = self.links.lock().await;
        match links.get(&view.session_id).map(Weak::upgrade) {
            Some(Some(message)) => {
                let mut message = message.lock().await;
                message.view = view.clone();
                message.edits += 1;
                debug!(message_id = message.id, "Message edited");
            }
            Some(None) => {
                debug!("Message was deleted, view dropped");
            }
            None => {
                let message = self.post(view).await;
                links.insert(view.session_id.clone(), Arc::downgrade(&message));
            }
        }
        if view.closed {
            links.remove(&view.session_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_games::{Engine, GameSettings, PlayerId};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn engine() -> Engine<ChaCha8Rng, arcade_games::TracingLog> {
        Engine::new(
            GameSettings::default(),
            Participant::ai(PlayerId(1), "Arcade"),
            ChaCha8Rng::seed_from_u64(3),
            arcade_games::TracingLog,
        )
    }

    #[test]
    fn test_notice_capitalizes_reason() {
        let err = EngineError::invalid("center is already taken");
        assert_eq!(notice(&err), "Center is already taken.");
        assert_eq!(notice(&EngineError::NotYourTurn), "Wait for your turn! 🕰️");
    }

    #[test]
    fn test_tictactoe_grid_has_nine_cells() {
        let mut engine = engine();
        let session = engine
            .create(
                GameKind::TicTacToe,
                Participant::human(PlayerId(5), "alice"),
                None,
            )
            .expect("session");
        let view = render_session(&session);
        assert_eq!(view.rows().len(), 3);
        assert!(view.rows().iter().all(|row| row.len() == 3));
        assert!(view.buttons().all(|b| b.label() == EMPTY_CELL && !b.disabled()));
        assert!(view.content().contains("Turn of **alice** (❌)"));
    }

    #[tokio::test]
    async fn test_board_posts_then_edits() {
        let mut engine = engine();
        let mut session = engine
            .create(GameKind::Rps, Participant::human(PlayerId(5), "alice"), None)
            .expect("session");
        let board = MessageBoard::new();
        board.publish(&render_session(&session)).await;
        assert_eq!(board.len().await, 1);

        let update = engine
            .submit_move(&mut session, PlayerId(5), Move::Throw(Hand::Rock))
            .expect("throw");
        let view = render(&update);
        board.publish(&view).await;

        assert_eq!(board.len().await, 1);
        // Closed views drop the link once shown.
        assert!(board.message_for(session.id()).await.is_none());
        let message = board.messages.lock().await.values().next().cloned().expect("message");
        let message = message.lock().await;
        assert_eq!(message.edits, 1);
        assert!(message.view.closed);
    }

    #[tokio::test]
    async fn test_deleted_message_is_not_resurrected() {
        let mut engine = engine();
        let session = engine
            .create(GameKind::TicTacToe, Participant::human(PlayerId(5), "alice"), None)
            .expect("session");
        let board = MessageBoard::new();
        let view = render_session(&session);
        board.publish(&view).await;
        let id = *board.message_for(session.id()).await.expect("posted").id();

        assert!(board.delete(id).await);
        board.publish(&view).await;
        assert!(board.is_empty().await);
        assert!(!board.delete(id).await);
    }
}
