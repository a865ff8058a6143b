//! Session table: actors, idle timers and rendering.

use arcade_bot::render::Control;
use arcade_bot::{BotConfig, MessageBoard, SessionTable, TableError};
use arcade_games::rps::Hand;
use arcade_games::{EngineError, GameKind, Move, Participant, Phase, PlayerId, Position};
use std::sync::Arc;
use std::time::Duration;

const ALICE: PlayerId = PlayerId(10);
const BOB: PlayerId = PlayerId(20);

fn setup() -> (SessionTable, Arc<MessageBoard>) {
    let config = BotConfig::default().with_rng_seed(Some(7));
    let board = Arc::new(MessageBoard::new());
    let table = SessionTable::new(&config, board.clone());
    (table, board)
}

fn alice() -> Participant {
    Participant::human(ALICE, "alice")
}

fn bob() -> Participant {
    Participant::human(BOB, "bob")
}

#[tokio::test]
async fn test_start_posts_first_view() {
    let (table, board) = setup();
    let view = table
        .start(GameKind::TicTacToe, alice(), None)
        .await
        .expect("started");
    assert!(!view.closed());
    assert!(view.content().starts_with("alice started a game of Tic-tac-toe."));
    assert_eq!(board.len().await, 1);
    let message = board.message_for(view.session_id()).await.expect("message");
    assert_eq!(message.view(), &view);
    assert_eq!(table.active().await, vec![view.session_id().clone()]);
}

#[tokio::test]
async fn test_self_challenge_is_refused() {
    let (table, board) = setup();
    let result = table.start(GameKind::Rps, alice(), Some(alice())).await;
    assert_eq!(
        result.unwrap_err(),
        TableError::Engine(EngineError::SelfChallengeRejected)
    );
    assert!(board.is_empty().await);
}

#[tokio::test]
async fn test_move_edits_message() {
    let (table, board) = setup();
    let view = table
        .start(GameKind::TicTacToe, alice(), Some(bob()))
        .await
        .expect("started");
    let id = view.session_id().clone();

    let update = table
        .submit(&id, ALICE, Move::Place(Position::Center))
        .await
        .expect("move");
    assert_eq!(update.events().len(), 1);

    let message = board.message_for(&id).await.expect("message");
    assert_eq!(*message.edits(), 1);
    let center = message.view().buttons().nth(4).expect("center cell");
    assert_eq!(center.label(), "❌");
    assert!(*center.disabled());
}

#[tokio::test]
async fn test_rejection_reaches_caller() {
    let (table, _board) = setup();
    let view = table
        .start(GameKind::TicTacToe, alice(), Some(bob()))
        .await
        .expect("started");
    let result = table
        .submit(view.session_id(), BOB, Move::Place(Position::Center))
        .await;
    assert_eq!(result.unwrap_err(), TableError::Engine(EngineError::NotYourTurn));
}

#[tokio::test]
async fn test_finished_session_leaves_table() {
    let (table, _board) = setup();
    let view = table
        .start(GameKind::Rps, alice(), None)
        .await
        .expect("started");
    let id = view.session_id().clone();

    let update = table
        .submit(&id, ALICE, Move::Throw(Hand::Rock))
        .await
        .expect("throw");
    assert!(update.is_final());

    // The actor unregisters itself right after replying.
    for _ in 0..10 {
        if table.active().await.is_empty() {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert!(table.active().await.is_empty());
    let late = table.submit(&id, ALICE, Move::Throw(Hand::Paper)).await;
    assert!(matches!(
        late,
        Err(TableError::SessionNotFound(_)) | Err(TableError::SessionClosed(_))
    ));
}

#[tokio::test]
async fn test_unknown_session() {
    let (table, _board) = setup();
    let missing = arcade_games::SessionId::from("nope");
    assert_eq!(
        table.snapshot(&missing).await.unwrap_err(),
        TableError::SessionNotFound(missing)
    );
}

#[tokio::test(start_paused = true)]
async fn test_idle_session_expires() {
    let (table, board) = setup();
    let view = table
        .start(GameKind::Rps, alice(), None)
        .await
        .expect("started");
    let id = view.session_id().clone();

    tokio::time::sleep(Duration::from_secs(119)).await;
    assert_eq!(*table.snapshot(&id).await.expect("alive").phase(), Phase::InProgress);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(matches!(
        table.snapshot(&id).await,
        Err(TableError::SessionNotFound(_))
    ));

    // The expired view closed the message and disabled every control.
    assert!(board.message_for(&id).await.is_none());
    assert_eq!(board.len().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_moves_reset_idle_timer() {
    let (table, _board) = setup();
    let view = table
        .start(GameKind::TicTacToe, alice(), Some(bob()))
        .await
        .expect("started");
    let id = view.session_id().clone();

    tokio::time::sleep(Duration::from_secs(250)).await;
    table
        .submit(&id, ALICE, Move::Place(Position::Center))
        .await
        .expect("move");

    tokio::time::sleep(Duration::from_secs(250)).await;
    assert_eq!(*table.snapshot(&id).await.expect("alive").phase(), Phase::InProgress);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert!(table.snapshot(&id).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_expired_view_disables_controls() {
    struct Capture(tokio::sync::Mutex<Vec<arcade_bot::View>>);

    #[async_trait::async_trait]
    impl arcade_bot::Renderer for Capture {
        async fn publish(&self, view: &arcade_bot::View) {
            self.0.lock().await.push(view.clone());
        }
    }

    let capture = Arc::new(Capture(tokio::sync::Mutex::new(Vec::new())));
    let config = BotConfig::default().with_rng_seed(Some(1));
    let table = SessionTable::new(&config, capture.clone());
    table
        .start(GameKind::Duel, alice(), None)
        .await
        .expect("started");

    tokio::time::sleep(Duration::from_secs(301)).await;

    let views = capture.0.lock().await;
    assert_eq!(views.len(), 2);
    let last = &views[1];
    assert!(*last.closed());
    assert!(last.content().contains("expired"));
    assert!(last.controls().all(Control::is_disabled));
}

#[test]
fn test_engine_rejection_is_the_error_source() {
    use std::error::Error;

    let err = TableError::from(EngineError::invalid("top-left is already taken"));
    let source = err.source().expect("engine source");
    assert_eq!(source.to_string(), "Invalid move: top-left is already taken");
    assert!(source.source().is_none());

    let missing = TableError::SessionNotFound(arcade_games::SessionId::from("gone"));
    assert!(missing.source().is_none());
    assert_eq!(missing.to_string(), "Session gone not found");
}
