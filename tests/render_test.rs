//! Views produced for each game.

use arcade_bot::render::{ButtonStyle, Control, render, render_opening, render_session};
use arcade_games::duel::BARBS;
use arcade_games::guess::GuessGame;
use arcade_games::rps::Hand;
use arcade_games::tictactoe::{Board, TicTacToe};
use arcade_games::{Engine, GameKind, GameSettings, GameState, Move, Participant, PlayerId, Position, TracingLog};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const ALICE: PlayerId = PlayerId(10);
const BOB: PlayerId = PlayerId(20);

fn engine(seed: u64) -> Engine<ChaCha8Rng, TracingLog> {
    Engine::new(
        GameSettings::default(),
        Participant::ai(PlayerId(1), "Arcade"),
        ChaCha8Rng::seed_from_u64(seed),
        TracingLog,
    )
}

fn alice() -> Participant {
    Participant::human(ALICE, "alice")
}

#[test]
fn test_finished_tictactoe_disables_every_cell() {
    let mut engine = engine(1);
    let state = GameState::TicTacToe(TicTacToe::from_board(Board::from_pattern("XX-OO----")));
    let mut session = engine.start(state, alice(), Participant::human(BOB, "bob"));
    let update = engine
        .submit_move(&mut session, ALICE, Move::Place(Position::TopRight))
        .expect("winning move");

    let view = render(&update);
    assert!(*view.closed());
    assert!(view.controls().all(Control::is_disabled));
    assert!(view.content().contains("🎉 **alice** won the game with ❌!"));

    let styles: Vec<ButtonStyle> = view.buttons().map(|b| *b.style()).collect();
    assert_eq!(styles[0], ButtonStyle::Danger);
    assert_eq!(styles[3], ButtonStyle::Success);
    assert_eq!(styles[8], ButtonStyle::Secondary);
}

#[test]
fn test_pvp_header_names_both_marks() {
    let mut engine = engine(1);
    let session = engine
        .create(GameKind::TicTacToe, alice(), Some(Participant::human(BOB, "bob")))
        .expect("session");
    let view = render_session(&session);
    assert!(view.content().contains("alice (❌) vs. bob (⭕)"));
    assert!(view.content().contains("Turn of **alice** (❌)"));
}

#[test]
fn test_turn_line_follows_the_player_to_move() {
    let mut engine = engine(1);
    let mut session = engine
        .create(GameKind::TicTacToe, alice(), Some(Participant::human(BOB, "bob")))
        .expect("session");
    let update = engine
        .submit_move(&mut session, ALICE, Move::Place(Position::Center))
        .expect("move");
    let view = render(&update);
    assert!(view.content().contains("Turn of **bob** (⭕). Pick a cell!"));
    assert!(!view.content().contains("Turn of **alice**"));
}

#[test]
fn test_opening_view_announces_challenger() {
    let mut engine = engine(1);
    let session = engine
        .create(GameKind::Rps, alice(), None)
        .expect("session");
    let opening = render_opening(&session);
    assert!(opening.content().starts_with("alice started a game of Rock, paper, scissors.\n"));
    assert!(opening.content().ends_with(render_session(&session).content().as_str()));
    assert_eq!(opening.rows(), render_session(&session).rows());
}

#[test]
fn test_guess_view_reveals_secret_when_lost() {
    let mut engine = engine(2);
    let state = GameState::Guess(GuessGame::with_secret(1, 100, 64, 2));
    let mut session = engine.start(state, alice(), engine.house().clone());
    let view = render_session(&session);
    assert!(view.content().contains("between 1 and 100"));
    assert!(!view.content().contains("64"));

    engine
        .submit_move(&mut session, ALICE, Move::Guess(10))
        .expect("guess");
    let update = engine
        .submit_move(&mut session, ALICE, Move::Guess(90))
        .expect("guess");
    let view = render(&update);
    assert!(view.content().contains("`10` is too low"));
    assert!(view.content().contains("`90` is too high"));
    assert!(view.content().contains("The number was 64."));
    assert!(view.controls().all(Control::is_disabled));
}

#[test]
fn test_rps_hides_committed_hand() {
    let mut engine = engine(3);
    let mut session = engine
        .create(GameKind::Rps, alice(), Some(Participant::human(BOB, "bob")))
        .expect("session");
    let update = engine
        .submit_move(&mut session, BOB, Move::Throw(Hand::Scissors))
        .expect("throw");
    let view = render(&update);
    assert!(view.content().contains("✅ bob has chosen."));
    assert!(view.content().contains("⏳ alice is choosing..."));
    assert!(!view.content().contains(Hand::Scissors.emoji()));
    assert_eq!(view.buttons().count(), 3);
    assert!(view.buttons().all(|b| !*b.disabled()));
}

#[test]
fn test_duel_view_offers_current_retorts() {
    let mut engine = engine(4);
    let session = engine
        .create(GameKind::Duel, alice(), None)
        .expect("session");
    let view = render_session(&session);
    let GameState::Duel(duel) = session.state() else {
        panic!("duel state expected");
    };
    assert!(view.content().contains(&format!(
        "Round 1 · insults left in the pool: {}",
        BARBS.len() - 1
    )));
    let exchange = duel.current().expect("open round");
    assert!(view.content().contains(BARBS[exchange.insult()].insult));
    assert!(view.content().contains("alice, pick your retort!"));

    let select = view
        .controls()
        .find_map(|c| match c {
            Control::Select(s) => Some(s),
            _ => None,
        })
        .expect("select");
    assert_eq!(select.options().len(), 4);
    for (option, index) in select.options().iter().zip(exchange.options()) {
        assert_eq!(option.label(), BARBS[*index].retort);
        assert_eq!(option.value(), &format!("duel:{}", index));
    }
}

#[test]
fn test_duel_narrates_resolved_rounds() {
    let settings = GameSettings::default().with_duel_ai_accuracy(1.0);
    let mut engine = Engine::new(
        settings,
        Participant::ai(PlayerId(1), "Arcade"),
        ChaCha8Rng::seed_from_u64(5),
        TracingLog,
    );
    let mut session = engine
        .create(GameKind::Duel, alice(), None)
        .expect("session");
    let insult = match session.state() {
        GameState::Duel(duel) => duel.current().expect("round").insult(),
        _ => unreachable!(),
    };
    let update = engine
        .submit_move(&mut session, ALICE, Move::Retort(insult))
        .expect("retort");
    let view = render(&update);
    assert_eq!(view.content().matches("Parried!").count(), 2);
    assert!(view.content().contains("❤️❤️ vs. Arcade ❤️❤️"));
    assert!(view.content().contains(&format!(
        "Round 3 · insults left in the pool: {}",
        BARBS.len() - 3
    )));
}
