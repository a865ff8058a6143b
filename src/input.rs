//! Input boundary: raw platform input to engine moves and commands.
//!
//! Component ids look like `ttt:4`, `rps:paper` or `duel:7`. Typed replies
//! carry guesses. Slash commands start games.

use arcade_games::rps::Hand;
use arcade_games::{EngineError, GameKind, Move, PlayerId, Position};
use std::str::FromStr;
use tracing::{debug, instrument};

/// Component prefix for tic-tac-toe cells.
pub const TICTACTOE_PREFIX: &str = "ttt";
/// Component prefix for rock-paper-scissors hands.
pub const RPS_PREFIX: &str = "rps";
/// Component prefix for duel retorts.
pub const DUEL_PREFIX: &str = "duel";

/// Malformed platform input, rejected before the engine sees it.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InputError {
    /// Not a command the bot knows.
    #[display("Unknown command: {}", _0)]
    UnknownCommand(#[error(not(source))] String),

    /// Component id without a known prefix.
    #[display("Unknown component: {}", _0)]
    UnknownComponent(#[error(not(source))] String),

    /// Known prefix with a payload it can't carry.
    #[display("Bad {} payload: {}", kind, payload)]
    BadPayload {
        /// Component prefix.
        kind: String,
        /// Offending payload.
        payload: String,
    },

    /// A typed reply that isn't a number.
    #[display("\"{}\" is not a number", _0)]
    NotANumber(#[error(not(source))] String),

    /// An opponent argument that isn't a mention.
    #[display("Can't read opponent mention: {}", _0)]
    BadMention(#[error(not(source))] String),
}

impl From<InputError> for EngineError {
    fn from(err: InputError) -> Self {
        EngineError::InvalidMove(err.to_string())
    }
}

/// A parsed slash command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start a game, optionally against a mentioned player.
    Start {
        /// Game to start.
        kind: GameKind,
        /// Mentioned opponent.
        opponent: Option<PlayerId>,
    },
}

/// Parses `/tictactoe [@opponent]`, `/guess`, `/rps [@opponent]` or
/// `/duel [@opponent]`.
#[instrument]
pub fn parse_command(text: &str) -> Result<Command, InputError> {
    let mut parts = text.split_whitespace();
    let name = parts
        .next()
        .and_then(|head| head.strip_prefix('/'))
        .ok_or_else(|| InputError::UnknownCommand(text.trim().to_string()))?;
    let kind =
        GameKind::from_str(name).map_err(|_| InputError::UnknownCommand(name.to_string()))?;

    let opponent = match parts.next() {
        Some(mention) if kind.accepts_human_opponent() => Some(parse_mention(mention)?),
        Some(extra) => {
            debug!(extra, "Ignoring opponent for single-player game");
            None
        }
        None => None,
    };
    Ok(Command::Start { kind, opponent })
}

/// Reads `@20` or `<@20>` into a player id.
pub fn parse_mention(text: &str) -> Result<PlayerId, InputError> {
    let inner = text
        .strip_prefix("<@")
        .and_then(|rest| rest.strip_suffix('>'))
        .or_else(|| text.strip_prefix('@'))
        .ok_or_else(|| InputError::BadMention(text.to_string()))?;
    inner
        .trim_start_matches('!')
        .parse::<u64>()
        .map(PlayerId)
        .map_err(|_| InputError::BadMention(text.to_string()))
}

/// Parses a component id into a move.
#[instrument]
pub fn parse_component(custom_id: &str) -> Result<Move, InputError> {
    let (kind, payload) = custom_id
        .split_once(':')
        .ok_or_else(|| InputError::UnknownComponent(custom_id.to_string()))?;
    let bad = || InputError::BadPayload {
        kind: kind.to_string(),
        payload: payload.to_string(),
    };
    match kind {
        TICTACTOE_PREFIX => payload
            .parse::<usize>()
            .ok()
            .and_then(Position::from_index)
            .map(Move::Place)
            .ok_or_else(bad),
        RPS_PREFIX => Hand::from_str(payload).map(Move::Throw).map_err(|_| bad()),
        DUEL_PREFIX => payload
            .parse::<usize>()
            .map(Move::Retort)
            .map_err(|_| bad()),
        _ => Err(InputError::UnknownComponent(custom_id.to_string())),
    }
}

/// Parses a typed guess.
pub fn parse_reply(text: &str) -> Result<Move, InputError> {
    let trimmed = text.trim();
    trimmed
        .parse::<i64>()
        .map(Move::Guess)
        .map_err(|_| InputError::NotANumber(trimmed.to_string()))
}

/// Component id that [`parse_component`] maps back to `mv`.
///
/// Guesses are typed, not clicked, so they have none.
pub fn component_id(mv: &Move) -> Option<String> {
    match mv {
        Move::Place(pos) => Some(format!("{}:{}", TICTACTOE_PREFIX, pos.index())),
        Move::Throw(hand) => Some(format!("{}:{}", RPS_PREFIX, hand)),
        Move::Retort(index) => Some(format!("{}:{}", DUEL_PREFIX, index)),
        Move::Guess(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_ids() {
        assert_eq!(parse_component("ttt:4"), Ok(Move::Place(Position::Center)));
        assert_eq!(parse_component("rps:paper"), Ok(Move::Throw(Hand::Paper)));
        assert_eq!(parse_component("rps:ROCK"), Ok(Move::Throw(Hand::Rock)));
        assert_eq!(parse_component("duel:7"), Ok(Move::Retort(7)));
    }

    #[test]
    fn test_cell_out_of_range() {
        assert_eq!(
            parse_component("ttt:9"),
            Err(InputError::BadPayload {
                kind: "ttt".to_string(),
                payload: "9".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_component() {
        assert!(matches!(
            parse_component("chess:e4"),
            Err(InputError::UnknownComponent(_))
        ));
        assert!(matches!(
            parse_component("4"),
            Err(InputError::UnknownComponent(_))
        ));
    }

    #[test]
    fn test_component_id_inverts_parse() {
        for id in ["ttt:0", "ttt:8", "rps:scissors", "duel:11"] {
            let mv = parse_component(id).expect("valid id");
            assert_eq!(component_id(&mv).as_deref(), Some(id));
        }
        assert_eq!(component_id(&Move::Guess(3)), None);
    }

    #[test]
    fn test_typed_guess() {
        assert_eq!(parse_reply(" 42 \n"), Ok(Move::Guess(42)));
        assert_eq!(parse_reply("-3"), Ok(Move::Guess(-3)));
        let err = parse_reply("forty").unwrap_err();
        assert_eq!(err.to_string(), "\"forty\" is not a number");
        assert!(std::error::Error::source(&err).is_none());
        assert!(matches!(EngineError::from(err), EngineError::InvalidMove(_)));
    }

    #[test]
    fn test_commands() {
        assert_eq!(
            parse_command("/tictactoe"),
            Ok(Command::Start {
                kind: GameKind::TicTacToe,
                opponent: None
            })
        );
        assert_eq!(
            parse_command("/rps <@20>"),
            Ok(Command::Start {
                kind: GameKind::Rps,
                opponent: Some(PlayerId(20))
            })
        );
        assert_eq!(
            parse_command("/duel @7"),
            Ok(Command::Start {
                kind: GameKind::Duel,
                opponent: Some(PlayerId(7))
            })
        );
    }

    #[test]
    fn test_guess_ignores_opponent() {
        assert_eq!(
            parse_command("/guess @20"),
            Ok(Command::Start {
                kind: GameKind::Guess,
                opponent: None
            })
        );
    }

    #[test]
    fn test_bad_commands() {
        assert!(matches!(
            parse_command("tictactoe"),
            Err(InputError::UnknownCommand(_))
        ));
        assert!(matches!(
            parse_command("/chess"),
            Err(InputError::UnknownCommand(_))
        ));
        assert!(matches!(
            parse_command("/rps bob"),
            Err(InputError::BadMention(_))
        ));
    }

    #[test]
    fn test_mentions() {
        assert_eq!(parse_mention("<@!55>"), Ok(PlayerId(55)));
        assert_eq!(parse_mention("@55"), Ok(PlayerId(55)));
        assert!(parse_mention("<@abc>").is_err());
    }
}
