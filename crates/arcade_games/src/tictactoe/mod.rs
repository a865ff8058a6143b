//! Tic-tac-toe: board, rules and the greedy AI.

mod ai;
mod position;
mod rules;
mod types;

pub use ai::compute_ai_move;
pub use position::Position;
pub use rules::{check_winner, evaluate, has_line, is_full};
pub use types::{Board, Mark, Square};

use crate::{EngineError, Move, Outcome, Play, Seat};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Tic-tac-toe session payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TicTacToe {
    board: Board,
    history: Vec<Position>,
}

impl TicTacToe {
    /// Creates a game on an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resumes from an arbitrary board, mostly for tests and replays.
    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            history: Vec::new(),
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Cells played so far, in order.
    pub fn history(&self) -> &[Position] {
        &self.history
    }

    /// Checks the move without touching the board.
    #[instrument(skip(self))]
    pub(crate) fn validate(&self, mv: &Move) -> Result<Position, EngineError> {
        let Move::Place(pos) = *mv else {
            return Err(EngineError::invalid("pick a cell on the board"));
        };
        if !self.board.is_empty(pos) {
            return Err(EngineError::invalid(format!("{} is already taken", pos)));
        }
        Ok(pos)
    }

    /// Places the seat's mark.
    pub(crate) fn apply(&mut self, seat: Seat, pos: Position) -> Play {
        let mark = Mark::for_seat(seat);
        self.board.set(pos, Square::Occupied(mark));
        self.history.push(pos);
        Play::Placed {
            position: pos,
            mark,
        }
    }

    /// Current terminal evaluation.
    pub fn evaluate(&self) -> Outcome {
        rules::evaluate(&self.board)
    }

    /// The AI's reply for `seat`.
    pub(crate) fn ai_reply<R: Rng + ?Sized>(&self, seat: Seat, rng: &mut R) -> Option<Move> {
        let ai_mark = Mark::for_seat(seat);
        compute_ai_move(&self.board, ai_mark, ai_mark.opponent(), rng).map(Move::Place)
    }
}
