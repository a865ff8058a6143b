//! Greedy tic-tac-toe opponent.
//!
//! Priority order: win now, block, center, random corner, random cell.
//! Ties in the first two tiers resolve to the lowest index so games replay
//! identically; the last two tiers draw from the injected random source.

use super::{Board, Mark, Position, Square, rules};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

/// Picks the AI's next cell, or `None` when the board is full.
#[instrument(skip(rng))]
pub fn compute_ai_move<R: Rng + ?Sized>(
    board: &Board,
    ai_mark: Mark,
    opponent_mark: Mark,
    rng: &mut R,
) -> Option<Position> {
    if let Some(pos) = completing_cell(board, ai_mark) {
        debug!(position = %pos, "Taking winning cell");
        return Some(pos);
    }

    if let Some(pos) = completing_cell(board, opponent_mark) {
        debug!(position = %pos, "Blocking opponent line");
        return Some(pos);
    }

    if board.is_empty(Position::Center) {
        return Some(Position::Center);
    }

    let corners: Vec<Position> = Position::CORNERS
        .iter()
        .copied()
        .filter(|pos| board.is_empty(*pos))
        .collect();
    if let Some(pos) = corners.choose(rng) {
        return Some(*pos);
    }

    board.empty_positions().choose(rng).copied()
}

/// Lowest empty cell that would complete a line for `mark`.
fn completing_cell(board: &Board, mark: Mark) -> Option<Position> {
    board.empty_positions().into_iter().find(|&pos| {
        let mut trial = *board;
        trial.set(pos, Square::Occupied(mark));
        rules::has_line(&trial, mark)
    })
}
