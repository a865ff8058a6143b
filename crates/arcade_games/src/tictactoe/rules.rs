//! Win and draw detection for tic-tac-toe.

use super::{Board, Mark, Position, Square};
use crate::Outcome;
use tracing::instrument;

/// Returns the mark occupying a full line, if any.
#[instrument]
pub fn check_winner(board: &Board) -> Option<Mark> {
    Position::LINES.iter().find_map(|&[a, b, c]| match board.get(a) {
        Square::Occupied(mark) if board.get(b) == board.get(a) && board.get(c) == board.get(a) => {
            Some(mark)
        }
        _ => None,
    })
}

/// Returns true when `mark` owns a full line.
pub fn has_line(board: &Board, mark: Mark) -> bool {
    let owned = Square::Occupied(mark);
    Position::LINES
        .iter()
        .any(|line| line.iter().all(|&pos| board.get(pos) == owned))
}

/// Checks if every square is occupied.
pub fn is_full(board: &Board) -> bool {
    board.squares().iter().all(|s| *s != Square::Empty)
}

/// Terminal evaluation: a completed line wins, a full board without one draws.
#[instrument]
pub fn evaluate(board: &Board) -> Outcome {
    if let Some(mark) = check_winner(board) {
        Outcome::Won(mark.seat())
    } else if is_full(board) {
        Outcome::Draw
    } else {
        Outcome::Ongoing
    }
}

/// Walks every board reachable by alternating X and O from `board`,
/// stopping at terminal positions. Each board is paired with the mark to move.
#[cfg(test)]
pub(crate) fn reachable(board: Board, to_move: Mark, out: &mut Vec<(Board, Mark)>) {
    out.push((board, to_move));
    if evaluate(&board) != Outcome::Ongoing {
        return;
    }
    for pos in board.empty_positions() {
        let mut next = board;
        next.set(pos, Square::Occupied(to_move));
        reachable(next, to_move.opponent(), out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Seat;

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(check_winner(&Board::new()), None);
        assert_eq!(evaluate(&Board::new()), Outcome::Ongoing);
    }

    #[test]
    fn test_winner_top_row() {
        let board = Board::from_pattern("XXX-O-O--");
        assert_eq!(check_winner(&board), Some(Mark::X));
        assert_eq!(evaluate(&board), Outcome::Won(Seat::First));
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let board = Board::from_pattern("XXO-O-O-X");
        assert_eq!(evaluate(&board), Outcome::Won(Seat::Second));
    }

    #[test]
    fn test_draw_detection() {
        let board = Board::from_pattern("XOXOXXOXO");
        assert!(is_full(&board));
        assert_eq!(evaluate(&board), Outcome::Draw);
    }

    #[test]
    fn test_full_board_with_line_is_a_win() {
        let board = Board::from_pattern("XXXOOXXOO");
        assert_eq!(evaluate(&board), Outcome::Won(Seat::First));
    }

    #[test]
    fn test_every_reachable_board_agrees_with_line_scan() {
        let mut boards = Vec::new();
        reachable(Board::new(), Mark::X, &mut boards);
        assert!(boards.len() > 5000);

        for (board, _) in boards {
            let x = has_line(&board, Mark::X);
            let o = has_line(&board, Mark::O);
            assert!(!(x && o), "both marks own a line:\n{}", board);
            let expected = match (x, o) {
                (true, _) => Outcome::Won(Seat::First),
                (_, true) => Outcome::Won(Seat::Second),
                _ if is_full(&board) => Outcome::Draw,
                _ => Outcome::Ongoing,
            };
            assert_eq!(evaluate(&board), expected, "board:\n{}", board);
        }
    }
}
