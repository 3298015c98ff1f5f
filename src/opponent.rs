//! Computer opponent that plays uniformly random legal moves. It only consumes
//! the legal move interface, so any stronger strategy can replace it.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::chess::board::Board;
use crate::chess::core::Coordinate;
use crate::chess::error::ChessResult;

/// Picks a move for the side to move in two stages: first a random piece
/// among those with at least one legal move, then a random destination of that
/// piece. Returns `None` when no legal move exists.
///
/// # Errors
///
/// Returns [`crate::chess::error::ChessError::AmbiguousKing`] if the side to
/// move does not have exactly one king.
pub fn random_move<R: Rng + ?Sized>(
    board: &Board,
    rng: &mut R,
) -> ChessResult<Option<(Coordinate, Coordinate)>> {
    let mut candidates = Vec::new();
    for (piece, from) in board.pieces_of(board.side_to_move()) {
        let moves: Vec<Coordinate> = piece.possible_moves(board, from)?.collect();
        if !moves.is_empty() {
            candidates.push((from, moves));
        }
    }
    let Some((from, moves)) = candidates.choose(rng) else {
        return Ok(None);
    };
    Ok(moves.choose(rng).map(|&to| (*from, to)))
}
