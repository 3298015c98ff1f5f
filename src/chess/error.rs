//! Errors produced by the rules engine.
//!
//! Illegal moves are routine outcomes during play: they are reported through
//! [`ChessError`] values and never through panics. Every error leaves the
//! [`crate::chess::board::Board`] exactly as it was before the failed call.

use crate::chess::core::{Coordinate, Player};

/// Rule violations and malformed requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChessError {
    /// A coordinate outside of `0..BOARD_WIDTH` on either axis.
    #[error("coordinate ({x}, {y}) is outside of the board")]
    OutOfBounds {
        #[allow(missing_docs)]
        x: i32,
        #[allow(missing_docs)]
        y: i32,
    },

    /// Move attempted from an empty square.
    #[error("there is no piece at {0}")]
    NoPieceAtSource(Coordinate),

    /// The move violates the piece pattern, path, occupancy or leaves the
    /// mover's own king in check.
    #[error("move {from} -> {to} is illegal")]
    IllegalMove {
        #[allow(missing_docs)]
        from: Coordinate,
        #[allow(missing_docs)]
        to: Coordinate,
    },

    /// Check evaluation requires exactly one king per side.
    #[error("expected exactly 1 {player} king, got {found}")]
    AmbiguousKing {
        #[allow(missing_docs)]
        player: Player,
        #[allow(missing_docs)]
        found: usize,
    },

    /// The piece belongs to the side that is not on move.
    #[error("{expected} is to move, got a {found} piece")]
    NotSideToMove {
        #[allow(missing_docs)]
        expected: Player,
        #[allow(missing_docs)]
        found: Player,
    },
}

/// Result type alias for rules operations.
pub type ChessResult<T> = Result<T, ChessError>;
