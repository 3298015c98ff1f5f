//! Move execution: validates a move, performs its compound effects (castling
//! rook relocation, en passant capture, promotion) and advances the turn.

use tracing::{debug, trace};

use crate::chess::board::{Board, LastMove};
use crate::chess::core::{Coordinate, Piece};
use crate::chess::error::{ChessError, ChessResult};
use crate::chess::movegen::{legal_moves, Castling};
use crate::chess::state::{update_state, GameState};

bitflags::bitflags! {
    /// What happened on top of relocating the moving piece.
    ///
    /// - [En passant] removes a pawn that is not on the destination square and
    ///   is always reported together with [`MoveFlags::CAPTURE`].
    /// - [Castle] moves are king moves: the rook relocation is described by
    ///   [`MoveOutcome::rook`].
    ///
    /// [En passant]: https://www.chessprogramming.org/En_passant
    /// [Castle]: https://www.chessprogramming.org/Castling
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MoveFlags: u8 {
        #[allow(missing_docs)]
        const DOUBLE_PAWN_PUSH = 0b0000_0001;
        #[allow(missing_docs)]
        const CAPTURE = 0b0000_0010;
        #[allow(missing_docs)]
        const EN_PASSANT = 0b0000_0100;
        #[allow(missing_docs)]
        const CASTLE = 0b0000_1000;
        /// The pawn became a queen.
        const PROMOTION = 0b0001_0000;
    }
}

/// Summary of a successfully applied move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    #[allow(missing_docs)]
    pub from: Coordinate,
    #[allow(missing_docs)]
    pub to: Coordinate,
    /// The piece as it stands on `to` after the move.
    pub piece: Piece,
    /// The piece removed from the board, if any.
    pub captured: Option<Piece>,
    #[allow(missing_docs)]
    pub flags: MoveFlags,
    /// Rook relocation of a castling move.
    pub rook: Option<Castling>,
    /// State of the game after the move.
    pub state: GameState,
}

impl Board {
    /// Validates and applies the move of the side to move.
    ///
    /// The move is performed on a copy of the board and committed only once
    /// the resulting state is known: on error the board is left untouched.
    /// On success the turn counter is incremented, the side to move is
    /// toggled and the state is recomputed.
    ///
    /// # Errors
    ///
    /// - [`ChessError::NoPieceAtSource`] when `from` is empty.
    /// - [`ChessError::NotSideToMove`] when the piece belongs to the side that
    ///   is not on move.
    /// - [`ChessError::IllegalMove`] when the move violates the piece rules or
    ///   leaves the own king in check.
    /// - [`ChessError::AmbiguousKing`] when either side does not have exactly
    ///   one king.
    pub fn apply_move(&mut self, from: Coordinate, to: Coordinate) -> ChessResult<MoveOutcome> {
        let piece = self
            .piece_at(from)
            .ok_or(ChessError::NoPieceAtSource(from))?;
        if piece.owner != self.side_to_move() {
            debug!(%from, %to, owner = %piece.owner, "rejected move out of turn");
            return Err(ChessError::NotSideToMove {
                expected: self.side_to_move(),
                found: piece.owner,
            });
        }
        if !piece.is_move_legal(self, from, to)? {
            debug!(%from, %to, %piece, "rejected illegal move");
            return Err(ChessError::IllegalMove { from, to });
        }

        let mut next = self.clone();
        let mut flags = MoveFlags::empty();
        let mut captured = next.take(to);
        let rook = piece.castling(self, from, to);
        if let Some(Castling { rook_from, rook_to }) = rook {
            flags |= MoveFlags::CASTLE;
            let relocated = next.take(rook_from).map(Piece::moved);
            next.put(rook_to, relocated);
            trace!(%rook_from, %rook_to, "castling rook relocated");
        } else if piece.is_en_passant(self, from, to) {
            flags |= MoveFlags::EN_PASSANT;
            captured = self.last_move().and_then(|last| next.take(last.to));
        }
        if captured.is_some() {
            flags |= MoveFlags::CAPTURE;
        }
        if self.is_double_pawn_move(from, to) {
            flags |= MoveFlags::DOUBLE_PAWN_PUSH;
        }

        let mut moved = piece.moved();
        if piece.is_pawn() && to.x() == self.promotion_row(piece.owner) {
            flags |= MoveFlags::PROMOTION;
            moved = moved.promoted();
        }
        let _ = next.take(from);
        next.put(to, Some(moved));
        next.set_last_move(Some(LastMove {
            from,
            to,
            is_double_pawn_move: flags.contains(MoveFlags::DOUBLE_PAWN_PUSH),
        }));
        next.advance_turn();
        let state = update_state(&next)?;
        next.set_state(state);
        *self = next;

        debug!(%from, %to, piece = %moved, ?flags, ?state, "applied move");
        Ok(MoveOutcome {
            from,
            to,
            piece: moved,
            captured,
            flags,
            rook,
            state,
        })
    }
}

/// [Perft] (*per*formance *t*esting) counts the leaves of the legal move tree
/// of the given depth. Checks move generation and move application together.
///
/// [Perft]: https://www.chessprogramming.org/Perft
///
/// # Errors
///
/// Propagates [`ChessError::AmbiguousKing`] from move generation.
pub fn perft(board: &Board, depth: u8) -> ChessResult<u64> {
    if depth == 0 {
        return Ok(1);
    }
    let mut nodes = 0;
    for (from, to) in legal_moves(board)? {
        if depth == 1 {
            nodes += 1;
            continue;
        }
        let mut next = board.clone();
        let _ = next.apply_move(from, to)?;
        nodes += perft(&next, depth - 1)?;
    }
    Ok(nodes)
}
