//! Piece rules: raw movement patterns ([pseudo-legal] moves), full legality
//! checks and check-filtered move enumeration for every [`PieceKind`].
//!
//! A move is legal only if it does not leave the mover's own king attacked.
//! This is verified by simulating the move on a copy of the board and asking
//! [`is_under_attack`] about the king's resulting square.
//!
//! [pseudo-legal]: https://www.chessprogramming.org/Pseudo-Legal_Move

use arrayvec::ArrayVec;

use crate::chess::attacks::is_under_attack;
use crate::chess::board::{Board, Destinations, LastMove, KING_COLUMN};
use crate::chess::core::{Coordinate, Direction, Piece, PieceKind, BOARD_WIDTH};
use crate::chess::error::ChessResult;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

/// Rook relocation that accompanies a castling king move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Castling {
    #[allow(missing_docs)]
    pub rook_from: Coordinate,
    /// The square next to the king's destination that the king passes over.
    pub rook_to: Coordinate,
}

impl Piece {
    /// Destinations allowed by the movement pattern, path and occupancy rules,
    /// without checking the safety of the own king. Castling is not included.
    ///
    /// The order follows the piece's direction (or offset) enumeration order.
    #[must_use]
    pub fn pseudo_moves(self, board: &Board, position: Coordinate) -> Destinations {
        match self.kind {
            PieceKind::Pawn { forward } => self.pawn_moves(board, position, forward),
            PieceKind::Knight => KNIGHT_OFFSETS
                .iter()
                .filter_map(|&(dx, dy)| position.offset(dx, dy))
                .filter(|&to| board.is_legal_destination(self, to))
                .collect(),
            PieceKind::Bishop => board.sliding_moves(&Direction::DIAGONAL, position, self),
            PieceKind::Rook => board.sliding_moves(&Direction::STRAIGHT, position, self),
            PieceKind::Queen => board.sliding_moves(&Direction::ALL, position, self),
            PieceKind::King => Direction::ALL
                .iter()
                .filter_map(|&direction| position.shift(direction))
                .filter(|&to| board.is_legal_destination(self, to))
                .collect(),
        }
    }

    fn pawn_moves(self, board: &Board, from: Coordinate, forward: Direction) -> Destinations {
        let mut moves = Destinations::new();
        let (step, _) = forward.delta();
        if let Some(ahead) = from.offset(step, 0) {
            if board.piece_at(ahead).is_none() {
                moves.push(ahead);
                if !self.has_moved {
                    if let Some(double) = ahead.offset(step, 0) {
                        if board.piece_at(double).is_none() {
                            moves.push(double);
                        }
                    }
                }
            }
        }
        for dy in [-1, 1] {
            let Some(target) = from.offset(step, dy) else {
                continue;
            };
            match board.piece_at(target) {
                Some(other) if other.owner != self.owner => moves.push(target),
                None if self.is_en_passant(board, from, target) => moves.push(target),
                _ => (),
            }
        }
        moves
    }

    /// Whether moving this pawn from `from` to `to` captures [en passant]: the
    /// last move was a double step of an opponent's pawn that landed right
    /// next to this one, and `to` is the square that pawn passed over.
    ///
    /// [en passant]: https://en.wikipedia.org/wiki/En_passant
    #[must_use]
    pub fn is_en_passant(self, board: &Board, from: Coordinate, to: Coordinate) -> bool {
        let PieceKind::Pawn { forward } = self.kind else {
            return false;
        };
        let Some(last) = board.last_move() else {
            return false;
        };
        if !last.is_double_pawn_move {
            return false;
        }
        let (step, _) = forward.delta();
        last.to.x() == from.x()
            && last.to.y().abs_diff(from.y()) == 1
            && to.y() == last.to.y()
            && from.offset(step, 0).is_some_and(|ahead| ahead.x() == to.x())
            && board.piece_at(to).is_none()
            && board
                .piece_at(last.to)
                .is_some_and(|victim| victim.is_pawn() && victim.owner != self.owner)
    }

    /// Recognizes the castling pattern (a king moving two columns along its
    /// row from its home square) and returns the corresponding rook
    /// relocation. Preconditions are checked separately.
    #[must_use]
    pub fn castling(self, board: &Board, from: Coordinate, to: Coordinate) -> Option<Castling> {
        let home = Coordinate::at(board.home_row(self.owner), KING_COLUMN);
        if !self.is_king() || from != home || from.x() != to.x() || from.y().abs_diff(to.y()) != 2
        {
            return None;
        }
        let rook_column = if to.y() > from.y() { BOARD_WIDTH - 1 } else { 0 };
        Some(Castling {
            rook_from: Coordinate::at(from.x(), rook_column),
            rook_to: Coordinate::at(from.x(), (from.y() + to.y()) / 2),
        })
    }

    /// [Castling] rules: neither the king nor the rook has moved, the squares
    /// between them are empty, the king is not in check and does not pass
    /// through or land on an attacked square.
    ///
    /// [Castling]: https://www.chessprogramming.org/Castling
    #[must_use]
    pub fn is_castling_legal(self, board: &Board, from: Coordinate, to: Coordinate) -> bool {
        let Some(castling) = self.castling(board, from, to) else {
            return false;
        };
        if self.has_moved {
            return false;
        }
        let rook_ready = board.piece_at(castling.rook_from).is_some_and(|rook| {
            rook.kind == PieceKind::Rook && rook.owner == self.owner && !rook.has_moved
        });
        rook_ready
            && board.is_path_clear(from, castling.rook_from)
            && [from, castling.rook_to, to]
                .iter()
                .all(|&square| !is_under_attack(board, square, self.owner))
    }

    fn castling_moves(self, board: &Board, position: Coordinate) -> ArrayVec<Coordinate, 2> {
        if !self.is_king() || self.has_moved {
            return ArrayVec::new();
        }
        [-2, 2]
            .iter()
            .filter_map(|&dy| position.offset(0, dy))
            .filter(|&to| self.is_castling_legal(board, position, to))
            .collect()
    }

    /// Copy of the board after moving this piece from `from` to `to`, with
    /// the en passant victim removed and the last move recorded. The rook of a
    /// castling move is not relocated.
    #[must_use]
    pub fn simulate(self, board: &Board, from: Coordinate, to: Coordinate) -> Board {
        let mut after = board.clone();
        if self.is_en_passant(board, from, to) {
            if let Some(last) = board.last_move() {
                after.put(last.to, None);
            }
        }
        after.put(from, None);
        after.put(to, Some(self.moved()));
        after.set_last_move(Some(LastMove {
            from,
            to,
            is_double_pawn_move: board.is_double_pawn_move(from, to),
        }));
        after
    }

    /// `king` is the square of the mover's king before the move.
    pub(crate) fn leaves_king_in_check(
        self,
        board: &Board,
        king: Coordinate,
        from: Coordinate,
        to: Coordinate,
    ) -> bool {
        let after = self.simulate(board, from, to);
        let king = if self.is_king() { to } else { king };
        is_under_attack(&after, king, self.owner)
    }

    /// Full legality check: pattern, path, occupancy and the safety of the
    /// own king. Castling goes through [`Piece::is_castling_legal`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::chess::error::ChessError::AmbiguousKing`] if the
    /// mover does not have exactly one king.
    pub fn is_move_legal(self, board: &Board, from: Coordinate, to: Coordinate) -> ChessResult<bool> {
        let king = board.king(self.owner)?;
        if from == to {
            return Ok(false);
        }
        if self.castling(board, from, to).is_some() {
            return Ok(self.is_castling_legal(board, from, to));
        }
        let pattern = match self.kind {
            PieceKind::Pawn { forward } => self.pawn_moves(board, from, forward).contains(&to),
            _ => self.can_attack(board, from, to) && board.is_legal_destination(self, to),
        };
        Ok(pattern && !self.leaves_king_in_check(board, king, from, to))
    }

    /// Fully-legal destinations from `position`, lazily filtered. Every call
    /// recomputes the moves from the current board.
    ///
    /// # Errors
    ///
    /// Returns [`crate::chess::error::ChessError::AmbiguousKing`] if the
    /// mover does not have exactly one king.
    pub fn possible_moves<'a>(
        self,
        board: &'a Board,
        position: Coordinate,
    ) -> ChessResult<impl Iterator<Item = Coordinate> + 'a> {
        let king = board.king(self.owner)?;
        let castling = self.castling_moves(board, position);
        Ok(self
            .pseudo_moves(board, position)
            .into_iter()
            .filter(move |&to| !self.leaves_king_in_check(board, king, position, to))
            .chain(castling))
    }
}

/// All fully-legal moves of the side to move as `(from, to)` pairs, in
/// board-scan order of the moving pieces.
///
/// # Errors
///
/// Returns [`crate::chess::error::ChessError::AmbiguousKing`] if the side to
/// move does not have exactly one king.
pub fn legal_moves(board: &Board) -> ChessResult<Vec<(Coordinate, Coordinate)>> {
    let mut moves = Vec::with_capacity(50);
    for (piece, from) in board.pieces_of(board.side_to_move()) {
        moves.extend(piece.possible_moves(board, from)?.map(|to| (from, to)));
    }
    Ok(moves)
}
