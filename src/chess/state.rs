//! Game state evaluation: check, checkmate and stalemate detection built on
//! top of hypothetical move simulation.
//!
//! Only [`GameState::Ongoing`], [`GameState::Check`], [`GameState::Checkmate`]
//! and [`GameState::Stalemate`] are ever computed. The draw and resignation
//! variants have named hooks below that currently never fire.

use crate::chess::attacks::is_under_attack;
use crate::chess::board::Board;
use crate::chess::core::Player;
use crate::chess::error::ChessResult;

/// Status of the game, recomputed after every applied move.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameState {
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
    DrawByRepetition,
    DrawByInsufficientMaterial,
    DrawByFiftyMoveRule,
    DrawByAgreement,
    Resignation,
}

impl GameState {
    /// No further moves can be played.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Ongoing | Self::Check)
    }
}

/// The player's king is attacked.
///
/// # Errors
///
/// Returns [`crate::chess::error::ChessError::AmbiguousKing`] unless the
/// player has exactly one king.
pub fn is_check(board: &Board, player: Player) -> ChessResult<bool> {
    let king = board.king(player)?;
    Ok(is_under_attack(board, king, player))
}

/// The player is in check and no pseudo-legal move of any of their pieces gets
/// the king out of it.
///
/// Pseudo-legal moves are simulated directly instead of going through
/// [`crate::chess::core::Piece::possible_moves`]. Castling never resolves a
/// check, so it is not considered.
///
/// # Errors
///
/// Returns [`crate::chess::error::ChessError::AmbiguousKing`] unless the
/// player has exactly one king.
pub fn is_checkmate(board: &Board, player: Player) -> ChessResult<bool> {
    if !is_check(board, player)? {
        return Ok(false);
    }
    let king = board.king(player)?;
    let escapes = board.pieces_of(player).any(|(piece, from)| {
        piece
            .pseudo_moves(board, from)
            .into_iter()
            .any(|to| !piece.leaves_king_in_check(board, king, from, to))
    });
    Ok(!escapes)
}

/// At least one piece of the player has a fully-legal move.
///
/// # Errors
///
/// Returns [`crate::chess::error::ChessError::AmbiguousKing`] unless the
/// player has exactly one king.
pub fn has_legal_move(board: &Board, player: Player) -> ChessResult<bool> {
    for (piece, from) in board.pieces_of(player) {
        if piece.possible_moves(board, from)?.next().is_some() {
            return Ok(true);
        }
    }
    Ok(false)
}

/// The player is not in check but has no fully-legal move.
///
/// # Errors
///
/// Returns [`crate::chess::error::ChessError::AmbiguousKing`] unless the
/// player has exactly one king.
pub fn is_stalemate(board: &Board, player: Player) -> ChessResult<bool> {
    Ok(!is_check(board, player)? && !has_legal_move(board, player)?)
}

/// Not tracked: the board only remembers the last move.
#[must_use]
pub const fn is_draw_by_repetition(_board: &Board) -> bool {
    false
}

/// Not tracked.
#[must_use]
pub const fn is_draw_by_insufficient_material(_board: &Board) -> bool {
    false
}

/// Not tracked: there is no halfmove clock.
#[must_use]
pub const fn is_draw_by_fifty_move_rule(_board: &Board) -> bool {
    false
}

/// Agreements happen outside of the rules engine.
#[must_use]
pub const fn is_draw_by_agreement(_board: &Board) -> bool {
    false
}

/// Resignations happen outside of the rules engine.
#[must_use]
pub const fn is_resignation(_board: &Board) -> bool {
    false
}

/// Derives the state of the game for the side to move with the precedence
/// `Checkmate > Stalemate > Check > draws > Ongoing`. Check is reported when
/// either king is attacked.
///
/// # Errors
///
/// Returns [`crate::chess::error::ChessError::AmbiguousKing`] unless both
/// players have exactly one king.
pub fn update_state(board: &Board) -> ChessResult<GameState> {
    let us = board.side_to_move();
    if is_checkmate(board, us)? {
        return Ok(GameState::Checkmate);
    }
    if is_stalemate(board, us)? {
        return Ok(GameState::Stalemate);
    }
    if is_check(board, us)? || is_check(board, us.opponent())? {
        return Ok(GameState::Check);
    }
    let state = if is_draw_by_repetition(board) {
        GameState::DrawByRepetition
    } else if is_draw_by_insufficient_material(board) {
        GameState::DrawByInsufficientMaterial
    } else if is_draw_by_fifty_move_rule(board) {
        GameState::DrawByFiftyMoveRule
    } else if is_draw_by_agreement(board) {
        GameState::DrawByAgreement
    } else if is_resignation(board) {
        GameState::Resignation
    } else {
        GameState::Ongoing
    };
    Ok(state)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::core::Coordinate;
    use crate::chess::error::ChessError;

    fn setup(side_to_move: Player, diagram: &str) -> Board {
        Board::from_diagram(Player::White, side_to_move, diagram).unwrap()
    }

    #[test]
    fn starting_position() {
        let board = Board::new(Player::White);
        assert_eq!(is_check(&board, Player::White), Ok(false));
        assert_eq!(is_checkmate(&board, Player::Black), Ok(false));
        assert_eq!(is_stalemate(&board, Player::White), Ok(false));
        assert_eq!(update_state(&board), Ok(GameState::Ongoing));
    }

    #[test]
    fn back_rank_mate() {
        let board = setup(
            Player::Black,
            "
            R.....k.
            .....ppp
            ........
            ........
            ........
            ........
            ........
            ....K...
            ",
        );
        assert_eq!(is_check(&board, Player::Black), Ok(true));
        assert_eq!(is_checkmate(&board, Player::Black), Ok(true));
        assert_eq!(has_legal_move(&board, Player::Black), Ok(false));
        assert_eq!(update_state(&board), Ok(GameState::Checkmate));
        assert!(GameState::Checkmate.is_terminal());
    }

    #[test]
    fn check_with_escape() {
        let board = setup(
            Player::Black,
            "
            R.....k.
            .....pp.
            ........
            ........
            ........
            ........
            ........
            ....K...
            ",
        );
        assert_eq!(is_checkmate(&board, Player::Black), Ok(false));
        assert_eq!(update_state(&board), Ok(GameState::Check));
        assert!(!GameState::Check.is_terminal());
    }

    #[test]
    fn check_blocked_by_interposition() {
        let board = setup(
            Player::Black,
            "
            R.....k.
            .....ppp
            ........
            ........
            ........
            ........
            ...r....
            ....K...
            ",
        );
        // The rook can drop back to the back rank.
        assert_eq!(is_checkmate(&board, Player::Black), Ok(false));
        assert_eq!(update_state(&board), Ok(GameState::Check));
    }

    #[test]
    fn stalemate() {
        let board = setup(
            Player::Black,
            "
            .......k
            .....Q..
            ......K.
            ........
            ........
            ........
            ........
            ........
            ",
        );
        assert_eq!(is_check(&board, Player::Black), Ok(false));
        assert_eq!(is_stalemate(&board, Player::Black), Ok(true));
        assert_eq!(is_checkmate(&board, Player::Black), Ok(false));
        assert_eq!(update_state(&board), Ok(GameState::Stalemate));
        // Not stalemate for White.
        assert_eq!(is_stalemate(&board, Player::White), Ok(false));
    }

    #[test]
    fn check_of_side_not_to_move() {
        // White just left its king attacked: reported as check.
        let board = setup(
            Player::Black,
            "
            ....k...
            ....r...
            ........
            ........
            ........
            ........
            ........
            ....K...
            ",
        );
        assert_eq!(is_check(&board, Player::White), Ok(true));
        assert_eq!(update_state(&board), Ok(GameState::Check));
    }

    #[test]
    fn draw_hooks_never_fire() {
        let board = Board::new(Player::Black);
        assert!(!is_draw_by_repetition(&board));
        assert!(!is_draw_by_insufficient_material(&board));
        assert!(!is_draw_by_fifty_move_rule(&board));
        assert!(!is_draw_by_agreement(&board));
        assert!(!is_resignation(&board));
    }

    #[test]
    fn missing_king_is_an_error() {
        let mut board = Board::new(Player::White);
        let _ = board.take(Coordinate::new(0, 4).unwrap());
        let missing = Err(ChessError::AmbiguousKing {
            player: Player::Black,
            found: 0,
        });
        assert_eq!(is_check(&board, Player::Black), missing);
        assert_eq!(update_state(&board), missing.map(|_: bool| GameState::Ongoing));
    }
}
