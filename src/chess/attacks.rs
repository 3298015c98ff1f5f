//! Attack patterns: which squares a piece covers through its movement pattern
//! alone. These are the building blocks of king safety and are shared between
//! check detection and castling validation.

use crate::chess::board::Board;
use crate::chess::core::{absolute_delta, is_diagonal, is_straight, Coordinate, Piece, PieceKind, Player};

impl Piece {
    /// Whether this piece standing on `from` attacks `to`. Only the pattern and
    /// path clearance are considered: whose turn it is, the contents of the
    /// target square and the safety of the own king are ignored.
    ///
    /// Pawns attack the two squares diagonally in front of them; a pawn never
    /// attacks the square it can advance to.
    #[must_use]
    pub fn can_attack(self, board: &Board, from: Coordinate, to: Coordinate) -> bool {
        if from == to {
            return false;
        }
        let (dx, dy) = absolute_delta(from, to);
        match self.kind {
            PieceKind::Pawn { forward } => {
                let (step, _) = forward.delta();
                from.offset(step, 0).is_some_and(|ahead| ahead.x() == to.x()) && dy == 1
            },
            PieceKind::Knight => (dx, dy) == (1, 2) || (dx, dy) == (2, 1),
            PieceKind::Bishop => is_diagonal(dx, dy) && board.is_path_clear(from, to),
            PieceKind::Rook => is_straight(dx, dy) && board.is_path_clear(from, to),
            PieceKind::Queen => {
                (is_straight(dx, dy) || is_diagonal(dx, dy)) && board.is_path_clear(from, to)
            },
            PieceKind::King => dx <= 1 && dy <= 1,
        }
    }
}

/// Whether any piece of `player`'s opponent attacks `target`. Pieces of
/// `player` itself are never considered.
#[must_use]
pub fn is_under_attack(board: &Board, target: Coordinate, player: Player) -> bool {
    board
        .pieces_of(player.opponent())
        .any(|(piece, square)| piece.can_attack(board, square, target))
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::core::Direction;

    fn square(x: u8, y: u8) -> Coordinate {
        Coordinate::new(x, y).unwrap()
    }

    fn setup(diagram: &str) -> Board {
        Board::from_diagram(Player::White, Player::White, diagram).unwrap()
    }

    fn attacked_squares(board: &Board, from: Coordinate) -> Vec<Coordinate> {
        let piece = board.piece_at(from).unwrap();
        Coordinate::all()
            .filter(|&to| piece.can_attack(board, from, to))
            .collect()
    }

    #[test]
    fn pawn_attacks_diagonals_only() {
        let board = setup(
            "
            ....k...
            ........
            ........
            ........
            ...p....
            ........
            P.......
            ....K...
            ",
        );
        assert_eq!(
            attacked_squares(&board, square(6, 0)),
            vec![square(5, 1)]
        );
        assert_eq!(
            attacked_squares(&board, square(4, 3)),
            vec![square(5, 2), square(5, 4)]
        );
        let pawn = Piece::pawn(Player::White, Direction::Up);
        assert!(!pawn.can_attack(&board, square(6, 0), square(5, 0)));
        assert!(!pawn.can_attack(&board, square(6, 0), square(7, 1)));
    }

    #[test]
    fn knight_jumps() {
        let board = Board::new(Player::White);
        assert_eq!(
            attacked_squares(&board, square(7, 1)),
            vec![square(5, 0), square(5, 2), square(6, 3)]
        );
    }

    #[test]
    fn sliding_pieces_stop_at_blockers() {
        let board = setup(
            "
            ....k...
            ........
            ........
            ...n....
            ........
            .B.Q....
            ........
            R...K...
            ",
        );
        let rook = board.piece_at(square(7, 0)).unwrap();
        assert!(rook.can_attack(&board, square(7, 0), square(0, 0)));
        assert!(rook.can_attack(&board, square(7, 0), square(7, 4)));
        assert!(!rook.can_attack(&board, square(7, 0), square(7, 5)));
        assert!(!rook.can_attack(&board, square(7, 0), square(6, 1)));

        let bishop = board.piece_at(square(5, 1)).unwrap();
        assert!(bishop.can_attack(&board, square(5, 1), square(3, 3)));
        assert!(!bishop.can_attack(&board, square(5, 1), square(1, 5)));
        assert!(bishop.can_attack(&board, square(5, 1), square(7, 3)));
        assert!(!bishop.can_attack(&board, square(5, 1), square(5, 3)));

        let queen = board.piece_at(square(5, 3)).unwrap();
        assert!(queen.can_attack(&board, square(5, 3), square(3, 3)));
        assert!(!queen.can_attack(&board, square(5, 3), square(2, 3)));
        assert!(queen.can_attack(&board, square(5, 3), square(2, 6)));
        assert!(!queen.can_attack(&board, square(5, 3), square(3, 4)));
    }

    #[test]
    fn king_neighbourhood() {
        let board = setup(
            "
            ....k...
            ........
            ........
            ........
            ........
            ........
            ........
            ....K...
            ",
        );
        assert_eq!(
            attacked_squares(&board, square(7, 4)),
            vec![square(6, 3), square(6, 4), square(6, 5), square(7, 3), square(7, 5)]
        );
    }

    #[test]
    fn attacks_use_opposing_pieces() {
        let board = setup(
            "
            ....k...
            ........
            ........
            ........
            ........
            ........
            ........
            R...K...
            ",
        );
        // Attacked by white, as seen by black.
        assert!(is_under_attack(&board, square(0, 0), Player::Black));
        // White pieces never attack squares on behalf of white.
        assert!(!is_under_attack(&board, square(0, 0), Player::White));
        // The black king covers its neighbourhood.
        assert!(is_under_attack(&board, square(1, 4), Player::White));
        assert!(!is_under_attack(&board, square(1, 4), Player::Black));
    }
}
