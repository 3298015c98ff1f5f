//! The 8x8 [`Board`]: piece placement plus the game metadata that the rules
//! need (orientation, side to move, turn counter, last move and the derived
//! [`GameState`]).
//!
//! Boards are plain values. Hypothetical moves are evaluated on clones, and
//! every clone owns its own copy of each piece.

use std::fmt;

use anyhow::bail;
use arrayvec::ArrayVec;

use crate::chess::core::{
    unit_step,
    Coordinate,
    Direction,
    Piece,
    PieceKind,
    Player,
    BOARD_WIDTH,
};
use crate::chess::error::{ChessError, ChessResult};
use crate::chess::state::GameState;

/// The most squares a single piece can reach through its movement pattern: a
/// queen in the center of an empty board.
pub const MAX_DESTINATIONS: usize = 27;

/// Destinations produced by a single piece. Stored inline: there is never
/// more than [`MAX_DESTINATIONS`] of them.
pub type Destinations = ArrayVec<Coordinate, MAX_DESTINATIONS>;

const BACK_RANK: [PieceKind; BOARD_WIDTH as usize] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Column of both kings in the initial setup.
pub const KING_COLUMN: u8 = 4;

/// The most recent move applied to the board. This is the only history the
/// engine keeps and it is exactly what en passant needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LastMove {
    #[allow(missing_docs)]
    pub from: Coordinate,
    #[allow(missing_docs)]
    pub to: Coordinate,
    /// A pawn advanced two squares from its starting row.
    pub is_double_pawn_move: bool,
}

/// Square-centric board representation with game metadata.
///
/// The human player's pieces start on rows 6 and 7 and advance `Up` (towards
/// row 0); the opponent starts on rows 0 and 1 and advances `Down`.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; BOARD_WIDTH as usize]; BOARD_WIDTH as usize],
    human: Player,
    side_to_move: Player,
    state: GameState,
    turns_played: u32,
    last_move: Option<LastMove>,
}

impl Board {
    /// Creates the starting position oriented for `human`.
    ///
    /// ```
    /// use gambit::chess::board::Board;
    /// use gambit::chess::core::Player;
    ///
    /// let board = Board::new(Player::White);
    /// assert_eq!(
    ///     board.to_string(),
    ///     "rnbqkbnr\npppppppp\n........\n........\n........\n........\nPPPPPPPP\nRNBQKBNR\n"
    /// );
    /// ```
    #[must_use]
    pub fn new(human: Player) -> Self {
        let mut board = Self::empty(human);
        for player in [Player::White, Player::Black] {
            let (home_row, pawn_row) = (board.home_row(player), board.pawn_row(player));
            let forward = board.forward(player);
            for (y, kind) in (0..BOARD_WIDTH).zip(BACK_RANK) {
                board.put(Coordinate::at(home_row, y), Some(Piece::new(player, kind)));
                board.put(
                    Coordinate::at(pawn_row, y),
                    Some(Piece::pawn(player, forward)),
                );
            }
        }
        board
    }

    /// Creates a board without any pieces. White moves first.
    #[must_use]
    pub fn empty(human: Player) -> Self {
        Self {
            squares: [[None; BOARD_WIDTH as usize]; BOARD_WIDTH as usize],
            human,
            side_to_move: Player::White,
            state: GameState::Ongoing,
            turns_played: 0,
            last_move: None,
        }
    }

    /// Reads a board diagram: eight rows of eight symbols, row 0 first. `.`
    /// marks an empty square, `KQRBNP` are white pieces and `kqrbnp` are
    /// black pieces. Blank lines and surrounding whitespace are ignored.
    ///
    /// Pieces are considered unmoved when they stand where the initial setup
    /// would have put them (pawns on their starting row, kings on their home
    /// square, rooks in the home corners) and moved otherwise.
    ///
    /// The game state is left [`GameState::Ongoing`]. Use
    /// [`crate::game::Game::from_board`] to play from the position with its
    /// state derived.
    ///
    /// # Errors
    ///
    /// Returns [`anyhow::Error`] when the diagram does not have exactly eight
    /// rows of eight symbols or contains an unknown symbol.
    pub fn from_diagram(human: Player, side_to_move: Player, input: &str) -> anyhow::Result<Self> {
        let mut board = Self::empty(human);
        board.side_to_move = side_to_move;
        let rows: Vec<&str> = input
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if rows.len() != usize::from(BOARD_WIDTH) {
            bail!(
                "board diagram should have {BOARD_WIDTH} rows, got {}",
                rows.len()
            );
        }
        for (x, row) in (0..BOARD_WIDTH).zip(rows) {
            let symbols: Vec<char> = row.chars().collect();
            if symbols.len() != usize::from(BOARD_WIDTH) {
                bail!("row {x} should have exactly {BOARD_WIDTH} squares, got \"{row}\"");
            }
            for (y, symbol) in (0..BOARD_WIDTH).zip(symbols) {
                if symbol == '.' {
                    continue;
                }
                let owner = if symbol.is_ascii_uppercase() {
                    Player::White
                } else {
                    Player::Black
                };
                let kind = match symbol.to_ascii_lowercase() {
                    'k' => PieceKind::King,
                    'q' => PieceKind::Queen,
                    'r' => PieceKind::Rook,
                    'b' => PieceKind::Bishop,
                    'n' => PieceKind::Knight,
                    'p' => PieceKind::Pawn {
                        forward: board.forward(owner),
                    },
                    _ => bail!("piece symbol should be within \"KQRBNPkqrbnp\", got '{symbol}'"),
                };
                let square = Coordinate::at(x, y);
                let mut piece = Piece::new(owner, kind);
                piece.has_moved = !board.is_initial_square(piece, square);
                board.put(square, Some(piece));
            }
        }
        Ok(board)
    }

    /// # Errors
    ///
    /// Returns [`ChessError::OutOfBounds`] if `x` or `y` is not in
    /// `0..BOARD_WIDTH`.
    pub fn get(&self, x: u8, y: u8) -> ChessResult<Option<Piece>> {
        Ok(self.piece_at(Coordinate::new(x, y)?))
    }

    /// Places `piece` on the square, or clears it when `piece` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ChessError::OutOfBounds`] if `x` or `y` is not in
    /// `0..BOARD_WIDTH`.
    pub fn set(&mut self, x: u8, y: u8, piece: Option<Piece>) -> ChessResult<()> {
        self.put(Coordinate::new(x, y)?, piece);
        Ok(())
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn piece_at(&self, square: Coordinate) -> Option<Piece> {
        self.squares[square.x() as usize][square.y() as usize]
    }

    #[allow(missing_docs)]
    pub fn put(&mut self, square: Coordinate, piece: Option<Piece>) {
        self.squares[usize::from(square.x())][usize::from(square.y())] = piece;
    }

    /// Removes and returns the piece on `square`.
    pub fn take(&mut self, square: Coordinate) -> Option<Piece> {
        self.squares[usize::from(square.x())][usize::from(square.y())].take()
    }

    /// Empties every cell. Metadata is left untouched.
    pub fn clear_all(&mut self) {
        self.squares = [[None; BOARD_WIDTH as usize]; BOARD_WIDTH as usize];
    }

    /// The colour whose pieces start at the bottom of the board.
    #[must_use]
    pub const fn human(&self) -> Player {
        self.human
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    #[allow(missing_docs)]
    pub fn set_side_to_move(&mut self, player: Player) {
        self.side_to_move = player;
    }

    /// State computed after the last applied move.
    #[must_use]
    pub const fn state(&self) -> GameState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: GameState) {
        self.state = state;
    }

    /// Number of moves applied to this board.
    #[must_use]
    pub const fn turns_played(&self) -> u32 {
        self.turns_played
    }

    pub(crate) fn advance_turn(&mut self) {
        self.turns_played += 1;
        self.side_to_move = self.side_to_move.opponent();
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn last_move(&self) -> Option<LastMove> {
        self.last_move
    }

    /// Overrides the move history, e.g. to set up an en passant position.
    pub fn set_last_move(&mut self, last_move: Option<LastMove>) {
        self.last_move = last_move;
    }

    /// Row holding the player's pieces other than pawns at the start.
    #[must_use]
    pub fn home_row(&self, player: Player) -> u8 {
        if player == self.human {
            BOARD_WIDTH - 1
        } else {
            0
        }
    }

    /// Row holding the player's pawns at the start.
    #[must_use]
    pub fn pawn_row(&self, player: Player) -> u8 {
        if player == self.human {
            BOARD_WIDTH - 2
        } else {
            1
        }
    }

    /// Direction the player's pawns advance in.
    #[must_use]
    pub fn forward(&self, player: Player) -> Direction {
        if player == self.human {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    /// Row where the player's pawns promote: the opponent's home row.
    #[must_use]
    pub fn promotion_row(&self, player: Player) -> u8 {
        self.home_row(player.opponent())
    }

    fn is_initial_square(&self, piece: Piece, square: Coordinate) -> bool {
        let home_row = self.home_row(piece.owner);
        match piece.kind {
            PieceKind::Pawn { .. } => square.x() == self.pawn_row(piece.owner),
            PieceKind::King => square == Coordinate::at(home_row, KING_COLUMN),
            PieceKind::Rook => {
                square.x() == home_row && (square.y() == 0 || square.y() == BOARD_WIDTH - 1)
            },
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Queen => true,
        }
    }

    /// All pieces of `player` with their squares, in board-scan order.
    pub fn pieces_of(&self, player: Player) -> impl Iterator<Item = (Piece, Coordinate)> + '_ {
        Coordinate::all().filter_map(move |square| {
            self.piece_at(square)
                .filter(|piece| piece.owner == player)
                .map(|piece| (piece, square))
        })
    }

    /// First square (in board-scan order) holding a piece of `player` whose
    /// kind satisfies `predicate`.
    pub fn find_first(
        &self,
        player: Player,
        predicate: impl Fn(PieceKind) -> bool,
    ) -> Option<Coordinate> {
        self.pieces_of(player)
            .find(|(piece, _)| predicate(piece.kind))
            .map(|(_, square)| square)
    }

    /// Square of the player's king.
    ///
    /// # Errors
    ///
    /// Returns [`ChessError::AmbiguousKing`] unless there is exactly one king
    /// of that colour.
    pub fn king(&self, player: Player) -> ChessResult<Coordinate> {
        let mut kings = self
            .pieces_of(player)
            .filter(|(piece, _)| piece.is_king())
            .map(|(_, square)| square);
        match (kings.next(), kings.count()) {
            (Some(square), 0) => Ok(square),
            (None, _) => Err(ChessError::AmbiguousKing { player, found: 0 }),
            (Some(_), rest) => Err(ChessError::AmbiguousKing {
                player,
                found: rest + 1,
            }),
        }
    }

    /// Checks that every square strictly between `from` and `to` is empty.
    /// Only meaningful when the squares share a row, column or diagonal.
    #[must_use]
    pub fn is_path_clear(&self, from: Coordinate, to: Coordinate) -> bool {
        let (dx, dy) = unit_step(from, to);
        let mut current = from;
        while let Some(next) = current.offset(dx, dy) {
            if next == to {
                return true;
            }
            if self.piece_at(next).is_some() {
                return false;
            }
            current = next;
        }
        true
    }

    /// Walks from `position` in each direction until the edge of the board or
    /// the first occupied square, which is included only when it holds an
    /// opponent's piece.
    #[must_use]
    pub fn sliding_moves(
        &self,
        directions: &[Direction],
        position: Coordinate,
        piece: Piece,
    ) -> Destinations {
        let mut destinations = Destinations::new();
        for &direction in directions {
            if direction == Direction::None {
                continue;
            }
            let mut current = position;
            while let Some(next) = current.shift(direction) {
                match self.piece_at(next) {
                    None => destinations.push(next),
                    Some(other) => {
                        if other.owner != piece.owner {
                            destinations.push(next);
                        }
                        break;
                    },
                }
                current = next;
            }
        }
        destinations
    }

    /// The square is empty or holds an opponent's piece. Does not look at the
    /// path or king safety.
    #[must_use]
    pub fn is_legal_destination(&self, piece: Piece, square: Coordinate) -> bool {
        self.piece_at(square)
            .map_or(true, |other| other.owner != piece.owner)
    }

    /// The piece on `from` is a pawn advancing two rows.
    #[must_use]
    pub fn is_double_pawn_move(&self, from: Coordinate, to: Coordinate) -> bool {
        self.piece_at(from).is_some_and(Piece::is_pawn)
            && from.y() == to.y()
            && from.x().abs_diff(to.x()) == 2
    }
}

impl fmt::Display for Board {
    /// Prints the board diagram accepted by [`Board::from_diagram`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.squares {
            for cell in row {
                match cell {
                    Some(piece) => write!(f, "{piece}")?,
                    None => f.write_str(".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")?;
        writeln!(f, "Human player: {}", self.human)?;
        writeln!(f, "Player to move: {}", self.side_to_move)?;
        writeln!(f, "Turns played: {}", self.turns_played)?;
        writeln!(f, "State: {:?}", self.state)?;
        writeln!(f, "Last move: {:?}", self.last_move)?;
        Ok(())
    }
}
