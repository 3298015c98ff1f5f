//! Chess primitives commonly used within [`crate::chess`]: coordinates,
//! directions, players and pieces, plus the coordinate arithmetic the piece
//! rules are built from.

use std::fmt::{self, Write};
use std::ops::Not;

use itertools::Itertools;

use crate::chess::error::{ChessError, ChessResult};

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// A square on the board. `x` is the row (the axis pawns advance along) and
/// `y` is the column. Row 0 is the top of the board from the human player's
/// point of view.
///
/// ```
/// use gambit::chess::core::Coordinate;
///
/// let square = Coordinate::new(6, 4).unwrap();
/// assert_eq!((square.x(), square.y()), (6, 4));
/// assert!(Coordinate::new(8, 0).is_err());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coordinate {
    x: u8,
    y: u8,
}

impl Coordinate {
    /// Creates a coordinate after checking both components are within the
    /// board.
    ///
    /// # Errors
    ///
    /// Returns [`ChessError::OutOfBounds`] if `x` or `y` is not in
    /// `0..BOARD_WIDTH`.
    pub fn new(x: u8, y: u8) -> ChessResult<Self> {
        if x >= BOARD_WIDTH || y >= BOARD_WIDTH {
            return Err(ChessError::OutOfBounds {
                x: i32::from(x),
                y: i32::from(y),
            });
        }
        Ok(Self { x, y })
    }

    /// Used for coordinates that are known to be on the board.
    pub(crate) const fn at(x: u8, y: u8) -> Self {
        debug_assert!(x < BOARD_WIDTH && y < BOARD_WIDTH);
        Self { x, y }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn x(self) -> u8 {
        self.x
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn y(self) -> u8 {
        self.y
    }

    /// Returns the coordinate `(x + dx, y + dy)` or `None` if it falls off the
    /// board.
    #[must_use]
    pub fn offset(self, dx: i8, dy: i8) -> Option<Self> {
        let x = u8::try_from(i16::from(self.x) + i16::from(dx)).ok()?;
        let y = u8::try_from(i16::from(self.y) + i16::from(dy)).ok()?;
        Self::new(x, y).ok()
    }

    /// Moves one square towards `direction`.
    #[must_use]
    pub fn shift(self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }

    /// All squares in board-scan order: row-major, then column.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..BOARD_WIDTH)
            .cartesian_product(0..BOARD_WIDTH)
            .map(|(x, y)| Self::at(x, y))
    }
}

impl TryFrom<(i32, i32)> for Coordinate {
    type Error = ChessError;

    fn try_from((x, y): (i32, i32)) -> ChessResult<Self> {
        match (u8::try_from(x), u8::try_from(y)) {
            (Ok(row), Ok(column)) => Self::new(row, column),
            _ => Err(ChessError::OutOfBounds { x, y }),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// [Chebyshev distance]: the number of king steps between two squares.
///
/// [Chebyshev distance]: https://en.wikipedia.org/wiki/Chebyshev_distance
#[must_use]
pub fn chebyshev_distance(a: Coordinate, b: Coordinate) -> u8 {
    let (dx, dy) = absolute_delta(a, b);
    dx.max(dy)
}

/// Unsigned per-axis distance.
#[must_use]
pub const fn absolute_delta(a: Coordinate, b: Coordinate) -> (u8, u8) {
    (a.x.abs_diff(b.x), a.y.abs_diff(b.y))
}

/// Per-axis displacement from `a` to `b`.
#[must_use]
pub fn signed_delta(a: Coordinate, b: Coordinate) -> (i8, i8) {
    // Both components are below BOARD_WIDTH, so the differences fit into i8.
    let dx = i16::from(b.x) - i16::from(a.x);
    let dy = i16::from(b.y) - i16::from(a.y);
    (
        i8::try_from(dx).unwrap_or_default(),
        i8::try_from(dy).unwrap_or_default(),
    )
}

/// One-square step (each component is -1, 0 or 1) walking from `a` towards
/// `b`.
#[must_use]
pub fn unit_step(a: Coordinate, b: Coordinate) -> (i8, i8) {
    let (dx, dy) = signed_delta(a, b);
    (dx.signum(), dy.signum())
}

/// Expects absolute deltas.
#[must_use]
pub const fn is_diagonal(dx: u8, dy: u8) -> bool {
    dx == dy
}

/// Expects absolute deltas.
#[must_use]
pub const fn is_straight(dx: u8, dy: u8) -> bool {
    dx == 0 || dy == 0
}

/// Directions on the board from the perspective of the human player: `Up`
/// points towards row 0.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    #[allow(missing_docs)]
    Up,
    #[allow(missing_docs)]
    Down,
    #[allow(missing_docs)]
    Left,
    #[allow(missing_docs)]
    Right,
    #[allow(missing_docs)]
    UpLeft,
    #[allow(missing_docs)]
    UpRight,
    #[allow(missing_docs)]
    DownLeft,
    #[allow(missing_docs)]
    DownRight,
    /// Zero vector, produced when there is no movement between two squares.
    None,
}

impl Direction {
    /// Rook directions.
    pub const STRAIGHT: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];
    /// Bishop directions.
    pub const DIAGONAL: [Self; 4] = [
        Self::UpRight,
        Self::UpLeft,
        Self::DownRight,
        Self::DownLeft,
    ];
    /// Queen directions.
    pub const ALL: [Self; 8] = [
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::UpRight,
        Self::UpLeft,
        Self::DownRight,
        Self::DownLeft,
    ];

    /// `(dx, dy)` unit vector.
    #[must_use]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
            Self::UpLeft => (-1, -1),
            Self::UpRight => (-1, 1),
            Self::DownLeft => (1, -1),
            Self::DownRight => (1, 1),
            Self::None => (0, 0),
        }
    }

    /// Direction of the first step from `from` towards `to`. Squares that are
    /// not on a common line still produce the closest of the eight directions.
    #[must_use]
    pub fn between(from: Coordinate, to: Coordinate) -> Self {
        match unit_step(from, to) {
            (-1, 0) => Self::Up,
            (1, 0) => Self::Down,
            (0, -1) => Self::Left,
            (0, 1) => Self::Right,
            (-1, -1) => Self::UpLeft,
            (-1, 1) => Self::UpRight,
            (1, -1) => Self::DownLeft,
            (1, 1) => Self::DownRight,
            _ => Self::None,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::UpLeft => Self::DownRight,
            Self::UpRight => Self::DownLeft,
            Self::DownLeft => Self::UpRight,
            Self::DownRight => Self::UpLeft,
            Self::None => Self::None,
        }
    }
}

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

impl Not for Player {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.opponent()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::White => "white",
            Self::Black => "black",
        })
    }
}

/// Standard [chess pieces]. The set is closed: every rule dispatches over it
/// with an exhaustive `match`.
///
/// Pawns carry their forward direction because it depends on the board
/// orientation, not only on the colour.
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn { forward: Direction },
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match self {
            Self::King => 'k',
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
            Self::Pawn { .. } => 'p',
        })
    }
}

/// Represents a specific piece owned by a player. The board cell holding a
/// piece owns it by value: copying a board copies its pieces, including the
/// `has_moved` flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    #[allow(missing_docs)]
    pub owner: Player,
    #[allow(missing_docs)]
    pub kind: PieceKind,
    /// Set after the first move; gates pawn double steps and castling.
    pub has_moved: bool,
}

impl Piece {
    /// Creates an unmoved piece.
    #[must_use]
    pub const fn new(owner: Player, kind: PieceKind) -> Self {
        Self {
            owner,
            kind,
            has_moved: false,
        }
    }

    /// Creates an unmoved pawn advancing towards `forward`.
    #[must_use]
    pub const fn pawn(owner: Player, forward: Direction) -> Self {
        Self::new(owner, PieceKind::Pawn { forward })
    }

    #[allow(missing_docs)]
    pub fn mark_moved(&mut self) {
        self.has_moved = true;
    }

    /// Returns a copy of the piece with `has_moved` set.
    #[must_use]
    pub const fn moved(self) -> Self {
        Self {
            has_moved: true,
            ..self
        }
    }

    /// Pawn promotion always results in a queen of the same colour.
    #[must_use]
    pub const fn promoted(self) -> Self {
        Self {
            kind: PieceKind::Queen,
            ..self
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_pawn(self) -> bool {
        matches!(self.kind, PieceKind::Pawn { .. })
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_king(self) -> bool {
        matches!(self.kind, PieceKind::King)
    }
}

impl fmt::Display for Piece {
    /// White pieces are uppercase, black pieces are lowercase.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.kind.to_string();
        match self.owner {
            Player::White => f.write_str(&symbol.to_ascii_uppercase()),
            Player::Black => f.write_str(&symbol),
        }
    }
}
