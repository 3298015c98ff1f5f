//! Game session: owns the [`Board`], drives the select-then-move interaction
//! and notifies subscribers after every mutation.
//!
//! [`Game::select_square`] implements the two-state selection machine:
//!
//! - [`Selection::AwaitingSelection`]: selecting a square with a piece of the
//!   side to move selects it and lists its legal destinations. Empty squares
//!   and opponent's pieces are ignored.
//! - [`Selection::PieceSelected`]: the next selected square is the
//!   destination of a move attempt. The selection is cleared afterwards,
//!   unless the attempt was illegal and
//!   [`Config::keep_selection_on_illegal_move`] is set.

use std::fmt;

use rand::Rng;
use tracing::{debug, trace};

use crate::chess::board::Board;
use crate::chess::core::{Coordinate, Piece, Player};
use crate::chess::error::{ChessError, ChessResult};
use crate::chess::moves::MoveOutcome;
use crate::chess::state::{update_state, GameState};
use crate::opponent;

/// Session settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Colour whose pieces start at the bottom of the board.
    pub human: Player,
    /// Keep the selected piece after an illegal move attempt instead of
    /// clearing the selection. Selecting another piece of the side to move
    /// then switches the selection.
    pub keep_selection_on_illegal_move: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            human: Player::White,
            keep_selection_on_illegal_move: false,
        }
    }
}

impl Config {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn with_human(mut self, human: Player) -> Self {
        self.human = human;
        self
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn with_keep_selection_on_illegal_move(mut self, keep: bool) -> Self {
        self.keep_selection_on_illegal_move = keep;
        self
    }
}

/// Interactive selection state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[allow(missing_docs)]
    #[default]
    AwaitingSelection,
    /// A piece of the side to move is selected.
    PieceSelected {
        #[allow(missing_docs)]
        square: Coordinate,
        /// Legal destinations of the selected piece.
        moves: Vec<Coordinate>,
    },
}

/// Notification sent to subscribers after the board changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    #[allow(missing_docs)]
    MoveApplied(MoveOutcome),
    /// The board was replaced with the starting position.
    Reset,
}

type Listener = Box<dyn FnMut(&Event)>;

/// A single game: exclusive owner of its board.
pub struct Game {
    config: Config,
    board: Board,
    selection: Selection,
    revision: u64,
    listeners: Vec<Listener>,
}

impl Game {
    /// Starts a game from the initial position.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_board(config, Board::new(config.human))
    }

    /// Continues a game from an arbitrary board. The board's orientation
    /// overrides [`Config::human`]. The game state is recomputed from the
    /// position, so a board read from a diagram reports check or mate right
    /// away.
    ///
    /// # Errors
    ///
    /// Returns [`ChessError::AmbiguousKing`] if either side does not have
    /// exactly one king.
    pub fn from_board(config: Config, mut board: Board) -> ChessResult<Self> {
        let state = update_state(&board)?;
        board.set_state(state);
        debug!(?state, "continuing game from a custom board");
        Ok(Self::with_board(config, board))
    }

    fn with_board(config: Config, board: Board) -> Self {
        Self {
            config: config.with_human(board.human()),
            board,
            selection: Selection::AwaitingSelection,
            revision: 0,
            listeners: Vec::new(),
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn config(&self) -> Config {
        self.config
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Incremented on every change reported to subscribers. Can be polled
    /// instead of subscribing.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// # Errors
    ///
    /// Returns [`ChessError::OutOfBounds`] for coordinates outside of the
    /// board.
    pub fn piece_at(&self, x: u8, y: u8) -> ChessResult<Option<Piece>> {
        self.board.get(x, y)
    }

    /// Fully-legal destinations of the piece on `position`.
    ///
    /// # Errors
    ///
    /// Returns [`ChessError::NoPieceAtSource`] for an empty square and
    /// [`ChessError::AmbiguousKing`] if the piece's owner does not have
    /// exactly one king.
    pub fn possible_moves(&self, position: Coordinate) -> ChessResult<Vec<Coordinate>> {
        let piece = self
            .board
            .piece_at(position)
            .ok_or(ChessError::NoPieceAtSource(position))?;
        Ok(piece.possible_moves(&self.board, position)?.collect())
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn current_state(&self) -> GameState {
        self.board.state()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn side_to_move(&self) -> Player {
        self.board.side_to_move()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn turns_played(&self) -> u32 {
        self.board.turns_played()
    }

    /// Registers a callback invoked after every successful mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&Event) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Advances the selection state machine. Returns the outcome when the
    /// selection completed a move.
    ///
    /// # Errors
    ///
    /// Returns [`ChessError::OutOfBounds`] without changing anything when the
    /// coordinates are outside of the board. Errors of the move attempt are
    /// propagated from [`Game::attempt_move`].
    pub fn select_square(&mut self, x: u8, y: u8) -> ChessResult<Option<MoveOutcome>> {
        let square = Coordinate::new(x, y)?;
        let Selection::PieceSelected { square: from, .. } = self.selection else {
            self.select(square)?;
            return Ok(None);
        };
        if self.config.keep_selection_on_illegal_move && self.is_selectable(square) {
            self.select(square)?;
            return Ok(None);
        }
        self.attempt_move(from, square).map(Some)
    }

    /// Applies a move of the side to move and notifies subscribers. The
    /// selection is cleared after the attempt unless it failed and
    /// [`Config::keep_selection_on_illegal_move`] is set.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`Board::apply_move`]; the board is unchanged
    /// in that case.
    pub fn attempt_move(&mut self, from: Coordinate, to: Coordinate) -> ChessResult<MoveOutcome> {
        match self.board.apply_move(from, to) {
            Ok(outcome) => {
                self.selection = Selection::AwaitingSelection;
                self.notify(&Event::MoveApplied(outcome));
                Ok(outcome)
            },
            Err(error) => {
                debug!(%from, %to, %error, "move attempt failed");
                if !self.config.keep_selection_on_illegal_move {
                    self.selection = Selection::AwaitingSelection;
                }
                Err(error)
            },
        }
    }

    /// Plays a uniformly random legal move for the side to move. Returns
    /// `None` when there are no legal moves.
    ///
    /// # Errors
    ///
    /// Returns [`ChessError::AmbiguousKing`] if either side does not have
    /// exactly one king.
    pub fn play_random_move<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> ChessResult<Option<MoveOutcome>> {
        match opponent::random_move(&self.board, rng)? {
            Some((from, to)) => self.attempt_move(from, to).map(Some),
            None => Ok(None),
        }
    }

    /// Starts over from the initial position.
    pub fn reset(&mut self) {
        self.board = Board::new(self.config.human);
        self.selection = Selection::AwaitingSelection;
        debug!(human = %self.config.human, "game reset");
        self.notify(&Event::Reset);
    }

    fn is_selectable(&self, square: Coordinate) -> bool {
        self.board
            .piece_at(square)
            .is_some_and(|piece| piece.owner == self.board.side_to_move())
    }

    fn select(&mut self, square: Coordinate) -> ChessResult<()> {
        if !self.is_selectable(square) {
            trace!(%square, "ignored selection");
            return Ok(());
        }
        let moves = self.possible_moves(square)?;
        trace!(%square, moves = moves.len(), "piece selected");
        self.selection = Selection::PieceSelected { square, moves };
        Ok(())
    }

    fn notify(&mut self, event: &Event) {
        self.revision += 1;
        for listener in &mut self.listeners {
            listener(event);
        }
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("config", &self.config)
            .field("board", &self.board)
            .field("selection", &self.selection)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
