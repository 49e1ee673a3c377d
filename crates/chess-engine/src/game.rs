//! Game session with undo.
//!
//! A [`Game`] only holds the current board. Every board links back to the
//! one it was played from, so that link chain is the whole move history and
//! undoing a move steps back along it.

use crate::search::{search, search_parallel, SearchResult};
use crate::{Board, Status};
use chess_core::{Color, FenError, Move, Square};
use std::sync::Arc;
use thiserror::Error;

/// Error type for game operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The move is not legal in the current position.
    #[error("illegal move: {0}")]
    IllegalMove(Move),
    /// The move text could not be parsed.
    #[error("invalid move notation: {0:?}")]
    InvalidNotation(String),
    /// The game has already ended.
    #[error("game has already ended")]
    GameAlreadyOver,
    /// The search found no move for the side to move.
    #[error("no legal move available")]
    NoLegalMove,
}

/// A chess game session: the current board plus its history.
#[derive(Debug, Clone)]
pub struct Game {
    /// Current board; earlier boards hang off its `previous` link.
    board: Arc<Board>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Game {
            board: Arc::new(Board::new()),
        }
    }

    /// Creates a game that continues from `board`, keeping its history.
    pub fn from_board(board: Arc<Board>) -> Self {
        Game { board }
    }

    /// Creates a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let board = Board::from_fen(fen)?;
        Ok(Self::from_board(Arc::new(board)))
    }

    /// Returns the current board.
    pub fn board(&self) -> &Arc<Board> {
        &self.board
    }

    /// Returns the status of the current board.
    pub fn status(&self) -> Status {
        self.board.status()
    }

    /// Returns the side to move.
    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    /// Returns true if the side to move is checkmated or stalemated.
    pub fn is_game_over(&self) -> bool {
        self.board.status().is_terminal()
    }

    /// Returns the number of half-moves (plies) that can be undone.
    pub fn ply_count(&self) -> usize {
        std::iter::successors(self.board.previous(), |b| b.previous()).count()
    }

    /// Returns true if there is a move to undo.
    pub fn can_undo(&self) -> bool {
        self.board.previous().is_some()
    }

    /// Makes the move `from` → `to` for the side to move.
    pub fn try_move(&mut self, from: Square, to: Square) -> Result<(), GameError> {
        if self.is_game_over() {
            tracing::debug!(status = %self.status(), "Move refused, game over");
            return Err(GameError::GameAlreadyOver);
        }

        let m = Move::new(from, to);
        match self.board.make_move(from, to) {
            Some(next) => {
                self.advance(m, next);
                Ok(())
            }
            None => {
                tracing::debug!(mv = %m, "Illegal move refused");
                Err(GameError::IllegalMove(m))
            }
        }
    }

    /// Makes a move and reports whether it was played.
    pub fn make_move(&mut self, from: Square, to: Square) -> bool {
        self.try_move(from, to).is_ok()
    }

    /// Makes a move given in coordinate notation (e.g. "e2e4").
    pub fn try_move_uci(&mut self, uci: &str) -> Result<(), GameError> {
        let m = Move::from_uci(uci).ok_or_else(|| GameError::InvalidNotation(uci.to_string()))?;
        self.try_move(m.from(), m.to())
    }

    /// Searches `ply` half-moves ahead and plays the best move found.
    pub fn try_auto_move(&mut self, ply: u32) -> Result<SearchResult, GameError> {
        self.auto_move_with(ply, search)
    }

    /// Same as [`Game::try_auto_move`], searching top-level moves in parallel.
    pub fn try_auto_move_parallel(&mut self, ply: u32) -> Result<SearchResult, GameError> {
        self.auto_move_with(ply, search_parallel)
    }

    /// Plays an engine move and reports whether one was played.
    pub fn auto_move(&mut self, ply: u32) -> bool {
        self.try_auto_move(ply).is_ok()
    }

    /// Takes back the last move. Returns false at the first board.
    pub fn undo(&mut self) -> bool {
        match self.board.previous() {
            Some(previous) => {
                self.board = Arc::clone(previous);
                tracing::debug!(side = %self.side_to_move(), "Move undone");
                true
            }
            None => false,
        }
    }

    /// Returns the current board as a FEN string.
    pub fn to_fen(&self) -> String {
        self.board.to_fen()
    }

    fn auto_move_with(
        &mut self,
        ply: u32,
        run: fn(&Arc<Board>, u32) -> Option<SearchResult>,
    ) -> Result<SearchResult, GameError> {
        if self.is_game_over() {
            return Err(GameError::GameAlreadyOver);
        }
        let result = run(&self.board, ply).ok_or(GameError::NoLegalMove)?;
        self.advance(result.mov, Arc::clone(&result.board));
        Ok(result)
    }

    fn advance(&mut self, m: Move, next: Arc<Board>) {
        self.board = next;
        tracing::debug!(mv = %m, status = %self.status(), "Move applied");
    }
}
