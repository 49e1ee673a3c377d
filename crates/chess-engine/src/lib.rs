//! Chess rules engine over immutable board snapshots.
//!
//! This crate provides:
//! - [`Board`] - A position, its check/mate/stalemate [`Status`] and a link to
//!   the board it was played from
//! - [`rules`] - Per-piece reachability, classified into a [`MoveKind`]
//! - [`search`] - Fixed-depth search choosing a move for the side to move
//! - [`Game`] - A session holding the current board, with undo
//! - [`perft`] - Leaf counting for validating the move rules
//!
//! # Architecture
//!
//! Boards are never mutated after they are published. A move is applied to
//! a private copy, checked for self-check, and returned as a new
//! `Arc<Board>`. History is the chain of `previous` links, so undo is a
//! pointer swap and search threads can share boards without locking.
//!
//! Castling is not part of the rules and pawns always promote to a queen.
//!
//! # Example
//!
//! ```
//! use chess_engine::{Game, Status};
//! use chess_core::Color;
//!
//! let mut game = Game::new();
//! for m in ["f2f3", "e7e5", "g2g4", "d8h4"] {
//!     game.try_move_uci(m).unwrap();
//! }
//! assert_eq!(game.status(), Status::Checkmate(Color::White));
//!
//! game.undo();
//! assert!(game.auto_move(1));
//! ```

mod board;
pub mod eval;
mod game;
mod perft;
pub mod rules;
mod search;
mod status;

pub use board::Board;
pub use game::{Game, GameError};
pub use perft::{perft, perft_divide};
pub use rules::{classify_move, is_reachable, MoveKind};
pub use search::{best_move, search, search_parallel, SearchResult};
pub use status::Status;
