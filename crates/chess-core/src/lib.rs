//! Core types for chess.
//!
//! This crate provides the plain value types used across the rules engine:
//! - [`Piece`] and [`Color`] for piece representation
//! - [`Square`] for board coordinates
//! - [`Move`] for a from/to move request
//! - FEN parsing for constructing positions

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenError, FenParser};
pub use mov::Move;
pub use piece::Piece;
pub use square::Square;
