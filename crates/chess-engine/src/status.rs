//! Check, checkmate and stalemate classification of a board.

use chess_core::Color;
use std::fmt;

/// The derived state of a board for its side to move.
///
/// The color carried by each variant is always the side to move, i.e. the
/// player who is in check, mated or stalemated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// Play continues normally.
    #[default]
    Ongoing,
    /// The side to move is in check but has a way out.
    Check(Color),
    /// The side to move is in check and has no legal move.
    Checkmate(Color),
    /// The side to move is not in check and has no legal move.
    Stalemate(Color),
}

impl Status {
    /// Returns true if no further moves should be played.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Status::Checkmate(_) | Status::Stalemate(_))
    }

    /// Returns true if the side to move is in check (including checkmate).
    #[inline]
    pub const fn is_check(self) -> bool {
        matches!(self, Status::Check(_) | Status::Checkmate(_))
    }

    /// Returns the winner, if the game ended in checkmate.
    pub const fn winner(self) -> Option<Color> {
        match self {
            Status::Checkmate(loser) => Some(loser.opposite()),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ongoing => write!(f, "ongoing"),
            Status::Check(color) => write!(f, "{} is in check", color),
            Status::Checkmate(color) => write!(f, "{} is checkmated", color),
            Status::Stalemate(color) => write!(f, "{} is stalemated", color),
        }
    }
}
