//! Chess piece kinds.

use crate::Color;
use std::fmt;

/// The six kinds of chess pieces.
///
/// A piece on a board is a `(Piece, Color)` pair; the square it stands on is
/// the board slot that holds it. Kinds carry no state of their own, so a
/// promoted pawn is simply replaced by a `Piece::Queen` of the same color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// Letters in [`Piece::ALL`] order.
const LETTERS: [char; 6] = ['P', 'N', 'B', 'R', 'Q', 'K'];

impl Piece {
    /// All piece kinds, pawn first.
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    /// Upper-case letter for this kind, as used in board dumps.
    #[inline]
    pub const fn to_char(self) -> char {
        LETTERS[self as usize]
    }

    /// Looks up a kind by its upper-case letter.
    pub fn from_char(c: char) -> Option<Piece> {
        LETTERS
            .iter()
            .position(|&letter| letter == c)
            .map(|i| Piece::ALL[i])
    }

    /// FEN letter: upper case for White, lower case for Black.
    pub const fn to_fen_char(self, color: Color) -> char {
        match color {
            Color::White => self.to_char(),
            Color::Black => self.to_char().to_ascii_lowercase(),
        }
    }

    /// Reads a FEN letter back into a kind and color.
    pub fn from_fen_char(c: char) -> Option<(Piece, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Piece::from_char(c.to_ascii_uppercase()).map(|piece| (piece, color))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Piece::Pawn => "Pawn",
            Piece::Knight => "Knight",
            Piece::Bishop => "Bishop",
            Piece::Rook => "Rook",
            Piece::Queen => "Queen",
            Piece::King => "King",
        };
        f.write_str(name)
    }
}
