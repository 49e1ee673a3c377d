//! FEN (Forsyth-Edwards Notation) parsing and serialization.
//!
//! Only the fields the rules engine models are kept: piece placement, side to
//! move and the en passant square. Castling rights and the move clocks are
//! validated when present and then dropped, and may be omitted entirely.

use crate::{Color, Piece, Square};
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 2 to 6 parts, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid position: {0}")]
    InvalidPosition(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),
}

/// A board placement: one optional piece per square, indexed by
/// [`Square::index`].
pub type Placement = [Option<(Piece, Color)>; 64];

/// Parsed FEN data.
///
/// The engine is responsible for turning this into a playable board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenParser {
    /// Piece on each square.
    pub placement: Placement,
    /// The side to move.
    pub side_to_move: Color,
    /// Square a pawn skipped over with a double push on the previous move.
    pub en_passant: Option<Square>,
}

impl FenParser {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if !(2..=6).contains(&parts.len()) {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let placement = Self::parse_placement(parts[0])?;

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        if let Some(castling) = parts.get(2) {
            Self::validate_castling(castling)?;
        }

        let en_passant = match parts.get(3) {
            Some(ep) => Self::parse_en_passant(ep, side_to_move)?,
            None => None,
        };

        if let Some(clock) = parts.get(4) {
            clock
                .parse::<u32>()
                .map_err(|_| FenError::InvalidHalfmoveClock(clock.to_string()))?;
        }

        if let Some(number) = parts.get(5) {
            number
                .parse::<u32>()
                .map_err(|_| FenError::InvalidFullmoveNumber(number.to_string()))?;
        }

        Ok(FenParser {
            placement,
            side_to_move,
            en_passant,
        })
    }

    fn parse_placement(placement: &str) -> Result<Placement, FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut squares: Placement = [None; 64];
        for (i, rank_str) in ranks.iter().enumerate() {
            // FEN lists rank 8 first
            let rank = 7 - i as u8;
            let mut file = 0u32;
            for c in rank_str.chars() {
                if let Some(digit) = c.to_digit(10) {
                    file += digit;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    if let Some(sq) = Square::new(file as u8, rank) {
                        squares[sq.index() as usize] = Some(piece);
                    }
                    file += 1;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        rank + 1
                    )));
                }
                if file > 8 {
                    break;
                }
            }
            if file != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    rank + 1,
                    file
                )));
            }
        }

        Self::validate_position(&squares)?;
        Ok(squares)
    }

    /// Rejects placements no game can reach: more than one king of a color,
    /// or a pawn standing on the rank it would have promoted on.
    fn validate_position(squares: &Placement) -> Result<(), FenError> {
        for color in Color::ALL {
            let kings = squares
                .iter()
                .filter(|&&slot| slot == Some((Piece::King, color)))
                .count();
            if kings > 1 {
                return Err(FenError::InvalidPosition(format!(
                    "{} has {} kings",
                    color, kings
                )));
            }

            let promotion_rank = color.promotion_rank();
            let stranded = Square::all().find(|&sq| {
                sq.rank() == promotion_rank
                    && squares[sq.index() as usize] == Some((Piece::Pawn, color))
            });
            if let Some(sq) = stranded {
                return Err(FenError::InvalidPosition(format!(
                    "{} pawn on its promotion rank at {}",
                    color, sq
                )));
            }
        }
        Ok(())
    }

    fn validate_castling(castling: &str) -> Result<(), FenError> {
        if castling == "-" {
            return Ok(());
        }

        for c in castling.chars() {
            if !"KQkq".contains(c) {
                return Err(FenError::InvalidCastlingRights(format!(
                    "invalid character '{}'",
                    c
                )));
            }
        }

        Ok(())
    }

    fn parse_en_passant(ep: &str, side_to_move: Color) -> Result<Option<Square>, FenError> {
        if ep == "-" {
            return Ok(None);
        }

        let sq = Square::from_algebraic(ep)
            .ok_or_else(|| FenError::InvalidEnPassantSquare(ep.to_string()))?;

        // The skipped square sits behind the pawn of the side that just moved.
        let expected_rank = match side_to_move {
            Color::White => 5,
            Color::Black => 2,
        };
        if sq.rank() != expected_rank {
            return Err(FenError::InvalidEnPassantSquare(ep.to_string()));
        }

        Ok(Some(sq))
    }

    /// Writes the piece placement field for a board.
    pub fn placement_to_string(placement: &Placement) -> String {
        let mut fen = String::new();

        for rank in (0..8u8).rev() {
            let mut empty_count = 0;
            for file in 0..8u8 {
                let idx = (rank * 8 + file) as usize;
                match placement[idx] {
                    Some((piece, color)) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(piece.to_fen_char(color));
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen
    }
}
