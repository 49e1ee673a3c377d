//! Piece movement rules.
//!
//! Whether a piece can reach a square is decided by [`classify_move`], a pure
//! function of the board. It reports what kind of move the request would be,
//! so applying the move later needs no extra bookkeeping: a double push
//! carries the marker to publish, an en passant capture carries the square of
//! the pawn it removes.
//!
//! Reachability ignores whether the mover's own king would be left attacked;
//! that check happens when the move is applied on a copy of the board.

mod pawn;

use crate::Board;
use chess_core::{Piece, Square};

/// What a reachable move does, as seen from the position it is played in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Move to an empty square.
    Quiet,
    /// Move onto an enemy piece, removing it.
    Capture,
    /// Pawn advance of two squares from its starting rank.
    DoublePush,
    /// Pawn capture of an enemy pawn that just double-pushed past it.
    EnPassant {
        /// Square of the pawn being removed (beside the origin, not the
        /// destination).
        captured: Square,
    },
    /// Pawn reaching the last rank, where it becomes a queen.
    Promotion {
        /// Whether an enemy piece stood on the promotion square.
        capture: bool,
    },
}

impl MoveKind {
    /// Returns true if the move removes an enemy piece.
    #[inline]
    pub const fn is_capture(self) -> bool {
        matches!(
            self,
            MoveKind::Capture | MoveKind::EnPassant { .. } | MoveKind::Promotion { capture: true }
        )
    }
}

/// Classifies the move of the piece on `from` to `to`, or returns `None` if
/// the piece cannot reach `to`.
///
/// Shared by every piece: `from` must hold a piece, `to` must differ from
/// `from`, and `to` must not hold a piece of the same color. Each kind then
/// adds its own geometry.
pub fn classify_move(board: &Board, from: Square, to: Square) -> Option<MoveKind> {
    let (piece, color) = board.piece_at(from)?;
    if from == to {
        return None;
    }
    let target = board.piece_at(to);
    if let Some((_, target_color)) = target {
        if target_color == color {
            return None;
        }
    }

    let df = to.file() as i8 - from.file() as i8;
    let dr = to.rank() as i8 - from.rank() as i8;

    let reachable = match piece {
        Piece::Pawn => return pawn::classify(board, from, to, color, target.is_some()),
        Piece::Knight => knight_reaches(df, dr),
        Piece::Bishop => bishop_reaches(board, from, df, dr),
        Piece::Rook => rook_reaches(board, from, df, dr),
        Piece::Queen => bishop_reaches(board, from, df, dr) || rook_reaches(board, from, df, dr),
        Piece::King => king_reaches(df, dr),
    };

    if !reachable {
        None
    } else if target.is_some() {
        Some(MoveKind::Capture)
    } else {
        Some(MoveKind::Quiet)
    }
}

/// Returns true if the piece on `from` can reach `to`.
#[inline]
pub fn is_reachable(board: &Board, from: Square, to: Square) -> bool {
    classify_move(board, from, to).is_some()
}

fn knight_reaches(df: i8, dr: i8) -> bool {
    matches!((df.abs(), dr.abs()), (1, 2) | (2, 1))
}

fn king_reaches(df: i8, dr: i8) -> bool {
    df.abs() <= 1 && dr.abs() <= 1 && (df, dr) != (0, 0)
}

fn bishop_reaches(board: &Board, from: Square, df: i8, dr: i8) -> bool {
    df != 0 && df.abs() == dr.abs() && ray_is_clear(board, from, df, dr)
}

fn rook_reaches(board: &Board, from: Square, df: i8, dr: i8) -> bool {
    (df == 0) != (dr == 0) && ray_is_clear(board, from, df, dr)
}

/// Returns true if every square strictly between `from` and `from + (df, dr)`
/// is empty. The delta must be a straight or diagonal line.
fn ray_is_clear(board: &Board, from: Square, df: i8, dr: i8) -> bool {
    let (step_f, step_r) = (df.signum(), dr.signum());
    let distance = df.abs().max(dr.abs());
    (1..distance).all(|i| match from.offset(step_f * i, step_r * i) {
        Some(sq) => board.piece_at(sq).is_none(),
        None => false,
    })
}
