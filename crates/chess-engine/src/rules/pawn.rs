//! Pawn movement: advances, diagonal captures, en passant and promotion.

use super::MoveKind;
use crate::Board;
use chess_core::{Color, Piece, Square};

/// Classifies a pawn move. The caller has already rejected `to == from` and
/// destinations holding a piece of the pawn's own color.
pub(super) fn classify(
    board: &Board,
    from: Square,
    to: Square,
    color: Color,
    occupied: bool,
) -> Option<MoveKind> {
    let dir = color.pawn_direction();
    let df = to.file() as i8 - from.file() as i8;
    let dr = to.rank() as i8 - from.rank() as i8;
    let promotes = to.rank() == color.promotion_rank();

    // Straight ahead, never onto a piece
    if df == 0 && !occupied {
        if dr == dir {
            return Some(if promotes {
                MoveKind::Promotion { capture: false }
            } else {
                MoveKind::Quiet
            });
        }
        if dr == 2 * dir && from.rank() == color.pawn_rank() {
            let skipped = from.offset(0, dir)?;
            if board.piece_at(skipped).is_none() {
                return Some(MoveKind::DoublePush);
            }
        }
        return None;
    }

    if df.abs() != 1 || dr != dir {
        return None;
    }

    if occupied {
        return Some(if promotes {
            MoveKind::Promotion { capture: true }
        } else {
            MoveKind::Capture
        });
    }

    // En passant: the opponent's marker names the file of the pawn that just
    // double-pushed next to us.
    let captured = Square::new(to.file(), from.rank())?;
    let them = color.opposite();
    if from.rank() == color.en_passant_rank()
        && board.marker(them) == Some(to.file())
        && board.piece_at(captured) == Some((Piece::Pawn, them))
    {
        return Some(MoveKind::EnPassant { captured });
    }

    None
}

#[cfg(test)]
mod tests {
    use crate::rules::{classify_move, MoveKind};
    use crate::Board;
    use chess_core::Square;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn single_and_double_push_from_home_rank() {
        let b = Board::new();
        assert_eq!(classify_move(&b, sq("e2"), sq("e3")), Some(MoveKind::Quiet));
        assert_eq!(
            classify_move(&b, sq("e2"), sq("e4")),
            Some(MoveKind::DoublePush)
        );
        assert_eq!(classify_move(&b, sq("e2"), sq("e5")), None);
        assert_eq!(
            classify_move(&b, sq("d7"), sq("d5")),
            Some(MoveKind::DoublePush)
        );
    }

    #[test]
    fn pawns_never_move_backwards_or_sideways() {
        let b = Board::from_fen("4k3/8/8/8/4P3/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(classify_move(&b, sq("e4"), sq("e3")), None);
        assert_eq!(classify_move(&b, sq("e4"), sq("d4")), None);
        assert_eq!(classify_move(&b, sq("e4"), sq("d5")), None);
    }

    #[test]
    fn double_push_only_from_home_rank() {
        let b = Board::from_fen("4k3/8/8/8/8/4P3/8/4K3 w - - 0 1").unwrap();
        assert_eq!(classify_move(&b, sq("e3"), sq("e4")), Some(MoveKind::Quiet));
        assert_eq!(classify_move(&b, sq("e3"), sq("e5")), None);
    }

    #[test]
    fn blocked_pawn_cannot_advance() {
        // Knight on e3 blocks both the single and the double push.
        let b = Board::from_fen("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1").unwrap();
        assert_eq!(classify_move(&b, sq("e2"), sq("e3")), None);
        assert_eq!(classify_move(&b, sq("e2"), sq("e4")), None);

        // Knight on e4 blocks only the double push.
        let b = Board::from_fen("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1").unwrap();
        assert_eq!(classify_move(&b, sq("e2"), sq("e3")), Some(MoveKind::Quiet));
        assert_eq!(classify_move(&b, sq("e2"), sq("e4")), None);
    }

    #[test]
    fn diagonal_needs_an_enemy_piece() {
        let b = Board::from_fen("4k3/8/8/3p1P2/4P3/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(classify_move(&b, sq("e4"), sq("d5")), Some(MoveKind::Capture));
        assert_eq!(classify_move(&b, sq("e4"), sq("f5")), None);
    }

    #[test]
    fn promotion_on_last_rank() {
        let b = Board::from_fen("3rk3/4P3/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(
            classify_move(&b, sq("e7"), sq("d8")),
            Some(MoveKind::Promotion { capture: true })
        );
        // e8 holds the black king, so the straight push is blocked.
        assert_eq!(classify_move(&b, sq("e7"), sq("e8")), None);

        let b = Board::from_fen("4k3/8/8/8/8/8/3p4/K7 b - - 0 1").unwrap();
        assert_eq!(
            classify_move(&b, sq("d2"), sq("d1")),
            Some(MoveKind::Promotion { capture: false })
        );
    }

    #[test]
    fn en_passant_follows_the_marker() {
        // Black just played d7-d5 next to the white pawn on e5.
        let b = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        assert_eq!(
            classify_move(&b, sq("e5"), sq("d6")),
            Some(MoveKind::EnPassant { captured: sq("d5") })
        );
        assert_eq!(classify_move(&b, sq("e5"), sq("f6")), None);

        // Without the marker the same diagonal step is not a move.
        let b = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(classify_move(&b, sq("e5"), sq("d6")), None);
    }

    #[test]
    fn en_passant_for_black() {
        let b = Board::from_fen("4k3/8/8/8/3pP3/8/8/4K3 b - e3 0 1").unwrap();
        assert_eq!(
            classify_move(&b, sq("d4"), sq("e3")),
            Some(MoveKind::EnPassant { captured: sq("e4") })
        );
    }

    #[test]
    fn en_passant_needs_the_right_rank() {
        // White pawn on e4 is not on the fifth rank.
        let b = Board::from_fen("4k3/8/8/8/3pP3/8/8/4K3 w - d6 0 1").unwrap();
        assert_eq!(classify_move(&b, sq("e4"), sq("d5")), None);
    }

    #[test]
    fn en_passant_needs_a_pawn_beside() {
        // The d6 marker is set but nothing stands on d5.
        let b = Board::from_fen("4k3/8/8/4P3/8/8/8/4K3 w - d6 0 1").unwrap();
        assert_eq!(classify_move(&b, sq("e5"), sq("d6")), None);
    }
}
