//! Board snapshots.
//!
//! A [`Board`] is never changed once it has been handed out. Playing a move
//! copies the board, applies the move to the copy, and publishes the copy as
//! a new `Arc<Board>` that links back to the board it came from. Following
//! those links walks the game history backwards.

use crate::eval::piece_value;
use crate::rules::{classify_move, is_reachable, MoveKind};
use crate::Status;
use chess_core::{Color, FenError, FenParser, Move, Piece, Square};
use std::fmt;
use std::sync::Arc;

const BACK_RANK: [Piece; 8] = [
    Piece::Rook,
    Piece::Knight,
    Piece::Bishop,
    Piece::Queen,
    Piece::King,
    Piece::Bishop,
    Piece::Knight,
    Piece::Rook,
];

/// A chess position plus the link to the position it was played from.
#[derive(Clone)]
pub struct Board {
    /// Piece on each square, indexed by [`Square::index`].
    squares: [Option<(Piece, Color)>; 64],

    /// The side to move.
    side_to_move: Color,

    /// Check/checkmate/stalemate state of the side to move.
    status: Status,

    /// Per color: file of the pawn that color double-pushed on its last move.
    markers: [Option<u8>; 2],

    /// Per color: summed value of its pieces.
    material: [i32; 2],

    /// The board this one was derived from.
    previous: Option<Arc<Board>>,
}

impl Board {
    /// Creates the standard starting position, White to move.
    pub fn new() -> Self {
        let mut board = Board::blank();
        for (file, piece) in (0u8..).zip(BACK_RANK) {
            for color in Color::ALL {
                for (rank, piece) in [(color.back_rank(), piece), (color.pawn_rank(), Piece::Pawn)] {
                    if let Some(sq) = Square::new(file, rank) {
                        board.squares[sq.index() as usize] = Some((piece, color));
                    }
                }
            }
        }
        board.refresh();
        board
    }

    /// Creates a board with no pieces, White to move. White has nothing to
    /// play, so the board reports a stalemate.
    pub fn empty() -> Self {
        let mut board = Board::blank();
        board.refresh();
        board
    }

    /// Struct literal for an empty board whose status has not been computed.
    fn blank() -> Self {
        Board {
            squares: [None; 64],
            side_to_move: Color::White,
            status: Status::Ongoing,
            markers: [None; 2],
            material: [0; 2],
            previous: None,
        }
    }

    /// Creates a board from a FEN string.
    ///
    /// Castling rights and move clocks are ignored. An en passant square sets
    /// the marker of the side that just moved.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parsed = FenParser::parse(fen)?;
        let mut board = Board::blank();
        board.squares = parsed.placement;
        board.side_to_move = parsed.side_to_move;
        if let Some(ep) = parsed.en_passant {
            board.markers[parsed.side_to_move.opposite().index()] = Some(ep.file());
        }
        board.refresh();
        Ok(board)
    }

    /// Converts the board to a FEN string.
    ///
    /// Castling is always written as `-` and the clocks as `0 1`.
    pub fn to_fen(&self) -> String {
        let placement = FenParser::placement_to_string(&self.squares);
        let active = match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let mover = self.side_to_move.opposite();
        let en_passant = self.markers[mover.index()]
            .and_then(|file| {
                let rank = (mover.pawn_rank() as i8 + mover.pawn_direction()) as u8;
                Square::new(file, rank)
            })
            .map_or_else(|| "-".to_string(), |sq| sq.to_algebraic());
        format!("{} {} - {} 0 1", placement, active, en_passant)
    }

    /// Returns the piece and color at the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        self.squares[sq.index() as usize]
    }

    /// Returns the side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Returns the check/checkmate/stalemate state of the side to move.
    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Returns the file of the pawn `color` double-pushed on its last move.
    #[inline]
    pub fn marker(&self, color: Color) -> Option<u8> {
        self.markers[color.index()]
    }

    /// Returns the board this one was derived from.
    #[inline]
    pub fn previous(&self) -> Option<&Arc<Board>> {
        self.previous.as_ref()
    }

    /// Returns the summed value of `color`'s pieces.
    #[inline]
    pub fn material(&self, color: Color) -> i32 {
        self.material[color.index()]
    }

    /// Returns the score of the board for `color`: its material minus the
    /// opponent's. Positive favors `color`.
    #[inline]
    pub fn value(&self, color: Color) -> i32 {
        self.material(color) - self.material(color.opposite())
    }

    /// Finds the king of `color` by scanning the board.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        Square::all().find(|&sq| self.piece_at(sq) == Some((Piece::King, color)))
    }

    /// Returns true if any piece of the opponent can reach `color`'s king.
    ///
    /// A side without a king is never in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        let Some(king) = self.king_square(color) else {
            return false;
        };
        Square::all().any(|sq| match self.piece_at(sq) {
            Some((_, owner)) if owner != color => is_reachable(self, sq, king),
            _ => false,
        })
    }

    /// Returns true if the side to move is in check and no move gets it out.
    pub fn is_in_checkmate(&self) -> bool {
        self.is_in_check(self.side_to_move) && !self.has_legal_move()
    }

    /// Returns true if the side to move is not in check and has no legal move.
    pub fn is_in_stalemate(&self) -> bool {
        !self.is_in_check(self.side_to_move)
            && (!self.has_reachable_destination() || !self.has_legal_move())
    }

    /// Returns true if any piece of the side to move can reach any square,
    /// ignoring whether its own king would be left attacked.
    pub fn has_reachable_destination(&self) -> bool {
        self.mover_squares()
            .any(|from| Square::all().any(|to| is_reachable(self, from, to)))
    }

    /// Returns true if the side to move has at least one legal move.
    pub fn has_legal_move(&self) -> bool {
        self.mover_squares()
            .any(|from| Square::all().any(|to| self.apply(from, to).is_some()))
    }

    /// Lists every legal move of the side to move, origins and destinations
    /// in [`Square::all`] order.
    pub fn legal_moves(&self) -> Vec<Move> {
        self.mover_squares()
            .flat_map(|from| {
                Square::all()
                    .filter(move |&to| self.apply(from, to).is_some())
                    .map(move |to| Move::new(from, to))
            })
            .collect()
    }

    /// Plays every legal move of the side to move, in [`Square::all`] order.
    pub fn children(self: &Arc<Self>) -> impl Iterator<Item = (Move, Arc<Board>)> + '_ {
        self.mover_squares().flat_map(move |from| {
            Square::all().filter_map(move |to| {
                self.make_move(from, to)
                    .map(|next| (Move::new(from, to), next))
            })
        })
    }

    /// Plays the move `from` → `to`.
    ///
    /// Returns `None` if `from` does not hold a piece of the side to move, the
    /// piece cannot reach `to`, or the move would leave the mover's own king
    /// attacked. On success the returned board has the opponent to move, a
    /// fresh status and material, and links back to `self`.
    pub fn make_move(self: &Arc<Self>, from: Square, to: Square) -> Option<Arc<Board>> {
        let mut next = self.apply(from, to)?;
        next.previous = Some(Arc::clone(self));
        next.side_to_move = self.side_to_move.opposite();
        next.refresh();
        Some(Arc::new(next))
    }

    /// Plays a move given in coordinate notation (e.g. "e2e4").
    pub fn make_move_uci(self: &Arc<Self>, uci: &str) -> Option<Arc<Board>> {
        let m = Move::from_uci(uci)?;
        self.make_move(m.from(), m.to())
    }

    /// Squares holding a piece of the side to move, in [`Square::all`] order.
    fn mover_squares(&self) -> impl Iterator<Item = Square> + '_ {
        let mover = self.side_to_move;
        Square::all().filter(move |&sq| matches!(self.piece_at(sq), Some((_, c)) if c == mover))
    }

    /// Applies a move to a private copy and checks that the mover's king is
    /// safe afterwards. The copy still has the mover to move, no history link,
    /// and stale status and material.
    fn apply(&self, from: Square, to: Square) -> Option<Board> {
        let (_, mover) = self.piece_at(from)?;
        if mover != self.side_to_move {
            return None;
        }
        let kind = classify_move(self, from, to)?;

        let mut next = Board {
            squares: self.squares,
            side_to_move: self.side_to_move,
            status: self.status,
            markers: self.markers,
            material: self.material,
            previous: None,
        };

        next.markers[mover.index()] = None;
        if let MoveKind::EnPassant { captured } = kind {
            next.squares[captured.index() as usize] = None;
        }
        let moving = next.squares[from.index() as usize].take();
        next.squares[to.index() as usize] = moving;
        if kind == MoveKind::DoublePush {
            next.markers[mover.index()] = Some(from.file());
        }
        next.promote();

        if next.is_in_check(mover) {
            return None;
        }
        Some(next)
    }

    /// Turns every pawn standing on its promotion rank into a queen.
    fn promote(&mut self) {
        for color in Color::ALL {
            for file in 0..8 {
                if let Some(sq) = Square::new(file, color.promotion_rank()) {
                    if self.piece_at(sq) == Some((Piece::Pawn, color)) {
                        self.squares[sq.index() as usize] = Some((Piece::Queen, color));
                    }
                }
            }
        }
    }

    /// Recomputes status and material after the pieces or the side to move
    /// changed.
    fn refresh(&mut self) {
        self.update_status();
        self.evaluate();
    }

    fn update_status(&mut self) {
        let mover = self.side_to_move;
        self.status = if self.is_in_check(mover) {
            if self.has_legal_move() {
                Status::Check(mover)
            } else {
                Status::Checkmate(mover)
            }
        } else if !self.has_reachable_destination() || !self.has_legal_move() {
            Status::Stalemate(mover)
        } else {
            Status::Ongoing
        };
    }

    fn evaluate(&mut self) {
        let mut material = [0; 2];
        for sq in Square::all() {
            if let Some((piece, color)) = self.piece_at(sq) {
                material[color.index()] += piece_value(piece, color, sq);
            }
        }
        self.material = material;
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Boards are equal when they hold the same pieces, have the same side to
/// move and the same en passant markers. History is not compared.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.squares == other.squares
            && self.side_to_move == other.side_to_move
            && self.markers == other.markers
    }
}

impl Eq for Board {}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("fen", &self.to_fen())
            .field("status", &self.status)
            .field("has_previous", &self.previous.is_some())
            .finish()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const SEPARATOR: &str = "+---+---+---+---+---+---+---+---+";

        writeln!(f, "current player: {}", self.side_to_move.to_char())?;
        for rank in (0..8).rev() {
            writeln!(f, "{}", SEPARATOR)?;
            for file in 0..8 {
                match Square::new(file, rank).and_then(|sq| self.piece_at(sq)) {
                    Some((piece, color)) => {
                        write!(f, "|{}{} ", color.to_char(), piece.to_char())?
                    }
                    None => write!(f, "|   ")?,
                }
            }
            writeln!(f, "| {}", rank + 1)?;
        }
        writeln!(f, "{}", SEPARATOR)?;
        write!(f, "  A   B   C   D   E   F   G   H")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn play(board: &Arc<Board>, moves: &[&str]) -> Arc<Board> {
        moves.iter().fold(Arc::clone(board), |b, m| {
            b.make_move_uci(m)
                .unwrap_or_else(|| panic!("{} should be legal in {}", m, b.to_fen()))
        })
    }

    #[test]
    fn startpos() {
        let board = Board::new();
        assert_eq!(board.side_to_move(), Color::White);
        assert_eq!(board.status(), Status::Ongoing);
        assert_eq!(board.piece_at(Square::E1), Some((Piece::King, Color::White)));
        assert_eq!(board.piece_at(Square::E8), Some((Piece::King, Color::Black)));
        assert_eq!(board.piece_at(sq("d8")), Some((Piece::Queen, Color::Black)));
        assert_eq!(board.piece_at(sq("e4")), None);
        assert_eq!(Square::all().filter(|&s| board.piece_at(s).is_some()).count(), 32);
        assert_eq!(board.marker(Color::White), None);
        assert!(board.previous().is_none());
    }

    #[test]
    fn startpos_matches_fen() {
        let from_fen = Board::from_fen(FenParser::STARTPOS).unwrap();
        assert_eq!(Board::new(), from_fen);
        assert_eq!(
            Board::new().to_fen(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1"
        );
    }

    #[test]
    fn startpos_is_balanced() {
        let board = Board::new();
        assert_eq!(board.material(Color::White), board.material(Color::Black));
        assert_eq!(board.value(Color::White), 0);
        assert_eq!(board.value(Color::Black), 0);
    }

    #[test]
    fn value_is_zero_sum() {
        let board = play(&Arc::new(Board::new()), &["e2e4", "d7d5", "e4d5"]);
        assert!(board.value(Color::White) > 0);
        assert_eq!(board.value(Color::White), -board.value(Color::Black));
    }

    #[test]
    fn fen_keeps_en_passant_marker() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b - e3 0 1";
        let board = Board::from_fen(fen).unwrap();
        assert_eq!(board.marker(Color::White), Some(4));
        assert_eq!(board.marker(Color::Black), None);
        assert_eq!(board.to_fen(), fen);
    }

    #[test]
    fn clone_is_equal_and_independent() {
        let board = Arc::new(Board::new());
        let copy = (*board).clone();
        assert_eq!(*board, copy);

        let moved = board.make_move(sq("e2"), sq("e4")).unwrap();
        assert_eq!(copy, *board);
        assert_ne!(*moved, copy);
        assert_eq!(board.piece_at(sq("e2")), Some((Piece::Pawn, Color::White)));
    }

    #[test]
    fn make_move_links_back_and_flips_side() {
        let board = Arc::new(Board::new());
        let next = board.make_move(sq("g1"), sq("f3")).unwrap();
        assert_eq!(next.side_to_move(), Color::Black);
        assert!(Arc::ptr_eq(next.previous().unwrap(), &board));
        assert_eq!(next.piece_at(sq("f3")), Some((Piece::Knight, Color::White)));
        assert_eq!(next.piece_at(sq("g1")), None);
    }

    #[test]
    fn only_the_side_to_move_may_move() {
        let board = Arc::new(Board::new());
        assert!(board.make_move(sq("e7"), sq("e5")).is_none());
        assert!(board.make_move(sq("e4"), sq("e5")).is_none());
        assert!(board.make_move(sq("e2"), sq("e5")).is_none());
    }

    #[test]
    fn double_push_sets_marker_for_one_turn() {
        let board = play(&Arc::new(Board::new()), &["e2e4"]);
        assert_eq!(board.marker(Color::White), Some(4));
        assert_eq!(board.to_fen().split(' ').nth(3), Some("e3"));

        let board = play(&board, &["d7d5"]);
        assert_eq!(board.marker(Color::White), Some(4));
        assert_eq!(board.marker(Color::Black), Some(3));
        assert_eq!(board.to_fen().split(' ').nth(3), Some("d6"));

        // A marker is cleared as soon as its owner moves again.
        let board = play(&board, &["a2a3"]);
        assert_eq!(board.marker(Color::White), None);
        assert_eq!(board.marker(Color::Black), Some(3));
        assert_eq!(board.to_fen().split(' ').nth(3), Some("-"));
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let board = play(&Arc::new(Board::new()), &["e2e4", "a7a6", "e4e5", "d7d5"]);
        let after = board.make_move(sq("e5"), sq("d6")).unwrap();
        assert_eq!(after.piece_at(sq("d6")), Some((Piece::Pawn, Color::White)));
        assert_eq!(after.piece_at(sq("d5")), None);
        assert_eq!(after.piece_at(sq("e5")), None);
        assert!(after.material(Color::Black) < board.material(Color::Black));
    }

    #[test]
    fn en_passant_expires_after_one_move() {
        let board = play(
            &Arc::new(Board::new()),
            &["e2e4", "a7a6", "e4e5", "d7d5", "a2a3", "h7h6"],
        );
        assert!(board.make_move(sq("e5"), sq("d6")).is_none());
    }

    #[test]
    fn pinned_piece_cannot_expose_king() {
        let board = Arc::new(Board::from_fen("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1").unwrap());
        assert!(board.make_move(sq("e2"), sq("d3")).is_none());
        assert!(board.make_move(sq("e1"), sq("d1")).is_some());
    }

    #[test]
    fn king_cannot_step_into_attack() {
        let board = Arc::new(Board::from_fen("4k3/8/8/8/8/8/r7/4K3 w - - 0 1").unwrap());
        assert!(board.make_move(sq("e1"), sq("e2")).is_none());
        assert!(board.make_move(sq("e1"), sq("f1")).is_some());
    }

    #[test]
    fn promotion_only_on_resulting_board() {
        let board = Arc::new(Board::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap());
        let promoted = board.make_move(sq("e7"), sq("e8")).unwrap();
        assert_eq!(promoted.piece_at(sq("e8")), Some((Piece::Queen, Color::White)));
        assert_eq!(board.piece_at(sq("e7")), Some((Piece::Pawn, Color::White)));
        assert_eq!(board.piece_at(sq("e8")), None);
    }

    #[test]
    fn black_promotes_on_first_rank() {
        let board = Arc::new(Board::from_fen("4k3/8/8/8/8/8/3p4/K7 b - - 0 1").unwrap());
        let promoted = board.make_move(sq("d2"), sq("d1")).unwrap();
        assert_eq!(promoted.piece_at(sq("d1")), Some((Piece::Queen, Color::Black)));
        assert_eq!(promoted.status(), Status::Check(Color::White));
    }

    #[test]
    fn check_is_detected() {
        let board = play(&Arc::new(Board::new()), &["e2e4", "f7f6", "d1h5"]);
        assert!(board.is_in_check(Color::Black));
        assert_eq!(board.status(), Status::Check(Color::Black));
        assert!(!board.is_in_checkmate());
    }

    #[test]
    fn fools_mate() {
        let board = play(&Arc::new(Board::new()), &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert_eq!(board.status(), Status::Checkmate(Color::White));
        assert!(board.is_in_checkmate());
        assert!(board.legal_moves().is_empty());
    }

    #[test]
    fn king_and_queen_stalemate() {
        let board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(!board.is_in_check(Color::Black));
        assert!(board.is_in_stalemate());
        assert_eq!(board.status(), Status::Stalemate(Color::Black));
        // The king still has raw-reachable squares; all of them are attacked.
        assert!(board.has_reachable_destination());
    }

    #[test]
    fn boxed_in_side_is_stalemated() {
        // Black's only piece is a pawn blocked by a white pawn.
        let board = Board::from_fen("8/8/8/8/8/p7/P7/K7 b - - 0 1").unwrap();
        assert!(!board.has_reachable_destination());
        assert_eq!(board.status(), Status::Stalemate(Color::Black));

        let board = Board::from_fen("8/8/8/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(board.status(), Status::Stalemate(Color::Black));
    }

    #[test]
    fn empty_board_has_a_computed_status() {
        let empty = Board::empty();
        let from_fen = Board::from_fen("8/8/8/8/8/8/8/8 w - - 0 1").unwrap();
        assert_eq!(empty.status(), Status::Stalemate(Color::White));
        assert_eq!(empty, from_fen);
        assert_eq!(empty.status(), from_fen.status());
        assert_eq!(empty.material(Color::White), 0);
        assert_eq!(empty.material(Color::Black), 0);
    }

    #[test]
    fn from_fen_rejects_unreachable_positions() {
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/4KK2 w - - 0 1"),
            Err(FenError::InvalidPosition(_))
        ));
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/3pK3 b - - 0 1"),
            Err(FenError::InvalidPosition(_))
        ));
    }

    #[test]
    fn legal_moves_from_startpos() {
        let moves = Board::new().legal_moves();
        assert_eq!(moves.len(), 20);
        // File-major order: the a-pawn comes first, the h-pawn last.
        assert_eq!(moves[0].to_uci(), "a2a3");
        assert_eq!(moves[1].to_uci(), "a2a4");
        assert_eq!(moves[2].to_uci(), "b1a3");
        assert_eq!(moves[19].to_uci(), "h2h4");
    }

    #[test]
    fn children_follow_legal_moves() {
        let board = Arc::new(Board::new());
        let moves: Vec<Move> = board.children().map(|(m, _)| m).collect();
        assert_eq!(moves, board.legal_moves());
    }

    #[test]
    fn display_draws_grid() {
        let text = Board::new().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "current player: W");
        assert_eq!(lines[1], "+---+---+---+---+---+---+---+---+");
        assert_eq!(lines[2], "|BR |BN |BB |BQ |BK |BB |BN |BR | 8");
        assert_eq!(lines[6], "|   |   |   |   |   |   |   |   | 6");
        assert_eq!(lines[16], "|WR |WN |WB |WQ |WK |WB |WN |WR | 1");
        assert_eq!(lines[18], "  A   B   C   D   E   F   G   H");
    }
}
