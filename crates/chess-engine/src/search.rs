//! Fixed-depth search over board snapshots.
//!
//! Every level of the tree picks the reply that maximizes the value of the
//! board for the side moving at that level. Candidates are visited in
//! [`Square::all`](chess_core::Square::all) order and a later candidate only
//! replaces the current best if it scores strictly higher, so the first
//! maximum wins.

use crate::Board;
use chess_core::{Color, Move};
use std::sync::Arc;
use std::time::Instant;

/// The move chosen by a search and how it was scored.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The chosen move.
    pub mov: Move,
    /// The board reached by playing `mov`.
    pub board: Arc<Board>,
    /// The board at the end of the searched line whose value decided.
    pub leaf: Arc<Board>,
    /// Value of `leaf` for the side that plays `mov`.
    pub score: i32,
    /// Number of boards generated during the search.
    pub nodes: u64,
}

/// Search state
struct Searcher {
    nodes: u64,
}

impl Searcher {
    fn new() -> Self {
        Searcher { nodes: 0 }
    }

    /// Returns the leaf reached by the best line for the side to move on
    /// `board`, or `None` if it has no legal move.
    fn best_leaf(&mut self, board: &Arc<Board>, ply: u32) -> Option<Arc<Board>> {
        let mover = board.side_to_move();
        let mut best: Option<(i32, Arc<Board>)> = None;

        for (_, child) in board.children() {
            self.nodes += 1;
            let leaf = self.leaf_of(child, ply);
            let score = leaf.value(mover);
            if best.as_ref().map_or(true, |(max, _)| score > *max) {
                best = Some((score, leaf));
            }
        }

        best.map(|(_, leaf)| leaf)
    }

    /// Follows `child` down the remaining plies. A child whose mover has no
    /// reply is its own leaf.
    fn leaf_of(&mut self, child: Arc<Board>, ply: u32) -> Arc<Board> {
        if ply > 1 {
            self.best_leaf(&child, ply - 1).unwrap_or(child)
        } else {
            child
        }
    }
}

/// A scored top-level move, before the best one is picked.
struct Candidate {
    mov: Move,
    board: Arc<Board>,
    leaf: Arc<Board>,
}

/// Picks the first candidate with the highest value for `mover`.
fn pick(
    mover: Color,
    candidates: impl IntoIterator<Item = Candidate>,
    nodes: u64,
) -> Option<SearchResult> {
    let mut best: Option<SearchResult> = None;
    for candidate in candidates {
        let score = candidate.leaf.value(mover);
        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(SearchResult {
                mov: candidate.mov,
                board: candidate.board,
                leaf: candidate.leaf,
                score,
                nodes,
            });
        }
    }
    best
}

fn log_result(result: &Option<SearchResult>, ply: u32, nodes: u64, start: Instant) {
    match result {
        Some(found) => tracing::debug!(
            ply = ply,
            mv = %found.mov,
            score = found.score,
            nodes = nodes,
            duration_ms = start.elapsed().as_millis(),
            "Search completed"
        ),
        None => tracing::debug!(ply = ply, "Search found no legal move"),
    }
}

/// Searches `ply` half-moves ahead and returns the best move for the side to
/// move, or `None` if it has no legal move. A `ply` of 0 searches like 1.
///
/// # Example
///
/// ```
/// use chess_engine::{search, Board};
/// use std::sync::Arc;
///
/// let board = Arc::new(Board::from_fen("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1").unwrap());
/// let result = search(&board, 1).unwrap();
/// assert_eq!(result.mov.to_uci(), "e4d5");
/// ```
pub fn search(board: &Arc<Board>, ply: u32) -> Option<SearchResult> {
    let start = Instant::now();
    let mut searcher = Searcher::new();

    let candidates: Vec<Candidate> = board
        .children()
        .map(|(mov, child)| {
            searcher.nodes += 1;
            let leaf = searcher.leaf_of(Arc::clone(&child), ply);
            Candidate {
                mov,
                board: child,
                leaf,
            }
        })
        .collect();

    let result = pick(board.side_to_move(), candidates, searcher.nodes);
    log_result(&result, ply, searcher.nodes, start);
    result
}

/// Same as [`search`], but each top-level move is searched on its own
/// thread. Boards are shared read-only between the threads; the answer is
/// identical to the sequential one.
pub fn search_parallel(board: &Arc<Board>, ply: u32) -> Option<SearchResult> {
    let start = Instant::now();
    let children: Vec<(Move, Arc<Board>)> = board.children().collect();

    let searched: Vec<(Candidate, u64)> = std::thread::scope(|scope| {
        let handles: Vec<_> = children
            .into_iter()
            .map(|(mov, child)| {
                scope.spawn(move || {
                    let mut searcher = Searcher::new();
                    let leaf = searcher.leaf_of(Arc::clone(&child), ply);
                    let candidate = Candidate {
                        mov,
                        board: child,
                        leaf,
                    };
                    (candidate, searcher.nodes + 1)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect()
    });

    let nodes = searched.iter().map(|(_, n)| n).sum();
    let result = pick(
        board.side_to_move(),
        searched.into_iter().map(|(candidate, _)| candidate),
        nodes,
    );
    log_result(&result, ply, nodes, start);
    result
}

/// Returns the board reached by the best move, or `None` if the side to move
/// has no legal move.
pub fn best_move(board: &Arc<Board>, ply: u32) -> Option<Arc<Board>> {
    search(board, ply).map(|result| result.board)
}
