//! Perft (performance test) for move rule validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values. Castling is not part of the rules,
//! so only positions where castling never becomes possible within the depth
//! match published counts.

use crate::Board;
use std::sync::Arc;

/// Counts the number of leaf nodes at the given depth.
pub fn perft(board: &Arc<Board>, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    if depth == 1 {
        return board.legal_moves().len() as u64;
    }

    board
        .children()
        .map(|(_, child)| perft(&child, depth - 1))
        .sum()
}

/// Perft with divide - shows node count for each move at depth-1.
/// Useful for debugging to identify which moves have incorrect counts.
pub fn perft_divide(board: &Arc<Board>, depth: u32) -> Vec<(String, u64)> {
    let mut results: Vec<(String, u64)> = board
        .children()
        .map(|(m, child)| {
            let nodes = if depth > 1 { perft(&child, depth - 1) } else { 1 };
            (m.to_uci(), nodes)
        })
        .collect();

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
