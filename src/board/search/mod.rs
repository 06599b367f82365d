//! Fixed-depth minimax search with alpha-beta pruning.
//!
//! Scores are always from White's point of view: White maximizes, Black
//! minimizes, and the polarity flips every ply. Every child is searched on
//! an owned clone, so the caller's position is never touched.
//!
//! Move order is deterministic (own pieces by ascending square, then the
//! generator's destination order) and only a strictly better score
//! replaces the current best move, so equal scores keep the earliest move.
//!
//! Terminal nodes are scored specially: a side to move without legal moves
//! scores `±(MATE_SCORE + remaining depth)` when mated and 0 when
//! stalemated, at any depth, instead of the static evaluation.

mod eval;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{Move, Piece, Position};
pub use eval::{evaluate, pawn_advancement_bonus};

/// Base score of a checkmate; the remaining depth is added so that faster
/// mates score higher.
pub const MATE_SCORE: i32 = 1_000_000;

/// Search depth used when none is configured
pub const DEFAULT_DEPTH: u32 = 3;

/// Outcome of a search: the chosen move and its score.
///
/// `best_move` is `None` only when the side to move has no legal move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub score: i32,
}

/// Search settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchConfig {
    /// Plies to look ahead; values below 1 are treated as 1
    pub depth: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: DEFAULT_DEPTH,
        }
    }
}

impl SearchConfig {
    #[must_use]
    pub const fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }
}

/// Statistics tracked during search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions visited, root included
    pub nodes: u64,
    /// Beta cutoffs taken
    pub cutoffs: u64,
}

/// Best move for the side to move, searching `depth` plies.
#[must_use]
pub fn find_best_move(position: &Position, depth: u32) -> SearchResult {
    search(position, &SearchConfig { depth }).0
}

/// Run a search and report its statistics alongside the result.
#[must_use]
pub fn search(position: &Position, config: &SearchConfig) -> (SearchResult, SearchStats) {
    let depth = config.depth.max(1);
    let mut stats = SearchStats::default();
    let maximizing = position.side_to_move().sign() > 0;
    let (score, best_move) = minimax(position, depth, i32::MIN, i32::MAX, maximizing, &mut stats);

    log::debug!(
        "search depth {} best {} score {} nodes {} cutoffs {}",
        depth,
        best_move.map_or_else(|| "none".to_string(), |mv| mv.to_string()),
        score,
        stats.nodes,
        stats.cutoffs
    );

    (SearchResult { best_move, score }, stats)
}

/// Score for a side to move that has no legal move.
fn terminal_score(position: &Position, depth: u32) -> i32 {
    if position.in_check(position.side_to_move()) {
        // The side to move is mated
        -position.side_to_move().sign() * (MATE_SCORE + depth as i32)
    } else {
        0
    }
}

/// The child reached by `mv`, with a pawn reaching the last rank queened.
fn play(position: &Position, mv: Move) -> Option<Position> {
    let mut child = position.clone();
    child.apply_move(mv.from, mv.to)?;
    if let Some(pending) = child.promotion_pending() {
        child.promote_pawn(pending.square, Piece::Queen).ok()?;
    }
    Some(child)
}

fn minimax(
    position: &Position,
    depth: u32,
    mut alpha: i32,
    mut beta: i32,
    maximizing: bool,
    stats: &mut SearchStats,
) -> (i32, Option<Move>) {
    stats.nodes += 1;

    if depth == 0 {
        let mobility = position.all_legal_moves().len();
        if mobility == 0 {
            return (terminal_score(position, depth), None);
        }
        return (eval::evaluate_with_mobility(position, mobility as i32), None);
    }

    let mut best_score = if maximizing { i32::MIN } else { i32::MAX };
    let mut best_move = None;

    'pieces: for from in position.occupied_by(position.side_to_move()).iter() {
        for to in position.legal_moves(from) {
            let mv = Move::new(from, to);
            let Some(child) = play(position, mv) else {
                continue;
            };
            let (score, _) = minimax(&child, depth - 1, alpha, beta, !maximizing, stats);

            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                alpha = alpha.max(score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                beta = beta.min(score);
            }

            if beta <= alpha {
                stats.cutoffs += 1;
                break 'pieces;
            }
        }
    }

    if best_move.is_none() {
        return (terminal_score(position, depth), None);
    }
    (best_score, best_move)
}
