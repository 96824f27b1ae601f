//! Alpha-beta search.
//!
//! A fail-hard negamax over legal moves, driven by iterative deepening.
//! Scores are centipawns from the side to move's point of view; mate
//! scores sit just below [`MATE`] and shrink by one per ply from the root.

mod iterative;
mod negamax;
mod ordering;

use std::fmt;
use std::time::Duration;

use super::{Evaluator, Move, Position, MAX_PLY};
use crate::sync::StopFlag;

pub use iterative::iterative_deepening;
pub use ordering::MoveOrderer;

use negamax::SearchContext;

/// Score of a side that has been checkmated at the current node.
pub const MATE: i32 = 32_000;
/// Wider than any reachable score.
pub const INFINITY: i32 = MATE + 1;
/// Deepest iteration the driver will start.
pub const MAX_DEPTH: u32 = MAX_PLY as u32;

const MATE_BOUND: i32 = MATE - MAX_PLY as i32;

/// Is `score` a forced mate for either side?
#[inline]
#[must_use]
pub const fn is_mate_score(score: i32) -> bool {
    score.abs() >= MATE_BOUND
}

/// Move a mate score one ply further from the root.
#[inline]
#[must_use]
pub const fn adjust_mate_distance(score: i32) -> i32 {
    if is_mate_score(score) {
        score - score.signum()
    } else {
        score
    }
}

/// Full moves to mate; negative when the side to move is getting mated.
#[must_use]
pub const fn mate_in(score: i32) -> Option<i32> {
    if !is_mate_score(score) {
        None
    } else if score > 0 {
        Some((MATE - score + 1) / 2)
    } else {
        Some(-(MATE + score) / 2)
    }
}

/// Lifecycle of a search job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    Running,
    /// Reached its depth or proved a mate
    Completed,
    /// Stopped by the user
    Cancelled,
    /// Ran out of nodes or time
    Exhausted,
}

impl SearchStatus {
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(
            self,
            SearchStatus::Completed | SearchStatus::Cancelled | SearchStatus::Exhausted
        )
    }
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchStatus::Idle => "idle",
            SearchStatus::Running => "running",
            SearchStatus::Completed => "completed",
            SearchStatus::Cancelled => "cancelled",
            SearchStatus::Exhausted => "exhausted",
        };
        f.write_str(name)
    }
}

/// Configuration for a search operation.
#[derive(Clone, Debug, Default)]
pub struct SearchConfig {
    /// Maximum depth to search (None = [`MAX_DEPTH`])
    pub max_depth: Option<u32>,
    /// Abort once this many nodes have been visited
    pub node_limit: Option<u64>,
    /// No new iteration starts after this much time
    pub soft_time: Option<Duration>,
    /// Restrict the root to these moves (empty = all)
    pub search_moves: Vec<Move>,
    pub evaluator: Evaluator,
    pub orderer: MoveOrderer,
}

impl SearchConfig {
    /// Create a depth-limited search config
    #[must_use]
    pub fn depth(max_depth: u32) -> Self {
        SearchConfig {
            max_depth: Some(max_depth),
            ..Default::default()
        }
    }

    /// Set node limit
    #[must_use]
    pub fn with_nodes(mut self, node_limit: u64) -> Self {
        self.node_limit = Some(node_limit);
        self
    }

    #[must_use]
    pub fn with_soft_time(mut self, soft_time: Duration) -> Self {
        self.soft_time = Some(soft_time);
        self
    }

    #[must_use]
    pub fn with_search_moves(mut self, moves: Vec<Move>) -> Self {
        self.search_moves = moves;
        self
    }

    #[must_use]
    pub fn with_evaluator(mut self, evaluator: Evaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    #[must_use]
    pub fn with_orderer(mut self, orderer: MoveOrderer) -> Self {
        self.orderer = orderer;
        self
    }
}

/// Result of a single fixed-depth search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub score: i32,
    pub pv: Vec<Move>,
    pub nodes: u64,
}

/// Information about a completed search iteration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchIterationInfo {
    pub depth: u32,
    pub nodes: u64,
    pub nps: u64,
    pub time_ms: u64,
    pub score: i32,
    pub mate_in: Option<i32>,
    pub pv: Vec<Move>,
}

/// Final answer of an iterative-deepening run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    /// `None` only when the root has no legal moves
    pub best_move: Option<Move>,
    pub score: i32,
    /// Deepest fully completed iteration
    pub depth: u32,
    pub nodes: u64,
    pub pv: Vec<Move>,
    pub status: SearchStatus,
}

/// Messages a running search sends back to its owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchEvent {
    Info(SearchIterationInfo),
    BestMove(SearchOutcome),
}

/// Fixed-depth negamax with the default evaluator and move ordering.
///
/// Draws are only scored below the root. The position is restored before
/// returning.
///
/// # Example
/// ```
/// use chess_core::board::{search, Position, INFINITY, MATE};
///
/// let mut pos = Position::from_fen("8/8/8/5K1k/8/8/8/5R2 w - - 0 1").unwrap();
/// let result = search(&mut pos, 1, -INFINITY, INFINITY);
/// assert_eq!(result.score, MATE - 1);
/// assert_eq!(result.pv[0].to_string(), "f1h1");
/// ```
pub fn search(pos: &mut Position, depth: u32, alpha: i32, beta: i32) -> SearchResult {
    let stop = StopFlag::new();
    let config = SearchConfig::default();
    let mut ctx = SearchContext::new(pos, &config, &stop);
    // Without a node limit or a raised flag the search cannot abort
    let (score, pv) = ctx
        .negamax(depth.min(MAX_DEPTH), alpha, beta, 0)
        .unwrap_or((0, Vec::new()));
    SearchResult {
        score,
        pv,
        nodes: ctx.nodes,
    }
}
