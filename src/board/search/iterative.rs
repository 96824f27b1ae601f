use std::time::Instant;

use super::{
    mate_in, SearchConfig, SearchContext, SearchIterationInfo, SearchOutcome, SearchStatus,
    INFINITY, MATE, MAX_DEPTH,
};
use crate::board::Position;
use crate::sync::{StopFlag, StopReason};

/// Iterative deepening from depth 1 up to the configured limit.
///
/// `on_info` is called after every completed iteration. An aborted
/// iteration is discarded and the previous one stands. The returned move is
/// always legal unless the root has none.
pub fn iterative_deepening(
    pos: &mut Position,
    config: &SearchConfig,
    stop: &StopFlag,
    mut on_info: impl FnMut(&SearchIterationInfo),
) -> SearchOutcome {
    let start = Instant::now();
    let max_depth = config.max_depth.unwrap_or(MAX_DEPTH).clamp(1, MAX_DEPTH);
    let mut ctx = SearchContext::new(pos, config, stop);

    if ctx.root_moves.is_empty() {
        let score = if ctx.pos.in_check() { -MATE } else { 0 };
        log::debug!("no legal moves at the root, score {score}");
        on_info(&SearchIterationInfo {
            depth: 0,
            nodes: 0,
            nps: 0,
            time_ms: start.elapsed().as_millis() as u64,
            score,
            mate_in: mate_in(score),
            pv: Vec::new(),
        });
        return SearchOutcome {
            best_move: None,
            score,
            depth: 0,
            nodes: 0,
            pv: Vec::new(),
            status: SearchStatus::Completed,
        };
    }

    let mut outcome = SearchOutcome {
        best_move: ctx.root_moves.first().copied(),
        score: 0,
        depth: 0,
        nodes: 0,
        pv: Vec::new(),
        status: SearchStatus::Completed,
    };

    for depth in 1..=max_depth {
        if depth > 1 && config.soft_time.is_some_and(|soft| start.elapsed() >= soft) {
            log::debug!("soft time limit reached before depth {depth}");
            stop.stop(StopReason::Limit);
            break;
        }

        let Some((score, pv)) = ctx.negamax(depth, -INFINITY, INFINITY, 0) else {
            log::debug!("depth {depth} aborted after {} nodes", ctx.nodes);
            break;
        };

        if let Some(&best) = pv.first() {
            ctx.root_moves.promote_to_front(best);
            outcome.best_move = Some(best);
        }
        outcome.score = score;
        outcome.depth = depth;
        outcome.pv = pv;

        // A stop raised after the last node was visited still ends reporting
        if stop.is_stopped() {
            log::debug!("stopped after completing depth {depth}");
            break;
        }

        let elapsed = start.elapsed().as_millis() as u64;
        let nps = if elapsed > 0 { ctx.nodes * 1000 / elapsed } else { 0 };
        on_info(&SearchIterationInfo {
            depth,
            nodes: ctx.nodes,
            nps,
            time_ms: elapsed,
            score,
            mate_in: mate_in(score),
            pv: outcome.pv.clone(),
        });

        // A mate no deeper than the horizon cannot be improved on
        if MATE - score.abs() <= depth as i32 {
            log::debug!("mate proven at depth {depth}");
            break;
        }
    }

    outcome.nodes = ctx.nodes;
    outcome.status = match stop.reason() {
        Some(StopReason::User) => SearchStatus::Cancelled,
        Some(StopReason::Limit) => SearchStatus::Exhausted,
        None => SearchStatus::Completed,
    };
    outcome
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::board::Move;

    fn run(fen: &str, config: &SearchConfig) -> (SearchOutcome, Vec<SearchIterationInfo>) {
        let mut pos = Position::from_fen(fen).unwrap();
        let stop = StopFlag::new();
        let mut infos = Vec::new();
        let outcome = iterative_deepening(&mut pos, config, &stop, |info| infos.push(info.clone()));
        (outcome, infos)
    }

    #[test]
    fn test_reports_every_depth() {
        let (outcome, infos) = run(crate::board::STARTPOS_FEN, &SearchConfig::depth(3));
        assert_eq!(infos.iter().map(|i| i.depth).collect::<Vec<_>>(), [1, 2, 3]);
        assert!(infos.windows(2).all(|w| w[0].nodes <= w[1].nodes));
        assert_eq!(outcome.depth, 3);
        assert_eq!(outcome.status, SearchStatus::Completed);
        assert_eq!(outcome.best_move, outcome.pv.first().copied());
    }

    #[test]
    fn test_stops_early_on_proven_mate() {
        let (outcome, infos) = run("8/8/8/5K1k/8/8/8/5R2 w - - 0 1", &SearchConfig::depth(6));
        assert_eq!(infos.len(), 1);
        assert_eq!(outcome.score, MATE - 1);
        assert_eq!(outcome.status, SearchStatus::Completed);
        assert_eq!(infos[0].mate_in, Some(1));
    }

    #[test]
    fn test_no_legal_moves_reports_depth_zero() {
        let (outcome, infos) = run("8/8/8/5K1k/8/8/8/7R b - - 0 1", &SearchConfig::depth(4));
        assert_eq!(outcome.best_move, None);
        assert_eq!(outcome.score, -MATE);
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].depth, 0);
        assert_eq!(infos[0].mate_in, Some(0));
    }

    #[test]
    fn test_node_limit_still_returns_legal_move() {
        let config = SearchConfig::depth(10).with_nodes(1);
        let mut pos = Position::startpos();
        let stop = StopFlag::new();
        let outcome = iterative_deepening(&mut pos, &config, &stop, |_| {});
        assert_eq!(outcome.status, SearchStatus::Exhausted);
        let best = outcome.best_move.unwrap();
        assert!(pos.generate_legal().iter().any(|m| *m == best));
    }

    #[test]
    fn test_user_stop_reports_cancelled() {
        let mut pos = Position::startpos();
        let stop = StopFlag::new();
        stop.stop(StopReason::User);
        let outcome = iterative_deepening(&mut pos, &SearchConfig::depth(5), &stop, |_| {});
        assert_eq!(outcome.status, SearchStatus::Cancelled);
        assert_eq!(outcome.depth, 0);
        assert!(outcome.best_move.is_some());
    }

    #[test]
    fn test_stop_between_iterations_ends_reporting() {
        let mut pos = Position::startpos();
        let stop = StopFlag::new();
        let mut depths = Vec::new();
        let outcome = iterative_deepening(&mut pos, &SearchConfig::depth(6), &stop, |info| {
            depths.push(info.depth);
            if info.depth == 2 {
                stop.stop(StopReason::User);
            }
        });
        assert_eq!(depths, [1, 2]);
        assert_eq!(outcome.depth, 2);
        assert_eq!(outcome.status, SearchStatus::Cancelled);
    }

    #[test]
    fn test_soft_time_gates_new_iterations() {
        let config = SearchConfig::default().with_soft_time(Duration::ZERO);
        let (outcome, infos) = run(crate::board::STARTPOS_FEN, &config);
        assert_eq!(infos.len(), 1);
        assert_eq!(outcome.depth, 1);
        assert_eq!(outcome.status, SearchStatus::Exhausted);
    }

    #[test]
    fn test_search_moves_pick_the_only_candidate() {
        let mut pos = Position::startpos();
        let only: Move = pos.parse_move("h2h3").unwrap();
        let config = SearchConfig::depth(2).with_search_moves(vec![only]);
        let stop = StopFlag::new();
        let outcome = iterative_deepening(&mut pos, &config, &stop, |_| {});
        assert!(outcome.best_move.unwrap().same_squares(only));
    }
}
