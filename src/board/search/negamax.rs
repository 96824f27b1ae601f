use super::{adjust_mate_distance, MoveOrderer, SearchConfig, INFINITY, MATE};
use crate::board::{Evaluator, Move, MoveList, Position, MAX_PLY};
use crate::sync::{StopFlag, StopReason};

/// Per-search state shared by every node.
pub(super) struct SearchContext<'a> {
    pub(super) pos: &'a mut Position,
    evaluator: Evaluator,
    orderer: MoveOrderer,
    stop: &'a StopFlag,
    node_limit: Option<u64>,
    pub(super) nodes: u64,
    /// Ordered root moves; the driver moves the last best move to the front
    pub(super) root_moves: MoveList,
}

impl<'a> SearchContext<'a> {
    pub(super) fn new(pos: &'a mut Position, config: &SearchConfig, stop: &'a StopFlag) -> Self {
        let mut root_moves = pos.generate_legal();
        if !config.search_moves.is_empty() {
            let mut filtered = root_moves.clone();
            filtered.retain(|mv| config.search_moves.iter().any(|s| s.same_squares(*mv)));
            if filtered.is_empty() {
                log::warn!("searchmoves matched no legal move, searching all moves");
            } else {
                root_moves = filtered;
            }
        }
        config.orderer.order(&mut root_moves);

        SearchContext {
            pos,
            evaluator: config.evaluator,
            orderer: config.orderer,
            stop,
            node_limit: config.node_limit,
            nodes: 0,
            root_moves,
        }
    }

    /// Check the stop flag and node budget before visiting a node.
    fn should_abort(&self) -> bool {
        if self.stop.is_stopped() {
            return true;
        }
        if self.node_limit.is_some_and(|limit| self.nodes >= limit) {
            self.stop.stop(StopReason::Limit);
            return true;
        }
        false
    }

    fn moves_at(&mut self, ply: usize) -> MoveList {
        if ply == 0 {
            return self.root_moves.clone();
        }
        let mut moves = self.pos.generate_legal();
        self.orderer.order(&mut moves);
        moves
    }

    /// Negamax with alpha-beta pruning.
    ///
    /// Returns `None` when the search was aborted; the position is restored
    /// either way.
    pub(super) fn negamax(
        &mut self,
        depth: u32,
        mut alpha: i32,
        beta: i32,
        ply: usize,
    ) -> Option<(i32, Vec<Move>)> {
        if self.should_abort() {
            return None;
        }
        self.nodes += 1;

        // Mate and stalemate come first: a mate on the hundredth half-move stands
        let moves = self.moves_at(ply);
        if moves.is_empty() {
            let score = if self.pos.in_check() { -MATE } else { 0 };
            return Some((score, Vec::new()));
        }

        if ply > 0 && self.pos.is_draw() {
            return Some((0, Vec::new()));
        }

        if depth == 0 || ply >= MAX_PLY {
            return Some((self.evaluator.evaluate(self.pos), Vec::new()));
        }

        let mut best = -INFINITY;
        let mut pv = Vec::new();
        for &mv in &moves {
            let undo = self.pos.make_move(mv);
            let child = self.negamax(depth - 1, -beta, -alpha, ply + 1);
            self.pos.unmake_move(mv, undo);

            let (child_score, child_pv) = child?;
            let score = -child_score;
            if score > best {
                best = score;
                pv.clear();
                pv.push(mv);
                pv.extend(child_pv);
            }
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }

        Some((adjust_mate_distance(best), pv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(fen: &str, depth: u32, config: &SearchConfig) -> (Option<(i32, Vec<Move>)>, u64) {
        let mut pos = Position::from_fen(fen).unwrap();
        let stop = StopFlag::new();
        let mut ctx = SearchContext::new(&mut pos, config, &stop);
        let result = ctx.negamax(depth, -INFINITY, INFINITY, 0);
        (result, ctx.nodes)
    }

    #[test]
    fn test_checkmated_root_scores_minus_mate() {
        let (result, nodes) = run("8/8/8/5K1k/8/8/8/7R b - - 0 1", 3, &SearchConfig::default());
        let (score, pv) = result.unwrap();
        assert_eq!(score, -MATE);
        assert!(pv.is_empty());
        assert_eq!(nodes, 1);
    }

    #[test]
    fn test_stalemated_root_scores_zero() {
        let (result, _) = run("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", 2, &SearchConfig::default());
        assert_eq!(result.unwrap().0, 0);
    }

    #[test]
    fn test_node_limit_aborts_and_flags() {
        let mut pos = Position::startpos();
        let before = pos.clone();
        let stop = StopFlag::new();
        let config = SearchConfig::default().with_nodes(50);
        let mut ctx = SearchContext::new(&mut pos, &config, &stop);
        assert!(ctx.negamax(4, -INFINITY, INFINITY, 0).is_none());
        assert_eq!(ctx.nodes, 50);
        assert_eq!(stop.reason(), Some(StopReason::Limit));
        assert_eq!(pos, before);
    }

    #[test]
    fn test_raised_flag_aborts_immediately() {
        let mut pos = Position::startpos();
        let stop = StopFlag::new();
        stop.stop(StopReason::User);
        let config = SearchConfig::default();
        let mut ctx = SearchContext::new(&mut pos, &config, &stop);
        assert!(ctx.negamax(3, -INFINITY, INFINITY, 0).is_none());
        assert_eq!(ctx.nodes, 0);
    }

    #[test]
    fn test_search_moves_restrict_root() {
        let mut pos = Position::startpos();
        let only = pos.parse_move("a2a3").unwrap();
        let config = SearchConfig::default().with_search_moves(vec![only]);
        let stop = StopFlag::new();
        let ctx = SearchContext::new(&mut pos, &config, &stop);
        assert_eq!(ctx.root_moves.len(), 1);
        assert!(ctx.root_moves[0].same_squares(only));
    }

    #[test]
    fn test_fifty_move_rule_below_root_is_a_draw() {
        // A rook up, but every move reaches the hundredth quiet half-move
        let (result, _) = run("4k3/8/8/8/8/8/8/R3K3 w - - 99 80", 1, &SearchConfig::default());
        assert_eq!(result.unwrap().0, 0);
    }

    #[test]
    fn test_mate_on_the_hundredth_half_move_beats_the_draw() {
        let (result, _) = run("8/8/8/5K1k/8/8/8/5R2 w - - 99 80", 1, &SearchConfig::default());
        let (score, pv) = result.unwrap();
        assert_eq!(score, MATE - 1);
        assert_eq!(pv[0].to_string(), "f1h1");
    }

    #[test]
    fn test_draws_are_not_scored_at_the_root() {
        let (result, _) = run("4k3/8/8/8/8/8/8/R3K3 w - - 100 80", 0, &SearchConfig::default());
        assert!(result.unwrap().0 > 0);
    }
}
