//! Move ordering.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use crate::board::{Move, MoveTags, Piece};

const QUEEN_PROMOTION: i32 = 800;
const KNIGHT_PROMOTION: i32 = 300;
const UNDER_PROMOTION: i32 = -200;
const CAPTURE: i32 = 100;
const CHECK: i32 = 50;
const KINGSIDE_CASTLE: i32 = 20;
const QUEENSIDE_CASTLE: i32 = 15;
const EN_PASSANT: i32 = 1;

/// How moves are ranked before a node is expanded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MoveOrderer {
    /// Promotions, captures, checks and castles first
    #[default]
    Heuristic,
    /// Generation order
    Natural,
}

impl MoveOrderer {
    pub const ALL: [MoveOrderer; 2] = [MoveOrderer::Heuristic, MoveOrderer::Natural];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            MoveOrderer::Heuristic => "Heuristic",
            MoveOrderer::Natural => "Natural",
        }
    }

    /// Heuristic rank; higher is searched earlier.
    #[must_use]
    pub fn rank(self, mv: Move) -> i32 {
        if self == MoveOrderer::Natural {
            return 0;
        }

        let mut rank = match mv.promotion() {
            Some(Piece::Queen) => QUEEN_PROMOTION,
            Some(Piece::Knight) => KNIGHT_PROMOTION,
            Some(_) => UNDER_PROMOTION,
            None => 0,
        };
        let tags = mv.tags();
        if tags.contains(MoveTags::CAPTURE) {
            rank += CAPTURE;
        }
        if tags.contains(MoveTags::EN_PASSANT) {
            rank += EN_PASSANT;
        }
        if tags.contains(MoveTags::CHECK) {
            rank += CHECK;
        }
        if tags.contains(MoveTags::K_CASTLE) {
            rank += KINGSIDE_CASTLE;
        }
        if tags.contains(MoveTags::Q_CASTLE) {
            rank += QUEENSIDE_CASTLE;
        }
        rank
    }

    /// Sort by descending rank; equal ranks keep their order.
    pub fn order(self, moves: &mut [Move]) {
        if self == MoveOrderer::Natural {
            return;
        }
        moves.sort_by_key(|&mv| Reverse(self.rank(mv)));
    }
}

impl fmt::Display for MoveOrderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MoveOrderer {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MoveOrderer::ALL
            .into_iter()
            .find(|o| o.name().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;

    #[test]
    fn test_promotion_ranks() {
        let orderer = MoveOrderer::Heuristic;
        let base = Move::new("a7".parse().unwrap(), "a8".parse().unwrap());
        let queen = orderer.rank(base.with_promotion(Piece::Queen));
        let knight = orderer.rank(base.with_promotion(Piece::Knight));
        let rook = orderer.rank(base.with_promotion(Piece::Rook));
        assert!(queen > knight);
        assert!(knight > orderer.rank(base));
        assert!(rook < 0);
    }

    #[test]
    fn test_tag_ranks() {
        let orderer = MoveOrderer::Heuristic;
        let quiet = Move::new("e1".parse().unwrap(), "g1".parse().unwrap());
        let k_castle = orderer.rank(quiet.with_tags(MoveTags::K_CASTLE));
        let q_castle = orderer.rank(quiet.with_tags(MoveTags::Q_CASTLE));
        let check = orderer.rank(quiet.with_tags(MoveTags::CHECK));
        let capture = orderer.rank(quiet.with_tags(MoveTags::CAPTURE));
        let ep = orderer.rank(quiet.with_tags(MoveTags::CAPTURE | MoveTags::EN_PASSANT));
        assert!(capture > check);
        assert!(check > k_castle);
        assert!(k_castle > q_castle);
        assert!(q_castle > orderer.rank(quiet));
        assert_eq!(ep, capture + 1);
    }

    #[test]
    fn test_order_is_stable_and_descending() {
        let mut pos = Position::from_fen("4k3/1P6/8/3p4/4P3/8/8/R3K3 w Q - 0 1").unwrap();
        let mut moves = pos.generate_legal();
        let before: Vec<Move> = moves.to_vec();
        MoveOrderer::Heuristic.order(&mut moves);

        assert_eq!(moves[0].to_string(), "b7b8q");
        let ranks: Vec<i32> = moves.iter().map(|&m| MoveOrderer::Heuristic.rank(m)).collect();
        assert!(ranks.windows(2).all(|w| w[0] >= w[1]));

        // quiet moves keep generation order
        let quiet_before: Vec<Move> = before.iter().copied().filter(|&m| MoveOrderer::Heuristic.rank(m) == 0).collect();
        let quiet_after: Vec<Move> = moves.iter().copied().filter(|&m| MoveOrderer::Heuristic.rank(m) == 0).collect();
        assert_eq!(quiet_before, quiet_after);
    }

    #[test]
    fn test_natural_order_leaves_moves_alone() {
        let mut pos = Position::startpos();
        let mut moves = pos.generate_legal();
        let before: Vec<Move> = moves.to_vec();
        MoveOrderer::Natural.order(&mut moves);
        assert_eq!(before, moves.to_vec());
    }
}
