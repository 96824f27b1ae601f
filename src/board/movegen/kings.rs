use super::super::{Color, Move, MoveList, MoveTags, Position, Square};

impl Position {
    pub(crate) fn generate_king_moves(&self, moves: &mut MoveList) {
        let us = self.side_to_move;
        let from = self.board.king_square(us);
        self.push_targets(from, self.tables.king_attacks(from) & !self.us(), moves);

        let back = us.back_rank() * 8;
        let sq = |file: usize| Square::from_index_unchecked(back + file);
        if from != sq(4) {
            return;
        }

        // Empty path between king and rook; start, transit and target not attacked
        if self.castling.has(us, true)
            && self.is_castle_path_clear(&[sq(5), sq(6)])
            && self.is_castle_path_safe(&[sq(4), sq(5), sq(6)])
        {
            moves.push(Move::new(from, sq(6)).with_tags(MoveTags::K_CASTLE));
        }
        if self.castling.has(us, false)
            && self.is_castle_path_clear(&[sq(1), sq(2), sq(3)])
            && self.is_castle_path_safe(&[sq(4), sq(3), sq(2)])
        {
            moves.push(Move::new(from, sq(2)).with_tags(MoveTags::Q_CASTLE));
        }
    }

    fn is_castle_path_clear(&self, squares: &[Square]) -> bool {
        squares.iter().all(|&sq| !self.board.occupied.contains(sq))
    }

    fn is_castle_path_safe(&self, squares: &[Square]) -> bool {
        let them = self.side_to_move.opponent();
        squares
            .iter()
            .all(|&sq| !self.board.is_attacked(sq, them, self.tables))
    }

    /// Is `sq` attacked by any piece of `attacker`?
    #[must_use]
    pub fn is_square_attacked(&self, sq: Square, attacker: Color) -> bool {
        self.board.is_attacked(sq, attacker, self.tables)
    }
}
