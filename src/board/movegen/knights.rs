use super::super::{MoveList, Piece, Position};

impl Position {
    pub(crate) fn generate_knight_moves(&self, moves: &mut MoveList) {
        let own = self.us();
        for from in self.board.pieces(self.side_to_move, Piece::Knight) {
            self.push_targets(from, self.tables.knight_attacks(from) & !own, moves);
        }
    }
}
