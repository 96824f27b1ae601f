use super::super::{Move, MoveList, MoveTags, Piece, Position, Square, PROMOTION_PIECES};

impl Position {
    pub(crate) fn generate_pawn_moves(&self, moves: &mut MoveList) {
        let us = self.side_to_move;
        let tables = self.tables;
        let empty = !self.board.occupied;
        let them = self.them();

        for from in self.board.pieces(us, Piece::Pawn) {
            for to in tables.pawn_push(us, from) & empty {
                self.push_pawn_move(from, to, MoveTags::NONE, moves);
                if from.rank() == us.pawn_start_rank() {
                    for double in tables.pawn_push(us, to) & empty {
                        moves.push(Move::new(from, double));
                    }
                }
            }

            let attacks = tables.pawn_attacks(us, from);
            for to in attacks & them {
                self.push_pawn_move(from, to, MoveTags::CAPTURE, moves);
            }

            if let Some(ep) = self.en_passant {
                if attacks.contains(ep) {
                    moves.push(Move::new(from, ep).with_tags(MoveTags::CAPTURE | MoveTags::EN_PASSANT));
                }
            }
        }
    }

    /// Push a pawn move, expanding it into the four promotions on the last rank.
    fn push_pawn_move(&self, from: Square, to: Square, tags: MoveTags, moves: &mut MoveList) {
        let base = Move::new(from, to).with_tags(tags);
        if to.rank() == self.side_to_move.pawn_promotion_rank() {
            for promo in PROMOTION_PIECES {
                moves.push(base.with_promotion(promo));
            }
        } else {
            moves.push(base);
        }
    }
}
