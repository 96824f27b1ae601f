mod kings;
mod knights;
mod pawns;
mod sliders;

use sliders::SliderType;

use super::{Bitboard, Move, MoveList, MoveTags, Piece, Position, Square};

impl Position {
    /// Push one move per target square, tagging captures.
    fn push_targets(&self, from: Square, targets: Bitboard, moves: &mut MoveList) {
        let them = self.them();
        for to in targets {
            let mv = Move::new(from, to);
            if them.contains(to) {
                moves.push(mv.with_tags(MoveTags::CAPTURE));
            } else {
                moves.push(mv);
            }
        }
    }

    /// Moves that follow piece-movement rules but may leave the king attacked.
    /// Castles are only emitted when the king does not start in, pass through
    /// or land on an attacked square.
    #[must_use]
    pub fn generate_pseudo_legal(&self) -> MoveList {
        let mut moves = MoveList::new();
        self.generate_pawn_moves(&mut moves);
        self.generate_knight_moves(&mut moves);
        self.generate_slider_moves(SliderType::Bishop, &mut moves);
        self.generate_slider_moves(SliderType::Rook, &mut moves);
        self.generate_slider_moves(SliderType::Queen, &mut moves);
        self.generate_king_moves(&mut moves);
        moves
    }

    /// Legal moves, each tagged with `CHECK` when it attacks the enemy king.
    pub fn generate_legal(&mut self) -> MoveList {
        let pseudo = self.generate_pseudo_legal();
        let mut legal = MoveList::new();
        for &mv in &pseudo {
            if self.is_legal(mv) {
                let tagged = if self.gives_check(mv) {
                    mv.with_tags(MoveTags::CHECK)
                } else {
                    mv
                };
                legal.push(tagged);
            }
        }
        legal
    }

    /// Legality of a pseudo-legal move: the mover's king is not attacked
    /// afterwards.
    pub fn is_legal(&mut self, mv: Move) -> bool {
        let us = self.side_to_move;
        let king = self.board.king_square(us);

        // Not pinned, not the king, not in check: nothing can expose the king.
        // En passant removes a second piece from the board, so it always
        // takes the slow path.
        if !self.in_check()
            && mv.from() != king
            && !self.board.pinned.contains(mv.from())
            && !mv.is_en_passant()
        {
            return true;
        }

        let undo = self.make_move(mv);
        let safe = !self
            .board
            .is_attacked(self.board.king_square(us), us.opponent(), self.tables);
        self.unmake_move(mv, undo);
        safe
    }

    /// Does `mv` leave the opposing king attacked?
    ///
    /// Direct and discovered checks are read off the post-move occupancy;
    /// en passant and castling are tested by making the move.
    pub fn gives_check(&mut self, mv: Move) -> bool {
        if mv.is_en_passant() || mv.is_castling() {
            let undo = self.make_move(mv);
            let check = self.in_check();
            self.unmake_move(mv, undo);
            return check;
        }

        let us = self.side_to_move;
        let tables = self.tables;
        let enemy_king = self.board.king_square(us.opponent());
        let from = mv.from();
        let to = mv.to();
        let from_bb = Bitboard::from_square(from);
        let occupied = (self.board.occupied ^ from_bb) | Bitboard::from_square(to);

        let piece = match (mv.promotion(), self.board.piece_at(from)) {
            (Some(promo), _) => promo,
            (None, Some(cp)) => cp.piece,
            (None, None) => return false,
        };
        let direct = match piece {
            Piece::Pawn => tables.pawn_attacks(us, to),
            Piece::Knight => tables.knight_attacks(to),
            Piece::Bishop => tables.bishop_attacks(to, occupied),
            Piece::Rook => tables.rook_attacks(to, occupied),
            Piece::Queen => tables.queen_attacks(to, occupied),
            Piece::King => Bitboard::EMPTY,
        };
        if direct.contains(enemy_king) {
            return true;
        }

        let queens = self.board.pieces(us, Piece::Queen);
        let rooks = (self.board.pieces(us, Piece::Rook) | queens) & !from_bb;
        let bishops = (self.board.pieces(us, Piece::Bishop) | queens) & !from_bb;
        !(tables.rook_attacks(enemy_king, occupied) & rooks).is_empty()
            || !(tables.bishop_attacks(enemy_king, occupied) & bishops).is_empty()
    }

    pub fn is_checkmate(&mut self) -> bool {
        self.in_check() && self.generate_legal().is_empty()
    }

    pub fn is_stalemate(&mut self) -> bool {
        !self.in_check() && self.generate_legal().is_empty()
    }

    /// Count leaf nodes of the legal move tree to `depth`.
    pub fn perft(&mut self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = self.generate_legal();
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0;
        for &mv in &moves {
            let undo = self.make_move(mv);
            nodes += self.perft(depth - 1);
            self.unmake_move(mv, undo);
        }
        nodes
    }

    /// Leaf counts below each root move, in generation order.
    pub fn perft_divide(&mut self, depth: usize) -> Vec<(Move, u64)> {
        let moves = self.generate_legal();
        let mut counts = Vec::with_capacity(moves.len());
        for &mv in &moves {
            let undo = self.make_move(mv);
            counts.push((mv, self.perft(depth.saturating_sub(1))));
            self.unmake_move(mv, undo);
        }
        counts
    }
}
