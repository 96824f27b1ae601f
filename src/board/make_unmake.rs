use super::{Color, ColoredPiece, Move, Piece, Position, Square, UndoRecord};

/// Rook origin and destination for a castle of `color` on the given side.
#[inline]
pub(crate) const fn castling_rook_squares(color: Color, kingside: bool) -> (Square, Square) {
    let back = color.back_rank() * 8;
    if kingside {
        (Square::from_index_unchecked(back + 7), Square::from_index_unchecked(back + 5))
    } else {
        (Square::from_index_unchecked(back), Square::from_index_unchecked(back + 3))
    }
}

impl Position {
    /// Apply `mv` in place and return what `unmake_move` needs to revert it.
    ///
    /// `mv` must be pseudo-legal in this position; moves from the generator
    /// or from `parse_move` always are.
    pub fn make_move(&mut self, mv: Move) -> UndoRecord {
        let us = self.side_to_move;
        let them = us.opponent();
        let from = mv.from();
        let to = mv.to();
        let keys = self.tables.zobrist();

        let undo = UndoRecord {
            captured: None,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            hash: self.hash,
            pinned: self.board.pinned,
            pinners: self.board.pinners,
            checkers: self.board.checkers,
        };

        let Some(mover) = self.board.piece_at(from).filter(|cp| cp.color == us) else {
            debug_assert!(false, "make_move {mv:?}: no {us} piece on {from}");
            return undo;
        };

        self.history.push(self.hash);

        let mut hash = self.hash ^ keys.black_to_move() ^ keys.castling(self.castling);
        if let Some(ep) = self.en_passant {
            hash ^= keys.en_passant(ep);
        }

        // 1. captured piece; the en passant victim sits beside the origin
        let captured = if mv.is_en_passant() {
            let victim_sq = Square::from_index_unchecked(from.rank() * 8 + to.file());
            Some((ColoredPiece::new(them, Piece::Pawn), victim_sq))
        } else {
            self.board
                .piece_at(to)
                .filter(|cp| cp.color == them)
                .map(|cp| (cp, to))
        };
        if let Some((victim, sq)) = captured {
            self.board.toggle(victim, sq);
            hash ^= keys.piece(victim, sq);
        }

        // 2. the piece itself, replaced by the promotion piece if any
        let placed = mv
            .promotion()
            .map_or(mover, |piece| ColoredPiece::new(us, piece));
        self.board.toggle(mover, from);
        self.board.toggle(placed, to);
        hash ^= keys.piece(mover, from) ^ keys.piece(placed, to);

        // 3. castling rook
        if mv.is_castling() {
            let (rook_from, rook_to) = castling_rook_squares(us, mv.is_castle_kingside());
            let rook = ColoredPiece::new(us, Piece::Rook);
            self.board.toggle(rook, rook_from);
            self.board.toggle(rook, rook_to);
            hash ^= keys.piece(rook, rook_from) ^ keys.piece(rook, rook_to);
        }

        // 4. rights lost by leaving or landing on a home square
        self.castling.erode(from);
        self.castling.erode(to);
        hash ^= keys.castling(self.castling);

        // 5. en passant target after a double push
        self.en_passant = None;
        if mover.piece == Piece::Pawn && from.rank().abs_diff(to.rank()) == 2 {
            let ep = Square::from_index_unchecked((from.index() + to.index()) / 2);
            self.en_passant = Some(ep);
            hash ^= keys.en_passant(ep);
        }

        // 6-7. clocks
        if mover.piece == Piece::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if us == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }

        // 8. hand over the move
        self.side_to_move = them;
        self.hash = hash;
        self.board.recompute_summaries(them, self.tables);

        debug_assert!(self.board.is_consistent(), "inconsistent board after {mv:?}");

        UndoRecord { captured, ..undo }
    }

    /// Revert `mv`, which must be the last move made with `make_move`.
    pub fn unmake_move(&mut self, mv: Move, undo: UndoRecord) {
        let us = self.side_to_move.opponent();
        let from = mv.from();
        let to = mv.to();

        let Some(placed) = self.board.piece_at(to).filter(|cp| cp.color == us) else {
            debug_assert!(false, "unmake_move {mv:?}: no {us} piece on {to}");
            return;
        };
        let mover = if mv.is_promotion() {
            ColoredPiece::new(us, Piece::Pawn)
        } else {
            placed
        };

        self.board.toggle(placed, to);
        self.board.toggle(mover, from);

        if mv.is_castling() {
            let (rook_from, rook_to) = castling_rook_squares(us, mv.is_castle_kingside());
            let rook = ColoredPiece::new(us, Piece::Rook);
            self.board.toggle(rook, rook_to);
            self.board.toggle(rook, rook_from);
        }

        if let Some((victim, sq)) = undo.captured {
            self.board.toggle(victim, sq);
        }

        self.fullmove_number = undo.fullmove_number;
        self.side_to_move = us;
        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.hash = undo.hash;
        self.board.pinned = undo.pinned;
        self.board.pinners = undo.pinners;
        self.board.checkers = undo.checkers;
        self.history.pop();
    }
}
