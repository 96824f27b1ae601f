use super::{Bitboard, CastlingRights, Color, ColoredPiece, Piece, Square, Tables};

/// Piece placement plus the derived pin and check summaries.
///
/// The twelve piece boards are pairwise disjoint; the colour aggregates and
/// the occupancy are kept in step with them by the incremental updaters.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Board {
    pub(crate) pieces: [Bitboard; 12],
    pub(crate) colors: [Bitboard; 2],
    pub(crate) occupied: Bitboard,
    // Derived after every make, always from the side to move's view
    pub(crate) pinned: Bitboard,
    pub(crate) pinners: Bitboard,
    pub(crate) checkers: Bitboard,
}

/// Everything `unmake` needs beyond the move itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UndoRecord {
    pub(crate) captured: Option<(ColoredPiece, Square)>,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) hash: u64,
    pub(crate) pinned: Bitboard,
    pub(crate) pinners: Bitboard,
    pub(crate) checkers: Bitboard,
}

impl Board {
    #[must_use]
    pub fn empty() -> Self {
        Board::default()
    }

    /// The piece on `sq`, if any
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<ColoredPiece> {
        if !self.occupied.contains(sq) {
            return None;
        }
        let color = if self.colors[Color::White.index()].contains(sq) {
            Color::White
        } else {
            Color::Black
        };
        Piece::ALL
            .into_iter()
            .map(|piece| ColoredPiece::new(color, piece))
            .find(|cp| self.pieces[cp.index()].contains(sq))
    }

    #[inline]
    #[must_use]
    pub fn bb_of(&self, piece: ColoredPiece) -> Bitboard {
        self.pieces[piece.index()]
    }

    /// Shorthand for `bb_of(ColoredPiece::new(color, piece))`
    #[inline]
    #[must_use]
    pub fn pieces(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces[ColoredPiece::new(color, piece).index()]
    }

    #[inline]
    #[must_use]
    pub fn bb_of_color(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn bb_occupied(&self) -> Bitboard {
        self.occupied
    }

    /// Toggle `bb` on the piece board only.
    #[inline]
    pub fn xor_piece(&mut self, piece: ColoredPiece, bb: Bitboard) {
        self.pieces[piece.index()] ^= bb;
    }

    /// Toggle `bb` on the colour aggregate and the occupancy.
    #[inline]
    pub fn xor_color(&mut self, color: Color, bb: Bitboard) {
        self.colors[color.index()] ^= bb;
        self.occupied ^= bb;
    }

    /// Add or remove `piece` on `sq`, keeping every aggregate in step.
    #[inline]
    pub(crate) fn toggle(&mut self, piece: ColoredPiece, sq: Square) {
        let bb = Bitboard::from_square(sq);
        self.xor_piece(piece, bb);
        self.xor_color(piece.color, bb);
    }

    #[inline]
    #[must_use]
    pub fn pinned(&self) -> Bitboard {
        self.pinned
    }

    #[inline]
    #[must_use]
    pub fn pinners(&self) -> Bitboard {
        self.pinners
    }

    #[inline]
    #[must_use]
    pub fn checkers(&self) -> Bitboard {
        self.checkers
    }

    /// Square of `color`'s king.
    ///
    /// # Panics
    /// Panics if `color` has no king; FEN parsing guarantees one.
    #[inline]
    #[must_use]
    pub fn king_square(&self, color: Color) -> Square {
        let kings = self.pieces(color, Piece::King);
        assert!(!kings.is_empty(), "{color} has no king");
        Square::from_index_unchecked(kings.0.trailing_zeros() as usize)
    }

    /// Pieces of both colours attacking `sq` under the given occupancy.
    #[must_use]
    pub fn attackers_to(&self, sq: Square, occupied: Bitboard, tables: Tables) -> Bitboard {
        let bishops_queens = self.pieces(Color::White, Piece::Bishop)
            | self.pieces(Color::Black, Piece::Bishop)
            | self.pieces(Color::White, Piece::Queen)
            | self.pieces(Color::Black, Piece::Queen);
        let rooks_queens = self.pieces(Color::White, Piece::Rook)
            | self.pieces(Color::Black, Piece::Rook)
            | self.pieces(Color::White, Piece::Queen)
            | self.pieces(Color::Black, Piece::Queen);

        (tables.pawn_attacks(Color::White, sq) & self.pieces(Color::Black, Piece::Pawn))
            | (tables.pawn_attacks(Color::Black, sq) & self.pieces(Color::White, Piece::Pawn))
            | (tables.knight_attacks(sq)
                & (self.pieces(Color::White, Piece::Knight) | self.pieces(Color::Black, Piece::Knight)))
            | (tables.king_attacks(sq)
                & (self.pieces(Color::White, Piece::King) | self.pieces(Color::Black, Piece::King)))
            | (tables.bishop_attacks(sq, occupied) & bishops_queens)
            | (tables.rook_attacks(sq, occupied) & rooks_queens)
    }

    /// Is `sq` attacked by any piece of `by`?
    #[inline]
    #[must_use]
    pub fn is_attacked(&self, sq: Square, by: Color, tables: Tables) -> bool {
        !(self.attackers_to(sq, self.occupied, tables) & self.bb_of_color(by)).is_empty()
    }

    /// Recompute pinned, pinners and checkers for the side `us`.
    pub fn recompute_summaries(&mut self, us: Color, tables: Tables) {
        let them = us.opponent();
        let king = self.king_square(us);

        self.checkers = self.attackers_to(king, self.occupied, tables) & self.bb_of_color(them);

        // Enemy sliders that would see the king on an empty board
        let snipers = (tables.rook_attacks(king, Bitboard::EMPTY)
            & (self.pieces(them, Piece::Rook) | self.pieces(them, Piece::Queen)))
            | (tables.bishop_attacks(king, Bitboard::EMPTY)
                & (self.pieces(them, Piece::Bishop) | self.pieces(them, Piece::Queen)));

        let own = self.bb_of_color(us);
        let mut pinned = Bitboard::EMPTY;
        let mut pinners = Bitboard::EMPTY;
        for sniper in snipers {
            let blockers = tables.in_between(king, sniper) & self.occupied;
            if blockers.popcount() == 1 && !(blockers & own).is_empty() {
                pinned |= blockers;
                pinners |= Bitboard::from_square(sniper);
            }
        }
        self.pinned = pinned;
        self.pinners = pinners;
    }

    /// No pawns, rooks or queens, and at most one minor piece, or only
    /// bishops that all stand on squares of one colour.
    #[must_use]
    pub fn is_insufficient_material(&self) -> bool {
        let heavy_or_pawn = [Piece::Pawn, Piece::Rook, Piece::Queen]
            .into_iter()
            .any(|p| !(self.pieces(Color::White, p) | self.pieces(Color::Black, p)).is_empty());
        if heavy_or_pawn {
            return false;
        }

        let knights = self.pieces(Color::White, Piece::Knight) | self.pieces(Color::Black, Piece::Knight);
        let bishops = self.pieces(Color::White, Piece::Bishop) | self.pieces(Color::Black, Piece::Bishop);

        let total_minors = knights.popcount() + bishops.popcount();
        if total_minors <= 1 {
            return true;
        }

        knights.is_empty() && bishops_all_same_color(bishops)
    }

    /// Structural invariants: disjoint piece boards, aggregates in step, one
    /// king per side.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let mut union = Bitboard::EMPTY;
        let mut per_color = [Bitboard::EMPTY; 2];
        for color in Color::BOTH {
            for piece in Piece::ALL {
                let bb = self.pieces(color, piece);
                if !(union & bb).is_empty() {
                    return false;
                }
                union |= bb;
                per_color[color.index()] |= bb;
            }
        }
        union == self.occupied
            && per_color == self.colors
            && (self.colors[0] & self.colors[1]).is_empty()
            && self.pieces(Color::White, Piece::King).popcount() == 1
            && self.pieces(Color::Black, Piece::King).popcount() == 1
    }
}

fn bishops_all_same_color(bishops: Bitboard) -> bool {
    (bishops & Bitboard::LIGHT_SQUARES).is_empty() || (bishops & Bitboard::DARK_SQUARES).is_empty()
}
