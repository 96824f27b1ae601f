//! Full game position: placement plus side to move, castling, en passant and
//! move counters, with an incrementally maintained Zobrist hash.

use super::{Bitboard, Board, CastlingRights, Color, ColoredPiece, Piece, Square, Tables};

pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Clone, Debug)]
pub struct Position {
    pub(crate) board: Board,
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) hash: u64,
    // Hashes of every earlier position in the game, oldest first
    pub(crate) history: Vec<u64>,
    pub(crate) tables: Tables,
}

impl Position {
    /// The standard starting position.
    #[must_use]
    pub fn startpos() -> Self {
        Self::startpos_with(Tables::get())
    }

    #[must_use]
    pub fn startpos_with(tables: Tables) -> Self {
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        let mut board = Board::empty();
        for (file, piece) in back_rank.into_iter().enumerate() {
            for color in Color::BOTH {
                let home = Square::from_index_unchecked(color.back_rank() * 8 + file);
                let pawn = Square::from_index_unchecked(color.pawn_start_rank() * 8 + file);
                board.toggle(ColoredPiece::new(color, piece), home);
                board.toggle(ColoredPiece::new(color, Piece::Pawn), pawn);
            }
        }
        Position::from_parts(board, Color::White, CastlingRights::all(), None, 0, 1, tables)
    }

    /// Assemble a position and derive its summaries and hash.
    pub(crate) fn from_parts(
        board: Board,
        side_to_move: Color,
        castling: CastlingRights,
        en_passant: Option<Square>,
        halfmove_clock: u32,
        fullmove_number: u32,
        tables: Tables,
    ) -> Self {
        let mut pos = Position {
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
            hash: 0,
            history: Vec::new(),
            tables,
        };
        pos.board.recompute_summaries(side_to_move, tables);
        pos.hash = pos.compute_hash();
        pos
    }

    #[inline]
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    #[must_use]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[inline]
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline]
    #[must_use]
    pub fn tables(&self) -> Tables {
        self.tables
    }

    #[inline]
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<ColoredPiece> {
        self.board.piece_at(sq)
    }

    /// Is the side to move in check?
    #[inline]
    #[must_use]
    pub fn in_check(&self) -> bool {
        !self.board.checkers.is_empty()
    }

    /// Hash from scratch; make/unmake keep `hash()` equal to this.
    #[must_use]
    pub fn compute_hash(&self) -> u64 {
        let keys = self.tables.zobrist();
        let mut hash = 0;
        for color in Color::BOTH {
            for piece in Piece::ALL {
                let cp = ColoredPiece::new(color, piece);
                for sq in self.board.bb_of(cp) {
                    hash ^= keys.piece(cp, sq);
                }
            }
        }
        if self.side_to_move == Color::Black {
            hash ^= keys.black_to_move();
        }
        hash ^= keys.castling(self.castling);
        if let Some(ep) = self.en_passant {
            hash ^= keys.en_passant(ep);
        }
        hash
    }

    /// The current position occurred before with the same side to move and
    /// no irreversible move in between.
    #[must_use]
    pub fn is_repetition(&self) -> bool {
        self.history
            .iter()
            .rev()
            .take(self.halfmove_clock as usize)
            .skip(1)
            .step_by(2)
            .any(|&h| h == self.hash)
    }

    #[must_use]
    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    #[must_use]
    pub fn is_insufficient_material(&self) -> bool {
        self.board.is_insufficient_material()
    }

    /// Any draw the search recognises without looking at legal moves.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.is_fifty_move_draw() || self.is_insufficient_material() || self.is_repetition()
    }

    /// Number of earlier positions recorded for repetition detection
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Pieces of the side to move
    #[inline]
    #[must_use]
    pub fn us(&self) -> Bitboard {
        self.board.bb_of_color(self.side_to_move)
    }

    /// Pieces of the side not to move
    #[inline]
    #[must_use]
    pub fn them(&self) -> Bitboard {
        self.board.bb_of_color(self.side_to_move.opponent())
    }
}

/// Equality over the game state; repetition history is not compared.
impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
            && self.side_to_move == other.side_to_move
            && self.castling == other.castling
            && self.en_passant == other.en_passant
            && self.halfmove_clock == other.halfmove_clock
            && self.fullmove_number == other.fullmove_number
            && self.hash == other.hash
            && self.tables == other.tables
    }
}

impl Eq for Position {}

impl Default for Position {
    fn default() -> Self {
        Position::startpos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startpos_matches_fen() {
        let pos = Position::startpos();
        let parsed = Position::from_fen(STARTPOS_FEN).unwrap();
        assert_eq!(pos, parsed);
        assert!(pos.board().is_consistent());
        assert!(!pos.in_check());
        assert_eq!(pos.board().bb_occupied().popcount(), 32);
    }

    #[test]
    fn test_hash_distinguishes_side_to_move() {
        let white = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let black = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        assert_ne!(white.hash(), black.hash());
        assert_eq!(white.hash(), white.compute_hash());
    }

    #[test]
    fn test_insufficient_material_cases() {
        let drawn = [
            "4k3/8/8/8/8/8/8/4K3 w - - 0 1",
            "4k3/8/8/8/8/8/8/4KB2 w - - 0 1",
            "4k3/8/8/8/8/8/8/4KN2 w - - 0 1",
            // bishops on c1 and f8 are both dark squares
            "4kb2/8/8/8/8/8/8/2B1K3 w - - 0 1",
        ];
        for fen in drawn {
            assert!(Position::from_fen(fen).unwrap().is_insufficient_material(), "{fen}");
        }
        let live = [
            "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1",
            "4k3/8/8/8/8/8/8/3RK3 w - - 0 1",
            // opposite-coloured bishops
            "4k3/8/8/8/8/8/8/2B1KB2 w - - 0 1",
            "4kn2/8/8/8/8/8/8/4KN2 w - - 0 1",
        ];
        for fen in live {
            assert!(!Position::from_fen(fen).unwrap().is_insufficient_material(), "{fen}");
        }
    }

    #[test]
    fn test_fifty_move_rule() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 100 80").unwrap();
        assert!(pos.is_fifty_move_draw());
        assert!(pos.is_draw());
    }
}
