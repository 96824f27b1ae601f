//! Zobrist hashing for chess positions.
//!
//! Provides incrementally-updatable 64-bit position hashes, used by the search
//! to detect repetitions.

use rand::prelude::*;

use crate::board::{CastlingRights, ColoredPiece, Square};

/// Fixed seed so hashes are reproducible across runs.
const ZOBRIST_SEED: u64 = 1_234_567_890;

pub struct ZobristKeys {
    // piece_keys[colored_piece_index][square_index]
    piece_keys: [[u64; 64]; 12],
    black_to_move_key: u64,
    // one key per castling-right bit (WK, WQ, BK, BQ)
    castling_keys: [u64; 4],
    // only the file matters for the en passant target
    en_passant_keys: [u64; 8],
}

impl ZobristKeys {
    pub(crate) fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
        let mut piece_keys = [[0; 64]; 12];
        let mut castling_keys = [0; 4];
        let mut en_passant_keys = [0; 8];

        for piece in &mut piece_keys {
            for key in piece.iter_mut() {
                *key = rng.gen();
            }
        }

        let black_to_move_key = rng.gen();

        for key in &mut castling_keys {
            *key = rng.gen();
        }

        for key in &mut en_passant_keys {
            *key = rng.gen();
        }

        ZobristKeys {
            piece_keys,
            black_to_move_key,
            castling_keys,
            en_passant_keys,
        }
    }

    #[inline]
    #[must_use]
    pub fn piece(&self, piece: ColoredPiece, sq: Square) -> u64 {
        self.piece_keys[piece.index()][sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn black_to_move(&self) -> u64 {
        self.black_to_move_key
    }

    /// Combined key for a full set of castling rights
    #[inline]
    #[must_use]
    pub fn castling(&self, rights: CastlingRights) -> u64 {
        let bits = rights.as_u8();
        let mut hash = 0;
        for (bit, key) in self.castling_keys.iter().enumerate() {
            if bits & (1 << bit) != 0 {
                hash ^= *key;
            }
        }
        hash
    }

    #[inline]
    #[must_use]
    pub fn en_passant(&self, sq: Square) -> u64 {
        self.en_passant_keys[sq.file()]
    }
}
