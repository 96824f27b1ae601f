//! Attack tables for move generation.
//!
//! Leaper masks, pawn masks, line masks and `IN_BETWEEN` are built once into a
//! read-only table set. Positions reach it through the [`Tables`] handle.
//!
//! Uses Hyperbola Quintessence for sliding piece attacks (bishop, rook, queen).
//! This is a fast, branch-free algorithm that uses the `o^(o-2r)` trick.

#![allow(clippy::inline_always)] // Performance-critical hot path functions

mod tables;

use std::fmt;

use once_cell::sync::Lazy;

use crate::board::{Bitboard, Color, Square};
use crate::zobrist::ZobristKeys;

pub(crate) struct TableData {
    knight: [Bitboard; 64],
    king: [Bitboard; 64],
    pawn_attacks: [[Bitboard; 64]; 2],
    pawn_pushes: [[Bitboard; 64]; 2],
    // line masks exclude the square itself
    rank: [Bitboard; 64],
    file: [Bitboard; 64],
    diag: [Bitboard; 64],
    anti_diag: [Bitboard; 64],
    in_between: Box<[[Bitboard; 64]; 64]>,
    zobrist: ZobristKeys,
}

impl TableData {
    fn build() -> Self {
        TableData {
            knight: tables::knight_table(),
            king: tables::king_table(),
            pawn_attacks: tables::pawn_attack_table(),
            pawn_pushes: tables::pawn_push_table(),
            rank: tables::rank_table(),
            file: tables::file_table(),
            diag: tables::diag_table(),
            anti_diag: tables::anti_diag_table(),
            in_between: tables::in_between_table(),
            zobrist: ZobristKeys::new(),
        }
    }
}

static TABLES: Lazy<TableData> = Lazy::new(|| {
    log::debug!("building attack tables");
    TableData::build()
});

/// Cheap handle to the shared, read-only table set.
///
/// Two handles are equal when they refer to the same table set.
#[derive(Clone, Copy)]
pub struct Tables(&'static TableData);

impl Tables {
    /// Handle to the process-wide table set, building it on first use.
    #[must_use]
    pub fn get() -> Self {
        Tables(&TABLES)
    }

    #[inline(always)]
    #[must_use]
    pub fn knight_attacks(self, sq: Square) -> Bitboard {
        self.0.knight[sq.index()]
    }

    #[inline(always)]
    #[must_use]
    pub fn king_attacks(self, sq: Square) -> Bitboard {
        self.0.king[sq.index()]
    }

    /// Squares a pawn of `color` on `sq` attacks
    #[inline(always)]
    #[must_use]
    pub fn pawn_attacks(self, color: Color, sq: Square) -> Bitboard {
        self.0.pawn_attacks[color.index()][sq.index()]
    }

    /// Single-step push target of a pawn of `color` on `sq`
    #[inline(always)]
    #[must_use]
    pub fn pawn_push(self, color: Color, sq: Square) -> Bitboard {
        self.0.pawn_pushes[color.index()][sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn rank_mask(self, sq: Square) -> Bitboard {
        self.0.rank[sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn file_mask(self, sq: Square) -> Bitboard {
        self.0.file[sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn diag_mask(self, sq: Square) -> Bitboard {
        self.0.diag[sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn anti_diag_mask(self, sq: Square) -> Bitboard {
        self.0.anti_diag[sq.index()]
    }

    /// Open segment strictly between `a` and `b`; empty unless they are collinear.
    #[inline(always)]
    #[must_use]
    pub fn in_between(self, a: Square, b: Square) -> Bitboard {
        self.0.in_between[a.index()][b.index()]
    }

    /// Get bishop attacks (diagonals only)
    #[inline]
    #[must_use]
    pub fn bishop_attacks(self, sq: Square, occupied: Bitboard) -> Bitboard {
        hyp_quint(occupied, self.diag_mask(sq), sq) | hyp_quint(occupied, self.anti_diag_mask(sq), sq)
    }

    /// Get rook attacks (ranks and files only)
    #[inline]
    #[must_use]
    pub fn rook_attacks(self, sq: Square, occupied: Bitboard) -> Bitboard {
        hyp_quint(occupied, self.file_mask(sq), sq) | rank_attacks(occupied, self.rank_mask(sq), sq)
    }

    /// Get queen attacks (all 8 directions)
    #[inline]
    #[must_use]
    pub fn queen_attacks(self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.bishop_attacks(sq, occupied) | self.rook_attacks(sq, occupied)
    }

    #[inline]
    #[must_use]
    pub fn zobrist(self) -> &'static ZobristKeys {
        &self.0.zobrist
    }
}

impl PartialEq for Tables {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl Eq for Tables {}

impl Default for Tables {
    fn default() -> Self {
        Tables::get()
    }
}

impl fmt::Debug for Tables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tables({:p})", self.0)
    }
}

/// Hyperbola Quintessence attack calculation for a single line.
/// Uses the o^(o-2r) trick with byteswap for the reverse direction, which is
/// valid for files and both diagonals.
#[inline(always)]
fn hyp_quint(occupied: Bitboard, mask: Bitboard, sq: Square) -> Bitboard {
    let piece_bit = 1u64 << sq.index();
    let forward = occupied.0 & mask.0;
    let backward = forward.swap_bytes();
    let forward_attacks = forward.wrapping_sub(piece_bit.wrapping_mul(2));
    let backward_attacks =
        backward.wrapping_sub(piece_bit.swap_bytes().wrapping_mul(2)).swap_bytes();
    Bitboard((forward_attacks ^ backward_attacks) & mask.0)
}

/// Rank attacks need a full bit reversal, since byteswap leaves a rank in place.
#[inline(always)]
fn rank_attacks(occupied: Bitboard, mask: Bitboard, sq: Square) -> Bitboard {
    let piece_bit = 1u64 << sq.index();
    let forward = occupied.0 & mask.0;
    let backward = forward.reverse_bits();
    let forward_attacks = forward.wrapping_sub(piece_bit.wrapping_mul(2));
    let backward_attacks =
        backward.wrapping_sub(piece_bit.reverse_bits().wrapping_mul(2)).reverse_bits();
    Bitboard((forward_attacks ^ backward_attacks) & mask.0)
}
