//! Precomputed per-square masks: leaper attacks, pawn pushes, line masks and
//! in-between segments.

use crate::board::{Bitboard, Color};
#[cfg(test)]
use crate::board::Square;

const KNIGHT_DELTAS: [(isize, isize); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

const KING_DELTAS: [(isize, isize); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

fn offset(sq: usize, dr: isize, df: isize) -> Option<usize> {
    let r = (sq / 8) as isize + dr;
    let f = (sq % 8) as isize + df;
    if (0..8).contains(&r) && (0..8).contains(&f) {
        Some((r * 8 + f) as usize)
    } else {
        None
    }
}

fn leaper_table(deltas: &[(isize, isize)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    for (sq, slot) in table.iter_mut().enumerate() {
        for &(dr, df) in deltas {
            if let Some(to) = offset(sq, dr, df) {
                slot.0 |= 1u64 << to;
            }
        }
    }
    table
}

pub(super) fn knight_table() -> [Bitboard; 64] {
    leaper_table(&KNIGHT_DELTAS)
}

pub(super) fn king_table() -> [Bitboard; 64] {
    leaper_table(&KING_DELTAS)
}

/// Squares a pawn of each color attacks from each square.
pub(super) fn pawn_attack_table() -> [[Bitboard; 64]; 2] {
    let mut table = [[Bitboard::EMPTY; 64]; 2];
    for color in Color::BOTH {
        for sq in 0..64 {
            let from = Bitboard(1u64 << sq);
            table[color.index()][sq] = match color {
                Color::White => from.shift_north_east() | from.shift_north_west(),
                Color::Black => from.shift_south_east() | from.shift_south_west(),
            };
        }
    }
    table
}

/// Single-step push target for a pawn of each color on each square.
pub(super) fn pawn_push_table() -> [[Bitboard; 64]; 2] {
    let mut table = [[Bitboard::EMPTY; 64]; 2];
    for sq in 0..64 {
        let from = Bitboard(1u64 << sq);
        table[Color::White.index()][sq] = from.shift_north();
        table[Color::Black.index()][sq] = from.shift_south();
    }
    table
}

/// Ray mask through each square along one line, excluding the square itself.
fn line_table(dr: isize, df: isize) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    for (sq, slot) in table.iter_mut().enumerate() {
        for sign in [1, -1] {
            let mut step = 1;
            while let Some(to) = offset(sq, dr * sign * step, df * sign * step) {
                slot.0 |= 1u64 << to;
                step += 1;
            }
        }
    }
    table
}

pub(super) fn rank_table() -> [Bitboard; 64] {
    line_table(0, 1)
}

pub(super) fn file_table() -> [Bitboard; 64] {
    line_table(1, 0)
}

/// a1-h8 direction
pub(super) fn diag_table() -> [Bitboard; 64] {
    line_table(1, 1)
}

/// h1-a8 direction
pub(super) fn anti_diag_table() -> [Bitboard; 64] {
    line_table(1, -1)
}

/// `IN_BETWEEN[a][b]`: the open segment between two collinear squares, empty
/// when they do not share a rank, file or diagonal.
pub(super) fn in_between_table() -> Box<[[Bitboard; 64]; 64]> {
    let mut table = Box::new([[Bitboard::EMPTY; 64]; 64]);
    for from in 0..64 {
        for &(dr, df) in &KING_DELTAS {
            let mut between = Bitboard::EMPTY;
            let mut step = 1;
            while let Some(to) = offset(from, dr * step, df * step) {
                table[from][to] = between;
                between.0 |= 1u64 << to;
                step += 1;
            }
        }
    }
    table
}

/// Squares strictly between `a` and `b`, walked one step at a time.
#[cfg(test)]
pub(super) fn walk_between(a: Square, b: Square) -> Bitboard {
    let dr = (b.rank() as isize - a.rank() as isize).signum();
    let df = (b.file() as isize - a.file() as isize).signum();
    let rank_gap = (b.rank() as isize - a.rank() as isize).abs();
    let file_gap = (b.file() as isize - a.file() as isize).abs();
    let collinear = rank_gap == 0 || file_gap == 0 || rank_gap == file_gap;
    if a == b || !collinear {
        return Bitboard::EMPTY;
    }
    let mut between = Bitboard::EMPTY;
    let mut sq = a.index();
    loop {
        match offset(sq, dr, df) {
            Some(next) if next != b.index() => {
                between.0 |= 1u64 << next;
                sq = next;
            }
            _ => break,
        }
    }
    between
}
