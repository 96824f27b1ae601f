//! Perft counts against published reference values.

use crate::board::{Position, STARTPOS_FEN};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const ROOK_ENDGAME: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
const MIRRORED_PROMOTIONS: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
const DISCOVERED_CHECKS: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

/// `counts[d - 1]` is the leaf count at depth `d`.
fn assert_perft(fen: &str, counts: &[u64]) {
    let mut pos = Position::from_fen(fen).unwrap();
    for (depth, &expected) in (1..).zip(counts) {
        assert_eq!(pos.perft(depth), expected, "{fen} at depth {depth}");
    }
}

#[test]
fn test_perft_start_position() {
    assert_perft(STARTPOS_FEN, &[20, 400, 8902, 197_281, 4_865_609]);
}

#[test]
fn test_perft_kiwipete() {
    assert_perft(KIWIPETE, &[48, 2039, 97_862]);
}

#[test]
fn test_perft_rook_endgame() {
    // Pins along the fifth rank and en passant out of check
    assert_perft(ROOK_ENDGAME, &[14, 191, 2812, 43_238]);
}

#[test]
fn test_perft_promotions_and_castling() {
    assert_perft(MIRRORED_PROMOTIONS, &[6, 264, 9467]);
    assert_perft(DISCOVERED_CHECKS, &[44, 1486, 62_379]);
    assert_perft("n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1", &[24, 496, 9483]);
    assert_perft("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", &[26, 568, 13_744]);
}

#[test]
fn test_perft_middlegame_and_en_passant() {
    assert_perft(
        "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
        &[46, 2079, 89_890],
    );
    assert_perft(
        "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
        &[31, 707, 21_637],
    );
}

#[test]
fn test_perft_leaves_position_untouched() {
    let mut pos = Position::from_fen(KIWIPETE).unwrap();
    let before = pos.clone();
    pos.perft(3);
    assert_eq!(pos, before);
    assert_eq!(pos.to_fen(), KIWIPETE);
    assert_eq!(pos.history_len(), 0);
}

#[test]
fn test_divide_sums_to_perft() {
    let mut pos = Position::from_fen(KIWIPETE).unwrap();
    let divide = pos.perft_divide(2);
    assert_eq!(divide.len(), 48);
    assert_eq!(divide.iter().map(|(_, n)| n).sum::<u64>(), 2039);
}

#[test]
#[ignore = "slow in debug builds"]
fn test_deep_perft() {
    assert_perft(KIWIPETE, &[48, 2039, 97_862, 4_085_603]);
    assert_perft(ROOK_ENDGAME, &[14, 191, 2812, 43_238, 674_624]);
    assert_perft(MIRRORED_PROMOTIONS, &[6, 264, 9467, 422_333]);
    assert_perft(DISCOVERED_CHECKS, &[44, 1486, 62_379, 2_103_487]);
}
