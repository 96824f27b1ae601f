//! Move types and move list.

use std::fmt;
use std::ops::{BitOr, BitOrAssign, Deref, DerefMut};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Piece;
use super::square::Square;
use crate::board::error::MoveParseError;

/// Tag flags carried by a move.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoveTags(u8);

impl MoveTags {
    pub const NONE: MoveTags = MoveTags(0);
    pub const CAPTURE: MoveTags = MoveTags(1 << 0);
    pub const EN_PASSANT: MoveTags = MoveTags(1 << 1);
    pub const K_CASTLE: MoveTags = MoveTags(1 << 2);
    pub const Q_CASTLE: MoveTags = MoveTags(1 << 3);
    pub const CHECK: MoveTags = MoveTags(1 << 4);

    #[inline]
    #[must_use]
    pub const fn contains(self, other: MoveTags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for MoveTags {
    type Output = MoveTags;

    fn bitor(self, rhs: Self) -> Self {
        MoveTags(self.0 | rhs.0)
    }
}

impl BitOrAssign for MoveTags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

const FROM_MASK: u32 = 0x3F;
const TO_SHIFT: u32 = 6;
const PROMO_SHIFT: u32 = 12;
const PROMO_MASK: u32 = 0x7;
const TAG_SHIFT: u32 = 15;

/// Compact move representation, independent of any board.
///
/// Encoding:
/// - bits 0-5:   from square (0-63)
/// - bits 6-11:  to square (0-63)
/// - bits 12-14: promotion piece (0 = none, 1-4 = knight..queen)
/// - bits 15-19: tag flags (capture, en passant, K-castle, Q-castle, check)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "u32", into = "u32")
)]
pub struct Move(u32);

impl Move {
    /// Null move, used for initialization and "no move" output
    pub const NULL: Move = Move(0);

    /// Create a quiet move with no promotion and no tags
    #[inline]
    #[must_use]
    pub const fn new(from: Square, to: Square) -> Self {
        Move(from.index() as u32 | ((to.index() as u32) << TO_SHIFT))
    }

    /// Return a copy with the given promotion piece
    #[inline]
    #[must_use]
    pub const fn with_promotion(self, piece: Piece) -> Self {
        let code = match piece {
            Piece::Knight => 1,
            Piece::Bishop => 2,
            Piece::Rook => 3,
            Piece::Queen => 4,
            Piece::Pawn | Piece::King => 0,
        };
        Move((self.0 & !(PROMO_MASK << PROMO_SHIFT)) | (code << PROMO_SHIFT))
    }

    /// Return a copy with `tags` added
    #[inline]
    #[must_use]
    pub const fn with_tags(self, tags: MoveTags) -> Self {
        Move(self.0 | ((tags.0 as u32) << TAG_SHIFT))
    }

    /// Get the source square
    #[inline]
    #[must_use]
    pub const fn from(self) -> Square {
        Square::from_index_unchecked((self.0 & FROM_MASK) as usize)
    }

    /// Get the destination square
    #[inline]
    #[must_use]
    pub const fn to(self) -> Square {
        Square::from_index_unchecked(((self.0 >> TO_SHIFT) & FROM_MASK) as usize)
    }

    /// Get the promotion piece, if this is a promotion move
    #[inline]
    #[must_use]
    pub const fn promotion(self) -> Option<Piece> {
        match (self.0 >> PROMO_SHIFT) & PROMO_MASK {
            1 => Some(Piece::Knight),
            2 => Some(Piece::Bishop),
            3 => Some(Piece::Rook),
            4 => Some(Piece::Queen),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn tags(self) -> MoveTags {
        MoveTags((self.0 >> TAG_SHIFT) as u8)
    }

    /// Returns true if this move captures a piece (including en passant)
    #[inline]
    #[must_use]
    pub const fn is_capture(self) -> bool {
        self.tags().contains(MoveTags::CAPTURE)
    }

    #[inline]
    #[must_use]
    pub const fn is_en_passant(self) -> bool {
        self.tags().contains(MoveTags::EN_PASSANT)
    }

    /// Returns true if this is kingside castling (O-O)
    #[inline]
    #[must_use]
    pub const fn is_castle_kingside(self) -> bool {
        self.tags().contains(MoveTags::K_CASTLE)
    }

    /// Returns true if this is queenside castling (O-O-O)
    #[inline]
    #[must_use]
    pub const fn is_castle_queenside(self) -> bool {
        self.tags().contains(MoveTags::Q_CASTLE)
    }

    #[inline]
    #[must_use]
    pub const fn is_castling(self) -> bool {
        self.is_castle_kingside() || self.is_castle_queenside()
    }

    #[inline]
    #[must_use]
    pub const fn is_promotion(self) -> bool {
        self.promotion().is_some()
    }

    /// Returns true if the generator found that this move gives check
    #[inline]
    #[must_use]
    pub const fn gives_check(self) -> bool {
        self.tags().contains(MoveTags::CHECK)
    }

    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Same origin, destination and promotion (tags ignored)
    #[inline]
    #[must_use]
    pub const fn same_squares(self, other: Move) -> bool {
        let mask = FROM_MASK | (FROM_MASK << TO_SHIFT) | (PROMO_MASK << PROMO_SHIFT);
        self.0 & mask == other.0 & mask
    }

    /// Get the raw value (for hashing/storage)
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

/// Bits above the tag field must be clear and the promotion code at most 4.
impl TryFrom<u32> for Move {
    type Error = MoveParseError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        if raw >> (TAG_SHIFT + 5) != 0 || (raw >> PROMO_SHIFT) & PROMO_MASK > 4 {
            return Err(MoveParseError::InvalidEncoding { raw });
        }
        Ok(Move(raw))
    }
}

impl From<Move> for u32 {
    fn from(mv: Move) -> u32 {
        mv.0
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}{}", self.from(), self.to())?;
        if let Some(promo) = self.promotion() {
            write!(f, "={}", promo.to_char().to_ascii_uppercase())?;
        }
        if self.is_capture() {
            write!(f, " cap")?;
        }
        if self.is_castling() {
            write!(f, " castle")?;
        }
        if self.is_en_passant() {
            write!(f, " ep")?;
        }
        if self.gives_check() {
            write!(f, " check")?;
        }
        write!(f, ")")
    }
}

/// UCI long algebraic notation (`e2e4`, `e7e8q`, `0000` for the null move)
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "0000");
        }
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(promo) = self.promotion() {
            write!(f, "{}", promo.to_char())?;
        }
        Ok(())
    }
}

pub(crate) const MAX_MOVES: usize = 256;

/// Maximum search depth in plies; also bounds the mate-score band.
pub const MAX_PLY: usize = 128;

/// List of moves with fixed-size backing array.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    #[must_use]
    pub fn new() -> Self {
        MoveList {
            moves: [Move::NULL; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move) {
        debug_assert!(self.len < MAX_MOVES, "move list overflow");
        self.moves[self.len] = mv;
        self.len += 1;
    }

    /// Keep only the moves for which `keep` returns true, preserving order.
    pub fn retain(&mut self, mut keep: impl FnMut(&Move) -> bool) {
        let mut write = 0;
        for read in 0..self.len {
            let mv = self.moves[read];
            if keep(&mv) {
                self.moves[write] = mv;
                write += 1;
            }
        }
        self.len = write;
    }

    /// Move the entry equal to `mv` (by squares and promotion) to the front,
    /// shifting the preceding entries back by one.
    pub fn promote_to_front(&mut self, mv: Move) {
        if let Some(pos) = self.iter().position(|m| m.same_squares(mv)) {
            self.moves[..=pos].rotate_right(1);
        }
    }
}

impl Deref for MoveList {
    type Target = [Move];

    fn deref(&self) -> &[Move] {
        &self.moves[..self.len]
    }
}

impl DerefMut for MoveList {
    fn deref_mut(&mut self) -> &mut [Move] {
        &mut self.moves[..self.len]
    }
}

impl fmt::Debug for MoveList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        MoveList::new()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Move> for MoveList {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        let mut list = MoveList::new();
        for mv in iter {
            list.push(mv);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_raw_move_validation() {
        let mv = Move::new(sq("e7"), sq("e8"))
            .with_promotion(Piece::Queen)
            .with_tags(MoveTags::CAPTURE | MoveTags::CHECK);
        assert_eq!(Move::try_from(mv.as_u32()), Ok(mv));

        assert!(Move::try_from(1 << 20).is_err());
        assert!(Move::try_from(5 << PROMO_SHIFT).is_err());
    }

    #[test]
    fn test_move_fields() {
        let mv = Move::new(sq("e7"), sq("d8"))
            .with_promotion(Piece::Knight)
            .with_tags(MoveTags::CAPTURE | MoveTags::CHECK);
        assert_eq!(mv.from(), sq("e7"));
        assert_eq!(mv.to(), sq("d8"));
        assert_eq!(mv.promotion(), Some(Piece::Knight));
        assert!(mv.is_capture());
        assert!(mv.gives_check());
        assert!(!mv.is_en_passant());
        assert!(!mv.is_castling());
        assert_eq!(mv.to_string(), "e7d8n");
    }

    #[test]
    fn test_same_squares_ignores_tags() {
        let plain = Move::new(sq("e1"), sq("g1"));
        let tagged = plain.with_tags(MoveTags::K_CASTLE);
        assert_ne!(plain, tagged);
        assert!(plain.same_squares(tagged));
        assert!(!plain.same_squares(plain.with_promotion(Piece::Queen)));
    }

    #[test]
    fn test_null_move_display() {
        assert_eq!(Move::NULL.to_string(), "0000");
        assert!(Move::NULL.is_null());
    }

    #[test]
    fn test_move_list_retain_and_promote() {
        let moves: MoveList = ["a2a3", "b2b3", "c2c3", "d2d3"]
            .iter()
            .map(|s| Move::new(sq(&s[0..2]), sq(&s[2..4])))
            .collect();
        let mut list = moves.clone();
        list.promote_to_front(Move::new(sq("c2"), sq("c3")));
        let order: Vec<String> = list.iter().map(ToString::to_string).collect();
        assert_eq!(order, ["c2c3", "a2a3", "b2b3", "d2d3"]);

        list.retain(|m| m.from() != sq("a2"));
        assert_eq!(list.len(), 3);
    }
}
