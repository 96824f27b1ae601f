//! Core chess types.
//!
//! This module contains the fundamental value types used throughout the engine:
//! - `Piece`, `Color` and `ColoredPiece` - piece kinds, colors, packed 0..11 index
//! - `Square` - board square as an index 0..63
//! - `Bitboard` - 64-bit square set
//! - `Move`, `MoveTags` and `MoveList` - move representation
//! - `CastlingRights` - castling state

mod bitboard;
mod castling;
mod moves;
mod piece;
mod square;

pub use bitboard::{Bitboard, BitboardIter};
pub use castling::CastlingRights;
pub use moves::{Move, MoveList, MoveTags, MAX_PLY};
pub use piece::{Color, ColoredPiece, Piece};
pub use square::Square;

pub(crate) use piece::PROMOTION_PIECES;
