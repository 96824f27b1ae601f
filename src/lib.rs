//! Core of a UCI chess engine: bitboard move generation, make/unmake,
//! evaluation, alpha-beta search and a threaded UCI front end.

pub mod board;
pub mod engine;
pub mod sync;
pub mod uci;
pub mod zobrist;

pub use board::{Color, Move, Piece, Position, Square};
pub use engine::{EngineConfig, EngineController};
