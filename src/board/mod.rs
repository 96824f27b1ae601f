//! Chess board representation and game logic.
//!
//! Uses bitboards for move generation and evaluation, and supports the
//! full rules including castling, en passant and promotions.
//!
//! # Example
//! ```
//! use chess_core::board::Position;
//!
//! let mut pos = Position::startpos();
//! let moves = pos.generate_legal();
//! println!("Starting position has {} legal moves", moves.len());
//! ```

mod attack_tables;
mod error;
mod eval;
mod fen;
mod make_unmake;
mod movegen;
mod position;
mod search;
mod state;
mod types;

#[cfg(test)]
mod tests;

// Public API - types users need
pub use attack_tables::Tables;
pub use error::{FenError, MoveParseError, SquareError};
pub use eval::Evaluator;
pub use position::{Position, STARTPOS_FEN};
pub use state::{Board, UndoRecord};
pub use types::{
    Bitboard, BitboardIter, CastlingRights, Color, ColoredPiece, Move, MoveList, MoveTags, Piece,
    Square, MAX_PLY,
};

// Public API - search functions and configuration
pub use search::{
    adjust_mate_distance, is_mate_score, iterative_deepening, mate_in, search, MoveOrderer,
    SearchConfig, SearchEvent, SearchIterationInfo, SearchOutcome, SearchResult, SearchStatus,
    INFINITY, MATE, MAX_DEPTH,
};

pub(crate) use types::PROMOTION_PIECES;
