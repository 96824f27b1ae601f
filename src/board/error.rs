//! Error types for chess board operations.

use thiserror::Error;

/// Error type for FEN parsing failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// FEN string does not have the six required fields
    #[error("FEN must have 6 fields, found {found}")]
    WrongFieldCount { found: usize },
    /// Invalid piece character in position string
    #[error("invalid piece character '{char}' in FEN")]
    InvalidPiece { char: char },
    /// Placement field does not describe exactly eight ranks
    #[error("FEN placement has {found} ranks, expected 8")]
    WrongRankCount { found: usize },
    /// A rank describes more or fewer than eight files
    #[error("rank {rank} describes {files} files, expected 8")]
    BadRankLength { rank: usize, files: usize },
    /// Invalid side to move (must be 'w' or 'b')
    #[error("invalid side to move '{found}', expected 'w' or 'b'")]
    InvalidSideToMove { found: String },
    /// Invalid castling character
    #[error("invalid castling field '{found}'")]
    InvalidCastling { found: String },
    /// Invalid en passant square
    #[error("invalid en passant square '{found}'")]
    InvalidEnPassant { found: String },
    /// Half-move clock or full-move number is not a valid number
    #[error("invalid move counter '{found}'")]
    InvalidCounter { found: String },
    /// Side has no king or more than one king
    #[error("{color} must have exactly one king, found {found}")]
    KingCount { color: &'static str, found: u32 },
    /// The side not to move is in check
    #[error("{color} is in check but it is not their move")]
    OpponentInCheck { color: &'static str },
}

/// Error type for move parsing failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    /// Move string has invalid length (must be 4-5 characters)
    #[error("move must be 4-5 characters, found {len}")]
    InvalidLength { len: usize },
    /// Invalid square notation in move
    #[error("invalid square notation in '{notation}'")]
    InvalidSquare { notation: String },
    /// Invalid promotion piece
    #[error("invalid promotion piece '{char}'")]
    InvalidPromotion { char: char },
    /// Move is not legal in the current position
    #[error("illegal move '{notation}'")]
    IllegalMove { notation: String },
    /// Raw value is not a valid move encoding
    #[error("invalid move encoding {raw:#x}")]
    InvalidEncoding { raw: u32 },
}

/// Error type for square parsing failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    /// Square index out of bounds (must be 0-63)
    #[error("square index {index} out of bounds (must be 0-63)")]
    IndexOutOfBounds { index: usize },
    /// Invalid algebraic notation
    #[error("invalid square notation '{notation}'")]
    InvalidNotation { notation: String },
}
