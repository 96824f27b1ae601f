use std::fmt;
use std::str::FromStr;

use super::error::{FenError, MoveParseError};
use super::{Board, CastlingRights, Color, ColoredPiece, Move, Piece, Position, Square, Tables};

impl Position {
    /// Parse a position from FEN notation.
    ///
    /// Returns an error if the FEN string is invalid.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Self::from_fen_with(fen, Tables::get())
    }

    /// Parse a position from FEN notation, attaching the given tables handle.
    pub fn from_fen_with(fen: &str, tables: Tables) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() != 6 {
            return Err(FenError::WrongFieldCount { found: parts.len() });
        }

        let board = parse_placement(parts[0])?;

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        let them = side_to_move.opponent();
        if board.is_attacked(board.king_square(them), side_to_move, tables) {
            return Err(FenError::OpponentInCheck {
                color: color_name(them),
            });
        }

        let castling = parse_castling(parts[2], &board)?;
        let en_passant = parse_en_passant(parts[3], side_to_move, &board)?;

        let halfmove_clock = parse_counter(parts[4])?;
        // Some writers emit 0 here; the count starts at 1
        let fullmove_number = parse_counter(parts[5])?.max(1);

        Ok(Position::from_parts(
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
            tables,
        ))
    }

    /// Convert the position to FEN notation.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut rows: Vec<String> = Vec::with_capacity(8);
        for rank in (0..8).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..8 {
                let sq = Square::from_index_unchecked(rank * 8 + file);
                if let Some(piece) = self.board.piece_at(sq) {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(piece.to_fen_char());
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let active = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };
        let ep = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} {} {}",
            rows.join("/"),
            active,
            self.castling,
            ep,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Parse a move in UCI long algebraic notation (e.g., "e2e4", "e7e8q").
    ///
    /// Returns the matching legal move, tags included, or an error describing
    /// why parsing failed.
    ///
    /// # Example
    /// ```
    /// use chess_core::board::Position;
    ///
    /// let mut pos = Position::startpos();
    /// let mv = pos.parse_move("e2e4").unwrap();
    /// assert_eq!(mv.to_string(), "e2e4");
    /// ```
    pub fn parse_move(&mut self, uci: &str) -> Result<Move, MoveParseError> {
        if !(4..=5).contains(&uci.len()) || !uci.is_ascii() {
            return Err(MoveParseError::InvalidLength { len: uci.len() });
        }

        let invalid_square = || MoveParseError::InvalidSquare {
            notation: uci.to_string(),
        };
        let from: Square = uci[0..2].parse().map_err(|_| invalid_square())?;
        let to: Square = uci[2..4].parse().map_err(|_| invalid_square())?;

        let mut candidate = Move::new(from, to);
        if let Some(c) = uci[4..].chars().next() {
            let piece = Piece::from_char(c)
                .filter(|p| !matches!(p, Piece::Pawn | Piece::King))
                .filter(|_| c.is_ascii_lowercase())
                .ok_or(MoveParseError::InvalidPromotion { char: c })?;
            candidate = candidate.with_promotion(piece);
        }

        self.generate_legal()
            .iter()
            .copied()
            .find(|mv| mv.same_squares(candidate))
            .ok_or_else(|| MoveParseError::IllegalMove {
                notation: uci.to_string(),
            })
    }

    /// Parse a UCI move and make it on the position in one call.
    ///
    /// This is a convenience method combining `parse_move` and `make_move`;
    /// the undo record is discarded.
    pub fn make_move_uci(&mut self, uci: &str) -> Result<Move, MoveParseError> {
        let mv = self.parse_move(uci)?;
        self.make_move(mv);
        Ok(mv)
    }
}

fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "white",
        Color::Black => "black",
    }
}

fn parse_placement(field: &str) -> Result<Board, FenError> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::WrongRankCount { found: ranks.len() });
    }

    let mut board = Board::empty();
    for (rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - rank_idx;
        let mut file = 0;
        for c in rank_str.chars() {
            if let Some(run) = c.to_digit(10) {
                if !(1..=8).contains(&run) {
                    return Err(FenError::InvalidPiece { char: c });
                }
                file += run as usize;
            } else {
                let piece = ColoredPiece::from_fen_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                if file < 8 {
                    board.toggle(piece, Square::from_index_unchecked(rank * 8 + file));
                }
                file += 1;
            }
            if file > 8 {
                return Err(FenError::BadRankLength {
                    rank: rank + 1,
                    files: file,
                });
            }
        }
        if file != 8 {
            return Err(FenError::BadRankLength {
                rank: rank + 1,
                files: file,
            });
        }
    }

    for color in [Color::White, Color::Black] {
        let found = board.pieces(color, Piece::King).popcount();
        if found != 1 {
            return Err(FenError::KingCount {
                color: color_name(color),
                found,
            });
        }
    }

    Ok(board)
}

fn parse_castling(field: &str, board: &Board) -> Result<CastlingRights, FenError> {
    let invalid = || FenError::InvalidCastling {
        found: field.to_string(),
    };

    let mut rights = CastlingRights::none();
    if field == "-" {
        return Ok(rights);
    }

    for c in field.chars() {
        let (color, kingside) = match c {
            'K' => (Color::White, true),
            'Q' => (Color::White, false),
            'k' => (Color::Black, true),
            'q' => (Color::Black, false),
            _ => return Err(invalid()),
        };
        if rights.has(color, kingside) {
            return Err(invalid());
        }

        // A right needs the king and that rook on their home squares
        let back = color.back_rank() * 8;
        let king_home = Square::from_index_unchecked(back + 4);
        let rook_home = Square::from_index_unchecked(back + if kingside { 7 } else { 0 });
        let king_ok = board.piece_at(king_home) == Some(ColoredPiece::new(color, Piece::King));
        let rook_ok = board.piece_at(rook_home) == Some(ColoredPiece::new(color, Piece::Rook));
        if !king_ok || !rook_ok {
            return Err(invalid());
        }

        rights.set(color, kingside);
    }
    Ok(rights)
}

fn parse_en_passant(field: &str, side_to_move: Color, board: &Board) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    let invalid = || FenError::InvalidEnPassant {
        found: field.to_string(),
    };

    let sq: Square = field.parse().map_err(|_| invalid())?;

    // The target sits behind a pawn of the side that just moved
    let (target_rank, pawn_rank) = match side_to_move {
        Color::White => (5, 4),
        Color::Black => (2, 3),
    };
    let pawn_sq = Square::from_index_unchecked(pawn_rank * 8 + sq.file());
    let mover = ColoredPiece::new(side_to_move.opponent(), Piece::Pawn);
    if sq.rank() != target_rank || board.piece_at(pawn_sq) != Some(mover) || board.piece_at(sq).is_some() {
        return Err(invalid());
    }
    Ok(Some(sq))
}

fn parse_counter(field: &str) -> Result<u32, FenError> {
    field.parse().map_err(|_| FenError::InvalidCounter {
        found: field.to_string(),
    })
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}

/// Board diagram, rank 8 first, followed by the FEN
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                let sq = Square::from_index_unchecked(rank * 8 + file);
                let c = self.board.piece_at(sq).map_or('.', ColoredPiece::to_fen_char);
                write!(f, "{c} ")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")?;
        write!(f, "fen: {}", self.to_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::STARTPOS_FEN;

    #[test]
    fn test_fen_round_trip() {
        let fens = [
            STARTPOS_FEN,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 7 42",
        ];
        for fen in fens {
            let pos = Position::from_fen(fen).unwrap();
            assert_eq!(pos.to_fen(), fen);
        }
    }

    #[test]
    fn test_fen_black_to_move() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.side_to_move(), Color::Black);
        assert_eq!(pos.en_passant(), Some("e3".parse().unwrap()));
    }

    #[test]
    fn test_fen_error_wrong_field_count() {
        let result = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w");
        assert!(matches!(result, Err(FenError::WrongFieldCount { found: 2 })));
    }

    #[test]
    fn test_fen_error_invalid_piece() {
        let result = Position::from_fen("rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert!(matches!(result, Err(FenError::InvalidPiece { char: 'x' })));
    }

    #[test]
    fn test_fen_error_rank_shape() {
        let result = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert!(matches!(result, Err(FenError::WrongRankCount { found: 7 })));

        let result = Position::from_fen("rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert!(matches!(result, Err(FenError::BadRankLength { rank: 7, .. })));

        let result = Position::from_fen("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert!(matches!(result, Err(FenError::BadRankLength { rank: 7, files: 7 })));
    }

    #[test]
    fn test_fen_error_invalid_side_to_move() {
        let result = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1");
        assert!(matches!(result, Err(FenError::InvalidSideToMove { .. })));
    }

    #[test]
    fn test_fen_error_invalid_castling() {
        let result = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w XQkq - 0 1");
        assert!(matches!(result, Err(FenError::InvalidCastling { .. })));

        // K without a rook on h1
        let result = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBN1 w K - 0 1");
        assert!(matches!(result, Err(FenError::InvalidCastling { .. })));
    }

    #[test]
    fn test_fen_error_invalid_en_passant() {
        let result = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq z9 0 1");
        assert!(matches!(result, Err(FenError::InvalidEnPassant { .. })));

        // e3 with white to move is on the wrong rank
        let result = Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e3 0 1");
        assert!(matches!(result, Err(FenError::InvalidEnPassant { .. })));
    }

    #[test]
    fn test_fen_error_counters_and_kings() {
        let result = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - x 1");
        assert!(matches!(result, Err(FenError::InvalidCounter { .. })));

        let result = Position::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1");
        assert!(matches!(result, Err(FenError::KingCount { color: "black", found: 0 })));
    }

    #[test]
    fn test_fen_rejects_capturable_king() {
        // Black is in check from the a1 rook with white to move
        let result = Position::from_fen("k7/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert_eq!(result, Err(FenError::OpponentInCheck { color: "black" }));

        // The h1 rook gives check to h8 and the e8 rook to e1
        let result = Position::from_fen("4r2k/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert_eq!(result, Err(FenError::OpponentInCheck { color: "black" }));
        let result = Position::from_fen("4r2k/8/8/8/8/8/8/R3K2R b KQ - 0 1");
        assert_eq!(result, Err(FenError::OpponentInCheck { color: "white" }));

        // Checking the side to move is fine
        assert!(Position::from_fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").is_ok());
    }

    #[test]
    fn test_fen_partial_castling() {
        let pos = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w Kq - 0 1").unwrap();
        let rights = pos.castling_rights();
        assert!(rights.has(Color::White, true));
        assert!(!rights.has(Color::White, false));
        assert!(!rights.has(Color::Black, true));
        assert!(rights.has(Color::Black, false));
    }

    #[test]
    fn test_parse_move_promotion() {
        let mut pos = Position::from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1").unwrap();
        let mv = pos.parse_move("a7a8q").unwrap();
        assert_eq!(mv.promotion(), Some(Piece::Queen));
        assert!(matches!(pos.parse_move("a7a8"), Err(MoveParseError::IllegalMove { .. })));
    }

    #[test]
    fn test_parse_move_errors() {
        let mut pos = Position::startpos();
        assert!(matches!(pos.parse_move("e2"), Err(MoveParseError::InvalidLength { .. })));
        assert!(matches!(pos.parse_move("z9z9"), Err(MoveParseError::InvalidSquare { .. })));
        assert!(matches!(pos.parse_move("e2e5"), Err(MoveParseError::IllegalMove { .. })));
        assert!(matches!(pos.parse_move("e2e4p"), Err(MoveParseError::InvalidPromotion { char: 'p' })));
    }

    #[test]
    fn test_parse_move_carries_tags() {
        let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let mv = pos.parse_move("e1g1").unwrap();
        assert!(mv.is_castle_kingside());
    }

    #[test]
    fn test_make_move_uci_updates_counters() {
        let mut pos = Position::startpos();
        pos.make_move_uci("g1f3").unwrap();
        assert_eq!(pos.side_to_move(), Color::Black);
        assert_eq!(pos.halfmove_clock(), 1);
        assert_eq!(pos.fullmove_number(), 1);
        pos.make_move_uci("g8f6").unwrap();
        assert_eq!(pos.fullmove_number(), 2);
        assert_eq!(pos.to_fen(), "rnbqkb1r/pppppppp/5n2/8/8/5N2/PPPPPPPP/RNBQKB1R w KQkq - 2 2");
    }

    #[test]
    fn test_from_str_trait() {
        let pos: Position = STARTPOS_FEN.parse().unwrap();
        assert_eq!(pos.side_to_move(), Color::White);
    }
}
