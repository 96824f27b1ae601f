use super::super::{Bitboard, MoveList, Piece, Position, Square};

/// Type of sliding piece for move generation
#[derive(Clone, Copy)]
pub(crate) enum SliderType {
    Bishop,
    Rook,
    Queen,
}

impl SliderType {
    fn piece(self) -> Piece {
        match self {
            SliderType::Bishop => Piece::Bishop,
            SliderType::Rook => Piece::Rook,
            SliderType::Queen => Piece::Queen,
        }
    }
}

impl Position {
    pub(crate) fn slider_targets(&self, from: Square, slider: SliderType) -> Bitboard {
        let occupied = self.board.occupied;
        match slider {
            SliderType::Bishop => self.tables.bishop_attacks(from, occupied),
            SliderType::Rook => self.tables.rook_attacks(from, occupied),
            SliderType::Queen => self.tables.queen_attacks(from, occupied),
        }
    }

    pub(crate) fn generate_slider_moves(&self, slider: SliderType, moves: &mut MoveList) {
        let own = self.us();
        for from in self.board.pieces(self.side_to_move, slider.piece()) {
            self.push_targets(from, self.slider_targets(from, slider) & !own, moves);
        }
    }
}
