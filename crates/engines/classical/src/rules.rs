//! The capabilities search needs from a rules engine.
//!
//! Search never decides legality and never edits a position directly: it
//! asks for the legal moves, then applies and reverts them through
//! `make_move`/`unmake_move`. Anything implementing [`Rules`] can be searched.

use chess_core::{Bitboard, Color, Game, Move, Outcome, PieceKind, RulesError};

pub trait Rules {
    fn side_to_move(&self) -> Color;

    /// Legal moves for the side to move, in a stable order.
    fn legal_moves(&self) -> Vec<Move>;

    /// Legal moves `side` would have if it were its turn.
    fn legal_moves_for(&self, side: Color) -> Vec<Move>;

    fn is_capture(&self, mv: Move) -> bool;

    fn is_promotion(&self, mv: Move) -> bool {
        mv.promo.is_some()
    }

    /// Whether the side to move is in check in the current position.
    fn in_check(&self) -> bool;

    fn make_move(&mut self, mv: Move) -> Result<(), RulesError>;

    /// Reverts the most recent `make_move`.
    fn unmake_move(&mut self) -> Result<Move, RulesError>;

    /// `Some` once the game has ended.
    fn outcome(&self) -> Option<Outcome>;

    fn is_game_over(&self) -> bool {
        self.outcome().is_some()
    }

    fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard;

    fn piece_count(&self, color: Color, kind: PieceKind) -> u32 {
        self.pieces(color, kind).popcount()
    }

    fn king_square(&self, side: Color) -> Option<u8>;

    /// Squares attacked by the piece on `square`.
    fn attacks_from(&self, square: u8) -> Bitboard;

    /// Whether the piece on `square` is pinned to `side`'s king.
    fn is_pinned(&self, side: Color, square: u8) -> bool;

    /// Identity shared by every route to the same position.
    fn position_key(&self) -> u64;
}

impl Rules for Game {
    fn side_to_move(&self) -> Color {
        Game::side_to_move(self)
    }

    fn legal_moves(&self) -> Vec<Move> {
        Game::legal_moves(self)
    }

    fn legal_moves_for(&self, side: Color) -> Vec<Move> {
        Game::legal_moves_for(self, side)
    }

    fn is_capture(&self, mv: Move) -> bool {
        Game::is_capture(self, mv)
    }

    fn in_check(&self) -> bool {
        self.is_check()
    }

    fn make_move(&mut self, mv: Move) -> Result<(), RulesError> {
        self.push(mv)
    }

    fn unmake_move(&mut self) -> Result<Move, RulesError> {
        self.pop()
    }

    fn outcome(&self) -> Option<Outcome> {
        Game::outcome(self)
    }

    fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.position().pieces(color, kind)
    }

    fn king_square(&self, side: Color) -> Option<u8> {
        self.position().king_sq(side)
    }

    fn attacks_from(&self, square: u8) -> Bitboard {
        self.position().attacks_from(square)
    }

    fn is_pinned(&self, side: Color, square: u8) -> bool {
        self.position().is_pinned(side, square)
    }

    fn position_key(&self) -> u64 {
        self.key()
    }
}
