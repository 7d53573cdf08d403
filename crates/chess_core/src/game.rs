//! A position with its move history.
//!
//! `Game` owns the authoritative state during play and search. Moves are
//! applied with `push` and reverted with `pop`; the key history recorded
//! alongside lets repetition be detected.

use crate::bitboard::Bitboard;
use crate::board::{Position, Undo};
use crate::error::{RulesError, RulesResult};
use crate::movegen::{legal_moves, legal_moves_for, pseudo_legal_moves};
use crate::types::*;

/// How a finished game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoves,
    FivefoldRepetition,
}

#[derive(Clone, Debug)]
pub struct Game {
    pos: Position,
    stack: Vec<(Move, Undo)>,
    /// Keys of every position reached, the current one last
    keys: Vec<u64>,
}

impl Game {
    pub fn new(pos: Position) -> Self {
        let keys = vec![pos.position_hash()];
        Self {
            pos,
            stack: Vec::new(),
            keys,
        }
    }

    pub fn startpos() -> Self {
        Self::new(Position::startpos())
    }

    pub fn from_fen(fen: &str) -> RulesResult<Self> {
        Ok(Self::new(Position::from_fen(fen)?))
    }

    pub fn position(&self) -> &Position {
        &self.pos
    }

    pub fn side_to_move(&self) -> Color {
        self.pos.side_to_move
    }

    /// Number of moves currently pushed.
    pub fn ply(&self) -> usize {
        self.stack.len()
    }

    pub fn key(&self) -> u64 {
        self.keys.last().copied().unwrap_or_else(|| self.pos.position_hash())
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        legal_moves(&self.pos)
    }

    pub fn legal_moves_for(&self, side: Color) -> Vec<Move> {
        legal_moves_for(&self.pos, side)
    }

    /// True if `mv` takes an enemy piece, en passant included.
    pub fn is_capture(&self, mv: Move) -> bool {
        if mv.is_en_passant {
            return true;
        }
        match (self.pos.piece_at(mv.from), self.pos.piece_at(mv.to)) {
            (Some(mover), Some(target)) => mover.color != target.color,
            _ => false,
        }
    }

    /// True if the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.pos.in_check(self.pos.side_to_move)
    }

    pub fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pos.pieces(color, kind)
    }

    /// Applies `mv` for the side to move.
    ///
    /// The move is matched by origin, destination and promotion against the
    /// moves the mover's pieces can make, so castle and en-passant flags
    /// come from the generator. It must not leave the mover's king attacked.
    pub fn push(&mut self, mv: Move) -> RulesResult<()> {
        let mover = self.pos.side_to_move;
        let illegal = || RulesError::IllegalMove {
            mv: mv.to_string(),
        };
        let mv = pseudo_legal_moves(&self.pos)
            .into_iter()
            .find(|m| m.from == mv.from && m.to == mv.to && m.promo == mv.promo)
            .ok_or_else(illegal)?;

        let undo = self.pos.make_move(mv)?;
        if self.pos.in_check(mover) {
            self.pos.unmake_move(mv, undo);
            return Err(illegal());
        }
        self.keys.push(self.pos.position_hash());
        self.stack.push((mv, undo));
        Ok(())
    }

    /// Reverts the most recent `push`, returning the move it applied.
    pub fn pop(&mut self) -> RulesResult<Move> {
        let (mv, undo) = self.stack.pop().ok_or(RulesError::EmptyStack)?;
        self.pos.unmake_move(mv, undo);
        self.keys.pop();
        Ok(mv)
    }

    /// How many times the current position has occurred in this game.
    pub fn repetitions(&self) -> usize {
        let current = self.key();
        self.keys.iter().filter(|&&k| k == current).count()
    }

    /// Automatic game-ending conditions, checked in this order.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.legal_moves().is_empty() {
            return Some(if self.is_check() {
                Outcome::Checkmate {
                    winner: self.pos.side_to_move.other(),
                }
            } else {
                Outcome::Stalemate
            });
        }
        if self.pos.is_insufficient_material() {
            return Some(Outcome::InsufficientMaterial);
        }
        if self.pos.is_seventy_five_move_draw() {
            return Some(Outcome::SeventyFiveMoves);
        }
        if self.repetitions() >= 5 {
            return Some(Outcome::FivefoldRepetition);
        }
        None
    }

    pub fn is_checkmate(&self) -> bool {
        matches!(self.outcome(), Some(Outcome::Checkmate { .. }))
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome().is_some()
    }
}

#[cfg(test)]
#[path = "game_tests.rs"]
mod game_tests;
