//! Static evaluation from the side to move's perspective.
//!
//! Terms, summed:
//! - material, weighted by [`PIECE_WEIGHTS`](crate::PIECE_WEIGHTS)
//! - pawn defects (doubled, pinned, no pawn on an attacked square), ours
//!   minus theirs, at -50 each
//! - mobility, 10 per legal move ahead of the opponent
//! - capture potential, 50 per legal capture
//! - king proximity, -5 per step of Manhattan distance between the kings
//! - threatened pieces, minus the weight of every piece of ours standing on
//!   a square one of the opponent's legal moves lands on

use chess_core::{Bitboard, Color, Move, PieceKind};

use crate::rules::Rules;
use crate::score::{Score, piece_weight};

const PAWN_DEFECT: Score = -50;
const MOBILITY: Score = 10;
const CAPTURE_POTENTIAL: Score = 50;
const KING_DISTANCE: Score = -5;

/// Evaluates the position for the side to move. Positive is good for them.
pub fn evaluate<R: Rules>(pos: &R) -> Score {
    let us = pos.side_to_move();
    let them = us.other();
    let our_moves = pos.legal_moves();
    let their_moves = pos.legal_moves_for(them);
    let captures = our_moves.iter().filter(|&&mv| pos.is_capture(mv)).count();

    material(pos, us)
        + PAWN_DEFECT * (pawn_defects(pos, us) - pawn_defects(pos, them))
        + MOBILITY * (our_moves.len() as Score - their_moves.len() as Score)
        + CAPTURE_POTENTIAL * captures as Score
        + king_safety(pos)
        - threatened(pos, us, &their_moves)
}

/// Weighted piece count, ours minus theirs.
pub fn material<R: Rules>(pos: &R, us: Color) -> Score {
    PieceKind::ALL
        .iter()
        .map(|&kind| {
            let ours = pos.piece_count(us, kind) as Score;
            let theirs = pos.piece_count(us.other(), kind) as Score;
            piece_weight(kind) * (ours - theirs)
        })
        .sum()
}

/// Doubled, pinned and isolated pawns of `color`, counted separately.
///
/// A pawn counts as isolated when none of the squares it attacks holds a
/// pawn of either colour.
pub fn pawn_defects<R: Rules>(pos: &R, color: Color) -> Score {
    let pawns = pos.pieces(color, PieceKind::Pawn);
    let all_pawns = pawns | pos.pieces(color.other(), PieceKind::Pawn);

    let doubled: u32 = (0..8)
        .map(|file| (pawns & Bitboard::file(file)).popcount().saturating_sub(1))
        .sum();
    let pinned = pawns.filter(|&sq| pos.is_pinned(color, sq)).count() as u32;
    let isolated = pawns
        .filter(|&sq| (pos.attacks_from(sq) & all_pawns).is_empty())
        .count() as u32;

    (doubled + pinned + isolated) as Score
}

/// Closer kings score lower. Zero when either king is missing.
pub fn king_safety<R: Rules>(pos: &R) -> Score {
    match (pos.king_square(Color::White), pos.king_square(Color::Black)) {
        (Some(w), Some(b)) => {
            let files = (w % 8).abs_diff(b % 8);
            let ranks = (w / 8).abs_diff(b / 8);
            KING_DISTANCE * (files + ranks) as Score
        }
        _ => 0,
    }
}

/// Total weight of `us`'s pieces on squares the opponent's moves reach.
pub fn threatened<R: Rules>(pos: &R, us: Color, their_moves: &[Move]) -> Score {
    let mut targets = Bitboard::EMPTY;
    for mv in their_moves {
        targets.set(mv.to);
    }
    PieceKind::ALL
        .iter()
        .map(|&kind| piece_weight(kind) * (pos.pieces(us, kind) & targets).popcount() as Score)
        .sum()
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod eval_tests;
