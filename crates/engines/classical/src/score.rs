//! Score scale and the values that anchor it.

use chess_core::{Color, Outcome, PieceKind};

/// Centipawns from the side to move's point of view.
pub type Score = i32;

/// Larger than any reachable score; the root's initial window is `(-INFINITY, INFINITY)`.
pub const INFINITY: Score = i32::MAX / 2;

/// Score of delivering mate on the current move.
pub const MATE_SCORE: Score = 1_000_000;

/// Scores beyond this magnitude encode a forced mate.
pub const MATE_BOUND: Score = MATE_SCORE - 1000;

/// Material weights indexed by `PieceKind::idx()`.
pub const PIECE_WEIGHTS: [Score; 6] = [100, 300, 300, 500, 900, 20_000];

#[inline]
pub fn piece_weight(kind: PieceKind) -> Score {
    PIECE_WEIGHTS[kind.idx()]
}

/// Value of a finished game for the side to move, `ply` moves from the root.
///
/// Being mated scores lower the sooner it happens, so the mating side
/// prefers the shortest mate. Every drawn outcome is zero.
pub fn terminal_score(outcome: Outcome, side_to_move: Color, ply: u32) -> Score {
    match outcome {
        Outcome::Checkmate { winner } if winner == side_to_move => MATE_SCORE - ply as Score,
        Outcome::Checkmate { .. } => -(MATE_SCORE - ply as Score),
        _ => 0,
    }
}

pub fn is_mate_score(score: Score) -> bool {
    score.abs() > MATE_BOUND
}

/// Moves until mate, signed from the side to move (positive: we mate).
pub fn mate_distance(score: Score) -> Option<i32> {
    if !is_mate_score(score) {
        return None;
    }
    let plies = MATE_SCORE - score.abs();
    let moves = (plies + 1) / 2;
    Some(if score > 0 { moves } else { -moves })
}
