//! Move ordering: captures, then promotions, then checks, then the rest.
//!
//! Each move lands in the first bucket it qualifies for, and keeps its
//! generator order within that bucket.

use chess_core::Move;

use crate::config::CheckBucket;
use crate::error::SearchError;
use crate::rules::Rules;
use crate::search::with_move;

pub fn order_moves<R: Rules>(
    pos: &mut R,
    moves: Vec<Move>,
    check_bucket: CheckBucket,
) -> Result<Vec<Move>, SearchError> {
    let side_in_check = pos.in_check();

    let mut captures = Vec::new();
    let mut promotions = Vec::new();
    let mut checks = Vec::new();
    let mut rest = Vec::with_capacity(moves.len());

    for mv in moves {
        if pos.is_capture(mv) {
            captures.push(mv);
        } else if pos.is_promotion(mv) {
            promotions.push(mv);
        } else if is_check_move(pos, mv, check_bucket, side_in_check)? {
            checks.push(mv);
        } else {
            rest.push(mv);
        }
    }

    captures.extend(promotions);
    captures.extend(checks);
    captures.extend(rest);
    Ok(captures)
}

fn is_check_move<R: Rules>(
    pos: &mut R,
    mv: Move,
    check_bucket: CheckBucket,
    side_in_check: bool,
) -> Result<bool, SearchError> {
    match check_bucket {
        CheckBucket::SideInCheck => Ok(side_in_check),
        CheckBucket::GivesCheck => with_move(pos, mv, |pos| Ok(pos.in_check())),
    }
}

#[cfg(test)]
#[path = "ordering_tests.rs"]
mod ordering_tests;
