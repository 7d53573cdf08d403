//! Capture-only search past the horizon.
//!
//! Stopping in the middle of an exchange misjudges material that is about
//! to change hands. Below the horizon only captures are tried, and the side
//! to move may always decline them and keep the static evaluation.

use chess_core::Move;

use crate::error::SearchError;
use crate::eval::evaluate;
use crate::rules::Rules;
use crate::score::{Score, terminal_score};
use crate::search::{Searcher, with_move};

impl Searcher<'_> {
    /// Quiescence value of `pos` with up to `depth` capture plies.
    pub(crate) fn quiescence<R: Rules>(
        &mut self,
        pos: &mut R,
        alpha: Score,
        beta: Score,
        depth: u8,
        ply: u32,
    ) -> Result<Score, SearchError> {
        self.stats.nodes += 1;
        if let Some(outcome) = pos.outcome() {
            return Ok(terminal_score(outcome, pos.side_to_move(), ply));
        }
        self.capture_search(pos, alpha, beta, depth, ply)
    }

    /// Quiescence for a position already known not to be over.
    pub(crate) fn capture_search<R: Rules>(
        &mut self,
        pos: &mut R,
        mut alpha: Score,
        beta: Score,
        depth: u8,
        ply: u32,
    ) -> Result<Score, SearchError> {
        let stand_pat = evaluate(pos);
        if depth == 0 {
            return Ok(stand_pat);
        }
        if stand_pat >= beta {
            return Ok(beta);
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let captures: Vec<Move> = pos
            .legal_moves()
            .into_iter()
            .filter(|&mv| pos.is_capture(mv))
            .collect();

        for mv in captures {
            let score = -with_move(pos, mv, |pos| {
                self.quiescence(pos, -beta, -alpha, depth - 1, ply + 1)
            })?;
            if score >= beta {
                return Ok(beta);
            }
            if score > alpha {
                alpha = score;
            }
        }
        Ok(alpha)
    }
}
