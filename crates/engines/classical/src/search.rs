//! Negamax alpha-beta with iterative deepening and aspiration windows.
//!
//! Scores are always from the side to move's perspective and the search is
//! fail-hard: a node returns a value clamped to its `(alpha, beta)` window.
//! Only values strictly inside the window are exact, and only those are
//! written to the transposition cache.

use chess_core::Move;
use log::{debug, trace};

use crate::cache::TranspositionCache;
use crate::config::{OrderingPolicy, SearchConfig};
use crate::error::SearchError;
use crate::ordering::order_moves;
use crate::rules::Rules;
use crate::score::{INFINITY, Score, mate_distance, terminal_score};

/// Plays `mv`, runs `f` on the resulting position, then takes the move back.
///
/// The unmake happens whether or not `f` succeeds, so no early return in
/// the subtree can leave the position modified.
pub(crate) fn with_move<R, T>(
    pos: &mut R,
    mv: Move,
    f: impl FnOnce(&mut R) -> Result<T, SearchError>,
) -> Result<T, SearchError>
where
    R: Rules,
{
    pos.make_move(mv)?;
    let result = f(pos);
    pos.unmake_move()?;
    result
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub cache_hits: u64,
    /// Root re-searches after an aspiration miss
    pub researches: u32,
}

enum RootOutcome {
    Exact(Move, Score),
    /// No move beat alpha
    FailLow,
    /// This move reached beta; the rest were not searched
    FailHigh(Move, Score),
}

pub(crate) struct Searcher<'a> {
    config: &'a SearchConfig,
    cache: &'a mut TranspositionCache,
    pub(crate) stats: SearchStats,
}

impl<'a> Searcher<'a> {
    pub(crate) fn new(config: &'a SearchConfig, cache: &'a mut TranspositionCache) -> Self {
        Self {
            config,
            cache,
            stats: SearchStats::default(),
        }
    }

    /// Searches depths `1..=max_depth` over the already ordered root moves.
    ///
    /// Returns the best move and score of the deepest completed iteration.
    pub(crate) fn iterative_deepening<R: Rules>(
        &mut self,
        pos: &mut R,
        root_moves: &[Move],
        max_depth: u8,
    ) -> Result<(Move, Score), SearchError> {
        let window = self.config.aspiration_window;
        let mut best: Option<(Move, Score)> = None;

        for depth in 1..=max_depth {
            let (mut alpha, mut beta) = match best {
                Some((_, score)) => (
                    score.saturating_sub(window).max(-INFINITY),
                    score.saturating_add(window).min(INFINITY),
                ),
                None => (-INFINITY, INFINITY),
            };

            loop {
                match self.search_root(pos, root_moves, depth, alpha, beta)? {
                    RootOutcome::Exact(mv, score) => {
                        best = Some((mv, score));
                        break;
                    }
                    RootOutcome::FailLow if self.config.aspiration_research && alpha > -INFINITY => {
                        trace!("depth {depth}: fail-low at alpha {alpha}, re-searching");
                        alpha = -INFINITY;
                        self.stats.researches += 1;
                    }
                    // Keep the previous iteration's choice
                    RootOutcome::FailLow => break,
                    RootOutcome::FailHigh(..) if self.config.aspiration_research && beta < INFINITY => {
                        trace!("depth {depth}: fail-high at beta {beta}, re-searching");
                        beta = INFINITY;
                        self.stats.researches += 1;
                    }
                    RootOutcome::FailHigh(mv, score) => {
                        best = Some((mv, score));
                        break;
                    }
                }
            }

            if let Some((mv, score)) = best {
                match mate_distance(score) {
                    Some(moves) => debug!(
                        "depth {depth}: best {mv} mate {moves} nodes {} cache hits {}",
                        self.stats.nodes, self.stats.cache_hits
                    ),
                    None => debug!(
                        "depth {depth}: best {mv} score {score} nodes {} cache hits {}",
                        self.stats.nodes, self.stats.cache_hits
                    ),
                }
            }
        }

        best.ok_or(SearchError::NoLegalMoves)
    }

    fn search_root<R: Rules>(
        &mut self,
        pos: &mut R,
        root_moves: &[Move],
        depth: u8,
        mut alpha: Score,
        beta: Score,
    ) -> Result<RootOutcome, SearchError> {
        let mut best = None;
        for &mv in root_moves {
            let score =
                -with_move(pos, mv, |pos| self.negamax(pos, depth - 1, -beta, -alpha, 1))?;
            if score >= beta {
                return Ok(RootOutcome::FailHigh(mv, score));
            }
            // Strictly greater: the first of equal moves is kept
            if score > alpha {
                alpha = score;
                best = Some((mv, score));
            }
        }
        Ok(match best {
            Some((mv, score)) => RootOutcome::Exact(mv, score),
            None => RootOutcome::FailLow,
        })
    }

    /// Value of `pos` searched `depth` plies deep, `ply` plies below the root.
    pub(crate) fn negamax<R: Rules>(
        &mut self,
        pos: &mut R,
        depth: u8,
        mut alpha: Score,
        beta: Score,
        ply: u32,
    ) -> Result<Score, SearchError> {
        self.stats.nodes += 1;

        let key = pos.position_key();
        if let Some(score) = self.cache.probe(key, depth, ply) {
            self.stats.cache_hits += 1;
            return Ok(score);
        }

        if let Some(outcome) = pos.outcome() {
            let score = terminal_score(outcome, pos.side_to_move(), ply);
            self.cache.store(key, depth, score, ply);
            return Ok(score);
        }

        if depth == 0 {
            return self.horizon(pos, key, alpha, beta, ply);
        }

        let alpha_orig = alpha;
        let mut moves = pos.legal_moves();
        if self.config.ordering == OrderingPolicy::EveryNode {
            moves = order_moves(pos, moves, self.config.check_bucket)?;
        }

        for mv in moves {
            let score =
                -with_move(pos, mv, |pos| self.negamax(pos, depth - 1, -beta, -alpha, ply + 1))?;
            if score >= beta {
                return Ok(beta);
            }
            if score > alpha {
                alpha = score;
            }
        }

        if alpha > alpha_orig {
            self.cache.store(key, depth, alpha, ply);
        }
        Ok(alpha)
    }

    /// Depth-zero node of the main search: static evaluation, or quiescence
    /// when capture plies are configured.
    fn horizon<R: Rules>(
        &mut self,
        pos: &mut R,
        key: u64,
        alpha: Score,
        beta: Score,
        ply: u32,
    ) -> Result<Score, SearchError> {
        let plies = self.config.quiescence_depth;
        if plies == 0 {
            let score = crate::eval::evaluate(pos);
            self.cache.store(key, 0, score, ply);
            return Ok(score);
        }

        let score = self.capture_search(pos, alpha, beta, plies, ply)?;
        if alpha < score && score < beta {
            self.cache.store(key, 0, score, ply);
        }
        Ok(score)
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
