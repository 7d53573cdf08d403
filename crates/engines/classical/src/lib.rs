//! Classical Chess Engine
//!
//! Alpha-beta search over any [`Rules`] implementation:
//! - Negamax with alpha-beta pruning, iterative deepening and aspiration
//!   windows at the root
//! - Capture-only quiescence search at the horizon
//! - Bucketed move ordering (captures, promotions, checks, the rest)
//! - A transposition cache keyed by position and remaining depth
//! - Evaluation from material, pawn structure, mobility, king distance and
//!   threatened pieces

mod cache;
mod config;
mod error;
mod eval;
mod ordering;
mod quiescence;
mod rules;
mod score;
mod search;

use chess_core::Move;

pub use cache::TranspositionCache;
pub use config::{CacheConfig, CacheScope, CheckBucket, OrderingPolicy, SearchConfig};
pub use error::{ConfigError, SearchError};
pub use eval::evaluate;
pub use ordering::order_moves;
pub use rules::Rules;
pub use score::{INFINITY, MATE_BOUND, MATE_SCORE, PIECE_WEIGHTS, Score, mate_distance};
pub use search::SearchStats;

use search::Searcher;

/// Result of a completed search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Best move of the deepest completed iteration
    pub best_move: Move,
    /// Its score in centipawns from the mover's perspective
    pub score: Score,
    pub depth: u8,
    pub nodes: u64,
    pub cache_hits: u64,
    pub researches: u32,
}

/// Classical chess engine using negamax with alpha-beta pruning.
///
/// The transposition cache lives in the engine. With the default
/// [`CacheScope::Engine`] it carries over between searches until
/// [`new_game`](Self::new_game) is called.
#[derive(Debug)]
pub struct ClassicalEngine {
    config: SearchConfig,
    cache: TranspositionCache,
}

impl Default for ClassicalEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassicalEngine {
    pub fn new() -> Self {
        let config = SearchConfig::default();
        Self {
            cache: TranspositionCache::new(&config.cache),
            config,
        }
    }

    pub fn with_config(config: SearchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            cache: TranspositionCache::new(&config.cache),
            config,
        })
    }

    pub fn name(&self) -> &str {
        "Classical v2.0"
    }

    pub fn author(&self) -> &str {
        "ML-chess"
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn cache(&self) -> &TranspositionCache {
        &self.cache
    }

    /// Forget everything learned about previous positions.
    pub fn new_game(&mut self) {
        self.cache.clear();
    }

    /// Best move for the side to move, searching `max_depth` plies.
    ///
    /// The position is restored before this returns, on success or failure.
    pub fn find_best_move<R: Rules>(
        &mut self,
        pos: &mut R,
        max_depth: u8,
    ) -> Result<Move, SearchError> {
        self.search(pos, max_depth).map(|r| r.best_move)
    }

    /// Like [`find_best_move`](Self::find_best_move), with score and statistics.
    pub fn search<R: Rules>(
        &mut self,
        pos: &mut R,
        max_depth: u8,
    ) -> Result<SearchResult, SearchError> {
        if max_depth < 1 {
            return Err(SearchError::InvalidDepth { depth: max_depth });
        }
        let moves = pos.legal_moves();
        if moves.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }

        self.begin_search();
        let moves = order_moves(pos, moves, self.config.check_bucket)?;
        let mut searcher = Searcher::new(&self.config, &mut self.cache);
        let (best_move, score) = searcher.iterative_deepening(pos, &moves, max_depth)?;
        let stats = searcher.stats;

        Ok(SearchResult {
            best_move,
            score,
            depth: max_depth,
            nodes: stats.nodes,
            cache_hits: stats.cache_hits,
            researches: stats.researches,
        })
    }

    /// Full-window value of `pos` at `depth` for the side to move.
    ///
    /// Depth 0 is the quiescence value (or the static evaluation when
    /// quiescence is disabled). Finished games score as terminal nodes.
    pub fn score_position<R: Rules>(
        &mut self,
        pos: &mut R,
        depth: u8,
    ) -> Result<Score, SearchError> {
        self.begin_search();
        let mut searcher = Searcher::new(&self.config, &mut self.cache);
        searcher.negamax(pos, depth, -INFINITY, INFINITY, 0)
    }

    fn begin_search(&mut self) {
        if self.config.cache.scope == CacheScope::Search {
            self.cache.clear();
        }
        self.cache.new_search();
    }
}
