//! Behavioural guarantees of the search, checked against real positions.

use chess_core::{
    Bitboard, Color, Game, Move, Outcome, PieceKind, RulesError, parse_uci_move,
};
use classical_engine::{
    CheckBucket, ClassicalEngine, Rules, SearchConfig, SearchError, evaluate, order_moves,
};

const OPENING: &str = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
const SMALL: &str = "4k3/8/8/3p4/4P3/2N5/8/4K3 w - - 0 1";
const ROOK_ENDGAME: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
const MATE_IN_ONE: &str = "6k1/5ppp/8/8/8/8/5PPP/4Q1K1 w - - 0 1";

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn game(fen: &str) -> Game {
    Game::from_fen(fen).unwrap()
}

fn engine_with(config: SearchConfig) -> ClassicalEngine {
    ClassicalEngine::with_config(config).unwrap()
}

fn uncached() -> SearchConfig {
    let mut config = SearchConfig::default();
    config.cache.enabled = false;
    config
}

// =============================================================================
// Determinism and legality
// =============================================================================

#[test]
fn test_fresh_engines_agree() {
    init_logging();
    for fen in [OPENING, SMALL, ROOK_ENDGAME] {
        let mut a = ClassicalEngine::new();
        let mut b = ClassicalEngine::new();
        let ra = a.search(&mut game(fen), 3).unwrap();
        let rb = b.search(&mut game(fen), 3).unwrap();
        assert_eq!(ra, rb, "{fen}");
    }
}

#[test]
fn test_repeated_calls_on_one_engine_agree() {
    init_logging();
    let mut engine = ClassicalEngine::new();
    for fen in [OPENING, SMALL, ROOK_ENDGAME] {
        let first = engine.search(&mut game(fen), 3).unwrap();
        let second = engine.search(&mut game(fen), 3).unwrap();
        assert_eq!(first.best_move, second.best_move, "{fen}");
        assert_eq!(first.score, second.score, "{fen}");
        assert_eq!(
            engine.find_best_move(&mut game(fen), 3).unwrap(),
            first.best_move,
            "{fen}"
        );
    }
}

#[test]
fn test_checks_do_not_inflate_the_score() {
    init_logging();
    // Ra8+ and Nxd4 are both available; neither is worth a king
    let fen = "4k3/8/8/8/3q4/5N2/8/R3K3 w - - 0 1";
    let mut engine = ClassicalEngine::new();
    for depth in 1..=3 {
        let result = engine.search(&mut game(fen), depth).unwrap();
        assert!(result.score > 0, "depth {depth}: {}", result.score);
        assert!(result.score < 5_000, "depth {depth}: {}", result.score);
    }
}

#[test]
fn test_returned_move_is_legal() {
    init_logging();
    let mut engine = ClassicalEngine::new();
    for fen in [OPENING, SMALL, ROOK_ENDGAME, MATE_IN_ONE] {
        let mut g = game(fen);
        for depth in 1..=3 {
            let mv = engine.find_best_move(&mut g, depth).unwrap();
            assert!(g.legal_moves().contains(&mv), "{fen} depth {depth}: {mv}");
        }
    }
}

// =============================================================================
// Depth-1 sanity
// =============================================================================

#[test]
fn test_depth_one_maximises_evaluation_after_the_move() {
    init_logging();
    let mut config = uncached();
    config.quiescence_depth = 0;

    for fen in [OPENING, SMALL, ROOK_ENDGAME] {
        let mut g = game(fen);
        let moves = g.legal_moves();
        let ordered = order_moves(&mut g, moves, CheckBucket::GivesCheck).unwrap();

        let mut expected: Option<(Move, i32)> = None;
        for mv in ordered {
            g.push(mv).unwrap();
            assert!(g.outcome().is_none());
            let score = -evaluate(&g);
            g.pop().unwrap();
            if expected.is_none_or(|(_, best)| score > best) {
                expected = Some((mv, score));
            }
        }
        let (expected_move, expected_score) = expected.unwrap();

        let result = engine_with(config.clone()).search(&mut g, 1).unwrap();
        assert_eq!(result.best_move, expected_move, "{fen}");
        assert_eq!(result.score, expected_score, "{fen}");
    }
}

// =============================================================================
// Mate and terminal positions
// =============================================================================

#[test]
fn test_finds_mate_in_one_at_every_depth() {
    init_logging();
    let mut g = game(MATE_IN_ONE);
    let mate = parse_uci_move(g.position(), "e1e8").unwrap();
    for depth in 1..=3 {
        let mut engine = ClassicalEngine::new();
        let result = engine.search(&mut g, depth).unwrap();
        assert_eq!(result.best_move, mate, "depth {depth}");
        assert_eq!(classical_engine::mate_distance(result.score), Some(1));
    }
}

#[test]
fn test_terminal_positions_have_no_move() {
    init_logging();
    let mut engine = ClassicalEngine::new();
    let stalemate = "k7/8/1Q6/8/8/8/8/1K6 b - - 0 1";
    let checkmate = "r1bqkbnr/pppp1Qpp/2n5/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 1";
    for fen in [stalemate, checkmate] {
        for depth in 1..=3 {
            assert_eq!(
                engine.find_best_move(&mut game(fen), depth),
                Err(SearchError::NoLegalMoves)
            );
        }
    }
}

// =============================================================================
// Quiescence
// =============================================================================

#[test]
fn test_hanging_queen_scores_worse_for_its_owner() {
    init_logging();
    let mut engine = engine_with(uncached());
    // Black to move in both; only in the first can the knight take the queen
    let mut hanging = game("7k/7p/5n2/3Q4/8/8/P7/6K1 b - - 0 1");
    let mut safe = game("7k/7p/5n2/8/8/8/P7/1Q4K1 b - - 0 1");

    let white_hanging = -engine.score_position(&mut hanging, 0).unwrap();
    let white_safe = -engine.score_position(&mut safe, 0).unwrap();
    assert!(
        white_hanging < white_safe,
        "hanging {white_hanging} vs safe {white_safe}"
    );
}

// =============================================================================
// Cache
// =============================================================================

#[test]
fn test_cached_scores_match_fresh_search() {
    init_logging();
    let mut warm = ClassicalEngine::new();
    let mut reference = engine_with(uncached());
    let mut g = game(SMALL);
    warm.find_best_move(&mut g, 3).unwrap();
    assert!(!warm.cache().is_empty());

    for mv in g.legal_moves() {
        g.push(mv).unwrap();
        for depth in 0..=2 {
            assert_eq!(
                warm.score_position(&mut g, depth).unwrap(),
                reference.score_position(&mut g, depth).unwrap(),
                "after {mv} at depth {depth}"
            );
        }
        g.pop().unwrap();
    }
}

#[test]
fn test_every_node_ordering_finds_the_same_value() {
    init_logging();
    let mut config = uncached();
    let mut root_only = engine_with(config.clone());
    config.ordering = classical_engine::OrderingPolicy::EveryNode;
    let mut every_node = engine_with(config);

    let mut g = game(OPENING);
    assert_eq!(
        root_only.score_position(&mut g, 2).unwrap(),
        every_node.score_position(&mut g, 2).unwrap()
    );
}

// =============================================================================
// Aspiration windows
// =============================================================================

#[test]
fn test_aspiration_misses_are_researched() {
    init_logging();
    let mut narrow = SearchConfig::default();
    narrow.aspiration_window = 1;

    let mut researches = 0;
    for fen in [OPENING, ROOK_ENDGAME] {
        let a = engine_with(narrow.clone()).search(&mut game(fen), 3).unwrap();
        let b = ClassicalEngine::new().search(&mut game(fen), 3).unwrap();
        assert_eq!((a.best_move, a.score), (b.best_move, b.score), "{fen}");
        researches += a.researches;
    }
    assert!(researches > 0);
}

#[test]
fn test_aspiration_without_research_still_returns_a_legal_move() {
    init_logging();
    let mut config = SearchConfig::default();
    config.aspiration_window = 1;
    config.aspiration_research = false;

    let mut g = game(OPENING);
    let result = engine_with(config).search(&mut g, 3).unwrap();
    assert_eq!(result.researches, 0);
    assert!(g.legal_moves().contains(&result.best_move));
}

// =============================================================================
// Position restoration
// =============================================================================

#[test]
fn test_search_leaves_position_unchanged() {
    init_logging();
    let mut config = SearchConfig::default();
    config.ordering = classical_engine::OrderingPolicy::EveryNode;
    for fen in [OPENING, SMALL, ROOK_ENDGAME, MATE_IN_ONE] {
        let mut g = game(fen);
        let key = g.key();
        let before = g.position().clone();
        engine_with(config.clone()).find_best_move(&mut g, 3).unwrap();
        assert_eq!(g.key(), key);
        assert_eq!(g.position(), &before);
        assert_eq!(g.ply(), 0);
    }
}

/// A game whose rules engine starts refusing moves after a fixed budget.
struct Flaky {
    game: Game,
    makes_left: usize,
}

impl Rules for Flaky {
    fn side_to_move(&self) -> Color {
        self.game.side_to_move()
    }
    fn legal_moves(&self) -> Vec<Move> {
        self.game.legal_moves()
    }
    fn legal_moves_for(&self, side: Color) -> Vec<Move> {
        self.game.legal_moves_for(side)
    }
    fn is_capture(&self, mv: Move) -> bool {
        self.game.is_capture(mv)
    }
    fn in_check(&self) -> bool {
        self.game.is_check()
    }
    fn make_move(&mut self, mv: Move) -> Result<(), RulesError> {
        if self.makes_left == 0 {
            return Err(RulesError::IllegalMove { mv: mv.to_string() });
        }
        self.makes_left -= 1;
        self.game.push(mv)
    }
    fn unmake_move(&mut self) -> Result<Move, RulesError> {
        self.game.pop()
    }
    fn outcome(&self) -> Option<Outcome> {
        self.game.outcome()
    }
    fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.game.pieces(color, kind)
    }
    fn king_square(&self, side: Color) -> Option<u8> {
        self.game.position().king_sq(side)
    }
    fn attacks_from(&self, square: u8) -> Bitboard {
        self.game.position().attacks_from(square)
    }
    fn is_pinned(&self, side: Color, square: u8) -> bool {
        self.game.position().is_pinned(side, square)
    }
    fn position_key(&self) -> u64 {
        self.game.key()
    }
}

#[test]
fn test_rules_failure_propagates_and_restores_position() {
    init_logging();
    for budget in [0, 3, 40, 200] {
        let mut flaky = Flaky {
            game: game(SMALL),
            makes_left: budget,
        };
        let key = flaky.game.key();
        let result = ClassicalEngine::new().find_best_move(&mut flaky, 3);
        assert!(
            matches!(result, Err(SearchError::Rules(RulesError::IllegalMove { .. }))),
            "budget {budget}: {result:?}"
        );
        assert_eq!(flaky.game.key(), key);
        assert_eq!(flaky.game.ply(), 0);
    }
}
