//! Chess rules: board representation, legal move generation, make/unmake
//! and game-ending conditions.

pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod error;
pub mod game;
pub mod movegen;
pub mod perft;
pub mod types;
pub mod uci;
pub mod zobrist;

pub use attacks::*;
pub use bitboard::*;
pub use board::*;
pub use error::{RulesError, RulesResult};
pub use game::{Game, Outcome};
pub use movegen::*;
pub use perft::{perft, perft_divide};
pub use types::*;
pub use uci::*;
pub use zobrist::ZOBRIST;
