//! Decision engine for generalized m,n,k games
//!
//! An m,n,k game is played on an M x N board where the first player to mark
//! K cells in a row, column or diagonal wins. The crate keeps an incremental
//! board tracker (run lengths per cell and direction, length counters, and
//! the frontier of playable cells) that is updated in time bounded by K per
//! move and is exactly reversible, and drives a best-first alpha-beta search
//! over it under a per-move wall-clock budget.
//!
//! [`Engine`] is the turn-level entry point; [`Board`] and [`Searcher`] are
//! usable on their own.

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod search;

pub use board::{Board, GameStatus, LineSignal, Player, Pos};
pub use config::GameConfig;
pub use engine::Engine;
pub use error::EngineError;
pub use search::Searcher;
