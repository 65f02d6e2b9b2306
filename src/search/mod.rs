//! Best-first alpha-beta search over frontier candidates
//!
//! Candidates are the frontier cells of the board. Each is wrapped in a
//! [`Node`] carrying both players' line signals at the cell, classified as
//! critical or quiet, and expanded in priority order under a per-level beam
//! cap. The search is depth-limited and deadline-bounded.

pub mod alphabeta;
pub mod importance;
pub mod node;

pub use alphabeta::Searcher;
pub use node::Node;

use crate::board::{Board, LineSignal, Pos};

/// Default depth limit of the alpha-beta search.
pub const DEFAULT_DEPTH: u32 = 9;

/// Both players' line signals at a cell, engine side first.
///
/// Slot 0 is always the side this engine plays; node ordering and the
/// importance classifier index signals this way.
pub(crate) fn me_signal(board: &Board, cell: Pos) -> [LineSignal; 2] {
    let raw = board.move_signal(cell);
    let me = board.config().me;
    [raw[me.index()], raw[me.opponent().index()]]
}
