//! Immutable per-game configuration
//!
//! Every component receives a `GameConfig` value at construction instead of
//! reading process-wide state, so multiple independent game instances can
//! coexist in one process.

use std::time::Duration;

use crate::board::{Player, Pos};
use crate::error::EngineError;

/// Run lengths are stored as `i8`, so K is capped accordingly.
const MAX_WIN_LEN: u8 = 127;

/// Parameters of one m,n,k game instance.
///
/// `Player::One` is always the side that moves first in the game; `me` names
/// the side this engine plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Board rows (M).
    pub rows: u16,
    /// Board columns (N).
    pub cols: u16,
    /// Marks in a row needed to win (K).
    pub win_len: u8,
    /// The side this engine plays.
    pub me: Player,
    /// Wall-clock budget per move.
    pub time_budget: Duration,
}

impl GameConfig {
    /// Create a configuration for an M x N board with win length K.
    ///
    /// `first` states whether this engine makes the first move of the game.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidConfig` for a degenerate board or a win
    /// length of zero.
    pub fn new(
        rows: u16,
        cols: u16,
        win_len: u8,
        first: bool,
        time_budget: Duration,
    ) -> Result<Self, EngineError> {
        if rows == 0 || cols == 0 {
            return Err(EngineError::InvalidConfig(format!(
                "board must be non-empty, got {rows}x{cols}"
            )));
        }
        if win_len == 0 || win_len > MAX_WIN_LEN {
            return Err(EngineError::InvalidConfig(format!(
                "win length must be in 1..={MAX_WIN_LEN}, got {win_len}"
            )));
        }
        Ok(Self {
            rows,
            cols,
            win_len,
            me: if first { Player::One } else { Player::Two },
            time_budget,
        })
    }

    /// The opponent of the engine's side.
    #[inline]
    #[must_use]
    pub fn opponent(&self) -> Player {
        self.me.opponent()
    }

    /// Center cell, used as the opening move on an empty board.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Pos {
        Pos::new(self.rows / 2, self.cols / 2)
    }

    /// Total number of cells on the board.
    #[inline]
    #[must_use]
    pub fn total_cells(&self) -> usize {
        usize::from(self.rows) * usize::from(self.cols)
    }
}
