//! Board representation for m,n,k games

pub mod runs;
pub mod tracker;

#[cfg(test)]
mod tests;

// Re-exports
pub use tracker::Board;

/// Direction vectors for line checking (4 directions).
///
/// Each direction is scanned both ways, so the four entries cover all eight
/// rays out of a cell.
pub const DIRECTIONS: [(i32, i32); 4] = [
    (0, 1),  // Horizontal
    (1, 0),  // Vertical
    (1, 1),  // Diagonal SE
    (1, -1), // Diagonal SW
];

/// Number of line directions.
pub const NUM_DIRECTIONS: usize = DIRECTIONS.len();

/// The two sides of a game. `One` always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// Both players, in matrix-slot order.
    pub const BOTH: [Player; 2] = [Player::One, Player::Two];

    /// Get the opposing side.
    #[inline]
    #[must_use]
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Slot of this player in per-player arrays.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

/// Outcome state of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Open,
    Draw,
    Won(Player),
}

impl GameStatus {
    #[inline]
    #[must_use]
    pub fn is_open(self) -> bool {
        self == GameStatus::Open
    }
}

/// Position on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: u16,
    pub col: u16,
}

impl Pos {
    #[inline]
    #[must_use]
    pub fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.row, self.col).cmp(&(other.row, other.col))
    }
}

/// Per-player line signal at a candidate cell.
///
/// `max_run` is the longest K-windowed run the player could still complete
/// through the cell (`-1` when every window is blocked), `best_dir` the
/// direction index where that maximum was found, and `dir_sum` the summed
/// run potential over all four directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSignal {
    pub max_run: i8,
    pub best_dir: usize,
    pub dir_sum: i32,
}

impl LineSignal {
    pub(crate) const EMPTY: LineSignal = LineSignal {
        max_run: -1,
        best_dir: 0,
        dir_sum: 0,
    };
}
