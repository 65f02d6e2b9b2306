//! Incremental board-state tracker
//!
//! The tracker owns the grid and maintains, for every free cell, the length
//! of the longest K-windowed run each player could still complete through it
//! in each of the four line directions, plus per-player counters of those
//! lengths and the 8-neighbor frontier set. All of it is updated in bounded
//! time per mark and is exactly reversible: each mark pushes a compact diff
//! snapshot (the `2K+1` window per player and direction, plus the counters)
//! which `unmark` restores bit-for-bit.

use std::collections::HashSet;

use crate::board::{GameStatus, LineSignal, Player, Pos, DIRECTIONS, NUM_DIRECTIONS};
use crate::config::GameConfig;
use crate::error::EngineError;

/// Undo record for one mark: the run-length window that mark could have
/// altered, plus a copy of both players' length counters.
#[derive(Debug, Clone)]
struct Snapshot {
    cell: Pos,
    /// `windows[player][dir]` holds `2K+1` run values centered on `cell`;
    /// entries at off-board offsets are never read back.
    windows: [[Vec<i8>; NUM_DIRECTIONS]; 2],
    counts: [Vec<u32>; 2],
}

/// Board state with incremental run-length tracking.
///
/// The grid is mutated only through [`Board::mark`] and [`Board::unmark`];
/// every mark can be undone, and the undo stack is strictly LIFO with the
/// caller's recursion. Root moves that will never be undone are made
/// permanent with [`Board::commit`].
#[derive(Debug, Clone)]
pub struct Board {
    cfg: GameConfig,
    /// `None` = free cell.
    grid: Vec<Option<Player>>,
    /// `runs[player][dir][cell]`: longest completable run, `-1` = blocked.
    pub(crate) runs: [[Vec<i8>; NUM_DIRECTIONS]; 2],
    /// `counts[player][len - 1]`: free cells holding run length `len` in any
    /// direction (a cell may contribute once per direction).
    counts: [Vec<u32>; 2],
    /// Free cells with at least one marked 8-neighbor.
    frontier: HashSet<Pos>,
    /// Marked cells, oldest first.
    moves: Vec<Pos>,
    history: Vec<Snapshot>,
    status: GameStatus,
}

impl Board {
    /// Create an empty board for the given game.
    #[must_use]
    pub fn new(cfg: GameConfig) -> Self {
        let total = cfg.total_cells();
        let k = usize::from(cfg.win_len);
        Self {
            cfg,
            grid: vec![None; total],
            runs: std::array::from_fn(|_| std::array::from_fn(|_| vec![0; total])),
            counts: std::array::from_fn(|_| vec![0; k]),
            frontier: HashSet::new(),
            moves: Vec::with_capacity(total),
            history: Vec::new(),
            status: GameStatus::Open,
        }
    }

    /// The configuration this board was built with.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.cfg
    }

    /// Win length K.
    #[inline]
    #[must_use]
    pub fn k(&self) -> usize {
        usize::from(self.cfg.win_len)
    }

    /// Current game status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Side that makes the next mark. `Player::One` opens the game.
    #[inline]
    #[must_use]
    pub fn to_move(&self) -> Player {
        if self.moves.len() % 2 == 0 {
            Player::One
        } else {
            Player::Two
        }
    }

    /// Number of free cells left.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.cfg.total_cells() - self.moves.len()
    }

    #[inline]
    pub(crate) fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && row < i32::from(self.cfg.rows) && col >= 0 && col < i32::from(self.cfg.cols)
    }

    #[inline]
    fn idx(&self, pos: Pos) -> usize {
        usize::from(pos.row) * usize::from(self.cfg.cols) + usize::from(pos.col)
    }

    /// Occupant of a cell addressed with signed coordinates; off-board cells
    /// read as free, so bounds must be checked separately where the
    /// distinction matters.
    #[inline]
    pub(crate) fn occupant(&self, row: i32, col: i32) -> Option<Player> {
        if !self.in_bounds(row, col) {
            return None;
        }
        self.grid[row as usize * usize::from(self.cfg.cols) + col as usize]
    }

    /// Occupant of a cell, `None` when free.
    #[inline]
    #[must_use]
    pub fn at(&self, pos: Pos) -> Option<Player> {
        self.grid[self.idx(pos)]
    }

    /// Whether the cell is free.
    #[inline]
    #[must_use]
    pub fn is_free(&self, pos: Pos) -> bool {
        self.at(pos).is_none()
    }

    /// Stored run length for a player through a free cell in one direction.
    ///
    /// Values at marked cells are not meaningful for scoring.
    #[inline]
    #[must_use]
    pub fn run_len(&self, player: Player, dir: usize, pos: Pos) -> i8 {
        self.runs[player.index()][dir][self.idx(pos)]
    }

    /// Per-player counters of free cells by run length (`[len - 1]`).
    #[inline]
    #[must_use]
    pub fn run_counts(&self, player: Player) -> &[u32] {
        &self.counts[player.index()]
    }

    /// Free cells adjacent to at least one marked cell — the move-generation
    /// surface for search.
    pub fn frontier(&self) -> impl Iterator<Item = Pos> + '_ {
        self.frontier.iter().copied()
    }

    /// All free cells in row-major order.
    pub fn free_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.cfg.rows).flat_map(move |r| {
            (0..self.cfg.cols)
                .map(move |c| Pos::new(r, c))
                .filter(|&p| self.is_free(p))
        })
    }

    /// Mark the next player's cell and update every tracked structure.
    ///
    /// Pushes an undo snapshot before mutating, updates the grid and the
    /// frontier, detects win/draw, then recomputes the run-length window and
    /// counters around the cell for both players in all four directions.
    /// Cost O(K²), dominated by the 4-direction recompute.
    ///
    /// # Errors
    ///
    /// Fails on out-of-bounds coordinates, an occupied cell, or a finished
    /// game; the board is left untouched in that case.
    pub fn mark(&mut self, pos: Pos) -> Result<GameStatus, EngineError> {
        if pos.row >= self.cfg.rows || pos.col >= self.cfg.cols {
            return Err(EngineError::OutOfBounds {
                row: pos.row,
                col: pos.col,
                rows: self.cfg.rows,
                cols: self.cfg.cols,
            });
        }
        if !self.status.is_open() {
            return Err(EngineError::GameOver);
        }
        if !self.is_free(pos) {
            return Err(EngineError::CellOccupied {
                row: pos.row,
                col: pos.col,
            });
        }

        self.push_snapshot(pos);

        let player = self.to_move();
        let idx = self.idx(pos);
        self.grid[idx] = Some(player);
        self.moves.push(pos);

        self.frontier.remove(&pos);
        for neighbor in self.neighbors(pos) {
            if self.is_free(neighbor) {
                self.frontier.insert(neighbor);
            }
        }

        self.status = if self.creates_win(pos, player) {
            GameStatus::Won(player)
        } else if self.free_count() == 0 {
            GameStatus::Draw
        } else {
            GameStatus::Open
        };

        for target in Player::BOTH {
            for dir in 0..NUM_DIRECTIONS {
                self.update_runs(target, player, pos, dir);
            }
        }

        Ok(self.status)
    }

    /// Undo the most recent mark, restoring grid, frontier, run matrices and
    /// counters to their exact prior state. Cost O(K).
    ///
    /// # Errors
    ///
    /// Fails when there is no undoable mark — either the board is empty or
    /// the latest mark was made permanent with [`Board::commit`].
    pub fn unmark(&mut self) -> Result<(), EngineError> {
        let Some(&pos) = self.moves.last() else {
            return Err(EngineError::NothingToUndo);
        };
        if !self.history.last().is_some_and(|s| s.cell == pos) {
            // Latest mark was committed; undoing past it is a contract
            // violation by the caller.
            return Err(EngineError::NothingToUndo);
        }

        // Recompute which neighbors keep their frontier membership once this
        // mark is gone; the unmarked cell itself may rejoin the frontier.
        let mut to_check: Vec<Pos> = self
            .neighbors(pos)
            .into_iter()
            .filter(|&n| self.is_free(n))
            .collect();
        to_check.push(pos);
        for cell in &to_check {
            self.frontier.remove(cell);
        }

        let idx = self.idx(pos);
        self.grid[idx] = None;
        self.moves.pop();
        self.status = GameStatus::Open;

        for cell in to_check {
            if self.has_marked_neighbor(cell) {
                self.frontier.insert(cell);
            }
        }

        let Some(snap) = self.history.pop() else {
            return Err(EngineError::NothingToUndo);
        };
        self.apply_snapshot(&snap);
        Ok(())
    }

    /// Make the most recent mark permanent by discarding its undo snapshot.
    ///
    /// Keeps the undo stack depth equal to the current search depth when the
    /// engine plays root moves that will never be taken back.
    ///
    /// # Errors
    ///
    /// Fails when the most recent mark has no snapshot to discard.
    pub fn commit(&mut self) -> Result<(), EngineError> {
        let matches = match (self.moves.last(), self.history.last()) {
            (Some(&pos), Some(snap)) => snap.cell == pos,
            _ => false,
        };
        if !matches {
            return Err(EngineError::NothingToUndo);
        }
        self.history.pop();
        Ok(())
    }

    /// Run `f` with `cell` marked, then unmark on every exit path.
    ///
    /// This is the scoped-acquisition form of the mark/unmark contract used
    /// throughout search and speculative probing: the mark can never leak
    /// past the closure, including when `f` returns an error.
    pub fn with_move<T>(
        &mut self,
        cell: Pos,
        f: impl FnOnce(&mut Board) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        self.mark(cell)?;
        let out = f(self);
        self.unmark()?;
        out
    }

    /// Heuristic score of the position from the engine's perspective.
    ///
    /// Terminal positions return the win/loss sentinel or 0 for a draw;
    /// otherwise a weighted sum over run lengths of the counter difference,
    /// with geometrically increasing weights and a sharper increase for the
    /// last three lengths before K. Cost O(K).
    #[must_use]
    pub fn score(&self) -> i64 {
        match self.status {
            GameStatus::Won(p) if p == self.cfg.me => return i64::MAX,
            GameStatus::Won(_) => return i64::MIN,
            GameStatus::Draw => return 0,
            GameStatus::Open => {}
        }
        let k = self.k();
        let me = self.cfg.me.index();
        let opp = self.cfg.opponent().index();
        let mut score: i64 = 0;
        let mut exp: u32 = 1;
        for len in 0..k {
            // Near-decisive lengths weigh in with a larger base.
            let base: i64 = if len + 3 < k { 5 } else { 10 };
            let diff = i64::from(self.counts[me][len]) - i64::from(self.counts[opp][len]);
            score = score.saturating_add(base.saturating_pow(exp).saturating_mul(diff));
            exp += 2;
        }
        score
    }

    /// Per-player `{max_run, best_dir, dir_sum}` at a candidate cell.
    ///
    /// O(1): a lookup over the four direction matrices for both players,
    /// indexed by `Player::index`.
    #[must_use]
    pub fn move_signal(&self, pos: Pos) -> [LineSignal; 2] {
        let idx = self.idx(pos);
        let mut out = [LineSignal::EMPTY; 2];
        for player in Player::BOTH {
            let slot = player.index();
            for dir in 0..NUM_DIRECTIONS {
                let val = self.runs[slot][dir][idx];
                if out[slot].max_run < val {
                    out[slot].max_run = val;
                    out[slot].best_dir = dir;
                }
                out[slot].dir_sum += i32::from(val.max(0));
            }
        }
        out
    }

    /// In-bounds 8-neighbors of a cell.
    fn neighbors(&self, pos: Pos) -> Vec<Pos> {
        let mut out = Vec::with_capacity(8);
        for dr in -1..=1i32 {
            for dc in -1..=1i32 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let r = i32::from(pos.row) + dr;
                let c = i32::from(pos.col) + dc;
                if self.in_bounds(r, c) {
                    out.push(Pos::new(r as u16, c as u16));
                }
            }
        }
        out
    }

    fn has_marked_neighbor(&self, pos: Pos) -> bool {
        self.neighbors(pos)
            .into_iter()
            .any(|n| self.at(n).is_some())
    }

    /// Whether the mark just placed at `pos` completes a K-run.
    fn creates_win(&self, pos: Pos, player: Player) -> bool {
        let k = self.k();
        for (dr, dc) in DIRECTIONS {
            let mut len = 1usize;
            for sign in [1i32, -1] {
                let mut r = i32::from(pos.row) + sign * dr;
                let mut c = i32::from(pos.col) + sign * dc;
                while self.in_bounds(r, c) && self.occupant(r, c) == Some(player) {
                    len += 1;
                    r += sign * dr;
                    c += sign * dc;
                }
            }
            if len >= k {
                return true;
            }
        }
        false
    }

    /// Capture the `2K+1` run window around `pos` for every player and
    /// direction, plus the counters. O(K).
    fn push_snapshot(&mut self, pos: Pos) {
        let k = self.k() as i32;
        let width = 2 * self.k() + 1;
        let windows = std::array::from_fn(|p| {
            std::array::from_fn(|d| {
                let (dr, dc) = DIRECTIONS[d];
                let mut w = vec![0i8; width];
                for (slot, t) in (-k..=k).enumerate() {
                    let r = i32::from(pos.row) + t * dr;
                    let c = i32::from(pos.col) + t * dc;
                    if self.in_bounds(r, c) {
                        let idx = r as usize * usize::from(self.cfg.cols) + c as usize;
                        w[slot] = self.runs[p][d][idx];
                    }
                }
                w
            })
        });
        self.history.push(Snapshot {
            cell: pos,
            windows,
            counts: self.counts.clone(),
        });
    }

    /// Write a snapshot back into the run matrices and counters. O(K).
    fn apply_snapshot(&mut self, snap: &Snapshot) {
        let k = self.k() as i32;
        for p in 0..2 {
            for d in 0..NUM_DIRECTIONS {
                let (dr, dc) = DIRECTIONS[d];
                for (slot, t) in (-k..=k).enumerate() {
                    let r = i32::from(snap.cell.row) + t * dr;
                    let c = i32::from(snap.cell.col) + t * dc;
                    if self.in_bounds(r, c) {
                        let idx = r as usize * usize::from(self.cfg.cols) + c as usize;
                        self.runs[p][d][idx] = snap.windows[p][d][slot];
                    }
                }
            }
        }
        self.counts = snap.counts.clone();
    }

    #[inline]
    pub(crate) fn grid_free(&self, idx: usize) -> bool {
        self.grid[idx].is_none()
    }

    pub(crate) fn bump_count(&mut self, player: Player, len: i8, delta: i32) {
        debug_assert!(len > 0);
        let slot = &mut self.counts[player.index()][(len as usize) - 1];
        if delta > 0 {
            *slot += delta as u32;
        } else {
            *slot -= (-delta) as u32;
        }
    }
}
