//! Bounded-window run-length recompute
//!
//! After each mark the run-length matrices are refreshed only inside the
//! window the mark could have altered: up to K-1 cells on either side of it
//! along each direction, truncated at the board edge or at an opposing mark.
//! Within that window the new values come from two complementary rolling
//! passes (one sweeping K-windows forward from the region start, one
//! backward from its end), each O(K) per direction, instead of re-deriving
//! every cell's K-window from scratch.

use crate::board::{Board, Player, Pos, DIRECTIONS};

impl Board {
    /// Refresh `target`'s run matrix for one direction after `mover` marked
    /// `pos`. The grid must already contain the new mark.
    ///
    /// When the mark belongs to `target`, values inside the window are raised
    /// to the best achievable K-window count (elementwise max). When it
    /// belongs to the opponent, every run for `target` that would have spanned
    /// the marked cell is invalidated and the window is recomputed from the
    /// surviving side, `-1` marking cells with no viable window left.
    /// Counters are adjusted for every free cell whose stored value changes.
    pub(crate) fn update_runs(&mut self, target: Player, mover: Player, pos: Pos, dir: usize) {
        let k = self.k() as i32;
        if k == 1 {
            // A 1-run ends the game on the first mark; nothing to track.
            return;
        }
        let (dr, dc) = DIRECTIONS[dir];
        let blocker = target.opponent();
        let (pr, pc) = (i32::from(pos.row), i32::from(pos.col));

        // Usable extent behind pos: up to K-1 cells, stopping at the edge or
        // at a cell blocked for `target`.
        let mut backward = 1i32;
        let (mut r, mut c) = (pr - dr, pc - dc);
        while backward < k && self.in_bounds(r, c) && self.occupant(r, c) != Some(blocker) {
            r -= dr;
            c -= dc;
            backward += 1;
        }
        // Whether a K-th usable cell exists beyond the scanned extent.
        let bw_open = backward == k && self.in_bounds(r, c) && self.occupant(r, c) != Some(blocker);
        backward -= 1;

        let mut forward = 1i32;
        let (mut r, mut c) = (pr + dr, pc + dc);
        while forward < k && self.in_bounds(r, c) && self.occupant(r, c) != Some(blocker) {
            r += dr;
            c += dc;
            forward += 1;
        }
        let fw_open = forward == k && self.in_bounds(r, c) && self.occupant(r, c) != Some(blocker);
        forward -= 1;

        let size = (backward + forward + 1) as usize;
        let center = backward as usize;
        let (start_r, start_c) = (pr - backward * dr, pc - backward * dc);
        let (end_r, end_c) = (pr + forward * dr, pc + forward * dc);
        let mut s = vec![0i8; size];

        if mover == target {
            if size < k as usize {
                // No K-window fits through the mark; nothing can change.
                return;
            }
            self.forward_pass(&mut s, 0, backward - 1, start_r, start_c, dir, target);
            self.backward_pass(&mut s, backward + 1, size as i32 - 1, end_r, end_c, dir, target);
            if backward <= 0 {
                s[0] = s[1];
            } else if forward <= 0 {
                s[size - 1] = s[size - 2];
            } else {
                s[center] = s[center - 1].max(s[center + 1]);
            }
            for (i, &val) in s.iter().enumerate() {
                let r = start_r + i as i32 * dr;
                let c = start_c + i as i32 * dc;
                let here = Pos::new(r as u16, c as u16);
                let idx = r as usize * usize::from(self.config().cols) + c as usize;
                let free = self.grid_free(idx);
                let old = self.runs[target.index()][dir][idx];
                if old > 0 && (free || here == pos) {
                    self.bump_count(target, old, -1);
                }
                let new = old.max(val);
                self.runs[target.index()][dir][idx] = new;
                if new > 0 && free {
                    self.bump_count(target, new, 1);
                }
            }
        } else {
            s[center] = -1;
            if bw_open {
                self.forward_pass(&mut s, 0, backward - 1, start_r - dr, start_c - dc, dir, target);
            } else {
                for v in &mut s[..center] {
                    *v = -1;
                }
            }
            if fw_open {
                self.backward_pass(
                    &mut s,
                    backward + 1,
                    size as i32 - 1,
                    end_r + dr,
                    end_c + dc,
                    dir,
                    target,
                );
            } else {
                for v in &mut s[center + 1..] {
                    *v = -1;
                }
            }
            for (i, &val) in s.iter().enumerate() {
                let r = start_r + i as i32 * dr;
                let c = start_c + i as i32 * dc;
                let here = Pos::new(r as u16, c as u16);
                let idx = r as usize * usize::from(self.config().cols) + c as usize;
                let free = self.grid_free(idx);
                let old = self.runs[target.index()][dir][idx];
                if old > 0 && (free || here == pos) {
                    self.bump_count(target, old, -1);
                }
                if val > 0 && free {
                    self.bump_count(target, val, 1);
                }
                self.runs[target.index()][dir][idx] = val;
            }
        }
    }

    /// Rolling prefix-max over K-windows advancing along `dir`.
    ///
    /// Fills `s[lo..=hi]`, where the window for index `i` starts at the
    /// anchor plus `i - lo` steps. Stops early (carrying the best value seen)
    /// once a window would leave the board or cross a cell blocked for
    /// `target`. Callers guarantee the first window starts on the board.
    fn forward_pass(
        &self,
        s: &mut [i8],
        lo: i32,
        hi: i32,
        anchor_r: i32,
        anchor_c: i32,
        dir: usize,
        target: Player,
    ) {
        if lo > hi {
            return;
        }
        let (dr, dc) = DIRECTIONS[dir];
        let k = self.k() as i32;
        let blocker = target.opponent();

        let mut in_window = 0i8;
        let (mut r, mut c) = (anchor_r, anchor_c);
        for _ in 0..k {
            if !self.in_bounds(r, c) {
                break;
            }
            if self.occupant(r, c).is_some() {
                in_window += 1;
            }
            r += dr;
            c += dc;
        }
        s[lo as usize] = in_window;

        for i in lo + 1..=hi {
            let off = i - lo;
            let fr = anchor_r + (off + k - 1) * dr;
            let fc = anchor_c + (off + k - 1) * dc;
            if !self.in_bounds(fr, fc) || self.occupant(fr, fc) == Some(blocker) {
                let prev = s[(i - 1) as usize];
                for v in &mut s[i as usize..=hi as usize] {
                    *v = prev;
                }
                return;
            }
            let lr = anchor_r + (off - 1) * dr;
            let lc = anchor_c + (off - 1) * dc;
            if self.occupant(lr, lc).is_some() {
                in_window -= 1;
            }
            if self.occupant(fr, fc).is_some() {
                in_window += 1;
            }
            s[i as usize] = in_window.max(s[(i - 1) as usize]);
        }
    }

    /// Mirror of [`Board::forward_pass`]: K-windows retreating along `dir`.
    ///
    /// Fills `s[lo..=hi]`, where the window for index `i` ends at the anchor
    /// minus `hi - i` steps.
    fn backward_pass(
        &self,
        s: &mut [i8],
        lo: i32,
        hi: i32,
        anchor_r: i32,
        anchor_c: i32,
        dir: usize,
        target: Player,
    ) {
        if lo > hi {
            return;
        }
        let (dr, dc) = DIRECTIONS[dir];
        let k = self.k() as i32;
        let blocker = target.opponent();

        let mut in_window = 0i8;
        let (mut r, mut c) = (anchor_r, anchor_c);
        for _ in 0..k {
            if !self.in_bounds(r, c) {
                break;
            }
            if self.occupant(r, c).is_some() {
                in_window += 1;
            }
            r -= dr;
            c -= dc;
        }
        s[hi as usize] = in_window;

        for i in (lo..hi).rev() {
            let off = hi - i;
            let fr = anchor_r - (off + k - 1) * dr;
            let fc = anchor_c - (off + k - 1) * dc;
            if !self.in_bounds(fr, fc) || self.occupant(fr, fc) == Some(blocker) {
                let prev = s[(i + 1) as usize];
                for v in &mut s[lo as usize..=i as usize] {
                    *v = prev;
                }
                return;
            }
            let lr = anchor_r - (off - 1) * dr;
            let lc = anchor_c - (off - 1) * dc;
            if self.occupant(lr, lc).is_some() {
                in_window -= 1;
            }
            if self.occupant(fr, fc).is_some() {
                in_window += 1;
            }
            s[i as usize] = in_window.max(s[(i + 1) as usize]);
        }
    }
}
