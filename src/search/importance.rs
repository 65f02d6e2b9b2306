//! Threat classification for candidate cells
//!
//! A candidate is critical when a run of K-1 touches it, and speculatively
//! critical when a K-2 run does and short probing shows the threat is about
//! to resolve. Probes mark and unmark on the same board the search uses;
//! every probe is fully undone before returning.

use crate::board::{Board, LineSignal, Player, Pos, DIRECTIONS, NUM_DIRECTIONS};
use crate::error::EngineError;

/// Classify a candidate cell as critical or quiet.
///
/// `sig` is the engine-first signal pair at `cell` and `is_mine` whether the
/// candidate move would be the engine's own. A dominant run of K-1 or more is
/// always critical; exactly K-2 defers to the probing rules below; anything
/// shorter is quiet.
pub(crate) fn classify(
    board: &mut Board,
    sig: &[LineSignal; 2],
    is_mine: bool,
    cell: Pos,
) -> Result<bool, EngineError> {
    let k = board.k() as i8;
    let abs_max = sig[0].max_run.max(sig[1].max_run);
    if abs_max >= k - 1 {
        return Ok(true);
    }
    if abs_max == k - 2 {
        return determine(board, sig, is_mine, cell);
    }
    Ok(false)
}

/// Resolve the K-2 borderline by probing.
///
/// When the dominant run belongs to the side about to place this candidate,
/// the cell is probed directly: it stays critical if the threat survives the
/// placement, or if it is a double threat that the placement resolves. When
/// the dominant run belongs to the replying side, the threat can only be
/// tested two plies out: a neutral filler move stands in for the candidate's
/// turn before the probe. With one free cell left, or no filler that keeps
/// the game open, the cell is critical outright.
fn determine(
    board: &mut Board,
    sig: &[LineSignal; 2],
    is_mine: bool,
    cell: Pos,
) -> Result<bool, EngineError> {
    let max_slot = if sig[0].max_run >= sig[1].max_run { 0 } else { 1 };
    if board.free_count() <= 1 {
        return Ok(true);
    }

    let next_slot = usize::from(is_mine);
    let threat = slot_player(board, max_slot);
    let best_dir = sig[max_slot].best_dir;
    let max_run = sig[max_slot].max_run;

    if max_slot != next_slot {
        // The candidate's own side holds the threat.
        let double = is_double_move(board, cell, max_run);
        let vanished =
            board.with_move(cell, |b| Ok(threat_vanished(b, cell, threat, best_dir, max_run)))?;
        return Ok((double && vanished) || !vanished);
    }

    // The replying side holds the threat. Insert a filler move so the probe
    // lands on the right turn.
    let free: Vec<Pos> = board.free_cells().collect();
    let mut filler = None;
    for cand in free {
        if cand == cell {
            continue;
        }
        let status = board.mark(cand)?;
        board.unmark()?;
        if status.is_open() {
            filler = Some(cand);
            break;
        }
    }
    let Some(filler) = filler else {
        // Every filler ends the game; treat the cell as critical.
        return Ok(true);
    };

    let double = is_double_move(board, cell, sig[0].max_run);
    board.mark(filler)?;
    let vanished = board.with_move(cell, |b| {
        Ok(threat_vanished(b, cell, threat, best_dir, max_run))
    })?;
    board.unmark()?;
    Ok(double || !vanished)
}

/// Whether a run of exactly `max_run` touches `cell` in two or more
/// player-direction slots.
fn is_double_move(board: &Board, cell: Pos, max_run: i8) -> bool {
    let mut seen = false;
    for player in Player::BOTH {
        for dir in 0..NUM_DIRECTIONS {
            if board.run_len(player, dir, cell) == max_run {
                if seen {
                    return true;
                }
                seen = true;
            }
        }
    }
    false
}

/// Whether marking `cell` removed the threat run from its direction.
///
/// The run survives if either neighbor of `cell` along `dir` still carries
/// run length `val` for the threatened player.
fn threat_vanished(board: &Board, cell: Pos, threat: Player, dir: usize, val: i8) -> bool {
    let (dr, dc) = DIRECTIONS[dir];
    for sign in [1i32, -1] {
        let r = i32::from(cell.row) + sign * dr;
        let c = i32::from(cell.col) + sign * dc;
        if board.in_bounds(r, c) && board.run_len(threat, dir, Pos::new(r as u16, c as u16)) == val
        {
            return false;
        }
    }
    true
}

/// Engine-first slot to player mapping.
fn slot_player(board: &Board, slot: usize) -> Player {
    if slot == 0 {
        board.config().me
    } else {
        board.config().opponent()
    }
}
