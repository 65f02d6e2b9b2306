use std::time::Duration;

use super::*;
use crate::config::GameConfig;
use crate::error::EngineError;

fn cfg(rows: u16, cols: u16, k: u8, first: bool) -> GameConfig {
    GameConfig::new(rows, cols, k, first, Duration::from_secs(60)).unwrap()
}

fn board(rows: u16, cols: u16, k: u8) -> Board {
    Board::new(cfg(rows, cols, k, true))
}

/// Every observable component of the tracker, for exact-undo comparisons.
fn observe(b: &Board) -> (Vec<Option<Player>>, Vec<i8>, Vec<u32>, Vec<Pos>, GameStatus) {
    let mut grid = Vec::new();
    let mut runs = Vec::new();
    for r in 0..b.config().rows {
        for c in 0..b.config().cols {
            let pos = Pos::new(r, c);
            grid.push(b.at(pos));
            for player in Player::BOTH {
                for dir in 0..NUM_DIRECTIONS {
                    runs.push(b.run_len(player, dir, pos));
                }
            }
        }
    }
    let counts = Player::BOTH
        .iter()
        .flat_map(|&p| b.run_counts(p).to_vec())
        .collect();
    let mut frontier: Vec<Pos> = b.frontier().collect();
    frontier.sort();
    (grid, runs, counts, frontier, b.status())
}

/// Reference run length: max marks of `player` over all in-bounds K-windows
/// through `pos` that contain no opposing mark. `None` when no window fits.
fn naive_run(b: &Board, player: Player, dir: usize, pos: Pos) -> Option<i8> {
    let k = b.k() as i32;
    let (dr, dc) = DIRECTIONS[dir];
    let mut best: Option<i8> = None;
    for off in (1 - k)..=0 {
        let mut marks = 0i8;
        let mut fits = true;
        for j in 0..k {
            let r = i32::from(pos.row) + (off + j) * dr;
            let c = i32::from(pos.col) + (off + j) * dc;
            if !b.in_bounds(r, c) {
                fits = false;
                break;
            }
            match b.occupant(r, c) {
                Some(q) if q == player => marks += 1,
                Some(_) => {
                    fits = false;
                    break;
                }
                None => {}
            }
        }
        if fits {
            best = Some(best.map_or(marks, |v| v.max(marks)));
        }
    }
    best
}

fn assert_runs_match_reference(b: &Board) {
    for r in 0..b.config().rows {
        for c in 0..b.config().cols {
            let pos = Pos::new(r, c);
            if !b.is_free(pos) {
                continue;
            }
            for player in Player::BOTH {
                for dir in 0..NUM_DIRECTIONS {
                    let stored = b.run_len(player, dir, pos);
                    match naive_run(b, player, dir, pos) {
                        Some(expected) => assert_eq!(
                            stored, expected,
                            "run mismatch at ({r},{c}) player {player:?} dir {dir}"
                        ),
                        None => assert!(
                            stored <= 0,
                            "blocked cell ({r},{c}) player {player:?} dir {dir} holds {stored}"
                        ),
                    }
                }
            }
        }
    }
}

#[test]
fn test_empty_board_state() {
    let b = board(5, 5, 3);
    assert_eq!(b.status(), GameStatus::Open);
    assert_eq!(b.to_move(), Player::One);
    assert_eq!(b.free_count(), 25);
    assert_eq!(b.frontier().count(), 0, "empty board has an empty frontier");
}

#[test]
fn test_mark_errors() {
    let mut b = board(3, 3, 3);
    assert!(matches!(
        b.mark(Pos::new(3, 0)),
        Err(EngineError::OutOfBounds { .. })
    ));
    b.mark(Pos::new(1, 1)).unwrap();
    assert!(matches!(
        b.mark(Pos::new(1, 1)),
        Err(EngineError::CellOccupied { .. })
    ));
}

#[test]
fn test_unmark_empty_is_error() {
    let mut b = board(3, 3, 3);
    assert_eq!(b.unmark(), Err(EngineError::NothingToUndo));
}

#[test]
fn test_unmark_past_commit_is_error() {
    let mut b = board(3, 3, 3);
    b.mark(Pos::new(1, 1)).unwrap();
    b.commit().unwrap();
    assert_eq!(b.unmark(), Err(EngineError::NothingToUndo));
    // A fresh mark is undoable again.
    b.mark(Pos::new(0, 0)).unwrap();
    b.unmark().unwrap();
    assert!(b.is_free(Pos::new(0, 0)));
}

#[test]
fn test_mark_after_game_over_is_error() {
    let mut b = board(3, 3, 3);
    for pos in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)] {
        b.mark(Pos::new(pos.0, pos.1)).unwrap();
    }
    assert_eq!(b.status(), GameStatus::Won(Player::One));
    assert_eq!(b.mark(Pos::new(2, 2)), Err(EngineError::GameOver));
}

#[test]
fn test_to_move_alternates() {
    let mut b = board(3, 3, 3);
    assert_eq!(b.to_move(), Player::One);
    b.mark(Pos::new(0, 0)).unwrap();
    assert_eq!(b.to_move(), Player::Two);
    b.mark(Pos::new(1, 1)).unwrap();
    assert_eq!(b.to_move(), Player::One);
    b.unmark().unwrap();
    assert_eq!(b.to_move(), Player::Two);
}

#[test]
fn test_undo_exactness_at_every_depth() {
    let mut b = board(5, 5, 4);
    let script = [(2, 2), (1, 1), (2, 3), (1, 3), (2, 1), (3, 3)];
    for &(r, c) in &script {
        let before = observe(&b);
        b.mark(Pos::new(r, c)).unwrap();
        b.unmark().unwrap();
        assert_eq!(observe(&b), before, "mark/unmark of ({r},{c}) not exact");
        b.mark(Pos::new(r, c)).unwrap();
    }
    // Rewind the whole game and compare against a fresh board.
    for _ in 0..script.len() {
        b.unmark().unwrap();
    }
    assert_eq!(observe(&b), observe(&board(5, 5, 4)));
}

#[test]
fn test_frontier_matches_adjacency_definition() {
    let mut b = board(5, 5, 4);
    for &(r, c) in &[(2, 2), (0, 0), (2, 3), (4, 4), (1, 2)] {
        b.mark(Pos::new(r, c)).unwrap();
        for rr in 0..5u16 {
            for cc in 0..5u16 {
                let pos = Pos::new(rr, cc);
                let expected = b.is_free(pos) && {
                    let mut marked_neighbor = false;
                    for dr in -1..=1i32 {
                        for dc in -1..=1i32 {
                            if dr == 0 && dc == 0 {
                                continue;
                            }
                            let r = i32::from(rr) + dr;
                            let c = i32::from(cc) + dc;
                            if b.occupant(r, c).is_some() {
                                marked_neighbor = true;
                            }
                        }
                    }
                    marked_neighbor
                };
                assert_eq!(
                    b.frontier().any(|p| p == pos),
                    expected,
                    "frontier wrong at ({rr},{cc})"
                );
            }
        }
    }
}

#[test]
fn test_runs_match_reference_through_game() {
    let mut b = board(7, 7, 4);
    let script = [
        (3, 3),
        (3, 4),
        (4, 3),
        (2, 3),
        (5, 3),
        (6, 3),
        (4, 4),
        (2, 2),
        (5, 5),
        (1, 1),
        (0, 6),
        (3, 2),
    ];
    for &(r, c) in &script {
        b.mark(Pos::new(r, c)).unwrap();
        assert_runs_match_reference(&b);
    }
    for _ in 0..4 {
        b.unmark().unwrap();
        assert_runs_match_reference(&b);
    }
}

#[test]
fn test_runs_near_edges_match_reference() {
    let mut b = board(4, 6, 3);
    for &(r, c) in &[(0, 0), (0, 1), (3, 5), (0, 2), (1, 0), (3, 4), (2, 0)] {
        b.mark(Pos::new(r, c)).unwrap();
        assert_runs_match_reference(&b);
    }
}

#[test]
fn test_score_win_sentinels() {
    // Player One completes the top row.
    let script = [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)];

    let mut b = Board::new(cfg(3, 3, 3, true)); // engine is One
    for &(r, c) in &script {
        b.mark(Pos::new(r, c)).unwrap();
    }
    assert_eq!(b.status(), GameStatus::Won(Player::One));
    assert_eq!(b.score(), i64::MAX);

    let mut b = Board::new(cfg(3, 3, 3, false)); // engine is Two
    for &(r, c) in &script {
        b.mark(Pos::new(r, c)).unwrap();
    }
    assert_eq!(b.score(), i64::MIN);
}

#[test]
fn test_score_draw_is_zero() {
    // X O X / X O O / O X X - a full board with no 3-run.
    let script = [
        (0, 0),
        (0, 1),
        (0, 2),
        (1, 1),
        (1, 0),
        (1, 2),
        (2, 1),
        (2, 0),
        (2, 2),
    ];
    let mut b = board(3, 3, 3);
    for &(r, c) in &script {
        b.mark(Pos::new(r, c)).unwrap();
    }
    assert_eq!(b.status(), GameStatus::Draw);
    assert_eq!(b.score(), 0);
}

#[test]
fn test_score_antisymmetry() {
    // Same open position, seen from either side: scores negate.
    let script = [(1, 1), (0, 0), (1, 2), (3, 3), (2, 2)];
    let mut mine = Board::new(cfg(5, 5, 4, true));
    let mut theirs = Board::new(cfg(5, 5, 4, false));
    for &(r, c) in &script {
        mine.mark(Pos::new(r, c)).unwrap();
        theirs.mark(Pos::new(r, c)).unwrap();
    }
    assert_eq!(mine.status(), GameStatus::Open);
    assert_eq!(mine.score(), -theirs.score());
    assert_ne!(mine.score(), 0);
}

#[test]
fn test_move_signal_after_center_mark() {
    // 3x3, engine second; the opponent (One) takes the center. The cell
    // above it carries a vertical run of 1 for the opponent and sits in the
    // frontier.
    let mut b = Board::new(cfg(3, 3, 3, false));
    b.mark(Pos::new(1, 1)).unwrap();

    let sig = b.move_signal(Pos::new(0, 1));
    let opp = sig[Player::One.index()];
    assert_eq!(opp.max_run, 1);
    assert_eq!(opp.best_dir, 1, "vertical direction holds the best run");
    assert!(b.frontier().any(|p| p == Pos::new(0, 1)));
}

#[test]
fn test_counters_exact_after_double_mark_unmark() {
    let mut b = board(5, 5, 4);
    b.mark(Pos::new(2, 2)).unwrap();
    b.mark(Pos::new(2, 3)).unwrap();
    let before: Vec<Vec<u32>> = Player::BOTH
        .iter()
        .map(|&p| b.run_counts(p).to_vec())
        .collect();

    for _ in 0..2 {
        b.mark(Pos::new(1, 1)).unwrap();
        b.unmark().unwrap();
    }

    let after: Vec<Vec<u32>> = Player::BOTH
        .iter()
        .map(|&p| b.run_counts(p).to_vec())
        .collect();
    assert_eq!(before, after);
}

#[test]
fn test_with_move_releases_on_error() {
    let mut b = board(3, 3, 3);
    b.mark(Pos::new(1, 1)).unwrap();
    let cell = Pos::new(0, 0);
    let res: Result<(), EngineError> =
        b.with_move(cell, |_| Err(EngineError::NoMoveAvailable));
    assert_eq!(res, Err(EngineError::NoMoveAvailable));
    assert!(b.is_free(cell), "with_move must unmark on the error path");
    assert_eq!(b.to_move(), Player::Two);
}

#[test]
fn test_blocked_runs_report_sentinel() {
    // Two marks K-1 apart with an opposing mark in between: the opposing
    // mark invalidates every window that spanned it.
    let mut b = board(5, 5, 3);
    b.mark(Pos::new(2, 0)).unwrap(); // One
    b.mark(Pos::new(2, 2)).unwrap(); // Two, blocks One horizontally
    let sig = b.move_signal(Pos::new(2, 1));
    // For One, the horizontal window (2,0)..(2,2) holds Two's mark; the
    // only surviving window would need (2,-1), so horizontal is blocked.
    assert_eq!(b.run_len(Player::One, 0, Pos::new(2, 1)), -1);
    // The cell still carries One's runs in other directions.
    assert!(sig[Player::One.index()].max_run >= 0);
}
