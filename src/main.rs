//! Self-play demo: two engines play one m,n,k game to completion.
//!
//! Usage: `mnk [rows cols win_len [budget_secs]]`, defaulting to 5 5 4 2.

use std::time::Duration;

use log::error;

use mnk::{Board, Engine, EngineError, GameConfig, GameStatus, Player, Pos};

fn parse_args() -> Result<(u16, u16, u8, u64), String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.len() {
        0 => Ok((5, 5, 4, 2)),
        3 | 4 => {
            let rows = args[0].parse().map_err(|_| format!("bad rows: {}", args[0]))?;
            let cols = args[1].parse().map_err(|_| format!("bad cols: {}", args[1]))?;
            let k = args[2].parse().map_err(|_| format!("bad win length: {}", args[2]))?;
            let secs = match args.get(3) {
                Some(s) => s.parse().map_err(|_| format!("bad budget: {s}"))?,
                None => 2,
            };
            Ok((rows, cols, k, secs))
        }
        _ => Err("usage: mnk [rows cols win_len [budget_secs]]".into()),
    }
}

fn render(board: &Board) -> String {
    let mut out = String::new();
    for r in 0..board.config().rows {
        for c in 0..board.config().cols {
            out.push(match board.at(Pos::new(r, c)) {
                Some(Player::One) => 'X',
                Some(Player::Two) => 'O',
                None => '.',
            });
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

fn play(rows: u16, cols: u16, k: u8, budget: Duration) -> Result<GameStatus, EngineError> {
    let mut first = Engine::new(GameConfig::new(rows, cols, k, true, budget)?);
    let mut second = Engine::new(GameConfig::new(rows, cols, k, false, budget)?);

    let mut last = first.select_cell(None)?;
    println!("X plays ({}, {})", last.row, last.col);
    let status = loop {
        last = second.select_cell(Some(last))?;
        println!("O plays ({}, {})\n{}", last.row, last.col, render(second.board()));
        if !second.status().is_open() {
            break second.status();
        }
        last = first.select_cell(Some(last))?;
        println!("X plays ({}, {})\n{}", last.row, last.col, render(first.board()));
        if !first.status().is_open() {
            break first.status();
        }
    };
    Ok(status)
}

fn main() {
    env_logger::init();

    let (rows, cols, k, secs) = match parse_args() {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };

    match play(rows, cols, k, Duration::from_secs(secs)) {
        Ok(GameStatus::Draw) => println!("draw"),
        Ok(GameStatus::Won(Player::One)) => println!("X wins"),
        Ok(GameStatus::Won(Player::Two)) => println!("O wins"),
        Ok(GameStatus::Open) => println!("game still open"),
        Err(err) => {
            error!("game aborted: {err}");
            std::process::exit(1);
        }
    }
}
