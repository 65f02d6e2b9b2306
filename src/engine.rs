//! Turn-level driver: applies opponent moves, searches, commits replies
//!
//! The engine owns the only board of the game and mutates it permanently
//! twice per turn, once for the opponent's move and once for its own. Search
//! happens in between on the same board; the mark/unmark discipline of the
//! searcher guarantees the board is back at the root position before the
//! reply is committed.

use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::board::{Board, GameStatus, Pos};
use crate::config::GameConfig;
use crate::error::EngineError;
use crate::search::importance::classify;
use crate::search::{me_signal, Node, Searcher};

/// Wall-clock slack kept in reserve when deriving the search deadline from
/// the per-move budget.
const TIME_MARGIN: Duration = Duration::from_millis(1000);

/// A complete player for one m,n,k game.
pub struct Engine {
    cfg: GameConfig,
    board: Board,
    root: Option<Node>,
}

impl Engine {
    #[must_use]
    pub fn new(cfg: GameConfig) -> Self {
        Self {
            cfg,
            board: Board::new(cfg),
            root: None,
        }
    }

    /// The engine's view of the game.
    #[inline]
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Current game status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.board.status()
    }

    /// Pick and play the engine's next move.
    ///
    /// `opponent_move` is the opponent's latest move, or `None` on the very
    /// first call when the engine opens the game; the opening move is the
    /// center cell, played without searching. Both the opponent's move and
    /// the returned reply are marked permanently on the internal board.
    ///
    /// # Errors
    ///
    /// Fails when the opponent's move is missing or invalid, or when the
    /// game is already over.
    pub fn select_cell(&mut self, opponent_move: Option<Pos>) -> Result<Pos, EngineError> {
        let deadline = Instant::now() + self.cfg.time_budget.saturating_sub(TIME_MARGIN);

        if self.root.is_none() {
            return self.open_game(opponent_move, deadline);
        }

        let opp = opponent_move.ok_or(EngineError::MissingOpponentMove)?;
        self.advance(opp, false)?;
        self.search_and_reply(deadline)
    }

    /// First call of the game: either open at the center without searching,
    /// or answer the opponent's opening.
    fn open_game(
        &mut self,
        opponent_move: Option<Pos>,
        deadline: Instant,
    ) -> Result<Pos, EngineError> {
        match opponent_move {
            None => {
                if self.cfg.me != self.board.to_move() {
                    return Err(EngineError::MissingOpponentMove);
                }
                let center = self.cfg.center();
                let node = self.make_node(center, 0, true)?;
                self.board.mark(center)?;
                self.board.commit()?;
                self.root = Some(node);
                info!("opening at the center {:?}", center);
                Ok(center)
            }
            Some(opp) => {
                let node = self.make_node(opp, 0, false)?;
                self.board.mark(opp)?;
                self.board.commit()?;
                self.root = Some(node);
                self.search_and_reply(deadline)
            }
        }
    }

    /// Mark a move permanently and make it the new root.
    fn advance(&mut self, cell: Pos, is_mine: bool) -> Result<(), EngineError> {
        let depth = self.root.as_ref().map_or(0, |r| r.depth + 1);
        let node = self.make_node(cell, depth, is_mine)?;
        self.board.mark(cell)?;
        self.board.commit()?;
        self.root = Some(node);
        Ok(())
    }

    /// Search below the current root and play the move it recommends.
    fn search_and_reply(&mut self, deadline: Instant) -> Result<Pos, EngineError> {
        let mut root = self.root.take().ok_or(EngineError::NoMoveAvailable)?;
        let mut searcher = Searcher::new(deadline);
        let score = searcher.run(&mut self.board, &mut root)?;
        debug!(
            "searched {} nodes below {:?}, score {}",
            searcher.nodes(),
            root.cell,
            score
        );

        let cell = match root.best_child.take() {
            Some(best) => best.cell,
            None => {
                // Deadline hit at the root; fall back to any playable cell.
                warn!("search produced no candidate, falling back");
                self.board
                    .frontier()
                    .min()
                    .or_else(|| self.board.free_cells().next())
                    .ok_or(EngineError::NoMoveAvailable)?
            }
        };
        self.root = Some(root);
        self.advance(cell, true)?;
        info!("playing {:?} (score {})", cell, score);
        Ok(cell)
    }

    /// Build a root-line node for a move about to be marked.
    fn make_node(&mut self, cell: Pos, depth: u32, is_mine: bool) -> Result<Node, EngineError> {
        let sig = me_signal(&self.board, cell);
        let critical = classify(&mut self.board, &sig, is_mine, cell)?;
        Ok(Node::new(cell, depth, is_mine, critical, sig))
    }
}
