//! Depth-limited, deadline-bounded alpha-beta

use std::collections::BinaryHeap;
use std::time::Instant;

use log::trace;

use crate::board::Board;
use crate::error::EngineError;
use crate::search::importance::classify;
use crate::search::{me_signal, Node, DEFAULT_DEPTH};

/// One search invocation: a deadline, a depth limit and an optional beam
/// override.
///
/// The searcher walks the tree rooted at the move just played, marking and
/// unmarking candidates on the shared board. Levels below a node expand at
/// most `max(5, remaining + 1)` children (or the override), best first.
#[derive(Debug)]
pub struct Searcher {
    deadline: Instant,
    max_depth: u32,
    beam_override: Option<usize>,
    nodes: u64,
}

impl Searcher {
    #[must_use]
    pub fn new(deadline: Instant) -> Self {
        Self {
            deadline,
            max_depth: DEFAULT_DEPTH,
            beam_override: None,
            nodes: 0,
        }
    }

    /// Replace the default depth limit.
    #[must_use]
    pub fn with_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Fix the beam width at every level, overriding the depth-scaled cap.
    #[must_use]
    pub fn with_beam(mut self, beam: usize) -> Self {
        self.beam_override = Some(beam);
        self
    }

    /// Nodes visited by the last [`Searcher::run`].
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Search below `root`, whose move must already be marked on `board`.
    ///
    /// Fills in `root.score` and `root.best_child` and returns the score.
    /// The board comes back in the state it was given in.
    pub fn run(&mut self, board: &mut Board, root: &mut Node) -> Result<i64, EngineError> {
        self.nodes = 0;
        let depth = self.max_depth;
        self.alphabeta(board, root, i64::MIN, i64::MAX, depth)
    }

    fn beam(&self, remaining: u32) -> usize {
        self.beam_override
            .unwrap_or_else(|| (remaining as usize + 1).max(5))
    }

    /// A node is a leaf when the game is decided, the depth budget is spent,
    /// or the deadline has passed.
    fn is_leaf(&self, board: &Board, remaining: u32) -> bool {
        !board.status().is_open() || remaining == 0 || Instant::now() >= self.deadline
    }

    fn alphabeta(
        &mut self,
        board: &mut Board,
        n: &mut Node,
        mut alpha: i64,
        mut beta: i64,
        remaining: u32,
    ) -> Result<i64, EngineError> {
        self.nodes += 1;
        if self.is_leaf(board, remaining) {
            n.score = board.score();
            return Ok(n.score);
        }

        let mut queue = BinaryHeap::new();
        let candidates: Vec<_> = board.frontier().collect();
        for cell in candidates {
            let sig = me_signal(board, cell);
            let is_mine = !n.is_mine;
            let critical = classify(board, &sig, is_mine, cell)?;
            queue.push(Node::new(cell, n.depth + 1, is_mine, critical, sig));
        }
        if queue.is_empty() {
            // Open position with no frontier (empty board at search depth);
            // score it in place.
            n.score = board.score();
            return Ok(n.score);
        }

        // After the engine's move the opponent picks next, so the engine
        // maximizes below opponent nodes and minimizes below its own.
        let maximizing = !n.is_mine;
        let mut eval = if maximizing { i64::MIN } else { i64::MAX };
        let mut best: Option<Box<Node>> = None;
        for _ in 0..self.beam(remaining) {
            let Some(mut child) = queue.pop() else { break };
            board.mark(child.cell)?;
            let result = self.alphabeta(board, &mut child, alpha, beta, remaining - 1);
            board.unmark()?;
            let result = result?;
            if maximizing {
                if eval < result || (eval == result && best.is_none()) {
                    eval = result;
                    best = Some(Box::new(child));
                }
                alpha = alpha.max(eval);
            } else {
                if eval > result || (eval == result && best.is_none()) {
                    eval = result;
                    best = Some(Box::new(child));
                }
                beta = beta.min(eval);
            }
            if beta <= alpha {
                trace!("cutoff at depth {} after {} nodes", n.depth, self.nodes);
                break;
            }
        }
        n.score = eval;
        n.best_child = best;
        Ok(eval)
    }
}
