//! Search-tree nodes and their expansion order

use std::cmp::Ordering;

use crate::board::{LineSignal, Pos};

/// One candidate move in the search tree.
///
/// `sig` holds both players' line signals at the cell with the engine side in
/// slot 0. `is_mine` states whether the move is the engine's own, which also
/// fixes whose turn follows below this node. After expansion `score` holds
/// the backed-up evaluation and `best_child` the principal reply.
#[derive(Debug, Clone)]
pub struct Node {
    pub cell: Pos,
    pub is_mine: bool,
    pub depth: u32,
    pub critical: bool,
    pub score: i64,
    pub best_child: Option<Box<Node>>,
    sig: [LineSignal; 2],
    /// Slot holding the strictly larger `max_run`; ties go to the opponent.
    max_slot: usize,
}

impl Node {
    #[must_use]
    pub fn new(cell: Pos, depth: u32, is_mine: bool, critical: bool, sig: [LineSignal; 2]) -> Self {
        let max_slot = if sig[0].max_run > sig[1].max_run { 0 } else { 1 };
        Self {
            cell,
            is_mine,
            depth,
            critical,
            score: 0,
            best_child: None,
            sig,
            max_slot,
        }
    }

    /// The dominant run length at this cell, either player's.
    #[inline]
    fn abs_max(&self) -> i8 {
        self.sig[self.max_slot].max_run
    }

    /// Both players' direction sums combined.
    #[inline]
    fn total_sum(&self) -> i32 {
        self.sig[0].dir_sum + self.sig[1].dir_sum
    }

    /// Whether the side that moves after this node owns the dominant run.
    #[inline]
    fn next_owns_max(&self, next_slot: usize) -> bool {
        self.sig[next_slot].max_run == self.abs_max()
    }

    /// Turn-rule tiebreak shared by both ordering branches.
    ///
    /// A node whose next mover owns the dominant run can extend it
    /// immediately, so it ranks higher. When both or neither do, the nodes
    /// stay tied at this criterion.
    fn turn_rule(&self, other: &Self) -> Option<Ordering> {
        let next_slot = usize::from(self.is_mine);
        let a = self.next_owns_max(next_slot);
        let b = other.next_owns_max(next_slot);
        if a == b {
            None
        } else if a {
            Some(Ordering::Greater)
        } else {
            Some(Ordering::Less)
        }
    }
}

/// Expansion priority, `Greater` = expand first.
///
/// Critical nodes outrank quiet ones. Among critical nodes the order is
/// dominant run, then the turn rule, then combined direction sums; among
/// quiet nodes it is combined sums, then dominant run, then the turn rule.
impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.critical, other.critical) {
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (true, true) => match self.abs_max().cmp(&other.abs_max()) {
                Ordering::Equal => self
                    .turn_rule(other)
                    .unwrap_or_else(|| self.total_sum().cmp(&other.total_sum())),
                ord => ord,
            },
            (false, false) => match self.total_sum().cmp(&other.total_sum()) {
                Ordering::Equal => match self.abs_max().cmp(&other.abs_max()) {
                    Ordering::Equal => self.turn_rule(other).unwrap_or(Ordering::Equal),
                    ord => ord,
                },
                ord => ord,
            },
        }
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Node {}
