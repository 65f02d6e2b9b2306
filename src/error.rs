//! Error types for the engine

use thiserror::Error;

/// Errors raised by the board tracker and the engine.
///
/// Coordinate and state-transition errors signal precondition violations by
/// the caller; within a well-formed game they should never arise from
/// legitimate play.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A cell outside the `rows` x `cols` grid was addressed.
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} board")]
    OutOfBounds { row: u16, col: u16, rows: u16, cols: u16 },

    /// Attempted to mark a cell that is already occupied.
    #[error("cell ({row}, {col}) is already marked")]
    CellOccupied { row: u16, col: u16 },

    /// Attempted to mark a cell after the game has ended.
    #[error("game is already over")]
    GameOver,

    /// `unmark` was called with no undoable mark on the stack.
    #[error("no move to undo")]
    NothingToUndo,

    /// The engine was asked for a move but none exists.
    #[error("no legal move available")]
    NoMoveAvailable,

    /// The game is in progress but no opponent move was supplied.
    #[error("missing opponent move for an in-progress game")]
    MissingOpponentMove,

    /// Rejected game parameters.
    #[error("invalid game configuration: {0}")]
    InvalidConfig(String),
}
