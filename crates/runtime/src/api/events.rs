//! Events emitted during simulation for front-ends to observe.
//!
//! Consumers subscribe to [`GameEvent`] to react to state changes without
//! blocking the worker loop.
use tactics_core::{Action, ActionResult, ErrorSeverity, PlayerId};

/// Events emitted by the runtime during a match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A player's turn began; `expired` modifiers were dropped by the tick.
    TurnStarted { player: PlayerId, expired: usize },
    /// An action went through the engine
    ActionExecuted {
        action: Action,
        result: ActionResult,
    },
    /// The engine refused an action
    ActionFailed {
        action: Action,
        severity: ErrorSeverity,
        code: &'static str,
        error: String,
    },
    /// A player lost its commander
    PlayerEliminated { player: PlayerId },
    /// A player's turn ended
    TurnEnded { player: PlayerId },
}
