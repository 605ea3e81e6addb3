//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, the rules engine and
//! configuration so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use tactics_core::{EngineError, ErrorSeverity, GameError, PlayerId};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("match aborted")]
    Aborted,

    #[error("invalid runtime configuration")]
    Config(#[from] ron::error::SpannedError),

    #[error("runtime requires a world before building")]
    MissingWorld,

    #[error("no action provider registered for player {0}")]
    ProviderNotSet(PlayerId),
}

impl RuntimeError {
    /// True when the engine refused an action without mutating anything; the
    /// caller may offer a different one.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Engine(err) if err.severity() == ErrorSeverity::Rejected)
    }
}
