//! Asynchronous abstraction for sourcing player intent.
//!
//! Runtime users plug in [`ActionProvider`] implementations so a match can run
//! with human input, scripted fixtures, or AI policies. Providers only see a
//! [`WorldView`] and only return a decision; the runtime applies it.
use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, watch};
use tracing::debug;

use tactics_core::{Action, PlayerId, World};

use super::errors::{Result, RuntimeError};

/// Read-only snapshot handed to a provider.
#[derive(Debug, Clone)]
pub struct WorldView {
    pub player: PlayerId,
    pub world: World,
}

/// What a player wants to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    Act(Action),
    EndTurn,
}

/// Trait for providing decisions based on the current world.
///
/// Different implementations can handle:
/// - Player input (from UI/CLI)
/// - AI decisions
/// - Scripted/replayed actions
/// - Testing fixtures
#[async_trait]
pub trait ActionProvider: Send + Sync {
    /// Decide the next command for `view.player`.
    ///
    /// Must not mutate anything: the runtime applies the returned command.
    async fn decide(&self, view: &WorldView) -> Result<PlayerCommand>;
}

/// Always ends the turn. Useful for testing or as a fallback.
pub struct EndTurnProvider;

#[async_trait]
impl ActionProvider for EndTurnProvider {
    async fn decide(&self, _view: &WorldView) -> Result<PlayerCommand> {
        Ok(PlayerCommand::EndTurn)
    }
}

/// Replays a fixed list of commands, then ends every turn.
#[derive(Default)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<PlayerCommand>>,
}

impl ScriptedProvider {
    pub fn new(script: impl IntoIterator<Item = PlayerCommand>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
        }
    }
}

#[async_trait]
impl ActionProvider for ScriptedProvider {
    async fn decide(&self, _view: &WorldView) -> Result<PlayerCommand> {
        Ok(self
            .script
            .lock()
            .await
            .pop_front()
            .unwrap_or(PlayerCommand::EndTurn))
    }
}

/// Shared switch that cancels pending thinking delays.
#[derive(Debug, Clone)]
pub struct AbortSignal {
    tx: watch::Sender<bool>,
}

impl AbortSignal {
    pub fn new() -> Self {
        Self {
            tx: watch::Sender::new(false),
        }
    }

    pub fn abort(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_aborted(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for AbortSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Wraps a provider with a cancellable pause before each decision.
///
/// The pause and the wrapped decision race the abort signal; once aborted,
/// no command is emitted.
pub struct ThinkingDelay<P> {
    inner: P,
    delay: Duration,
    abort: watch::Receiver<bool>,
}

impl<P: ActionProvider> ThinkingDelay<P> {
    pub fn new(inner: P, delay: Duration, abort: &AbortSignal) -> Self {
        Self {
            inner,
            delay,
            abort: abort.subscribe(),
        }
    }
}

/// Resolves once the signal is raised. Never resolves if the signal was
/// dropped without being raised.
async fn aborted(mut abort: watch::Receiver<bool>) {
    if abort.wait_for(|raised| *raised).await.is_err() {
        std::future::pending::<()>().await;
    }
}

#[async_trait]
impl<P: ActionProvider> ActionProvider for ThinkingDelay<P> {
    async fn decide(&self, view: &WorldView) -> Result<PlayerCommand> {
        if *self.abort.borrow() {
            return Err(RuntimeError::Aborted);
        }
        let think = async {
            tokio::time::sleep(self.delay).await;
            self.inner.decide(view).await
        };
        tokio::select! {
            decision = think => decision,
            () = aborted(self.abort.clone()) => {
                debug!(player = %view.player, "thinking aborted");
                Err(RuntimeError::Aborted)
            }
        }
    }
}
