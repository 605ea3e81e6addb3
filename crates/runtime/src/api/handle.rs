//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! acting, querying the engine and streaming events.
use tokio::sync::{broadcast, mpsc, oneshot};

use tactics_core::{
    Action, ActionResult, Engine, ModifierInstance, MovementCloud, PlayerId, Position, UnitId,
    World,
};

use super::errors::{Result, RuntimeError};
use super::events::GameEvent;
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_tx: broadcast::Sender<GameEvent>,
}

impl RuntimeHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_tx: broadcast::Sender<GameEvent>,
    ) -> Self {
        Self {
            command_tx,
            event_tx,
        }
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(command(reply_tx)).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Execute an action through the engine
    pub async fn execute(&self, action: Action) -> Result<ActionResult> {
        self.request(|reply| Command::Execute { action, reply })
            .await?
    }

    /// Begin a player's turn: tick modifiers and refill its units
    pub async fn start_turn(&self, player: PlayerId) -> Result<Vec<ModifierInstance>> {
        self.request(|reply| Command::StartTurn { player, reply })
            .await?
    }

    pub async fn end_turn(&self, player: PlayerId) -> Result<()> {
        self.send(Command::EndTurn { player }).await
    }

    /// Compute (and cache on the worker) a unit's movement search
    pub async fn movement_cloud(&self, unit: UnitId) -> Result<MovementCloud> {
        self.request(|reply| Command::MovementCloud { unit, reply })
            .await?
    }

    /// Path from the most recent [`RuntimeHandle::movement_cloud`] call
    pub async fn path(&self, unit: UnitId, destination: Position) -> Result<Vec<Position>> {
        self.request(|reply| Command::Path {
            unit,
            destination,
            reply,
        })
        .await?
    }

    /// Query the current world (read-only snapshot)
    pub async fn snapshot(&self) -> Result<World> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Run a read-only query against the engine on the worker
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let zone = handle.inspect(move |engine| engine.danger_zone(unit)).await??;
    /// ```
    pub async fn inspect<T, F>(&self, query: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Engine) -> T + Send + 'static,
    {
        self.request(|reply| {
            Command::Inspect(Box::new(move |engine: &Engine| {
                let _ = reply.send(query(engine));
            }))
        })
        .await
    }

    /// Subscribe to game events
    pub fn subscribe_events(&self) -> broadcast::Receiver<GameEvent> {
        self.event_tx.subscribe()
    }
}
