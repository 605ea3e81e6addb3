//! Simulation worker that owns the authoritative [`Engine`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), executes
//! them one at a time and publishes [`GameEvent`] notifications. Being the
//! only owner of the engine makes this loop the serialization point for
//! every mutation and every query.

use std::collections::BTreeSet;

use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, warn};

use tactics_core::{
    Action, ActionResult, Engine, ErrorSeverity, GameError, ModifierInstance, MovementCloud,
    PlayerId, Position, UnitId, World,
};

use crate::api::{GameEvent, Result};

/// Read-only inspection run on the worker.
pub type Inspect = Box<dyn FnOnce(&Engine) + Send>;

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Run an action through the engine.
    Execute {
        action: Action,
        reply: oneshot::Sender<Result<ActionResult>>,
    },
    /// Begin `player`'s turn.
    StartTurn {
        player: PlayerId,
        reply: oneshot::Sender<Result<Vec<ModifierInstance>>>,
    },
    /// Announce the end of `player`'s turn.
    EndTurn { player: PlayerId },
    /// Compute and cache a movement search.
    MovementCloud {
        unit: UnitId,
        reply: oneshot::Sender<Result<MovementCloud>>,
    },
    /// Path from the cached movement search.
    Path {
        unit: UnitId,
        destination: Position,
        reply: oneshot::Sender<Result<Vec<Position>>>,
    },
    /// Clone of the current world.
    Snapshot { reply: oneshot::Sender<World> },
    Inspect(Inspect),
}

/// Background task that processes gameplay commands.
pub struct SimulationWorker {
    engine: Engine,
    command_rx: mpsc::Receiver<Command>,
    event_tx: broadcast::Sender<GameEvent>,
}

impl SimulationWorker {
    pub fn new(
        engine: Engine,
        command_rx: mpsc::Receiver<Command>,
        event_tx: broadcast::Sender<GameEvent>,
    ) -> Self {
        Self {
            engine,
            command_rx,
            event_tx,
        }
    }

    /// Main worker loop. Ends once every handle is dropped.
    pub async fn run(mut self) {
        while let Some(command) = self.command_rx.recv().await {
            self.handle_command(command);
        }
        debug!(target: "runtime::worker", "command channel closed, worker stopping");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Execute { action, reply } => {
                let result = self.execute(action);
                let _ = reply.send(result);
            }
            Command::StartTurn { player, reply } => {
                let result = self.start_turn(player);
                let _ = reply.send(result);
            }
            Command::EndTurn { player } => {
                let _ = self.event_tx.send(GameEvent::TurnEnded { player });
            }
            Command::MovementCloud { unit, reply } => {
                let result = self.engine.movement_cloud(unit).cloned();
                let _ = reply.send(result.map_err(Into::into));
            }
            Command::Path {
                unit,
                destination,
                reply,
            } => {
                let _ = reply.send(self.engine.path(unit, destination).map_err(Into::into));
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.engine.world().clone());
            }
            Command::Inspect(inspect) => inspect(&self.engine),
        }
    }

    fn start_turn(&mut self, player: PlayerId) -> Result<Vec<ModifierInstance>> {
        let expired = self.engine.start_turn(player)?;
        let _ = self.event_tx.send(GameEvent::TurnStarted {
            player,
            expired: expired.len(),
        });
        Ok(expired)
    }

    fn execute(&mut self, action: Action) -> Result<ActionResult> {
        let alive_before = self.alive_players();

        match self.engine.execute(&action) {
            Ok(result) => {
                let _ = self.event_tx.send(GameEvent::ActionExecuted {
                    action,
                    result: result.clone(),
                });
                for player in alive_before.difference(&self.alive_players()) {
                    info!(target: "runtime::worker", %player, "player eliminated");
                    let _ = self
                        .event_tx
                        .send(GameEvent::PlayerEliminated { player: *player });
                }
                Ok(result)
            }
            Err(error) => {
                let severity = error.severity();
                if severity == ErrorSeverity::Rejected {
                    debug!(
                        target: "runtime::worker",
                        action = action.as_str(),
                        code = error.error_code(),
                        %error,
                        "action rejected"
                    );
                } else {
                    warn!(
                        target: "runtime::worker",
                        action = action.as_str(),
                        code = error.error_code(),
                        %error,
                        "action failed an invariant"
                    );
                }
                let _ = self.event_tx.send(GameEvent::ActionFailed {
                    action,
                    severity,
                    code: error.error_code(),
                    error: error.to_string(),
                });
                Err(error.into())
            }
        }
    }

    fn alive_players(&self) -> BTreeSet<PlayerId> {
        self.engine
            .world()
            .players()
            .iter()
            .filter(|player| player.is_alive())
            .map(|player| player.id())
            .collect()
    }
}
