//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and drives turns by asking each player's [`ActionProvider`] for commands.

use std::collections::BTreeMap;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use tactics_core::{Engine, PcgRng, PlayerId, World};

use crate::api::{
    AbortSignal, ActionProvider, GameEvent, PlayerCommand, Result, RuntimeError, RuntimeHandle,
    WorldView,
};
use crate::config::RuntimeConfig;
use crate::workers::{Command, SimulationWorker};

/// Main runtime that orchestrates a match
///
/// Runtime owns the worker and the providers. [`RuntimeHandle`] provides a
/// cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    config: RuntimeConfig,

    // Action providers (injected by user), keyed by seat
    providers: BTreeMap<PlayerId, Box<dyn ActionProvider>>,
    abort: AbortSignal,

    worker: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Subscribe to game events
    pub fn subscribe_events(&self) -> broadcast::Receiver<GameEvent> {
        self.handle.subscribe_events()
    }

    /// Signal shared with [`ThinkingDelay`](crate::ThinkingDelay) wrappers
    /// and checked between commands.
    pub fn abort_signal(&self) -> AbortSignal {
        self.abort.clone()
    }

    /// Set (or replace) the provider for `player`
    pub fn set_provider(&mut self, player: PlayerId, provider: impl ActionProvider + 'static) {
        self.providers.insert(player, Box::new(provider));
    }

    /// Play one full turn for `player`.
    ///
    /// Rejected actions are reported through events and the provider is asked
    /// again. An action that fails an invariant closes the turn.
    pub async fn play_turn(&self, player: PlayerId) -> Result<()> {
        let provider = self
            .providers
            .get(&player)
            .ok_or(RuntimeError::ProviderNotSet(player))?;

        self.handle.start_turn(player).await?;

        for _ in 0..self.config.max_commands_per_turn {
            if self.abort.is_aborted() {
                return Err(RuntimeError::Aborted);
            }

            let world = self.handle.snapshot().await?;
            if !is_alive(&world, player) {
                break;
            }

            let view = WorldView { player, world };
            let action = match provider.decide(&view).await? {
                PlayerCommand::EndTurn => break,
                PlayerCommand::Act(action) => action,
            };

            match self.handle.execute(action).await {
                Ok(_) => {}
                Err(err) if err.is_rejection() => {
                    debug!(target: "runtime", %player, error = %err, "action rejected");
                }
                Err(RuntimeError::Engine(err)) => {
                    warn!(target: "runtime", %player, error = %err, "closing turn");
                    break;
                }
                Err(err) => return Err(err),
            }
        }

        self.handle.end_turn(player).await
    }

    /// Play rounds until one player is left standing or `max_rounds` pass.
    ///
    /// Returns the winner, if any.
    pub async fn run(&self, max_rounds: u32) -> Result<Option<PlayerId>> {
        for round in 0..max_rounds {
            debug!(target: "runtime", round, "round started");
            let seats: Vec<PlayerId> = self.providers.keys().copied().collect();
            for player in seats {
                let world = self.handle.snapshot().await?;
                if let Some(winner) = sole_survivor(&world) {
                    info!(target: "runtime", %winner, round, "match decided");
                    return Ok(Some(winner));
                }
                if is_alive(&world, player) {
                    self.play_turn(player).await?;
                }
            }
        }

        let world = self.handle.snapshot().await?;
        Ok(sole_survivor(&world))
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker stops once every outstanding [`RuntimeHandle`] is dropped.
    pub async fn shutdown(self) -> Result<()> {
        self.abort.abort();
        drop(self.handle);
        self.worker.await.map_err(RuntimeError::WorkerJoin)
    }
}

fn is_alive(world: &World, player: PlayerId) -> bool {
    world.player(player).is_some_and(|p| p.is_alive())
}

fn sole_survivor(world: &World) -> Option<PlayerId> {
    let mut alive = world.players().iter().filter(|p| p.is_alive());
    match (alive.next(), alive.next()) {
        (Some(player), None) => Some(player.id()),
        _ => None,
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    world: Option<World>,
    providers: BTreeMap<PlayerId, Box<dyn ActionProvider>>,
    abort: AbortSignal,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            world: None,
            providers: BTreeMap::new(),
            abort: AbortSignal::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide the starting board (required)
    pub fn world(mut self, world: World) -> Self {
        self.world = Some(world);
        self
    }

    /// Use an existing abort signal instead of a fresh one
    pub fn abort_signal(mut self, abort: AbortSignal) -> Self {
        self.abort = abort;
        self
    }

    /// Register the provider for `player`
    pub fn provider(mut self, player: PlayerId, provider: impl ActionProvider + 'static) -> Self {
        self.providers.insert(player, Box::new(provider));
        self
    }

    /// Build the runtime and spawn its worker
    pub async fn build(self) -> Result<Runtime> {
        let world = self.world.ok_or(RuntimeError::MissingWorld)?;
        let world = world.with_fog_of_war(self.config.game.fog_of_war);
        let engine = Engine::from_world(world, self.config.game.clone())
            .with_rng(PcgRng::seeded(self.config.seed));

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let (event_tx, _event_rx) = broadcast::channel::<GameEvent>(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_tx.clone());

        let sim_worker = SimulationWorker::new(engine, command_rx, event_tx);
        let worker = tokio::spawn(async move {
            sim_worker.run().await;
        });

        info!(
            target: "runtime",
            seed = self.config.seed,
            players = self.providers.len(),
            "runtime started"
        );

        Ok(Runtime {
            handle,
            config: self.config,
            providers: self.providers,
            abort: self.abort,
            worker,
        })
    }
}
