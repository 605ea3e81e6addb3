//! Runtime orchestration for the tactics engine.
//!
//! This crate wires the rules engine into an async runtime: a worker task owns
//! the [`Engine`](tactics_core::Engine), providers decide what each player
//! does, and clients talk to the worker through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`config`] loads [`RuntimeConfig`] from RON
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod config;
pub mod runtime;

mod workers;

pub use api::{
    AbortSignal, ActionProvider, EndTurnProvider, GameEvent, PlayerCommand, Result, RuntimeError,
    RuntimeHandle, ScriptedProvider, ThinkingDelay, WorldView,
};
pub use config::RuntimeConfig;
pub use runtime::{Runtime, RuntimeBuilder};
