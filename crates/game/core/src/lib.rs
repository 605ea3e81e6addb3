//! Deterministic rules for grid-based tactical matches.
//!
//! `tactics-core` defines the canonical rules (grid, clouds, stats, units,
//! movement, combat, abilities, summoning) and exposes pure APIs that the
//! runtime and offline tools share. All state mutation flows through
//! [`engine::Engine`]; the crate never performs I/O and never spawns tasks.
pub mod action;
pub mod cloud;
pub mod combat;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod movement;
pub mod rng;
pub mod state;
pub mod stats;

pub use action::{
    AbilityEffect, AbilityError, AbilityTemplate, Action, ActionContext, ActionResult,
    ActionTransition, CastAction, CastOutcome, SummonAction, SummonError, TargetFilter,
};
pub use cloud::{Cloud, CloudError, CloudShape};
pub use combat::{AttackAction, Combat, CombatError, CombatOutcome};
pub use config::GameConfig;
pub use engine::{Engine, EngineError, TransitionPhase};
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use grid::{
    Direction, Grid, GridError, Offset, Position, TerrainKind, TerrainSet, Tile, TileSet,
};
pub use movement::{MoveAction, MoveOutcome, MovementCloud, MovementError};
pub use rng::{PcgRng, RngOracle};
pub use state::{
    Capabilities, ClassSet, CombatClass, ModifierError, ModifierId, Player, PlayerId, StateError,
    Unit, UnitId, UnitKind, UnitTemplate, World,
};
pub use stats::{
    EffectKind, ModifierDuration, ModifierEffect, ModifierInstance, ModifierTemplate,
    StackOutcome, StackingPolicy, StatBlock, StatKind, StatOp,
};
