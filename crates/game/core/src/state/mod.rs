//! Authoritative match state.
//!
//! This module owns the unit arena, player slots and fog of war. Runtime
//! layers clone or query this state but mutate it exclusively through the
//! engine.
mod class;
mod common;
mod error;
mod player;
mod unit;
mod visibility;
mod world;

pub use class::{ClassSet, CombatClass, class_bonus_level};
pub use common::{ModifierId, PlayerId, UnitId};
pub use error::{ModifierError, StateError};
pub use player::Player;
pub use unit::{Capabilities, GrantedModifier, Unit, UnitKind, UnitTemplate};
pub use world::World;
