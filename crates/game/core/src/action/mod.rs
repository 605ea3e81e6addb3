//! Action domain.
//!
//! Every mutation a controller may request is an [`Action`]. Each variant
//! wraps a transition type implementing [`ActionTransition`], which the
//! engine drives through `pre_validate → apply → post_validate`.
//!
//! # Module Structure
//!
//! - `transition`: the [`ActionTransition`] trait and [`ActionContext`]
//! - `ability`: area abilities ([`CastAction`], [`ability_area`])
//! - `summon`: summoning ([`SummonAction`], [`summon_cloud`])
//!
//! Movement and attacks live next to their planners in
//! [`movement`](crate::movement) and [`combat`](crate::combat).

pub mod ability;
pub mod summon;
mod transition;

pub use ability::{
    AbilityEffect, AbilityError, AbilityTemplate, CastAction, CastOutcome, TargetFilter,
    ability_area,
};
pub use summon::{SummonAction, SummonError, summon_cloud};
pub use transition::{ActionContext, ActionTransition};

use crate::combat::{AttackAction, CombatOutcome};
use crate::movement::{MoveAction, MoveOutcome};
use crate::state::UnitId;

/// A mutation requested by a controller.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    Move(MoveAction),
    Attack(AttackAction),
    Cast(CastAction),
    Summon(SummonAction),
}

impl Action {
    /// Unit performing the action.
    pub fn actor(&self) -> UnitId {
        match self {
            Action::Move(action) => action.actor(),
            Action::Attack(action) => action.actor(),
            Action::Cast(action) => action.actor(),
            Action::Summon(action) => action.actor(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Move(_) => "move",
            Action::Attack(_) => "attack",
            Action::Cast(_) => "cast",
            Action::Summon(_) => "summon",
        }
    }
}

/// Action-specific result of a successful execution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionResult {
    Move(MoveOutcome),
    Attack(CombatOutcome),
    Cast(CastOutcome),
    /// Handle of the new unit.
    Summon(UnitId),
}
