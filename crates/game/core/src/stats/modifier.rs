//! Modifier templates and attached instances.
//!
//! A [`ModifierTemplate`] is a prototype with no target or source. The only
//! way to attach a modifier is [`ModifierTemplate::instantiate`], which binds
//! the template to a concrete (target, source) pair and yields a
//! [`ModifierInstance`].

use crate::state::{ModifierId, UnitId};

use super::block::StatKind;

/// Remaining lifetime of a modifier, in owner turn starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierDuration {
    /// Decremented at each turn start of the target; removed once negative.
    Finite(i32),
    Infinite,
}

impl ModifierDuration {
    /// True when `self` outlasts `other`. Infinite outlasts every finite
    /// duration but not another infinite one.
    pub fn exceeds(self, other: ModifierDuration) -> bool {
        match (self, other) {
            (Self::Infinite, Self::Finite(_)) => true,
            (Self::Finite(a), Self::Finite(b)) => a > b,
            (_, Self::Infinite) => false,
        }
    }

    /// Sum of two durations; infinite absorbs.
    pub fn extended_by(self, other: ModifierDuration) -> ModifierDuration {
        match (self, other) {
            (Self::Finite(a), Self::Finite(b)) => Self::Finite(a.saturating_add(b)),
            _ => Self::Infinite,
        }
    }

    /// One turn-start tick. Infinite durations are exempt.
    pub fn ticked(self) -> ModifierDuration {
        match self {
            Self::Finite(turns) => Self::Finite(turns - 1),
            Self::Infinite => Self::Infinite,
        }
    }

    pub fn is_expired(self) -> bool {
        matches!(self, Self::Finite(turns) if turns < 0)
    }
}

/// How a new modifier interacts with an existing one of the same name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StackingPolicy {
    /// Keep the existing one, drop the newcomer.
    RejectDuplicate,
    /// Swap in the newcomer only if it lasts longer.
    ReplaceIfLonger,
    /// Extend the existing one by the newcomer's duration.
    DurationAdditive,
    /// Always attach as an independent instance.
    FreelyStackable,
}

/// Operation applied to a single stat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatOp {
    Add(i32),
    /// Whole percentage: 150 = ×1.5.
    Multiply(i32),
    /// Raise the stat to at least this value.
    SetMin(i32),
    /// Cap the stat at this value.
    SetMax(i32),
}

/// Non-numeric effects, consumed where they apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    /// Heal this percentage of damage dealt in combat.
    LifeSteal { percent: i32 },
    /// Refund movement points after killing a defender.
    MovementOnKill { points: i32 },
    /// Extra damage percentage against buildings.
    BuildingBonus { percent: i32 },
    /// Extra damage percentage against commanders.
    CommanderBonus { percent: i32 },
    /// Extra damage percentage on counter-attacks.
    CounterBonus { percent: i32 },
    /// Grow ability areas by this many rings.
    CloudBoost { levels: u32 },
    /// No movement at turn start.
    Rooted,
    /// Cannot attack or counter.
    Disarmed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierEffect {
    Stat { stat: StatKind, op: StatOp },
    Effect(EffectKind),
}

/// Prototype modifier, defined by catalogs and abilities.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierTemplate {
    /// Identity key for stacking-collision detection.
    pub name: String,
    pub duration: ModifierDuration,
    pub policy: StackingPolicy,
    pub effect: ModifierEffect,
}

impl ModifierTemplate {
    pub fn new(
        name: impl Into<String>,
        effect: ModifierEffect,
        duration: ModifierDuration,
        policy: StackingPolicy,
    ) -> Self {
        Self {
            name: name.into(),
            duration,
            policy,
            effect,
        }
    }

    pub fn stat(
        name: impl Into<String>,
        stat: StatKind,
        op: StatOp,
        duration: ModifierDuration,
        policy: StackingPolicy,
    ) -> Self {
        Self::new(name, ModifierEffect::Stat { stat, op }, duration, policy)
    }

    pub fn effect(
        name: impl Into<String>,
        effect: EffectKind,
        duration: ModifierDuration,
        policy: StackingPolicy,
    ) -> Self {
        Self::new(name, ModifierEffect::Effect(effect), duration, policy)
    }

    /// Binds this template to a target and a source.
    pub fn instantiate(&self, id: ModifierId, target: UnitId, source: UnitId) -> ModifierInstance {
        ModifierInstance {
            id,
            name: self.name.clone(),
            target,
            source,
            remaining: self.duration,
            policy: self.policy,
            effect: self.effect,
        }
    }
}

/// A modifier attached to a unit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierInstance {
    pub id: ModifierId,
    pub name: String,
    pub target: UnitId,
    pub source: UnitId,
    pub remaining: ModifierDuration,
    pub policy: StackingPolicy,
    pub effect: ModifierEffect,
}

impl ModifierInstance {
    pub fn effect_kind(&self) -> Option<EffectKind> {
        match self.effect {
            ModifierEffect::Effect(kind) => Some(kind),
            ModifierEffect::Stat { .. } => None,
        }
    }
}
