//! Area abilities cast by units.

use tracing::{debug, info};

use crate::cloud::{Cloud, CloudError};
use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::grid::{Position, TileSet};
use crate::state::{ModifierError, PlayerId, UnitId, World};
use crate::stats::ModifierTemplate;

use super::transition::{ActionContext, ActionTransition};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityError {
    #[error("caster {0} not found")]
    CasterNotFound(UnitId),

    #[error("caster {0} is dead")]
    CasterDead(UnitId),

    #[error("caster {0} has no actions left")]
    NoActionsLeft(UnitId),

    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),

    #[error("ability costs {required} mana, only {available} available")]
    InsufficientMana { required: u32, available: u32 },

    #[error("target at distance {distance} outside cast range [{min}, {max}]")]
    OutOfCastRange { distance: u32, min: u32, max: u32 },

    #[error(transparent)]
    Cloud(#[from] CloudError),

    #[error(transparent)]
    Modifier(#[from] ModifierError),
}

impl GameError for AbilityError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::CasterNotFound(_)
            | Self::CasterDead(_)
            | Self::NoActionsLeft(_)
            | Self::PlayerNotFound(_) => ErrorSeverity::Fatal,
            Self::InsufficientMana { .. } | Self::OutOfCastRange { .. } => ErrorSeverity::Rejected,
            Self::Cloud(err) => err.severity(),
            Self::Modifier(err) => err.severity(),
        }
    }

    fn context(&self) -> Option<ErrorContext> {
        match self {
            Self::CasterNotFound(unit) | Self::CasterDead(unit) | Self::NoActionsLeft(unit) => {
                Some(ErrorContext::new().with_unit(*unit))
            }
            Self::Cloud(err) => err.context(),
            Self::Modifier(err) => err.context(),
            Self::PlayerNotFound(_)
            | Self::InsufficientMana { .. }
            | Self::OutOfCastRange { .. } => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CasterNotFound(_) => "ABILITY_CASTER_NOT_FOUND",
            Self::CasterDead(_) => "ABILITY_CASTER_DEAD",
            Self::NoActionsLeft(_) => "ABILITY_NO_ACTIONS_LEFT",
            Self::PlayerNotFound(_) => "ABILITY_PLAYER_NOT_FOUND",
            Self::InsufficientMana { .. } => "ABILITY_INSUFFICIENT_MANA",
            Self::OutOfCastRange { .. } => "ABILITY_OUT_OF_CAST_RANGE",
            Self::Cloud(err) => err.error_code(),
            Self::Modifier(err) => err.error_code(),
        }
    }
}

/// Which units inside the area an ability touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetFilter {
    Allies,
    Enemies,
    All,
}

impl TargetFilter {
    pub fn accepts(self, caster: PlayerId, target: PlayerId) -> bool {
        match self {
            TargetFilter::Allies => caster == target,
            TargetFilter::Enemies => caster != target,
            TargetFilter::All => true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityEffect {
    /// Flat damage, ignoring reductions.
    Damage(i32),
    Heal(i32),
    /// Attach a modifier with the caster as its source.
    ApplyModifier(ModifierTemplate),
}

/// Catalog entry for a castable ability.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityTemplate {
    pub name: String,
    pub mana_cost: u32,
    /// Inclusive Manhattan distance bounds from caster to target tile.
    pub cast_range: (u32, u32),
    pub cloud: Cloud,
    pub effect: AbilityEffect,
    pub affects: TargetFilter,
}

impl AbilityTemplate {
    pub fn new(name: impl Into<String>, cloud: Cloud, effect: AbilityEffect) -> Self {
        Self {
            name: name.into(),
            mana_cost: 0,
            cast_range: (0, 0),
            cloud,
            effect,
            affects: TargetFilter::All,
        }
    }

    #[must_use]
    pub fn with_mana_cost(mut self, cost: u32) -> Self {
        self.mana_cost = cost;
        self
    }

    #[must_use]
    pub fn with_cast_range(mut self, min: u32, max: u32) -> Self {
        self.cast_range = (min, max);
        self
    }

    #[must_use]
    pub fn affecting(mut self, filter: TargetFilter) -> Self {
        self.affects = filter;
        self
    }
}

/// Tiles `ability` would hit when `caster` casts it onto `target`, after
/// growing the cloud by the caster's cloud boosts.
pub fn ability_area(
    world: &World,
    caster: UnitId,
    ability: &AbilityTemplate,
    target: Position,
) -> Result<TileSet, AbilityError> {
    let unit = world
        .unit(caster)
        .ok_or(AbilityError::CasterNotFound(caster))?;
    let cloud = ability.cloud.expand(unit.cloud_boost());
    Ok(cloud.cast_area(world.grid(), unit.position(), target)?)
}

/// What a cast did.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastOutcome {
    pub area: TileSet,
    pub affected: Vec<UnitId>,
    pub killed: Vec<UnitId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastAction {
    pub caster: UnitId,
    pub ability: AbilityTemplate,
    pub target: Position,
}

impl CastAction {
    pub fn new(caster: UnitId, ability: AbilityTemplate, target: Position) -> Self {
        Self {
            caster,
            ability,
            target,
        }
    }
}

impl ActionTransition for CastAction {
    type Error = AbilityError;
    type Result = CastOutcome;

    fn actor(&self) -> UnitId {
        self.caster
    }

    fn pre_validate(&self, world: &World, _ctx: &ActionContext<'_>) -> Result<(), Self::Error> {
        let caster = world
            .unit(self.caster)
            .ok_or(AbilityError::CasterNotFound(self.caster))?;
        if !caster.is_alive() {
            return Err(AbilityError::CasterDead(self.caster));
        }
        if caster.actions_left() <= 0 {
            return Err(AbilityError::NoActionsLeft(self.caster));
        }
        let distance = caster.position().manhattan(self.target);
        if self.ability.cloud.is_directional() && distance != 1 {
            return Err(CloudError::DirectionalDistance {
                caster: caster.position(),
                distance,
            }
            .into());
        }

        let player = world
            .player(caster.owner())
            .ok_or(AbilityError::PlayerNotFound(caster.owner()))?;
        if !player.can_afford(self.ability.mana_cost) {
            return Err(AbilityError::InsufficientMana {
                required: self.ability.mana_cost,
                available: player.mana(),
            });
        }
        let (min, max) = self.ability.cast_range;
        if !(min..=max).contains(&distance) {
            return Err(AbilityError::OutOfCastRange { distance, min, max });
        }
        ability_area(world, self.caster, &self.ability, self.target)?;
        Ok(())
    }

    fn apply(
        &self,
        world: &mut World,
        _ctx: &mut ActionContext<'_>,
    ) -> Result<Self::Result, Self::Error> {
        let area = ability_area(world, self.caster, &self.ability, self.target)?;
        let owner = world
            .unit(self.caster)
            .ok_or(AbilityError::CasterNotFound(self.caster))?
            .owner();

        let targets: Vec<UnitId> = area
            .iter()
            .filter(|&&position| world.can_see(owner, position))
            .filter_map(|&position| world.unit_at(position))
            .filter(|unit| self.ability.affects.accepts(owner, unit.owner()))
            .map(|unit| unit.id())
            .collect();

        let mut affected = Vec::with_capacity(targets.len());
        for target in targets {
            let landed = match &self.ability.effect {
                AbilityEffect::Damage(amount) => world.apply_damage(target, *amount).is_some(),
                AbilityEffect::Heal(amount) => world.heal(target, *amount).is_some(),
                AbilityEffect::ApplyModifier(template) => {
                    match world.offer_modifier(template, target, self.caster) {
                        Ok(outcome) => outcome.attached().is_some(),
                        Err(err) => {
                            debug!(%target, error = %err, "modifier not attached");
                            false
                        }
                    }
                }
            };
            if landed {
                affected.push(target);
            }
        }

        if let Some(player) = world.player_mut(owner) {
            player.spend_mana(self.ability.mana_cost);
        }
        if let Some(caster) = world.unit_mut(self.caster) {
            caster.spend_action();
        }
        let killed = world.remove_dead();

        info!(
            caster = %self.caster,
            ability = %self.ability.name,
            target = %self.target,
            affected = affected.len(),
            killed = killed.len(),
            "ability cast"
        );
        Ok(CastOutcome {
            area,
            affected,
            killed,
        })
    }
}
