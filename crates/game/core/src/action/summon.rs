//! Summoning new units next to a summoner.

use tracing::info;

use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::grid::{Position, TileSet};
use crate::state::{Capabilities, PlayerId, StateError, UnitId, UnitTemplate, World};
use crate::stats::StatKind;

use super::transition::{ActionContext, ActionTransition};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SummonError {
    #[error("summoner {0} not found")]
    SummonerNotFound(UnitId),

    #[error("unit {0} cannot summon")]
    NotSummoner(UnitId),

    #[error("summoner {0} has no actions left")]
    NoActionsLeft(UnitId),

    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),

    #[error("{template} costs {required} mana, only {available} available")]
    InsufficientMana {
        template: String,
        required: u32,
        available: u32,
    },

    #[error("tile {tile} is not in the summon cloud")]
    OutsideSummonCloud { tile: Position },

    #[error(transparent)]
    State(#[from] StateError),
}

impl GameError for SummonError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SummonerNotFound(_)
            | Self::NotSummoner(_)
            | Self::NoActionsLeft(_)
            | Self::PlayerNotFound(_) => ErrorSeverity::Fatal,
            Self::InsufficientMana { .. } | Self::OutsideSummonCloud { .. } => {
                ErrorSeverity::Rejected
            }
            Self::State(err) => err.severity(),
        }
    }

    fn context(&self) -> Option<ErrorContext> {
        match self {
            Self::SummonerNotFound(unit) | Self::NotSummoner(unit) | Self::NoActionsLeft(unit) => {
                Some(ErrorContext::new().with_unit(*unit))
            }
            Self::OutsideSummonCloud { tile } => Some(ErrorContext::new().with_position(*tile)),
            Self::State(err) => err.context(),
            Self::PlayerNotFound(_) | Self::InsufficientMana { .. } => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::SummonerNotFound(_) => "SUMMON_SUMMONER_NOT_FOUND",
            Self::NotSummoner(_) => "SUMMON_NOT_SUMMONER",
            Self::NoActionsLeft(_) => "SUMMON_NO_ACTIONS_LEFT",
            Self::PlayerNotFound(_) => "SUMMON_PLAYER_NOT_FOUND",
            Self::InsufficientMana { .. } => "SUMMON_INSUFFICIENT_MANA",
            Self::OutsideSummonCloud { .. } => "SUMMON_OUTSIDE_CLOUD",
            Self::State(err) => err.error_code(),
        }
    }
}

/// Empty tiles within the summoner's `SummonRange` that `template` may
/// stand on.
pub fn summon_cloud(
    world: &World,
    summoner: UnitId,
    template: &UnitTemplate,
) -> Result<TileSet, SummonError> {
    let unit = world
        .unit(summoner)
        .ok_or(SummonError::SummonerNotFound(summoner))?;
    let radius = unit.stat(StatKind::SummonRange).max(0) as u32;
    let grid = world.grid();
    Ok(grid
        .radial_cloud(unit.position(), radius)
        .into_iter()
        .filter(|&position| grid.occupant(position).is_none())
        .filter(|&position| {
            grid.terrain(position)
                .is_some_and(|terrain| template.terrain.cost_of(terrain).is_some())
        })
        .collect())
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SummonAction {
    pub summoner: UnitId,
    pub tile: Position,
    pub template: UnitTemplate,
}

impl SummonAction {
    pub fn new(summoner: UnitId, tile: Position, template: UnitTemplate) -> Self {
        Self {
            summoner,
            tile,
            template,
        }
    }
}

impl ActionTransition for SummonAction {
    type Error = SummonError;
    type Result = UnitId;

    fn actor(&self) -> UnitId {
        self.summoner
    }

    fn pre_validate(&self, world: &World, _ctx: &ActionContext<'_>) -> Result<(), Self::Error> {
        let summoner = world
            .unit(self.summoner)
            .ok_or(SummonError::SummonerNotFound(self.summoner))?;
        if !summoner.has(Capabilities::SUMMONER) {
            return Err(SummonError::NotSummoner(self.summoner));
        }
        if summoner.actions_left() <= 0 {
            return Err(SummonError::NoActionsLeft(self.summoner));
        }

        let player = world
            .player(summoner.owner())
            .ok_or(SummonError::PlayerNotFound(summoner.owner()))?;
        if !player.can_afford(self.template.cost) {
            return Err(SummonError::InsufficientMana {
                template: self.template.name.clone(),
                required: self.template.cost,
                available: player.mana(),
            });
        }
        if !summon_cloud(world, self.summoner, &self.template)?.contains(&self.tile) {
            return Err(SummonError::OutsideSummonCloud { tile: self.tile });
        }
        Ok(())
    }

    fn apply(
        &self,
        world: &mut World,
        _ctx: &mut ActionContext<'_>,
    ) -> Result<Self::Result, Self::Error> {
        let owner = world
            .unit(self.summoner)
            .ok_or(SummonError::SummonerNotFound(self.summoner))?
            .owner();
        let summoned = world.spawn_unit(&self.template, owner, self.tile)?;

        if let Some(player) = world.player_mut(owner) {
            player.spend_mana(self.template.cost);
        }
        if let Some(summoner) = world.unit_mut(self.summoner) {
            summoner.spend_action();
        }
        info!(
            summoner = %self.summoner,
            unit = %summoned,
            template = %self.template.name,
            tile = %self.tile,
            "unit summoned"
        );
        Ok(summoned)
    }
}
