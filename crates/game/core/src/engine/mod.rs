//! Rules façade.
//!
//! The [`Engine`] is the only way a controller touches a match. It owns the
//! [`World`], the rules configuration, the random source and the cached
//! movement search, and exposes two surfaces:
//!
//! - **Mutations** (`execute` and its shorthands): run through the
//!   `pre_validate → apply → post_validate` pipeline. A rejected action
//!   leaves the world untouched.
//! - **Queries** (`movement_cloud`, `attackable_tiles`, ...): read-only views
//!   a controller or AI uses to decide which actions to offer.

mod errors;
mod transition;

pub use errors::{EngineError, TransitionPhase};

use tracing::{debug, info};

use crate::action::{
    AbilityTemplate, Action, ActionContext, ActionResult, CastAction, CastOutcome, SummonAction,
    ability_area, summon_cloud,
};
use crate::combat::{self, AttackAction, CombatOutcome};
use crate::config::GameConfig;
use crate::grid::{Grid, Position, TileSet};
use crate::movement::{MoveAction, MoveOutcome, MovementCloud, MovementError};
use crate::rng::{PcgRng, RngOracle};
use crate::state::{PlayerId, Unit, UnitId, UnitTemplate, World};
use crate::stats::{ModifierInstance, ModifierTemplate, StackOutcome, StatBlock};

/// Authoritative rules engine for one match.
pub struct Engine {
    world: World,
    config: GameConfig,
    rng: Box<dyn RngOracle + Send>,
    /// Most recent movement search; `path` only answers from here.
    movement: Option<MovementCloud>,
}

impl Engine {
    /// Creates an engine over `grid` with a generator seeded with 0.
    pub fn new(grid: Grid, config: GameConfig) -> Self {
        let world = World::new(grid).with_fog_of_war(config.fog_of_war);
        Self::from_world(world, config)
    }

    pub fn from_world(world: World, config: GameConfig) -> Self {
        Self {
            world,
            config,
            rng: Box::new(PcgRng::seeded(0)),
            movement: None,
        }
    }

    /// Replaces the random source.
    #[must_use]
    pub fn with_rng(mut self, rng: impl RngOracle + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    // ===== setup =====

    pub fn add_player(&mut self, mana: u32) -> Result<PlayerId, EngineError> {
        Ok(self.world.add_player(mana)?)
    }

    /// Places a unit directly, bypassing summoning costs. Used by board
    /// loaders and tests.
    pub fn spawn_unit(
        &mut self,
        template: &UnitTemplate,
        owner: PlayerId,
        position: Position,
    ) -> Result<UnitId, EngineError> {
        self.movement = None;
        Ok(self.world.spawn_unit(template, owner, position)?)
    }

    /// Attaches a modifier outside of an ability, e.g. a building aura
    /// applied by a board loader.
    pub fn attach_modifier(
        &mut self,
        template: &ModifierTemplate,
        target: UnitId,
        source: UnitId,
    ) -> Result<StackOutcome, EngineError> {
        self.movement = None;
        Ok(self.world.attach_modifier(template, target, source)?)
    }

    // ===== mutations =====

    /// Runs `action` through the transition pipeline.
    pub fn execute(&mut self, action: &Action) -> Result<ActionResult, EngineError> {
        let mut ctx = ActionContext::new(&self.config, &mut *self.rng);
        let result = transition::execute_transition(action, &mut self.world, &mut ctx)?;
        self.movement = None;
        debug!(action = action.as_str(), actor = %action.actor(), "action executed");
        Ok(result)
    }

    pub fn move_unit(
        &mut self,
        unit: UnitId,
        path: Vec<Position>,
    ) -> Result<MoveOutcome, EngineError> {
        match self.execute(&Action::Move(MoveAction::new(unit, path)))? {
            ActionResult::Move(outcome) => Ok(outcome),
            _ => unreachable!("move action yields a move result"),
        }
    }

    /// Creates and processes a combat between the two units.
    pub fn attack(
        &mut self,
        attacker: UnitId,
        defender: UnitId,
    ) -> Result<CombatOutcome, EngineError> {
        match self.execute(&Action::Attack(AttackAction::new(attacker, defender)))? {
            ActionResult::Attack(outcome) => Ok(outcome),
            _ => unreachable!("attack action yields a combat result"),
        }
    }

    pub fn cast(
        &mut self,
        caster: UnitId,
        ability: &AbilityTemplate,
        target: Position,
    ) -> Result<CastOutcome, EngineError> {
        let action = Action::Cast(CastAction::new(caster, ability.clone(), target));
        match self.execute(&action)? {
            ActionResult::Cast(outcome) => Ok(outcome),
            _ => unreachable!("cast action yields a cast result"),
        }
    }

    pub fn summon(
        &mut self,
        summoner: UnitId,
        tile: Position,
        template: &UnitTemplate,
    ) -> Result<UnitId, EngineError> {
        let action = Action::Summon(SummonAction::new(summoner, tile, template.clone()));
        match self.execute(&action)? {
            ActionResult::Summon(unit) => Ok(unit),
            _ => unreachable!("summon action yields a unit"),
        }
    }

    /// Turn start for `player`: ticks modifiers, recomputes stats and
    /// refills movement and actions of every unit it owns.
    pub fn start_turn(&mut self, player: PlayerId) -> Result<Vec<ModifierInstance>, EngineError> {
        if self.world.player(player).is_none() {
            return Err(EngineError::PlayerNotFound(player));
        }
        self.movement = None;
        let expired = self.world.start_turn(player);
        info!(%player, expired = expired.len(), "turn started");
        Ok(expired)
    }

    // ===== queries =====

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.world.unit(id)
    }

    pub fn units_of(&self, player: PlayerId) -> impl Iterator<Item = &Unit> {
        self.world.units_of(player)
    }

    fn require_unit(&self, id: UnitId) -> Result<&Unit, EngineError> {
        self.world.unit(id).ok_or(EngineError::UnitNotFound(id))
    }

    /// Reachability for `unit` this turn. The result is cached and backs
    /// later [`Engine::path`] calls.
    pub fn movement_cloud(&mut self, unit: UnitId) -> Result<&MovementCloud, EngineError> {
        let cloud = MovementCloud::compute(&self.world, unit)?;
        Ok(self.movement.insert(cloud))
    }

    /// Optimal path to `destination` from the cached movement search.
    ///
    /// Fails fatally unless [`Engine::movement_cloud`] was called for this
    /// unit since it last moved or its budget changed.
    pub fn path(&self, unit: UnitId, destination: Position) -> Result<Vec<Position>, EngineError> {
        let mover = self.require_unit(unit)?;
        let budget = mover.movement_left();
        let cloud = self
            .movement
            .as_ref()
            .filter(|cloud| cloud.matches(unit, mover.position(), budget))
            .ok_or(MovementError::NoMovementCloud {
                unit,
                origin: mover.position(),
                budget,
            })?;
        cloud
            .path_to(destination)
            .ok_or_else(|| MovementError::OutsideCloud { destination }.into())
    }

    /// Tiles the unit may stop on this turn.
    pub fn destinations(&self, unit: UnitId) -> Result<TileSet, EngineError> {
        let cloud = MovementCloud::compute(&self.world, unit)?;
        Ok(cloud.destinations(&self.world))
    }

    pub fn attackable_tiles(&self, unit: UnitId) -> Result<TileSet, EngineError> {
        let unit = self.require_unit(unit)?;
        Ok(combat::attackable_tiles(self.world.grid(), unit))
    }

    /// Every tile the unit could attack after moving this turn.
    pub fn danger_zone(&self, unit: UnitId) -> Result<TileSet, EngineError> {
        let cloud = MovementCloud::compute(&self.world, unit)?;
        let unit = self.require_unit(unit)?;
        Ok(combat::cloud_danger_zone(&self.world, unit, &cloud))
    }

    pub fn summon_cloud(
        &self,
        summoner: UnitId,
        template: &UnitTemplate,
    ) -> Result<TileSet, EngineError> {
        Ok(summon_cloud(&self.world, summoner, template)?)
    }

    pub fn ability_area(
        &self,
        caster: UnitId,
        ability: &AbilityTemplate,
        target: Position,
    ) -> Result<TileSet, EngineError> {
        Ok(ability_area(&self.world, caster, ability, target)?)
    }

    pub fn effective_stats(&self, unit: UnitId) -> Result<StatBlock, EngineError> {
        Ok(*self.require_unit(unit)?.stats())
    }

    pub fn visible_tiles(&self, player: PlayerId) -> TileSet {
        self.world.visible_tiles(player)
    }
}
