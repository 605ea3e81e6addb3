use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use crate::config::GameConfig;
use crate::grid::{Grid, Position};
use crate::stats::{ModifierInstance, ModifierTemplate, StackOutcome, StatBlock};

use super::common::{ModifierId, PlayerId, UnitId};
use super::error::{ModifierError, StateError};
use super::player::Player;
use super::unit::{GrantedModifier, Unit, UnitKind, UnitTemplate};

/// Arena owning every unit, the board and the player slots.
///
/// Units are addressed by [`UnitId`] handles. Tiles hold handles, never the
/// units themselves, and the world keeps both sides in sync.
#[derive(Clone, Debug)]
pub struct World {
    grid: Grid,
    units: BTreeMap<UnitId, Unit>,
    players: Vec<Player>,
    next_unit_id: u32,
    next_modifier_id: u32,
    fog_of_war: bool,
}

impl World {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            units: BTreeMap::new(),
            players: Vec::new(),
            next_unit_id: 1,
            next_modifier_id: 1,
            fog_of_war: true,
        }
    }

    #[must_use]
    pub fn with_fog_of_war(mut self, enabled: bool) -> Self {
        self.fog_of_war = enabled;
        self
    }

    /// Opens the next player slot with a starting mana pool.
    pub fn add_player(&mut self, mana: u32) -> Result<PlayerId, StateError> {
        if self.players.len() >= GameConfig::MAX_PLAYERS {
            return Err(StateError::TooManyPlayers {
                max: GameConfig::MAX_PLAYERS,
            });
        }
        let id = PlayerId(self.players.len() as u8);
        self.players.push(Player::new(id, mana));
        Ok(id)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn fog_of_war(&self) -> bool {
        self.fog_of_war
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.0 as usize)
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id.0 as usize)
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub(crate) fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    pub(crate) fn require_unit(&self, id: UnitId) -> Result<&Unit, StateError> {
        self.unit(id).ok_or(StateError::UnitNotFound { unit: id })
    }

    /// Every unit in id order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    pub fn units_of(&self, player: PlayerId) -> impl Iterator<Item = &Unit> {
        self.units.values().filter(move |unit| unit.owner() == player)
    }

    pub fn unit_at(&self, position: Position) -> Option<&Unit> {
        self.grid.occupant(position).and_then(|id| self.unit(id))
    }

    /// Places a new unit built from `template`.
    ///
    /// The unit starts at full health with no movement or actions; it acts
    /// from its owner's next turn start.
    pub fn spawn_unit(
        &mut self,
        template: &UnitTemplate,
        owner: PlayerId,
        position: Position,
    ) -> Result<UnitId, StateError> {
        if self.player(owner).is_none() {
            return Err(StateError::PlayerNotFound { player: owner });
        }
        let terrain = self.grid.tile_at(position)?.terrain();
        if template.terrain.cost_of(terrain).is_none() {
            return Err(StateError::TerrainNotAllowed { position, terrain });
        }

        let id = UnitId(self.next_unit_id);
        self.grid.place(position, id)?;
        self.next_unit_id += 1;

        let mut unit = Unit::spawn(template, id, owner, position);
        unit.recompute();
        self.units.insert(id, unit);
        debug!(unit = %id, owner = %owner, name = %template.name, %position, "unit spawned");
        Ok(id)
    }

    fn next_modifier_id(&mut self) -> ModifierId {
        let id = ModifierId(self.next_modifier_id);
        self.next_modifier_id += 1;
        id
    }

    /// Attaches a modifier from `source` to `target` under the template's
    /// stacking policy, then recomputes the target. A target whose health
    /// drops to zero is removed.
    pub fn attach_modifier(
        &mut self,
        template: &ModifierTemplate,
        target: UnitId,
        source: UnitId,
    ) -> Result<StackOutcome, ModifierError> {
        let outcome = self.offer_modifier(template, target, source)?;
        self.remove_dead();
        Ok(outcome)
    }

    /// [`World::attach_modifier`] without the death sweep, for callers that
    /// sweep once after a batch.
    pub(crate) fn offer_modifier(
        &mut self,
        template: &ModifierTemplate,
        target: UnitId,
        source: UnitId,
    ) -> Result<StackOutcome, ModifierError> {
        if !self.units.contains_key(&source) {
            return Err(ModifierError::SourceNotFound { unit: source });
        }
        if !self.units.contains_key(&target) {
            return Err(ModifierError::TargetNotFound { unit: target });
        }

        let instance = template.instantiate(self.next_modifier_id(), target, source);
        let outcome = match self.units.get_mut(&target) {
            Some(unit) => unit.modifiers_mut().attach(instance),
            None => return Err(ModifierError::TargetNotFound { unit: target }),
        };

        match &outcome {
            StackOutcome::Overflow => {
                return Err(ModifierError::StackFull {
                    unit: target,
                    max: GameConfig::MAX_MODIFIERS_PER_UNIT,
                });
            }
            StackOutcome::Applied(id) => self.record_grant(source, target, *id),
            StackOutcome::Replaced { added, removed } => {
                self.forget_grant(removed);
                self.record_grant(source, target, *added);
            }
            StackOutcome::Extended { .. } | StackOutcome::Rejected { .. } => {}
        }

        debug!(
            modifier = %template.name,
            %target,
            %source,
            outcome = ?outcome,
            "modifier offered"
        );
        self.recompute_stats(target);
        Ok(outcome)
    }

    fn record_grant(&mut self, source: UnitId, target: UnitId, modifier: ModifierId) {
        if let Some(unit) = self.units.get_mut(&source) {
            unit.record_grant(GrantedModifier { target, modifier });
        }
    }

    fn forget_grant(&mut self, instance: &ModifierInstance) {
        if let Some(unit) = self.units.get_mut(&instance.source) {
            unit.forget_grant(instance.target, instance.id);
        }
    }

    /// Removes one modifier from `target` and recomputes it.
    pub fn detach_modifier(
        &mut self,
        target: UnitId,
        modifier: ModifierId,
    ) -> Option<ModifierInstance> {
        let removed = self.units.get_mut(&target)?.modifiers_mut().remove(modifier)?;
        self.forget_grant(&removed);
        self.recompute_stats(target);
        self.remove_dead();
        Some(removed)
    }

    /// Re-derives the effective stats of `unit` from its base stats and
    /// modifiers, clamping health to the new maximum.
    pub fn recompute_stats(&mut self, unit: UnitId) -> Option<&StatBlock> {
        let unit = self.units.get_mut(&unit)?;
        unit.recompute();
        Some(unit.stats())
    }

    /// Turn-start tick for one unit: ages its modifiers, drops the expired
    /// and orphaned ones, and recomputes.
    pub fn tick_modifiers(&mut self, unit: UnitId) -> Vec<ModifierInstance> {
        let alive: BTreeSet<UnitId> = self.units.keys().copied().collect();
        let Some(target) = self.units.get_mut(&unit) else {
            return Vec::new();
        };
        let expired = target
            .modifiers_mut()
            .tick(|source| alive.contains(&source));

        for instance in &expired {
            debug!(modifier = %instance.name, target = %unit, "modifier expired");
            self.forget_grant(instance);
        }
        self.recompute_stats(unit);
        expired
    }

    /// Turn start for `player`: tick every owned unit, remove the ones the
    /// recomputation killed, then refill movement and actions of the rest.
    /// Returns expired modifiers.
    pub fn start_turn(&mut self, player: PlayerId) -> Vec<ModifierInstance> {
        let owned: Vec<UnitId> = self.units_of(player).map(Unit::id).collect();
        let mut expired = Vec::new();
        for &id in &owned {
            expired.extend(self.tick_modifiers(id));
        }
        self.remove_dead();
        for id in owned {
            if let Some(unit) = self.units.get_mut(&id) {
                unit.refresh();
            }
        }
        expired
    }

    /// Moves a unit to an empty tile, keeping occupancy in sync.
    pub(crate) fn relocate(&mut self, id: UnitId, to: Position) -> Result<(), StateError> {
        let from = self.require_unit(id)?.position();
        if from == to {
            return Ok(());
        }
        self.grid.place(to, id)?;
        self.grid.clear(from);
        if let Some(unit) = self.units.get_mut(&id) {
            unit.set_position(to);
        }
        Ok(())
    }

    /// Subtracts damage without clamping; returns the new health.
    pub(crate) fn apply_damage(&mut self, id: UnitId, amount: i32) -> Option<i32> {
        self.units
            .get_mut(&id)
            .map(|unit| unit.adjust_health(-amount.max(0)))
    }

    /// Restores health up to the unit's maximum; returns the new health.
    pub(crate) fn heal(&mut self, id: UnitId, amount: i32) -> Option<i32> {
        self.units
            .get_mut(&id)
            .map(|unit| unit.adjust_health(amount.max(0)))
    }

    /// Removes every unit whose health dropped to zero or below, running the
    /// death cascade for each until no dead unit is left. Returns the removed
    /// handles in id order.
    pub fn remove_dead(&mut self) -> Vec<UnitId> {
        let mut removed = Vec::new();
        loop {
            let dead: Vec<UnitId> = self
                .units
                .values()
                .filter(|unit| !unit.is_alive())
                .map(Unit::id)
                .collect();
            if dead.is_empty() {
                break;
            }
            for id in dead {
                self.remove_unit(id);
                removed.push(id);
            }
        }
        removed.sort();
        removed
    }

    /// Takes a unit off the board and out of the arena.
    ///
    /// Every modifier it granted is force-removed from its target, and each
    /// affected target is recomputed. Losing a commander eliminates its
    /// owner.
    pub fn remove_unit(&mut self, id: UnitId) -> Option<Unit> {
        let mut unit = self.units.remove(&id)?;
        self.grid.clear(unit.position());

        let mut touched = BTreeSet::new();
        for grant in unit.take_grants() {
            let removed = self
                .units
                .get_mut(&grant.target)
                .and_then(|target| target.modifiers_mut().remove(grant.modifier));
            if removed.is_some() {
                touched.insert(grant.target);
            }
        }
        for target in touched {
            self.recompute_stats(target);
        }

        let sources: Vec<ModifierInstance> = unit.modifiers().iter().cloned().collect();
        for instance in &sources {
            self.forget_grant(instance);
        }

        if unit.kind() == UnitKind::Commander {
            if let Some(player) = self.player_mut(unit.owner()) {
                player.eliminate();
                info!(player = %unit.owner(), "commander lost, player eliminated");
            }
        }

        info!(unit = %id, name = %unit.name(), position = %unit.position(), "unit removed");
        Some(unit)
    }
}
