use crate::grid::{Position, TerrainSet};
use crate::stats::{EffectKind, ModifierStack, StatBlock, StatKind};

use super::class::ClassSet;
use super::common::{ModifierId, PlayerId, UnitId};

/// Broad role of a unit. Behaviour dispatches on [`Capabilities`]; the kind
/// only matters to type bonuses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitKind {
    Combatant,
    Building,
    Commander,
}

bitflags::bitflags! {
    /// What a unit is able to do.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Capabilities: u8 {
        const MOVABLE = 1 << 0;
        const FIGHTER = 1 << 1;
        const SUMMONER = 1 << 2;
    }
}

impl UnitKind {
    /// Capabilities a unit of this kind has unless its template says otherwise.
    pub const fn default_capabilities(self) -> Capabilities {
        match self {
            UnitKind::Combatant => Capabilities::MOVABLE.union(Capabilities::FIGHTER),
            UnitKind::Building => Capabilities::SUMMONER,
            UnitKind::Commander => Capabilities::all(),
        }
    }
}

/// Catalog entry a unit is created from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitTemplate {
    pub name: String,
    pub kind: UnitKind,
    pub capabilities: Capabilities,
    pub classes: ClassSet,
    pub terrain: TerrainSet,
    pub stats: StatBlock,
    /// Mana paid by the owner when summoned.
    pub cost: u32,
}

impl UnitTemplate {
    pub fn new(name: impl Into<String>, kind: UnitKind, stats: StatBlock) -> Self {
        Self {
            name: name.into(),
            kind,
            capabilities: kind.default_capabilities(),
            classes: ClassSet::empty(),
            terrain: TerrainSet::default(),
            stats,
            cost: 0,
        }
    }

    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    #[must_use]
    pub fn with_classes(mut self, classes: ClassSet) -> Self {
        self.classes = classes;
        self
    }

    #[must_use]
    pub fn with_terrain(mut self, terrain: TerrainSet) -> Self {
        self.terrain = terrain;
        self
    }

    #[must_use]
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }
}

/// Record of a modifier this unit attached to another unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrantedModifier {
    pub target: UnitId,
    pub modifier: ModifierId,
}

/// A unit living in the world arena.
///
/// Fields are read through accessors; every mutation goes through
/// [`World`](super::World) so that tile occupancy, granted-modifier records
/// and effective stats stay consistent.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    id: UnitId,
    owner: PlayerId,
    name: String,
    kind: UnitKind,
    capabilities: Capabilities,
    classes: ClassSet,
    terrain: TerrainSet,
    base: StatBlock,
    effective: StatBlock,
    modifiers: ModifierStack,
    granted: Vec<GrantedModifier>,
    health: i32,
    movement_left: i32,
    actions_left: i32,
    position: Position,
}

impl Unit {
    /// Fresh unit at full health with nothing left to spend this turn.
    pub(crate) fn spawn(
        template: &UnitTemplate,
        id: UnitId,
        owner: PlayerId,
        position: Position,
    ) -> Self {
        Self {
            id,
            owner,
            name: template.name.clone(),
            kind: template.kind,
            capabilities: template.capabilities,
            classes: template.classes,
            terrain: template.terrain,
            base: template.stats,
            effective: template.stats,
            modifiers: ModifierStack::new(),
            granted: Vec::new(),
            health: template.stats[StatKind::MaxHealth],
            movement_left: 0,
            actions_left: 0,
            position,
        }
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn has(&self, capability: Capabilities) -> bool {
        self.capabilities.contains(capability)
    }

    pub fn classes(&self) -> ClassSet {
        self.classes
    }

    pub fn terrain(&self) -> TerrainSet {
        self.terrain
    }

    pub fn base_stats(&self) -> &StatBlock {
        &self.base
    }

    /// Stats as of the last recomputation.
    pub fn stats(&self) -> &StatBlock {
        &self.effective
    }

    pub fn stat(&self, kind: StatKind) -> i32 {
        self.effective[kind]
    }

    pub fn modifiers(&self) -> &ModifierStack {
        &self.modifiers
    }

    pub fn granted(&self) -> &[GrantedModifier] {
        &self.granted
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.effective[StatKind::MaxHealth]
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn movement_left(&self) -> i32 {
        self.movement_left
    }

    pub fn actions_left(&self) -> i32 {
        self.actions_left
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Has a non-zero attack and is not disarmed.
    pub fn can_fight(&self) -> bool {
        self.has(Capabilities::FIGHTER)
            && self.effective[StatKind::MaxAttack] > 0
            && !self.modifiers.has_effect(EffectKind::Disarmed)
    }

    /// Sum of every `CloudBoost` effect on this unit.
    pub fn cloud_boost(&self) -> u32 {
        self.modifiers
            .effects()
            .map(|effect| match effect {
                EffectKind::CloudBoost { levels } => levels,
                _ => 0,
            })
            .sum()
    }

    pub(crate) fn modifiers_mut(&mut self) -> &mut ModifierStack {
        &mut self.modifiers
    }

    pub(crate) fn record_grant(&mut self, grant: GrantedModifier) {
        self.granted.push(grant);
    }

    pub(crate) fn forget_grant(&mut self, target: UnitId, modifier: ModifierId) {
        self.granted
            .retain(|grant| !(grant.target == target && grant.modifier == modifier));
    }

    pub(crate) fn take_grants(&mut self) -> Vec<GrantedModifier> {
        std::mem::take(&mut self.granted)
    }

    /// Re-derives effective stats and clamps health to the new cap.
    pub(crate) fn recompute(&mut self) {
        self.effective = StatBlock::fold(&self.base, self.modifiers.iter());
        self.health = self.health.min(self.max_health());
    }

    /// Applies signed health change without clamping at zero. Returns the
    /// new value.
    pub(crate) fn adjust_health(&mut self, delta: i32) -> i32 {
        self.health = self.health.saturating_add(delta).min(self.max_health());
        self.health
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn spend_movement(&mut self, points: i32) {
        self.movement_left = (self.movement_left - points).max(0);
    }

    pub(crate) fn refund_movement(&mut self, points: i32) {
        self.movement_left = self.movement_left.saturating_add(points);
    }

    pub(crate) fn spend_action(&mut self) {
        self.actions_left = (self.actions_left - 1).max(0);
    }

    pub(crate) fn exhaust(&mut self) {
        self.actions_left = 0;
    }

    /// Turn-start refill from effective stats.
    pub(crate) fn refresh(&mut self) {
        self.movement_left = if self.modifiers.has_effect(EffectKind::Rooted) {
            0
        } else {
            self.effective[StatKind::Movement].max(0)
        };
        self.actions_left = self.effective[StatKind::Actions].max(0);
    }
}
