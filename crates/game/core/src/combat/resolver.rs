use tracing::{debug, info};

use crate::action::{ActionContext, ActionTransition};
use crate::config::GameConfig;
use crate::rng::RngOracle;
use crate::state::{UnitId, World, class_bonus_level};
use crate::stats::EffectKind;

use super::damage::{mitigated, reduction, scaled_damage};
use super::error::CombatError;

/// What one exchange did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatOutcome {
    pub damage_dealt: i32,
    /// `None` when no counter-attack happened.
    pub counter_damage: Option<i32>,
    pub defender_died: bool,
    pub attacker_died: bool,
}

/// A single attack exchange between two units.
///
/// Distance and class advantage are captured at creation. The record is
/// single-use: a second [`Combat::process`] fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combat {
    attacker: UnitId,
    defender: UnitId,
    /// Manhattan distance minus one; adjacent units fight at zero.
    distance: u32,
    class_level: i32,
    processed: bool,
}

impl Combat {
    pub fn new(world: &World, attacker: UnitId, defender: UnitId) -> Result<Self, CombatError> {
        let a = world
            .unit(attacker)
            .ok_or(CombatError::UnitNotFound(attacker))?;
        let d = world
            .unit(defender)
            .ok_or(CombatError::UnitNotFound(defender))?;
        Ok(Self {
            attacker,
            defender,
            distance: a.position().manhattan(d.position()).saturating_sub(1),
            class_level: class_bonus_level(a.classes(), d.classes()),
            processed: false,
        })
    }

    pub fn attacker(&self) -> UnitId {
        self.attacker
    }

    pub fn defender(&self) -> UnitId {
        self.defender
    }

    pub fn distance(&self) -> u32 {
        self.distance
    }

    /// Class advantage of the attacker; the counter uses its negation.
    pub fn class_level(&self) -> i32 {
        self.class_level
    }

    pub fn is_processed(&self) -> bool {
        self.processed
    }

    /// Checks every precondition without touching the world.
    pub fn validate(&self, world: &World) -> Result<(), CombatError> {
        if self.processed {
            return Err(CombatError::AlreadyProcessed {
                attacker: self.attacker,
                defender: self.defender,
            });
        }
        let attacker = world
            .unit(self.attacker)
            .ok_or(CombatError::UnitNotFound(self.attacker))?;
        let defender = world
            .unit(self.defender)
            .ok_or(CombatError::UnitNotFound(self.defender))?;

        if !attacker.is_alive() {
            return Err(CombatError::AttackerDead(self.attacker));
        }
        if attacker.actions_left() <= 0 {
            return Err(CombatError::NoActionsLeft(self.attacker));
        }
        if !attacker.can_fight() {
            return Err(CombatError::CannotFight(self.attacker));
        }
        if !defender.is_alive() {
            return Err(CombatError::DefenderDead(self.defender));
        }
        if attacker.owner() == defender.owner() {
            return Err(CombatError::SameOwner {
                attacker: self.attacker,
                defender: self.defender,
            });
        }
        if !world.can_see(attacker.owner(), defender.position()) {
            return Err(CombatError::NotVisible {
                attacker: self.attacker,
                defender: self.defender,
            });
        }
        let (min, max) = attacker.stats().attack_reach();
        if !(min..=max).contains(&self.distance) {
            return Err(CombatError::OutOfRange {
                distance: self.distance,
                min,
                max,
            });
        }
        Ok(())
    }

    /// Resolves the exchange.
    ///
    /// 1. Roll the attacker's scaled damage and apply it minus reductions.
    /// 2. A surviving defender that can see and reach the attacker counters
    ///    with the class level negated.
    /// 3. The attacker is spent for the turn, life steal and
    ///    movement-on-kill fire, and the dead are removed.
    pub fn process(
        &mut self,
        world: &mut World,
        config: &GameConfig,
        rng: &mut dyn RngOracle,
    ) -> Result<CombatOutcome, CombatError> {
        self.validate(world)?;
        self.processed = true;

        let damage_dealt = self.strike(world, config, rng, false)?;
        let defender_alive = world.unit(self.defender).is_some_and(|unit| unit.is_alive());

        let counter_damage = if defender_alive && self.can_counter(world) {
            Some(self.strike(world, config, rng, true)?)
        } else {
            None
        };

        if let Some(attacker) = world.unit_mut(self.attacker) {
            attacker.exhaust();
        }

        let defender_died = !defender_alive;
        let attacker_died = !world.unit(self.attacker).is_some_and(|unit| unit.is_alive());
        self.after_combat(world, self.attacker, damage_dealt, defender_died);
        if let Some(counter) = counter_damage {
            self.after_combat(world, self.defender, counter, attacker_died);
        }

        let outcome = CombatOutcome {
            damage_dealt,
            counter_damage,
            defender_died,
            attacker_died,
        };
        info!(
            attacker = %self.attacker,
            defender = %self.defender,
            distance = self.distance,
            level = self.class_level,
            ?outcome,
            "combat resolved"
        );
        world.remove_dead();
        Ok(outcome)
    }

    fn can_counter(&self, world: &World) -> bool {
        let (Some(attacker), Some(defender)) = (world.unit(self.attacker), world.unit(self.defender))
        else {
            return false;
        };
        let (min, max) = defender.stats().attack_reach();
        defender.can_fight()
            && (min..=max).contains(&self.distance)
            && world.can_see(defender.owner(), attacker.position())
    }

    /// One directed hit. Returns the damage that landed.
    fn strike(
        &self,
        world: &mut World,
        config: &GameConfig,
        rng: &mut dyn RngOracle,
        counter: bool,
    ) -> Result<i32, CombatError> {
        let (from, to, level) = if counter {
            (self.defender, self.attacker, -self.class_level)
        } else {
            (self.attacker, self.defender, self.class_level)
        };
        let dealer = world.unit(from).ok_or(CombatError::UnitNotFound(from))?;
        let target = world.unit(to).ok_or(CombatError::UnitNotFound(to))?;

        let (min, max) = scaled_damage(dealer, target, config.class_bonus_percent, level, counter);
        let roll = rng.range(min, max);
        let landed = mitigated(roll, reduction(target, self.distance), config.minimum_damage);
        let health = world.apply_damage(to, landed).unwrap_or_default();
        debug!(from = %from, to = %to, min, max, roll, landed, health, counter, "hit");
        Ok(landed)
    }

    /// Post-combat hooks for a surviving participant who dealt damage.
    fn after_combat(&self, world: &mut World, dealer: UnitId, dealt: i32, killed: bool) {
        let Some(unit) = world.unit(dealer) else {
            return;
        };
        if !unit.is_alive() {
            return;
        }
        let steal = unit.modifiers().sum_effects(|effect| match effect {
            EffectKind::LifeSteal { percent } => Some(percent),
            _ => None,
        });
        let refund = unit.modifiers().sum_effects(|effect| match effect {
            EffectKind::MovementOnKill { points } => Some(points),
            _ => None,
        });

        if dealt > 0 && steal > 0 {
            world.heal(dealer, dealt * steal / 100);
        }
        if killed && dealer == self.attacker && refund > 0 {
            if let Some(unit) = world.unit_mut(dealer) {
                unit.refund_movement(refund);
            }
        }
    }
}

/// Attack order issued by a controller; creates and processes a [`Combat`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackAction {
    pub attacker: UnitId,
    pub defender: UnitId,
}

impl AttackAction {
    pub fn new(attacker: UnitId, defender: UnitId) -> Self {
        Self { attacker, defender }
    }
}

impl ActionTransition for AttackAction {
    type Error = CombatError;
    type Result = CombatOutcome;

    fn actor(&self) -> UnitId {
        self.attacker
    }

    fn pre_validate(&self, world: &World, _ctx: &ActionContext<'_>) -> Result<(), Self::Error> {
        Combat::new(world, self.attacker, self.defender)?.validate(world)
    }

    fn apply(
        &self,
        world: &mut World,
        ctx: &mut ActionContext<'_>,
    ) -> Result<Self::Result, Self::Error> {
        let mut combat = Combat::new(world, self.attacker, self.defender)?;
        combat.process(world, ctx.config, &mut *ctx.rng)
    }
}
