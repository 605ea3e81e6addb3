//! Damage calculation.
//!
//! Every function here is pure integer math over effective stats. Rounding
//! truncates toward zero after each stage, so the order of the stages is
//! observable and fixed: health, then class, then type.

use crate::state::{Unit, UnitKind};
use crate::stats::{EffectKind, StatKind};

/// Scales a base attack value by the unit's remaining health.
///
/// # Formula
///
/// ```text
/// scaled = base × health / max_health
/// ```
///
/// A unit with a non-positive health cap deals nothing.
pub fn health_scaled(base: i32, health: i32, max_health: i32) -> i32 {
    if max_health <= 0 {
        return 0;
    }
    let scaled = i64::from(base) * i64::from(health.max(0)) / i64::from(max_health);
    scaled as i32
}

/// Applies the class advantage multiplier.
///
/// # Formula
///
/// ```text
/// multiplier = max(0, 100 + percent_per_level × level)
/// scaled     = value × multiplier / 100
/// ```
pub fn class_scaled(value: i32, percent_per_level: i32, level: i32) -> i32 {
    let multiplier = (100 + i64::from(percent_per_level) * i64::from(level)).max(0);
    (i64::from(value) * multiplier / 100) as i32
}

/// Applies a type bonus expressed as extra percent (0 = unchanged).
pub fn type_scaled(value: i32, bonus_percent: i32) -> i32 {
    let multiplier = (100 + i64::from(bonus_percent)).max(0);
    (i64::from(value) * multiplier / 100) as i32
}

/// Extra damage percent `attacker` gets against `defender`.
///
/// Building and commander bonuses apply only to targets of that kind.
/// Counter bonuses apply only when `counter` is set.
pub fn type_bonus_percent(attacker: &Unit, defender: &Unit, counter: bool) -> i32 {
    let kind = defender.kind();
    attacker.modifiers().sum_effects(|effect| match effect {
        EffectKind::BuildingBonus { percent } if kind == UnitKind::Building => Some(percent),
        EffectKind::CommanderBonus { percent } if kind == UnitKind::Commander => Some(percent),
        EffectKind::CounterBonus { percent } if counter => Some(percent),
        _ => None,
    })
}

/// Inclusive damage roll bounds of `attacker` against `defender`.
///
/// # Formula
///
/// ```text
/// bound = base_attack × health / max_health           (health)
///       × (100 + class_bonus_percent × level) / 100    (class, floored at 0)
///       × (100 + type_bonus_percent) / 100             (type)
/// ```
pub fn scaled_damage(
    attacker: &Unit,
    defender: &Unit,
    class_bonus_percent: i32,
    level: i32,
    counter: bool,
) -> (i32, i32) {
    let bonus = type_bonus_percent(attacker, defender, counter);
    let scale = |base: i32| {
        let value = health_scaled(base, attacker.health(), attacker.max_health());
        let value = class_scaled(value, class_bonus_percent, level);
        type_scaled(value, bonus)
    };
    let (min, max) = attacker.stats().damage_bounds();
    let (low, high) = (scale(min), scale(max));
    (low.min(high), high)
}

/// Flat reduction the defender applies to a hit from `distance`.
pub fn reduction(defender: &Unit, distance: u32) -> i32 {
    let specific = if distance == 0 {
        StatKind::MeleeReduction
    } else {
        StatKind::RangedReduction
    };
    defender.stat(StatKind::Toughness) + defender.stat(specific)
}

/// Damage that lands after reduction, never below `floor`.
pub fn mitigated(roll: i32, reduction: i32, floor: i32) -> i32 {
    (roll - reduction).max(floor.max(0))
}
