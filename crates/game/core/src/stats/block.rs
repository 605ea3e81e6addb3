use std::ops::Index;

use strum::EnumCount;

use super::modifier::{ModifierEffect, ModifierInstance, StatOp};

/// Every numeric stat a unit carries.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    strum::EnumCount,
    strum::Display,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatKind {
    MaxHealth,
    /// Movement points restored at turn start.
    Movement,
    /// Actions restored at turn start.
    Actions,
    MinAttack,
    MaxAttack,
    /// Attack range bounds, measured as Manhattan distance minus one
    /// (adjacent = 0).
    MinRange,
    MaxRange,
    Vision,
    /// Flat reduction against every hit.
    Toughness,
    /// Extra reduction against adjacent attackers.
    MeleeReduction,
    /// Extra reduction against non-adjacent attackers.
    RangedReduction,
    /// Radius around a summoner where new units may be placed.
    SummonRange,
}

/// Fixed-size table of stat values indexed by [`StatKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatBlock {
    values: [i32; <StatKind as EnumCount>::COUNT],
}

impl StatBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: StatKind) -> i32 {
        self.values[kind as usize]
    }

    pub fn set(&mut self, kind: StatKind, value: i32) {
        self.values[kind as usize] = value;
    }

    /// Builder-style setter.
    #[must_use]
    pub fn with(mut self, kind: StatKind, value: i32) -> Self {
        self.set(kind, value);
        self
    }

    /// Applies one operation to one stat.
    pub fn apply(&mut self, kind: StatKind, op: StatOp) {
        let current = self.get(kind);
        let next = match op {
            StatOp::Add(delta) => current.saturating_add(delta),
            StatOp::Multiply(percent) => {
                let scaled = i64::from(current) * i64::from(percent) / 100;
                scaled.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
            }
            StatOp::SetMin(floor) => current.max(floor),
            StatOp::SetMax(cap) => current.min(cap),
        };
        self.set(kind, next);
    }

    /// Effective stats: `base` with every stat modifier applied in order.
    ///
    /// Effect-only modifiers are skipped; combat and movement read their
    /// [`EffectKind`](super::EffectKind) directly.
    pub fn fold<'a>(
        base: &StatBlock,
        modifiers: impl IntoIterator<Item = &'a ModifierInstance>,
    ) -> StatBlock {
        modifiers.into_iter().fold(*base, |mut stats, modifier| {
            if let ModifierEffect::Stat { stat, op } = modifier.effect {
                stats.apply(stat, op);
            }
            stats
        })
    }

    /// Inclusive attack damage bounds.
    pub fn damage_bounds(&self) -> (i32, i32) {
        (self.get(StatKind::MinAttack), self.get(StatKind::MaxAttack))
    }

    /// Inclusive attack distance bounds (Manhattan minus one).
    pub fn attack_reach(&self) -> (u32, u32) {
        (
            self.get(StatKind::MinRange).max(0) as u32,
            self.get(StatKind::MaxRange).max(0) as u32,
        )
    }
}

impl Index<StatKind> for StatBlock {
    type Output = i32;

    fn index(&self, kind: StatKind) -> &i32 {
        &self.values[kind as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ModifierId, UnitId};
    use crate::stats::{ModifierDuration, ModifierTemplate, StackingPolicy};

    fn stat_mod(id: u32, stat: StatKind, op: StatOp) -> ModifierInstance {
        ModifierTemplate::stat(
            "test",
            stat,
            op,
            ModifierDuration::Infinite,
            StackingPolicy::FreelyStackable,
        )
        .instantiate(ModifierId(id), UnitId(1), UnitId(2))
    }

    #[test]
    fn builder_and_index() {
        let stats = StatBlock::new()
            .with(StatKind::MaxHealth, 30)
            .with(StatKind::Movement, 4);
        assert_eq!(stats[StatKind::MaxHealth], 30);
        assert_eq!(stats.get(StatKind::Movement), 4);
        assert_eq!(stats.get(StatKind::Vision), 0);
    }

    #[test]
    fn add_and_multiply() {
        let base = StatBlock::new().with(StatKind::MaxAttack, 10);
        let mods = [
            stat_mod(1, StatKind::MaxAttack, StatOp::Add(5)),
            stat_mod(2, StatKind::MaxAttack, StatOp::Multiply(150)),
        ];
        let effective = StatBlock::fold(&base, &mods);
        assert_eq!(effective[StatKind::MaxAttack], 22);
    }

    #[test]
    fn clamps_respect_attachment_order() {
        let base = StatBlock::new().with(StatKind::Movement, 2);

        let cap_then_boost = [
            stat_mod(1, StatKind::Movement, StatOp::SetMax(1)),
            stat_mod(2, StatKind::Movement, StatOp::Add(3)),
        ];
        assert_eq!(StatBlock::fold(&base, &cap_then_boost)[StatKind::Movement], 4);

        let boost_then_cap = [
            stat_mod(2, StatKind::Movement, StatOp::Add(3)),
            stat_mod(1, StatKind::Movement, StatOp::SetMax(1)),
        ];
        assert_eq!(StatBlock::fold(&base, &boost_then_cap)[StatKind::Movement], 1);
    }

    #[test]
    fn set_min_raises_floor() {
        let base = StatBlock::new().with(StatKind::Vision, 1);
        let mods = [stat_mod(1, StatKind::Vision, StatOp::SetMin(3))];
        assert_eq!(StatBlock::fold(&base, &mods)[StatKind::Vision], 3);
    }

    #[test]
    fn fold_is_pure() {
        let base = StatBlock::new().with(StatKind::Toughness, 2);
        let mods = [stat_mod(1, StatKind::Toughness, StatOp::Add(1))];
        let first = StatBlock::fold(&base, &mods);
        let second = StatBlock::fold(&base, &mods);
        assert_eq!(first, second);
        assert_eq!(base[StatKind::Toughness], 2);
    }
}
