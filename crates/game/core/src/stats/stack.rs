use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::state::{ModifierId, UnitId};

use super::modifier::{EffectKind, ModifierDuration, ModifierInstance, StackingPolicy};

/// Result of offering a modifier instance to a unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StackOutcome {
    /// Attached as a new instance.
    Applied(ModifierId),
    /// Attached after evicting a shorter instance of the same name.
    Replaced {
        added: ModifierId,
        removed: ModifierInstance,
    },
    /// The existing instance absorbed the newcomer's duration.
    Extended {
        existing: ModifierId,
        remaining: ModifierDuration,
    },
    /// Stacking policy refused the newcomer.
    Rejected { existing: ModifierId },
    /// The unit already carries the maximum number of modifiers.
    Overflow,
}

impl StackOutcome {
    /// Id of the instance now stored for the newcomer, if one was stored.
    pub fn attached(&self) -> Option<ModifierId> {
        match self {
            Self::Applied(id) | Self::Replaced { added: id, .. } => Some(*id),
            Self::Extended { .. } | Self::Rejected { .. } | Self::Overflow => None,
        }
    }
}

/// Active modifiers on one unit, in attachment order, at most
/// [`GameConfig::MAX_MODIFIERS_PER_UNIT`] of them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierStack {
    entries: ArrayVec<ModifierInstance, { GameConfig::MAX_MODIFIERS_PER_UNIT }>,
}

impl ModifierStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers `instance` under its own stacking policy.
    pub fn attach(&mut self, instance: ModifierInstance) -> StackOutcome {
        let existing = self
            .entries
            .iter()
            .position(|entry| entry.name == instance.name);

        match (instance.policy, existing) {
            (StackingPolicy::FreelyStackable, _) | (_, None) => self.push(instance),
            (StackingPolicy::RejectDuplicate, Some(index)) => StackOutcome::Rejected {
                existing: self.entries[index].id,
            },
            (StackingPolicy::ReplaceIfLonger, Some(index)) => {
                if instance.remaining.exceeds(self.entries[index].remaining) {
                    let removed = self.entries.remove(index);
                    let added = instance.id;
                    self.entries.push(instance);
                    StackOutcome::Replaced { added, removed }
                } else {
                    StackOutcome::Rejected {
                        existing: self.entries[index].id,
                    }
                }
            }
            (StackingPolicy::DurationAdditive, Some(index)) => {
                let entry = &mut self.entries[index];
                entry.remaining = entry.remaining.extended_by(instance.remaining);
                StackOutcome::Extended {
                    existing: entry.id,
                    remaining: entry.remaining,
                }
            }
        }
    }

    fn push(&mut self, instance: ModifierInstance) -> StackOutcome {
        let id = instance.id;
        match self.entries.try_push(instance) {
            Ok(()) => StackOutcome::Applied(id),
            Err(_) => StackOutcome::Overflow,
        }
    }

    pub fn remove(&mut self, id: ModifierId) -> Option<ModifierInstance> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Turn-start tick: decrements finite durations and drops every instance
    /// that expired or whose source is gone. Returns the dropped instances.
    pub fn tick(&mut self, source_alive: impl Fn(UnitId) -> bool) -> Vec<ModifierInstance> {
        for entry in &mut self.entries {
            entry.remaining = entry.remaining.ticked();
        }
        let mut expired = Vec::new();
        let mut index = 0;
        while index < self.entries.len() {
            let entry = &self.entries[index];
            if entry.remaining.is_expired() || !source_alive(entry.source) {
                expired.push(self.entries.remove(index));
            } else {
                index += 1;
            }
        }
        expired
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModifierInstance> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: ModifierId) -> Option<&ModifierInstance> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ModifierInstance> + 'a {
        self.entries.iter().filter(move |entry| entry.name == name)
    }

    pub fn effects(&self) -> impl Iterator<Item = EffectKind> + '_ {
        self.entries.iter().filter_map(ModifierInstance::effect_kind)
    }

    /// Sums the values `select` extracts from matching effects.
    pub fn sum_effects(&self, select: impl Fn(EffectKind) -> Option<i32>) -> i32 {
        self.effects().filter_map(select).sum()
    }

    pub fn has_effect(&self, kind: EffectKind) -> bool {
        self.effects().any(|effect| effect == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{ModifierTemplate, StatKind, StatOp};

    struct Ids(u32);

    impl Ids {
        fn next(&mut self) -> ModifierId {
            self.0 += 1;
            ModifierId(self.0)
        }
    }

    fn template(name: &str, turns: i32, policy: StackingPolicy) -> ModifierTemplate {
        ModifierTemplate::stat(
            name,
            StatKind::MaxAttack,
            StatOp::Add(1),
            ModifierDuration::Finite(turns),
            policy,
        )
    }

    fn offer(stack: &mut ModifierStack, ids: &mut Ids, template: &ModifierTemplate) -> StackOutcome {
        stack.attach(template.instantiate(ids.next(), UnitId(1), UnitId(2)))
    }

    #[test]
    fn reject_duplicate_keeps_one_instance() {
        let mut stack = ModifierStack::new();
        let mut ids = Ids(0);
        let banner = template("banner", 3, StackingPolicy::RejectDuplicate);

        assert_eq!(offer(&mut stack, &mut ids, &banner), StackOutcome::Applied(ModifierId(1)));
        assert_eq!(
            offer(&mut stack, &mut ids, &banner),
            StackOutcome::Rejected {
                existing: ModifierId(1)
            }
        );
        assert_eq!(stack.named("banner").count(), 1);
    }

    #[test]
    fn duration_additive_merges_durations() {
        let mut stack = ModifierStack::new();
        let mut ids = Ids(0);
        offer(&mut stack, &mut ids, &template("poison", 3, StackingPolicy::DurationAdditive));
        let outcome = offer(&mut stack, &mut ids, &template("poison", 4, StackingPolicy::DurationAdditive));

        assert_eq!(
            outcome,
            StackOutcome::Extended {
                existing: ModifierId(1),
                remaining: ModifierDuration::Finite(7)
            }
        );
        assert_eq!(stack.len(), 1);
        assert_eq!(
            stack.get(ModifierId(1)).map(|m| m.remaining),
            Some(ModifierDuration::Finite(7))
        );
    }

    #[test]
    fn replace_if_longer_only_swaps_for_longer() {
        let mut stack = ModifierStack::new();
        let mut ids = Ids(0);
        offer(&mut stack, &mut ids, &template("shield", 2, StackingPolicy::ReplaceIfLonger));

        let shorter = offer(&mut stack, &mut ids, &template("shield", 2, StackingPolicy::ReplaceIfLonger));
        assert!(matches!(shorter, StackOutcome::Rejected { .. }));

        let longer = offer(&mut stack, &mut ids, &template("shield", 5, StackingPolicy::ReplaceIfLonger));
        match longer {
            StackOutcome::Replaced { added, removed } => {
                assert_eq!(added, ModifierId(3));
                assert_eq!(removed.id, ModifierId(1));
            }
            other => panic!("expected replacement, got {other:?}"),
        }
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.iter().next().map(|m| m.id), Some(ModifierId(3)));
    }

    #[test]
    fn freely_stackable_coexists() {
        let mut stack = ModifierStack::new();
        let mut ids = Ids(0);
        let rally = template("rally", 1, StackingPolicy::FreelyStackable);
        for _ in 0..3 {
            assert!(offer(&mut stack, &mut ids, &rally).attached().is_some());
        }
        assert_eq!(stack.named("rally").count(), 3);
    }

    #[test]
    fn different_names_never_collide() {
        let mut stack = ModifierStack::new();
        let mut ids = Ids(0);
        offer(&mut stack, &mut ids, &template("a", 1, StackingPolicy::RejectDuplicate));
        let outcome = offer(&mut stack, &mut ids, &template("b", 1, StackingPolicy::RejectDuplicate));
        assert_eq!(outcome, StackOutcome::Applied(ModifierId(2)));
    }

    #[test]
    fn tick_removes_expired_and_orphaned() {
        let mut stack = ModifierStack::new();
        let mut ids = Ids(0);
        offer(&mut stack, &mut ids, &template("zero", 0, StackingPolicy::FreelyStackable));
        offer(&mut stack, &mut ids, &template("one", 1, StackingPolicy::FreelyStackable));

        let orphan = ModifierTemplate::stat(
            "orphan",
            StatKind::Vision,
            StatOp::Add(1),
            ModifierDuration::Infinite,
            StackingPolicy::FreelyStackable,
        )
        .instantiate(ids.next(), UnitId(1), UnitId(99));
        stack.attach(orphan);

        let removed = stack.tick(|source| source != UnitId(99));
        let names: Vec<_> = removed.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["zero", "orphan"]);
        assert_eq!(stack.len(), 1);

        assert_eq!(
            stack.iter().next().map(|m| m.remaining),
            Some(ModifierDuration::Finite(0))
        );
        let removed = stack.tick(|_| true);
        assert_eq!(removed.len(), 1);
        assert!(stack.is_empty());
    }

    #[test]
    fn overflow_is_reported() {
        let mut stack = ModifierStack::new();
        let mut ids = Ids(0);
        let stackable = template("stack", 1, StackingPolicy::FreelyStackable);
        for _ in 0..GameConfig::MAX_MODIFIERS_PER_UNIT {
            offer(&mut stack, &mut ids, &stackable);
        }
        assert_eq!(offer(&mut stack, &mut ids, &stackable), StackOutcome::Overflow);
        assert_eq!(stack.len(), GameConfig::MAX_MODIFIERS_PER_UNIT);

        // A full stack still swaps a longer instance in place.
        let shield = template("shield", 9, StackingPolicy::ReplaceIfLonger);
        stack.remove(ModifierId(1));
        assert!(offer(&mut stack, &mut ids, &shield).attached().is_some());
        let longer = template("shield", 12, StackingPolicy::ReplaceIfLonger);
        assert!(matches!(
            offer(&mut stack, &mut ids, &longer),
            StackOutcome::Replaced { .. }
        ));
        assert_eq!(stack.len(), GameConfig::MAX_MODIFIERS_PER_UNIT);
    }

    #[test]
    fn effect_sums() {
        let mut stack = ModifierStack::new();
        let mut ids = Ids(0);
        for percent in [10, 15] {
            let template = ModifierTemplate::effect(
                "siegecraft",
                EffectKind::BuildingBonus { percent },
                ModifierDuration::Infinite,
                StackingPolicy::FreelyStackable,
            );
            offer(&mut stack, &mut ids, &template);
        }
        let total = stack.sum_effects(|effect| match effect {
            EffectKind::BuildingBonus { percent } => Some(percent),
            _ => None,
        });
        assert_eq!(total, 25);
        assert!(!stack.has_effect(EffectKind::Rooted));
    }
}
