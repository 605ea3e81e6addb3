//! Combat classes and their cyclic advantage relation.

use strum::IntoEnumIterator;

/// Combatant classes.
///
/// ```text
///   Sword ──▶ Spear ──▶ Cavalry ──▶ Sword
///     ▲         ▲          │
///     └─ Ranged ┘          ├──▶ Ranged
///                          └──▶ Siege
/// ```
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::EnumIter,
    strum::Display,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatClass {
    Sword,
    Spear,
    Cavalry,
    Ranged,
    Siege,
}

impl CombatClass {
    pub const fn flag(self) -> ClassSet {
        match self {
            CombatClass::Sword => ClassSet::SWORD,
            CombatClass::Spear => ClassSet::SPEAR,
            CombatClass::Cavalry => ClassSet::CAVALRY,
            CombatClass::Ranged => ClassSet::RANGED,
            CombatClass::Siege => ClassSet::SIEGE,
        }
    }

    /// Classes this class has the advantage over.
    pub const fn beats(self) -> ClassSet {
        match self {
            CombatClass::Sword => ClassSet::SPEAR,
            CombatClass::Spear => ClassSet::CAVALRY,
            CombatClass::Cavalry => ClassSet::SWORD
                .union(ClassSet::RANGED)
                .union(ClassSet::SIEGE),
            CombatClass::Ranged => ClassSet::SPEAR.union(ClassSet::SWORD),
            CombatClass::Siege => ClassSet::empty(),
        }
    }
}

bitflags::bitflags! {
    /// Set of classes a unit belongs to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ClassSet: u8 {
        const SWORD = 1 << 0;
        const SPEAR = 1 << 1;
        const CAVALRY = 1 << 2;
        const RANGED = 1 << 3;
        const SIEGE = 1 << 4;
    }
}

impl ClassSet {
    pub fn classes(self) -> impl Iterator<Item = CombatClass> {
        CombatClass::iter().filter(move |class| self.contains(class.flag()))
    }

    /// Number of classes in `self` that beat at least one class in `other`.
    pub fn advantages_over(self, other: ClassSet) -> i32 {
        self.classes()
            .filter(|class| class.beats().intersects(other))
            .count() as i32
    }
}

impl From<CombatClass> for ClassSet {
    fn from(class: CombatClass) -> Self {
        class.flag()
    }
}

/// Advantage level of `attacker` over `defender`.
///
/// Positive favours the attacker, negative the defender. A counter-attack
/// uses the negated value.
pub fn class_bonus_level(attacker: ClassSet, defender: ClassSet) -> i32 {
    attacker.advantages_over(defender) - defender.advantages_over(attacker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_triangle_is_cyclic() {
        assert_eq!(class_bonus_level(ClassSet::SWORD, ClassSet::SPEAR), 1);
        assert_eq!(class_bonus_level(ClassSet::SPEAR, ClassSet::CAVALRY), 1);
        assert_eq!(class_bonus_level(ClassSet::CAVALRY, ClassSet::SWORD), 1);
        assert_eq!(class_bonus_level(ClassSet::SPEAR, ClassSet::SWORD), -1);
    }

    #[test]
    fn level_is_antisymmetric() {
        for a in CombatClass::iter() {
            for b in CombatClass::iter() {
                assert_eq!(
                    class_bonus_level(a.into(), b.into()),
                    -class_bonus_level(b.into(), a.into()),
                    "{a} vs {b}"
                );
            }
        }
    }

    #[test]
    fn no_class_beats_itself() {
        for class in CombatClass::iter() {
            assert!(!class.beats().contains(class.flag()), "{class}");
        }
    }

    #[test]
    fn multi_class_units_accumulate() {
        let hybrid = ClassSet::SWORD | ClassSet::RANGED;
        // Sword and Ranged both beat Spear.
        assert_eq!(class_bonus_level(hybrid, ClassSet::SPEAR), 2);
        // Cavalry beats both of the hybrid's classes but counts once.
        assert_eq!(class_bonus_level(ClassSet::CAVALRY, hybrid), 1);
    }

    #[test]
    fn classless_units_are_neutral() {
        assert_eq!(class_bonus_level(ClassSet::empty(), ClassSet::SIEGE), 0);
    }
}
