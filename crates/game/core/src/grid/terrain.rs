/// Canonical terrain classes for board tiles.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::EnumIter,
    strum::EnumCount,
    strum::Display,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainKind {
    #[default]
    Grass,
    Road,
    Forest,
    Hill,
    Mountain,
    Water,
    Wall,
}

impl TerrainKind {
    /// Movement points spent to enter a tile of this terrain.
    ///
    /// `None` means no unit may ever enter it.
    pub const fn move_cost(self) -> Option<i32> {
        match self {
            TerrainKind::Grass | TerrainKind::Road => Some(1),
            TerrainKind::Forest | TerrainKind::Hill => Some(2),
            TerrainKind::Mountain => Some(3),
            TerrainKind::Water => Some(2),
            TerrainKind::Wall => None,
        }
    }

    pub const fn flag(self) -> TerrainSet {
        match self {
            TerrainKind::Grass => TerrainSet::GRASS,
            TerrainKind::Road => TerrainSet::ROAD,
            TerrainKind::Forest => TerrainSet::FOREST,
            TerrainKind::Hill => TerrainSet::HILL,
            TerrainKind::Mountain => TerrainSet::MOUNTAIN,
            TerrainKind::Water => TerrainSet::WATER,
            TerrainKind::Wall => TerrainSet::WALL,
        }
    }
}

bitflags::bitflags! {
    /// Terrains a unit is allowed to enter.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TerrainSet: u8 {
        const GRASS = 1 << 0;
        const ROAD = 1 << 1;
        const FOREST = 1 << 2;
        const HILL = 1 << 3;
        const MOUNTAIN = 1 << 4;
        const WATER = 1 << 5;
        const WALL = 1 << 6;

        /// Everything a foot soldier can walk on.
        const LAND = Self::GRASS.bits()
            | Self::ROAD.bits()
            | Self::FOREST.bits()
            | Self::HILL.bits()
            | Self::MOUNTAIN.bits();
        /// Open ground only (mounted units, siege engines).
        const OPEN = Self::GRASS.bits() | Self::ROAD.bits() | Self::HILL.bits();
    }
}

impl TerrainSet {
    pub fn allows(self, terrain: TerrainKind) -> bool {
        self.contains(terrain.flag())
    }

    /// Cost for a unit restricted to this set to enter `terrain`.
    pub fn cost_of(self, terrain: TerrainKind) -> Option<i32> {
        if self.allows(terrain) {
            terrain.move_cost()
        } else {
            None
        }
    }
}

impl Default for TerrainSet {
    fn default() -> Self {
        Self::LAND
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn walls_are_never_enterable() {
        assert_eq!(TerrainSet::all().cost_of(TerrainKind::Wall), None);
    }

    #[test]
    fn land_units_cannot_swim() {
        assert_eq!(TerrainSet::LAND.cost_of(TerrainKind::Water), None);
        assert_eq!(TerrainSet::LAND.cost_of(TerrainKind::Forest), Some(2));
    }

    #[test]
    fn every_terrain_has_a_distinct_flag() {
        let mut seen = TerrainSet::empty();
        for terrain in TerrainKind::iter() {
            assert!(!seen.intersects(terrain.flag()), "{terrain}");
            seen |= terrain.flag();
        }
    }
}
