//! Per-player fog of war.
//!
//! A player sees the Manhattan disc of each owned unit's `Vision` stat. A
//! unit standing on a mountain also sees the whole connected mountain range
//! it stands on.

use crate::grid::{Position, TerrainKind, TileSet};
use crate::stats::StatKind;

use super::common::PlayerId;
use super::unit::Unit;
use super::world::World;

impl World {
    /// Every tile `player` can currently see, row-major.
    pub fn visible_tiles(&self, player: PlayerId) -> TileSet {
        if !self.fog_of_war() {
            return self.grid().tiles().map(|tile| tile.position()).collect();
        }

        let mut visible = TileSet::new();
        for unit in self.units_of(player) {
            visible.extend(self.grid().radial_cloud(unit.position(), vision_radius(unit)));
            if let Some(range) = self.mountain_range(unit) {
                visible.extend(range.iter().copied());
            }
        }
        visible
    }

    pub fn can_see(&self, player: PlayerId, position: Position) -> bool {
        if !self.grid().contains(position) {
            return false;
        }
        if !self.fog_of_war() {
            return true;
        }
        self.units_of(player).any(|unit| {
            unit.position().manhattan(position) <= vision_radius(unit)
                || self
                    .mountain_range(unit)
                    .is_some_and(|range| range.binary_search(&position).is_ok())
        })
    }

    fn mountain_range(&self, unit: &Unit) -> Option<std::sync::Arc<[Position]>> {
        if self.grid().terrain(unit.position()) != Some(TerrainKind::Mountain) {
            return None;
        }
        self.grid().terrain_region(unit.position()).ok()
    }
}

fn vision_radius(unit: &Unit) -> u32 {
    unit.stat(StatKind::Vision).max(0) as u32
}

#[cfg(test)]
mod tests {
    use crate::grid::{Grid, Position, TerrainKind};
    use crate::state::{PlayerId, UnitKind, UnitTemplate, World};
    use crate::stats::{StatBlock, StatKind};

    fn lookout(vision: i32) -> UnitTemplate {
        UnitTemplate::new(
            "lookout",
            UnitKind::Combatant,
            StatBlock::new()
                .with(StatKind::MaxHealth, 5)
                .with(StatKind::Vision, vision),
        )
    }

    #[test]
    fn vision_is_a_manhattan_disc() {
        let mut world = World::new(Grid::filled(5, 5, TerrainKind::Grass).unwrap());
        world.add_player(0).unwrap();
        world
            .spawn_unit(&lookout(1), PlayerId(0), Position::new(2, 2))
            .unwrap();

        let visible = world.visible_tiles(PlayerId(0));
        assert_eq!(visible.len(), 5);
        assert!(world.can_see(PlayerId(0), Position::new(1, 2)));
        assert!(!world.can_see(PlayerId(0), Position::new(1, 1)));
    }

    #[test]
    fn mountains_reveal_their_range() {
        use TerrainKind::{Grass as G, Mountain as M};
        let grid = Grid::from_rows(vec![
            vec![M, M, M, M, M],
            vec![G, G, G, G, G],
        ])
        .unwrap();
        let mut world = World::new(grid);
        world.add_player(0).unwrap();
        world
            .spawn_unit(&lookout(0), PlayerId(0), Position::new(0, 0))
            .unwrap();

        assert!(world.can_see(PlayerId(0), Position::new(0, 4)));
        assert!(!world.can_see(PlayerId(0), Position::new(1, 0)));
        assert_eq!(world.visible_tiles(PlayerId(0)).len(), 5);
    }

    #[test]
    fn fog_disabled_reveals_everything() {
        let mut world =
            World::new(Grid::filled(3, 3, TerrainKind::Grass).unwrap()).with_fog_of_war(false);
        world.add_player(0).unwrap();
        assert_eq!(world.visible_tiles(PlayerId(0)).len(), 9);
        assert!(world.can_see(PlayerId(0), Position::new(2, 2)));
    }
}
