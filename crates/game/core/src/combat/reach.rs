use crate::cloud::Cloud;
use crate::grid::{Grid, Offset, Position, TileSet};
use crate::movement::MovementCloud;
use crate::state::{Unit, World};

/// Ring of offsets an attack with reach `[min, max]` (Manhattan minus one)
/// covers: everything within `max + 1` except everything within `min`.
pub fn attack_cloud(min: u32, max: u32) -> Cloud {
    if max < min {
        return Cloud::from_offsets(Vec::<Offset>::new());
    }
    Cloud::circle(max + 1).difference(&Cloud::circle(min))
}

/// Tiles `unit` could attack if it stood on `from`.
pub fn attackable_from(grid: &Grid, unit: &Unit, from: Position) -> TileSet {
    if !unit.can_fight() {
        return TileSet::new();
    }
    let (min, max) = unit.stats().attack_reach();
    attack_cloud(min, max).to_tile_set(grid, from)
}

/// Tiles `unit` can attack without moving.
pub fn attackable_tiles(grid: &Grid, unit: &Unit) -> TileSet {
    attackable_from(grid, unit, unit.position())
}

/// Every tile `unit` could attack this turn: the union of its attack area
/// from each reachable stopping tile and from where it stands.
pub fn danger_zone(grid: &Grid, unit: &Unit, stops: &TileSet) -> TileSet {
    if !unit.can_fight() {
        return TileSet::new();
    }
    let (min, max) = unit.stats().attack_reach();
    let area = attack_cloud(min, max);
    std::iter::once(unit.position())
        .chain(stops.iter().copied())
        .flat_map(|stop| area.to_tile_set(grid, stop))
        .collect()
}

/// [`danger_zone`] for the destinations of a movement cloud.
pub fn cloud_danger_zone(
    world: &World,
    unit: &Unit,
    cloud: &MovementCloud,
) -> TileSet {
    danger_zone(world.grid(), unit, &cloud.destinations(world))
}
