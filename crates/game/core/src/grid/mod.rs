//! Board geometry: tiles, terrain, occupancy and spatial queries.
//!
//! The [`Grid`] is rectangular and its terrain is fixed at construction. The
//! only mutable part is tile occupancy, which the world arena keeps in sync
//! with unit positions.

mod position;
mod region;
mod terrain;

pub use position::{Direction, Offset, Position};
pub use terrain::{TerrainKind, TerrainSet};

use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;

use arrayvec::ArrayVec;

use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::state::UnitId;
use region::RegionCache;

/// Absolute tiles reported in row-major order.
pub type TileSet = BTreeSet<Position>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridError {
    #[error("position {position} is out of bounds")]
    OutOfBounds { position: Position },

    #[error("grid must have at least one row and one column")]
    Empty,

    #[error("row {row} has {found} tiles, expected {expected}")]
    Jagged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("tile {position} is already occupied by {occupant}")]
    Occupied {
        position: Position,
        occupant: UnitId,
    },
}

impl GameError for GridError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::OutOfBounds { .. } | Self::Occupied { .. } => ErrorSeverity::Rejected,
            Self::Empty | Self::Jagged { .. } => ErrorSeverity::Fatal,
        }
    }

    fn context(&self) -> Option<ErrorContext> {
        match self {
            Self::OutOfBounds { position } => Some(ErrorContext::new().with_position(*position)),
            Self::Occupied { position, occupant } => Some(
                ErrorContext::new()
                    .with_position(*position)
                    .with_unit(*occupant),
            ),
            Self::Empty | Self::Jagged { .. } => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::OutOfBounds { .. } => "GRID_OUT_OF_BOUNDS",
            Self::Empty => "GRID_EMPTY",
            Self::Jagged { .. } => "GRID_JAGGED",
            Self::Occupied { .. } => "GRID_OCCUPIED",
        }
    }
}

/// A single board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    position: Position,
    terrain: TerrainKind,
    occupant: Option<UnitId>,
}

impl Tile {
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn terrain(&self) -> TerrainKind {
        self.terrain
    }

    /// Unit standing on this tile. The tile only refers to it; the world
    /// arena owns the unit.
    pub fn occupant(&self) -> Option<UnitId> {
        self.occupant
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

/// Rectangular board of tiles plus the start position of each player slot.
#[derive(Clone, Debug)]
pub struct Grid {
    rows: u32,
    cols: u32,
    tiles: Vec<Tile>,
    start_positions: Vec<Position>,
    regions: RegionCache,
}

impl Grid {
    /// Creates a `rows × cols` grid covered in a single terrain.
    pub fn filled(rows: u32, cols: u32, terrain: TerrainKind) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::Empty);
        }
        let layout = (0..rows)
            .map(|_| vec![terrain; cols as usize])
            .collect::<Vec<_>>();
        Self::from_rows(layout)
    }

    /// Builds a grid from terrain rows. Every row must have the same length.
    pub fn from_rows(layout: Vec<Vec<TerrainKind>>) -> Result<Self, GridError> {
        let expected = layout.first().map(Vec::len).unwrap_or(0);
        if expected == 0 {
            return Err(GridError::Empty);
        }

        let mut tiles = Vec::with_capacity(layout.len() * expected);
        for (row, terrains) in layout.iter().enumerate() {
            if terrains.len() != expected {
                return Err(GridError::Jagged {
                    row,
                    expected,
                    found: terrains.len(),
                });
            }
            tiles.extend(terrains.iter().enumerate().map(|(col, &terrain)| Tile {
                position: Position::new(row as i32, col as i32),
                terrain,
                occupant: None,
            }));
        }

        let tile_count = tiles.len();
        Ok(Self {
            rows: layout.len() as u32,
            cols: expected as u32,
            tiles,
            start_positions: Vec::new(),
            regions: RegionCache::new(tile_count),
        })
    }

    /// Sets the start tile of each player slot (slot `i` = player `i`).
    pub fn with_start_positions(mut self, starts: Vec<Position>) -> Result<Self, GridError> {
        if let Some(&position) = starts.iter().find(|p| !self.contains(**p)) {
            return Err(GridError::OutOfBounds { position });
        }
        self.start_positions = starts;
        Ok(self)
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn start_positions(&self) -> &[Position] {
        &self.start_positions
    }

    pub fn contains(&self, position: Position) -> bool {
        position.row >= 0
            && position.col >= 0
            && position.row < self.rows as i32
            && position.col < self.cols as i32
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.row as usize * self.cols as usize + position.col as usize)
    }

    /// Bounds-checked tile lookup.
    pub fn tile_at(&self, position: Position) -> Result<&Tile, GridError> {
        self.tile(position)
            .ok_or(GridError::OutOfBounds { position })
    }

    pub fn tile(&self, position: Position) -> Option<&Tile> {
        self.index(position).map(|index| &self.tiles[index])
    }

    pub fn terrain(&self, position: Position) -> Option<TerrainKind> {
        self.tile(position).map(Tile::terrain)
    }

    /// Adjacent tile in `direction`, or `None` when it falls off the board.
    pub fn neighbor(&self, position: Position, direction: Direction) -> Option<Position> {
        let next = position.step(direction);
        self.contains(next).then_some(next)
    }

    /// In-bounds orthogonal neighbors in left/up/right/down order.
    pub fn neighbors(&self, position: Position) -> ArrayVec<Position, 4> {
        Direction::ALL
            .iter()
            .filter_map(|&direction| self.neighbor(position, direction))
            .collect()
    }

    /// Manhattan distance between two tiles.
    pub fn distance(&self, a: Position, b: Position) -> u32 {
        a.manhattan(b)
    }

    /// Every tile in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// All in-bounds tiles within Manhattan `radius` of `center`, row-major.
    pub fn radial_cloud(&self, center: Position, radius: u32) -> TileSet {
        let r = radius as i32;
        let mut tiles = TileSet::new();
        for dr in -r..=r {
            let span = r - dr.abs();
            for dc in -span..=span {
                let position = center.offset(Offset::new(dr, dc));
                if self.contains(position) {
                    tiles.insert(position);
                }
            }
        }
        tiles
    }

    /// Flood fill from `start` across orthogonally connected tiles whose
    /// terrain satisfies `predicate`. Empty when `start` itself fails.
    pub fn contiguous_region(
        &self,
        start: Position,
        predicate: impl Fn(TerrainKind) -> bool,
    ) -> TileSet {
        let mut region = TileSet::new();
        let Some(terrain) = self.terrain(start) else {
            return region;
        };
        if !predicate(terrain) {
            return region;
        }

        let mut queue = VecDeque::from([start]);
        region.insert(start);
        while let Some(current) = queue.pop_front() {
            for next in self.neighbors(current) {
                if region.contains(&next) {
                    continue;
                }
                if self.terrain(next).is_some_and(&predicate) {
                    region.insert(next);
                    queue.push_back(next);
                }
            }
        }
        region
    }

    /// Connected region of tiles sharing the terrain of `position` (e.g. a
    /// mountain range), memoized per region.
    pub fn terrain_region(&self, position: Position) -> Result<Arc<[Position]>, GridError> {
        let index = self
            .index(position)
            .ok_or(GridError::OutOfBounds { position })?;
        if let Some(region) = self.regions.lookup(index) {
            return Ok(region);
        }

        let terrain = self.tiles[index].terrain;
        let members = self.contiguous_region(position, |t| t == terrain);
        let indices = members
            .iter()
            .filter_map(|&p| self.index(p))
            .collect::<Vec<_>>();
        Ok(self.regions.store(indices, members.into_iter().collect()))
    }

    /// Number of regions flooded so far.
    pub fn cached_region_count(&self) -> usize {
        self.regions.cached_regions()
    }

    pub fn occupant(&self, position: Position) -> Option<UnitId> {
        self.tile(position).and_then(Tile::occupant)
    }

    /// Puts `unit` on an empty tile.
    pub fn place(&mut self, position: Position, unit: UnitId) -> Result<(), GridError> {
        let index = self
            .index(position)
            .ok_or(GridError::OutOfBounds { position })?;
        let tile = &mut self.tiles[index];
        if let Some(occupant) = tile.occupant {
            return Err(GridError::Occupied { position, occupant });
        }
        tile.occupant = Some(unit);
        Ok(())
    }

    /// Empties a tile, returning whoever stood there.
    pub fn clear(&mut self, position: Position) -> Option<UnitId> {
        let index = self.index(position)?;
        self.tiles[index].occupant.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ridge_grid() -> Grid {
        use TerrainKind::{Grass as G, Mountain as M};
        Grid::from_rows(vec![
            vec![M, M, G, G],
            vec![G, M, G, M],
            vec![G, G, G, M],
        ])
        .unwrap()
    }

    #[test]
    fn jagged_rows_are_rejected() {
        let err = Grid::from_rows(vec![
            vec![TerrainKind::Grass; 3],
            vec![TerrainKind::Grass; 2],
        ])
        .unwrap_err();
        assert_eq!(
            err,
            GridError::Jagged {
                row: 1,
                expected: 3,
                found: 2
            }
        );
        assert!(err.severity().is_fatal());
    }

    #[test]
    fn empty_grid_is_rejected() {
        assert_eq!(Grid::from_rows(Vec::new()).unwrap_err(), GridError::Empty);
        assert_eq!(
            Grid::filled(0, 3, TerrainKind::Grass).unwrap_err(),
            GridError::Empty
        );
    }

    #[test]
    fn tile_at_is_bounds_checked() {
        let grid = Grid::filled(3, 4, TerrainKind::Grass).unwrap();
        assert!(grid.tile_at(Position::new(2, 3)).is_ok());
        assert_eq!(
            grid.tile_at(Position::new(3, 0)).unwrap_err(),
            GridError::OutOfBounds {
                position: Position::new(3, 0)
            }
        );
        assert!(grid.tile_at(Position::new(0, -1)).is_err());
    }

    #[test]
    fn neighbor_is_none_off_grid() {
        let grid = Grid::filled(2, 2, TerrainKind::Grass).unwrap();
        let corner = Position::ORIGIN;
        assert_eq!(grid.neighbor(corner, Direction::Up), None);
        assert_eq!(grid.neighbor(corner, Direction::Left), None);
        assert_eq!(
            grid.neighbor(corner, Direction::Right),
            Some(Position::new(0, 1))
        );
        assert_eq!(grid.neighbors(corner).len(), 2);
    }

    #[test]
    fn radial_cloud_is_a_clipped_diamond() {
        let grid = Grid::filled(5, 5, TerrainKind::Grass).unwrap();
        assert_eq!(grid.radial_cloud(Position::new(2, 2), 2).len(), 13);

        let corner = grid.radial_cloud(Position::ORIGIN, 1);
        let expected: Vec<_> = vec![Position::new(0, 0), Position::new(0, 1), Position::new(1, 0)];
        assert_eq!(corner.into_iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn contiguous_region_follows_predicate() {
        let grid = ridge_grid();
        let ridge = grid.contiguous_region(Position::ORIGIN, |t| t == TerrainKind::Mountain);
        assert_eq!(ridge.len(), 3);
        assert!(ridge.contains(&Position::new(1, 1)));
        assert!(!ridge.contains(&Position::new(1, 3)));

        let none = grid.contiguous_region(Position::new(0, 2), |t| t == TerrainKind::Mountain);
        assert!(none.is_empty());
    }

    #[test]
    fn terrain_region_is_memoized_per_region() {
        let grid = ridge_grid();
        let first = grid.terrain_region(Position::ORIGIN).unwrap();
        assert_eq!(grid.cached_region_count(), 1);

        let again = grid.terrain_region(Position::new(1, 1)).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(grid.cached_region_count(), 1);

        let east = grid.terrain_region(Position::new(2, 3)).unwrap();
        assert_eq!(east.len(), 2);
        assert_eq!(grid.cached_region_count(), 2);
    }

    #[test]
    fn placing_on_occupied_tile_fails() {
        let mut grid = Grid::filled(2, 2, TerrainKind::Grass).unwrap();
        let tile = Position::new(1, 1);
        grid.place(tile, UnitId(1)).unwrap();
        assert_eq!(
            grid.place(tile, UnitId(2)).unwrap_err(),
            GridError::Occupied {
                position: tile,
                occupant: UnitId(1)
            }
        );
        assert_eq!(grid.clear(tile), Some(UnitId(1)));
        assert_eq!(grid.occupant(tile), None);
    }

    #[test]
    fn start_positions_must_be_on_the_board() {
        let grid = Grid::filled(3, 3, TerrainKind::Grass).unwrap();
        let err = grid
            .with_start_positions(vec![Position::ORIGIN, Position::new(3, 3)])
            .unwrap_err();
        assert_eq!(
            err,
            GridError::OutOfBounds {
                position: Position::new(3, 3)
            }
        );
    }
}
