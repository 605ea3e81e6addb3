//! Area-of-effect geometry.
//!
//! A [`Cloud`] is an immutable set of offsets relative to an anchor tile,
//! tagged with the shape it was built from. Clouds compose (union,
//! difference), grow (`expand`), turn (`rotate`, `facing`), and are finally
//! translated onto a [`Grid`] where off-board tiles are silently dropped.
//!
//! Directional shapes (cones and walls) are authored facing right and only
//! make sense when cast onto a tile adjacent to the caster; anything else is
//! a hard precondition failure.

use std::collections::BTreeSet;

use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::grid::{Direction, Grid, Offset, Position, TileSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CloudError {
    #[error("directional cloud cast at distance {distance} from {caster}, must be adjacent")]
    DirectionalDistance { caster: Position, distance: u32 },

    #[error("target {target} is out of bounds")]
    TargetOutOfBounds { target: Position },
}

impl GameError for CloudError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::DirectionalDistance { .. } => ErrorSeverity::Fatal,
            Self::TargetOutOfBounds { .. } => ErrorSeverity::Rejected,
        }
    }

    fn context(&self) -> Option<ErrorContext> {
        match self {
            Self::DirectionalDistance { caster, .. } => {
                Some(ErrorContext::new().with_position(*caster))
            }
            Self::TargetOutOfBounds { target } => Some(ErrorContext::new().with_position(*target)),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DirectionalDistance { .. } => "CLOUD_DIRECTIONAL_DISTANCE",
            Self::TargetOutOfBounds { .. } => "CLOUD_TARGET_OUT_OF_BOUNDS",
        }
    }
}

/// Shape a cloud was built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CloudShape {
    Point,
    /// Manhattan disc.
    Circle { radius: u32 },
    /// Wedge opening away from the caster. `turns` counts clockwise
    /// quarter turns away from facing right.
    Cone { radius: u32, turns: u8 },
    /// Line perpendicular to the casting direction.
    Wall { radius: u32, turns: u8 },
    /// Result of union/difference. Directional if any input was.
    Composite { directional: bool },
}

impl CloudShape {
    pub fn is_directional(self) -> bool {
        match self {
            CloudShape::Cone { .. } | CloudShape::Wall { .. } => true,
            CloudShape::Composite { directional } => directional,
            CloudShape::Point | CloudShape::Circle { .. } => false,
        }
    }
}

/// Set of relative offsets describing an area.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cloud {
    shape: CloudShape,
    offsets: BTreeSet<Offset>,
}

impl Cloud {
    /// The anchor tile alone.
    pub fn point() -> Self {
        Self {
            shape: CloudShape::Point,
            offsets: BTreeSet::from([Offset::ZERO]),
        }
    }

    /// Every offset within Manhattan `radius` of the anchor.
    pub fn circle(radius: u32) -> Self {
        let r = radius as i32;
        let offsets = (-r..=r)
            .flat_map(|dr| {
                let span = r - dr.abs();
                (-span..=span).map(move |dc| Offset::new(dr, dc))
            })
            .collect();
        Self {
            shape: CloudShape::Circle { radius },
            offsets,
        }
    }

    /// Right-facing wedge: `0 <= dc <= radius` and `|dr| <= dc`.
    pub fn cone(radius: u32) -> Self {
        let r = radius as i32;
        let offsets = (0..=r)
            .flat_map(|dc| (-dc..=dc).map(move |dr| Offset::new(dr, dc)))
            .collect();
        Self {
            shape: CloudShape::Cone { radius, turns: 0 },
            offsets,
        }
    }

    /// Vertical line through the anchor, perpendicular to a right-facing cast.
    pub fn wall(radius: u32) -> Self {
        let r = radius as i32;
        let offsets = (-r..=r).map(|dr| Offset::new(dr, 0)).collect();
        Self {
            shape: CloudShape::Wall { radius, turns: 0 },
            offsets,
        }
    }

    /// Arbitrary offset set. Treated as non-directional.
    pub fn from_offsets(offsets: impl IntoIterator<Item = Offset>) -> Self {
        Self {
            shape: CloudShape::Composite { directional: false },
            offsets: offsets.into_iter().collect(),
        }
    }

    pub fn shape(&self) -> CloudShape {
        self.shape
    }

    pub fn is_directional(&self) -> bool {
        self.shape.is_directional()
    }

    pub fn offsets(&self) -> &BTreeSet<Offset> {
        &self.offsets
    }

    pub fn contains(&self, offset: Offset) -> bool {
        self.offsets.contains(&offset)
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn union(&self, other: &Cloud) -> Cloud {
        Cloud {
            shape: CloudShape::Composite {
                directional: self.is_directional() || other.is_directional(),
            },
            offsets: self.offsets.union(&other.offsets).copied().collect(),
        }
    }

    pub fn difference(&self, other: &Cloud) -> Cloud {
        Cloud {
            shape: CloudShape::Composite {
                directional: self.is_directional(),
            },
            offsets: self.offsets.difference(&other.offsets).copied().collect(),
        }
    }

    /// Grows the cloud by `levels` rings.
    ///
    /// Parametric shapes rebuild with a larger radius, keeping their
    /// orientation (a point becomes a circle); composites dilate by one
    /// orthogonal ring per level.
    pub fn expand(&self, levels: u32) -> Cloud {
        if levels == 0 {
            return self.clone();
        }
        match self.shape {
            CloudShape::Point => Cloud::circle(levels),
            CloudShape::Circle { radius } => Cloud::circle(radius + levels),
            CloudShape::Cone { radius, turns } => Cloud::cone(radius + levels).turned(turns),
            CloudShape::Wall { radius, turns } => Cloud::wall(radius + levels).turned(turns),
            CloudShape::Composite { .. } => {
                let mut offsets = self.offsets.clone();
                for _ in 0..levels {
                    let ring: Vec<Offset> = offsets
                        .iter()
                        .flat_map(|&offset| {
                            Direction::ALL.map(|d| {
                                let step = d.delta();
                                Offset::new(offset.row + step.row, offset.col + step.col)
                            })
                        })
                        .collect();
                    offsets.extend(ring);
                }
                Cloud {
                    shape: self.shape,
                    offsets,
                }
            }
        }
    }

    /// Quarter turn about the anchor.
    pub fn rotate(&self, clockwise: bool) -> Cloud {
        let offsets = self
            .offsets
            .iter()
            .map(|&offset| {
                if clockwise {
                    offset.rotate_clockwise()
                } else {
                    offset.rotate_counter_clockwise()
                }
            })
            .collect();
        let step = if clockwise { 1 } else { 3 };
        let shape = match self.shape {
            CloudShape::Cone { radius, turns } => CloudShape::Cone {
                radius,
                turns: (turns + step) % 4,
            },
            CloudShape::Wall { radius, turns } => CloudShape::Wall {
                radius,
                turns: (turns + step) % 4,
            },
            shape => shape,
        };
        Cloud { shape, offsets }
    }

    fn turned(self, turns: u8) -> Cloud {
        (0..turns).fold(self, |cloud, _| cloud.rotate(true))
    }

    /// Orients a right-facing template toward `direction`.
    pub fn facing(&self, direction: Direction) -> Cloud {
        self.clone().turned(direction.quarter_turns_from_right())
    }

    /// Anchors the cloud at `anchor`, dropping tiles that fall off the grid.
    pub fn to_tile_set(&self, grid: &Grid, anchor: Position) -> TileSet {
        self.offsets
            .iter()
            .map(|&offset| anchor.offset(offset))
            .filter(|&position| grid.contains(position))
            .collect()
    }

    /// Resolves the tiles hit when cast from `caster` onto `target`.
    ///
    /// Directional clouds must be cast onto an adjacent tile and are turned
    /// toward it; other clouds are centred on `target`.
    pub fn cast_area(
        &self,
        grid: &Grid,
        caster: Position,
        target: Position,
    ) -> Result<TileSet, CloudError> {
        if !grid.contains(target) {
            return Err(CloudError::TargetOutOfBounds { target });
        }
        if !self.is_directional() {
            return Ok(self.to_tile_set(grid, target));
        }

        let distance = caster.manhattan(target);
        let direction = match caster.direction_to(target) {
            Some(direction) if distance == 1 => direction,
            _ => return Err(CloudError::DirectionalDistance { caster, distance }),
        };
        Ok(self.facing(direction).to_tile_set(grid, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TerrainKind;

    fn open(rows: u32, cols: u32) -> Grid {
        Grid::filled(rows, cols, TerrainKind::Grass).unwrap()
    }

    #[test]
    fn shapes_have_expected_sizes() {
        assert_eq!(Cloud::point().len(), 1);
        assert_eq!(Cloud::circle(1).len(), 5);
        assert_eq!(Cloud::circle(2).len(), 13);
        assert_eq!(Cloud::cone(0).len(), 1);
        assert_eq!(Cloud::cone(2).len(), 1 + 3 + 5);
        assert_eq!(Cloud::wall(2).len(), 5);
    }

    #[test]
    fn circle_expansion_is_monotonic() {
        let mut previous = Cloud::circle(1);
        for levels in 1..5 {
            let grown = Cloud::circle(1).expand(levels);
            assert!(grown.offsets().is_superset(previous.offsets()));
            assert!(grown.len() > previous.len());
            previous = grown;
        }
    }

    #[test]
    fn point_expands_into_circle() {
        let grown = Cloud::point().expand(2);
        assert_eq!(grown.shape(), CloudShape::Circle { radius: 2 });
        assert_eq!(grown, Cloud::circle(2));
        assert_eq!(Cloud::point().expand(0), Cloud::point());
    }

    #[test]
    fn composite_expansion_dilates() {
        let cloud = Cloud::from_offsets([Offset::ZERO]).expand(1);
        assert_eq!(cloud.offsets(), Cloud::circle(1).offsets());
        assert_eq!(cloud.shape(), CloudShape::Composite { directional: false });
    }

    #[test]
    fn four_rotations_are_identity() {
        let clouds = [
            Cloud::cone(3),
            Cloud::wall(2),
            Cloud::circle(2).difference(&Cloud::point()),
            Cloud::from_offsets([Offset::new(1, 2), Offset::new(-3, 0)]),
        ];
        for cloud in clouds {
            let clockwise = (0..4).fold(cloud.clone(), |c, _| c.rotate(true));
            let counter = (0..4).fold(cloud.clone(), |c, _| c.rotate(false));
            assert_eq!(clockwise, cloud);
            assert_eq!(counter, cloud);
        }
    }

    #[test]
    fn rotated_directional_clouds_keep_facing_when_grown() {
        let up = Cloud::cone(1).rotate(false);
        let grown = up.expand(1);
        assert!(grown.offsets().is_superset(up.offsets()));
        assert_eq!(grown, Cloud::cone(2).facing(Direction::Up));
        assert_eq!(grown.shape(), CloudShape::Cone { radius: 2, turns: 3 });

        let wall = Cloud::wall(1).rotate(true);
        assert_eq!(wall.expand(2), Cloud::wall(3).facing(Direction::Down));
    }

    #[test]
    fn rotation_directions_are_inverse() {
        let cone = Cloud::cone(2);
        assert_eq!(cone.rotate(true).rotate(false), cone);
    }

    #[test]
    fn union_and_difference() {
        let ring = Cloud::circle(2).difference(&Cloud::circle(1));
        assert_eq!(ring.len(), 8);
        assert!(!ring.contains(Offset::ZERO));

        let whole = ring.union(&Cloud::circle(1));
        assert_eq!(whole.offsets(), Cloud::circle(2).offsets());
        assert!(Cloud::cone(1).union(&Cloud::point()).is_directional());
        assert!(!Cloud::circle(1).union(&Cloud::point()).is_directional());
    }

    #[test]
    fn translation_clips_to_grid() {
        let grid = open(3, 3);
        let tiles = Cloud::circle(1).to_tile_set(&grid, Position::ORIGIN);
        assert_eq!(
            tiles.into_iter().collect::<Vec<_>>(),
            vec![Position::new(0, 0), Position::new(0, 1), Position::new(1, 0)]
        );
    }

    #[test]
    fn cone_turns_toward_target() {
        let grid = open(7, 7);
        let caster = Position::new(3, 3);
        let up = Position::new(2, 3);
        let tiles = Cloud::cone(1).cast_area(&grid, caster, up).unwrap();
        let expected: TileSet = [
            Position::new(2, 3),
            Position::new(1, 2),
            Position::new(1, 3),
            Position::new(1, 4),
        ]
        .into_iter()
        .collect();
        assert_eq!(tiles, expected);
    }

    #[test]
    fn wall_lies_across_casting_direction() {
        let grid = open(7, 7);
        let caster = Position::new(3, 3);
        let tiles = Cloud::wall(1)
            .cast_area(&grid, caster, Position::new(4, 3))
            .unwrap();
        let expected: TileSet = [Position::new(4, 2), Position::new(4, 3), Position::new(4, 4)]
            .into_iter()
            .collect();
        assert_eq!(tiles, expected);
    }

    #[test]
    fn directional_cast_requires_adjacency() {
        let grid = open(7, 7);
        let caster = Position::new(3, 3);
        for target in [caster, Position::new(3, 5), Position::new(4, 4)] {
            let err = Cloud::cone(1).cast_area(&grid, caster, target).unwrap_err();
            assert!(matches!(err, CloudError::DirectionalDistance { .. }));
            assert!(err.severity().is_fatal());
        }
    }

    #[test]
    fn circles_cast_at_any_distance() {
        let grid = open(7, 7);
        let tiles = Cloud::circle(1)
            .cast_area(&grid, Position::ORIGIN, Position::new(5, 5))
            .unwrap();
        assert_eq!(tiles.len(), 5);
        let err = Cloud::circle(1)
            .cast_area(&grid, Position::ORIGIN, Position::new(9, 9))
            .unwrap_err();
        assert!(err.severity().is_recoverable());
    }
}
