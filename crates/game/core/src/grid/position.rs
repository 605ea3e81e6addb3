use std::fmt;

/// Absolute tile coordinate on the board.
///
/// Ordering is row-major (row first, then column), which is the order every
/// tile set in the crate is reported in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { row: 0, col: 0 };

    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Translates this position by a relative offset.
    pub const fn offset(self, offset: Offset) -> Self {
        Self {
            row: self.row + offset.row,
            col: self.col + offset.col,
        }
    }

    /// Steps one tile in `direction`. The result may be off-grid.
    pub const fn step(self, direction: Direction) -> Self {
        self.offset(direction.delta())
    }

    /// Manhattan distance between two tiles.
    pub const fn manhattan(self, other: Self) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Offset that moves `self` onto `other`.
    pub const fn offset_to(self, other: Self) -> Offset {
        Offset::new(other.row - self.row, other.col - self.col)
    }

    /// Dominant cardinal direction from `self` toward `other`.
    ///
    /// Ties between axes resolve to the horizontal axis. Returns `None` when
    /// both positions are the same tile.
    pub fn direction_to(self, other: Self) -> Option<Direction> {
        let delta = self.offset_to(other);
        if delta.row == 0 && delta.col == 0 {
            return None;
        }
        let direction = if delta.col.abs() >= delta.row.abs() {
            if delta.col > 0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if delta.row > 0 {
            Direction::Down
        } else {
            Direction::Up
        };
        Some(direction)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Relative `(row, col)` displacement, the building block of clouds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Offset {
    pub row: i32,
    pub col: i32,
}

impl Offset {
    pub const ZERO: Self = Self { row: 0, col: 0 };

    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Manhattan length of the offset.
    pub const fn manhattan(self) -> u32 {
        self.row.unsigned_abs() + self.col.unsigned_abs()
    }

    /// Quarter turn clockwise on screen axes (rows grow downward):
    /// right `(0, 1)` becomes down `(1, 0)`.
    pub const fn rotate_clockwise(self) -> Self {
        Self::new(self.col, -self.row)
    }

    /// Quarter turn counter-clockwise: right `(0, 1)` becomes up `(-1, 0)`.
    pub const fn rotate_counter_clockwise(self) -> Self {
        Self::new(-self.col, self.row)
    }
}

/// Orthogonal direction on the board.
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
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Down,
    ];

    /// `(row, col)` step for this direction.
    pub const fn delta(self) -> Offset {
        match self {
            Direction::Left => Offset::new(0, -1),
            Direction::Up => Offset::new(-1, 0),
            Direction::Right => Offset::new(0, 1),
            Direction::Down => Offset::new(1, 0),
        }
    }

    /// Index used by callers that key tables by direction (left/up/right/down = 0..3).
    pub const fn index(self) -> usize {
        match self {
            Direction::Left => 0,
            Direction::Up => 1,
            Direction::Right => 2,
            Direction::Down => 3,
        }
    }

    /// Clockwise quarter turns needed to orient a right-facing template
    /// toward this direction.
    pub const fn quarter_turns_from_right(self) -> u8 {
        match self {
            Direction::Right => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Up => 3,
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_ordering() {
        let mut tiles = vec![
            Position::new(1, 0),
            Position::new(0, 2),
            Position::new(0, 1),
        ];
        tiles.sort();
        assert_eq!(
            tiles,
            vec![Position::new(0, 1), Position::new(0, 2), Position::new(1, 0)]
        );
    }

    #[test]
    fn clockwise_rotation_follows_screen_axes() {
        let right = Direction::Right.delta();
        assert_eq!(right.rotate_clockwise(), Direction::Down.delta());
        assert_eq!(
            right.rotate_clockwise().rotate_clockwise(),
            Direction::Left.delta()
        );
        assert_eq!(right.rotate_counter_clockwise(), Direction::Up.delta());
    }

    #[test]
    fn quarter_turns_agree_with_rotation() {
        for direction in Direction::ALL {
            let mut offset = Direction::Right.delta();
            for _ in 0..direction.quarter_turns_from_right() {
                offset = offset.rotate_clockwise();
            }
            assert_eq!(offset, direction.delta(), "{direction}");
        }
    }

    #[test]
    fn direction_to_prefers_dominant_axis() {
        let origin = Position::new(5, 5);
        assert_eq!(origin.direction_to(Position::new(5, 6)), Some(Direction::Right));
        assert_eq!(origin.direction_to(Position::new(2, 6)), Some(Direction::Up));
        assert_eq!(origin.direction_to(Position::new(7, 3)), Some(Direction::Left));
        assert_eq!(origin.direction_to(origin), None);
    }
}
