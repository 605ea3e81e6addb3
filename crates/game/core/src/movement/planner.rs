use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use crate::grid::{Grid, Position, TileSet};
use crate::state::{Capabilities, UnitId, World};

use super::error::MovementError;

/// Result of one reachability search.
///
/// `best` maps every reachable tile to the largest movement budget left on
/// arrival; `predecessor` links each tile back toward `origin` along an
/// optimal path. Both are only meaningful for this `(unit, origin, budget)`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementCloud {
    unit: UnitId,
    origin: Position,
    budget: i32,
    best: BTreeMap<Position, i32>,
    predecessor: BTreeMap<Position, Position>,
}

impl MovementCloud {
    /// Reachability for `unit` with its remaining movement this turn.
    ///
    /// Units without [`Capabilities::MOVABLE`] only reach their own tile.
    pub fn compute(world: &World, unit: UnitId) -> Result<Self, MovementError> {
        let mover = world.unit(unit).ok_or(MovementError::UnitNotFound(unit))?;
        let budget = if mover.has(Capabilities::MOVABLE) {
            mover.movement_left()
        } else {
            0
        };
        Self::compute_with_budget(world, unit, budget)
    }

    /// Reachability for `unit` with an explicit budget.
    ///
    /// Tiles holding a unit of another owner that the mover's owner can see
    /// are impassable. Hidden enemies and friendly units do not block.
    pub fn compute_with_budget(
        world: &World,
        unit: UnitId,
        budget: i32,
    ) -> Result<Self, MovementError> {
        let mover = world.unit(unit).ok_or(MovementError::UnitNotFound(unit))?;
        let owner = mover.owner();
        let allowed = mover.terrain();
        let visible = world.visible_tiles(owner);
        let grid = world.grid();

        let step_cost = |position: Position| {
            let cost = allowed.cost_of(grid.terrain(position)?)?;
            let blocked = world
                .unit_at(position)
                .is_some_and(|other| other.owner() != owner && visible.contains(&position));
            (!blocked).then_some(cost)
        };
        Ok(Self::search(grid, unit, mover.position(), budget, step_cost))
    }

    /// Budget-relaxation search: a Dijkstra variant that keeps the tile with
    /// the most budget left on top of a max-heap.
    ///
    /// `step_cost` returns the cost of entering a tile, or `None` when it
    /// cannot be entered at all.
    pub fn search(
        grid: &Grid,
        unit: UnitId,
        origin: Position,
        budget: i32,
        step_cost: impl Fn(Position) -> Option<i32>,
    ) -> Self {
        let budget = budget.max(0);
        let mut best = BTreeMap::from([(origin, budget)]);
        let mut predecessor = BTreeMap::new();
        let mut frontier = BinaryHeap::from([(budget, Reverse(origin))]);

        while let Some((remaining, Reverse(position))) = frontier.pop() {
            // Superseded by a better entry pushed later.
            if best.get(&position) != Some(&remaining) {
                continue;
            }
            for next in grid.neighbors(position) {
                let Some(cost) = step_cost(next) else {
                    continue;
                };
                let left = remaining - cost;
                if left < 0 || best.get(&next).is_some_and(|&known| known >= left) {
                    continue;
                }
                best.insert(next, left);
                predecessor.insert(next, position);
                frontier.push((left, Reverse(next)));
            }
        }

        Self {
            unit,
            origin,
            budget,
            best,
            predecessor,
        }
    }

    pub fn unit(&self) -> UnitId {
        self.unit
    }

    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn budget(&self) -> i32 {
        self.budget
    }

    /// True when this search was run for exactly this unit, tile and budget.
    pub fn matches(&self, unit: UnitId, origin: Position, budget: i32) -> bool {
        self.unit == unit && self.origin == origin && self.budget == budget.max(0)
    }

    /// Every tile the search reached, including tiles only passed through.
    pub fn reachable(&self) -> impl Iterator<Item = Position> + '_ {
        self.best.keys().copied()
    }

    pub fn contains(&self, position: Position) -> bool {
        self.best.contains_key(&position)
    }

    /// Budget left on arrival at `position`.
    pub fn remaining_at(&self, position: Position) -> Option<i32> {
        self.best.get(&position).copied()
    }

    /// Total terrain cost of the optimal path to `position`.
    pub fn cost_to(&self, position: Position) -> Option<i32> {
        self.remaining_at(position).map(|left| self.budget - left)
    }

    /// Tiles the unit may end its move on: reached and empty, plus the
    /// origin.
    pub fn destinations(&self, world: &World) -> TileSet {
        self.reachable()
            .filter(|&position| {
                position == self.origin || world.grid().occupant(position).is_none()
            })
            .collect()
    }

    /// Optimal path from the origin to `destination`, both ends included.
    pub fn path_to(&self, destination: Position) -> Option<Vec<Position>> {
        if !self.contains(destination) {
            return None;
        }
        let mut path = vec![destination];
        let mut current = destination;
        while current != self.origin {
            current = *self.predecessor.get(&current)?;
            path.push(current);
        }
        path.reverse();
        Some(path)
    }
}
