use tracing::debug;

use crate::action::{ActionContext, ActionTransition};
use crate::grid::Position;
use crate::state::{Capabilities, PlayerId, UnitId, World};

use super::error::MovementError;
use super::planner::MovementCloud;

/// Walk `unit` along `path`, which starts at its current tile.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveAction {
    pub unit: UnitId,
    pub path: Vec<Position>,
}

/// Where a walk actually ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveOutcome {
    pub reached: Position,
    /// Movement points deducted, covering only the tiles actually entered.
    pub spent: i32,
    /// True when an enemy the mover could not see stopped the walk short of
    /// the destination. Visible enemies on the path reject the move instead.
    pub interrupted: bool,
}

impl MoveAction {
    pub fn new(unit: UnitId, path: Vec<Position>) -> Self {
        Self { unit, path }
    }

    fn destination(&self) -> Result<Position, MovementError> {
        self.path.last().copied().ok_or(MovementError::EmptyPath)
    }

    /// Longest walkable prefix of the path: stops before the first tile held
    /// by another player, then backs up past friendly-occupied tiles.
    fn walkable(&self, world: &World, owner: PlayerId, start: Position) -> (Position, i32) {
        let Some(terrain) = world.unit(self.unit).map(|unit| unit.terrain()) else {
            return (start, 0);
        };

        let mut entered = vec![(start, 0)];
        let mut spent = 0;
        for &step in &self.path[1..] {
            if world.unit_at(step).is_some_and(|other| other.owner() != owner) {
                break;
            }
            let cost = world
                .grid()
                .terrain(step)
                .and_then(|kind| terrain.cost_of(kind))
                .unwrap_or(0);
            spent += cost;
            entered.push((step, spent));
        }

        entered
            .into_iter()
            .rev()
            .find(|&(position, _)| {
                position == start || world.grid().occupant(position).is_none()
            })
            .unwrap_or((start, 0))
    }
}

impl ActionTransition for MoveAction {
    type Error = MovementError;
    type Result = MoveOutcome;

    fn actor(&self) -> UnitId {
        self.unit
    }

    fn pre_validate(&self, world: &World, _ctx: &ActionContext<'_>) -> Result<(), Self::Error> {
        let unit = world
            .unit(self.unit)
            .ok_or(MovementError::UnitNotFound(self.unit))?;
        if !unit.has(Capabilities::MOVABLE) {
            return Err(MovementError::NotMovable { unit: self.unit });
        }

        let start = *self.path.first().ok_or(MovementError::EmptyPath)?;
        if start != unit.position() {
            return Err(MovementError::PathStartMismatch {
                expected: unit.position(),
                found: start,
            });
        }
        for pair in self.path.windows(2) {
            if pair[0].manhattan(pair[1]) != 1 {
                return Err(MovementError::NotContiguous {
                    from: pair[0],
                    to: pair[1],
                });
            }
        }

        // Visible enemies are impassable; hidden ones are discovered on the way.
        let middle = self.path.split_last().map_or(&[][..], |(_, rest)| rest);
        for &step in middle.iter().skip(1) {
            if let Some(occupant) = world.unit_at(step) {
                if occupant.owner() != unit.owner() && world.can_see(unit.owner(), step) {
                    return Err(MovementError::Blocked {
                        position: step,
                        occupant: occupant.id(),
                    });
                }
            }
        }

        let destination = self.destination()?;
        let cloud = MovementCloud::compute(world, self.unit)?;
        if !cloud.contains(destination) {
            return Err(MovementError::OutsideCloud { destination });
        }

        let mut cost = 0;
        for &step in &self.path[1..] {
            let entry = world
                .grid()
                .terrain(step)
                .and_then(|kind| unit.terrain().cost_of(kind))
                .ok_or(MovementError::OutsideCloud { destination: step })?;
            cost += entry;
        }
        if cost > unit.movement_left() {
            return Err(MovementError::OverBudget {
                destination,
                cost,
                budget: unit.movement_left(),
            });
        }

        // A hidden enemy on the destination is discovered while walking.
        if let Some(occupant) = world.unit_at(destination) {
            let known = occupant.owner() == unit.owner()
                || world.can_see(unit.owner(), destination);
            if occupant.id() != self.unit && known {
                return Err(MovementError::Occupied {
                    destination,
                    occupant: occupant.id(),
                });
            }
        }
        Ok(())
    }

    fn apply(
        &self,
        world: &mut World,
        _ctx: &mut ActionContext<'_>,
    ) -> Result<Self::Result, Self::Error> {
        let destination = self.destination()?;
        let unit = world.require_unit(self.unit)?;
        let (reached, spent) = self.walkable(world, unit.owner(), unit.position());

        world.relocate(self.unit, reached)?;
        if let Some(unit) = world.unit_mut(self.unit) {
            unit.spend_movement(spent);
        }

        let interrupted = reached != destination;
        debug!(
            unit = %self.unit,
            %reached,
            spent,
            interrupted,
            "unit moved"
        );
        Ok(MoveOutcome {
            reached,
            spent,
            interrupted,
        })
    }

    fn post_validate(&self, world: &World, _ctx: &ActionContext<'_>) -> Result<(), Self::Error> {
        let unit = world.require_unit(self.unit)?;
        if world.grid().occupant(unit.position()) == Some(self.unit) {
            Ok(())
        } else {
            Err(MovementError::OccupancyDesync {
                unit: self.unit,
                position: unit.position(),
            })
        }
    }
}
