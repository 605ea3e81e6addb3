use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::grid::Position;
use crate::state::{StateError, UnitId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementError {
    #[error("unit {0} not found")]
    UnitNotFound(UnitId),

    #[error("unit {unit} cannot move")]
    NotMovable { unit: UnitId },

    #[error("no movement cloud computed for {unit} from {origin} with budget {budget}")]
    NoMovementCloud {
        unit: UnitId,
        origin: Position,
        budget: i32,
    },

    #[error("path is empty")]
    EmptyPath,

    #[error("path starts at {found}, unit stands at {expected}")]
    PathStartMismatch { expected: Position, found: Position },

    #[error("path steps from {from} to non-adjacent {to}")]
    NotContiguous { from: Position, to: Position },

    #[error("destination {destination} is outside the movement cloud")]
    OutsideCloud { destination: Position },

    #[error("path to {destination} costs {cost}, only {budget} movement left")]
    OverBudget {
        destination: Position,
        cost: i32,
        budget: i32,
    },

    #[error("path crosses {position}, held by visible enemy {occupant}")]
    Blocked { position: Position, occupant: UnitId },

    #[error("destination {destination} is occupied by {occupant}")]
    Occupied {
        destination: Position,
        occupant: UnitId,
    },

    #[error("occupancy desync for {unit} at {position}")]
    OccupancyDesync { unit: UnitId, position: Position },

    #[error(transparent)]
    State(#[from] StateError),
}

impl GameError for MovementError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnitNotFound(_)
            | Self::NotMovable { .. }
            | Self::NoMovementCloud { .. }
            | Self::OccupancyDesync { .. } => ErrorSeverity::Fatal,
            Self::EmptyPath
            | Self::PathStartMismatch { .. }
            | Self::NotContiguous { .. }
            | Self::OutsideCloud { .. }
            | Self::OverBudget { .. }
            | Self::Blocked { .. }
            | Self::Occupied { .. } => ErrorSeverity::Rejected,
            Self::State(err) => err.severity(),
        }
    }

    fn context(&self) -> Option<ErrorContext> {
        match self {
            Self::UnitNotFound(unit) | Self::NotMovable { unit } => {
                Some(ErrorContext::new().with_unit(*unit))
            }
            Self::NoMovementCloud { unit, origin, .. } => Some(
                ErrorContext::new()
                    .with_unit(*unit)
                    .with_position(*origin)
                    .with_message("query the movement cloud before requesting a path"),
            ),
            Self::PathStartMismatch { found, .. } => {
                Some(ErrorContext::new().with_position(*found))
            }
            Self::NotContiguous { to, .. } => Some(ErrorContext::new().with_position(*to)),
            Self::OutsideCloud { destination } | Self::OverBudget { destination, .. } => {
                Some(ErrorContext::new().with_position(*destination))
            }
            Self::Blocked { position, occupant } => Some(
                ErrorContext::new()
                    .with_position(*position)
                    .with_unit(*occupant),
            ),
            Self::Occupied {
                destination,
                occupant,
            } => Some(
                ErrorContext::new()
                    .with_position(*destination)
                    .with_unit(*occupant),
            ),
            Self::OccupancyDesync { unit, position } => Some(
                ErrorContext::new()
                    .with_unit(*unit)
                    .with_position(*position),
            ),
            Self::EmptyPath => None,
            Self::State(err) => err.context(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnitNotFound(_) => "MOVE_UNIT_NOT_FOUND",
            Self::NotMovable { .. } => "MOVE_NOT_MOVABLE",
            Self::NoMovementCloud { .. } => "MOVE_NO_MOVEMENT_CLOUD",
            Self::EmptyPath => "MOVE_EMPTY_PATH",
            Self::PathStartMismatch { .. } => "MOVE_PATH_START_MISMATCH",
            Self::NotContiguous { .. } => "MOVE_NOT_CONTIGUOUS",
            Self::OutsideCloud { .. } => "MOVE_OUTSIDE_CLOUD",
            Self::OverBudget { .. } => "MOVE_OVER_BUDGET",
            Self::Blocked { .. } => "MOVE_BLOCKED",
            Self::Occupied { .. } => "MOVE_OCCUPIED",
            Self::OccupancyDesync { .. } => "MOVE_OCCUPANCY_DESYNC",
            Self::State(err) => err.error_code(),
        }
    }
}
