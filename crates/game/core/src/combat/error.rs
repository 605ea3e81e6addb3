use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::state::UnitId;

/// Combat preconditions. Every variant is fatal: the controller should only
/// offer attacks the query surface reported as legal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatError {
    #[error("combat between {attacker} and {defender} was already processed")]
    AlreadyProcessed { attacker: UnitId, defender: UnitId },

    #[error("unit {0} not found")]
    UnitNotFound(UnitId),

    #[error("attacker {0} is dead")]
    AttackerDead(UnitId),

    #[error("defender {0} is dead")]
    DefenderDead(UnitId),

    #[error("attacker {0} has no actions left")]
    NoActionsLeft(UnitId),

    #[error("attacker {0} cannot fight")]
    CannotFight(UnitId),

    #[error("{attacker} and {defender} belong to the same player")]
    SameOwner { attacker: UnitId, defender: UnitId },

    #[error("attacker {attacker} cannot see {defender}")]
    NotVisible { attacker: UnitId, defender: UnitId },

    #[error("distance {distance} outside attack range [{min}, {max}]")]
    OutOfRange { distance: u32, min: u32, max: u32 },
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn context(&self) -> Option<ErrorContext> {
        match self {
            Self::AlreadyProcessed { attacker, .. }
            | Self::SameOwner { attacker, .. }
            | Self::NotVisible { attacker, .. } => Some(ErrorContext::new().with_unit(*attacker)),
            Self::UnitNotFound(unit)
            | Self::AttackerDead(unit)
            | Self::DefenderDead(unit)
            | Self::NoActionsLeft(unit)
            | Self::CannotFight(unit) => Some(ErrorContext::new().with_unit(*unit)),
            Self::OutOfRange { .. } => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyProcessed { .. } => "COMBAT_ALREADY_PROCESSED",
            Self::UnitNotFound(_) => "COMBAT_UNIT_NOT_FOUND",
            Self::AttackerDead(_) => "COMBAT_ATTACKER_DEAD",
            Self::DefenderDead(_) => "COMBAT_DEFENDER_DEAD",
            Self::NoActionsLeft(_) => "COMBAT_NO_ACTIONS_LEFT",
            Self::CannotFight(_) => "COMBAT_CANNOT_FIGHT",
            Self::SameOwner { .. } => "COMBAT_SAME_OWNER",
            Self::NotVisible { .. } => "COMBAT_NOT_VISIBLE",
            Self::OutOfRange { .. } => "COMBAT_OUT_OF_RANGE",
        }
    }
}
