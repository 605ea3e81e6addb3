//! Movement planning and execution.
//!
//! [`MovementCloud`] answers "where can this unit go and how": a
//! budget-relaxation search over terrain costs. [`MoveAction`] walks a chosen
//! path, stopping early when it bumps into an enemy the planner could not
//! see. Stopping early is a normal outcome, not an error.
mod error;
mod planner;
mod walk;

pub use error::MovementError;
pub use planner::MovementCloud;
pub use walk::{MoveAction, MoveOutcome};
