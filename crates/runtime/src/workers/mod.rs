//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker owns the engine and executes gameplay commands one at
//! a time.

mod simulation;

pub use simulation::{Command, SimulationWorker};
