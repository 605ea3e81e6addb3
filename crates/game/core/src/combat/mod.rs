//! Combat resolution.
//!
//! # Architecture
//!
//! - **Pure formulas** (`damage`): health, class and type scaling plus
//!   reductions, over effective stats only
//! - **Reach** (`reach`): attack rings and danger zones built from clouds
//! - **Resolver** (`resolver`): the single-use [`Combat`] transaction and the
//!   [`AttackAction`] that drives it through the engine
//!
//! Randomness enters only through the [`RngOracle`](crate::RngOracle) passed
//! to [`Combat::process`].

pub mod damage;
mod error;
pub mod reach;
mod resolver;

pub use damage::{mitigated, reduction, scaled_damage};
pub use error::CombatError;
pub use reach::{attack_cloud, attackable_from, attackable_tiles, cloud_danger_zone, danger_zone};
pub use resolver::{AttackAction, Combat, CombatOutcome};
