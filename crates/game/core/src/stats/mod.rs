//! Stat/Modifier model.
//!
//! ```text
//! [ Base stats (StatBlock) ]
//!      ↓  fold in attachment order
//! [ Active modifiers (ModifierStack) ]
//!      ↓
//! [ Effective stats (StatBlock) ]
//! ```
//!
//! ## Principles
//!
//! 1. **Explicit recomputation**: [`StatBlock::fold`] is a pure function of
//!    (base, modifiers). Attaching or removing a modifier never re-derives
//!    anything on its own; the world calls the fold after each mutation.
//! 2. **Order matters for clamps**: `SetMin`/`SetMax` see the value produced
//!    by every modifier attached before them.
//! 3. **Integer math**: multipliers are whole percentages (150 = ×1.5) and
//!    truncate toward zero, matching the rest of the crate.

mod block;
mod modifier;
mod stack;

pub use block::{StatBlock, StatKind};
pub use modifier::{
    EffectKind, ModifierDuration, ModifierEffect, ModifierInstance, ModifierTemplate,
    StackingPolicy, StatOp,
};
pub use stack::{ModifierStack, StackOutcome};
