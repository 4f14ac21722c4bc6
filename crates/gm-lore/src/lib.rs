//! Lore tooling for the GM toolkit.
//!
//! - [`canon`] flags described events that contradict canon.
//! - [`branch`] records a timeline branch when the GM accepts a divergence.
//! - [`relations`] infers starting social bonuses from a PC's backstory.

/// Timeline branching.
pub mod branch;
/// Canon divergence detection.
pub mod canon;
/// Error types.
pub mod error;
/// Relationship inference.
pub mod relations;

pub use branch::{BranchRecord, Dragonbreak};
pub use canon::{CanonBreak, CanonGate, Verdict, check};
pub use error::{LoreError, LoreResult};
pub use relations::{Bonus, consume_bonus, get_bonus, infer, infer_from_file};
