//! Core types for the GM toolkit: the campaign-state document and the
//! machinery that reads and mutates it.
//!
//! The state is a single JSON document. [`CampaignState`] keeps it as an
//! order-preserving map so unknown keys round-trip untouched, and the modules
//! below expose typed, total views over the reserved keys (scene flags,
//! clocks, quests, companions, time of day).

/// Countdown clocks with clamped progress and the `campaign_clocks` alias.
pub mod clock;
/// Companion descriptors in string and record form.
pub mod companion;
/// Text decoding with UTF-8, BOM, CP1252, and Latin-1 fallbacks.
pub mod decode;
/// Error types used throughout the crate.
pub mod error;
/// Once-only scene flags.
pub mod flags;
/// Quest lists and companion quest phases.
pub mod quest;
/// The campaign-state document.
pub mod state;
/// Atomic load/save of the campaign-state file.
pub mod store;
/// Static JSON data tables (races, standing stones, loot).
pub mod tables;
/// Time-of-day phases and hours.
pub mod time;
/// Non-mutating invariant checks over a loaded document.
pub mod validate;

/// Re-export clock types.
pub use clock::{Clock, ClockAdvance};
/// Re-export companion types.
pub use companion::Companion;
/// Re-export error types.
pub use error::{StateError, StateResult};
/// Re-export quest types.
pub use quest::{QuestEntry, QuestList, QuestPhase};
/// Re-export the document type.
pub use state::CampaignState;
/// Re-export the store.
pub use store::StateStore;
/// Re-export data tables.
pub use tables::DataTables;
/// Re-export time-of-day types.
pub use time::{DayPhase, TimeOfDay};
/// Re-export validation types.
pub use validate::{StateIssue, validate_state};
