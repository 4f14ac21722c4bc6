//! Location-driven trigger engine for the GM toolkit.
//!
//! Given a location token and the campaign state, the [`Engine`] runs the
//! global event layer and every hold module whose keywords match, returning
//! the narrative lines that fired. Every rule is guarded by scene flags, so a
//! repeated call with the resulting state returns nothing.
//!
//! ```
//! use gm_core::CampaignState;
//! use gm_triggers::Engine;
//!
//! let engine = Engine::default();
//! let mut state = CampaignState::new();
//! let first = engine.run("riften", &mut state);
//! assert!(!first.is_empty());
//! assert!(engine.run("riften", &mut state).is_empty());
//! ```

/// Engine configuration.
pub mod config;
/// Hold modules and the dispatcher.
pub mod dispatch;
/// Single engine invocation with settling.
pub mod engine;
/// Error types.
pub mod error;
/// Cross-hold events.
pub mod global;
/// Per-hold rule sets.
pub mod holds;
/// Location tokens and keyword matching.
pub mod location;
/// Rules, guards, effects, and the evaluator.
pub mod rule;
/// Turn commits against the state file.
pub mod session;

pub use config::EngineConfig;
pub use dispatch::{Dispatcher, HoldModule};
pub use engine::Engine;
pub use error::{TriggerError, TriggerResult};
pub use location::{LocationToken, MatchMode};
pub use rule::{Condition, Effect, Rule, RuleContext, RuleSet};
pub use session::Session;
