//! Table mechanics for the GM toolkit.
//!
//! Effective skills come from a PC document plus the race and standing-stone
//! tables in [`gm_core::DataTables`]. Checks roll a d20 on a seeded
//! [`rand::rngs::StdRng`] so a session can be replayed from its seed.
//!
//! ```
//! use gm_core::DataTables;
//! use gm_mechanics::{MechanicsConfig, SkillCheck, new_character};
//!
//! let tables = DataTables::default();
//! let pc = new_character("Sigrun", "Nord", None, &[("sneak", 25)], &tables).unwrap();
//! let config = MechanicsConfig::default().with_seed(7);
//! let mut rng = config.rng();
//! let result = SkillCheck::new("sneak", 30).roll(&pc, &tables, &config, &mut rng);
//! assert_eq!(result.modifier, 25);
//! ```

pub mod character;
pub mod check;
pub mod config;
pub mod dice;
pub mod error;
pub mod loot;
pub mod skills;

pub use character::{character_id, new_character, save_character};
pub use check::{CheckOutcome, CheckResult, SkillCheck};
pub use config::MechanicsConfig;
pub use dice::DiceExpr;
pub use error::{MechError, MechResult};
pub use loot::{LootDrop, LootEntry, LootRoller, LootTable};
pub use skills::{SkillBreakdown, effective_skill};
