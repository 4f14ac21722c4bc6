//! d20 skill checks.
//!
//! A check rolls a d20, adds the PC's effective skill, and compares the
//! total to a difficulty. With natural criticals on, a natural 20 always
//! succeeds and a natural 1 always fails (thresholds come from
//! [`MechanicsConfig`]).

use std::fmt;

use gm_core::DataTables;
use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::MechanicsConfig;
use crate::skills::effective_skill;

/// How a check came out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckOutcome {
    /// Natural critical success.
    CriticalSuccess,
    /// Total met the difficulty.
    Success {
        /// Total minus difficulty.
        margin: i64,
    },
    /// Total fell short.
    Failure {
        /// Difficulty minus total.
        margin: i64,
    },
    /// Natural critical failure.
    CriticalFailure,
}

impl CheckOutcome {
    /// True for either kind of success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::CriticalSuccess | Self::Success { .. })
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CriticalSuccess => write!(f, "Critical Success"),
            Self::Success { margin } => write!(f, "Success (margin {margin})"),
            Self::Failure { margin } => write!(f, "Failure (short by {margin})"),
            Self::CriticalFailure => write!(f, "Critical Failure"),
        }
    }
}

/// The full record of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Skill tested.
    pub skill: String,
    /// The d20 face.
    pub natural: u32,
    /// Effective skill added to the die.
    pub modifier: i64,
    /// Die plus modifier.
    pub total: i64,
    /// Target number.
    pub difficulty: i64,
    /// Outcome.
    pub outcome: CheckOutcome,
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} check: d20 {} + {} = {} vs {} -> {}",
            self.skill, self.natural, self.modifier, self.total, self.difficulty, self.outcome
        )
    }
}

/// A skill check against a fixed difficulty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillCheck {
    /// Skill to test.
    pub skill: String,
    /// Target number.
    pub difficulty: i64,
}

impl SkillCheck {
    /// Create a check.
    pub fn new(skill: impl Into<String>, difficulty: i64) -> Self {
        Self {
            skill: skill.into(),
            difficulty,
        }
    }

    /// Resolve a known natural roll and modifier.
    pub fn resolve(&self, natural: u32, modifier: i64, config: &MechanicsConfig) -> CheckResult {
        let total = i64::from(natural) + modifier;
        let outcome = if config.natural_criticals && natural >= config.critical_success {
            CheckOutcome::CriticalSuccess
        } else if config.natural_criticals && natural <= config.critical_failure {
            CheckOutcome::CriticalFailure
        } else if total >= self.difficulty {
            CheckOutcome::Success {
                margin: total - self.difficulty,
            }
        } else {
            CheckOutcome::Failure {
                margin: self.difficulty - total,
            }
        };
        CheckResult {
            skill: self.skill.clone(),
            natural,
            modifier,
            total,
            difficulty: self.difficulty,
            outcome,
        }
    }

    /// Roll the check for a PC document.
    pub fn roll(
        &self,
        pc: &Map<String, Value>,
        tables: &DataTables,
        config: &MechanicsConfig,
        rng: &mut StdRng,
    ) -> CheckResult {
        let natural = rng.random_range(1..=20);
        let result = self.resolve(natural, effective_skill(pc, tables, &self.skill), config);
        tracing::debug!(
            skill = %result.skill,
            natural,
            total = result.total,
            difficulty = result.difficulty,
            outcome = %result.outcome,
            "skill check"
        );
        result
    }
}
