//! Mechanics configuration.

use rand::SeedableRng;
use rand::rngs::StdRng;

/// Configuration for checks and loot rolls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MechanicsConfig {
    /// RNG seed for reproducible rolls.
    pub seed: u64,
    /// Whether natural rolls override the total.
    pub natural_criticals: bool,
    /// Lowest natural roll that counts as a critical success.
    pub critical_success: u32,
    /// Highest natural roll that counts as a critical failure.
    pub critical_failure: u32,
}

impl Default for MechanicsConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            natural_criticals: true,
            critical_success: 20,
            critical_failure: 1,
        }
    }
}

impl MechanicsConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Turn natural criticals on or off.
    pub fn with_natural_criticals(mut self, enabled: bool) -> Self {
        self.natural_criticals = enabled;
        self
    }

    /// Set the critical-success threshold (clamped to 2..=20).
    pub fn with_critical_success(mut self, natural: u32) -> Self {
        self.critical_success = natural.clamp(2, 20);
        self
    }

    /// Set the critical-failure threshold (clamped to 1..=19).
    pub fn with_critical_failure(mut self, natural: u32) -> Self {
        self.critical_failure = natural.clamp(1, 19);
        self
    }

    /// A fresh RNG seeded from this config.
    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }
}
