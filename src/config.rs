use std::time::Duration;

use crate::sim::LifeRule;

#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Cells per axis of the cubic arena.
    pub arena_size: usize,
    /// Wall-clock interval between generations.
    pub tick: Duration,
    /// Fill probability for the seeded sub-volume.
    pub seed_density: f32,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
    pub rule: LifeRule,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            arena_size: 64,
            tick: Duration::from_millis(250),
            seed_density: 0.35,
            seed: None,
            rule: LifeRule::default(),
        }
    }
}
