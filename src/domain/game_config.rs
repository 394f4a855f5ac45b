//! Quiz session settings.

use crate::domain::classifier::DOJI_RATIO_THRESHOLD;
use crate::domain::walk::{DEFAULT_WALK_LENGTH, WalkParams};

pub const DEFAULT_ROUNDS: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub rounds: u32,
    pub walk_length: usize,
    /// Fixed seed for reproducible sessions; `None` seeds from entropy.
    pub seed: Option<u64>,
    pub walk: WalkParams,
    pub threshold: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_ROUNDS,
            walk_length: DEFAULT_WALK_LENGTH,
            seed: None,
            walk: WalkParams::default(),
            threshold: DOJI_RATIO_THRESHOLD,
        }
    }
}
