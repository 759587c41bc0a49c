use serde::{Deserialize, Serialize};

/// Point values applied by the scoring engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    /// Points per distinct-distance slot, best slot first.
    pub rank_tiers: Vec<u32>,
    pub hair_points: u32,
    pub eye_points: u32,
    pub looks_like_points: u32,
    pub brycen_bonus: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            rank_tiers: vec![30, 20, 10],
            hair_points: 20,
            eye_points: 20,
            looks_like_points: 20,
            brycen_bonus: 1,
        }
    }
}
