//! Baby pool scoring: precondition gate, distance and categorical scoring, distinct-value
//! tiering for the ranked categories, and the atomic write-back of every guess's score.

pub mod categorical;
pub mod diff;
pub mod domain;
pub mod engine;
pub mod gate;
pub mod leaderboard;
pub mod repository;
pub mod router;
pub mod rules;
pub mod service;
pub mod tiers;

#[cfg(test)]
mod tests;

pub use domain::{
    ActualOutcome, CallerIdentity, Guess, GuessDistances, GuessId, PoolConfigRecord, RawOutcome,
    ScoreBreakdown, ScoreUpdate, ScoredGuess, ScoringSummary, UserId, REVEALED_STATUS,
};
pub use engine::{RankedCategory, ScoringEngine};
pub use leaderboard::{leaderboard, LeaderboardEntry};
pub use repository::{PoolStore, RepositoryError};
pub use router::scoring_router;
pub use rules::ScoringRules;
pub use service::{ScoringError, ScoringRun, ScoringService};
