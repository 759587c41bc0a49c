use super::domain::{Guess, GuessId, PoolConfigRecord, ScoreUpdate};

/// Storage abstraction over the pool's configuration record and guess collection.
pub trait PoolStore: Send + Sync {
    /// Single read of the configuration record; `None` when it does not exist.
    fn app_config(&self) -> Result<Option<PoolConfigRecord>, RepositoryError>;
    fn all_guesses(&self) -> Result<Vec<Guess>, RepositoryError>;
    /// Applies every update or none of them, returning the number applied.
    fn commit_scores(&self, updates: Vec<ScoreUpdate>) -> Result<usize, RepositoryError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("guess {0} does not exist")]
    UnknownGuess(GuessId),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("stored data is corrupt: {0}")]
    Corrupt(String),
}
