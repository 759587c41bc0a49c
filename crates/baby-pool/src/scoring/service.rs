use std::sync::Arc;

use axum::http::StatusCode;
use tracing::{debug, error, info};

use super::domain::{ActualOutcome, CallerIdentity, Guess, ScoredGuess, ScoringSummary};
use super::engine::ScoringEngine;
use super::gate;
use super::repository::PoolStore;
use super::rules::ScoringRules;

/// Service composing the precondition gate, the scoring engine, and the pool store.
pub struct ScoringService<S> {
    store: Arc<S>,
    engine: ScoringEngine,
}

/// Result of a scoring run: the caller-facing summary plus the scored batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringRun {
    pub summary: ScoringSummary,
    pub scored: Vec<ScoredGuess>,
}

impl<S> ScoringService<S>
where
    S: PoolStore + 'static,
{
    pub fn new(store: Arc<S>, rules: ScoringRules) -> Self {
        Self {
            store,
            engine: ScoringEngine::new(rules),
        }
    }

    /// Scores every guess and commits the results in one atomic batch.
    pub fn calculate_and_save(
        &self,
        caller: Option<&CallerIdentity>,
    ) -> Result<ScoringRun, ScoringError> {
        let Some((actual, guesses)) = self.load(caller)? else {
            return Ok(empty_run());
        };

        let scored = self.engine.score(&actual, &guesses);
        let updates = scored
            .iter()
            .map(|guess| {
                debug!(
                    guess_id = %guess.id,
                    user_id = ?guess.user_id,
                    total_score = guess.total_score,
                    "updating guess score"
                );
                guess.update()
            })
            .collect();

        let committed = self.store.commit_scores(updates).map_err(|err| {
            error!(error = %err, "error committing scores batch");
            ScoringError::Internal("Failed to save scores.".to_string())
        })?;

        let message =
            format!("Scores calculated and saved successfully for {committed} guesses.");
        info!(scores_calculated = committed, "{message}");
        Ok(ScoringRun {
            summary: ScoringSummary {
                message,
                scores_calculated: committed,
            },
            scored,
        })
    }

    /// Runs the same checks and scoring as [`Self::calculate_and_save`] without writing.
    pub fn preview(&self, caller: Option<&CallerIdentity>) -> Result<ScoringRun, ScoringError> {
        let Some((actual, guesses)) = self.load(caller)? else {
            return Ok(empty_run());
        };

        let scored = self.engine.score(&actual, &guesses);
        Ok(ScoringRun {
            summary: ScoringSummary {
                message: format!("Scores calculated for {} guesses (not saved).", scored.len()),
                scores_calculated: scored.len(),
            },
            scored,
        })
    }

    /// Gate checks plus the two reads. `None` means there is nothing to score.
    fn load(
        &self,
        caller: Option<&CallerIdentity>,
    ) -> Result<Option<(ActualOutcome, Vec<Guess>)>, ScoringError> {
        let caller = gate::require_caller(caller)?;
        info!(caller = %caller.uid, "score calculation requested");

        let record = self.store.app_config().map_err(|err| {
            error!(error = %err, "error fetching app config");
            ScoringError::Internal("Could not fetch app status.".to_string())
        })?;
        let actual = gate::admit(record.as_ref())?;
        debug!(?actual, "actual details admitted");

        let guesses = self.store.all_guesses().map_err(|err| {
            error!(error = %err, "error fetching guesses");
            ScoringError::Internal("Could not fetch guesses.".to_string())
        })?;

        if guesses.is_empty() {
            info!("no guesses found to score");
            return Ok(None);
        }
        info!(count = guesses.len(), "found guesses to score");

        Ok(Some((actual, guesses)))
    }
}

fn empty_run() -> ScoringRun {
    ScoringRun {
        summary: ScoringSummary {
            message: "No guesses found to score.".to_string(),
            scores_calculated: 0,
        },
        scored: Vec::new(),
    }
}

/// Error raised by a scoring run. Each variant carries a human readable message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    FailedPrecondition(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    Internal(String),
}

impl ScoringError {
    /// Stable error code surfaced to callers.
    pub fn code(&self) -> &'static str {
        match self {
            ScoringError::Unauthenticated(_) => "UNAUTHENTICATED",
            ScoringError::NotFound(_) => "NOT_FOUND",
            ScoringError::FailedPrecondition(_) => "FAILED_PRECONDITION",
            ScoringError::InvalidArgument(_) => "INVALID_ARGUMENT",
            ScoringError::Internal(_) => "INTERNAL",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ScoringError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ScoringError::NotFound(_) => StatusCode::NOT_FOUND,
            ScoringError::FailedPrecondition(_) | ScoringError::InvalidArgument(_) => {
                StatusCode::BAD_REQUEST
            }
            ScoringError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ScoringError::Unauthenticated(message)
            | ScoringError::NotFound(message)
            | ScoringError::FailedPrecondition(message)
            | ScoringError::InvalidArgument(message)
            | ScoringError::Internal(message) => message,
        }
    }
}
