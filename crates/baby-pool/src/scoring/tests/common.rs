use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::{json, Value};

use crate::scoring::domain::{CallerIdentity, Guess, PoolConfigRecord, ScoreUpdate, UserId};
use crate::scoring::repository::{PoolStore, RepositoryError};
use crate::scoring::{ScoringRules, ScoringService};

pub(super) fn outcome_json() -> Value {
    json!({
        "timeOfBirth": "14:30",
        "weightPounds": 7,
        "weightOunces": 6,
        "lengthInches": 20,
        "hairColor": "Brown",
        "eyeColor": "Blue",
        "looksLike": "Dad",
        "brycenReaction": "Excited",
    })
}

pub(super) fn revealed_config() -> PoolConfigRecord {
    serde_json::from_value(json!({
        "guessingStatus": "revealed",
        "actualOutcome": outcome_json(),
    }))
    .expect("valid config record")
}

pub(super) fn config_with_status(status: &str) -> PoolConfigRecord {
    let mut record = revealed_config();
    record.guessing_status = Some(json!(status));
    record
}

pub(super) fn caller() -> CallerIdentity {
    CallerIdentity::new("admin-uid")
}

/// Guess matching the revealed outcome on every field.
pub(super) fn perfect_guess(id: &str) -> Guess {
    let mut guess = Guess::new(id);
    guess.user_id = Some(UserId(format!("user-{id}")));
    guess.time_guess = Some("14:30".to_string());
    guess.weight_guess = Some(118.0);
    guess.length_guess = Some(20.0);
    guess.hair_color_guess = Some("Brown".to_string());
    guess.eye_color_guess = Some("Blue".to_string());
    guess.looks_like_guess = Some("Dad".to_string());
    guess.brycen_reaction_guess = Some("Excited".to_string());
    guess
}

pub(super) fn timed_guess(id: &str, time: &str) -> Guess {
    let mut guess = Guess::new(id);
    guess.time_guess = Some(time.to_string());
    guess
}

#[derive(Default)]
pub(super) struct MemoryStore {
    pub(super) config: Mutex<Option<PoolConfigRecord>>,
    pub(super) guesses: Mutex<Vec<Guess>>,
    pub(super) commits: Mutex<Vec<Vec<ScoreUpdate>>>,
}

impl MemoryStore {
    pub(super) fn with(config: Option<PoolConfigRecord>, guesses: Vec<Guess>) -> Self {
        Self {
            config: Mutex::new(config),
            guesses: Mutex::new(guesses),
            commits: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn commits(&self) -> Vec<Vec<ScoreUpdate>> {
        self.commits.lock().expect("store mutex poisoned").clone()
    }
}

impl PoolStore for MemoryStore {
    fn app_config(&self) -> Result<Option<PoolConfigRecord>, RepositoryError> {
        Ok(self.config.lock().expect("store mutex poisoned").clone())
    }

    fn all_guesses(&self) -> Result<Vec<Guess>, RepositoryError> {
        Ok(self.guesses.lock().expect("store mutex poisoned").clone())
    }

    fn commit_scores(&self, updates: Vec<ScoreUpdate>) -> Result<usize, RepositoryError> {
        let count = updates.len();
        self.commits
            .lock()
            .expect("store mutex poisoned")
            .push(updates);
        Ok(count)
    }
}

/// Which store call should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FailurePoint {
    Config,
    Guesses,
    Commit,
}

pub(super) struct FailingStore {
    pub(super) fail_at: FailurePoint,
    pub(super) inner: MemoryStore,
}

impl FailingStore {
    pub(super) fn new(fail_at: FailurePoint) -> Self {
        Self {
            fail_at,
            inner: MemoryStore::with(Some(revealed_config()), vec![perfect_guess("g-1")]),
        }
    }

    fn offline(&self, point: FailurePoint) -> Result<(), RepositoryError> {
        if self.fail_at == point {
            Err(RepositoryError::Unavailable("database offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl PoolStore for FailingStore {
    fn app_config(&self) -> Result<Option<PoolConfigRecord>, RepositoryError> {
        self.offline(FailurePoint::Config)?;
        self.inner.app_config()
    }

    fn all_guesses(&self) -> Result<Vec<Guess>, RepositoryError> {
        self.offline(FailurePoint::Guesses)?;
        self.inner.all_guesses()
    }

    fn commit_scores(&self, updates: Vec<ScoreUpdate>) -> Result<usize, RepositoryError> {
        self.offline(FailurePoint::Commit)?;
        self.inner.commit_scores(updates)
    }
}

pub(super) fn build_service(
    config: Option<PoolConfigRecord>,
    guesses: Vec<Guess>,
) -> (ScoringService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::with(config, guesses));
    let service = ScoringService::new(store.clone(), ScoringRules::default());
    (service, store)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
