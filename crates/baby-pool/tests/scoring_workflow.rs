//! End-to-end scoring scenarios driven through the public service facade and HTTP router.

mod common {
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use baby_pool::scoring::{
        Guess, GuessId, PoolConfigRecord, PoolStore, RepositoryError, ScoreUpdate, ScoringRules,
        ScoringService,
    };

    /// Store whose commit applies every update or none, like a transactional batch.
    #[derive(Default)]
    pub(super) struct BatchStore {
        pub(super) config: Option<PoolConfigRecord>,
        pub(super) guesses: Vec<Guess>,
        pub(super) scores: Mutex<BTreeMap<GuessId, ScoreUpdate>>,
    }

    impl PoolStore for BatchStore {
        fn app_config(&self) -> Result<Option<PoolConfigRecord>, RepositoryError> {
            Ok(self.config.clone())
        }

        fn all_guesses(&self) -> Result<Vec<Guess>, RepositoryError> {
            Ok(self.guesses.clone())
        }

        fn commit_scores(&self, updates: Vec<ScoreUpdate>) -> Result<usize, RepositoryError> {
            if let Some(unknown) = updates
                .iter()
                .find(|update| !self.guesses.iter().any(|guess| guess.id == update.id))
            {
                return Err(RepositoryError::UnknownGuess(unknown.id.clone()));
            }
            let mut scores = self.scores.lock().expect("store mutex poisoned");
            let count = updates.len();
            for update in updates {
                scores.insert(update.id.clone(), update);
            }
            Ok(count)
        }
    }

    pub(super) fn config(status: &str) -> PoolConfigRecord {
        serde_json::from_value(json!({
            "guessing_status": status,
            "actual_baby_details": {
                "timeOfBirth": "14:30",
                "weightPounds": 7,
                "weightOunces": 6,
                "lengthInches": 20,
                "hairColor": "Brown",
                "eyeColor": "Blue",
                "actualLooksLike": "Dad",
                "actualBrycenReaction": "Excited",
            }
        }))
        .expect("valid config")
    }

    pub(super) fn guess(value: serde_json::Value) -> Guess {
        serde_json::from_value(value).expect("valid guess")
    }

    pub(super) fn service(store: BatchStore) -> (Arc<ScoringService<BatchStore>>, Arc<BatchStore>) {
        let store = Arc::new(store);
        let service = Arc::new(ScoringService::new(store.clone(), ScoringRules::default()));
        (service, store)
    }
}

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use baby_pool::scoring::{leaderboard, scoring_router, CallerIdentity, GuessId, ScoringError};
use common::*;
use serde_json::json;
use tower::ServiceExt;

fn pool() -> Vec<baby_pool::scoring::Guess> {
    vec![
        guess(json!({
            "id": "perfect",
            "userId": "u-1",
            "timeGuess": "14:30",
            "weightGuess": 118,
            "lengthGuess": 20,
            "hairColorGuess": "Brown",
            "eyeColorGuess": "Blue",
            "looksLikeGuess": "Dad",
            "brycenReactionGuess": "Excited",
        })),
        guess(json!({
            "id": "close",
            "userId": "u-2",
            "timeGuess": "14:25",
            "weightGuess": 120,
            "lengthGuess": 20.5,
            "hairColorGuess": "brown",
            "eyeColorGuess": "Blue",
        })),
        guess(json!({
            "id": "sloppy",
            "userId": "u-3",
            "timeGuess": "2:30pm",
            "weightGuess": "heavy",
            "lengthGuess": 19.5,
            "looksLikeGuess": "Dad",
        })),
        guess(json!({
            "id": "far",
            "userId": "u-4",
            "timeGuess": "03:00",
            "weightGuess": 90,
            "lengthGuess": 24,
            "brycenReactionGuess": "Excited",
        })),
    ]
}

#[test]
fn scores_a_mixed_pool_and_persists_every_guess() {
    let (service, store) = service(BatchStore {
        config: Some(config("revealed")),
        guesses: pool(),
        ..BatchStore::default()
    });

    let run = service
        .calculate_and_save(Some(&CallerIdentity::new("admin")))
        .expect("scoring succeeds");
    assert_eq!(run.summary.scores_calculated, 4);

    let scores = store.scores.lock().expect("store mutex poisoned");
    let total = |id: &str| scores[&GuessId(id.to_string())].total_score;

    // time: perfect 0 -> 30, close 5 -> 20, far 690 -> 10, sloppy excluded
    // weight: perfect 0 -> 30, close 2 -> 20, far 28 -> 10, sloppy excluded
    // length: perfect 0 -> 30, close/sloppy 0.5 -> 20, far 4 -> 10
    assert_eq!(total("perfect"), 151);
    assert_eq!(total("close"), 20 + 20 + 20 + 20);
    assert_eq!(total("sloppy"), 20 + 20);
    assert_eq!(total("far"), 10 + 10 + 10 + 1);

    let sloppy = &scores[&GuessId("sloppy".to_string())].score_breakdown;
    assert_eq!(sloppy.time_points, 0);
    assert_eq!(sloppy.weight_points, 0);
    assert_eq!(sloppy.length_points, 20);

    let board = leaderboard(&run.scored);
    assert_eq!(board[0].guess_id, GuessId("perfect".to_string()));
    assert_eq!(board[3].guess_id, GuessId("far".to_string()));
}

#[test]
fn unrevealed_pool_is_never_written() {
    let (service, store) = service(BatchStore {
        config: Some(config("pending")),
        guesses: pool(),
        ..BatchStore::default()
    });

    let result = service.calculate_and_save(Some(&CallerIdentity::new("admin")));
    assert!(matches!(result, Err(ScoringError::FailedPrecondition(_))));
    assert!(store
        .scores
        .lock()
        .expect("store mutex poisoned")
        .is_empty());
}

#[tokio::test]
async fn http_route_scores_the_pool() {
    let (service, store) = service(BatchStore {
        config: Some(config("revealed")),
        guesses: pool(),
        ..BatchStore::default()
    });
    let router = scoring_router(service);

    let response = router
        .oneshot(
            Request::post("/api/v1/scores/calculate")
                .header(header::AUTHORIZATION, "Bearer admin")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    let payload: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
    assert_eq!(payload["scoresCalculated"], 4);
    assert_eq!(store.scores.lock().expect("store mutex poisoned").len(), 4);
}
