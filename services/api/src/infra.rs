use baby_pool::scoring::{Guess, PoolConfigRecord, PoolStore, RepositoryError, ScoreUpdate};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// On-disk and in-memory shape of a pool: the config record plus raw guess documents.
///
/// Documents are kept as raw JSON so a commit only adds the derived score fields and never
/// rewrites what the submitter stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PoolSnapshot {
    #[serde(default, alias = "app_config", skip_serializing_if = "Option::is_none")]
    pub(crate) app_config: Option<Value>,
    #[serde(default)]
    pub(crate) guesses: Vec<Map<String, Value>>,
}

impl PoolSnapshot {
    pub(crate) fn config(&self) -> Result<Option<PoolConfigRecord>, RepositoryError> {
        self.app_config
            .clone()
            .map(serde_json::from_value::<PoolConfigRecord>)
            .transpose()
            .map_err(|err| RepositoryError::Corrupt(format!("app config: {err}")))
    }

    pub(crate) fn guesses(&self) -> Result<Vec<Guess>, RepositoryError> {
        self.guesses
            .iter()
            .map(|document| {
                serde_json::from_value::<Guess>(Value::Object(document.clone()))
                    .map_err(|err| RepositoryError::Corrupt(format!("guess document: {err}")))
            })
            .collect()
    }

    /// Copy of the snapshot with every update applied; fails without side effects when any
    /// update targets an unknown guess.
    pub(crate) fn with_scores(&self, updates: &[ScoreUpdate]) -> Result<Self, RepositoryError> {
        let mut next = self.clone();
        for update in updates {
            let document = next
                .guesses
                .iter_mut()
                .find(|document| {
                    document.get("id").and_then(Value::as_str) == Some(update.id.0.as_str())
                })
                .ok_or_else(|| RepositoryError::UnknownGuess(update.id.clone()))?;

            let breakdown = serde_json::to_value(update.score_breakdown)
                .map_err(|err| RepositoryError::Corrupt(err.to_string()))?;
            document.insert("score_breakdown".to_string(), breakdown);
            document.insert("total_score".to_string(), Value::from(update.total_score));
        }
        Ok(next)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryPoolStore {
    snapshot: Arc<Mutex<PoolSnapshot>>,
}

impl InMemoryPoolStore {
    pub(crate) fn from_snapshot(snapshot: PoolSnapshot) -> Self {
        Self {
            snapshot: Arc::new(Mutex::new(snapshot)),
        }
    }

    pub(crate) fn snapshot(&self) -> Result<PoolSnapshot, RepositoryError> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, PoolSnapshot>, RepositoryError> {
        self.snapshot
            .lock()
            .map_err(|_| RepositoryError::Unavailable("pool mutex poisoned".to_string()))
    }
}

impl PoolStore for InMemoryPoolStore {
    fn app_config(&self) -> Result<Option<PoolConfigRecord>, RepositoryError> {
        self.lock()?.config()
    }

    fn all_guesses(&self) -> Result<Vec<Guess>, RepositoryError> {
        self.lock()?.guesses()
    }

    fn commit_scores(&self, updates: Vec<ScoreUpdate>) -> Result<usize, RepositoryError> {
        let mut guard = self.lock()?;
        let next = guard.with_scores(&updates)?;
        *guard = next;
        Ok(updates.len())
    }
}

/// Pool backed by a JSON snapshot file. Commits replace the file with a rename so readers
/// see either the old or the new snapshot.
pub(crate) struct JsonFilePoolStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFilePoolStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn load(&self) -> Result<PoolSnapshot, RepositoryError> {
        let raw = fs::read(&self.path).map_err(|err| {
            RepositoryError::Unavailable(format!("{}: {err}", self.path.display()))
        })?;
        serde_json::from_slice(&raw)
            .map_err(|err| RepositoryError::Corrupt(format!("{}: {err}", self.path.display())))
    }

    fn replace(&self, snapshot: &PoolSnapshot) -> Result<(), RepositoryError> {
        let encoded = serde_json::to_vec_pretty(snapshot)
            .map_err(|err| RepositoryError::Corrupt(err.to_string()))?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, encoded).map_err(|err| {
            RepositoryError::Unavailable(format!("{}: {err}", staging.display()))
        })?;
        fs::rename(&staging, &self.path).map_err(|err| {
            let _ = fs::remove_file(&staging);
            RepositoryError::Unavailable(format!("{}: {err}", self.path.display()))
        })?;
        debug!(path = %self.path.display(), "pool snapshot replaced");
        Ok(())
    }
}

impl PoolStore for JsonFilePoolStore {
    fn app_config(&self) -> Result<Option<PoolConfigRecord>, RepositoryError> {
        self.load()?.config()
    }

    fn all_guesses(&self) -> Result<Vec<Guess>, RepositoryError> {
        self.load()?.guesses()
    }

    fn commit_scores(&self, updates: Vec<ScoreUpdate>) -> Result<usize, RepositoryError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| RepositoryError::Unavailable("write mutex poisoned".to_string()))?;
        let next = self.load()?.with_scores(&updates)?;
        self.replace(&next)?;
        Ok(updates.len())
    }
}

/// Store selected at startup from configuration.
pub(crate) enum ConfiguredStore {
    Memory(InMemoryPoolStore),
    File(JsonFilePoolStore),
}

impl PoolStore for ConfiguredStore {
    fn app_config(&self) -> Result<Option<PoolConfigRecord>, RepositoryError> {
        match self {
            ConfiguredStore::Memory(store) => store.app_config(),
            ConfiguredStore::File(store) => store.app_config(),
        }
    }

    fn all_guesses(&self) -> Result<Vec<Guess>, RepositoryError> {
        match self {
            ConfiguredStore::Memory(store) => store.all_guesses(),
            ConfiguredStore::File(store) => store.all_guesses(),
        }
    }

    fn commit_scores(&self, updates: Vec<ScoreUpdate>) -> Result<usize, RepositoryError> {
        match self {
            ConfiguredStore::Memory(store) => store.commit_scores(updates),
            ConfiguredStore::File(store) => store.commit_scores(updates),
        }
    }
}
