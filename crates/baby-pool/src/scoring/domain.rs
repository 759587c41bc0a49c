use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Status value that unlocks scoring.
pub const REVEALED_STATUS: &str = "revealed";

/// Opaque identifier of a stored guess document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuessId(pub String);

impl fmt::Display for GuessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the user who submitted a guess.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authenticated caller attached to a scoring request.
///
/// Only the presence of an identity is checked; claims are not inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub uid: String,
}

impl CallerIdentity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self { uid: uid.into() }
    }
}

/// Birth details as stored. Values stay untyped until the precondition gate validates them,
/// so a missing field and a malformed one can be reported differently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_birth: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_pounds: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_ounces: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_inches: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hair_color: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eye_color: Option<Value>,
    #[serde(alias = "actualLooksLike", skip_serializing_if = "Option::is_none")]
    pub looks_like: Option<Value>,
    #[serde(alias = "actualBrycenReaction", skip_serializing_if = "Option::is_none")]
    pub brycen_reaction: Option<Value>,
}

/// The single configuration record holding the outcome and the guessing status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PoolConfigRecord {
    #[serde(alias = "actual_baby_details", skip_serializing_if = "Option::is_none")]
    pub actual_outcome: Option<RawOutcome>,
    #[serde(alias = "guessing_status", skip_serializing_if = "Option::is_none")]
    pub guessing_status: Option<Value>,
}

impl PoolConfigRecord {
    pub fn is_revealed(&self) -> bool {
        matches!(&self.guessing_status, Some(Value::String(status)) if status == REVEALED_STATUS)
    }

    /// Human readable rendering of the observed status for error messages.
    pub fn status_label(&self) -> String {
        match &self.guessing_status {
            None | Some(Value::Null) => "null".to_string(),
            Some(Value::String(status)) => status.clone(),
            Some(other) => other.to_string(),
        }
    }
}

/// Validated outcome the scoring engine compares guesses against.
#[derive(Debug, Clone, PartialEq)]
pub struct ActualOutcome {
    /// Minutes since midnight, `None` when the stored time could not be parsed.
    pub time_of_birth_minutes: Option<u32>,
    pub weight_ounces: f64,
    pub length_inches: f64,
    pub hair_color: String,
    pub eye_color: String,
    pub looks_like: String,
    pub brycen_reaction: String,
}

/// A submitted prediction. Fields holding a value of the wrong JSON type read as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guess {
    pub id: GuessId,
    #[serde(
        default,
        deserialize_with = "lenient_user_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<UserId>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_guess: Option<String>,
    /// Total ounces.
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight_guess: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub length_guess: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub hair_color_guess: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub eye_color_guess: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub looks_like_guess: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub brycen_reaction_guess: Option<String>,
}

impl Guess {
    /// Empty guess carrying only an id; handy as a base for builders and fixtures.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: GuessId(id.into()),
            user_id: None,
            time_guess: None,
            weight_guess: None,
            length_guess: None,
            hair_color_guess: None,
            eye_color_guess: None,
            looks_like_guess: None,
            brycen_reaction_guess: None,
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) => Some(raw),
        _ => None,
    })
}

fn lenient_user_id<'de, D>(deserializer: D) -> Result<Option<UserId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.map(UserId))
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_f64)
        .filter(|number| number.is_finite()))
}

/// Per-category points for one guess.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub time_points: u32,
    pub weight_points: u32,
    pub length_points: u32,
    pub hair_points: u32,
    pub eye_points: u32,
    pub looks_like_points: u32,
    pub brycen_bonus: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.time_points
            + self.weight_points
            + self.length_points
            + self.hair_points
            + self.eye_points
            + self.looks_like_points
            + self.brycen_bonus
    }
}

/// Distances between a guess and the outcome; `f64::INFINITY` marks an unusable guess value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuessDistances {
    pub time: f64,
    pub weight: f64,
    pub length: f64,
}

/// In-memory result of scoring one guess.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredGuess {
    pub id: GuessId,
    pub user_id: Option<UserId>,
    pub distances: GuessDistances,
    pub breakdown: ScoreBreakdown,
    pub total_score: u32,
}

impl ScoredGuess {
    pub fn update(&self) -> ScoreUpdate {
        ScoreUpdate {
            id: self.id.clone(),
            score_breakdown: self.breakdown,
            total_score: self.total_score,
        }
    }
}

/// Derived fields written back onto a guess document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    pub id: GuessId,
    pub score_breakdown: ScoreBreakdown,
    pub total_score: u32,
}

/// Payload returned to the caller after a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringSummary {
    pub message: String,
    #[serde(rename = "scoresCalculated")]
    pub scores_calculated: usize,
}
