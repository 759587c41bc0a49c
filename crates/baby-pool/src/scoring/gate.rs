use serde_json::Value;
use tracing::{error, warn};

use super::diff::parse_time_to_minutes;
use super::domain::{ActualOutcome, CallerIdentity, PoolConfigRecord, RawOutcome};
use super::service::ScoringError;

/// Rejects requests without a caller identity. Claims are not inspected.
pub fn require_caller(caller: Option<&CallerIdentity>) -> Result<&CallerIdentity, ScoringError> {
    caller.ok_or_else(|| {
        ScoringError::Unauthenticated(
            "The function must be called while authenticated.".to_string(),
        )
    })
}

/// Checks the configuration record and returns the validated outcome.
pub fn admit(record: Option<&PoolConfigRecord>) -> Result<ActualOutcome, ScoringError> {
    let record = record.ok_or_else(|| {
        error!("app config not found");
        ScoringError::NotFound("App config not found.".to_string())
    })?;

    if !record.is_revealed() {
        let status = record.status_label();
        warn!(%status, "guessing status is not 'revealed'");
        return Err(ScoringError::FailedPrecondition(format!(
            "Guessing status must be \"revealed\" to calculate scores. Current is: {status}"
        )));
    }

    let raw = record.actual_outcome.as_ref().ok_or_else(|| {
        error!("actual baby details not found in app config");
        ScoringError::NotFound("Actual baby details not found.".to_string())
    })?;

    normalize(raw)
}

fn normalize(raw: &RawOutcome) -> Result<ActualOutcome, ScoringError> {
    let fields: [(&str, &Option<Value>); 8] = [
        ("timeOfBirth", &raw.time_of_birth),
        ("weightPounds", &raw.weight_pounds),
        ("weightOunces", &raw.weight_ounces),
        ("lengthInches", &raw.length_inches),
        ("hairColor", &raw.hair_color),
        ("eyeColor", &raw.eye_color),
        ("looksLike", &raw.looks_like),
        ("brycenReaction", &raw.brycen_reaction),
    ];
    if let Some((name, _)) = fields
        .iter()
        .find(|(_, value)| matches!(value, None | Some(Value::Null)))
    {
        error!(field = *name, "missing actual detail");
        return Err(ScoringError::NotFound(format!(
            "Missing actual detail: {name}"
        )));
    }

    let time_of_birth = text(&raw.time_of_birth, "timeOfBirth")?;
    let time_of_birth_minutes = parse_time_to_minutes(&time_of_birth);
    if time_of_birth_minutes.is_none() {
        warn!(%time_of_birth, "actual time of birth is unparseable; time category will not score");
    }

    let pounds = integer(&raw.weight_pounds, "weightPounds")?;
    let ounces = integer(&raw.weight_ounces, "weightOunces")?;
    let total_ounces = pounds
        .checked_mul(16)
        .and_then(|pounds_in_ounces| pounds_in_ounces.checked_add(ounces))
        .ok_or_else(|| malformed("weightPounds", "a weight that fits in ounces"))?;

    Ok(ActualOutcome {
        time_of_birth_minutes,
        weight_ounces: total_ounces as f64,
        length_inches: number(&raw.length_inches, "lengthInches")?,
        hair_color: text(&raw.hair_color, "hairColor")?,
        eye_color: text(&raw.eye_color, "eyeColor")?,
        looks_like: text(&raw.looks_like, "looksLike")?,
        brycen_reaction: text(&raw.brycen_reaction, "brycenReaction")?,
    })
}

fn malformed(field: &str, expected: &str) -> ScoringError {
    error!(field, expected, "malformed actual detail");
    ScoringError::InvalidArgument(format!(
        "Actual detail {field} must be {expected}"
    ))
}

fn text(value: &Option<Value>, field: &str) -> Result<String, ScoringError> {
    match value {
        Some(Value::String(raw)) => Ok(raw.clone()),
        _ => Err(malformed(field, "a string")),
    }
}

fn integer(value: &Option<Value>, field: &str) -> Result<i64, ScoringError> {
    let value = value.as_ref().ok_or_else(|| malformed(field, "an integer"))?;
    value
        .as_i64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|number| number.is_finite() && number.fract() == 0.0)
                .map(|number| number as i64)
        })
        .ok_or_else(|| malformed(field, "an integer"))
}

fn number(value: &Option<Value>, field: &str) -> Result<f64, ScoringError> {
    value
        .as_ref()
        .and_then(Value::as_f64)
        .filter(|number| number.is_finite())
        .ok_or_else(|| malformed(field, "a finite number"))
}
