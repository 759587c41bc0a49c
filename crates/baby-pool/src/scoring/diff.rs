use chrono::{NaiveTime, Timelike};
use tracing::warn;

use super::domain::{ActualOutcome, Guess, GuessDistances};

/// Parses a 24-hour `H:MM` or `HH:MM` string into minutes since midnight.
pub fn parse_time_to_minutes(raw: &str) -> Option<u32> {
    let (hour, minute) = raw.split_once(':')?;
    if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
        return None;
    }
    if !hour.bytes().chain(minute.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let time = NaiveTime::from_hms_opt(hour.parse().ok()?, minute.parse().ok()?, 0)?;
    Some(time.num_seconds_from_midnight() / 60)
}

/// Measures how far each numeric field of `guess` lands from the outcome.
pub fn measure(actual: &ActualOutcome, guess: &Guess) -> GuessDistances {
    let guess_minutes = guess.time_guess.as_deref().and_then(parse_time_to_minutes);
    if guess_minutes.is_none() {
        warn!(guess_id = %guess.id, time_guess = ?guess.time_guess, "invalid time format for parsing");
    }

    let time = match (actual.time_of_birth_minutes, guess_minutes) {
        (Some(actual), Some(guessed)) => f64::from(actual.abs_diff(guessed)),
        _ => f64::INFINITY,
    };

    GuessDistances {
        time,
        weight: absolute_distance(actual.weight_ounces, guess.weight_guess),
        length: absolute_distance(actual.length_inches, guess.length_guess),
    }
}

fn absolute_distance(actual: f64, guessed: Option<f64>) -> f64 {
    guessed
        .filter(|value| value.is_finite())
        .map_or(f64::INFINITY, |value| (actual - value).abs())
}
