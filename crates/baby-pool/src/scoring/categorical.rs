use super::domain::{ActualOutcome, Guess, ScoreBreakdown};
use super::rules::ScoringRules;

/// Awards the exact-match categories. Ranked categories are left at zero.
pub fn score_categories(
    actual: &ActualOutcome,
    guess: &Guess,
    rules: &ScoringRules,
) -> ScoreBreakdown {
    ScoreBreakdown {
        hair_points: award(&guess.hair_color_guess, &actual.hair_color, rules.hair_points),
        eye_points: award(&guess.eye_color_guess, &actual.eye_color, rules.eye_points),
        looks_like_points: award(
            &guess.looks_like_guess,
            &actual.looks_like,
            rules.looks_like_points,
        ),
        brycen_bonus: award(
            &guess.brycen_reaction_guess,
            &actual.brycen_reaction,
            rules.brycen_bonus,
        ),
        ..ScoreBreakdown::default()
    }
}

fn award(guessed: &Option<String>, actual: &str, points: u32) -> u32 {
    if guessed.as_deref() == Some(actual) {
        points
    } else {
        0
    }
}
