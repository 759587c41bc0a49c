use super::categorical::score_categories;
use super::diff::measure;
use super::domain::{ActualOutcome, Guess, GuessDistances, ScoreBreakdown, ScoredGuess};
use super::rules::ScoringRules;
use super::tiers::allocate;

/// Numeric categories ranked across the whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankedCategory {
    Time,
    Weight,
    Length,
}

impl RankedCategory {
    pub const ALL: [RankedCategory; 3] = [Self::Time, Self::Weight, Self::Length];

    fn distance(self, distances: &GuessDistances) -> f64 {
        match self {
            Self::Time => distances.time,
            Self::Weight => distances.weight,
            Self::Length => distances.length,
        }
    }

    fn assign(self, breakdown: &mut ScoreBreakdown, points: u32) {
        match self {
            Self::Time => breakdown.time_points = points,
            Self::Weight => breakdown.weight_points = points,
            Self::Length => breakdown.length_points = points,
        }
    }
}

/// Stateless scorer that applies the rules to one snapshot of guesses.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    rules: ScoringRules,
}

impl ScoringEngine {
    pub fn new(rules: ScoringRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    /// Scores every guess in the batch. Output order matches `guesses`.
    pub fn score(&self, actual: &ActualOutcome, guesses: &[Guess]) -> Vec<ScoredGuess> {
        let distances: Vec<GuessDistances> =
            guesses.iter().map(|guess| measure(actual, guess)).collect();
        let mut breakdowns: Vec<ScoreBreakdown> = guesses
            .iter()
            .map(|guess| score_categories(actual, guess, &self.rules))
            .collect();

        for category in RankedCategory::ALL {
            let category_distances: Vec<f64> = distances
                .iter()
                .map(|distance| category.distance(distance))
                .collect();
            let points = allocate(&category_distances, &self.rules.rank_tiers);
            for (breakdown, awarded) in breakdowns.iter_mut().zip(points) {
                category.assign(breakdown, awarded);
            }
        }

        guesses
            .iter()
            .zip(distances)
            .zip(breakdowns)
            .map(|((guess, distances), breakdown)| ScoredGuess {
                id: guess.id.clone(),
                user_id: guess.user_id.clone(),
                distances,
                breakdown,
                total_score: breakdown.total(),
            })
            .collect()
    }
}
