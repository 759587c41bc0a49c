use serde::Serialize;

use super::domain::{GuessId, ScoreBreakdown, ScoredGuess, UserId};

/// Public ranking row for a scored guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    /// Competition rank: equal totals share a rank and the next rank skips ahead.
    pub rank: usize,
    pub guess_id: GuessId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub total_score: u32,
    pub score_breakdown: ScoreBreakdown,
}

/// Orders scored guesses by total score, highest first, ties broken by guess id.
pub fn leaderboard(scored: &[ScoredGuess]) -> Vec<LeaderboardEntry> {
    let mut ordered: Vec<&ScoredGuess> = scored.iter().collect();
    ordered.sort_by(|a, b| b.total_score.cmp(&a.total_score).then_with(|| a.id.cmp(&b.id)));

    let mut entries: Vec<LeaderboardEntry> = Vec::with_capacity(ordered.len());
    for (position, guess) in ordered.into_iter().enumerate() {
        let rank = match entries.last() {
            Some(previous) if previous.total_score == guess.total_score => previous.rank,
            _ => position + 1,
        };
        entries.push(LeaderboardEntry {
            rank,
            guess_id: guess.id.clone(),
            user_id: guess.user_id.clone(),
            total_score: guess.total_score,
            score_breakdown: guess.breakdown,
        });
    }
    entries
}
