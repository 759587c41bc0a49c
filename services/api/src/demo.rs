use crate::infra::{InMemoryPoolStore, JsonFilePoolStore, PoolSnapshot};
use baby_pool::config::AppConfig;
use baby_pool::error::AppError;
use baby_pool::scoring::{
    leaderboard, CallerIdentity, LeaderboardEntry, ScoringRules, ScoringRun, ScoringService,
};
use baby_pool::telemetry;
use clap::Args;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Pool snapshot file (JSON with `appConfig` and `guesses`)
    #[arg(long)]
    pub(crate) data: PathBuf,
    /// Score and print the leaderboard without writing results back
    #[arg(long)]
    pub(crate) dry_run: bool,
    /// Caller identity recorded for the run
    #[arg(long, default_value = "cli")]
    pub(crate) caller: String,
    /// Print the leaderboard as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the leaderboard as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_score_file(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        data,
        dry_run,
        caller,
        json,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let store = Arc::new(JsonFilePoolStore::new(data));
    if !json {
        println!("Pool snapshot: {}", store.path().display());
    }
    let service = ScoringService::new(store, ScoringRules::default());
    let caller = CallerIdentity::new(caller);

    let run = if dry_run {
        service.preview(Some(&caller))?
    } else {
        service.calculate_and_save(Some(&caller))?
    };

    render_run(&run, json);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = Arc::new(InMemoryPoolStore::from_snapshot(sample_pool()));
    let service = ScoringService::new(store.clone(), ScoringRules::default());

    println!("Baby pool scoring demo");
    let run = service.calculate_and_save(Some(&CallerIdentity::new("demo")))?;
    render_run(&run, args.json);

    let scored_documents = store
        .snapshot()?
        .guesses
        .iter()
        .filter(|document| document.contains_key("score_breakdown"))
        .count();
    println!("\n{scored_documents} guess documents now carry a score breakdown");
    Ok(())
}

fn render_run(run: &ScoringRun, as_json: bool) {
    let board = leaderboard(&run.scored);
    if as_json {
        match serde_json::to_string_pretty(&json!({
            "summary": run.summary,
            "leaderboard": board,
        })) {
            Ok(payload) => println!("{payload}"),
            Err(err) => println!("Leaderboard unavailable: {err}"),
        }
        return;
    }

    println!("{}", run.summary.message);
    if board.is_empty() {
        return;
    }
    println!("\nLeaderboard");
    for entry in &board {
        println!("{}", render_entry(entry));
    }
}

fn render_entry(entry: &LeaderboardEntry) -> String {
    let b = &entry.score_breakdown;
    let who = entry
        .user_id
        .as_ref()
        .map(|user| user.to_string())
        .unwrap_or_else(|| "anonymous".to_string());
    format!(
        "{:>3}. {} ({}) {} pts | time {} weight {} length {} hair {} eyes {} looks {} brycen {}",
        entry.rank,
        entry.guess_id,
        who,
        entry.total_score,
        b.time_points,
        b.weight_points,
        b.length_points,
        b.hair_points,
        b.eye_points,
        b.looks_like_points,
        b.brycen_bonus
    )
}

fn sample_pool() -> PoolSnapshot {
    PoolSnapshot {
        app_config: Some(json!({
            "guessingStatus": "revealed",
            "actualOutcome": {
                "timeOfBirth": "14:30",
                "weightPounds": 7,
                "weightOunces": 6,
                "lengthInches": 20,
                "hairColor": "Brown",
                "eyeColor": "Blue",
                "looksLike": "Dad",
                "brycenReaction": "Excited",
            }
        })),
        guesses: [
            json!({
                "id": "g-aunt-jo", "userId": "jo",
                "timeGuess": "14:30", "weightGuess": 118, "lengthGuess": 20,
                "hairColorGuess": "Brown", "eyeColorGuess": "Blue",
                "looksLikeGuess": "Dad", "brycenReactionGuess": "Excited",
            }),
            json!({
                "id": "g-grandpa", "userId": "pat",
                "timeGuess": "14:25", "weightGuess": 120, "lengthGuess": 20.5,
                "hairColorGuess": "Blonde", "eyeColorGuess": "Blue",
            }),
            json!({
                "id": "g-neighbor", "userId": "sam",
                "timeGuess": "14:35", "weightGuess": "eight pounds", "lengthGuess": 19,
                "looksLikeGuess": "Dad",
            }),
            json!({
                "id": "g-coworker", "userId": "lee",
                "timeGuess": "3:00", "weightGuess": 101, "lengthGuess": 22,
                "brycenReactionGuess": "Excited",
            }),
        ]
        .into_iter()
        .filter_map(|document| match document {
            serde_json::Value::Object(map) => Some(map),
            _ => None,
        })
        .collect(),
    }
}
