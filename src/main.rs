use std::path::PathBuf;
use std::sync::Arc;

use serde_json::json;

use adaptive_learning::adaptive::config::AdaptiveConfig;
use adaptive_learning::adaptive::memory::UniformJitter;
use adaptive_learning::adaptive::sources::Dataset;
use adaptive_learning::config::Config;
use adaptive_learning::logging::init_tracing;
use adaptive_learning::AdaptiveEngine;

fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = init_tracing(&config.log_level);

    let Some(path) = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.dataset_path.clone())
    else {
        tracing::error!("no dataset given: pass a path or set ADAPTIVE_DATASET");
        std::process::exit(2);
    };

    let dataset = match Dataset::from_path(&path) {
        Ok(dataset) => dataset,
        Err(err) => {
            tracing::error!(error = %err, path = %path.display(), "failed to load dataset");
            std::process::exit(1);
        }
    };

    let learner_ids: Vec<String> = dataset.learners.iter().map(|l| l.id.clone()).collect();
    let episodes: Vec<String> = dataset
        .courses
        .iter()
        .flat_map(|c| c.lessons.iter())
        .flat_map(|l| l.episodes.iter())
        .map(|e| e.id.clone())
        .collect();

    let engine = AdaptiveEngine::from_dataset(AdaptiveConfig::from_env(), dataset, Arc::new(UniformJitter));
    tracing::info!(
        learners = learner_ids.len(),
        episodes = episodes.len(),
        budget = config.review_budget_minutes,
        "replaying dataset"
    );

    for learner_id in &learner_ids {
        let profile = engine.build_profile(learner_id);
        let plan = engine.plan_review_session(learner_id, config.review_budget_minutes);

        let mut recommendations = serde_json::Map::new();
        for episode_id in &episodes {
            match engine.recommend_for_episode(learner_id, episode_id) {
                Ok(next) => {
                    recommendations.insert(episode_id.clone(), json!(next.map(|s| s.id)));
                }
                Err(err) => tracing::warn!(error = %err, "recommendation skipped"),
            }
        }

        let line = json!({
            "learner_id": learner_id,
            "profile": profile,
            "review_plan": plan,
            "next_segments": recommendations,
        });
        println!("{line}");
    }
}
