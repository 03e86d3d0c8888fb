use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub dataset_path: Option<PathBuf>,
    pub review_budget_minutes: u32,
}

impl Config {
    pub fn from_env() -> Self {
        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let dataset_path = std::env::var("ADAPTIVE_DATASET")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let review_budget_minutes = std::env::var("ADAPTIVE_REVIEW_BUDGET")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(30);

        Self {
            log_level,
            dataset_path,
            review_budget_minutes,
        }
    }
}
