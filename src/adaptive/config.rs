use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilerParams {
    pub default_segment_time: f64,
    pub default_success_rate: f64,
    pub default_session_minutes: u32,
    pub advanced_threshold: f64,
    pub intermediate_threshold: f64,
    pub min_keyword_samples: u32,
    pub strength_threshold: f64,
    pub weakness_threshold: f64,
    pub session_percentile: f64,
    pub kinesthetic_min_interactions: f64,
}

impl Default for ProfilerParams {
    fn default() -> Self {
        Self {
            default_segment_time: 120.0,
            default_success_rate: 0.7,
            default_session_minutes: 30,
            advanced_threshold: 0.9,
            intermediate_threshold: 0.7,
            min_keyword_samples: 3,
            strength_threshold: 0.8,
            weakness_threshold: 0.5,
            session_percentile: 0.75,
            kinesthetic_min_interactions: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerParams {
    pub pass_threshold: f64,
    pub mastery_threshold: f64,
    pub min_stability: f64,
    pub max_stability: f64,
    pub initial_stability: f64,
    pub initial_difficulty: f64,
    pub fail_stability_factor: f64,
    pub stability_growth: f64,
    pub first_interval_days: i64,
    pub bootstrap_interval_days: i64,
    pub max_interval_days: i64,
    pub success_rate_alpha: f64,
    pub jitter_min: f64,
    pub jitter_max: f64,
    pub jitter_enabled: bool,
}

impl Default for SchedulerParams {
    fn default() -> Self {
        Self {
            pass_threshold: 0.6,
            mastery_threshold: 0.9,
            min_stability: 1.3,
            max_stability: 2.5,
            initial_stability: 2.5,
            initial_difficulty: 1.0,
            fail_stability_factor: 0.6,
            stability_growth: 1.1,
            first_interval_days: 1,
            bootstrap_interval_days: 6,
            max_interval_days: 36_500,
            success_rate_alpha: 0.3,
            jitter_min: 0.9,
            jitter_max: 1.1,
            jitter_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommenderParams {
    pub weakness_weight: f64,
    pub strength_weight: f64,
    pub tier_match_bonus: f64,
    pub novelty_bonus: f64,
    pub recency_window: usize,
}

impl Default for RecommenderParams {
    fn default() -> Self {
        Self {
            weakness_weight: 2.0,
            strength_weight: 0.5,
            tier_match_bonus: 1.0,
            novelty_bonus: 0.5,
            recency_window: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyThresholds {
    pub struggle_completion: f64,
    pub struggle_error: f64,
    pub struggle_time_ratio: f64,
    pub breeze_completion: f64,
    pub breeze_error: f64,
    pub breeze_time_ratio: f64,
}

impl Default for DifficultyThresholds {
    fn default() -> Self {
        Self {
            struggle_completion: 0.5,
            struggle_error: 0.5,
            struggle_time_ratio: 1.5,
            breeze_completion: 0.95,
            breeze_error: 0.1,
            breeze_time_ratio: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerParams {
    pub overdue_weight: f64,
    pub weakness_bonus: f64,
    pub success_gap_weight: f64,
    pub base_review_minutes: f64,
    pub beginner_review_pace: f64,
    pub advanced_review_pace: f64,
    pub beginner_episode_pace: f64,
    pub advanced_episode_pace: f64,
    pub max_session_items: usize,
    pub segment_options: usize,
    pub preview_chars: usize,
}

impl Default for PlannerParams {
    fn default() -> Self {
        Self {
            overdue_weight: 2.0,
            weakness_bonus: 5.0,
            success_gap_weight: 3.0,
            base_review_minutes: 2.0,
            beginner_review_pace: 1.5,
            advanced_review_pace: 0.8,
            beginner_episode_pace: 1.3,
            advanced_episode_pace: 0.8,
            max_session_items: 20,
            segment_options: 3,
            preview_chars: 100,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdaptiveConfig {
    pub profiler: ProfilerParams,
    pub scheduler: SchedulerParams,
    pub recommender: RecommenderParams,
    pub difficulty: DifficultyThresholds,
    pub planner: PlannerParams,
}

impl AdaptiveConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("ADAPTIVE_INITIAL_STABILITY") {
            let stability = val.parse().unwrap_or(config.scheduler.initial_stability);
            config.scheduler.initial_stability = stability.clamp(
                config.scheduler.min_stability,
                config.scheduler.max_stability,
            );
        }
        if let Ok(val) = std::env::var("ADAPTIVE_RECENCY_WINDOW") {
            config.recommender.recency_window = val.parse().unwrap_or(5);
        }
        if let Ok(val) = std::env::var("ADAPTIVE_REVIEW_BASE_MINUTES") {
            config.planner.base_review_minutes = val.parse().unwrap_or(2.0);
        }
        if let Ok(val) = std::env::var("ADAPTIVE_JITTER_ENABLED") {
            config.scheduler.jitter_enabled = val.parse().unwrap_or(true);
        }

        config
    }
}
