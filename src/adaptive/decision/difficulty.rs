use serde::{Deserialize, Serialize};

use crate::adaptive::config::DifficultyThresholds;
use crate::adaptive::types::LearningProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyVerdict {
    Easier,
    Maintain,
    Harder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    Simplify,
    AddHints,
    BreakDown,
    IncreaseChallenge,
    AddAdvanced,
    SkipBasics,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentRecommendation {
    pub kind: AdjustmentKind,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSample {
    /// Seconds spent on the segment.
    pub time_taken: f64,
    pub interactions_completed: u32,
    pub interactions_total: u32,
    pub errors: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub completion_rate: f64,
    pub error_rate: f64,
    pub time_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentResult {
    pub current_performance: PerformanceMetrics,
    pub next_difficulty: DifficultyVerdict,
    pub recommendations: Vec<AdjustmentRecommendation>,
}

#[derive(Debug, Clone, Default)]
pub struct DifficultyAdjuster {
    thresholds: DifficultyThresholds,
}

impl DifficultyAdjuster {
    pub fn new(thresholds: DifficultyThresholds) -> Self {
        Self { thresholds }
    }

    pub fn metrics(profile: &LearningProfile, sample: &PerformanceSample) -> PerformanceMetrics {
        let total = sample.interactions_total.max(1) as f64;
        let time_taken = if sample.time_taken.is_finite() {
            sample.time_taken.max(0.0)
        } else {
            0.0
        };
        PerformanceMetrics {
            completion_rate: sample.interactions_completed as f64 / total,
            error_rate: sample.errors as f64 / total,
            time_ratio: time_taken / profile.average_segment_time.max(1.0),
        }
    }

    pub fn verdict(&self, m: &PerformanceMetrics) -> DifficultyVerdict {
        let t = &self.thresholds;
        if m.completion_rate < t.struggle_completion
            || m.error_rate > t.struggle_error
            || m.time_ratio > t.struggle_time_ratio
        {
            DifficultyVerdict::Easier
        } else if m.completion_rate > t.breeze_completion
            && m.error_rate < t.breeze_error
            && m.time_ratio < t.breeze_time_ratio
        {
            DifficultyVerdict::Harder
        } else {
            DifficultyVerdict::Maintain
        }
    }

    pub fn adjust(&self, profile: &LearningProfile, sample: &PerformanceSample) -> AdjustmentResult {
        let current_performance = Self::metrics(profile, sample);
        let next_difficulty = self.verdict(&current_performance);

        tracing::debug!(
            learner_id = %profile.learner_id,
            completion_rate = current_performance.completion_rate,
            error_rate = current_performance.error_rate,
            time_ratio = current_performance.time_ratio,
            verdict = ?next_difficulty,
            "difficulty adjusted"
        );

        AdjustmentResult {
            current_performance,
            next_difficulty,
            recommendations: recommendations_for(next_difficulty),
        }
    }
}

fn recommendations_for(verdict: DifficultyVerdict) -> Vec<AdjustmentRecommendation> {
    let fixed: &[(AdjustmentKind, &str)] = match verdict {
        DifficultyVerdict::Easier => &[
            (AdjustmentKind::Simplify, "User struggling with content"),
            (AdjustmentKind::AddHints, "High error rate"),
            (AdjustmentKind::BreakDown, "Taking too long"),
        ],
        DifficultyVerdict::Harder => &[
            (AdjustmentKind::IncreaseChallenge, "User finding it too easy"),
            (AdjustmentKind::AddAdvanced, "Perfect performance"),
            (AdjustmentKind::SkipBasics, "Fast completion"),
        ],
        DifficultyVerdict::Maintain => &[],
    };
    fixed
        .iter()
        .map(|(kind, reason)| AdjustmentRecommendation {
            kind: *kind,
            reason: reason.to_string(),
        })
        .collect()
}
