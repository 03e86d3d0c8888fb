use std::collections::HashSet;

use crate::adaptive::config::RecommenderParams;
use crate::adaptive::types::{LearningProfile, Segment};

#[derive(Debug, Clone, Default)]
pub struct SegmentRecommender {
    params: RecommenderParams,
}

impl SegmentRecommender {
    pub fn new(params: RecommenderParams) -> Self {
        Self { params }
    }

    /// `completed` is in completion order; its tail is the recency window.
    pub fn score(&self, segment: &Segment, profile: &LearningProfile, completed: &[String]) -> f64 {
        let mut score = 0.0;

        for weakness in &profile.weaknesses {
            if segment.has_keyword(weakness) {
                score += self.params.weakness_weight;
            }
        }
        for strength in &profile.strengths {
            if segment.has_keyword(strength) {
                score += self.params.strength_weight;
            }
        }
        if segment.estimated_tier() == profile.preferred_difficulty {
            score += self.params.tier_match_bonus;
        }

        let window_start = completed.len().saturating_sub(self.params.recency_window);
        if !completed[window_start..].iter().any(|id| *id == segment.id) {
            score += self.params.novelty_bonus;
        }

        score
    }

    /// Highest score among segments not yet completed; the first candidate
    /// wins ties.
    pub fn recommend<'a>(
        &self,
        profile: &LearningProfile,
        candidates: &'a [Segment],
        completed: &[String],
    ) -> Option<&'a Segment> {
        let done: HashSet<&str> = completed.iter().map(String::as_str).collect();

        let mut best: Option<(&Segment, f64)> = None;
        for segment in candidates.iter().filter(|s| !done.contains(s.id.as_str())) {
            let score = self.score(segment, profile, completed);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((segment, score)),
            }
        }

        if let Some((segment, score)) = best {
            tracing::debug!(
                learner_id = %profile.learner_id,
                segment_id = %segment.id,
                score,
                "segment recommended"
            );
        }
        best.map(|(segment, _)| segment)
    }
}
