//! Review session planning - which due concepts fit into one sitting.
//!
//! Two shapes of session:
//! - time-boxed plan: priority-ordered greedy fill of a minute budget
//! - review session: earliest-due concepts up to an item cap, each with
//!   catalog segments to study from

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::adaptive::config::PlannerParams;
use crate::adaptive::sources::ContentCatalog;
use crate::adaptive::types::{ConceptMastery, DifficultyTier, LearningProfile};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedReview {
    pub concept: ConceptMastery,
    pub priority: f64,
    /// Minutes.
    pub time_needed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPlan {
    pub selected: Vec<PlannedReview>,
    pub deferred_count: usize,
    /// Minutes.
    pub total_time: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentOption {
    pub segment_id: String,
    pub segment_type: String,
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub concept: String,
    pub last_seen: DateTime<Utc>,
    pub difficulty: f64,
    pub segment_options: Vec<SegmentOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "session_type", rename_all = "snake_case")]
pub enum ReviewSession {
    NoReviews {
        next_review: Option<DateTime<Utc>>,
    },
    SpacedReview {
        total_items: usize,
        /// Minutes.
        estimated_time: u32,
        items: Vec<ReviewItem>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ReviewPlanner {
    params: PlannerParams,
}

impl ReviewPlanner {
    pub fn new(params: PlannerParams) -> Self {
        Self { params }
    }

    pub fn priority(&self, concept: &ConceptMastery, profile: &LearningProfile, now: DateTime<Utc>) -> f64 {
        let mut priority = 0.0;

        let overdue = concept.days_overdue(now);
        if overdue > 0 {
            priority += overdue as f64 * self.params.overdue_weight;
        }
        if profile.is_weak_in(&concept.concept) {
            priority += self.params.weakness_bonus;
        }
        priority += (1.0 - concept.success_rate) * self.params.success_gap_weight;
        priority += concept.difficulty;

        priority
    }

    pub fn review_pace(&self, tier: DifficultyTier) -> f64 {
        match tier {
            DifficultyTier::Beginner => self.params.beginner_review_pace,
            DifficultyTier::Advanced => self.params.advanced_review_pace,
            DifficultyTier::Intermediate => 1.0,
        }
    }

    pub fn time_needed(&self, concept: &ConceptMastery, profile: &LearningProfile) -> u32 {
        let minutes = self.params.base_review_minutes
            * concept.difficulty
            * self.review_pace(profile.preferred_difficulty);
        if minutes.is_finite() {
            minutes.max(0.0).trunc() as u32
        } else {
            0
        }
    }

    /// Priority-ordered greedy fill: an item is taken when it still fits in
    /// the remaining budget, otherwise it is deferred and the scan continues.
    pub fn plan(
        &self,
        due: &[ConceptMastery],
        profile: &LearningProfile,
        available_minutes: u32,
        now: DateTime<Utc>,
    ) -> SessionPlan {
        let mut prioritized: Vec<PlannedReview> = due
            .iter()
            .map(|concept| PlannedReview {
                priority: self.priority(concept, profile, now),
                time_needed: self.time_needed(concept, profile),
                concept: concept.clone(),
            })
            .collect();
        prioritized.sort_by(|a, b| {
            b.priority
                .partial_cmp(&a.priority)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let candidates = prioritized.len();
        let mut selected = Vec::new();
        let mut total_time: u32 = 0;

        for item in prioritized {
            let next_total = total_time.saturating_add(item.time_needed);
            if next_total <= available_minutes {
                total_time = next_total;
                selected.push(item);
            }
        }

        let plan = SessionPlan {
            deferred_count: candidates - selected.len(),
            selected,
            total_time,
        };

        tracing::info!(
            learner_id = %profile.learner_id,
            available_minutes,
            selected = plan.selected.len(),
            deferred = plan.deferred_count,
            total_time = plan.total_time,
            "review session planned"
        );

        plan
    }

    /// Earliest-due concepts up to `max_items`. Concepts with no catalog
    /// segment are left out of `items` but still count toward the estimate.
    pub fn review_session(
        &self,
        due: &[ConceptMastery],
        max_items: usize,
        next_review: Option<DateTime<Utc>>,
        catalog: &dyn ContentCatalog,
    ) -> ReviewSession {
        if due.is_empty() {
            return ReviewSession::NoReviews { next_review };
        }

        let mut ordered: Vec<&ConceptMastery> = due.iter().collect();
        ordered.sort_by(|a, b| a.next_review.cmp(&b.next_review));
        ordered.truncate(max_items);

        let items: Vec<ReviewItem> = ordered
            .iter()
            .filter_map(|concept| {
                let options: Vec<SegmentOption> = catalog
                    .segments_with_concept(&concept.concept)
                    .into_iter()
                    .take(self.params.segment_options)
                    .map(|segment| SegmentOption {
                        preview: segment.preview(self.params.preview_chars),
                        segment_id: segment.id,
                        segment_type: segment.segment_type,
                    })
                    .collect();
                if options.is_empty() {
                    return None;
                }
                Some(ReviewItem {
                    concept: concept.concept.clone(),
                    last_seen: concept.last_reviewed,
                    difficulty: concept.difficulty,
                    segment_options: options,
                })
            })
            .collect();

        let estimated = self.params.base_review_minutes * ordered.len() as f64;

        ReviewSession::SpacedReview {
            total_items: ordered.len(),
            estimated_time: estimated.max(0.0).trunc() as u32,
            items,
        }
    }
}
