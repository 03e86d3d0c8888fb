use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::adaptive::config::AdaptiveConfig;
use crate::adaptive::decision::{
    personalize_segment, AdjustmentResult, DifficultyAdjuster, PathGenerator, PathStep,
    PerformanceSample, PersonalizedSegment, ReviewPlanner, ReviewSession, SegmentRecommender,
    SessionPlan,
};
use crate::adaptive::memory::{
    ConceptMasteryTracker, InMemoryMasteryStore, Jitter, MasteryStore, ReviewOutcome,
    UniformJitter,
};
use crate::adaptive::modeling::LearnerProfiler;
use crate::adaptive::sources::{
    ContentCatalog, Dataset, InMemoryCatalog, InMemoryLearnerData, LearnerDataSource,
};
use crate::adaptive::types::{ConceptMastery, Episode, LearningProfile, Segment};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("episode not found: {0}")]
    EpisodeNotFound(String),
    #[error("segment not found: {0}")]
    SegmentNotFound(String),
    #[error("course not found: {0}")]
    CourseNotFound(String),
}

/// Entry point for the adaptive core: wires the read-only collaborators to
/// the profiler, recommender, difficulty adjuster, mastery tracker and
/// planners.
pub struct AdaptiveEngine {
    config: AdaptiveConfig,
    learners: Arc<dyn LearnerDataSource>,
    catalog: Arc<dyn ContentCatalog>,
    profiler: LearnerProfiler,
    tracker: ConceptMasteryTracker,
    recommender: SegmentRecommender,
    adjuster: DifficultyAdjuster,
    planner: ReviewPlanner,
    paths: PathGenerator,
}

impl AdaptiveEngine {
    pub fn new(
        config: AdaptiveConfig,
        learners: Arc<dyn LearnerDataSource>,
        catalog: Arc<dyn ContentCatalog>,
        store: Arc<dyn MasteryStore>,
    ) -> Self {
        Self::with_jitter(config, learners, catalog, store, Arc::new(UniformJitter))
    }

    pub fn with_jitter(
        config: AdaptiveConfig,
        learners: Arc<dyn LearnerDataSource>,
        catalog: Arc<dyn ContentCatalog>,
        store: Arc<dyn MasteryStore>,
        jitter: Arc<dyn Jitter>,
    ) -> Self {
        Self {
            profiler: LearnerProfiler::new(config.profiler.clone()),
            tracker: ConceptMasteryTracker::new(store, jitter, config.scheduler.clone()),
            recommender: SegmentRecommender::new(config.recommender.clone()),
            adjuster: DifficultyAdjuster::new(config.difficulty.clone()),
            planner: ReviewPlanner::new(config.planner.clone()),
            paths: PathGenerator::new(config.planner.clone()),
            config,
            learners,
            catalog,
        }
    }

    /// Engine over in-memory sources built from a dataset snapshot.
    pub fn from_dataset(config: AdaptiveConfig, dataset: Dataset, jitter: Arc<dyn Jitter>) -> Self {
        let seeded: Vec<(String, ConceptMastery)> = dataset
            .learners
            .iter()
            .flat_map(|l| l.concepts.iter().map(move |c| (l.id.clone(), c.clone())))
            .collect();
        let store = Arc::new(InMemoryMasteryStore::with_records(seeded));
        let learners = Arc::new(InMemoryLearnerData::new(dataset.learners));
        let catalog = Arc::new(InMemoryCatalog::new(dataset.courses));
        Self::with_jitter(config, learners, catalog, store, jitter)
    }

    pub fn config(&self) -> &AdaptiveConfig {
        &self.config
    }

    pub fn build_profile(&self, learner_id: &str) -> LearningProfile {
        let history = self.learners.interaction_history(learner_id);
        let events = self.learners.telemetry_events(learner_id);
        self.profiler
            .build_profile(learner_id, &history, &events, self.catalog.as_ref())
    }

    pub fn recommend_segment(&self, learner_id: &str, episode: &Episode) -> Option<Segment> {
        let Some(completed) = self.learners.completed_segments(learner_id, &episode.course_id) else {
            return episode.first_segment().cloned();
        };
        let profile = self.build_profile(learner_id);
        self.recommender
            .recommend(&profile, &episode.segments, &completed)
            .cloned()
    }

    pub fn recommend_for_episode(
        &self,
        learner_id: &str,
        episode_id: &str,
    ) -> Result<Option<Segment>, EngineError> {
        let episode = self
            .catalog
            .episode(episode_id)
            .ok_or_else(|| EngineError::EpisodeNotFound(episode_id.to_string()))?;
        Ok(self.recommend_segment(learner_id, &episode))
    }

    pub fn adjust_difficulty(
        &self,
        learner_id: &str,
        segment_id: &str,
        sample: &PerformanceSample,
    ) -> AdjustmentResult {
        let profile = self.build_profile(learner_id);
        let result = self.adjuster.adjust(&profile, sample);
        tracing::debug!(learner_id, segment_id, verdict = ?result.next_difficulty, "live difficulty check");
        result
    }

    pub fn record_concept_review(&self, concept: &str, learner_id: &str, performance: f64) -> ConceptMastery {
        self.tracker.record_review(concept, learner_id, performance)
    }

    pub fn record_concept_review_at(
        &self,
        concept: &str,
        learner_id: &str,
        performance: f64,
        now: DateTime<Utc>,
    ) -> ReviewOutcome {
        self.tracker.record_review_at(concept, learner_id, performance, now)
    }

    /// Content-side write path for a concept's difficulty factor.
    pub fn assign_concept_difficulty(&self, learner_id: &str, concept: &str, difficulty: f64) {
        self.tracker.assign_difficulty(learner_id, concept, difficulty);
    }

    pub fn due_concepts(&self, learner_id: &str) -> Vec<ConceptMastery> {
        self.tracker.due_concepts(learner_id)
    }

    pub fn due_concepts_at(&self, learner_id: &str, now: DateTime<Utc>) -> Vec<ConceptMastery> {
        self.tracker.due_concepts_at(learner_id, now)
    }

    pub fn plan_review_session(&self, learner_id: &str, available_minutes: u32) -> SessionPlan {
        self.plan_review_session_at(learner_id, available_minutes, Utc::now())
    }

    pub fn plan_review_session_at(
        &self,
        learner_id: &str,
        available_minutes: u32,
        now: DateTime<Utc>,
    ) -> SessionPlan {
        let due = self.tracker.due_concepts_at(learner_id, now);
        let profile = self.build_profile(learner_id);
        self.planner.plan(&due, &profile, available_minutes, now)
    }

    pub fn personalize_segment(
        &self,
        learner_id: &str,
        segment_id: &str,
    ) -> Result<PersonalizedSegment, EngineError> {
        let segment = self
            .catalog
            .segment(segment_id)
            .ok_or_else(|| EngineError::SegmentNotFound(segment_id.to_string()))?;
        let profile = self.build_profile(learner_id);
        Ok(personalize_segment(&segment, &profile))
    }

    pub fn generate_learning_path(
        &self,
        learner_id: &str,
        course_id: &str,
    ) -> Result<Vec<PathStep>, EngineError> {
        let course = self
            .catalog
            .course(course_id)
            .ok_or_else(|| EngineError::CourseNotFound(course_id.to_string()))?;
        let profile = self.build_profile(learner_id);
        Ok(self.paths.generate(&course, &profile))
    }

    pub fn generate_review_session(&self, learner_id: &str, max_items: Option<usize>) -> ReviewSession {
        self.generate_review_session_at(learner_id, max_items, Utc::now())
    }

    pub fn generate_review_session_at(
        &self,
        learner_id: &str,
        max_items: Option<usize>,
        now: DateTime<Utc>,
    ) -> ReviewSession {
        let due = self.tracker.due_concepts_at(learner_id, now);
        let max_items = max_items.unwrap_or(self.config.planner.max_session_items);
        let next_review = if due.is_empty() {
            self.tracker.next_scheduled_review(learner_id)
        } else {
            None
        };
        self.planner
            .review_session(&due, max_items, next_review, self.catalog.as_ref())
    }
}
