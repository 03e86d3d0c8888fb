use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::adaptive::config::SchedulerParams;
use crate::adaptive::memory::sm2::{self, Jitter, ReviewOutcome};
use crate::adaptive::memory::store::{MasteryKey, MasteryStore};
use crate::adaptive::types::ConceptMastery;

/// Owns every per-(learner, concept) review update. At most one review runs
/// per key at a time; reviews on different keys proceed in parallel.
pub struct ConceptMasteryTracker {
    store: Arc<dyn MasteryStore>,
    jitter: Arc<dyn Jitter>,
    params: SchedulerParams,
    key_locks: Mutex<HashMap<MasteryKey, Arc<Mutex<()>>>>,
}

impl ConceptMasteryTracker {
    pub fn new(store: Arc<dyn MasteryStore>, jitter: Arc<dyn Jitter>, params: SchedulerParams) -> Self {
        Self {
            store,
            jitter,
            params,
            key_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &Arc<dyn MasteryStore> {
        &self.store
    }

    pub fn record_review(&self, concept: &str, learner_id: &str, performance: f64) -> ConceptMastery {
        self.record_review_at(concept, learner_id, performance, Utc::now())
            .mastery
    }

    pub fn record_review_at(
        &self,
        concept: &str,
        learner_id: &str,
        performance: f64,
        now: DateTime<Utc>,
    ) -> ReviewOutcome {
        let performance = sanitize_performance(performance, concept, learner_id);
        let key = MasteryKey::new(learner_id, concept);

        let lock = self.key_lock(&key);
        let _guard = lock.lock();

        let prev = match self.store.load(&key) {
            Some(existing) => existing,
            None => {
                let difficulty = self
                    .store
                    .assigned_difficulty(&key)
                    .unwrap_or(self.params.initial_difficulty);
                sm2::new_mastery(concept, difficulty, now, &self.params)
            }
        };

        let mut outcome =
            sm2::next_review_state(&prev, performance, now, self.jitter.as_ref(), &self.params);
        // Content-side assignments landing after the load win over the loaded value.
        if let Some(assigned) = self.store.assigned_difficulty(&key) {
            outcome.mastery.difficulty = sm2::sanitize_difficulty(assigned);
        }
        self.store.save(&key, outcome.mastery.clone());

        tracing::info!(
            learner_id,
            concept,
            performance,
            exposure = outcome.mastery.exposure_count,
            interval_days = outcome.interval_days,
            stability = outcome.mastery.stability,
            passed = outcome.passed,
            "concept review recorded"
        );

        outcome
    }

    /// Content-side write of a concept's difficulty factor, serialized with
    /// reviews on the same key.
    pub fn assign_difficulty(&self, learner_id: &str, concept: &str, difficulty: f64) {
        let key = MasteryKey::new(learner_id, concept);
        let lock = self.key_lock(&key);
        let _guard = lock.lock();
        self.store.assign_difficulty(&key, difficulty);
    }

    pub fn due_concepts(&self, learner_id: &str) -> Vec<ConceptMastery> {
        self.due_concepts_at(learner_id, Utc::now())
    }

    /// Concepts with next-review at or before `now`, earliest first.
    pub fn due_concepts_at(&self, learner_id: &str, now: DateTime<Utc>) -> Vec<ConceptMastery> {
        let mut due: Vec<ConceptMastery> = self
            .store
            .learner_concepts(learner_id)
            .into_iter()
            .filter(|m| m.is_due(now))
            .collect();
        due.sort_by(|a, b| a.next_review.cmp(&b.next_review));
        due
    }

    pub fn next_scheduled_review(&self, learner_id: &str) -> Option<DateTime<Utc>> {
        self.store
            .learner_concepts(learner_id)
            .into_iter()
            .map(|m| m.next_review)
            .min()
    }

    fn key_lock(&self, key: &MasteryKey) -> Arc<Mutex<()>> {
        let mut locks = self.key_locks.lock();
        Arc::clone(locks.entry(key.clone()).or_insert_with(|| Arc::new(Mutex::new(()))))
    }
}

fn sanitize_performance(performance: f64, concept: &str, learner_id: &str) -> f64 {
    if !performance.is_finite() {
        tracing::warn!(learner_id, concept, "non-finite review performance, treating as 0");
        return 0.0;
    }
    if !(0.0..=1.0).contains(&performance) {
        tracing::warn!(learner_id, concept, performance, "review performance out of range, clamping");
    }
    performance.clamp(0.0, 1.0)
}
