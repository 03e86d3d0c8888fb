use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::adaptive::memory::sm2::sanitize_difficulty;
use crate::adaptive::types::ConceptMastery;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MasteryKey {
    pub learner_id: String,
    pub concept: String,
}

impl MasteryKey {
    pub fn new(learner_id: &str, concept: &str) -> Self {
        Self {
            learner_id: learner_id.to_string(),
            concept: concept.to_string(),
        }
    }
}

/// Keyed storage for per-(learner, concept) mastery records.
///
/// Review state is written only by the concept mastery tracker, which
/// serializes writers per key. `assign_difficulty` is the content-side write
/// path for the difficulty factor.
pub trait MasteryStore: Send + Sync {
    fn load(&self, key: &MasteryKey) -> Option<ConceptMastery>;

    fn save(&self, key: &MasteryKey, mastery: ConceptMastery);

    fn learner_concepts(&self, learner_id: &str) -> Vec<ConceptMastery>;

    fn assign_difficulty(&self, key: &MasteryKey, difficulty: f64);

    fn assigned_difficulty(&self, key: &MasteryKey) -> Option<f64>;
}

#[derive(Debug, Default)]
pub struct InMemoryMasteryStore {
    records: RwLock<HashMap<MasteryKey, ConceptMastery>>,
    difficulties: RwLock<HashMap<MasteryKey, f64>>,
}

impl InMemoryMasteryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = (String, ConceptMastery)>) -> Self {
        let store = Self::new();
        {
            let mut map = store.records.write();
            for (learner_id, mut mastery) in records {
                mastery.difficulty = sanitize_difficulty(mastery.difficulty);
                map.insert(MasteryKey::new(&learner_id, &mastery.concept), mastery);
            }
        }
        store
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl MasteryStore for InMemoryMasteryStore {
    fn load(&self, key: &MasteryKey) -> Option<ConceptMastery> {
        self.records.read().get(key).cloned()
    }

    fn save(&self, key: &MasteryKey, mastery: ConceptMastery) {
        self.records.write().insert(key.clone(), mastery);
    }

    fn learner_concepts(&self, learner_id: &str) -> Vec<ConceptMastery> {
        let records = self.records.read();
        let mut concepts: Vec<ConceptMastery> = records
            .iter()
            .filter(|(key, _)| key.learner_id == learner_id)
            .map(|(_, mastery)| mastery.clone())
            .collect();
        concepts.sort_by(|a, b| a.concept.cmp(&b.concept));
        concepts
    }

    fn assign_difficulty(&self, key: &MasteryKey, difficulty: f64) {
        let difficulty = sanitize_difficulty(difficulty);
        self.difficulties.write().insert(key.clone(), difficulty);
        if let Some(record) = self.records.write().get_mut(key) {
            record.difficulty = difficulty;
        }
    }

    fn assigned_difficulty(&self, key: &MasteryKey) -> Option<f64> {
        self.difficulties.read().get(key).copied()
    }
}
