//! Read-only collaborators the adaptive core consumes, plus in-memory
//! implementations backed by a JSON dataset snapshot.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::adaptive::types::{ConceptMastery, Course, Episode, Interaction, Segment, TelemetryEvent};

pub trait LearnerDataSource: Send + Sync {
    fn interaction_history(&self, learner_id: &str) -> Vec<Interaction>;

    fn telemetry_events(&self, learner_id: &str) -> Vec<TelemetryEvent>;

    /// Completed segment ids in completion order; `None` when the learner has
    /// not started the course.
    fn completed_segments(&self, learner_id: &str, course_id: &str) -> Option<Vec<String>>;
}

pub trait ContentCatalog: Send + Sync {
    fn segment(&self, segment_id: &str) -> Option<Segment>;

    fn segments_with_concept(&self, concept: &str) -> Vec<Segment>;

    fn episode(&self, episode_id: &str) -> Option<Episode>;

    fn course(&self, course_id: &str) -> Option<Course>;
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse dataset: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LearnerRecord {
    pub id: String,
    #[serde(default)]
    pub interactions: Vec<Interaction>,
    #[serde(default)]
    pub events: Vec<TelemetryEvent>,
    /// course id -> completed segment ids
    #[serde(default)]
    pub progress: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub concepts: Vec<ConceptMastery>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub learners: Vec<LearnerRecord>,
    #[serde(default)]
    pub courses: Vec<Course>,
}

impl Dataset {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, DatasetError> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryLearnerData {
    learners: HashMap<String, LearnerRecord>,
}

impl InMemoryLearnerData {
    pub fn new(learners: impl IntoIterator<Item = LearnerRecord>) -> Self {
        Self {
            learners: learners.into_iter().map(|l| (l.id.clone(), l)).collect(),
        }
    }

    pub fn learner_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.learners.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl LearnerDataSource for InMemoryLearnerData {
    fn interaction_history(&self, learner_id: &str) -> Vec<Interaction> {
        self.learners
            .get(learner_id)
            .map(|l| l.interactions.clone())
            .unwrap_or_default()
    }

    fn telemetry_events(&self, learner_id: &str) -> Vec<TelemetryEvent> {
        self.learners
            .get(learner_id)
            .map(|l| l.events.clone())
            .unwrap_or_default()
    }

    fn completed_segments(&self, learner_id: &str, course_id: &str) -> Option<Vec<String>> {
        self.learners
            .get(learner_id)
            .and_then(|l| l.progress.get(course_id).cloned())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    courses: HashMap<String, Course>,
    episodes: HashMap<String, Episode>,
    segments: HashMap<String, Segment>,
    /// Segment ids in catalog order, for deterministic concept lookups.
    segment_order: Vec<String>,
}

impl InMemoryCatalog {
    pub fn new(courses: impl IntoIterator<Item = Course>) -> Self {
        let mut catalog = Self::default();
        for course in courses {
            catalog.insert_course(course);
        }
        catalog
    }

    fn insert_course(&mut self, mut course: Course) {
        course.lessons.sort_by_key(|l| l.order);
        for lesson in course.lessons.iter_mut() {
            lesson.episodes.sort_by_key(|e| e.order);
            for episode in lesson.episodes.iter_mut() {
                if episode.course_id.is_empty() {
                    episode.course_id = course.id.clone();
                }
                episode.segments.sort_by_key(|s| s.order);
                for segment in episode.segments.iter_mut() {
                    if segment.episode_id.is_empty() {
                        segment.episode_id = episode.id.clone();
                    }
                    if !self.segments.contains_key(&segment.id) {
                        self.segment_order.push(segment.id.clone());
                    }
                    self.segments.insert(segment.id.clone(), segment.clone());
                }
                self.episodes.insert(episode.id.clone(), episode.clone());
            }
        }
        self.courses.insert(course.id.clone(), course);
    }

    pub fn course_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.courses.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl ContentCatalog for InMemoryCatalog {
    fn segment(&self, segment_id: &str) -> Option<Segment> {
        self.segments.get(segment_id).cloned()
    }

    fn segments_with_concept(&self, concept: &str) -> Vec<Segment> {
        self.segment_order
            .iter()
            .filter_map(|id| self.segments.get(id))
            .filter(|s| s.has_keyword(concept))
            .cloned()
            .collect()
    }

    fn episode(&self, episode_id: &str) -> Option<Episode> {
        self.episodes.get(episode_id).cloned()
    }

    fn course(&self, course_id: &str) -> Option<Course> {
        self.courses.get(course_id).cloned()
    }
}
