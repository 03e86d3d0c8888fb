use serde::{Deserialize, Serialize};

use crate::adaptive::config::PlannerParams;
use crate::adaptive::types::{Course, DifficultyTier, Episode, LearningProfile, LearningStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Slow,
    Normal,
    Fast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Depth {
    Overview,
    Standard,
    Comprehensive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathAdaptations {
    pub pace: Pace,
    pub depth: Depth,
    pub interaction_level: InteractionLevel,
}

impl PathAdaptations {
    pub fn for_profile(profile: &LearningProfile) -> Self {
        let (pace, depth) = match profile.preferred_difficulty {
            DifficultyTier::Beginner => (Pace::Slow, Depth::Overview),
            DifficultyTier::Intermediate => (Pace::Normal, Depth::Standard),
            DifficultyTier::Advanced => (Pace::Fast, Depth::Comprehensive),
        };
        let interaction_level = match profile.learning_style {
            LearningStyle::Kinesthetic => InteractionLevel::High,
            LearningStyle::Reading => InteractionLevel::Low,
            _ => InteractionLevel::Medium,
        };
        Self {
            pace,
            depth,
            interaction_level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PathStep {
    Skip {
        episode_id: String,
        reason: String,
    },
    Study {
        episode_id: String,
        /// Seconds.
        estimated_time: u32,
        focus_segments: Vec<String>,
        adaptations: PathAdaptations,
    },
}

impl PathStep {
    pub fn episode_id(&self) -> &str {
        match self {
            Self::Skip { episode_id, .. } | Self::Study { episode_id, .. } => episode_id,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PathGenerator {
    params: PlannerParams,
}

impl PathGenerator {
    pub fn new(params: PlannerParams) -> Self {
        Self { params }
    }

    /// An episode is skippable only when it opts in and lists at least one
    /// concept, every one of which is a strength.
    pub fn should_skip(&self, episode: &Episode, profile: &LearningProfile) -> bool {
        match &episode.prerequisite {
            Some(prereq) if prereq.skip_if_proficient && !prereq.concepts.is_empty() => prereq
                .concepts
                .iter()
                .all(|concept| profile.is_strong_in(concept)),
            _ => false,
        }
    }

    pub fn estimate_episode_time(&self, episode: &Episode, profile: &LearningProfile) -> u32 {
        let base: u64 = episode
            .segments
            .iter()
            .filter_map(|s| s.estimated_duration)
            .map(u64::from)
            .sum();
        let pace = match profile.preferred_difficulty {
            DifficultyTier::Beginner => self.params.beginner_episode_pace,
            DifficultyTier::Advanced => self.params.advanced_episode_pace,
            DifficultyTier::Intermediate => 1.0,
        };
        let scaled = base as f64 * pace;
        scaled.clamp(0.0, u32::MAX as f64).trunc() as u32
    }

    pub fn focus_segments(&self, episode: &Episode, profile: &LearningProfile) -> Vec<String> {
        episode
            .segments
            .iter()
            .filter(|s| s.keywords.iter().any(|k| profile.is_weak_in(k)))
            .map(|s| s.id.clone())
            .collect()
    }

    pub fn generate(&self, course: &Course, profile: &LearningProfile) -> Vec<PathStep> {
        let mut lessons: Vec<_> = course.lessons.iter().collect();
        lessons.sort_by_key(|l| l.order);

        let mut path = Vec::new();
        for lesson in lessons {
            let mut episodes: Vec<&Episode> = lesson.episodes.iter().collect();
            episodes.sort_by_key(|e| e.order);

            for episode in episodes {
                if self.should_skip(episode, profile) {
                    path.push(PathStep::Skip {
                        episode_id: episode.id.clone(),
                        reason: "Already mastered prerequisites".to_string(),
                    });
                    continue;
                }
                path.push(PathStep::Study {
                    episode_id: episode.id.clone(),
                    estimated_time: self.estimate_episode_time(episode, profile),
                    focus_segments: self.focus_segments(episode, profile),
                    adaptations: PathAdaptations::for_profile(profile),
                });
            }
        }

        tracing::debug!(
            learner_id = %profile.learner_id,
            course_id = %course.id,
            steps = path.len(),
            "learning path generated"
        );
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adaptive::modeling::LearnerProfiler;
    use crate::adaptive::types::{Lesson, Prerequisite, Segment};

    fn segment(id: &str, duration: u32, keywords: &[&str]) -> Segment {
        Segment {
            id: id.into(),
            episode_id: String::new(),
            order: 0,
            segment_type: "concept".into(),
            title: None,
            text_content: String::new(),
            estimated_duration: Some(duration),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn episode(id: &str, order: i32, prerequisite: Option<Prerequisite>) -> Episode {
        Episode {
            id: id.into(),
            course_id: "c1".into(),
            title: String::new(),
            order,
            segments: vec![segment(&format!("{id}-a"), 100, &["acks"]), segment(&format!("{id}-b"), 200, &[])],
            prerequisite,
        }
    }

    #[test]
    fn test_path_orders_and_skips() {
        let mut profile = LearnerProfiler::default().default_profile("u1");
        profile.strengths.insert("brokers".into());
        profile.weaknesses.insert("acks".into());

        let course = Course {
            id: "c1".into(),
            title: "Kafka".into(),
            lessons: vec![Lesson {
                id: "l1".into(),
                order: 1,
                episodes: vec![
                    episode(
                        "e2",
                        2,
                        Some(Prerequisite {
                            skip_if_proficient: true,
                            concepts: vec!["brokers".into()],
                        }),
                    ),
                    episode("e1", 1, None),
                    episode(
                        "e3",
                        3,
                        Some(Prerequisite {
                            skip_if_proficient: true,
                            concepts: vec![],
                        }),
                    ),
                ],
            }],
        };

        let path = PathGenerator::default().generate(&course, &profile);
        let ids: Vec<&str> = path.iter().map(|s| s.episode_id()).collect();
        assert_eq!(ids, vec!["e1", "e2", "e3"]);
        assert!(matches!(path[1], PathStep::Skip { .. }));

        match &path[0] {
            PathStep::Study {
                estimated_time,
                focus_segments,
                adaptations,
                ..
            } => {
                assert_eq!(*estimated_time, 390);
                assert_eq!(focus_segments, &vec!["e1-a".to_string()]);
                assert_eq!(adaptations.pace, Pace::Slow);
                assert_eq!(adaptations.depth, Depth::Overview);
                assert_eq!(adaptations.interaction_level, InteractionLevel::Medium);
            }
            other => panic!("unexpected step {other:?}"),
        }
        assert!(matches!(path[2], PathStep::Study { .. }));
    }

    #[test]
    fn test_advanced_pace() {
        let mut profile = LearnerProfiler::default().default_profile("u1");
        profile.preferred_difficulty = DifficultyTier::Advanced;
        profile.learning_style = LearningStyle::Kinesthetic;
        let generator = PathGenerator::default();
        assert_eq!(generator.estimate_episode_time(&episode("e1", 1, None), &profile), 240);
        let adaptations = PathAdaptations::for_profile(&profile);
        assert_eq!(adaptations.pace, Pace::Fast);
        assert_eq!(adaptations.interaction_level, InteractionLevel::High);
    }
}
