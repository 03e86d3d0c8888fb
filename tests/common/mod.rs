#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use adaptive_learning::adaptive::config::AdaptiveConfig;
use adaptive_learning::adaptive::memory::{FixedJitter, InMemoryMasteryStore, Jitter};
use adaptive_learning::adaptive::sources::{InMemoryCatalog, InMemoryLearnerData, LearnerRecord};
use adaptive_learning::adaptive::types::{
    Course, Episode, Interaction, Lesson, Prerequisite, Segment, TelemetryEvent,
};
use adaptive_learning::AdaptiveEngine;

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 2, 10, 0, 0).unwrap()
}

pub fn segment(id: &str, order: i32, text_len: usize, keywords: &[&str]) -> Segment {
    Segment {
        id: id.to_string(),
        episode_id: "ep-producers".to_string(),
        order,
        segment_type: "concept".to_string(),
        title: Some(format!("Segment {id}")),
        text_content: "k".repeat(text_len),
        estimated_duration: Some(120),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

pub fn kafka_course() -> Course {
    Course {
        id: "kafka".to_string(),
        title: "Kafka Fundamentals".to_string(),
        lessons: vec![Lesson {
            id: "lesson-1".to_string(),
            order: 1,
            episodes: vec![
                Episode {
                    id: "ep-producers".to_string(),
                    course_id: "kafka".to_string(),
                    title: "Producers".to_string(),
                    order: 1,
                    segments: vec![
                        segment("s1", 1, 200, &["kafka-acks", "producers"]),
                        segment("s2", 2, 700, &["batching"]),
                        segment("s3", 3, 200, &["retries"]),
                        segment("s4", 4, 1200, &["kafka-acks"]),
                    ],
                    prerequisite: None,
                },
                Episode {
                    id: "ep-brokers".to_string(),
                    course_id: "kafka".to_string(),
                    title: "Brokers".to_string(),
                    order: 2,
                    segments: vec![segment("b1", 1, 100, &["brokers"])],
                    prerequisite: Some(Prerequisite {
                        skip_if_proficient: true,
                        concepts: vec!["producers".to_string()],
                    }),
                },
            ],
        }],
    }
}

pub fn interaction(segment_id: &str, success: bool, duration: f64) -> Interaction {
    Interaction {
        segment_id: segment_id.to_string(),
        timestamp: Some(fixed_now()),
        data: json!({ "success": success, "duration": duration, "audio_replays": 1 }),
    }
}

/// Learner who keeps failing "retries" and passes everything on s1.
pub fn struggling_learner() -> LearnerRecord {
    let mut interactions = Vec::new();
    for _ in 0..3 {
        interactions.push(interaction("s1", true, 100.0));
        interactions.push(interaction("s3", false, 140.0));
    }
    LearnerRecord {
        id: "learner-a".to_string(),
        interactions,
        events: vec![TelemetryEvent {
            event_type: "session_end".to_string(),
            timestamp: Some(fixed_now()),
            data: json!({ "duration": 1500 }),
        }],
        progress: [("kafka".to_string(), vec!["s2".to_string()])].into_iter().collect(),
        concepts: Vec::new(),
    }
}

pub fn engine_with(learners: Vec<LearnerRecord>, jitter: Arc<dyn Jitter>) -> AdaptiveEngine {
    AdaptiveEngine::with_jitter(
        AdaptiveConfig::default(),
        Arc::new(InMemoryLearnerData::new(learners)),
        Arc::new(InMemoryCatalog::new(vec![kafka_course()])),
        Arc::new(InMemoryMasteryStore::new()),
        jitter,
    )
}

pub fn engine() -> AdaptiveEngine {
    engine_with(vec![struggling_learner()], Arc::new(FixedJitter(1.0)))
}
