//! Loading replay datasets from disk and driving the engine from them.

mod common;

use std::sync::Arc;

use chrono::Duration;
use serde_json::json;

use adaptive_learning::adaptive::config::AdaptiveConfig;
use adaptive_learning::adaptive::memory::FixedJitter;
use adaptive_learning::adaptive::sources::{Dataset, DatasetError};
use adaptive_learning::adaptive::types::LearningStyle;
use adaptive_learning::AdaptiveEngine;

use common::fixed_now;

fn dataset_json() -> serde_json::Value {
    json!({
        "learners": [{
            "id": "learner-b",
            "interactions": [
                { "segment_id": "s1", "data": "{\"success\": true, \"duration\": 90, \"visual_time\": 50, \"text_time\": 10}" },
                { "segment_id": "s1", "data": { "success": true, "duration": 110, "visual_time": 40, "text_time": 5 } }
            ],
            "events": [],
            "progress": { "kafka": ["s1"] },
            "concepts": [{
                "concept": "kafka-acks",
                "exposure_count": 2,
                "success_rate": 0.5,
                "last_reviewed": "2024-08-20T10:00:00Z",
                "next_review": "2024-08-26T10:00:00Z",
                "stability": 2.1,
                "difficulty": 1.4
            }]
        }],
        "courses": [{
            "id": "kafka",
            "title": "Kafka",
            "lessons": [{
                "id": "lesson-1",
                "order": 1,
                "episodes": [{
                    "id": "ep-producers",
                    "order": 1,
                    "segments": [
                        { "id": "s2", "order": 2, "text_content": "batching", "keywords": ["batching"] },
                        { "id": "s1", "order": 1, "text_content": "acks", "keywords": ["kafka-acks"] }
                    ]
                }]
            }]
        }]
    })
}

#[test]
fn loads_dataset_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("replay.json");
    std::fs::write(&path, dataset_json().to_string()).expect("write dataset");

    let dataset = Dataset::from_path(&path).expect("dataset parses");
    assert_eq!(dataset.learners.len(), 1);
    assert_eq!(dataset.courses.len(), 1);
    assert_eq!(dataset.learners[0].concepts[0].exposure_count, 2);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = Dataset::from_path(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, DatasetError::Io(_)));
}

#[test]
fn malformed_file_is_json_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ \"learners\": [").expect("write dataset");
    assert!(matches!(Dataset::from_path(&path), Err(DatasetError::Json(_))));
}

#[test]
fn engine_from_dataset_uses_seeded_state() {
    let dataset = Dataset::from_json(&dataset_json().to_string()).expect("dataset parses");
    let engine = AdaptiveEngine::from_dataset(
        AdaptiveConfig::default(),
        dataset,
        Arc::new(FixedJitter(1.0)),
    );

    let profile = engine.build_profile("learner-b");
    assert_eq!(profile.learning_style, LearningStyle::Visual);
    assert!((profile.average_segment_time - 100.0).abs() < 1e-9);
    assert!((profile.success_rate - 1.0).abs() < 1e-9);

    let next = engine
        .recommend_for_episode("learner-b", "ep-producers")
        .expect("episode exists");
    assert_eq!(next.map(|s| s.id), Some("s2".to_string()));

    let due = engine.due_concepts_at("learner-b", fixed_now());
    assert_eq!(due.len(), 1);
    assert!((due[0].difficulty - 1.4).abs() < 1e-9);

    // third exposure grows from the seeded six-day interval
    let out = engine.record_concept_review_at("kafka-acks", "learner-b", 1.0, fixed_now());
    assert_eq!(out.previous_interval_days, 6);
    assert_eq!(out.mastery.exposure_count, 3);
    assert_eq!(
        out.mastery.next_review - out.mastery.last_reviewed,
        Duration::days(out.interval_days)
    );
    // ease = 2.1 + 0.1
    assert_eq!(out.interval_days, 13);
}
