use std::collections::BTreeSet;

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningStyle {
    #[default]
    Visual,
    Auditory,
    Kinesthetic,
    Reading,
}

impl LearningStyle {
    /// Tie-break order for style detection: the first style with the highest
    /// tally wins.
    pub const ALL: [LearningStyle; 4] = [
        Self::Visual,
        Self::Auditory,
        Self::Kinesthetic,
        Self::Reading,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visual => "visual",
            Self::Auditory => "auditory",
            Self::Kinesthetic => "kinesthetic",
            Self::Reading => "reading",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl DifficultyTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "advanced" => Self::Advanced,
            "intermediate" => Self::Intermediate,
            _ => Self::Beginner,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Beginner => 0,
            Self::Intermediate => 1,
            Self::Advanced => 2,
        }
    }

    pub fn is_above(&self, other: DifficultyTier) -> bool {
        self.rank() > other.rank()
    }

    pub fn is_below(&self, other: DifficultyTier) -> bool {
        self.rank() < other.rank()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    #[default]
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 4] = [Self::Morning, Self::Afternoon, Self::Evening, Self::Night];

    /// Morning 06–12, afternoon 12–17, evening 17–21, night wraps 21–06.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => Self::Morning,
            12..=16 => Self::Afternoon,
            17..=20 => Self::Evening,
            _ => Self::Night,
        }
    }

    pub fn of(ts: &DateTime<Utc>) -> Self {
        Self::from_hour(ts.hour())
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Morning => 0,
            Self::Afternoon => 1,
            Self::Evening => 2,
            Self::Night => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningProfile {
    pub learner_id: String,
    pub learning_style: LearningStyle,
    /// Seconds.
    pub average_segment_time: f64,
    pub success_rate: f64,
    pub preferred_difficulty: DifficultyTier,
    pub strengths: BTreeSet<String>,
    pub weaknesses: BTreeSet<String>,
    /// Minutes.
    pub optimal_session_length: u32,
    pub best_time_of_day: TimeOfDay,
}

impl LearningProfile {
    pub fn is_weak_in(&self, concept: &str) -> bool {
        self.weaknesses.contains(concept)
    }

    pub fn is_strong_in(&self, concept: &str) -> bool {
        self.strengths.contains(concept)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptMastery {
    pub concept: String,
    pub exposure_count: u32,
    pub success_rate: f64,
    pub last_reviewed: DateTime<Utc>,
    pub next_review: DateTime<Utc>,
    pub stability: f64,
    pub difficulty: f64,
}

impl ConceptMastery {
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }

    /// Whole days between the scheduled review and the review before it.
    pub fn scheduled_interval_days(&self) -> i64 {
        (self.next_review - self.last_reviewed).num_days()
    }

    /// Whole days past the scheduled review, zero when not overdue.
    pub fn days_overdue(&self, now: DateTime<Utc>) -> i64 {
        (now - self.next_review).num_days().max(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    #[serde(default)]
    pub episode_id: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub segment_type: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub text_content: String,
    /// Seconds.
    #[serde(default)]
    pub estimated_duration: Option<u32>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Segment {
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    /// Length/keyword-density heuristic: >1000 chars or >10 keywords is
    /// advanced, >500 chars or >5 keywords intermediate.
    pub fn estimated_tier(&self) -> DifficultyTier {
        let text_length = self.text_content.chars().count();
        let keyword_count = self.keywords.len();

        if text_length > 1000 || keyword_count > 10 {
            DifficultyTier::Advanced
        } else if text_length > 500 || keyword_count > 5 {
            DifficultyTier::Intermediate
        } else {
            DifficultyTier::Beginner
        }
    }

    pub fn preview(&self, max_chars: usize) -> String {
        let head: String = self.text_content.chars().take(max_chars).collect();
        format!("{head}...")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prerequisite {
    #[serde(default)]
    pub skip_if_proficient: bool,
    #[serde(default)]
    pub concepts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    #[serde(default)]
    pub course_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub prerequisite: Option<Prerequisite>,
}

impl Episode {
    pub fn first_segment(&self) -> Option<&Segment> {
        self.segments.iter().min_by_key(|s| s.order)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

/// One recorded interaction with a segment. `data` is kept raw and read
/// through [`Telemetry::from_value`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub segment_id: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Interaction {
    pub fn telemetry(&self) -> Telemetry {
        Telemetry::from_value(&self.data)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub event_type: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl TelemetryEvent {
    pub fn field_f64(&self, key: &str) -> Option<f64> {
        object_of(&self.data).and_then(|obj| obj.get(key).and_then(number_of))
    }

    /// Success flag as 0/1; `None` when the event carries no readable flag.
    pub fn success(&self) -> Option<f64> {
        object_of(&self.data).and_then(|obj| obj.get("success").and_then(flag_of))
    }
}

/// Interaction payload with every field optional. Unreadable fields are
/// absent, never an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Telemetry {
    pub visual_time: Option<f64>,
    pub text_time: Option<f64>,
    pub audio_replays: Option<f64>,
    pub interactions_completed: Option<f64>,
    pub duration: Option<f64>,
    pub success: Option<bool>,
}

impl Telemetry {
    pub fn from_value(value: &serde_json::Value) -> Self {
        let Some(obj) = object_of(value) else {
            return Self::default();
        };
        Self {
            visual_time: obj.get("visual_time").and_then(number_of),
            text_time: obj.get("text_time").and_then(number_of),
            audio_replays: obj.get("audio_replays").and_then(number_of),
            interactions_completed: obj.get("interactions_completed").and_then(number_of),
            duration: obj.get("duration").and_then(number_of),
            success: obj.get("success").and_then(flag_of).map(|v| v > 0.0),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.success.unwrap_or(false)
    }
}

fn object_of(value: &serde_json::Value) -> Option<serde_json::Map<String, serde_json::Value>> {
    match value {
        serde_json::Value::Object(obj) => Some(obj.clone()),
        // Payloads stored as JSON text.
        serde_json::Value::String(raw) => match serde_json::from_str(raw) {
            Ok(serde_json::Value::Object(obj)) => Some(obj),
            _ => None,
        },
        _ => None,
    }
}

fn number_of(value: &serde_json::Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

fn flag_of(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        serde_json::Value::Number(_) => number_of(value).map(|v| if v != 0.0 { 1.0 } else { 0.0 }),
        _ => None,
    }
}
