use serde::{Deserialize, Serialize};

use crate::adaptive::types::{DifficultyTier, LearningProfile, LearningStyle, Segment};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Adaptation {
    VisualEnhancement {
        priority: String,
        suggestions: Vec<String>,
    },
    AudioEnhancement {
        priority: String,
        suggestions: Vec<String>,
    },
    InteractiveEnhancement {
        priority: String,
        suggestions: Vec<String>,
    },
    DifficultyAdjustment {
        current: DifficultyTier,
        target: DifficultyTier,
        suggestions: Vec<String>,
    },
    Remediation {
        concepts: Vec<String>,
        suggestions: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalizedSegment {
    pub segment_id: String,
    pub original_content: String,
    pub adaptations: Vec<Adaptation>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn style_adaptation(style: LearningStyle) -> Option<Adaptation> {
    let priority = "high".to_string();
    match style {
        LearningStyle::Visual => Some(Adaptation::VisualEnhancement {
            priority,
            suggestions: owned(&[
                "Add more diagrams and charts",
                "Use color coding for key concepts",
                "Include mind maps",
            ]),
        }),
        LearningStyle::Auditory => Some(Adaptation::AudioEnhancement {
            priority,
            suggestions: owned(&[
                "Emphasize audio narration",
                "Add sound effects for key points",
                "Include verbal mnemonics",
            ]),
        }),
        LearningStyle::Kinesthetic => Some(Adaptation::InteractiveEnhancement {
            priority,
            suggestions: owned(&[
                "Add more interactive exercises",
                "Include hands-on simulations",
                "Provide practice opportunities",
            ]),
        }),
        LearningStyle::Reading => None,
    }
}

pub fn difficulty_suggestions(current: DifficultyTier, target: DifficultyTier) -> Vec<String> {
    if target == DifficultyTier::Beginner && current.is_above(target) {
        owned(&[
            "Break down complex concepts",
            "Add more examples",
            "Simplify language",
            "Add visual aids",
        ])
    } else if target == DifficultyTier::Advanced && current.is_below(target) {
        owned(&[
            "Add advanced concepts",
            "Include edge cases",
            "Increase pace",
            "Add challenging exercises",
        ])
    } else {
        Vec::new()
    }
}

/// Style, difficulty and remediation adaptations for one segment.
pub fn personalize_segment(segment: &Segment, profile: &LearningProfile) -> PersonalizedSegment {
    let mut adaptations = Vec::new();

    if let Some(style) = style_adaptation(profile.learning_style) {
        adaptations.push(style);
    }

    let current = segment.estimated_tier();
    if current != profile.preferred_difficulty {
        adaptations.push(Adaptation::DifficultyAdjustment {
            current,
            target: profile.preferred_difficulty,
            suggestions: difficulty_suggestions(current, profile.preferred_difficulty),
        });
    }

    let weak_concepts: Vec<String> = profile
        .weaknesses
        .iter()
        .filter(|w| segment.has_keyword(w))
        .cloned()
        .collect();
    if !weak_concepts.is_empty() {
        adaptations.push(Adaptation::Remediation {
            concepts: weak_concepts,
            suggestions: owned(&[
                "Add prerequisite review",
                "Include more examples",
                "Slow down pace",
            ]),
        });
    }

    PersonalizedSegment {
        segment_id: segment.id.clone(),
        original_content: segment.text_content.clone(),
        adaptations,
    }
}
