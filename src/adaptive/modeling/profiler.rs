//! Learner profiler - infers a [`LearningProfile`] from raw interaction
//! history and telemetry events.
//!
//! The profile is recomputed from scratch on every call; nothing is cached.

use std::collections::{BTreeMap, BTreeSet};

use crate::adaptive::config::ProfilerParams;
use crate::adaptive::sources::ContentCatalog;
use crate::adaptive::types::{
    DifficultyTier, Interaction, LearningProfile, LearningStyle, TelemetryEvent, TimeOfDay,
};

const SESSION_END: &str = "session_end";
const INTERACTION_COMPLETED: &str = "interaction_completed";

#[derive(Debug, Clone, Default)]
pub struct LearnerProfiler {
    params: ProfilerParams,
}

#[derive(Debug, Default, Clone, Copy)]
struct KeywordTally {
    success: u32,
    total: u32,
}

impl LearnerProfiler {
    pub fn new(params: ProfilerParams) -> Self {
        Self { params }
    }

    pub fn default_profile(&self, learner_id: &str) -> LearningProfile {
        LearningProfile {
            learner_id: learner_id.to_string(),
            learning_style: LearningStyle::Visual,
            average_segment_time: self.params.default_segment_time,
            success_rate: self.params.default_success_rate,
            preferred_difficulty: DifficultyTier::Beginner,
            strengths: BTreeSet::new(),
            weaknesses: BTreeSet::new(),
            optimal_session_length: self.params.default_session_minutes,
            best_time_of_day: TimeOfDay::Afternoon,
        }
    }

    pub fn build_profile(
        &self,
        learner_id: &str,
        history: &[Interaction],
        events: &[TelemetryEvent],
        catalog: &dyn ContentCatalog,
    ) -> LearningProfile {
        if history.is_empty() {
            tracing::debug!(learner_id, "no interaction history, using cold-start profile");
            return self.default_profile(learner_id);
        }

        let success_rate = self.success_rate(history);
        let (strengths, weaknesses) = self.strengths_and_weaknesses(history, catalog);

        let profile = LearningProfile {
            learner_id: learner_id.to_string(),
            learning_style: self.detect_learning_style(history),
            average_segment_time: self.average_segment_time(history),
            success_rate,
            preferred_difficulty: self.preferred_difficulty(success_rate),
            strengths,
            weaknesses,
            optimal_session_length: self.optimal_session_length(events),
            best_time_of_day: self.best_time_of_day(events),
        };

        tracing::debug!(
            learner_id,
            interactions = history.len(),
            style = profile.learning_style.as_str(),
            difficulty = profile.preferred_difficulty.as_str(),
            success_rate = profile.success_rate,
            "learning profile built"
        );

        profile
    }

    pub fn detect_learning_style(&self, history: &[Interaction]) -> LearningStyle {
        let mut tally = [0_u32; 4];

        for interaction in history {
            let t = interaction.telemetry();
            if t.visual_time.unwrap_or(0.0) > t.text_time.unwrap_or(0.0) {
                tally[0] += 1;
            }
            if t.audio_replays.unwrap_or(0.0) > 0.0 {
                tally[1] += 1;
            }
            if t.interactions_completed.unwrap_or(0.0) > self.params.kinesthetic_min_interactions {
                tally[2] += 1;
            }
            // No reading signal is recorded.
        }

        let mut best = LearningStyle::ALL[0];
        let mut best_score = tally[0];
        for (style, score) in LearningStyle::ALL.iter().zip(tally.iter()).skip(1) {
            if *score > best_score {
                best = *style;
                best_score = *score;
            }
        }
        best
    }

    pub fn average_segment_time(&self, history: &[Interaction]) -> f64 {
        let durations: Vec<f64> = history
            .iter()
            .filter_map(|i| i.telemetry().duration)
            .collect();

        if durations.is_empty() {
            return self.params.default_segment_time;
        }
        durations.iter().sum::<f64>() / durations.len() as f64
    }

    pub fn success_rate(&self, history: &[Interaction]) -> f64 {
        if history.is_empty() {
            return self.params.default_success_rate;
        }
        let successes = history.iter().filter(|i| i.telemetry().succeeded()).count();
        successes as f64 / history.len() as f64
    }

    pub fn preferred_difficulty(&self, success_rate: f64) -> DifficultyTier {
        if success_rate > self.params.advanced_threshold {
            DifficultyTier::Advanced
        } else if success_rate > self.params.intermediate_threshold {
            DifficultyTier::Intermediate
        } else {
            DifficultyTier::Beginner
        }
    }

    pub fn strengths_and_weaknesses(
        &self,
        history: &[Interaction],
        catalog: &dyn ContentCatalog,
    ) -> (BTreeSet<String>, BTreeSet<String>) {
        let mut tallies: BTreeMap<String, KeywordTally> = BTreeMap::new();

        for interaction in history {
            let Some(segment) = catalog.segment(&interaction.segment_id) else {
                continue;
            };
            let succeeded = interaction.telemetry().succeeded();
            let keywords: BTreeSet<&String> = segment.keywords.iter().collect();
            for keyword in keywords {
                let entry = tallies.entry(keyword.clone()).or_default();
                entry.total += 1;
                if succeeded {
                    entry.success += 1;
                }
            }
        }

        let mut strengths = BTreeSet::new();
        let mut weaknesses = BTreeSet::new();

        for (keyword, tally) in tallies {
            if tally.total < self.params.min_keyword_samples {
                continue;
            }
            let rate = tally.success as f64 / tally.total as f64;
            if rate > self.params.strength_threshold {
                strengths.insert(keyword);
            } else if rate < self.params.weakness_threshold {
                weaknesses.insert(keyword);
            }
        }

        (strengths, weaknesses)
    }

    pub fn optimal_session_length(&self, events: &[TelemetryEvent]) -> u32 {
        let mut minutes: Vec<f64> = events
            .iter()
            .filter(|e| e.event_type == SESSION_END)
            .filter_map(|e| e.field_f64("duration"))
            .map(|seconds| seconds / 60.0)
            .collect();

        match percentile(&mut minutes, self.params.session_percentile) {
            Some(value) => value.max(0.0).floor() as u32,
            None => self.params.default_session_minutes,
        }
    }

    pub fn best_time_of_day(&self, events: &[TelemetryEvent]) -> TimeOfDay {
        let mut sums = [0.0_f64; 4];
        let mut counts = [0_u32; 4];

        for event in events {
            if event.event_type != INTERACTION_COMPLETED {
                continue;
            }
            let (Some(ts), Some(success)) = (event.timestamp, event.success()) else {
                continue;
            };
            let bucket = TimeOfDay::of(&ts).index();
            sums[bucket] += success;
            counts[bucket] += 1;
        }

        let mut best: Option<(TimeOfDay, f64)> = None;
        for period in TimeOfDay::ALL {
            let idx = period.index();
            if counts[idx] == 0 {
                continue;
            }
            let mean = sums[idx] / counts[idx] as f64;
            match best {
                Some((_, best_mean)) if mean <= best_mean => {}
                _ => best = Some((period, mean)),
            }
        }

        best.map(|(period, _)| period).unwrap_or(TimeOfDay::Afternoon)
    }
}

/// Linear interpolation between closest ranks; `q` in [0, 1].
fn percentile(values: &mut [f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let rank = q.clamp(0.0, 1.0) * (values.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    Some(values[lower] + (values[upper] - values[lower]) * weight)
}
