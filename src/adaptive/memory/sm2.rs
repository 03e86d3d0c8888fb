//! Modified SM-2 review scheduling.
//!
//! Stability doubles as the ease baseline and stays in [1.3, 2.5]:
//! ease = S + (0.1 - (5 - 5p) × (0.08 + (5 - 5p) × 0.02))
//!
//! Interval ladder:
//! - fail (p < 0.6): 1 day, S × 0.6
//! - 1st exposure: 1 day
//! - 2nd exposure: 6 days
//! - later: previous interval × ease × jitter, jitter ∈ [0.9, 1.1)
//!
//! Every interval lands in [1, 36500] days.
//!
//! The update reads the previous state and returns a new one, so the previous
//! interval is always taken from the unmodified prior record.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::adaptive::config::SchedulerParams;
use crate::adaptive::types::ConceptMastery;

/// Source of the interval jitter multiplier.
pub trait Jitter: Send + Sync {
    fn factor(&self, min: f64, max: f64) -> f64;
}

/// Thread-local RNG, uniform in `[min, max)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformJitter;

impl Jitter for UniformJitter {
    fn factor(&self, min: f64, max: f64) -> f64 {
        if min >= max {
            return min;
        }
        rand::rng().random_range(min..max)
    }
}

/// Reproducible jitter for replays and tests.
pub struct SeededJitter {
    rng: Mutex<StdRng>,
}

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Jitter for SeededJitter {
    fn factor(&self, min: f64, max: f64) -> f64 {
        if min >= max {
            return min;
        }
        self.rng.lock().random_range(min..max)
    }
}

/// Constant multiplier for tests and deterministic replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub f64);

impl Jitter for FixedJitter {
    fn factor(&self, _min: f64, _max: f64) -> f64 {
        self.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub mastery: ConceptMastery,
    pub interval_days: i64,
    pub previous_interval_days: i64,
    pub passed: bool,
    /// Ease used for the pass branch; `None` on failure.
    pub ease: Option<f64>,
}

pub fn new_mastery(concept: &str, difficulty: f64, now: DateTime<Utc>, params: &SchedulerParams) -> ConceptMastery {
    ConceptMastery {
        concept: concept.to_string(),
        exposure_count: 0,
        success_rate: 0.0,
        last_reviewed: now,
        next_review: now,
        stability: params
            .initial_stability
            .clamp(params.min_stability, params.max_stability),
        difficulty: sanitize_difficulty(difficulty),
    }
}

pub fn sanitize_difficulty(difficulty: f64) -> f64 {
    if difficulty.is_finite() {
        difficulty.max(1.0)
    } else {
        1.0
    }
}

pub fn ease_factor(stability: f64, performance: f64, params: &SchedulerParams) -> f64 {
    let q_gap = 5.0 - performance * 5.0;
    let ease = stability + (0.1 - q_gap * (0.08 + q_gap * 0.02));
    ease.clamp(params.min_stability, params.max_stability)
}

pub fn next_stability(stability: f64, performance: f64, params: &SchedulerParams) -> f64 {
    let updated = if performance < params.pass_threshold {
        stability * params.fail_stability_factor
    } else if performance >= params.mastery_threshold {
        stability * params.stability_growth
    } else {
        stability
    };
    updated.clamp(params.min_stability, params.max_stability)
}

/// Applies one review to `prev` and returns the new record. `performance`
/// must already be in [0, 1].
pub fn next_review_state(
    prev: &ConceptMastery,
    performance: f64,
    now: DateTime<Utc>,
    jitter: &dyn Jitter,
    params: &SchedulerParams,
) -> ReviewOutcome {
    let exposure_count = prev.exposure_count.saturating_add(1);
    let previous_interval_days = prev.scheduled_interval_days().max(0);
    let passed = performance >= params.pass_threshold;

    let (interval_days, ease) = if !passed {
        (params.first_interval_days, None)
    } else {
        let ease = ease_factor(prev.stability, performance, params);
        let interval = match exposure_count {
            1 => params.first_interval_days,
            2 => params.bootstrap_interval_days,
            _ => {
                let factor = if params.jitter_enabled {
                    jitter.factor(params.jitter_min, params.jitter_max)
                } else {
                    1.0
                };
                (previous_interval_days as f64 * ease * factor).floor() as i64
            }
        };
        (interval, Some(ease))
    };
    let interval_days = interval_days.clamp(1, params.max_interval_days.max(1));

    let mastery = ConceptMastery {
        concept: prev.concept.clone(),
        exposure_count,
        success_rate: (params.success_rate_alpha * performance
            + (1.0 - params.success_rate_alpha) * prev.success_rate)
            .clamp(0.0, 1.0),
        last_reviewed: now,
        next_review: now + Duration::days(interval_days),
        stability: next_stability(prev.stability, performance, params),
        difficulty: prev.difficulty,
    };

    ReviewOutcome {
        mastery,
        interval_days,
        previous_interval_days,
        passed,
        ease,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const EPSILON: f64 = 1e-9;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn reviewed(exposure: u32, interval_days: i64, stability: f64) -> ConceptMastery {
        let last = now() - Duration::days(interval_days);
        ConceptMastery {
            concept: "kafka-acks".into(),
            exposure_count: exposure,
            success_rate: 0.5,
            last_reviewed: last,
            next_review: last + Duration::days(interval_days),
            stability,
            difficulty: 1.0,
        }
    }

    #[test]
    fn test_first_review_is_one_day() {
        let params = SchedulerParams::default();
        let fresh = new_mastery("kafka-acks", 1.0, now(), &params);
        let out = next_review_state(&fresh, 0.8, now(), &FixedJitter(1.0), &params);
        assert_eq!(out.mastery.exposure_count, 1);
        assert_eq!(out.interval_days, 1);
        assert_eq!(out.mastery.next_review - out.mastery.last_reviewed, Duration::days(1));
    }

    #[test]
    fn test_second_review_is_fixed_six_days() {
        let params = SchedulerParams::default();
        let prev = reviewed(1, 1, 1.3);
        for jitter in [0.9, 1.0, 1.0999] {
            let out = next_review_state(&prev, 0.75, now(), &FixedJitter(jitter), &params);
            assert_eq!(out.interval_days, 6);
        }
    }

    #[test]
    fn test_growth_uses_previous_interval_and_ease() {
        let params = SchedulerParams::default();
        let prev = reviewed(2, 6, 2.0);
        let out = next_review_state(&prev, 1.0, now(), &FixedJitter(1.0), &params);
        // ease = 2.0 + 0.1 = 2.1; 6 * 2.1 = 12.6
        assert_eq!(out.previous_interval_days, 6);
        assert!((out.ease.unwrap() - 2.1).abs() < EPSILON);
        assert_eq!(out.interval_days, 12);
        assert!((out.mastery.stability - 2.2).abs() < EPSILON);
    }

    #[test]
    fn test_jitter_bounds_interval() {
        let params = SchedulerParams::default();
        let prev = reviewed(5, 20, 2.5);
        let low = next_review_state(&prev, 0.8, now(), &FixedJitter(0.9), &params);
        let high = next_review_state(&prev, 0.8, now(), &FixedJitter(1.0999), &params);
        let base = 20.0 * low.ease.unwrap();
        assert_eq!(low.interval_days, (base * 0.9).floor() as i64);
        assert_eq!(high.interval_days, (base * 1.0999).floor() as i64);
    }

    #[test]
    fn test_failure_resets_and_shrinks_stability() {
        let params = SchedulerParams::default();
        let prev = reviewed(6, 30, 2.5);
        let out = next_review_state(&prev, 0.3, now(), &FixedJitter(1.0), &params);
        assert!(!out.passed);
        assert_eq!(out.interval_days, 1);
        assert!((out.mastery.stability - 1.5).abs() < EPSILON);

        let floor = next_review_state(&reviewed(3, 6, 1.4), 0.3, now(), &FixedJitter(1.0), &params);
        assert!((floor.mastery.stability - 1.3).abs() < EPSILON);
    }

    #[test]
    fn test_mid_band_keeps_stability() {
        let params = SchedulerParams::default();
        let prev = reviewed(3, 6, 1.8);
        let out = next_review_state(&prev, 0.7, now(), &FixedJitter(1.0), &params);
        assert!((out.mastery.stability - 1.8).abs() < EPSILON);
    }

    #[test]
    fn test_short_interval_never_collapses_to_zero() {
        let params = SchedulerParams::default();
        let prev = reviewed(4, 1, 1.3);
        let out = next_review_state(&prev, 0.6, now(), &FixedJitter(0.9), &params);
        assert!(out.interval_days >= 1);
    }

    #[test]
    fn test_interval_capped() {
        let params = SchedulerParams::default();
        let prev = reviewed(40, 30_000, 2.5);
        let out = next_review_state(&prev, 0.8, now(), &FixedJitter(1.0), &params);
        assert_eq!(out.interval_days, params.max_interval_days);
    }

    #[test]
    fn test_success_rate_ema() {
        let params = SchedulerParams::default();
        let prev = reviewed(2, 6, 2.0);
        let out = next_review_state(&prev, 1.0, now(), &FixedJitter(1.0), &params);
        assert!((out.mastery.success_rate - 0.65).abs() < EPSILON);
    }

    #[test]
    fn test_ease_clamped() {
        let params = SchedulerParams::default();
        assert!((ease_factor(2.5, 1.0, &params) - 2.5).abs() < EPSILON);
        assert!((ease_factor(1.3, 0.6, &params) - 1.3).abs() < EPSILON);
    }

    #[test]
    fn test_seeded_jitter_is_reproducible_and_bounded() {
        let a = SeededJitter::new(7);
        let b = SeededJitter::new(7);
        for _ in 0..100 {
            let fa = a.factor(0.9, 1.1);
            assert_eq!(fa, b.factor(0.9, 1.1));
            assert!((0.9..1.1).contains(&fa));
        }
    }
}
