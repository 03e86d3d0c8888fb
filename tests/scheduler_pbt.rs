//! Property-Based Tests for review scheduling and session planning
//!
//! Tests the following invariants:
//! - Stability stays within [1.3, 2.5] after any review
//! - Exposure count grows by exactly one per review
//! - Success rate stays within [0, 1]
//! - Next review is at least one day after the review
//! - A failed review resets to one day and never raises stability
//! - Planned sessions never exceed the minute budget

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use adaptive_learning::adaptive::config::SchedulerParams;
use adaptive_learning::adaptive::decision::ReviewPlanner;
use adaptive_learning::adaptive::memory::{next_review_state, Jitter, SeededJitter};
use adaptive_learning::adaptive::modeling::LearnerProfiler;
use adaptive_learning::adaptive::types::{ConceptMastery, DifficultyTier};

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn arb_f64_0_1() -> impl Strategy<Value = f64> {
    (0u64..=1000u64).prop_map(|v| v as f64 / 1000.0)
}

fn arb_mastery() -> impl Strategy<Value = ConceptMastery> {
    (
        0u32..50,                   // exposure_count
        arb_f64_0_1(),              // success_rate
        0i64..400,                  // scheduled interval
        (130u64..=250u64),          // stability * 100
        (100u64..=300u64),          // difficulty * 100
        0i64..30,                   // days since last review
    )
        .prop_map(
            |(exposure_count, success_rate, interval, stability, difficulty, age)| {
                let last_reviewed = base_time() - Duration::days(age);
                ConceptMastery {
                    concept: "kafka-acks".to_string(),
                    exposure_count,
                    success_rate,
                    last_reviewed,
                    next_review: last_reviewed + Duration::days(interval),
                    stability: stability as f64 / 100.0,
                    difficulty: difficulty as f64 / 100.0,
                }
            },
        )
}

fn arb_tier() -> impl Strategy<Value = DifficultyTier> {
    prop_oneof![
        Just(DifficultyTier::Beginner),
        Just(DifficultyTier::Intermediate),
        Just(DifficultyTier::Advanced),
    ]
}

// ============================================================================
// Scheduling properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn review_keeps_state_in_bounds(
        prev in arb_mastery(),
        performance in arb_f64_0_1(),
        seed in any::<u64>(),
    ) {
        let params = SchedulerParams::default();
        let jitter = SeededJitter::new(seed);
        let now = base_time();
        let out = next_review_state(&prev, performance, now, &jitter, &params);

        prop_assert!(out.mastery.stability >= 1.3 - 1e-12);
        prop_assert!(out.mastery.stability <= 2.5 + 1e-12);
        prop_assert_eq!(out.mastery.exposure_count, prev.exposure_count + 1);
        prop_assert!((0.0..=1.0).contains(&out.mastery.success_rate));
        prop_assert_eq!(out.mastery.last_reviewed, now);
        prop_assert!(out.mastery.next_review - out.mastery.last_reviewed >= Duration::days(1));
        prop_assert!((out.mastery.difficulty - prev.difficulty).abs() < 1e-12);
    }

    #[test]
    fn failed_review_resets_interval(
        prev in arb_mastery(),
        performance in (0u64..600u64).prop_map(|v| v as f64 / 1000.0),
    ) {
        let params = SchedulerParams::default();
        let out = next_review_state(&prev, performance, base_time(), &SeededJitter::new(1), &params);

        prop_assert!(!out.passed);
        prop_assert_eq!(out.interval_days, 1);
        prop_assert!(out.mastery.stability <= prev.stability + 1e-12);
        prop_assert!(out.ease.is_none());
    }

    #[test]
    fn growth_interval_tracks_previous_interval(
        prev in arb_mastery().prop_filter("growth branch", |m| m.exposure_count >= 2),
        performance in (600u64..=1000u64).prop_map(|v| v as f64 / 1000.0),
        seed in any::<u64>(),
    ) {
        let params = SchedulerParams::default();
        let out = next_review_state(&prev, performance, base_time(), &SeededJitter::new(seed), &params);
        let ease = out.ease.expect("pass branch");
        let base = prev.scheduled_interval_days() as f64 * ease;

        prop_assert_eq!(out.previous_interval_days, prev.scheduled_interval_days());
        prop_assert!(out.interval_days >= ((base * 0.9).floor() as i64).max(1));
        prop_assert!(out.interval_days <= ((base * 1.1).floor() as i64).max(1));
    }

    #[test]
    fn seeded_jitter_stays_in_range(seed in any::<u64>()) {
        let jitter = SeededJitter::new(seed);
        for _ in 0..32 {
            let f = jitter.factor(0.9, 1.1);
            prop_assert!((0.9..1.1).contains(&f));
        }
    }
}

// ============================================================================
// Planning properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn plan_respects_budget(
        due in prop::collection::vec(arb_mastery(), 0..30),
        budget in 0u32..120,
        tier in arb_tier(),
    ) {
        let mut profile = LearnerProfiler::default().default_profile("u1");
        profile.preferred_difficulty = tier;
        let plan = ReviewPlanner::default().plan(&due, &profile, budget, base_time());

        prop_assert!(plan.total_time <= budget);
        prop_assert_eq!(plan.selected.len() + plan.deferred_count, due.len());
        let summed: u32 = plan.selected.iter().map(|p| p.time_needed).sum();
        prop_assert_eq!(summed, plan.total_time);
        for pair in plan.selected.windows(2) {
            prop_assert!(pair[0].priority >= pair[1].priority);
        }
    }
}
