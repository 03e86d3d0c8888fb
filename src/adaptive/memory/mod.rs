//! Concept mastery - spaced-repetition scheduling and keyed mastery state.
//!
//! Contains:
//! - SM-2 (modified) - pure previous-state-in, new-state-out review update
//! - MasteryStore - per-(learner, concept) record storage
//! - ConceptMasteryTracker - single-writer-per-key review entry point

pub mod sm2;
pub mod store;

mod tracker;

pub use sm2::{
    ease_factor, next_review_state, FixedJitter, Jitter, ReviewOutcome, SeededJitter,
    UniformJitter,
};
pub use store::{InMemoryMasteryStore, MasteryKey, MasteryStore};
pub use tracker::ConceptMasteryTracker;
