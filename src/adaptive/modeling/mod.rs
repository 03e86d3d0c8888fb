//! Learner modeling - behavioral profile inference from interaction history.

pub mod profiler;

pub use profiler::LearnerProfiler;
