pub mod difficulty;
pub mod path;
pub mod personalize;
pub mod planner;
pub mod recommender;

pub use difficulty::{
    AdjustmentKind, AdjustmentRecommendation, AdjustmentResult, DifficultyAdjuster,
    DifficultyVerdict, PerformanceMetrics, PerformanceSample,
};
pub use path::{PathAdaptations, PathGenerator, PathStep};
pub use personalize::{personalize_segment, Adaptation, PersonalizedSegment};
pub use planner::{PlannedReview, ReviewItem, ReviewPlanner, ReviewSession, SegmentOption, SessionPlan};
pub use recommender::SegmentRecommender;
