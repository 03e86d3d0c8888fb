pub mod config;
pub mod decision;
pub mod engine;
pub mod memory;
pub mod modeling;
pub mod sources;
pub mod types;

pub use engine::{AdaptiveEngine, EngineError};
