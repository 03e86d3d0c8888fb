pub mod adaptive;
pub mod config;
pub mod logging;

pub use adaptive::{AdaptiveEngine, EngineError};
