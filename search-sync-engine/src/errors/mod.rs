//! Error types for the search sync engine.

mod engine_error;

pub use engine_error::EngineError;
