use thiserror::Error;

/// Errors surfaced while configuring or mounting the grid engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// `init` was called on an engine that is already mounted.
    #[error("grid engine is already initialized")]
    AlreadyInitialized,
    /// Configuration values that cannot be used (e.g., non-positive cell pitch).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A DOM call failed while building the drawing surface.
    #[error("dom error: {0}")]
    Dom(String),
}
