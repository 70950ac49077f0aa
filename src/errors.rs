use thiserror::Error;

/// Errors that can cross the engine boundary.
///
/// Budget exhaustion and "not in an argument-bearing context" are *not*
/// errors: both are reported through the returned output string (overflow
/// notice, empty string), matching the engine's contract.
#[derive(Debug, Error)]
pub enum Error {
    /// Template front-end syntax error.
    #[error("parse error: {0}")]
    Parse(String),

    /// Dispatch on a loop function that is unknown or disabled by config.
    #[error("unknown or disabled loop function: {0}")]
    UnknownFunction(String),

    /// A host fragment failed to expand. Propagated unchanged; bindings
    /// already written to the variable store stand.
    #[error("fragment expansion failed: {0}")]
    Expand(#[from] Box<dyn std::error::Error>),
}

pub type Result<T> = std::result::Result<T, Error>;
