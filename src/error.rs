use thiserror::Error;

/// Reasons a draw cannot be started. Both are recoverable: add candidates
/// (or lower the winner count) and call `start` again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("not enough candidates: {requested} winner(s) requested but only {available} in the pool")]
    InsufficientCandidates { requested: usize, available: usize },

    #[error("no available candidates: everyone in the pool has already won this round")]
    NoAvailableCandidates,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}
