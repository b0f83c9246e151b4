use thiserror::Error;

/// Construction-time validation failures.
///
/// Raised before any state is allocated; nothing is silently corrected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid node count {0}: n must be >= 1")]
    NodeCount(usize),

    #[error("invalid alpha {0}: alpha must be a float in [0, 1]")]
    Alpha(f64),

    #[error("invalid beta {0}: beta must be >= 0")]
    Beta(f64),

    #[error("invalid tau {0}: tau must be >= 1")]
    Tau(usize),

    #[error("invalid epsilon {0}: epsilon must be in (0, 0.5)")]
    Epsilon(f64),

    #[error("invalid memory window {0}: window must be >= 1")]
    Window(usize),

    #[error("invalid probability {name} = {value}: must be in [0, 1]")]
    Probability { name: &'static str, value: f64 },

    #[error("link probabilities sum to {0}: p_plus + p_minus must be <= 1")]
    ProbabilitySum(f64),

    #[error("state has length {got}, expected {expected}")]
    StateLength { expected: usize, got: usize },

    #[error("state entry {index} is {value}, expected 0 or 1")]
    StateValue { index: usize, value: u8 },

    #[error("connectivity has {got} cells, expected {expected}")]
    CellCount { expected: usize, got: usize },

    #[error("connectivity is {got}x{got}, expected {expected}x{expected}")]
    ConnectivityShape { expected: usize, got: usize },

    #[error("connectivity entry ({row}, {col}) is {value}, expected -1, 0 or 1")]
    ConnectivityValue { row: usize, col: usize, value: i8 },

    #[error("connectivity diagonal entry {index} is {value}, self-loops are not allowed")]
    SelfLoop { index: usize, value: i8 },

    #[error("sparse row {row} is malformed: columns must be strictly increasing below n and match the links")]
    SparseRow { row: usize },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("network run already completed; call reset() before running again")]
    RunCompleted,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid network image: {0}")]
    Image(String),

    #[cfg(feature = "serde")]
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
