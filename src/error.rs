use thiserror::Error;

/// Side of the bipartite problem an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Subject,
    Candidate,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Subject => write!(f, "subject"),
            Side::Candidate => write!(f, "candidate"),
        }
    }
}

/// Errors raised by the matching engine
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("no data: {side} list is empty")]
    EmptyInput { side: Side },

    #[error("invalid {side} record at index {index}: {reason}")]
    InvalidRecord { side: Side, index: usize, reason: String },

    #[error("{side} index {index} out of range (len {len})")]
    IndexOutOfRange { side: Side, index: usize, len: usize },

    #[error("optimal assignment needs a square matrix, got {rows}x{cols}; truncate both sides to the smaller size first")]
    NonSquareMatrix { rows: usize, cols: usize },

    #[error("invalid weights: {0}")]
    InvalidWeights(String),

    #[error("no data: {label} sample is empty")]
    EmptySample { label: &'static str },

    #[error("{label} sample has a non-finite value at index {index}")]
    NonFiniteSample { label: &'static str, index: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MatchError {
    /// Whether the error was caused by caller input rather than the environment
    pub fn is_input_error(&self) -> bool {
        !matches!(self, MatchError::Io(_) | MatchError::Json(_))
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;
