//! Error types for the optimizer, the verifier and instance parsing.

use thiserror::Error;

/// Failures that stop an invocation before a result can be produced.
#[derive(Debug, Error)]
pub enum KnapsackError {
    #[error("Malformed instance")]
    MalformedInstance(#[from] MalformedInstance),

    #[error("Arithmetic overflow while accumulating values")]
    ArithmeticOverflow,

    #[error("Capacity {capacity} needs a table larger than the limit of {limit} cells")]
    CapacityTooLarge { capacity: u64, limit: usize },

    #[error("Failed to allocate a DP table of {cells} cells")]
    TableAllocation {
        cells: usize,
        #[source]
        source: std::collections::TryReserveError,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid JSON instance")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl KnapsackError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Why a textual instance could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedInstance {
    #[error("missing {expected}")]
    MissingToken { expected: String },

    #[error("invalid {expected}: {token:?}")]
    InvalidToken { token: String, expected: String },
}

/// Why the verifier refused a candidate. Exactly one reason is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("Weight limit exceeded: {0}")]
    WeightLimitExceeded(u64),

    #[error("Incorrect value")]
    ValueMismatch { claimed: u64, actual: u64 },

    #[error("Item index {index} out of range for {len} items")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Item index {0} selected more than once")]
    DuplicateIndex(usize),

    #[error("Arithmetic overflow while summing the candidate")]
    ArithmeticOverflow,
}

impl RejectReason {
    /// Stable snake_case tag used in JSON output.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::WeightLimitExceeded(_) => "weight_limit_exceeded",
            Self::ValueMismatch { .. } => "value_mismatch",
            Self::IndexOutOfRange { .. } => "index_out_of_range",
            Self::DuplicateIndex(_) => "duplicate_index",
            Self::ArithmeticOverflow => "arithmetic_overflow",
        }
    }
}

pub type Result<T> = std::result::Result<T, KnapsackError>;
