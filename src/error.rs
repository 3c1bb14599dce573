use std::fmt;

use thiserror::Error;

use crate::extraction::record::SchemaError;
use crate::openai::OpenAiError;

/// Failure taxonomy of one `extract` call.
///
/// Every variant past the preconditions names the 1-based attempt on which
/// the pipeline stopped.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid job link provided")]
    InvalidJobLink,

    #[error("API key is required")]
    MissingApiKey,

    #[error("Retry bound must allow at least one attempt")]
    NoAttemptsAllowed,

    #[error("Failed on attempt {attempt}: {source}")]
    Transport {
        attempt: u32,
        #[source]
        source: OpenAiError,
    },

    #[error("Failed on attempt {attempt}: invalid response from completions API: {reason}")]
    UpstreamShape { attempt: u32, reason: String },

    #[error("Failed on attempt {attempt}: upstream returned non-JSON content: {source}")]
    Parse {
        attempt: u32,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed on attempt {attempt}: invalid response format: {source}")]
    Schema {
        attempt: u32,
        #[source]
        source: SchemaError,
    },

    #[error("Failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: OpenAiError,
    },
}

impl ExtractError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ExtractError::InvalidJobLink
            | ExtractError::MissingApiKey
            | ExtractError::NoAttemptsAllowed => FailureKind::Precondition,
            ExtractError::Transport { .. } => FailureKind::Transport,
            ExtractError::UpstreamShape { .. } => FailureKind::UpstreamShape,
            ExtractError::Parse { .. } => FailureKind::Parse,
            ExtractError::Schema { .. } => FailureKind::Schema,
            ExtractError::RetriesExhausted { .. } => FailureKind::RetriesExhausted,
        }
    }

    /// Attempts issued before the pipeline stopped (zero for preconditions).
    pub fn attempts(&self) -> u32 {
        match self {
            ExtractError::InvalidJobLink
            | ExtractError::MissingApiKey
            | ExtractError::NoAttemptsAllowed => 0,
            ExtractError::Transport { attempt, .. }
            | ExtractError::UpstreamShape { attempt, .. }
            | ExtractError::Parse { attempt, .. }
            | ExtractError::Schema { attempt, .. } => *attempt,
            ExtractError::RetriesExhausted { attempts, .. } => *attempts,
        }
    }
}

/// Classifies a failure for retry decisions and for callers.
///
/// Only `RateLimit` is retryable; it never reaches the caller directly and
/// surfaces as `RetriesExhausted` once the bound is hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Precondition,
    Transport,
    RateLimit,
    UpstreamShape,
    Parse,
    Schema,
    RetriesExhausted,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Precondition => "precondition",
            FailureKind::Transport => "transport",
            FailureKind::RateLimit => "rate-limit",
            FailureKind::UpstreamShape => "upstream-shape",
            FailureKind::Parse => "parse",
            FailureKind::Schema => "schema-validation",
            FailureKind::RetriesExhausted => "retries-exhausted",
        };
        f.write_str(name)
    }
}
