//! Error types for the onchain agent.

pub mod unified;

pub use unified::ErrorCategory;

use thiserror::Error;

/// Primary error type for all agent operations.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Tool execution error: {tool_name} — {message}")]
    ToolExecution { tool_name: String, message: String },

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Run {run_id} still pending after {attempts} polls")]
    PollLimitExceeded { run_id: String, attempts: u32 },

    #[error("Run {run_id} requested tools for more than {rounds} rounds")]
    ToolRoundLimitExceeded { run_id: String, rounds: u32 },

    #[error("Operation canceled")]
    Canceled,

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl AgentError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::Network(_) | Self::Rpc { .. } => ErrorCategory::Network,
            Self::PollLimitExceeded { .. } | Self::ToolRoundLimitExceeded { .. } => {
                ErrorCategory::Timeout
            }
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                429 => ErrorCategory::RateLimit,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
            Self::ToolExecution { .. } | Self::InvalidArgument(_) => ErrorCategory::ToolExecution,
            Self::Canceled => ErrorCategory::Canceled,
            _ => ErrorCategory::Unknown,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_status_maps_to_category() {
        assert_eq!(AgentError::api(401, "nope").category(), ErrorCategory::Authentication);
        assert_eq!(AgentError::api(429, "slow down").category(), ErrorCategory::RateLimit);
        assert_eq!(AgentError::api(503, "down").category(), ErrorCategory::Server);
        assert_eq!(AgentError::api(400, "bad").category(), ErrorCategory::Api);
    }

    #[test]
    fn limits_are_timeouts() {
        let err = AgentError::PollLimitExceeded {
            run_id: "run_1".into(),
            attempts: 3,
        };
        assert_eq!(err.category(), ErrorCategory::Timeout);
        assert_eq!(err.to_string(), "Run run_1 still pending after 3 polls");
    }
}
