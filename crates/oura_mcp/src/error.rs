//! Error type for tool implementations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum McpError {
    #[error("API error: {0}")]
    Api(#[from] oura_client::OuraError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<McpError> for String {
    fn from(err: McpError) -> Self {
        err.to_string()
    }
}

/// Result type alias for MCP operations.
pub type McpResult<T> = Result<T, McpError>;
