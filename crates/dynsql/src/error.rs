//! Error types for dynsql

use thiserror::Error;

/// Result type alias for dynsql operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Errors raised while assembling or configuring a statement.
///
/// Rendering itself never returns an error: once a statement passes
/// [`Statement::validate`](crate::Statement::validate) the render pass is a pure
/// tree walk.
#[derive(Debug, Error)]
pub enum SqlError {
    /// Empty or malformed table, column, or alias name
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Statement tree that cannot be rendered
    #[error("Invalid statement: {0}")]
    InvalidStatement(String),

    /// Render configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SqlError {
    /// Create an identifier error
    pub fn identifier(message: impl Into<String>) -> Self {
        Self::InvalidIdentifier(message.into())
    }

    /// Create a statement error
    pub fn statement(message: impl Into<String>) -> Self {
        Self::InvalidStatement(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is an identifier error
    pub fn is_identifier(&self) -> bool {
        matches!(self, Self::InvalidIdentifier(_))
    }

    /// Check if this is a statement error
    pub fn is_statement(&self) -> bool {
        matches!(self, Self::InvalidStatement(_))
    }

    /// Check if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<toml::de::Error> for SqlError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
