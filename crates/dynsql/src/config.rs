//! Render configuration.

use serde::Deserialize;

use crate::error::{SqlError, SqlResult};
use crate::render::strategy::{DEFAULT_KEY_PREFIX, RenderingStrategy, StrategyKind};
use crate::render::trace::LogLevel;

/// Settings for one or many render passes.
///
/// Can be built in code or loaded from TOML:
///
/// ```toml
/// strategy = "named"
/// parameter_key_prefix = "arg"
/// log_level = "trace"
/// max_logged_sql_length = 500
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Placeholder dialect.
    pub strategy: StrategyKind,
    /// Prefix of generated parameter-map keys.
    pub parameter_key_prefix: String,
    /// Level of the per-statement `tracing` event.
    pub log_level: LogLevel,
    /// Truncate logged SQL to this many bytes, backing off to a char
    /// boundary. `None` means no truncation.
    pub max_logged_sql_length: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            parameter_key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            log_level: LogLevel::default(),
            max_logged_sql_length: Some(200),
        }
    }
}

impl RenderConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> SqlResult<Self> {
        let config: RenderConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the placeholder dialect.
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the prefix of generated parameter keys.
    pub fn with_parameter_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.parameter_key_prefix = prefix.into();
        self
    }

    /// Set the log level of render events.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Set maximum logged SQL length.
    pub fn with_max_logged_sql_length(mut self, len: usize) -> Self {
        self.max_logged_sql_length = Some(len);
        self
    }

    /// Log SQL without truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_logged_sql_length = None;
        self
    }

    /// The strategy instance for the configured dialect.
    pub fn strategy(&self) -> &'static dyn RenderingStrategy {
        self.strategy.strategy()
    }

    /// Reject settings that would produce unusable parameter keys.
    pub fn validate(&self) -> SqlResult<()> {
        if self.parameter_key_prefix.is_empty() {
            return Err(SqlError::config("parameter_key_prefix cannot be empty"));
        }
        if !self
            .parameter_key_prefix
            .chars()
            .all(|c| c == '_' || c.is_ascii_alphanumeric())
        {
            return Err(SqlError::config(format!(
                "parameter_key_prefix must be alphanumeric, got '{}'",
                self.parameter_key_prefix
            )));
        }
        Ok(())
    }
}
