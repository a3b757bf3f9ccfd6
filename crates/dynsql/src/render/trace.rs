//! `tracing` output for finished render passes.

use serde::{Deserialize, Serialize};

/// Level at which render events are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    #[default]
    Debug,
    Trace,
}

/// Cut `sql` to at most `max_bytes`, backing off to a char boundary.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

fn display_sql(sql: &str, max_len: Option<usize>) -> String {
    match max_len {
        Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
        _ => sql.to_string(),
    }
}

/// One event describing a rendered statement.
pub(crate) struct RenderEvent<'a> {
    pub statement: &'static str,
    pub strategy: &'static str,
    pub sql: &'a str,
    pub param_count: usize,
}

pub(crate) fn emit(level: LogLevel, max_sql_length: Option<usize>, event: &RenderEvent<'_>) {
    /// Dispatch a tracing event at a runtime-determined level.
    macro_rules! emit_at_level {
        ($level:expr, $($field:tt)*) => {
            match $level {
                LogLevel::Error => tracing::error!($($field)*),
                LogLevel::Warn  => tracing::warn!($($field)*),
                LogLevel::Info  => tracing::info!($($field)*),
                LogLevel::Debug => tracing::debug!($($field)*),
                LogLevel::Trace => tracing::trace!($($field)*),
            }
        };
    }

    let sql = display_sql(event.sql, max_sql_length);
    emit_at_level!(
        level,
        target: "dynsql.render",
        statement = event.statement,
        strategy = event.strategy,
        param_count = event.param_count,
        sql = %sql,
        "statement rendered"
    );
}
