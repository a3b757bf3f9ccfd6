//! Statement-level entry points.

use crate::config::RenderConfig;
use crate::error::{SqlError, SqlResult};
use crate::render::strategy::RenderingStrategy;
use crate::render::trace::{self, RenderEvent};
use crate::render::{Render, RenderContext, RenderedStatement};

/// A complete statement: SELECT, INSERT, UPDATE or DELETE.
///
/// Rendering validates first and then runs one render pass with a fresh
/// sequence, so rendering the same statement twice yields identical output.
pub trait Statement: Render {
    /// Statement kind used in logs (`select`, `insert`, ...).
    fn kind(&self) -> &'static str;

    /// Error recorded while the statement was being built.
    fn build_error(&self) -> Option<&str> {
        None
    }

    /// Validate builder state before rendering.
    fn validate(&self) -> SqlResult<()> {
        match self.build_error() {
            Some(err) => Err(SqlError::statement(err)),
            None => Ok(()),
        }
    }

    /// Render with an explicit configuration.
    fn render_with(&self, config: &RenderConfig) -> SqlResult<RenderedStatement> {
        config.validate()?;
        render_pass(self, config.strategy(), config)
    }

    /// Render with `strategy` and otherwise default settings.
    fn render(&self, strategy: &dyn RenderingStrategy) -> SqlResult<RenderedStatement> {
        render_pass(self, strategy, &RenderConfig::default())
    }

    /// Debug helper: the SQL text under the default configuration.
    fn to_sql(&self) -> String {
        match self.render_with(&RenderConfig::default()) {
            Ok(rendered) => rendered.sql,
            Err(err) => format!("<invalid: {err}>"),
        }
    }
}

fn render_pass<S: Statement + ?Sized>(
    statement: &S,
    strategy: &dyn RenderingStrategy,
    config: &RenderConfig,
) -> SqlResult<RenderedStatement> {
    statement.validate()?;

    let mut ctx = RenderContext::with_key_prefix(strategy, &config.parameter_key_prefix);
    let rendered = RenderedStatement::from(statement.render_fragment(&mut ctx));

    trace::emit(
        config.log_level,
        config.max_logged_sql_length,
        &RenderEvent {
            statement: statement.kind(),
            strategy: strategy.name(),
            sql: &rendered.sql,
            param_count: rendered.parameters.len(),
        },
    );
    Ok(rendered)
}
