//! The render pass.
//!
//! A render pass walks one statement tree and produces a single [`Fragment`].
//! All state of the pass lives in a [`RenderContext`] that is threaded by
//! `&mut` through every sub-renderer:
//!
//! - the [`Sequence`] that numbers parameter keys,
//! - the [`RenderingStrategy`] that formats placeholders,
//! - the qualified names already resolved during this pass.
//!
//! Nothing is global, so independent statements can be rendered concurrently
//! while sharing the same (immutable) table and column definitions.

pub mod fragment;
pub mod sequence;
pub mod strategy;
pub(crate) mod trace;


use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::column::SqlColumn;
use crate::table::{SqlTable, TableDefinition};
use crate::value::ParamValue;

pub use fragment::{Fragment, FragmentCollector, Parameters};
pub use sequence::Sequence;
pub use strategy::{
    DEFAULT_KEY_PREFIX, DEFAULT_PARAMETER_PREFIX, MyBatis3RenderingStrategy,
    NamedRenderingStrategy, PositionalRenderingStrategy, RenderingStrategy, StrategyKind,
};
pub use trace::LogLevel;

/// Mutable state of one render pass.
pub struct RenderContext<'a> {
    strategy: &'a dyn RenderingStrategy,
    key_prefix: &'a str,
    sequence: Sequence,
    qualify_columns: bool,
    /// Qualified names resolved in this pass, keyed by the shared table
    /// definition. Holding the `Arc` keeps the key address live for the pass.
    table_names: HashMap<usize, (Arc<TableDefinition>, String)>,
}

impl<'a> RenderContext<'a> {
    /// Start a pass with the default key prefix (`p`).
    pub fn new(strategy: &'a dyn RenderingStrategy) -> Self {
        Self::with_key_prefix(strategy, DEFAULT_KEY_PREFIX)
    }

    pub fn with_key_prefix(strategy: &'a dyn RenderingStrategy, key_prefix: &'a str) -> Self {
        Self {
            strategy,
            key_prefix,
            sequence: Sequence::new(),
            qualify_columns: false,
            table_names: HashMap::new(),
        }
    }

    pub fn strategy(&self) -> &'a dyn RenderingStrategy {
        self.strategy
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    /// Mint a fresh parameter-map key.
    pub fn next_map_key(&mut self) -> String {
        self.strategy
            .format_parameter_map_key(self.key_prefix, &mut self.sequence)
    }

    /// Bind `value` under a fresh key. The fragment text is the placeholder.
    pub fn bind(&mut self, value: impl Into<ParamValue>) -> Fragment {
        let key = self.next_map_key();
        let placeholder = self.strategy.placeholder(DEFAULT_PARAMETER_PREFIX, &key);
        Fragment::with_fragment(placeholder).with_parameter(key, value)
    }

    /// Bind `value` against `column`, letting the strategy use its type descriptor.
    pub fn bind_for_column(&mut self, column: &SqlColumn, value: impl Into<ParamValue>) -> Fragment {
        let key = self.next_map_key();
        let placeholder =
            self.strategy
                .typed_placeholder(column.jdbc_type(), DEFAULT_PARAMETER_PREFIX, &key);
        Fragment::with_fragment(placeholder).with_parameter(key, value)
    }

    /// Fully-qualified name of `table`, resolved once per pass. Aliased copies
    /// of one table share the resolved name.
    pub(crate) fn table_name(&mut self, table: &SqlTable) -> String {
        let definition = table.definition();
        let (_, name) = self
            .table_names
            .entry(Arc::as_ptr(definition) as usize)
            .or_insert_with(|| (Arc::clone(definition), definition.qualified_name()));
        name.clone()
    }

    /// `qualified_name [alias]`, as written after FROM, JOIN, UPDATE or DELETE FROM.
    pub(crate) fn table_reference(&mut self, table: &SqlTable) -> String {
        let name = self.table_name(table);
        match table.alias() {
            Some(alias) => format!("{name} {alias}"),
            None => name,
        }
    }

    /// Column name as it should appear in the current clause.
    ///
    /// Aliased tables always qualify their columns. Unaliased tables qualify with
    /// their full name only inside a query expression that has joins.
    pub fn column_name(&mut self, column: &SqlColumn) -> String {
        let table = column.table();
        match table.alias() {
            Some(alias) => format!("{alias}.{}", column.name()),
            None if self.qualify_columns => {
                format!("{}.{}", self.table_name(table), column.name())
            }
            None => column.name().to_string(),
        }
    }

    /// Run `f` with column qualification switched on or off, then restore it.
    pub(crate) fn with_qualified_columns<R>(
        &mut self,
        qualify: bool,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let saved = std::mem::replace(&mut self.qualify_columns, qualify);
        let result = f(self);
        self.qualify_columns = saved;
        result
    }
}

/// A node of the statement tree that renders to a [`Fragment`].
pub trait Render {
    fn render_fragment(&self, ctx: &mut RenderContext<'_>) -> Fragment;
}

/// Final output of a render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedStatement {
    /// SQL text with strategy-specific placeholders.
    pub sql: String,
    /// Generated key -> bound value, in placeholder order.
    pub parameters: Parameters,
}

impl RenderedStatement {
    pub fn parameter(&self, key: &str) -> Option<&ParamValue> {
        self.parameters.get(key)
    }

    /// Values in the order their placeholders appear in [`sql`](Self::sql).
    ///
    /// This is the binding order for positional strategies.
    pub fn positional_values(&self) -> Vec<&ParamValue> {
        self.parameters.values().collect()
    }
}

impl From<Fragment> for RenderedStatement {
    fn from(fragment: Fragment) -> Self {
        let (sql, parameters) = fragment.into_parts();
        Self { sql, parameters }
    }
}

/// Quote a string literal for SQL.
pub(crate) fn quote_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
