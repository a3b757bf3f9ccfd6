//! INSERT statements: single row, multiple rows and insert-select.
//!
//! Column lists always use bare column names; the target table is written with
//! its qualified name and without an alias.

use std::sync::Arc;

use crate::column::SqlColumn;
use crate::error::{SqlError, SqlResult};
use crate::render::{Fragment, FragmentCollector, Render, RenderContext, quote_string};
use crate::select::SelectModel;
use crate::statement::Statement;
use crate::table::SqlTable;
use crate::value::ParamValue;

/// `insert into <table> (...) values (...)`
pub fn insert_into(table: &Arc<SqlTable>) -> InsertModel {
    InsertModel {
        table: Arc::clone(table),
        mappings: Vec::new(),
    }
}

/// `insert into <table> (<columns>) values (...), (...)`
pub fn insert_multiple<'c>(
    table: &Arc<SqlTable>,
    columns: impl IntoIterator<Item = &'c SqlColumn>,
) -> MultiRowInsertModel {
    MultiRowInsertModel {
        table: Arc::clone(table),
        columns: columns.into_iter().cloned().collect(),
        rows: Vec::new(),
        build_error: None,
    }
}

/// `insert into <table> [(<columns>)] select ...`
pub fn insert_select<'c>(
    table: &Arc<SqlTable>,
    columns: impl IntoIterator<Item = &'c SqlColumn>,
    select: SelectModel,
) -> InsertSelectModel {
    InsertSelectModel {
        table: Arc::clone(table),
        columns: columns.into_iter().cloned().collect(),
        select,
    }
}

/// Source of one inserted column value.
#[derive(Debug, Clone)]
enum ValueSource {
    Bound(ParamValue),
    Null,
    /// Raw SQL, emitted as-is.
    Constant(String),
    StringConstant(String),
    Default,
}

impl ValueSource {
    fn render_for(&self, column: &SqlColumn, ctx: &mut RenderContext<'_>) -> Fragment {
        match self {
            ValueSource::Bound(value) => ctx.bind_for_column(column, value.clone()),
            ValueSource::Null => Fragment::with_fragment("null"),
            ValueSource::Constant(sql) => Fragment::with_fragment(sql.clone()),
            ValueSource::StringConstant(s) => Fragment::with_fragment(quote_string(s)),
            ValueSource::Default => Fragment::with_fragment("default"),
        }
    }
}

fn column_list(columns: impl IntoIterator<Item = String>) -> Fragment {
    columns
        .into_iter()
        .map(Fragment::with_fragment)
        .collect::<FragmentCollector>()
        .join(", ")
        .parenthesized()
}

/// Single-row INSERT.
#[derive(Debug, Clone)]
pub struct InsertModel {
    table: Arc<SqlTable>,
    mappings: Vec<(SqlColumn, ValueSource)>,
}

impl InsertModel {
    fn map(mut self, column: &SqlColumn, source: ValueSource) -> Self {
        self.mappings.push((column.clone(), source));
        self
    }

    /// Bind `value` to `column`.
    pub fn set(self, column: &SqlColumn, value: impl Into<ParamValue>) -> Self {
        self.map(column, ValueSource::Bound(value.into()))
    }

    /// Bind `value` if present; otherwise leave the column out of the statement.
    pub fn set_when_present<T: Into<ParamValue>>(self, column: &SqlColumn, value: Option<T>) -> Self {
        match value {
            Some(value) => self.set(column, value),
            None => self,
        }
    }

    pub fn set_null(self, column: &SqlColumn) -> Self {
        self.map(column, ValueSource::Null)
    }

    /// Raw SQL expression, e.g. `current_timestamp`.
    pub fn set_constant(self, column: &SqlColumn, sql: impl Into<String>) -> Self {
        self.map(column, ValueSource::Constant(sql.into()))
    }

    pub fn set_string_constant(self, column: &SqlColumn, value: impl Into<String>) -> Self {
        self.map(column, ValueSource::StringConstant(value.into()))
    }

    pub fn set_default(self, column: &SqlColumn) -> Self {
        self.map(column, ValueSource::Default)
    }
}

impl Render for InsertModel {
    fn render_fragment(&self, ctx: &mut RenderContext<'_>) -> Fragment {
        let table = ctx.table_name(&self.table);
        let columns = column_list(self.mappings.iter().map(|(c, _)| c.name().to_string()));
        let values = self
            .mappings
            .iter()
            .map(|(column, source)| source.render_for(column, ctx))
            .collect::<FragmentCollector>()
            .join(", ")
            .parenthesized()
            .prefixed("values");
        Fragment::with_fragment(format!("insert into {table}"))
            .merge(columns)
            .merge(values)
    }
}

impl Statement for InsertModel {
    fn kind(&self) -> &'static str {
        "insert"
    }

    fn validate(&self) -> SqlResult<()> {
        if self.mappings.is_empty() {
            return Err(SqlError::statement(format!(
                "INSERT into `{}` has no columns",
                self.table.name()
            )));
        }
        Ok(())
    }
}

/// Multi-row INSERT with one shared column list.
#[derive(Debug, Clone)]
pub struct MultiRowInsertModel {
    table: Arc<SqlTable>,
    columns: Vec<SqlColumn>,
    rows: Vec<Vec<ParamValue>>,
    build_error: Option<String>,
}

impl MultiRowInsertModel {
    /// Append one row. Its length must match the column list.
    pub fn row<T: Into<ParamValue>>(mut self, values: impl IntoIterator<Item = T>) -> Self {
        let row: Vec<ParamValue> = values.into_iter().map(Into::into).collect();
        if row.len() != self.columns.len() && self.build_error.is_none() {
            self.build_error = Some(format!(
                "row {} has {} values but {} columns were declared",
                self.rows.len() + 1,
                row.len(),
                self.columns.len()
            ));
        }
        self.rows.push(row);
        self
    }

    pub fn rows<R, T>(self, rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = T>,
        T: Into<ParamValue>,
    {
        rows.into_iter().fold(self, |model, row| model.row(row))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl Render for MultiRowInsertModel {
    fn render_fragment(&self, ctx: &mut RenderContext<'_>) -> Fragment {
        let table = ctx.table_name(&self.table);
        let columns = column_list(self.columns.iter().map(|c| c.name().to_string()));
        let mut rows = FragmentCollector::new();
        for row in &self.rows {
            let values = self
                .columns
                .iter()
                .zip(row)
                .map(|(column, value)| ctx.bind_for_column(column, value.clone()))
                .collect::<FragmentCollector>()
                .join(", ")
                .parenthesized();
            rows.add(values);
        }
        Fragment::with_fragment(format!("insert into {table}"))
            .merge(columns)
            .merge(rows.join(", ").prefixed("values"))
    }
}

impl Statement for MultiRowInsertModel {
    fn kind(&self) -> &'static str {
        "insert_multiple"
    }

    fn build_error(&self) -> Option<&str> {
        self.build_error.as_deref()
    }

    fn validate(&self) -> SqlResult<()> {
        if let Some(err) = self.build_error() {
            return Err(SqlError::statement(err));
        }
        if self.columns.is_empty() {
            return Err(SqlError::statement(format!(
                "INSERT into `{}` has no columns",
                self.table.name()
            )));
        }
        if self.rows.is_empty() {
            return Err(SqlError::statement(format!(
                "multi-row INSERT into `{}` has no rows",
                self.table.name()
            )));
        }
        Ok(())
    }
}

/// `insert into <table> [(<columns>)] <select>`
#[derive(Debug, Clone)]
pub struct InsertSelectModel {
    table: Arc<SqlTable>,
    columns: Vec<SqlColumn>,
    select: SelectModel,
}

impl Render for InsertSelectModel {
    fn render_fragment(&self, ctx: &mut RenderContext<'_>) -> Fragment {
        let table = ctx.table_name(&self.table);
        let columns = column_list(self.columns.iter().map(|c| c.name().to_string()));
        Fragment::with_fragment(format!("insert into {table}"))
            .merge(columns)
            .merge(self.select.render_fragment(ctx))
    }
}

impl Statement for InsertSelectModel {
    fn kind(&self) -> &'static str {
        "insert_select"
    }

    fn validate(&self) -> SqlResult<()> {
        self.select.validate()?;
        let selected = self.select.query().column_count();
        if !self.columns.is_empty() && self.columns.len() != selected {
            return Err(SqlError::statement(format!(
                "INSERT lists {} columns but the SELECT yields {selected}",
                self.columns.len()
            )));
        }
        Ok(())
    }
}
