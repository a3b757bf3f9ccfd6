//! Column references, sort specifications and select-list items.

use std::sync::Arc;

use crate::error::SqlResult;
use crate::ident::Ident;
use crate::table::SqlTable;

/// JDBC type descriptor attached to a column.
///
/// Only consulted by strategies that embed type hints in placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JdbcType {
    Bigint,
    Binary,
    Bit,
    Blob,
    Boolean,
    Char,
    Clob,
    Date,
    Decimal,
    Double,
    Float,
    Integer,
    LongVarchar,
    Numeric,
    Other,
    Real,
    Smallint,
    Time,
    Timestamp,
    TimestampWithTimezone,
    Tinyint,
    Varbinary,
    Varchar,
}

impl JdbcType {
    pub fn as_str(self) -> &'static str {
        match self {
            JdbcType::Bigint => "BIGINT",
            JdbcType::Binary => "BINARY",
            JdbcType::Bit => "BIT",
            JdbcType::Blob => "BLOB",
            JdbcType::Boolean => "BOOLEAN",
            JdbcType::Char => "CHAR",
            JdbcType::Clob => "CLOB",
            JdbcType::Date => "DATE",
            JdbcType::Decimal => "DECIMAL",
            JdbcType::Double => "DOUBLE",
            JdbcType::Float => "FLOAT",
            JdbcType::Integer => "INTEGER",
            JdbcType::LongVarchar => "LONGVARCHAR",
            JdbcType::Numeric => "NUMERIC",
            JdbcType::Other => "OTHER",
            JdbcType::Real => "REAL",
            JdbcType::Smallint => "SMALLINT",
            JdbcType::Time => "TIME",
            JdbcType::Timestamp => "TIMESTAMP",
            JdbcType::TimestampWithTimezone => "TIMESTAMP_WITH_TIMEZONE",
            JdbcType::Tinyint => "TINYINT",
            JdbcType::Varbinary => "VARBINARY",
            JdbcType::Varchar => "VARCHAR",
        }
    }
}

/// A column of a [`SqlTable`].
///
/// The table is shared, not owned: many columns and statements point at the
/// same definition.
#[derive(Debug, Clone)]
pub struct SqlColumn {
    name: Ident,
    table: Arc<SqlTable>,
    alias: Option<Ident>,
    jdbc_type: Option<JdbcType>,
}

impl SqlColumn {
    pub fn new(name: &str, table: &Arc<SqlTable>) -> SqlResult<Self> {
        Ok(Self {
            name: Ident::column(name)?,
            table: Arc::clone(table),
            alias: None,
            jdbc_type: None,
        })
    }

    pub(crate) fn wildcard(table: &Arc<SqlTable>) -> Self {
        Self {
            name: Ident::wildcard(),
            table: Arc::clone(table),
            alias: None,
            jdbc_type: None,
        }
    }

    /// Alias used in the select list (`name as alias`) and in ORDER BY.
    pub fn with_alias(mut self, alias: &str) -> SqlResult<Self> {
        self.alias = Some(Ident::parse(alias)?);
        Ok(self)
    }

    pub fn with_jdbc_type(mut self, jdbc_type: JdbcType) -> Self {
        self.jdbc_type = Some(jdbc_type);
        self
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn table(&self) -> &Arc<SqlTable> {
        &self.table
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_ref().map(Ident::as_str)
    }

    pub fn jdbc_type(&self) -> Option<JdbcType> {
        self.jdbc_type
    }

    /// Ascending sort on this column.
    pub fn asc(&self) -> SortSpec {
        SortSpec {
            column: self.clone(),
            descending: false,
        }
    }

    /// Descending sort on this column.
    pub fn desc(&self) -> SortSpec {
        SortSpec {
            column: self.clone(),
            descending: true,
        }
    }
}

/// One ORDER BY item.
#[derive(Debug, Clone)]
pub struct SortSpec {
    pub(crate) column: SqlColumn,
    pub(crate) descending: bool,
}

impl From<SqlColumn> for SortSpec {
    fn from(column: SqlColumn) -> Self {
        Self {
            column,
            descending: false,
        }
    }
}

impl From<&SqlColumn> for SortSpec {
    fn from(column: &SqlColumn) -> Self {
        column.asc()
    }
}

/// Expression in a select list.
#[derive(Debug, Clone)]
pub enum SelectExpr {
    Column(SqlColumn),
    /// `count(*)`
    CountAll,
    Count(SqlColumn),
    CountDistinct(SqlColumn),
    Max(SqlColumn),
    Min(SqlColumn),
    Sum(SqlColumn),
    Avg(SqlColumn),
    /// Raw SQL text, emitted as-is.
    Constant(String),
    /// A string literal, quoted and escaped.
    StringConstant(String),
}

/// A select-list item with an optional alias.
#[derive(Debug, Clone)]
pub struct SelectColumn {
    pub(crate) expr: SelectExpr,
    pub(crate) alias: Option<Ident>,
}

impl SelectColumn {
    fn of(expr: SelectExpr) -> Self {
        Self { expr, alias: None }
    }

    pub fn count_all() -> Self {
        Self::of(SelectExpr::CountAll)
    }

    pub fn count(column: &SqlColumn) -> Self {
        Self::of(SelectExpr::Count(column.clone()))
    }

    pub fn count_distinct(column: &SqlColumn) -> Self {
        Self::of(SelectExpr::CountDistinct(column.clone()))
    }

    pub fn max(column: &SqlColumn) -> Self {
        Self::of(SelectExpr::Max(column.clone()))
    }

    pub fn min(column: &SqlColumn) -> Self {
        Self::of(SelectExpr::Min(column.clone()))
    }

    pub fn sum(column: &SqlColumn) -> Self {
        Self::of(SelectExpr::Sum(column.clone()))
    }

    pub fn avg(column: &SqlColumn) -> Self {
        Self::of(SelectExpr::Avg(column.clone()))
    }

    pub fn constant(sql: impl Into<String>) -> Self {
        Self::of(SelectExpr::Constant(sql.into()))
    }

    pub fn string_constant(value: impl Into<String>) -> Self {
        Self::of(SelectExpr::StringConstant(value.into()))
    }

    /// Render as `<expr> as <alias>`.
    pub fn as_alias(mut self, alias: &str) -> SqlResult<Self> {
        self.alias = Some(Ident::parse(alias)?);
        Ok(self)
    }
}

impl From<SqlColumn> for SelectColumn {
    fn from(column: SqlColumn) -> Self {
        let alias = column.alias.clone();
        Self {
            expr: SelectExpr::Column(column),
            alias,
        }
    }
}

impl From<&SqlColumn> for SelectColumn {
    fn from(column: &SqlColumn) -> Self {
        column.clone().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders() -> Arc<SqlTable> {
        Arc::new(SqlTable::new("orders").unwrap())
    }

    #[test]
    fn column_keeps_table_reference() {
        let t = orders();
        let id = t.column("id").unwrap();
        assert_eq!(id.name(), "id");
        assert!(Arc::ptr_eq(id.table(), &t));
        assert_eq!(Arc::strong_count(&t), 2);
    }

    #[test]
    fn column_alias_flows_into_select_column() {
        let id = orders().column("id").unwrap().with_alias("order_id").unwrap();
        let item = SelectColumn::from(&id);
        assert_eq!(item.alias.as_ref().map(Ident::as_str), Some("order_id"));
    }

    #[test]
    fn sort_direction() {
        let id = orders().column("id").unwrap();
        assert!(!id.asc().descending);
        assert!(id.desc().descending);
        assert!(!SortSpec::from(&id).descending);
    }

    #[test]
    fn rejects_bad_names() {
        let t = orders();
        assert!(t.column("").is_err());
        assert!(t.column("a b").is_err());
        assert_eq!(t.all_columns().name(), "*");
    }

    #[test]
    fn jdbc_type_names() {
        assert_eq!(JdbcType::Integer.as_str(), "INTEGER");
        assert_eq!(JdbcType::TimestampWithTimezone.as_str(), "TIMESTAMP_WITH_TIMEZONE");
    }
}
