//! UPDATE statements.

use std::sync::Arc;

use crate::column::SqlColumn;
use crate::condition::Condition;
use crate::criteria::Criteria;
use crate::error::{SqlError, SqlResult};
use crate::paging::PagingModel;
use crate::render::{Fragment, FragmentCollector, Render, RenderContext, quote_string};
use crate::select::SelectModel;
use crate::statement::Statement;
use crate::table::SqlTable;
use crate::value::ParamValue;

/// `update <table> set ... [where ...] [limit ?]`
pub fn update(table: &Arc<SqlTable>) -> UpdateModel {
    UpdateModel {
        table: Arc::clone(table),
        set: Vec::new(),
        where_: Criteria::new(),
        limit: None,
    }
}

/// Right-hand side of one `column = ...` assignment.
#[derive(Debug, Clone)]
enum Assignment {
    Bound(ParamValue),
    Null,
    Constant(String),
    StringConstant(String),
    Column(SqlColumn),
    Select(Box<SelectModel>),
}

/// UPDATE statement.
#[derive(Debug, Clone)]
pub struct UpdateModel {
    table: Arc<SqlTable>,
    set: Vec<(SqlColumn, Assignment)>,
    where_: Criteria,
    limit: Option<u64>,
}

impl UpdateModel {
    fn assign(mut self, column: &SqlColumn, assignment: Assignment) -> Self {
        self.set.push((column.clone(), assignment));
        self
    }

    // ==================== SET ====================

    pub fn set(self, column: &SqlColumn, value: impl Into<ParamValue>) -> Self {
        self.assign(column, Assignment::Bound(value.into()))
    }

    /// Assign `value` if present; otherwise the column is left untouched.
    pub fn set_when_present<T: Into<ParamValue>>(self, column: &SqlColumn, value: Option<T>) -> Self {
        match value {
            Some(value) => self.set(column, value),
            None => self,
        }
    }

    pub fn set_null(self, column: &SqlColumn) -> Self {
        self.assign(column, Assignment::Null)
    }

    /// Raw SQL expression, e.g. `version + 1`.
    pub fn set_constant(self, column: &SqlColumn, sql: impl Into<String>) -> Self {
        self.assign(column, Assignment::Constant(sql.into()))
    }

    pub fn set_string_constant(self, column: &SqlColumn, value: impl Into<String>) -> Self {
        self.assign(column, Assignment::StringConstant(value.into()))
    }

    pub fn set_to_column(self, column: &SqlColumn, other: &SqlColumn) -> Self {
        self.assign(column, Assignment::Column(other.clone()))
    }

    pub fn set_to_select(self, column: &SqlColumn, select: SelectModel) -> Self {
        self.assign(column, Assignment::Select(Box::new(select)))
    }

    // ==================== WHERE / LIMIT ====================

    pub fn where_(self, column: &SqlColumn, condition: Condition) -> Self {
        self.and(column, condition)
    }

    pub fn and(mut self, column: &SqlColumn, condition: Condition) -> Self {
        self.where_ = self.where_.and(column, condition);
        self
    }

    pub fn or(mut self, column: &SqlColumn, condition: Condition) -> Self {
        self.where_ = self.where_.or(column, condition);
        self
    }

    pub fn where_criteria(mut self, criteria: Criteria) -> Self {
        self.where_ = if self.where_.is_empty() {
            criteria
        } else {
            self.where_.and_group(criteria)
        };
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl Render for UpdateModel {
    fn render_fragment(&self, ctx: &mut RenderContext<'_>) -> Fragment {
        let table = ctx.table_reference(&self.table);
        let set = self
            .set
            .iter()
            .map(|(column, assignment)| {
                let lhs = Fragment::with_fragment(format!("{} =", ctx.column_name(column)));
                let rhs = match assignment {
                    Assignment::Bound(value) => ctx.bind_for_column(column, value.clone()),
                    Assignment::Null => Fragment::with_fragment("null"),
                    Assignment::Constant(sql) => Fragment::with_fragment(sql.clone()),
                    Assignment::StringConstant(s) => Fragment::with_fragment(quote_string(s)),
                    Assignment::Column(other) => Fragment::with_fragment(ctx.column_name(other)),
                    Assignment::Select(select) => select.render_fragment(ctx).parenthesized(),
                };
                lhs.merge(rhs)
            })
            .collect::<FragmentCollector>()
            .join(", ")
            .prefixed("set");

        Fragment::with_fragment(format!("update {table}"))
            .merge(set)
            .merge(self.where_.render_fragment(ctx).prefixed("where"))
            .merge(PagingModel::new(self.limit, None).render_fragment(ctx))
    }
}

impl Statement for UpdateModel {
    fn kind(&self) -> &'static str {
        "update"
    }

    fn validate(&self) -> SqlResult<()> {
        if self.set.is_empty() {
            return Err(SqlError::statement(format!(
                "UPDATE of `{}` has no SET clause",
                self.table.name()
            )));
        }
        for (_, assignment) in &self.set {
            if let Assignment::Select(select) = assignment {
                select.validate()?;
            }
        }
        self.where_.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::JdbcType;
    use crate::render::{MyBatis3RenderingStrategy, NamedRenderingStrategy};
    use crate::select::select;

    fn account() -> (Arc<SqlTable>, SqlColumn, SqlColumn, SqlColumn) {
        let t = Arc::new(SqlTable::new("account").unwrap());
        (
            Arc::clone(&t),
            t.column("id").unwrap().with_jdbc_type(JdbcType::Bigint),
            t.column("balance").unwrap().with_jdbc_type(JdbcType::Decimal),
            t.column("note").unwrap(),
        )
    }

    #[test]
    fn set_then_where_binding_order() {
        let (t, id, balance, note) = account();
        let rendered = update(&t)
            .set(&balance, 100)
            .set_when_present(&note, None::<&str>)
            .where_(&id, Condition::eq(7))
            .render(&MyBatis3RenderingStrategy)
            .unwrap();
        assert_eq!(
            rendered.sql,
            "update account set balance = #{parameters.p1,jdbcType=DECIMAL} \
             where id = #{parameters.p2,jdbcType=BIGINT}"
        );
        let keys: Vec<_> = rendered.parameters.keys().cloned().collect();
        assert_eq!(keys, vec!["p1", "p2"]);
    }

    #[test]
    fn set_variants_and_limit() {
        let (t, id, balance, note) = account();
        let ledger = Arc::new(SqlTable::new("ledger").unwrap());
        let total = ledger.column("total").unwrap();
        let rendered = update(&t)
            .set_to_select(&balance, select([&total]).from(&ledger))
            .set_string_constant(&note, "it's done")
            .set_to_column(&id, &id)
            .limit(1)
            .render(&NamedRenderingStrategy)
            .unwrap();
        assert_eq!(
            rendered.sql,
            "update account set balance = (select total from ledger), \
             note = 'it''s done', id = id limit :p1"
        );
        assert_eq!(rendered.parameter("p1"), Some(&ParamValue::UInt(1)));
    }

    #[test]
    fn empty_set_is_rejected() {
        let (t, _, _, note) = account();
        let err = update(&t)
            .set_when_present(&note, None::<String>)
            .validate()
            .unwrap_err();
        assert!(err.is_statement());
    }
}
