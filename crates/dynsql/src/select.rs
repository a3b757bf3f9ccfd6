//! SELECT statements.
//!
//! # Example
//! ```ignore
//! use dynsql::prelude::*;
//!
//! let rendered = select([&order_id, &quantity])
//!     .from(&orders)
//!     .join(JoinSpec::inner(&lines).on(JoinCondition::equal_to(&line_order_id, &order_id)))
//!     .where_(&status, Condition::eq("open"))
//!     .order_by([order_id.desc()])
//!     .limit(10)
//!     .render(&PositionalRenderingStrategy)?;
//! ```

use std::sync::Arc;

use crate::column::{SelectColumn, SelectExpr, SortSpec, SqlColumn};
use crate::condition::Condition;
use crate::criteria::Criteria;
use crate::error::{SqlError, SqlResult};
use crate::join::{JoinCondition, JoinSpec};
use crate::paging::PagingModel;
use crate::render::{Fragment, FragmentCollector, Render, RenderContext, quote_string};
use crate::statement::Statement;
use crate::table::SqlTable;

/// `select <columns> from <table> ...`
pub fn select<I, C>(columns: I) -> SelectModel
where
    I: IntoIterator<Item = C>,
    C: Into<SelectColumn>,
{
    SelectModel::new(columns.into_iter().map(Into::into).collect(), false)
}

/// `select distinct <columns> from <table> ...`
pub fn select_distinct<I, C>(columns: I) -> SelectModel
where
    I: IntoIterator<Item = C>,
    C: Into<SelectColumn>,
{
    SelectModel::new(columns.into_iter().map(Into::into).collect(), true)
}

/// `select count(*) from <table>`
pub fn count_from(table: &Arc<SqlTable>) -> SelectModel {
    select([SelectColumn::count_all()]).from(table)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnionKind {
    Union,
    UnionAll,
}

impl UnionKind {
    pub fn keyword(self) -> &'static str {
        match self {
            UnionKind::Union => "union",
            UnionKind::UnionAll => "union all",
        }
    }
}

/// Everything up to HAVING: one arm of a (possibly unioned) query.
#[derive(Debug, Clone)]
pub struct QueryExpression {
    distinct: bool,
    columns: Vec<SelectColumn>,
    from: Option<Arc<SqlTable>>,
    joins: Vec<JoinSpec>,
    where_: Criteria,
    group_by: Vec<SqlColumn>,
    having: Criteria,
}

impl QueryExpression {
    pub fn has_joins(&self) -> bool {
        !self.joins.is_empty()
    }

    /// Number of items in the select list.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn validate(&self) -> SqlResult<()> {
        if self.columns.is_empty() {
            return Err(SqlError::statement("SELECT requires at least one column"));
        }
        if self.from.is_none() {
            return Err(SqlError::statement("SELECT requires a FROM table"));
        }
        if let Some(join) = self.joins.iter().find(|j| !j.has_conditions()) {
            return Err(SqlError::statement(format!(
                "JOIN on `{}` has no ON condition",
                join.table().name()
            )));
        }
        if let Some(join) = self.joins.iter().find(|j| j.binds_null()) {
            return Err(SqlError::statement(format!(
                "JOIN on `{}` compares against a NULL literal, which never matches",
                join.table().name()
            )));
        }
        self.where_.validate()?;
        self.having.validate()
    }
}

impl Render for QueryExpression {
    fn render_fragment(&self, ctx: &mut RenderContext<'_>) -> Fragment {
        ctx.with_qualified_columns(self.has_joins(), |ctx| {
            let keyword = if self.distinct {
                "select distinct"
            } else {
                "select"
            };
            let mut out = self
                .columns
                .iter()
                .map(|c| c.render_fragment(ctx))
                .collect::<FragmentCollector>()
                .join(", ")
                .prefixed(keyword);

            if let Some(from) = &self.from {
                let table = ctx.table_reference(from);
                out = out.merge(Fragment::with_fragment(format!("from {table}")));
            }
            for join in &self.joins {
                out = out.merge(join.render_fragment(ctx));
            }
            out = out.merge(self.where_.render_fragment(ctx).prefixed("where"));

            let group_by = self
                .group_by
                .iter()
                .map(|c| Fragment::with_fragment(ctx.column_name(c)))
                .collect::<FragmentCollector>()
                .join(", ");
            out = out.merge(group_by.prefixed("group by"));
            out.merge(self.having.render_fragment(ctx).prefixed("having"))
        })
    }
}

impl SelectExpr {
    /// The expression text without any alias.
    pub(crate) fn render_expr(&self, ctx: &mut RenderContext<'_>) -> String {
        match self {
            SelectExpr::Column(c) => ctx.column_name(c),
            SelectExpr::CountAll => "count(*)".to_string(),
            SelectExpr::Count(c) => format!("count({})", ctx.column_name(c)),
            SelectExpr::CountDistinct(c) => format!("count(distinct {})", ctx.column_name(c)),
            SelectExpr::Max(c) => format!("max({})", ctx.column_name(c)),
            SelectExpr::Min(c) => format!("min({})", ctx.column_name(c)),
            SelectExpr::Sum(c) => format!("sum({})", ctx.column_name(c)),
            SelectExpr::Avg(c) => format!("avg({})", ctx.column_name(c)),
            SelectExpr::Constant(sql) => sql.clone(),
            SelectExpr::StringConstant(s) => quote_string(s),
        }
    }

    /// Column whose type the expression keeps, if any.
    pub(crate) fn typed_column(&self) -> Option<&SqlColumn> {
        match self {
            SelectExpr::Column(c) | SelectExpr::Max(c) | SelectExpr::Min(c) => Some(c),
            _ => None,
        }
    }
}

impl Render for SelectColumn {
    fn render_fragment(&self, ctx: &mut RenderContext<'_>) -> Fragment {
        let expr = self.expr.render_expr(ctx);
        match &self.alias {
            Some(alias) => Fragment::with_fragment(format!("{expr} as {alias}")),
            None => Fragment::with_fragment(expr),
        }
    }
}

/// A complete SELECT: query expression, union arms, ORDER BY and paging.
#[derive(Debug, Clone)]
pub struct SelectModel {
    query: QueryExpression,
    unions: Vec<(UnionKind, SelectModel)>,
    order_by: Vec<SortSpec>,
    limit: Option<u64>,
    offset: Option<u64>,
    fetch_first: Option<u64>,
    build_error: Option<String>,
}

impl SelectModel {
    fn new(columns: Vec<SelectColumn>, distinct: bool) -> Self {
        Self {
            query: QueryExpression {
                distinct,
                columns,
                from: None,
                joins: Vec::new(),
                where_: Criteria::new(),
                group_by: Vec::new(),
                having: Criteria::new(),
            },
            unions: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            fetch_first: None,
            build_error: None,
        }
    }

    fn record_error(&mut self, message: impl Into<String>) {
        if self.build_error.is_none() {
            self.build_error = Some(message.into());
        }
    }

    // ==================== FROM / JOIN ====================

    pub fn from(mut self, table: &Arc<SqlTable>) -> Self {
        self.query.from = Some(Arc::clone(table));
        self
    }

    pub fn join(mut self, join: JoinSpec) -> Self {
        self.query.joins.push(join);
        self
    }

    pub fn inner_join(self, table: &Arc<SqlTable>, on: JoinCondition) -> Self {
        self.join(JoinSpec::inner(table).on(on))
    }

    pub fn left_join(self, table: &Arc<SqlTable>, on: JoinCondition) -> Self {
        self.join(JoinSpec::left(table).on(on))
    }

    pub fn right_join(self, table: &Arc<SqlTable>, on: JoinCondition) -> Self {
        self.join(JoinSpec::right(table).on(on))
    }

    pub fn full_join(self, table: &Arc<SqlTable>, on: JoinCondition) -> Self {
        self.join(JoinSpec::full(table).on(on))
    }

    // ==================== WHERE / GROUP BY / HAVING ====================

    pub fn where_(self, column: &SqlColumn, condition: Condition) -> Self {
        self.and(column, condition)
    }

    pub fn and(mut self, column: &SqlColumn, condition: Condition) -> Self {
        self.query.where_ = self.query.where_.and(column, condition);
        self
    }

    pub fn or(mut self, column: &SqlColumn, condition: Condition) -> Self {
        self.query.where_ = self.query.where_.or(column, condition);
        self
    }

    /// AND a whole criteria tree into WHERE.
    pub fn where_criteria(mut self, criteria: Criteria) -> Self {
        self.query.where_ = if self.query.where_.is_empty() {
            criteria
        } else {
            self.query.where_.and_group(criteria)
        };
        self
    }

    pub fn group_by<'c>(mut self, columns: impl IntoIterator<Item = &'c SqlColumn>) -> Self {
        self.query.group_by.extend(columns.into_iter().cloned());
        self
    }

    pub fn having(mut self, criteria: Criteria) -> Self {
        self.query.having = if self.query.having.is_empty() {
            criteria
        } else {
            self.query.having.and_group(criteria)
        };
        self
    }

    // ==================== UNION ====================

    pub fn union(mut self, other: SelectModel) -> Self {
        self.unions.push((UnionKind::Union, other));
        self
    }

    pub fn union_all(mut self, other: SelectModel) -> Self {
        self.unions.push((UnionKind::UnionAll, other));
        self
    }

    // ==================== ORDER BY / paging ====================

    pub fn order_by<I, S>(mut self, specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SortSpec>,
    {
        self.order_by.extend(specs.into_iter().map(Into::into));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        if self.fetch_first.is_some() {
            self.record_error("limit cannot be combined with fetch first");
        }
        self.limit = Some(limit);
        self
    }

    pub fn limit_when_present(self, limit: Option<u64>) -> Self {
        match limit {
            Some(limit) => self.limit(limit),
            None => self,
        }
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn offset_when_present(mut self, offset: Option<u64>) -> Self {
        if offset.is_some() {
            self.offset = offset;
        }
        self
    }

    pub fn fetch_first(mut self, rows: u64) -> Self {
        if self.limit.is_some() {
            self.record_error("fetch first cannot be combined with limit");
        }
        self.fetch_first = Some(rows);
        self
    }

    // ==================== Accessors ====================

    pub fn query(&self) -> &QueryExpression {
        &self.query
    }

    pub fn paging(&self) -> PagingModel {
        match self.fetch_first {
            Some(rows) => PagingModel::fetch_first(Some(rows), self.offset),
            None => PagingModel::new(self.limit, self.offset),
        }
    }

    /// Whether this query must be parenthesized when used as a union arm.
    fn needs_parentheses_as_arm(&self) -> bool {
        !self.order_by.is_empty() || !self.paging().is_empty() || !self.unions.is_empty()
    }

    fn render_order_by(&self, ctx: &mut RenderContext<'_>) -> Fragment {
        let qualify = self.query.has_joins() && self.unions.is_empty();
        let items = ctx.with_qualified_columns(qualify, |ctx| {
            self.order_by
                .iter()
                .map(|spec| {
                    let column = &spec.column;
                    let name = match column.alias() {
                        Some(alias) => alias.to_string(),
                        None if !self.unions.is_empty() => column.name().to_string(),
                        None => ctx.column_name(column),
                    };
                    let name = if spec.descending {
                        format!("{name} desc")
                    } else {
                        name
                    };
                    Fragment::with_fragment(name)
                })
                .collect::<FragmentCollector>()
        });
        items.join(", ").prefixed("order by")
    }
}

impl Render for SelectModel {
    fn render_fragment(&self, ctx: &mut RenderContext<'_>) -> Fragment {
        let mut out = self.query.render_fragment(ctx);
        for (kind, arm) in &self.unions {
            let fragment = arm.render_fragment(ctx);
            let fragment = if arm.needs_parentheses_as_arm() {
                fragment.parenthesized()
            } else {
                fragment
            };
            out = out.merge(fragment.prefixed(kind.keyword()));
        }
        out = out.merge(self.render_order_by(ctx));
        out.merge(self.paging().render_fragment(ctx))
    }
}

impl Statement for SelectModel {
    fn kind(&self) -> &'static str {
        "select"
    }

    fn build_error(&self) -> Option<&str> {
        self.build_error.as_deref()
    }

    fn validate(&self) -> SqlResult<()> {
        if let Some(err) = self.build_error() {
            return Err(SqlError::statement(err));
        }
        self.query.validate()?;
        self.unions.iter().try_for_each(|(_, arm)| arm.validate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::NamedRenderingStrategy;
    use crate::value::ParamValue;

    #[test]
    fn limit_with_fetch_first_is_rejected() {
        let t = Arc::new(SqlTable::new("t").unwrap());
        let id = t.column("id").unwrap();
        let err = select([&id])
            .from(&t)
            .limit(5)
            .fetch_first(5)
            .render(&NamedRenderingStrategy)
            .unwrap_err();
        assert!(err.is_statement());
    }

    #[test]
    fn missing_from_is_rejected() {
        let t = Arc::new(SqlTable::new("t").unwrap());
        let id = t.column("id").unwrap();
        let err = select([&id]).validate().unwrap_err();
        assert!(err.to_string().contains("FROM"));
    }

    #[test]
    fn join_without_condition_is_rejected() {
        let a = Arc::new(SqlTable::new("a").unwrap());
        let b = Arc::new(SqlTable::new("b").unwrap());
        let err = select([a.all_columns()])
            .from(&a)
            .join(JoinSpec::inner(&b))
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("`b`"));
    }

    #[test]
    fn null_comparisons_are_rejected_at_render() {
        let t = Arc::new(SqlTable::new("t").unwrap());
        let id = t.column("id").unwrap();
        for condition in [
            Condition::eq(ParamValue::Null),
            Condition::not_in([ParamValue::from(4), ParamValue::Null]),
            Condition::eq(None::<i64>),
        ] {
            let err = select([&id])
                .from(&t)
                .where_(&id, condition)
                .render(&NamedRenderingStrategy)
                .unwrap_err();
            assert!(err.is_statement());
        }
    }

    #[test]
    fn join_on_null_literal_is_rejected() {
        let a = Arc::new(SqlTable::new("a").unwrap());
        let b = Arc::new(SqlTable::new("b").unwrap());
        let a_id = a.column("id").unwrap();
        let b_id = b.column("id").unwrap();
        let b_kind = b.column("kind").unwrap();
        let err = select([&a_id])
            .from(&a)
            .join(
                JoinSpec::inner(&b)
                    .on(JoinCondition::equal_to(&b_id, &a_id))
                    .and(JoinCondition::literal(&b_kind, crate::condition::Operator::Equal, ParamValue::Null)),
            )
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("NULL"));
    }

    #[test]
    fn having_on_count_binds_its_threshold() {
        let t = Arc::new(SqlTable::new("orders").unwrap());
        let customer = t.column("customer_id").unwrap();
        let rendered = select([SelectColumn::from(&customer), SelectColumn::count_all()])
            .from(&t)
            .group_by([&customer])
            .having(Criteria::new().and_expression(SelectColumn::count_all(), Condition::gt(5)))
            .render(&NamedRenderingStrategy)
            .unwrap();
        assert_eq!(
            rendered.sql,
            "select customer_id, count(*) from orders group by customer_id having count(*) > :p1"
        );
        assert_eq!(rendered.parameter("p1"), Some(&ParamValue::Int(5)));
    }

    #[test]
    fn invalid_subquery_fails_outer_validation() {
        let t = Arc::new(SqlTable::new("t").unwrap());
        let id = t.column("id").unwrap();
        let inner = select([&id]);
        let outer = select([&id]).from(&t).where_(&id, Condition::in_select(inner));
        assert!(outer.validate().is_err());
    }

    #[test]
    fn count_from_shorthand() {
        let t = Arc::new(SqlTable::new("t").unwrap());
        assert_eq!(count_from(&t).to_sql(), "select count(*) from t");
    }
}
