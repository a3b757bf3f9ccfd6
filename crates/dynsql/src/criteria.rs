//! WHERE / HAVING criteria: column conditions joined by `and` / `or`.

use crate::column::{SelectColumn, SelectExpr, SqlColumn};
use crate::condition::Condition;
use crate::error::SqlResult;
use crate::render::{Fragment, Render, RenderContext};
use crate::select::SelectModel;
use crate::statement::Statement;

/// Boolean connector placed before a criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    pub fn as_str(self) -> &'static str {
        match self {
            Connector::And => "and",
            Connector::Or => "or",
        }
    }
}

/// One item of a criteria list.
#[derive(Debug, Clone)]
pub enum Criterion {
    /// `<column> <condition>`
    Column {
        column: SqlColumn,
        condition: Condition,
    },
    /// `<expression> <condition>`, typically an aggregate in HAVING.
    Expression {
        expr: SelectExpr,
        condition: Condition,
    },
    /// Nested criteria, parenthesized when they render more than one item.
    Group(Criteria),
    /// `not (<criterion>)`
    Not(Box<Criterion>),
    /// `[not] exists (select ...)`
    Exists {
        select: Box<SelectModel>,
        negated: bool,
    },
}

impl Criterion {
    pub fn column(column: &SqlColumn, condition: Condition) -> Self {
        Criterion::Column {
            column: column.clone(),
            condition,
        }
    }

    /// Condition on a select-list expression such as `count(*)`. An alias on
    /// `expr` is ignored.
    pub fn expression(expr: SelectColumn, condition: Condition) -> Self {
        Criterion::Expression {
            expr: expr.expr,
            condition,
        }
    }

    pub fn exists(select: SelectModel) -> Self {
        Criterion::Exists {
            select: Box::new(select),
            negated: false,
        }
    }

    pub fn not_exists(select: SelectModel) -> Self {
        Criterion::Exists {
            select: Box::new(select),
            negated: true,
        }
    }

    pub fn negate(self) -> Self {
        Criterion::Not(Box::new(self))
    }

    /// Whether this criterion produces any SQL.
    pub fn is_renderable(&self) -> bool {
        match self {
            Criterion::Column { condition, .. } | Criterion::Expression { condition, .. } => {
                condition.is_renderable()
            }
            Criterion::Group(criteria) => criteria.is_renderable(),
            Criterion::Not(inner) => inner.is_renderable(),
            Criterion::Exists { .. } => true,
        }
    }

    pub(crate) fn validate(&self) -> SqlResult<()> {
        match self {
            Criterion::Column { column, condition } => condition.validate(column.name()),
            Criterion::Expression { condition, .. } => condition.validate("expression"),
            Criterion::Group(criteria) => criteria.validate(),
            Criterion::Not(inner) => inner.validate(),
            Criterion::Exists { select, .. } => select.validate(),
        }
    }
}

impl Render for Criterion {
    fn render_fragment(&self, ctx: &mut RenderContext<'_>) -> Fragment {
        match self {
            Criterion::Column { column, condition } => condition.render_for(column, ctx),
            Criterion::Expression { expr, condition } => {
                if !condition.is_renderable() {
                    return Fragment::empty();
                }
                let lhs = expr.render_expr(ctx);
                condition.render_on(&lhs, expr.typed_column(), ctx)
            }
            Criterion::Group(criteria) => {
                let fragment = criteria.render_fragment(ctx);
                if criteria.renderable_count() > 1 {
                    fragment.parenthesized()
                } else {
                    fragment
                }
            }
            Criterion::Not(inner) => {
                // The group's own parentheses would double up with ours.
                let fragment = match inner.as_ref() {
                    Criterion::Group(criteria) => criteria.render_fragment(ctx),
                    other => other.render_fragment(ctx),
                };
                fragment.parenthesized().prefixed("not")
            }
            Criterion::Exists { select, negated } => {
                let keyword = if *negated { "not exists" } else { "exists" };
                select.render_fragment(ctx).parenthesized().prefixed(keyword)
            }
        }
    }
}

/// An ordered list of criteria with their connectors.
///
/// The connector of the first renderable item is never emitted, so dropping
/// absent conditions never leaves `where and ...` behind.
///
/// ```ignore
/// let criteria = Criteria::where_(&status, Condition::eq("active"))
///     .or_group(
///         Criteria::where_(&age, Condition::gt(18))
///             .and(&verified, Condition::eq(true)),
///     );
/// // status = ? or (age > ? and verified = ?)
/// ```
#[derive(Debug, Clone, Default)]
pub struct Criteria {
    items: Vec<(Connector, Criterion)>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `<column> <condition>`.
    pub fn where_(column: &SqlColumn, condition: Condition) -> Self {
        Self::new().and(column, condition)
    }

    pub fn and(self, column: &SqlColumn, condition: Condition) -> Self {
        self.push(Connector::And, Criterion::column(column, condition))
    }

    pub fn or(self, column: &SqlColumn, condition: Condition) -> Self {
        self.push(Connector::Or, Criterion::column(column, condition))
    }

    /// `and <expression> <condition>`, e.g. `count(*) > ?` in HAVING.
    pub fn and_expression(self, expr: SelectColumn, condition: Condition) -> Self {
        self.push(Connector::And, Criterion::expression(expr, condition))
    }

    pub fn or_expression(self, expr: SelectColumn, condition: Condition) -> Self {
        self.push(Connector::Or, Criterion::expression(expr, condition))
    }

    pub fn and_group(self, group: Criteria) -> Self {
        self.push(Connector::And, Criterion::Group(group))
    }

    pub fn or_group(self, group: Criteria) -> Self {
        self.push(Connector::Or, Criterion::Group(group))
    }

    pub fn and_not(self, group: Criteria) -> Self {
        self.push(Connector::And, Criterion::Group(group).negate())
    }

    pub fn or_not(self, group: Criteria) -> Self {
        self.push(Connector::Or, Criterion::Group(group).negate())
    }

    pub fn and_exists(self, select: SelectModel) -> Self {
        self.push(Connector::And, Criterion::exists(select))
    }

    pub fn and_not_exists(self, select: SelectModel) -> Self {
        self.push(Connector::And, Criterion::not_exists(select))
    }

    pub fn or_exists(self, select: SelectModel) -> Self {
        self.push(Connector::Or, Criterion::exists(select))
    }

    pub fn or_not_exists(self, select: SelectModel) -> Self {
        self.push(Connector::Or, Criterion::not_exists(select))
    }

    /// Append an arbitrary criterion.
    pub fn push(mut self, connector: Connector, criterion: Criterion) -> Self {
        self.items.push((connector, criterion));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether at least one item produces SQL.
    pub fn is_renderable(&self) -> bool {
        self.renderable_count() > 0
    }

    fn renderable_count(&self) -> usize {
        self.items
            .iter()
            .filter(|(_, criterion)| criterion.is_renderable())
            .count()
    }

    pub(crate) fn validate(&self) -> SqlResult<()> {
        self.items
            .iter()
            .try_for_each(|(_, criterion)| criterion.validate())
    }
}

impl Render for Criteria {
    fn render_fragment(&self, ctx: &mut RenderContext<'_>) -> Fragment {
        let mut out = Fragment::empty();
        for (connector, criterion) in &self.items {
            let fragment = criterion.render_fragment(ctx);
            if !fragment.is_renderable() {
                continue;
            }
            out = if out.is_renderable() {
                out.merge(fragment.prefixed(connector.as_str()))
            } else {
                fragment
            };
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::render::{NamedRenderingStrategy, RenderContext};
    use crate::table::SqlTable;

    fn people() -> (SqlColumn, SqlColumn, SqlColumn) {
        let t = Arc::new(SqlTable::new("person").unwrap());
        (
            t.column("name").unwrap(),
            t.column("age").unwrap(),
            t.column("active").unwrap(),
        )
    }

    fn render(criteria: &Criteria) -> Fragment {
        let mut ctx = RenderContext::new(&NamedRenderingStrategy);
        criteria.render_fragment(&mut ctx)
    }

    #[test]
    fn leading_connector_is_dropped() {
        let (name, age, _) = people();
        let criteria = Criteria::where_(&name, Condition::eq_when_present(None::<&str>))
            .or(&age, Condition::gt(30));
        assert_eq!(render(&criteria).text(), "age > :p1");
    }

    #[test]
    fn nested_group_is_parenthesized() {
        let (name, age, active) = people();
        let criteria = Criteria::where_(&name, Condition::eq("Fred")).or_group(
            Criteria::where_(&age, Condition::gt(18)).and(&active, Condition::eq(true)),
        );
        let f = render(&criteria);
        assert_eq!(f.text(), "name = :p1 or (age > :p2 and active = :p3)");
        assert_eq!(f.parameters().len(), 3);
    }

    #[test]
    fn single_item_group_is_not_parenthesized() {
        let (name, age, _) = people();
        let criteria = Criteria::where_(&name, Condition::is_null()).and_group(
            Criteria::where_(&age, Condition::gt(18)).and(&age, Condition::lt_when_present(None::<i32>)),
        );
        assert_eq!(render(&criteria).text(), "name is null and age > :p1");
    }

    #[test]
    fn not_wraps_in_parentheses() {
        let (name, age, _) = people();
        let criteria = Criteria::where_(&name, Condition::is_not_null())
            .and_not(Criteria::where_(&age, Condition::lt(21)));
        assert_eq!(render(&criteria).text(), "name is not null and not (age < :p1)");

        let criteria = Criteria::new().and_not(
            Criteria::where_(&age, Condition::lt(21)).or(&age, Condition::gt(65)),
        );
        assert_eq!(render(&criteria).text(), "not (age < :p1 or age > :p2)");
    }

    #[test]
    fn all_absent_renders_nothing() {
        let (name, age, _) = people();
        let criteria = Criteria::where_(&name, Condition::like_when_present(None::<String>))
            .and_not(Criteria::where_(&age, Condition::in_when_present([None::<i32>])));
        assert!(!criteria.is_renderable());
        assert!(!render(&criteria).is_renderable());
    }

    #[test]
    fn aggregate_expressions_take_conditions() {
        let (name, age, _) = people();
        let criteria = Criteria::new()
            .and_expression(SelectColumn::count_all(), Condition::gt(5))
            .or_expression(SelectColumn::max(&age).as_alias("oldest").unwrap(), Condition::lte(90))
            .and_expression(SelectColumn::count(&name), Condition::ne_when_present(None::<i64>));
        let f = render(&criteria);
        assert_eq!(f.text(), "count(*) > :p1 or max(age) <= :p2");
        assert_eq!(f.parameters().get("p1"), Some(&crate::value::ParamValue::Int(5)));
    }

    #[test]
    fn null_comparison_fails_validation() {
        let (name, _, _) = people();
        let criteria = Criteria::where_(&name, Condition::is_null())
            .and_group(Criteria::where_(&name, Condition::eq(crate::value::ParamValue::Null)));
        let err = criteria.validate().unwrap_err();
        assert!(err.is_statement());
        assert!(err.to_string().contains("name"));
    }
}
