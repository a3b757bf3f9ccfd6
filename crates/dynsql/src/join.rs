//! JOIN clauses.

use std::sync::Arc;

use crate::column::SqlColumn;
use crate::condition::Operator;
use crate::criteria::Connector;
use crate::render::{Fragment, Render, RenderContext};
use crate::table::SqlTable;
use crate::value::ParamValue;

/// Kind of join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinKind {
    pub fn keyword(self) -> &'static str {
        match self {
            JoinKind::Inner => "join",
            JoinKind::Left => "left join",
            JoinKind::Right => "right join",
            JoinKind::Full => "full join",
        }
    }
}

/// Right-hand side of a join condition.
#[derive(Debug, Clone)]
pub enum JoinTarget {
    /// Another column; purely textual.
    Column(SqlColumn),
    /// A bound value; contributes one parameter.
    Literal(ParamValue),
}

impl From<SqlColumn> for JoinTarget {
    fn from(column: SqlColumn) -> Self {
        JoinTarget::Column(column)
    }
}

impl From<&SqlColumn> for JoinTarget {
    fn from(column: &SqlColumn) -> Self {
        JoinTarget::Column(column.clone())
    }
}

/// `left <op> right` inside an ON clause.
#[derive(Debug, Clone)]
pub struct JoinCondition {
    left: SqlColumn,
    op: Operator,
    right: JoinTarget,
}

impl JoinCondition {
    pub fn new(left: &SqlColumn, op: Operator, right: impl Into<JoinTarget>) -> Self {
        Self {
            left: left.clone(),
            op,
            right: right.into(),
        }
    }

    /// `left = right_column`
    pub fn equal_to(left: &SqlColumn, right: &SqlColumn) -> Self {
        Self::new(left, Operator::Equal, right)
    }

    /// `left <op> <bound value>`
    pub fn literal(left: &SqlColumn, op: Operator, value: impl Into<ParamValue>) -> Self {
        Self::new(left, op, JoinTarget::Literal(value.into()))
    }

    pub fn left(&self) -> &SqlColumn {
        &self.left
    }

    pub fn operator(&self) -> Operator {
        self.op
    }

    pub fn right(&self) -> &JoinTarget {
        &self.right
    }
}

impl Render for JoinCondition {
    fn render_fragment(&self, ctx: &mut RenderContext<'_>) -> Fragment {
        let lhs = ctx.column_name(&self.left);
        match &self.right {
            JoinTarget::Column(column) => {
                let rhs = ctx.column_name(column);
                Fragment::with_fragment(format!("{lhs} {} {rhs}", self.op.symbol()))
            }
            JoinTarget::Literal(value) => {
                Fragment::with_fragment(format!("{lhs} {}", self.op.symbol()))
                    .merge(ctx.bind_for_column(&self.left, value.clone()))
            }
        }
    }
}

/// `<kind> <table> on <conditions>`
#[derive(Debug, Clone)]
pub struct JoinSpec {
    kind: JoinKind,
    table: Arc<SqlTable>,
    conditions: Vec<(Connector, JoinCondition)>,
}

impl JoinSpec {
    pub fn new(kind: JoinKind, table: &Arc<SqlTable>) -> Self {
        Self {
            kind,
            table: Arc::clone(table),
            conditions: Vec::new(),
        }
    }

    pub fn inner(table: &Arc<SqlTable>) -> Self {
        Self::new(JoinKind::Inner, table)
    }

    pub fn left(table: &Arc<SqlTable>) -> Self {
        Self::new(JoinKind::Left, table)
    }

    pub fn right(table: &Arc<SqlTable>) -> Self {
        Self::new(JoinKind::Right, table)
    }

    pub fn full(table: &Arc<SqlTable>) -> Self {
        Self::new(JoinKind::Full, table)
    }

    /// First ON condition.
    pub fn on(self, condition: JoinCondition) -> Self {
        self.and(condition)
    }

    pub fn and(mut self, condition: JoinCondition) -> Self {
        self.conditions.push((Connector::And, condition));
        self
    }

    pub fn or(mut self, condition: JoinCondition) -> Self {
        self.conditions.push((Connector::Or, condition));
        self
    }

    pub fn kind(&self) -> JoinKind {
        self.kind
    }

    pub fn table(&self) -> &Arc<SqlTable> {
        &self.table
    }

    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }

    /// Whether any ON condition compares against a NULL literal.
    pub(crate) fn binds_null(&self) -> bool {
        self.conditions
            .iter()
            .any(|(_, c)| matches!(&c.right, JoinTarget::Literal(v) if v.is_null()))
    }
}

impl Render for JoinSpec {
    fn render_fragment(&self, ctx: &mut RenderContext<'_>) -> Fragment {
        let table = ctx.table_reference(&self.table);
        let mut on = Fragment::empty();
        for (i, (connector, condition)) in self.conditions.iter().enumerate() {
            let fragment = condition.render_fragment(ctx);
            on = if i == 0 {
                fragment
            } else {
                on.merge(fragment.prefixed(connector.as_str()))
            };
        }
        Fragment::with_fragment(format!("{} {table}", self.kind.keyword()))
            .merge(on.prefixed("on"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{MyBatis3RenderingStrategy, NamedRenderingStrategy};

    fn tables() -> (Arc<SqlTable>, Arc<SqlTable>) {
        let orders = Arc::new(SqlTable::new("orders").unwrap().with_alias("o").unwrap());
        let lines = Arc::new(SqlTable::new("order_line").unwrap().with_alias("ol").unwrap());
        (orders, lines)
    }

    #[test]
    fn column_target_binds_nothing() {
        let (orders, lines) = tables();
        let cond = JoinCondition::equal_to(
            &lines.column("order_id").unwrap(),
            &orders.column("id").unwrap(),
        );
        let mut ctx = RenderContext::new(&NamedRenderingStrategy);
        let f = cond.render_fragment(&mut ctx);
        assert_eq!(f.text(), "ol.order_id = o.id");
        assert!(f.parameters().is_empty());
        assert_eq!(ctx.sequence().issued(), 0);
    }

    #[test]
    fn literal_target_binds_exactly_one() {
        let (_, lines) = tables();
        let qty = lines
            .column("quantity")
            .unwrap()
            .with_jdbc_type(crate::column::JdbcType::Integer);
        let cond = JoinCondition::literal(&qty, Operator::GreaterThan, 2);
        let mut ctx = RenderContext::new(&MyBatis3RenderingStrategy);
        let f = cond.render_fragment(&mut ctx);
        assert_eq!(f.text(), "ol.quantity > #{parameters.p1,jdbcType=INTEGER}");
        assert_eq!(f.parameters().len(), 1);
        assert_eq!(f.parameters()["p1"], ParamValue::Int(2));
    }

    #[test]
    fn join_spec_renders_table_and_conditions() {
        let (orders, lines) = tables();
        let join = JoinSpec::left(&lines)
            .on(JoinCondition::equal_to(
                &lines.column("order_id").unwrap(),
                &orders.column("id").unwrap(),
            ))
            .and(JoinCondition::literal(
                &lines.column("status").unwrap(),
                Operator::NotEqual,
                "void",
            ));
        let mut ctx = RenderContext::new(&NamedRenderingStrategy);
        let f = join.render_fragment(&mut ctx);
        assert_eq!(
            f.text(),
            "left join order_line ol on ol.order_id = o.id and ol.status <> :p1"
        );
        assert_eq!(join.kind(), JoinKind::Left);
    }
}
