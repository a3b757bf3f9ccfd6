//! Conditions applied to a column in WHERE, HAVING and join clauses.
//!
//! A condition built from an absent value ("when present" variants) is not
//! renderable; the criterion holding it disappears from the statement together
//! with its `and`/`or` connector.
//!
//! # Example
//! ```ignore
//! use dynsql::{Condition, Criteria};
//!
//! let criteria = Criteria::where_(&status, Condition::eq("active"))
//!     .and(&age, Condition::gte_when_present(min_age))
//!     .and(&id, Condition::in_list([1, 2, 3]));
//! ```

use crate::column::SqlColumn;
use crate::error::{SqlError, SqlResult};
use crate::render::{Fragment, FragmentCollector, Render, RenderContext};
use crate::select::SelectModel;
use crate::statement::Statement;
use crate::value::ParamValue;

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    NotEqual,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "<>",
            Operator::LessThan => "<",
            Operator::LessOrEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterOrEqual => ">=",
        }
    }
}

/// A predicate on a column, rendered as `<column> <predicate>`.
#[derive(Debug, Clone)]
pub enum Condition {
    /// `column op value`
    Compare { op: Operator, value: ParamValue },
    /// `column op other_column`
    CompareColumn { op: Operator, column: SqlColumn },
    /// `column [not] like pattern`
    Like { pattern: ParamValue, negated: bool },
    /// `column is [not] null`
    Null { negated: bool },
    /// `column [not] in (v1, v2, ...)`. An empty list renders a constant predicate.
    In { values: Vec<ParamValue>, negated: bool },
    /// `column [not] between lower and upper`
    Between {
        lower: ParamValue,
        upper: ParamValue,
        negated: bool,
    },
    /// `column [not] in (select ...)`
    InSelect {
        select: Box<SelectModel>,
        negated: bool,
    },
    /// Built from an absent value; renders nothing.
    Absent,
}

macro_rules! comparisons {
    ($($name:ident, $when_present:ident, $column_fn:ident => $op:ident;)*) => {
        $(
            #[doc = concat!("`column ", stringify!($name), " value`")]
            pub fn $name(value: impl Into<ParamValue>) -> Self {
                Condition::Compare { op: Operator::$op, value: value.into() }
            }

            #[doc = concat!("Like [`Condition::", stringify!($name), "`] but absent when `value` is `None`.")]
            pub fn $when_present<T: Into<ParamValue>>(value: Option<T>) -> Self {
                value.map_or(Condition::Absent, Self::$name)
            }

            #[doc = concat!("Compare against another column with `", stringify!($name), "`.")]
            pub fn $column_fn(column: &SqlColumn) -> Self {
                Condition::CompareColumn { op: Operator::$op, column: column.clone() }
            }
        )*
    };
}

impl Condition {
    comparisons! {
        eq, eq_when_present, eq_column => Equal;
        ne, ne_when_present, ne_column => NotEqual;
        lt, lt_when_present, lt_column => LessThan;
        lte, lte_when_present, lte_column => LessOrEqual;
        gt, gt_when_present, gt_column => GreaterThan;
        gte, gte_when_present, gte_column => GreaterOrEqual;
    }

    pub fn like(pattern: impl Into<ParamValue>) -> Self {
        Condition::Like {
            pattern: pattern.into(),
            negated: false,
        }
    }

    pub fn not_like(pattern: impl Into<ParamValue>) -> Self {
        Condition::Like {
            pattern: pattern.into(),
            negated: true,
        }
    }

    pub fn like_when_present<T: Into<ParamValue>>(pattern: Option<T>) -> Self {
        pattern.map_or(Condition::Absent, Self::like)
    }

    pub fn not_like_when_present<T: Into<ParamValue>>(pattern: Option<T>) -> Self {
        pattern.map_or(Condition::Absent, Self::not_like)
    }

    pub fn is_null() -> Self {
        Condition::Null { negated: false }
    }

    pub fn is_not_null() -> Self {
        Condition::Null { negated: true }
    }

    /// `column in (...)`. An empty list renders `1 = 0`.
    pub fn in_list<T: Into<ParamValue>>(values: impl IntoIterator<Item = T>) -> Self {
        Condition::In {
            values: values.into_iter().map(Into::into).collect(),
            negated: false,
        }
    }

    /// `column not in (...)`. An empty list renders `1 = 1`.
    pub fn not_in<T: Into<ParamValue>>(values: impl IntoIterator<Item = T>) -> Self {
        Condition::In {
            values: values.into_iter().map(Into::into).collect(),
            negated: true,
        }
    }

    /// `column in (...)` over the present values only; absent if none remain.
    pub fn in_when_present<T: Into<ParamValue>>(values: impl IntoIterator<Item = Option<T>>) -> Self {
        Self::present_list(values, false)
    }

    /// `column not in (...)` over the present values only; absent if none remain.
    pub fn not_in_when_present<T: Into<ParamValue>>(
        values: impl IntoIterator<Item = Option<T>>,
    ) -> Self {
        Self::present_list(values, true)
    }

    fn present_list<T: Into<ParamValue>>(
        values: impl IntoIterator<Item = Option<T>>,
        negated: bool,
    ) -> Self {
        let values: Vec<ParamValue> = values.into_iter().flatten().map(Into::into).collect();
        if values.is_empty() {
            return Condition::Absent;
        }
        Condition::In { values, negated }
    }

    pub fn between(lower: impl Into<ParamValue>, upper: impl Into<ParamValue>) -> Self {
        Condition::Between {
            lower: lower.into(),
            upper: upper.into(),
            negated: false,
        }
    }

    pub fn not_between(lower: impl Into<ParamValue>, upper: impl Into<ParamValue>) -> Self {
        Condition::Between {
            lower: lower.into(),
            upper: upper.into(),
            negated: true,
        }
    }

    /// Rendered only when both bounds are present.
    pub fn between_when_present<T: Into<ParamValue>, U: Into<ParamValue>>(
        lower: Option<T>,
        upper: Option<U>,
    ) -> Self {
        match (lower, upper) {
            (Some(lower), Some(upper)) => Self::between(lower, upper),
            _ => Condition::Absent,
        }
    }

    /// Rendered only when both bounds are present.
    pub fn not_between_when_present<T: Into<ParamValue>, U: Into<ParamValue>>(
        lower: Option<T>,
        upper: Option<U>,
    ) -> Self {
        match (lower, upper) {
            (Some(lower), Some(upper)) => Self::not_between(lower, upper),
            _ => Condition::Absent,
        }
    }

    pub fn in_select(select: SelectModel) -> Self {
        Condition::InSelect {
            select: Box::new(select),
            negated: false,
        }
    }

    pub fn not_in_select(select: SelectModel) -> Self {
        Condition::InSelect {
            select: Box::new(select),
            negated: true,
        }
    }

    pub fn is_renderable(&self) -> bool {
        !matches!(self, Condition::Absent)
    }

    /// Reject trees the database would evaluate differently than written.
    /// `subject` names the left-hand side in error messages.
    pub(crate) fn validate(&self, subject: &str) -> SqlResult<()> {
        let binds_null = match self {
            Condition::Compare { value, .. } => value.is_null(),
            Condition::Like { pattern, .. } => pattern.is_null(),
            Condition::In { values, .. } => values.iter().any(ParamValue::is_null),
            Condition::Between { lower, upper, .. } => lower.is_null() || upper.is_null(),
            Condition::InSelect { select, .. } => return select.validate(),
            Condition::CompareColumn { .. } | Condition::Null { .. } | Condition::Absent => false,
        };
        if binds_null {
            return Err(SqlError::statement(format!(
                "condition on {subject} binds NULL, which never matches; \
                 use is_null()/is_not_null() or a *_when_present condition"
            )));
        }
        Ok(())
    }

    /// Render `<column> <predicate>`.
    pub(crate) fn render_for(&self, column: &SqlColumn, ctx: &mut RenderContext<'_>) -> Fragment {
        if !self.is_renderable() {
            return Fragment::empty();
        }
        let lhs = ctx.column_name(column);
        self.render_on(&lhs, Some(column), ctx)
    }

    /// Render `<lhs> <predicate>` for an arbitrary left-hand expression.
    /// Values bind against `typed` when a column type is known.
    pub(crate) fn render_on(
        &self,
        lhs: &str,
        typed: Option<&SqlColumn>,
        ctx: &mut RenderContext<'_>,
    ) -> Fragment {
        let bind = |ctx: &mut RenderContext<'_>, value: &ParamValue| match typed {
            Some(column) => ctx.bind_for_column(column, value.clone()),
            None => ctx.bind(value.clone()),
        };
        match self {
            Condition::Absent => Fragment::empty(),
            Condition::Compare { op, value } => {
                Fragment::with_fragment(format!("{lhs} {}", op.symbol())).merge(bind(ctx, value))
            }
            Condition::CompareColumn { op, column: rhs } => {
                let rhs = ctx.column_name(rhs);
                Fragment::with_fragment(format!("{lhs} {} {rhs}", op.symbol()))
            }
            Condition::Like { pattern, negated } => {
                let keyword = if *negated { "not like" } else { "like" };
                Fragment::with_fragment(format!("{lhs} {keyword}")).merge(bind(ctx, pattern))
            }
            Condition::Null { negated } => {
                let keyword = if *negated { "is not null" } else { "is null" };
                Fragment::with_fragment(format!("{lhs} {keyword}"))
            }
            Condition::In { values, negated } if values.is_empty() => {
                Fragment::with_fragment(if *negated { "1 = 1" } else { "1 = 0" })
            }
            Condition::In { values, negated } => {
                let keyword = if *negated { "not in" } else { "in" };
                let list = values
                    .iter()
                    .map(|v| bind(ctx, v))
                    .collect::<FragmentCollector>()
                    .join(", ")
                    .parenthesized();
                Fragment::with_fragment(format!("{lhs} {keyword}")).merge(list)
            }
            Condition::Between {
                lower,
                upper,
                negated,
            } => {
                let keyword = if *negated { "not between" } else { "between" };
                Fragment::with_fragment(format!("{lhs} {keyword}"))
                    .merge(bind(ctx, lower))
                    .merge(Fragment::with_fragment("and"))
                    .merge(bind(ctx, upper))
            }
            Condition::InSelect { select, negated } => {
                let keyword = if *negated { "not in" } else { "in" };
                Fragment::with_fragment(format!("{lhs} {keyword}"))
                    .merge(select.render_fragment(ctx).parenthesized())
            }
        }
    }
}
