//! DELETE statements.

use std::sync::Arc;

use crate::column::SqlColumn;
use crate::condition::Condition;
use crate::criteria::Criteria;
use crate::error::SqlResult;
use crate::paging::PagingModel;
use crate::render::{Fragment, Render, RenderContext};
use crate::statement::Statement;
use crate::table::SqlTable;

/// `delete from <table> [where ...] [limit ?]`
pub fn delete_from(table: &Arc<SqlTable>) -> DeleteModel {
    DeleteModel {
        table: Arc::clone(table),
        where_: Criteria::new(),
        limit: None,
        allow_delete_all: false,
    }
}

/// DELETE statement.
#[derive(Debug, Clone)]
pub struct DeleteModel {
    table: Arc<SqlTable>,
    where_: Criteria,
    limit: Option<u64>,
    /// Whether to allow DELETE without WHERE (dangerous!)
    allow_delete_all: bool,
}

impl DeleteModel {
    /// Allow DELETE without WHERE conditions (dangerous!).
    ///
    /// By default, a DELETE whose WHERE clause renders nothing gets
    /// `where 1 = 0` (no-op). Call this with `true` to allow deleting all rows.
    pub fn allow_delete_all(mut self, allow: bool) -> Self {
        self.allow_delete_all = allow;
        self
    }

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

impl Render for DeleteModel {
    fn render_fragment(&self, ctx: &mut RenderContext<'_>) -> Fragment {
        let table = ctx.table_reference(&self.table);
        let head = Fragment::with_fragment(format!("delete from {table}"));

        let where_ = self.where_.render_fragment(ctx);
        // Absent conditions can empty a WHERE the caller did write.
        if !where_.is_renderable() && !self.allow_delete_all {
            tracing::warn!(
                target: "dynsql.render",
                table = %table,
                "DELETE without WHERE rendered as a no-op; call allow_delete_all(true) to delete every row"
            );
            return head.merge(Fragment::with_fragment("where 1 = 0"));
        }

        head.merge(where_.prefixed("where"))
            .merge(PagingModel::new(self.limit, None).render_fragment(ctx))
    }
}

impl Statement for DeleteModel {
    fn kind(&self) -> &'static str {
        "delete"
    }

    fn validate(&self) -> SqlResult<()> {
        self.where_.validate()
    }
}
