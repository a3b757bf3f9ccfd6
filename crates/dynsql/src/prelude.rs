//! Convenient imports for typical `dynsql` usage.
//!
//! ```ignore
//! use dynsql::prelude::*;
//! ```

pub use crate::{
    Condition, Criteria, JoinCondition, JoinSpec, MyBatis3RenderingStrategy,
    NamedRenderingStrategy, Operator, ParamValue, PositionalRenderingStrategy, RenderConfig,
    RenderedStatement, SelectColumn, SelectModel, SqlColumn, SqlError, SqlResult, SqlTable,
    Statement, count_from, delete_from, insert_into, insert_multiple, insert_select, select,
    select_distinct, update,
};
