//! # dynsql
//!
//! A dialect-neutral renderer for dynamically built SQL statements.
//!
//! ## Features
//!
//! - **Pluggable placeholders**: positional (`?`), named (`:p1`) or MyBatis-style
//!   (`#{parameters.p1}`) via a [`RenderingStrategy`]
//! - **Collision-free parameters**: every bound value gets a key minted from one
//!   sequence per render pass, so unions and nested subqueries never clash
//! - **Runtime-switchable names**: catalog and schema may be resolved on every render
//!   (multi-tenant schema routing without rebuilding statements)
//! - **Optional conditions**: "when present" conditions vanish when their value is absent
//! - **Safe defaults**: DELETE without WHERE renders as a no-op, UPDATE requires SET
//! - **Observability**: each render emits a `tracing` event with the SQL and parameter count
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use dynsql::prelude::*;
//!
//! let orders = Arc::new(SqlTable::new("orders")?.with_schema("sales"));
//! let id = orders.column("id")?;
//! let status = orders.column("status")?;
//!
//! let rendered = select([&id, &status])
//!     .from(&orders)
//!     .where_(&status, Condition::eq("open"))
//!     .and(&id, Condition::gt_when_present(min_id))
//!     .limit(10)
//!     .offset(20)
//!     .render(&NamedRenderingStrategy)?;
//!
//! // select id, status from sales.orders where status = :p1 limit :p2 offset :p3
//! println!("{}", rendered.sql);
//! ```

pub mod column;
pub mod condition;
pub mod config;
pub mod criteria;
pub mod delete;
pub mod error;
pub mod ident;
pub mod insert;
pub mod join;
pub mod paging;
pub mod prelude;
pub mod render;
pub mod select;
pub mod statement;
pub mod table;
pub mod update;
pub mod value;

pub use column::{JdbcType, SelectColumn, SortSpec, SqlColumn};
pub use condition::{Condition, Operator};
pub use config::RenderConfig;
pub use criteria::{Connector, Criteria, Criterion};
pub use delete::{DeleteModel, delete_from};
pub use error::{SqlError, SqlResult};
pub use ident::Ident;
pub use insert::{
    InsertModel, InsertSelectModel, MultiRowInsertModel, insert_into, insert_multiple,
    insert_select,
};
pub use join::{JoinCondition, JoinKind, JoinSpec, JoinTarget};
pub use paging::{PagingModel, PagingStyle};
pub use render::{
    Fragment, LogLevel, MyBatis3RenderingStrategy, NamedRenderingStrategy, Parameters,
    PositionalRenderingStrategy, Render, RenderContext, RenderedStatement, RenderingStrategy,
    Sequence, StrategyKind,
};
pub use select::{SelectModel, UnionKind, count_from, select, select_distinct};
pub use statement::Statement;
pub use table::{NameProvider, NameResolver, SqlTable, compose_qualified_name};
pub use update::{UpdateModel, update};
pub use value::ParamValue;
