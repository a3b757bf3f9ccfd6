//! Table references and qualified-name composition.

use std::sync::Arc;

use crate::column::SqlColumn;
use crate::error::SqlResult;
use crate::ident::Ident;

/// Deferred name lookup. `None` means "absent", not failure.
pub type NameResolver = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Source of a catalog or schema name.
///
/// A `Deferred` provider is called every time the qualified name is composed,
/// so a single table definition can follow runtime state such as a per-tenant
/// schema.
#[derive(Clone)]
pub enum NameProvider {
    Static(String),
    Deferred(NameResolver),
}

impl NameProvider {
    pub fn resolve(&self) -> Option<String> {
        match self {
            NameProvider::Static(name) => Some(name.clone()),
            NameProvider::Deferred(resolver) => resolver(),
        }
    }
}

impl std::fmt::Debug for NameProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NameProvider::Static(name) => f.debug_tuple("Static").field(name).finish(),
            NameProvider::Deferred(_) => f.debug_tuple("Deferred").field(&"<fn>").finish(),
        }
    }
}

/// Compose `catalog.schema.name`, `catalog..name`, `schema.name`, or `name`.
///
/// Each provider is resolved at most once. The schema is only consulted after
/// the catalog has been resolved.
pub fn compose_qualified_name(
    name: &str,
    catalog: Option<&NameProvider>,
    schema: Option<&NameProvider>,
) -> String {
    let resolve_schema = || schema.and_then(NameProvider::resolve);
    match catalog.and_then(NameProvider::resolve) {
        Some(catalog) => match resolve_schema() {
            Some(schema) => format!("{catalog}.{schema}.{name}"),
            // An explicitly empty schema between two separators.
            None => format!("{catalog}..{name}"),
        },
        None => match resolve_schema() {
            Some(schema) => format!("{schema}.{name}"),
            None => name.to_string(),
        },
    }
}

/// Name and qualifiers of a table, shared by every aliased copy of it.
#[derive(Debug, Clone)]
pub(crate) struct TableDefinition {
    name: Ident,
    catalog: Option<NameProvider>,
    schema: Option<NameProvider>,
}

impl TableDefinition {
    pub(crate) fn qualified_name(&self) -> String {
        compose_qualified_name(self.name.as_str(), self.catalog.as_ref(), self.schema.as_ref())
    }
}

/// A table that statements select from, join, insert into, update or delete from.
///
/// Tables are immutable once built and are shared between columns and
/// statements through `Arc`, so the same definition can be rendered from many
/// threads at once. Aliased copies share one definition, so a self-join
/// resolves the qualified name once per render pass.
#[derive(Debug, Clone)]
pub struct SqlTable {
    definition: Arc<TableDefinition>,
    alias: Option<Ident>,
}

impl SqlTable {
    /// Create a table reference. The name must be a non-empty identifier.
    pub fn new(name: &str) -> SqlResult<Self> {
        Ok(Self {
            definition: Arc::new(TableDefinition {
                name: Ident::parse(name)?,
                catalog: None,
                schema: None,
            }),
            alias: None,
        })
    }

    fn definition_mut(&mut self) -> &mut TableDefinition {
        Arc::make_mut(&mut self.definition)
    }

    /// Fixed catalog name.
    pub fn with_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.definition_mut().catalog = Some(NameProvider::Static(catalog.into()));
        self
    }

    /// Catalog name resolved at render time.
    pub fn with_catalog_resolver(
        mut self,
        resolver: impl Fn() -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.definition_mut().catalog = Some(NameProvider::Deferred(Arc::new(resolver)));
        self
    }

    /// Fixed schema name.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.definition_mut().schema = Some(NameProvider::Static(schema.into()));
        self
    }

    /// Schema name resolved at render time.
    pub fn with_schema_resolver(
        mut self,
        resolver: impl Fn() -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.definition_mut().schema = Some(NameProvider::Deferred(Arc::new(resolver)));
        self
    }

    /// Alias used in FROM/JOIN and to qualify this table's columns.
    pub fn with_alias(mut self, alias: &str) -> SqlResult<Self> {
        self.alias = Some(Ident::parse(alias)?);
        Ok(self)
    }

    /// A shared copy of this table under another alias, for self-joins.
    pub fn aliased(&self, alias: &str) -> SqlResult<Arc<SqlTable>> {
        Ok(Arc::new(self.clone().with_alias(alias)?))
    }

    pub fn name(&self) -> &str {
        self.definition.name.as_str()
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_ref().map(Ident::as_str)
    }

    /// The fully-qualified name as of now. Deferred providers are called again
    /// on every invocation.
    pub fn qualified_name(&self) -> String {
        self.definition.qualified_name()
    }

    pub(crate) fn definition(&self) -> &Arc<TableDefinition> {
        &self.definition
    }

    /// A column of this table.
    pub fn column(self: &Arc<Self>, name: &str) -> SqlResult<SqlColumn> {
        SqlColumn::new(name, self)
    }

    /// `*` (or `alias.*`) for this table.
    pub fn all_columns(self: &Arc<Self>) -> SqlColumn {
        SqlColumn::wildcard(self)
    }
}
