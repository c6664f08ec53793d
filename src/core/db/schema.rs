/// Schema Module
///
/// Names and column definitions used by the catalog and table handles, plus
/// the `information_schema` queries that enumerate tables and columns.

use crate::core::Result;
use crate::sql::{check_fragment, quote_ident};
use std::fmt;

/// Schema used when a name carries none.
pub const DEFAULT_SCHEMA: &str = "public";

/// Tablespace used by `Database::create_table`.
pub const DEFAULT_TABLESPACE: &str = "pg_default";

/// Lists every base table outside the system schemas.
pub(crate) const LIST_TABLES_SQL: &str = "SELECT table_schema::text, table_name::text \
     FROM information_schema.tables \
     WHERE table_type = 'BASE TABLE' \
     AND table_schema NOT IN ('information_schema', 'pg_catalog') \
     ORDER BY table_schema, table_name";

/// Lists one table's columns in declaration order. Binds schema, table.
pub(crate) const LIST_COLUMNS_SQL: &str = "SELECT column_name::text \
     FROM information_schema.columns \
     WHERE table_schema = $1::text AND table_name = $2::text \
     ORDER BY ordinal_position";

/// A `schema.table` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    pub schema: String,
    pub name: String,
}

impl QualifiedName {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        QualifiedName {
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// Renders the name for statement text, quoting each part as needed.
    pub fn to_sql(&self) -> Result<String> {
        Ok(format!("{}.{}", quote_ident(&self.schema)?, quote_ident(&self.name)?))
    }
}

/// `"a.b"` splits on the first dot; a bare `"t"` lands in `public`.
impl From<&str> for QualifiedName {
    fn from(value: &str) -> Self {
        match value.split_once('.') {
            Some((schema, name)) => QualifiedName::new(schema, name),
            None => QualifiedName::new(DEFAULT_SCHEMA, value),
        }
    }
}

impl From<String> for QualifiedName {
    fn from(value: String) -> Self {
        QualifiedName::from(value.as_str())
    }
}

impl From<&QualifiedName> for QualifiedName {
    fn from(value: &QualifiedName) -> Self {
        value.clone()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Clause {
    Flag(String),
    Option(String, String),
}

/// Ordered column definition clauses for `ADD` and `ALTER COLUMN ... SET`.
///
/// Flags render as-is (`NOT NULL`), options as `name value`
/// (`DEFAULT 0`). Clauses render in the order they were added.
///
/// # Examples
///
/// ```
/// use pgtables::ColumnOptions;
///
/// let options = ColumnOptions::new().option("DEFAULT", "0").flag("NOT NULL");
/// assert_eq!(options.render().unwrap(), "DEFAULT 0 NOT NULL");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnOptions {
    clauses: Vec<Clause>,
}

impl ColumnOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flag(mut self, flag: impl Into<String>) -> Self {
        self.clauses.push(Clause::Flag(flag.into()));
        self
    }

    pub fn option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.clauses.push(Clause::Option(name.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Renders the clauses, each fragment screened by `check_fragment`.
    pub fn render(&self) -> Result<String> {
        let mut parts = Vec::with_capacity(self.clauses.len());
        for clause in &self.clauses {
            match clause {
                Clause::Flag(flag) => parts.push(check_fragment(flag)?.to_string()),
                Clause::Option(name, value) => parts.push(format!(
                    "{} {}",
                    check_fragment(name)?,
                    check_fragment(value)?
                )),
            }
        }
        Ok(parts.join(" "))
    }
}
