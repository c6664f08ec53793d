//! Database-level handle.
//!
//! `Database` wraps one borrowed connection and hands out `Table` handles.
//! It keeps no state besides the connection reference, so it is `Copy` and
//! every `Table` carries its own copy.

use crate::core::db::query::{self, Statement, StatementType};
use crate::core::db::schema::{QualifiedName, DEFAULT_TABLESPACE};
use crate::core::db::{Connection, Row, Value};
use crate::core::Result;
use crate::results_grid::render_catalog;
use crate::table::Table;
use std::fmt;
use tracing::{debug, info};

/// Catalog accessor over an injected connection.
///
/// The connection is owned by the caller; `Database` never opens or closes
/// it. Every mutating operation commits before returning.
#[derive(Clone, Copy)]
pub struct Database<'c> {
    conn: &'c dyn Connection,
}

impl<'c> Database<'c> {
    pub fn new(conn: &'c dyn Connection) -> Self {
        info!("database handle initialized");
        Database { conn }
    }

    pub fn connection(&self) -> &'c dyn Connection {
        self.conn
    }

    /// Creates the table if it does not exist, in the default tablespace.
    pub fn create_table(&self, name: impl Into<QualifiedName>) -> Result<Table<'c>> {
        self.create_table_in(name, DEFAULT_TABLESPACE)
    }

    /// Creates a column-less table if it does not exist, in `tablespace`.
    ///
    /// Calling this for an existing table is not an error; the returned
    /// handle refers to the existing table.
    pub fn create_table_in(&self, name: impl Into<QualifiedName>, tablespace: &str) -> Result<Table<'c>> {
        let name = name.into();
        self.apply(&query::create_table(&name, tablespace)?)?;
        Ok(Table::new(*self, name))
    }

    /// Returns a handle without checking that the table exists; a missing
    /// table surfaces as an error on first use.
    pub fn table(&self, name: impl Into<QualifiedName>) -> Table<'c> {
        Table::new(*self, name.into())
    }

    /// Drops the table. Fails with the server's error if it does not exist.
    pub fn drop_table(&self, name: impl Into<QualifiedName>) -> Result<()> {
        let name = name.into();
        self.apply(&query::drop_table(&name)?)?;
        Ok(())
    }

    /// Every base table outside `information_schema` and `pg_catalog`,
    /// ordered by schema then name.
    pub fn list_tables(&self) -> Result<Vec<QualifiedName>> {
        let rows = self.fetch(&query::list_tables())?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let mut cells = row.into_iter();
                match (cells.next(), cells.next()) {
                    (Some(schema), Some(name)) => {
                        Some(QualifiedName::new(cell_text(schema), cell_text(name)))
                    }
                    _ => None,
                }
            })
            .collect())
    }

    /// A handle for every table `list_tables` reports.
    pub fn tables(&self) -> Result<Vec<Table<'c>>> {
        Ok(self
            .list_tables()?
            .into_iter()
            .map(|name| Table::new(*self, name))
            .collect())
    }

    /// Renders every table under a dashed name header, or `empty` when
    /// there are no tables.
    pub fn render(&self) -> Result<String> {
        let mut sections = Vec::new();
        for table in self.tables()? {
            sections.push((table.name().to_string(), table.render()?));
        }
        Ok(render_catalog(&sections))
    }

    /// Runs a query and returns its rows.
    pub(crate) fn fetch(&self, stmt: &Statement) -> Result<Vec<Row>> {
        self.conn.query(&stmt.sql, &stmt.params)
    }

    /// Executes a statement, committing when it changes data or schema.
    pub(crate) fn apply(&self, stmt: &Statement) -> Result<u64> {
        let affected = self.conn.execute(&stmt.sql, &stmt.params)?;
        let kind = StatementType::from_sql(&stmt.sql);
        if kind.is_mutation() {
            self.conn.commit()?;
            debug!(?kind, affected, "committed");
        }
        Ok(affected)
    }
}

impl fmt::Debug for Database<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

/// Catalog cells are text; anything else is shown as rendered.
pub(crate) fn cell_text(value: Value) -> String {
    match value {
        Value::Text(text) => text,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PgTablesError;
    use crate::test_utils::{text_row, RecordingConnection};

    #[test]
    fn test_create_table_commits_and_returns_handle() {
        let conn = RecordingConnection::new();
        let db = Database::new(&conn);

        let table = db.create_table("t1").unwrap();

        assert_eq!(table.name(), &QualifiedName::new("public", "t1"));
        assert_eq!(
            conn.statements(),
            vec!["CREATE TABLE IF NOT EXISTS public.t1() TABLESPACE pg_default"]
        );
        assert_eq!(conn.commits(), 1);
    }

    #[test]
    fn test_create_table_twice_yields_same_table() {
        let conn = RecordingConnection::new();
        let db = Database::new(&conn);

        let first = db.create_table("t1").unwrap();
        let second = db.create_table("t1").unwrap();

        assert_eq!(first.name(), second.name());
        assert_eq!(conn.commits(), 2);
    }

    #[test]
    fn test_create_table_in_custom_schema_and_tablespace() {
        let conn = RecordingConnection::new();
        let db = Database::new(&conn);

        db.create_table_in("sales.orders", "fast_disk").unwrap();

        assert_eq!(
            conn.last().0,
            "CREATE TABLE IF NOT EXISTS sales.orders() TABLESPACE fast_disk"
        );
    }

    #[test]
    fn test_table_does_not_touch_connection() {
        let conn = RecordingConnection::new();
        let db = Database::new(&conn);

        let table = db.table("missing");

        assert_eq!(table.name().to_string(), "public.missing");
        assert!(conn.statements().is_empty());
    }

    #[test]
    fn test_drop_table_commits() {
        let conn = RecordingConnection::new();
        let db = Database::new(&conn);

        db.drop_table("t1").unwrap();

        assert_eq!(conn.statements(), vec!["DROP TABLE public.t1"]);
        assert_eq!(conn.commits(), 1);
    }

    #[test]
    fn test_drop_missing_table_propagates_error() {
        let conn = RecordingConnection::new();
        conn.fail_next("table \"nope\" does not exist");
        let db = Database::new(&conn);

        match db.drop_table("nope") {
            Err(PgTablesError::Backend(msg)) => assert!(msg.contains("does not exist")),
            other => panic!("Expected Backend error, got {:?}", other),
        }
        assert_eq!(conn.commits(), 0);
    }

    #[test]
    fn test_list_tables() {
        let conn = RecordingConnection::new();
        conn.respond(vec![
            text_row(&["public", "t1"]),
            text_row(&["sales", "orders"]),
        ]);
        let db = Database::new(&conn);

        let tables = db.list_tables().unwrap();

        assert_eq!(
            tables,
            vec![QualifiedName::new("public", "t1"), QualifiedName::new("sales", "orders")]
        );
        assert!(conn.last().0.contains("information_schema.tables"));
    }

    #[test]
    fn test_empty_catalog() {
        let conn = RecordingConnection::new();
        let db = Database::new(&conn);

        assert!(db.list_tables().unwrap().is_empty());
        assert_eq!(db.render().unwrap(), "empty");
    }

    #[test]
    fn test_render_catalog() {
        let conn = RecordingConnection::new();
        conn.respond(vec![text_row(&["public", "t1"])]) // list_tables
            .respond(vec![text_row(&["id"])]) // list_columns
            .respond(vec![vec![Value::Int(1)]]); // fetch_all
        let db = Database::new(&conn);

        assert_eq!(db.render().unwrap(), "-public.t1----\nid\n1 ");
    }
}
