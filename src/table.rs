//! Table-level handle.

use crate::catalog::{cell_text, Database};
use crate::core::db::query;
use crate::core::db::schema::{ColumnOptions, QualifiedName};
use crate::core::db::{Row, Value};
use crate::core::Result;
use crate::results_grid::ResultsGrid;
use tracing::info;

/// Row accessor for one table.
///
/// A `Table` is only a name plus a copy of its `Database`; it caches no rows,
/// so two handles for the same table always see each other's committed
/// changes. The name is fixed at construction.
#[derive(Debug, Clone)]
pub struct Table<'c> {
    db: Database<'c>,
    name: QualifiedName,
}

impl<'c> Table<'c> {
    pub fn new(db: Database<'c>, name: QualifiedName) -> Self {
        Table { db, name }
    }

    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    pub fn database(&self) -> Database<'c> {
        self.db
    }

    /// Column names in declaration order.
    pub fn list_columns(&self) -> Result<Vec<String>> {
        let rows = self.db.fetch(&query::list_columns(&self.name))?;
        Ok(rows
            .into_iter()
            .filter_map(|row| row.into_iter().next().map(cell_text))
            .collect())
    }

    /// Every row, in whatever order the server returns them.
    pub fn fetch_all(&self) -> Result<Vec<Row>> {
        self.db.fetch(&query::select_all(&self.name)?)
    }

    /// `ALTER TABLE ... ADD <name> <datatype> <options>`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pgtables::{ColumnOptions, Database, PgConnection};
    ///
    /// let conn = PgConnection::connect("host=localhost user=postgres")?;
    /// let db = Database::new(&conn);
    /// let table = db.create_table("t1")?;
    /// table.add_column("qty", "integer", &ColumnOptions::new().flag("NOT NULL").option("DEFAULT", "0"))?;
    /// # Ok::<(), pgtables::PgTablesError>(())
    /// ```
    pub fn add_column(&self, name: &str, datatype: &str, options: &ColumnOptions) -> Result<()> {
        self.save(&query::add_column(&self.name, name, datatype, options)?)
    }

    /// `ALTER TABLE ... ALTER COLUMN <name> SET <options>`.
    pub fn edit_column(&self, name: &str, options: &ColumnOptions) -> Result<()> {
        self.save(&query::alter_column(&self.name, name, options)?)
    }

    pub fn drop_column(&self, name: &str) -> Result<()> {
        self.save(&query::drop_column(&self.name, name)?)
    }

    /// Inserts one row with its values bound as parameters.
    ///
    /// With `columns` set, values pair up with those columns; otherwise they
    /// must cover every column in declaration order.
    pub fn insert_row(&self, values: &[Value], columns: Option<&[&str]>) -> Result<()> {
        self.save(&query::insert(&self.name, values, columns)?)
    }

    /// Deletes every row whose cells match `values`, pairing values with
    /// `columns` or, when `None`, with all columns in declaration order.
    /// `NULL` matches `NULL`. Returns the number of rows deleted.
    pub fn delete_rows(&self, values: &[Value], columns: Option<&[&str]>) -> Result<u64> {
        let stmt = match columns {
            Some(columns) => query::delete(&self.name, values, columns)?,
            None => {
                let all = self.list_columns()?;
                if all.is_empty() {
                    // Missing and column-less tables both list nothing; let
                    // the server report which one it is.
                    self.db.fetch(&query::select_none(&self.name)?)?;
                }
                query::delete(&self.name, values, all.as_slice())?
            }
        };
        let deleted = self.db.apply(&stmt)?;
        info!(table = %self.name, deleted, "table saved");
        Ok(deleted)
    }

    /// A snapshot of the table's current rows.
    ///
    /// The rows are fetched once, up front; iterating again means calling
    /// `rows` again.
    pub fn rows(&self) -> Result<Rows> {
        Ok(Rows {
            inner: self.fetch_all()?.into_iter(),
        })
    }

    /// Column names plus all rows as a grid.
    pub fn to_grid(&self) -> Result<ResultsGrid> {
        let columns = self.list_columns()?;
        let rows = self.fetch_all()?;
        Ok(ResultsGrid::from_rows(columns, &rows))
    }

    /// Header row and data rows, column-aligned.
    pub fn render(&self) -> Result<String> {
        Ok(self.to_grid()?.render())
    }

    fn save(&self, stmt: &query::Statement) -> Result<()> {
        self.db.apply(stmt)?;
        info!(table = %self.name, "table saved");
        Ok(())
    }
}

/// Point-in-time rows of one table, consumed once.
#[derive(Debug)]
pub struct Rows {
    inner: std::vec::IntoIter<Row>,
}

impl Iterator for Rows {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Rows {}
