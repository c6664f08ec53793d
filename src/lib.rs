//! Table and catalog handles over a PostgreSQL connection.
//!
//! A [`Database`] borrows an already-open [`Connection`] and hands out
//! [`Table`] handles. Each handle operation issues one statement, binds
//! every value as a parameter, and commits when it changes anything.
//!
//! ```no_run
//! use pgtables::{ColumnOptions, Database, PgConnection, Value};
//!
//! let conn = PgConnection::connect("host=localhost user=postgres dbname=app")?;
//! let db = Database::new(&conn);
//! let t1 = db.create_table("t1")?;
//! t1.add_column("id", "integer", &ColumnOptions::new())?;
//! t1.insert_row(&[Value::Int(1)], Some(&["id"][..]))?;
//! println!("{}", t1.render()?);
//! # Ok::<(), pgtables::PgTablesError>(())
//! ```

// Core infrastructure modules
pub mod core;

// Feature-specific modules
pub mod catalog;
pub mod config;
pub mod results_grid;
pub mod sql;
pub mod table;

#[cfg(test)]
pub(crate) mod test_utils;

pub use crate::catalog::Database;
pub use crate::core::db::{
    ColumnOptions, Connection, PgConnection, QualifiedName, Row, Value, DEFAULT_SCHEMA,
    DEFAULT_TABLESPACE,
};
pub use crate::core::{PgTablesError, Result};
pub use crate::results_grid::ResultsGrid;
pub use crate::table::{Rows, Table};
