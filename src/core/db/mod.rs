/// Database Module
///
/// ## Architecture
///
/// - **Connection** (`connection.rs`): the `Connection` trait and its
///   PostgreSQL implementation
/// - **Values** (`value.rs`): dynamically typed column values and their
///   wire conversions
/// - **Schema** (`schema.rs`): qualified names, column options and catalog
///   queries
/// - **Statements** (`query.rs`): builds statement text and bound parameters
///
/// ## Error Handling
///
/// All operations return the crate's `PgTablesError`; driver errors are
/// carried through unchanged in `PgTablesError::Database`.
pub mod connection;
pub mod query;
pub mod schema;
pub mod value;

pub use connection::*;
pub use query::{Statement, StatementType};
pub use schema::*;
pub use value::*;
