/// Core Module for pgtables
///
/// Shared infrastructure used by the catalog and table handles: the
/// connection seam, column values, SQL text helpers and the error type.

pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{PgTablesError, Result};
