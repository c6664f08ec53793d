/// Statement Building Module
///
/// Builds the statement text and bound parameters for every handle
/// operation. Nothing here touches a connection, so the generated SQL can be
/// checked without a server.

use crate::core::db::schema::{ColumnOptions, QualifiedName, LIST_COLUMNS_SQL, LIST_TABLES_SQL};
use crate::core::db::value::Value;
use crate::core::{PgTablesError, Result};
use crate::sql::{check_fragment, quote_ident};

/// Statement text plus the values bound to its `$n` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    fn text(sql: impl Into<String>) -> Self {
        Statement {
            sql: sql.into(),
            params: Vec::new(),
        }
    }
}

/// Represents the statement kinds handles issue
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatementType {
    Select,
    Insert,
    Delete,
    Create,
    Drop,
    Alter,
    Other,
}

impl StatementType {
    /// Classifies a statement by its leading keyword
    pub fn from_sql(sql: &str) -> Self {
        let keyword = sql
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_uppercase();

        match keyword.as_str() {
            "SELECT" => StatementType::Select,
            "INSERT" => StatementType::Insert,
            "DELETE" => StatementType::Delete,
            "CREATE" => StatementType::Create,
            "DROP" => StatementType::Drop,
            "ALTER" => StatementType::Alter,
            _ => StatementType::Other,
        }
    }

    /// Whether the statement changes data or schema and so needs a commit
    pub fn is_mutation(self) -> bool {
        !matches!(self, StatementType::Select | StatementType::Other)
    }
}

fn quote_all<S: AsRef<str>>(columns: &[S]) -> Result<Vec<String>> {
    columns.iter().map(|c| quote_ident(c.as_ref())).collect()
}

fn placeholders(count: usize) -> String {
    (1..=count)
        .map(|n| format!("${n}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn create_table(table: &QualifiedName, tablespace: &str) -> Result<Statement> {
    Ok(Statement::text(format!(
        "CREATE TABLE IF NOT EXISTS {}() TABLESPACE {}",
        table.to_sql()?,
        quote_ident(tablespace)?
    )))
}

pub fn drop_table(table: &QualifiedName) -> Result<Statement> {
    Ok(Statement::text(format!("DROP TABLE {}", table.to_sql()?)))
}

pub fn list_tables() -> Statement {
    Statement::text(LIST_TABLES_SQL)
}

pub fn list_columns(table: &QualifiedName) -> Statement {
    Statement {
        sql: LIST_COLUMNS_SQL.to_string(),
        params: vec![
            Value::Text(table.schema.clone()),
            Value::Text(table.name.clone()),
        ],
    }
}

pub fn select_all(table: &QualifiedName) -> Result<Statement> {
    Ok(Statement::text(format!("SELECT * FROM {}", table.to_sql()?)))
}

/// Touches the table without reading rows; fails if it does not exist.
pub fn select_none(table: &QualifiedName) -> Result<Statement> {
    Ok(Statement::text(format!("SELECT * FROM {} LIMIT 0", table.to_sql()?)))
}

pub fn add_column(
    table: &QualifiedName,
    column: &str,
    datatype: &str,
    options: &ColumnOptions,
) -> Result<Statement> {
    let mut sql = format!(
        "ALTER TABLE {} ADD {} {}",
        table.to_sql()?,
        quote_ident(column)?,
        check_fragment(datatype)?
    );
    if !options.is_empty() {
        sql.push(' ');
        sql.push_str(&options.render()?);
    }
    Ok(Statement::text(sql))
}

/// `SET` needs at least one clause; an empty `options` is rejected.
pub fn alter_column(table: &QualifiedName, column: &str, options: &ColumnOptions) -> Result<Statement> {
    if options.is_empty() {
        return Err(PgTablesError::Fragment {
            fragment: String::new(),
            reason: "ALTER COLUMN ... SET needs at least one clause".to_string(),
        });
    }
    Ok(Statement::text(format!(
        "ALTER TABLE {} ALTER COLUMN {} SET {}",
        table.to_sql()?,
        quote_ident(column)?,
        options.render()?
    )))
}

pub fn drop_column(table: &QualifiedName, column: &str) -> Result<Statement> {
    Ok(Statement::text(format!(
        "ALTER TABLE {} DROP COLUMN {}",
        table.to_sql()?,
        quote_ident(column)?
    )))
}

/// Omits the column clause when `columns` is `None`; the values must then
/// cover every column in declaration order.
pub fn insert<S: AsRef<str>>(
    table: &QualifiedName,
    values: &[Value],
    columns: Option<&[S]>,
) -> Result<Statement> {
    let mut sql = format!("INSERT INTO {}", table.to_sql()?);

    if let Some(columns) = columns {
        if columns.len() != values.len() {
            return Err(PgTablesError::Arity {
                columns: columns.len(),
                values: values.len(),
            });
        }
        if !columns.is_empty() {
            sql.push_str(&format!(" ({})", quote_all(columns)?.join(", ")));
        }
    }

    if values.is_empty() {
        sql.push_str(" DEFAULT VALUES");
    } else {
        sql.push_str(&format!(" VALUES ({})", placeholders(values.len())));
    }

    Ok(Statement {
        sql,
        params: values.to_vec(),
    })
}

/// Matches with `IS NOT DISTINCT FROM` so `NULL` values select `NULL` cells.
pub fn delete<S: AsRef<str>>(table: &QualifiedName, values: &[Value], columns: &[S]) -> Result<Statement> {
    if columns.len() != values.len() || columns.is_empty() {
        return Err(PgTablesError::Arity {
            columns: columns.len(),
            values: values.len(),
        });
    }

    let conditions = quote_all(columns)?
        .into_iter()
        .enumerate()
        .map(|(i, column)| format!("{column} IS NOT DISTINCT FROM ${}", i + 1))
        .collect::<Vec<_>>()
        .join(" AND ");

    Ok(Statement {
        sql: format!("DELETE FROM {} WHERE {}", table.to_sql()?, conditions),
        params: values.to_vec(),
    })
}
