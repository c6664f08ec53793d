/// Connection Module
///
/// The seam between the handles and a live database. Handles only ever
/// execute one statement, fetch rows, and commit; everything else (opening,
/// authenticating, closing) belongs to whoever owns the connection.

use crate::core::db::query::StatementType;
use crate::core::db::value::{Row, Value};
use crate::core::Result;
use postgres::types::{ToSql, Type};
use postgres::{Client, NoTls};
use std::cell::{Cell, RefCell};
use tracing::{debug, warn};

/// A live, already-authenticated database connection.
///
/// Methods take `&self` so that a `Database` and every `Table` derived from
/// it can share one borrowed connection. Implementations are free to use
/// interior mutability and need not be `Sync`.
pub trait Connection {
    /// Executes one statement and returns the number of rows affected.
    fn execute(&self, sql: &str, params: &[Value]) -> Result<u64>;

    /// Runs one query and returns all of its rows.
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>>;

    /// Makes every statement since the last commit durable.
    fn commit(&self) -> Result<()>;
}

/// `Connection` over a blocking `postgres::Client`.
///
/// Statements run inside a transaction that is opened on first use and
/// closed by `commit`. A failing statement rolls that transaction back so
/// the connection stays usable.
pub struct PgConnection {
    client: RefCell<Client>,
    in_transaction: Cell<bool>,
}

impl PgConnection {
    pub fn new(client: Client) -> Self {
        PgConnection {
            client: RefCell::new(client),
            in_transaction: Cell::new(false),
        }
    }

    /// Opens a connection from a libpq-style string or URL, without TLS.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pgtables::PgConnection;
    ///
    /// let conn = PgConnection::connect("host=localhost user=postgres dbname=app")?;
    /// # Ok::<(), pgtables::PgTablesError>(())
    /// ```
    pub fn connect(params: &str) -> Result<Self> {
        let client = Client::connect(params, NoTls)?;
        Ok(PgConnection::new(client))
    }

    /// Gives the client back, discarding any uncommitted work.
    pub fn into_inner(self) -> Client {
        self.client.into_inner()
    }

    fn run<T>(
        &self,
        op: impl FnOnce(&mut Client) -> std::result::Result<T, postgres::Error>,
    ) -> Result<T> {
        let mut client = self.client.borrow_mut();

        if !self.in_transaction.get() {
            client.batch_execute("BEGIN")?;
            self.in_transaction.set(true);
        }

        match op(&mut client) {
            Ok(value) => Ok(value),
            Err(e) => {
                if let Err(rollback_err) = client.batch_execute("ROLLBACK") {
                    warn!("rollback after failed statement also failed: {}", rollback_err);
                }
                self.in_transaction.set(false);
                Err(e.into())
            }
        }
    }
}

fn as_params(values: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    values.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
}

/// Wraps a `SELECT` so that every result column `Value` cannot decode
/// (`time`, `interval`, arrays, ...) comes back cast to text. Columns are
/// renamed positionally, so duplicate or odd output names do not matter.
/// Returns `None` when no rewrite is needed.
pub(crate) fn text_projection(sql: &str, columns: &[Type]) -> Option<String> {
    if StatementType::from_sql(sql) != StatementType::Select
        || columns.iter().all(Value::decodes)
    {
        return None;
    }

    let aliases: Vec<String> = (1..=columns.len()).map(|i| format!("c{i}")).collect();
    let projection = columns
        .iter()
        .zip(&aliases)
        .map(|(ty, alias)| {
            if Value::decodes(ty) {
                format!("q.{alias}")
            } else {
                format!("q.{alias}::text")
            }
        })
        .collect::<Vec<_>>()
        .join(", ");

    Some(format!(
        "SELECT {projection} FROM ({}) AS q({})",
        sql.trim_end().trim_end_matches(';'),
        aliases.join(", ")
    ))
}

impl Connection for PgConnection {
    fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        debug!(sql, params = params.len(), "execute");
        let params = as_params(params);
        self.run(|client| client.execute(sql, &params))
    }

    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        debug!(sql, params = params.len(), "query");
        let params = as_params(params);
        let rows = self.run(|client| {
            let stmt = client.prepare(sql)?;
            let types: Vec<Type> = stmt.columns().iter().map(|c| c.type_().clone()).collect();
            match text_projection(sql, &types) {
                Some(wrapped) => {
                    debug!(sql = %wrapped, "casting undecodable columns to text");
                    client.query(wrapped.as_str(), &params)
                }
                None => client.query(&stmt, &params),
            }
        })?;

        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut values = Vec::with_capacity(row.len());
            for i in 0..row.len() {
                values.push(row.try_get::<_, Value>(i)?);
            }
            out.push(values);
        }
        Ok(out)
    }

    fn commit(&self) -> Result<()> {
        if !self.in_transaction.get() {
            return Ok(());
        }
        // A failed COMMIT still ends the transaction server-side.
        let result = self.client.borrow_mut().batch_execute("COMMIT");
        self.in_transaction.set(false);
        Ok(result?)
    }
}
