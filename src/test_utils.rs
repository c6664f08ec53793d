/// # Test Utilities Module
///
/// A `Connection` double for unit tests: it records every statement with
/// its bound parameters, counts commits, and replays scripted replies.

use crate::core::db::{Connection, Row, Value};
use crate::core::{PgTablesError, Result};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

enum Reply {
    Rows(Vec<Row>),
    Fail(String),
}

/// Records statements and answers from a queue of scripted replies.
///
/// Each `execute` or `query` call consumes the next reply. With the queue
/// empty, `query` returns no rows and `execute` reports zero rows affected.
#[derive(Default)]
pub struct RecordingConnection {
    log: RefCell<Vec<(String, Vec<Value>)>>,
    replies: RefCell<VecDeque<Reply>>,
    commits: Cell<usize>,
}

impl RecordingConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues rows for the next call.
    pub fn respond(&self, rows: Vec<Row>) -> &Self {
        self.replies.borrow_mut().push_back(Reply::Rows(rows));
        self
    }

    /// Queues a backend failure for the next call.
    pub fn fail_next(&self, message: &str) -> &Self {
        self.replies
            .borrow_mut()
            .push_back(Reply::Fail(message.to_string()));
        self
    }

    /// SQL text of every statement seen so far.
    pub fn statements(&self) -> Vec<String> {
        self.log.borrow().iter().map(|(sql, _)| sql.clone()).collect()
    }

    /// The most recent statement and its parameters.
    pub fn last(&self) -> (String, Vec<Value>) {
        self.log
            .borrow()
            .last()
            .cloned()
            .expect("no statement recorded")
    }

    pub fn commits(&self) -> usize {
        self.commits.get()
    }

    fn record(&self, sql: &str, params: &[Value]) -> Option<Reply> {
        self.log.borrow_mut().push((sql.to_string(), params.to_vec()));
        self.replies.borrow_mut().pop_front()
    }
}

impl Connection for RecordingConnection {
    fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        match self.record(sql, params) {
            Some(Reply::Fail(message)) => Err(PgTablesError::Backend(message)),
            Some(Reply::Rows(rows)) => Ok(rows.len() as u64),
            None => Ok(0),
        }
    }

    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        match self.record(sql, params) {
            Some(Reply::Fail(message)) => Err(PgTablesError::Backend(message)),
            Some(Reply::Rows(rows)) => Ok(rows),
            None => Ok(Vec::new()),
        }
    }

    fn commit(&self) -> Result<()> {
        self.commits.set(self.commits.get() + 1);
        Ok(())
    }
}

/// Builds a one-column text row, the shape catalog queries return.
pub fn text_row(values: &[&str]) -> Row {
    values.iter().map(|v| Value::from(*v)).collect()
}
