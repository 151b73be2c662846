//! Mock database clients for testing.
//!
//! Provide in-memory results without a live SQL Server instance.

use async_trait::async_trait;
use std::time::Duration;

use super::{ColumnInfo, DatabaseClient, QueryResult, Row, Value};
use crate::error::{AppError, Result};

/// A mock database client that returns a predefined result set.
pub struct MockDatabaseClient {
    result: QueryResult,
}

impl MockDatabaseClient {
    /// Creates a mock client returning a single scalar count of 42.
    pub fn new() -> Self {
        Self::with_result(QueryResult::with_data(
            vec![ColumnInfo::new("(No column name)", "int")],
            vec![vec![Value::Int(42)]],
        ))
    }

    /// Creates a mock client returning the given result for every query.
    pub fn with_result(result: QueryResult) -> Self {
        Self { result }
    }

    /// Creates a mock client returning the given rows and column names.
    pub fn with_rows(columns: Vec<&str>, rows: Vec<Row>) -> Self {
        let columns = columns
            .into_iter()
            .map(|name| ColumnInfo::new(name, "unknown"))
            .collect();
        Self::with_result(QueryResult::with_data(columns, rows))
    }
}

impl Default for MockDatabaseClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn execute_query(&self, _sql: &str) -> Result<QueryResult> {
        Ok(self
            .result
            .clone()
            .with_execution_time(Duration::from_millis(1)))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// A mock database client whose queries always fail.
///
/// Used to exercise the `sql_execution` error path.
pub struct FailingDatabaseClient {
    message: String,
}

impl FailingDatabaseClient {
    /// Creates a failing client that reports the given driver message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn execute_query(&self, _sql: &str) -> Result<QueryResult> {
        Err(AppError::query(self.message.clone()))
    }

    async fn ping(&self) -> Result<()> {
        Err(AppError::connection(self.message.clone()))
    }
}
