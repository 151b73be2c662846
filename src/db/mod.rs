//! Database abstraction layer.
//!
//! Provides a trait-based interface for query execution, allowing the SQL
//! Server backend and the in-memory test doubles to be used
//! interchangeably.

mod mock;
mod mssql;
mod schema;
mod types;

pub use mock::{FailingDatabaseClient, MockDatabaseClient};
pub use mssql::MssqlClient;
pub use schema::{inventory_schema, ColumnDef, KeyRef, SchemaContext, TableDef};
pub use types::{ColumnInfo, QueryResult, Row, Value};

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ConnectionConfig;
use crate::error::Result;

/// Supported database backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    #[default]
    Mssql,
    // Future: Postgres, etc.
}

impl DatabaseBackend {
    /// Returns the backend as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mssql => "mssql",
        }
    }

    /// Parses a backend from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mssql" | "sqlserver" => Some(Self::Mssql),
            _ => None,
        }
    }

    /// Returns the default port for this backend.
    pub fn default_port(&self) -> u16 {
        match self {
            Self::Mssql => 1433,
        }
    }

    /// Returns the URL scheme for this backend.
    pub fn url_scheme(&self) -> &'static str {
        match self {
            Self::Mssql => "mssql",
        }
    }
}

/// Creates a database client for the given configuration.
///
/// This is the central factory function for database connections.
pub async fn connect(config: &ConnectionConfig) -> Result<Arc<dyn DatabaseClient>> {
    match config.backend {
        DatabaseBackend::Mssql => {
            let client = MssqlClient::connect(config).await?;
            Ok(Arc::new(client))
        }
    }
}

/// Trait defining the interface for database clients.
///
/// All operations are async and return Results with AppError.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Executes a SQL statement and returns the result set.
    async fn execute_query(&self, sql: &str) -> Result<QueryResult>;

    /// Verifies that the database is reachable.
    async fn ping(&self) -> Result<()>;
}
