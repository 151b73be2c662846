//! SQL Server database client.
//!
//! Implements the `DatabaseClient` trait over tiberius with a deadpool
//! connection pool. Every request checks a connection out of the pool and
//! returns it on all exit paths, so no two requests ever share a live
//! statement stream.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use deadpool::managed::{self, Metrics, Object, Pool, RecycleResult};
use tiberius::{AuthMethod, Client, ColumnData, Config as TiberiusConfig, FromSql};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::debug;

use crate::config::ConnectionConfig;
use crate::db::{ColumnInfo, DatabaseClient, QueryResult, Row, Value};
use crate::error::{AppError, Result};

/// Query timeout in seconds.
const QUERY_TIMEOUT_SECS: u64 = 30;

/// Maximum number of pooled connections.
const MAX_POOL_SIZE: usize = 5;

type MssqlConnection = Client<Compat<TcpStream>>;

/// Deadpool manager that opens and validates tiberius connections.
pub struct ConnectionManager {
    config: TiberiusConfig,
}

impl managed::Manager for ConnectionManager {
    type Type = MssqlConnection;
    type Error = tiberius::error::Error;

    async fn create(&self) -> std::result::Result<MssqlConnection, Self::Error> {
        let tcp = TcpStream::connect(self.config.get_addr()).await?;
        tcp.set_nodelay(true)?;
        Client::connect(self.config.clone(), tcp.compat_write()).await
    }

    async fn recycle(
        &self,
        conn: &mut MssqlConnection,
        _metrics: &Metrics,
    ) -> RecycleResult<Self::Error> {
        conn.simple_query("SELECT 1")
            .await
            .map_err(managed::RecycleError::Backend)?
            .into_results()
            .await
            .map_err(managed::RecycleError::Backend)?;
        Ok(())
    }
}

/// SQL Server database client backed by a connection pool.
pub struct MssqlClient {
    pool: Pool<ConnectionManager>,
}

impl MssqlClient {
    /// Builds the connection pool for the given configuration.
    ///
    /// Connections are opened lazily; use [`DatabaseClient::ping`] to verify
    /// reachability at startup.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let manager = ConnectionManager {
            config: tiberius_config(config)?,
        };

        let pool = Pool::builder(manager)
            .max_size(MAX_POOL_SIZE)
            .build()
            .map_err(|e| AppError::connection(format!("Failed to build connection pool: {e}")))?;

        Ok(Self { pool })
    }

    async fn acquire(&self) -> Result<Object<ConnectionManager>> {
        self.pool.get().await.map_err(|e| {
            AppError::connection(format!("Failed to acquire database connection: {e}"))
        })
    }
}

#[async_trait]
impl DatabaseClient for MssqlClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        let start = Instant::now();
        let mut conn = self.acquire().await?;

        let fetch = async {
            let mut stream = conn.simple_query(sql).await?;
            let columns = stream.columns().await?.map(<[tiberius::Column]>::to_vec);
            let rows = stream.into_first_result().await?;
            Ok::<_, tiberius::error::Error>((columns, rows))
        };

        let (columns, raw_rows) =
            tokio::time::timeout(Duration::from_secs(QUERY_TIMEOUT_SECS), fetch)
                .await
                .map_err(|_| {
                    AppError::query(format!("Query timed out after {QUERY_TIMEOUT_SECS} seconds"))
                })?
                .map_err(|e| AppError::query(e.to_string()))?;

        let execution_time = start.elapsed();

        let columns: Vec<ColumnInfo> = columns
            .unwrap_or_default()
            .iter()
            .map(|c| {
                ColumnInfo::new(
                    display_column_name(c.name()),
                    format!("{:?}", c.column_type()),
                )
            })
            .collect();

        let rows: Vec<Row> = raw_rows.iter().map(convert_row).collect();
        let row_count = rows.len();

        debug!(rows = row_count, elapsed_ms = execution_time.as_millis() as u64, "query executed");

        Ok(QueryResult {
            columns,
            rows,
            execution_time,
            row_count,
        })
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.acquire().await?;
        conn.simple_query("SELECT 1")
            .await
            .map_err(|e| AppError::connection(e.to_string()))?
            .into_results()
            .await
            .map_err(|e| AppError::connection(e.to_string()))?;
        Ok(())
    }
}

/// Builds a tiberius configuration from the service connection config.
fn tiberius_config(config: &ConnectionConfig) -> Result<TiberiusConfig> {
    if let Some(ado) = &config.ado_string {
        return TiberiusConfig::from_ado_string(ado)
            .map_err(|e| AppError::config(format!("Invalid ADO connection string: {e}")));
    }

    let mut tc = TiberiusConfig::new();
    tc.host(config.host.as_deref().unwrap_or("localhost"));
    tc.port(config.port);

    let database = config
        .database
        .as_deref()
        .ok_or_else(|| AppError::config("Database name is required"))?;
    tc.database(database);

    match (&config.user, &config.password) {
        (Some(user), Some(password)) => tc.authentication(AuthMethod::sql_server(user, password)),
        (Some(user), None) => tc.authentication(AuthMethod::sql_server(user, "")),
        (None, _) => {
            return Err(AppError::config(
                "Database user is required (or set MSSQL_ADO_STRING for integrated authentication)",
            ))
        }
    }

    if config.trust_certificate {
        tc.trust_cert();
    }

    Ok(tc)
}

/// SQL Server reports computed columns without an alias as an empty name.
fn display_column_name(name: &str) -> String {
    if name.is_empty() {
        "(No column name)".to_string()
    } else {
        name.to_string()
    }
}

fn convert_row(row: &tiberius::Row) -> Row {
    row.cells().map(|(_, data)| convert_value(data)).collect()
}

fn convert_value(data: &ColumnData<'static>) -> Value {
    match data {
        ColumnData::Bit(v) => v.map(Value::Bool).unwrap_or(Value::Null),
        ColumnData::U8(v) => v.map(|x| Value::Int(i64::from(x))).unwrap_or(Value::Null),
        ColumnData::I16(v) => v.map(|x| Value::Int(i64::from(x))).unwrap_or(Value::Null),
        ColumnData::I32(v) => v.map(|x| Value::Int(i64::from(x))).unwrap_or(Value::Null),
        ColumnData::I64(v) => v.map(Value::Int).unwrap_or(Value::Null),
        ColumnData::F32(v) => v.map(|x| Value::Float(f64::from(x))).unwrap_or(Value::Null),
        ColumnData::F64(v) => v.map(Value::Float).unwrap_or(Value::Null),
        ColumnData::Numeric(v) => v
            .map(|n| Value::Float(n.value() as f64 / 10f64.powi(i32::from(n.scale()))))
            .unwrap_or(Value::Null),
        ColumnData::String(v) => v
            .as_ref()
            .map(|s| Value::String(s.to_string()))
            .unwrap_or(Value::Null),
        ColumnData::Guid(v) => v
            .map(|g| Value::String(g.to_string()))
            .unwrap_or(Value::Null),
        ColumnData::Binary(v) => v
            .as_ref()
            .map(|b| Value::Bytes(b.to_vec()))
            .unwrap_or(Value::Null),
        ColumnData::Xml(v) => v
            .as_ref()
            .map(|x| Value::String(x.to_string()))
            .unwrap_or(Value::Null),
        data @ (ColumnData::DateTime(_)
        | ColumnData::SmallDateTime(_)
        | ColumnData::DateTime2(_)) => chrono::NaiveDateTime::from_sql(data)
            .ok()
            .flatten()
            .map(|dt| Value::String(dt.to_string()))
            .unwrap_or(Value::Null),
        data @ ColumnData::Date(_) => chrono::NaiveDate::from_sql(data)
            .ok()
            .flatten()
            .map(|d| Value::String(d.to_string()))
            .unwrap_or(Value::Null),
        data @ ColumnData::Time(_) => chrono::NaiveTime::from_sql(data)
            .ok()
            .flatten()
            .map(|t| Value::String(t.to_string()))
            .unwrap_or(Value::Null),
        data @ ColumnData::DateTimeOffset(_) => chrono::DateTime::<chrono::Utc>::from_sql(data)
            .ok()
            .flatten()
            .map(|dt| Value::String(dt.to_string()))
            .unwrap_or(Value::Null),
        #[allow(unreachable_patterns)]
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_column_name_empty() {
        assert_eq!(display_column_name(""), "(No column name)");
        assert_eq!(display_column_name("AssetName"), "AssetName");
    }

    #[test]
    fn test_convert_integer_values() {
        assert_eq!(convert_value(&ColumnData::I32(Some(7))), Value::Int(7));
        assert_eq!(convert_value(&ColumnData::I64(Some(-3))), Value::Int(-3));
        assert_eq!(convert_value(&ColumnData::U8(Some(255))), Value::Int(255));
        assert_eq!(convert_value(&ColumnData::I32(None)), Value::Null);
    }

    #[test]
    fn test_convert_text_and_bool_values() {
        assert_eq!(
            convert_value(&ColumnData::String(Some("WH1".into()))),
            Value::String("WH1".to_string())
        );
        assert_eq!(convert_value(&ColumnData::Bit(Some(true))), Value::Bool(true));
        assert_eq!(convert_value(&ColumnData::String(None)), Value::Null);
    }

    #[test]
    fn test_convert_float_values() {
        assert_eq!(
            convert_value(&ColumnData::F64(Some(12.5))),
            Value::Float(12.5)
        );
        assert_eq!(convert_value(&ColumnData::F32(None)), Value::Null);
    }

    #[test]
    fn test_tiberius_config_requires_database() {
        let config = ConnectionConfig {
            user: Some("sa".to_string()),
            ..ConnectionConfig::default()
        };
        let err = tiberius_config(&config).unwrap_err();
        assert!(err.to_string().contains("Database name is required"));
    }

    #[test]
    fn test_tiberius_config_requires_user_without_ado_string() {
        let config = ConnectionConfig {
            database: Some("InventoryDB".to_string()),
            ..ConnectionConfig::default()
        };
        let err = tiberius_config(&config).unwrap_err();
        assert!(err.to_string().contains("Database user is required"));
    }

    #[test]
    fn test_tiberius_config_accepts_sql_auth() {
        let config = ConnectionConfig {
            host: Some("db.example.com".to_string()),
            database: Some("InventoryDB".to_string()),
            user: Some("sa".to_string()),
            password: Some("secret".to_string()),
            ..ConnectionConfig::default()
        };
        assert!(tiberius_config(&config).is_ok());
    }

    #[test]
    fn test_tiberius_config_accepts_ado_string() {
        let config = ConnectionConfig {
            ado_string: Some(
                "server=tcp:localhost,1433;database=InventoryDB;IntegratedSecurity=true;TrustServerCertificate=true".to_string(),
            ),
            ..ConnectionConfig::default()
        };
        assert!(tiberius_config(&config).is_ok());
    }
}
