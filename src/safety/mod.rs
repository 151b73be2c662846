//! Read-only guard for generated SQL.
//!
//! The prompt instructs the model to emit exactly one SELECT statement, but
//! prompt text is not an enforcement mechanism. Before anything reaches the
//! database, the generated text is parsed with the T-SQL dialect and
//! rejected unless it is a single query statement. Unparseable input is
//! rejected rather than executed.

use std::fmt;

use sqlparser::ast::Statement;
use sqlparser::dialect::MsSqlDialect;
use sqlparser::parser::Parser;
use thiserror::Error;

/// The kind of SQL statement detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Merge,
    Drop,
    Truncate,
    Alter,
    Create,
    Grant,
    Revoke,
    Explain,
    Other,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Merge => "MERGE",
            Self::Drop => "DROP",
            Self::Truncate => "TRUNCATE",
            Self::Alter => "ALTER",
            Self::Create => "CREATE",
            Self::Grant => "GRANT",
            Self::Revoke => "REVOKE",
            Self::Explain => "EXPLAIN",
            Self::Other => "non-SELECT",
        };
        write!(f, "{name}")
    }
}

/// Reason a generated statement was refused execution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SafetyViolation {
    #[error("the model returned an empty statement")]
    Empty,

    #[error("the statement could not be parsed: {0}")]
    Unparseable(String),

    #[error("expected exactly one statement, found {0}")]
    MultipleStatements(usize),

    #[error("only SELECT statements may be executed, found {0}")]
    NotReadOnly(StatementKind),
}

/// Classifies a parsed statement by its top-level kind.
///
/// `Statement::Query` covers plain SELECT as well as `WITH ... SELECT`
/// common table expressions.
pub fn classify_statement(statement: &Statement) -> StatementKind {
    match statement {
        Statement::Query { .. } => StatementKind::Select,
        Statement::Insert { .. } => StatementKind::Insert,
        Statement::Update { .. } => StatementKind::Update,
        Statement::Delete { .. } => StatementKind::Delete,
        Statement::Merge { .. } => StatementKind::Merge,
        Statement::Drop { .. } => StatementKind::Drop,
        Statement::Truncate { .. } => StatementKind::Truncate,
        Statement::AlterTable { .. } | Statement::AlterIndex { .. } | Statement::AlterView { .. } => {
            StatementKind::Alter
        }
        Statement::CreateTable { .. }
        | Statement::CreateView { .. }
        | Statement::CreateIndex { .. }
        | Statement::CreateDatabase { .. }
        | Statement::CreateSchema { .. } => StatementKind::Create,
        Statement::Grant { .. } => StatementKind::Grant,
        Statement::Revoke { .. } => StatementKind::Revoke,
        Statement::Explain { .. } => StatementKind::Explain,
        _ => StatementKind::Other,
    }
}

/// Verifies that `sql` is a single read-only statement.
///
/// Returns the violation instead of executing anything otherwise.
pub fn ensure_read_only(sql: &str) -> Result<(), SafetyViolation> {
    let trimmed = sql.trim();
    if trimmed.is_empty() {
        return Err(SafetyViolation::Empty);
    }

    let statements = Parser::parse_sql(&MsSqlDialect {}, trimmed)
        .map_err(|e| SafetyViolation::Unparseable(e.to_string()))?;

    match statements.as_slice() {
        [] => Err(SafetyViolation::Empty),
        [statement] => match classify_statement(statement) {
            StatementKind::Select => Ok(()),
            kind => Err(SafetyViolation::NotReadOnly(kind)),
        },
        _ => Err(SafetyViolation::MultipleStatements(statements.len())),
    }
}
