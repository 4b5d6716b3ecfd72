//! Rendered statements and thin execution helpers.

use crate::error::{QbError, QbResult};
use crate::value::Value;
use tokio_postgres::types::ToSql;
use tokio_postgres::{GenericClient, Row};

/// The result of rendering a builder: SQL text and its ordered arguments.
///
/// `params[i]` binds to placeholder `$(i + 1)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl BuiltQuery {
    pub fn new(sql: String, params: Vec<Value>) -> Self {
        Self { sql, params }
    }

    /// The result of rendering a builder with no statement kind.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Split into the `(sql, params)` pair.
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| p as &(dyn ToSql + Sync))
            .collect()
    }

    fn ensure_statement(&self) -> QbResult<()> {
        if self.is_empty() {
            return Err(QbError::malformed("cannot execute an empty statement"));
        }
        Ok(())
    }

    // ==================== Execution ====================
    //
    // These forward to a caller-owned client or transaction.

    /// Execute and return all rows.
    pub async fn query(&self, conn: &impl GenericClient) -> QbResult<Vec<Row>> {
        self.ensure_statement()?;
        conn.query(self.sql.as_str(), &self.params_ref())
            .await
            .map_err(QbError::from_db_error)
    }

    /// Execute and return at most one row.
    pub async fn query_opt(&self, conn: &impl GenericClient) -> QbResult<Option<Row>> {
        self.ensure_statement()?;
        conn.query_opt(self.sql.as_str(), &self.params_ref())
            .await
            .map_err(QbError::from_db_error)
    }

    /// Execute and return exactly one row; zero rows is [`QbError::NotFound`].
    pub async fn query_one(&self, conn: &impl GenericClient) -> QbResult<Row> {
        self.query_opt(conn)
            .await?
            .ok_or_else(|| QbError::not_found("Expected 1 row, got 0"))
    }

    /// Execute and return the affected row count.
    pub async fn execute(&self, conn: &impl GenericClient) -> QbResult<u64> {
        self.ensure_statement()?;
        conn.execute(self.sql.as_str(), &self.params_ref())
            .await
            .map_err(QbError::from_db_error)
    }
}
