//! `tracing` events for rendered statements.
//!
//! Enabled by the `tracing` crate feature. Events go to the `pgfluent.sql`
//! target: `debug` for every render, `warn` when a strict render is rejected.

use crate::built::BuiltQuery;
use crate::builder::StatementKind;
use crate::config::QbConfig;
use crate::error::QbError;

/// Truncate to at most `max_bytes`, backing off to a char boundary.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

#[cfg(feature = "tracing")]
fn display_sql(sql: &str, max: Option<usize>) -> String {
    match max {
        Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
        _ => sql.to_string(),
    }
}

#[cfg(feature = "tracing")]
pub(crate) fn rendered(kind: StatementKind, built: &BuiltQuery, config: &QbConfig) {
    if !tracing::enabled!(target: "pgfluent.sql", tracing::Level::DEBUG) {
        return;
    }
    tracing::debug!(
        target: "pgfluent.sql",
        kind = %kind,
        param_count = built.params.len(),
        sql = %display_sql(&built.sql, config.max_log_sql_length),
    );
}

#[cfg(feature = "tracing")]
pub(crate) fn rejected(kind: StatementKind, err: &QbError) {
    tracing::warn!(target: "pgfluent.sql", kind = %kind, error = %err, "statement rejected");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn rendered(_kind: StatementKind, _built: &BuiltQuery, _config: &QbConfig) {}

#[cfg(not(feature = "tracing"))]
pub(crate) fn rejected(_kind: StatementKind, _err: &QbError) {}
