//! Fluent statement builder.
//!
//! [`SqlBuilder`] accumulates one SELECT/INSERT/UPDATE/DELETE statement and
//! renders it on demand into a [`BuiltQuery`](crate::BuiltQuery): the SQL text
//! with `?` markers renumbered to `$1, $2, ...`, and the arguments in the same
//! order as the placeholders.
//!
//! ## Design
//!
//! - Every method consumes the builder and returns the updated value.
//!   Branching from a shared prefix is an explicit `clone()`, so extending one
//!   branch is never visible from another.
//! - The statement kind is last-write-wins. [`SqlBuilder::build`] never fails
//!   and renders whatever the current kind produces;
//!   [`SqlBuilder::try_build`] enforces the [`StatementKind::accepts`] table
//!   and per-clause marker counts.
//!
//! ```ignore
//! use pgfluent::select;
//!
//! let q = select(["id", "name"])
//!     .from("users")
//!     .and_where("age > ?", 18)
//!     .order_by("created_at DESC")
//!     .limit(10)
//!     .build();
//! assert_eq!(q.sql, "SELECT id, name FROM users WHERE age > $1 ORDER BY created_at DESC LIMIT 10");
//! ```

mod render;

#[cfg(test)]
mod tests;

use crate::config::QbConfig;
use crate::error::{QbError, QbResult};
use crate::value::Value;
use std::fmt;

/// The SQL operation a builder renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatementKind {
    #[default]
    Unset,
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    /// Whether state recorded by `op` is rendered for this kind.
    pub fn accepts(self, op: Operation) -> bool {
        use Operation::*;
        match self {
            StatementKind::Unset => false,
            StatementKind::Select => {
                matches!(op, SelectColumns | Where | OrderBy | Limit | Offset)
            }
            StatementKind::Insert => matches!(op, Columns | Values | Returning),
            StatementKind::Update => matches!(op, Set | Where | Returning),
            StatementKind::Delete => matches!(op, Where | Returning),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Unset => "UNSET",
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builder operations that leave state behind for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SelectColumns,
    Columns,
    Values,
    Set,
    Where,
    Returning,
    OrderBy,
    Limit,
    Offset,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::SelectColumns => "SELECT columns",
            Operation::Columns => "COLUMNS",
            Operation::Values => "VALUES",
            Operation::Set => "SET",
            Operation::Where => "WHERE",
            Operation::Returning => "RETURNING",
            Operation::OrderBy => "ORDER BY",
            Operation::Limit => "LIMIT",
            Operation::Offset => "OFFSET",
        };
        f.write_str(name)
    }
}

/// A SQL fragment with its own ordered arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub template: String,
    pub args: Vec<Value>,
}

impl Clause {
    pub fn new(template: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            template: template.into(),
            args,
        }
    }
}

/// Fluent SELECT/INSERT/UPDATE/DELETE builder.
#[must_use]
#[derive(Debug, Clone, Default)]
pub struct SqlBuilder {
    kind: StatementKind,
    table: String,
    select_columns: Vec<String>,
    insert_columns: Vec<String>,
    insert_values: Vec<Value>,
    set_clauses: Vec<Clause>,
    where_clauses: Vec<Clause>,
    returning_columns: Vec<String>,
    order_by: String,
    limit: Option<i64>,
    offset: Option<i64>,
    config: QbConfig,
}

/// Start a SELECT with the given columns (empty renders `*`).
pub fn select<I, S>(columns: I) -> SqlBuilder
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    SqlBuilder::new().select(columns)
}

/// Start an INSERT into `table`.
pub fn insert(table: &str) -> SqlBuilder {
    SqlBuilder::new().insert(table)
}

/// Start an UPDATE of `table`.
pub fn update(table: &str) -> SqlBuilder {
    SqlBuilder::new().update(table)
}

/// Start a DELETE; pair with [`SqlBuilder::from`].
pub fn delete() -> SqlBuilder {
    SqlBuilder::new().delete()
}

impl SqlBuilder {
    /// Create an empty builder. Rendering it yields an empty statement.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a rendering configuration.
    pub fn with_config(mut self, config: QbConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &QbConfig {
        &self.config
    }

    pub fn statement_kind(&self) -> StatementKind {
        self.kind
    }

    // ==================== Entry points ====================

    /// SELECT the given columns (appended to any selected earlier).
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.kind = StatementKind::Select;
        self.select_columns
            .extend(columns.into_iter().map(Into::into));
        self
    }

    /// SELECT `*`.
    pub fn select_all(mut self) -> Self {
        self.kind = StatementKind::Select;
        self
    }

    pub fn insert(mut self, table: &str) -> Self {
        self.kind = StatementKind::Insert;
        self.table = table.to_string();
        self
    }

    pub fn update(mut self, table: &str) -> Self {
        self.kind = StatementKind::Update;
        self.table = table.to_string();
        self
    }

    pub fn delete(mut self) -> Self {
        self.kind = StatementKind::Delete;
        self
    }

    // ==================== Modifiers ====================

    /// Set the table. An empty table omits `FROM` for SELECT.
    pub fn from(mut self, table: &str) -> Self {
        self.table = table.to_string();
        self
    }

    /// Append INSERT column names.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert_columns
            .extend(columns.into_iter().map(Into::into));
        self
    }

    /// Append INSERT values, one placeholder each.
    pub fn values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.insert_values
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Append a single INSERT value.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.insert_values.push(value.into());
        self
    }

    /// Append a SET assignment with one argument, e.g. `set("price = ?", 10)`.
    pub fn set(self, template: &str, arg: impl Into<Value>) -> Self {
        self.set_args(template, [arg.into()])
    }

    /// Append a SET assignment with any number of arguments.
    pub fn set_args<I, V>(mut self, template: &str, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.set_clauses.push(Clause::new(
            template,
            args.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Append a SET assignment with no arguments, e.g. `set_raw("updated_at = now()")`.
    pub fn set_raw(mut self, template: &str) -> Self {
        self.set_clauses.push(Clause::new(template, Vec::new()));
        self
    }

    /// Append a SET assignment only when `arg` is `Some`.
    pub fn set_opt<T: Into<Value>>(self, template: &str, arg: Option<T>) -> Self {
        match arg {
            Some(v) => self.set(template, v),
            None => self,
        }
    }

    /// Append a WHERE condition with one argument, e.g. `and_where("age > ?", 18)`.
    pub fn and_where(self, template: &str, arg: impl Into<Value>) -> Self {
        self.and_where_args(template, [arg.into()])
    }

    /// Append a WHERE condition with any number of arguments.
    pub fn and_where_args<I, V>(mut self, template: &str, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.where_clauses.push(Clause::new(
            template,
            args.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Append a WHERE condition with no arguments, e.g. `and_where_raw("deleted_at IS NULL")`.
    pub fn and_where_raw(mut self, template: &str) -> Self {
        self.where_clauses.push(Clause::new(template, Vec::new()));
        self
    }

    /// Append a WHERE condition only when `arg` is `Some`.
    pub fn and_where_opt<T: Into<Value>>(self, template: &str, arg: Option<T>) -> Self {
        match arg {
            Some(v) => self.and_where(template, v),
            None => self,
        }
    }

    /// Append RETURNING columns (INSERT/UPDATE/DELETE).
    pub fn returning<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.returning_columns
            .extend(columns.into_iter().map(Into::into));
        self
    }

    /// Set the ORDER BY expression (replaces any previous one).
    pub fn order_by(mut self, expr: &str) -> Self {
        self.order_by = expr.to_string();
        self
    }

    /// Set LIMIT. A negative value removes the clause.
    pub fn limit(mut self, n: i64) -> Self {
        self.limit = (n >= 0).then_some(n);
        self
    }

    /// Set OFFSET. A negative value removes the clause.
    pub fn offset(mut self, n: i64) -> Self {
        self.offset = (n >= 0).then_some(n);
        self
    }

    /// Page-based pagination. `page` starts at 1.
    pub fn page(self, page: i64, per_page: i64) -> QbResult<Self> {
        if page < 1 {
            return Err(QbError::validation(format!(
                "page must be >= 1, got {page}"
            )));
        }
        if per_page < 0 {
            return Err(QbError::validation(format!(
                "per_page must be >= 0, got {per_page}"
            )));
        }
        let offset = (page - 1)
            .checked_mul(per_page)
            .ok_or_else(|| QbError::validation("page offset overflows i64"))?;
        Ok(self.limit(per_page).offset(offset))
    }

    /// Operations whose state is present in this builder.
    fn recorded_operations(&self) -> Vec<Operation> {
        let mut ops = Vec::new();
        if !self.select_columns.is_empty() {
            ops.push(Operation::SelectColumns);
        }
        if !self.insert_columns.is_empty() {
            ops.push(Operation::Columns);
        }
        if !self.insert_values.is_empty() {
            ops.push(Operation::Values);
        }
        if !self.set_clauses.is_empty() {
            ops.push(Operation::Set);
        }
        if !self.where_clauses.is_empty() {
            ops.push(Operation::Where);
        }
        if !self.returning_columns.is_empty() {
            ops.push(Operation::Returning);
        }
        if !self.order_by.is_empty() {
            ops.push(Operation::OrderBy);
        }
        if self.limit.is_some() {
            ops.push(Operation::Limit);
        }
        if self.offset.is_some() {
            ops.push(Operation::Offset);
        }
        ops
    }
}
