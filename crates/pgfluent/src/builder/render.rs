//! Statement rendering.

use super::{Clause, SqlBuilder, StatementKind};
use crate::built::BuiltQuery;
use crate::error::{QbError, QbResult};
use crate::logging;
use crate::placeholder::{Renumberer, count_markers};
use crate::value::Value;
use std::fmt::Write;

impl SqlBuilder {
    /// Render the statement and its arguments.
    ///
    /// Never fails: an unset builder renders an empty statement, and state the
    /// current kind does not use is left out. Rendering does not change the
    /// builder, so calling this twice gives identical results.
    pub fn build(&self) -> BuiltQuery {
        let built = self.render();
        logging::rendered(self.kind, &built, &self.config);
        built
    }

    /// Render the statement, rejecting builder states that
    /// [`validate`](Self::validate) refuses.
    pub fn try_build(&self) -> QbResult<BuiltQuery> {
        if let Err(err) = self.validate() {
            logging::rejected(self.kind, &err);
            return Err(err);
        }
        Ok(self.build())
    }

    /// Check the builder against the statement-kind rules:
    ///
    /// - the kind must be set;
    /// - every recorded operation must be accepted by the kind;
    /// - INSERT/UPDATE/DELETE need a table, UPDATE a SET clause and INSERT
    ///   at least one value;
    /// - every rendered clause must have as many arguments as markers;
    /// - an INSERT with named columns must have one value per column.
    pub fn validate(&self) -> QbResult<()> {
        if self.kind == StatementKind::Unset {
            return Err(QbError::malformed(
                "no statement kind; call select/insert/update/delete first",
            ));
        }

        if let Some(operation) = self
            .recorded_operations()
            .into_iter()
            .find(|op| !self.kind.accepts(*op))
        {
            return Err(QbError::IncompatibleOperation {
                operation,
                kind: self.kind,
            });
        }

        if self.kind != StatementKind::Select && self.table.is_empty() {
            return Err(QbError::malformed(format!(
                "{} statement has no table",
                self.kind
            )));
        }

        if self.kind == StatementKind::Update && self.set_clauses.is_empty() {
            return Err(QbError::malformed("UPDATE statement has no SET clause"));
        }
        if self.kind == StatementKind::Insert && self.insert_values.is_empty() {
            return Err(QbError::malformed("INSERT statement has no values"));
        }

        let set_clauses: &[Clause] = match self.kind {
            StatementKind::Update => &self.set_clauses,
            _ => &[],
        };
        for clause in set_clauses.iter().chain(&self.where_clauses) {
            let markers = count_markers(&clause.template, self.config.literal_aware);
            if markers != clause.args.len() {
                return Err(QbError::PlaceholderMismatch {
                    template: clause.template.clone(),
                    markers,
                    args: clause.args.len(),
                });
            }
        }

        if self.kind == StatementKind::Insert
            && !self.insert_columns.is_empty()
            && self.insert_columns.len() != self.insert_values.len()
        {
            return Err(QbError::malformed(format!(
                "INSERT has {} column(s) but {} value(s)",
                self.insert_columns.len(),
                self.insert_values.len()
            )));
        }
        Ok(())
    }

    /// Debug helper returning only the SQL text.
    pub fn to_sql(&self) -> String {
        self.render().sql
    }

    fn render(&self) -> BuiltQuery {
        match self.kind {
            StatementKind::Unset => BuiltQuery::empty(),
            StatementKind::Select => self.render_select(),
            StatementKind::Insert => self.render_insert(),
            StatementKind::Update => self.render_update(),
            StatementKind::Delete => self.render_delete(),
        }
    }

    fn renumberer(&self) -> Renumberer {
        Renumberer::new(self.config.placeholder_style, self.config.literal_aware)
    }

    fn render_select(&self) -> BuiltQuery {
        let mut sql = String::with_capacity(64);
        let mut params = Vec::new();
        let mut numbers = self.renumberer();

        sql.push_str("SELECT ");
        if self.select_columns.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&self.select_columns.join(", "));
        }

        if !self.table.is_empty() {
            sql.push_str(" FROM ");
            sql.push_str(&self.table);
        }

        push_clauses(
            &mut sql,
            &mut params,
            &mut numbers,
            " WHERE ",
            " AND ",
            &self.where_clauses,
        );

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by);
        }
        if let Some(n) = self.limit {
            let _ = write!(sql, " LIMIT {n}");
        }
        if let Some(n) = self.offset {
            let _ = write!(sql, " OFFSET {n}");
        }

        BuiltQuery::new(sql, params)
    }

    fn render_insert(&self) -> BuiltQuery {
        let mut sql = String::with_capacity(64);
        let mut numbers = self.renumberer();

        sql.push_str("INSERT INTO ");
        sql.push_str(&self.table);

        if !self.insert_columns.is_empty() {
            sql.push_str(" (");
            sql.push_str(&self.insert_columns.join(", "));
            sql.push(')');
        }

        sql.push_str(" VALUES (");
        for i in 0..self.insert_values.len() {
            if i > 0 {
                sql.push_str(", ");
            }
            numbers.push_param(&mut sql);
        }
        sql.push(')');

        self.push_returning(&mut sql);
        BuiltQuery::new(sql, self.insert_values.clone())
    }

    fn render_update(&self) -> BuiltQuery {
        let mut sql = String::with_capacity(64);
        let mut params = Vec::new();
        let mut numbers = self.renumberer();

        sql.push_str("UPDATE ");
        sql.push_str(&self.table);

        push_clauses(
            &mut sql,
            &mut params,
            &mut numbers,
            " SET ",
            ", ",
            &self.set_clauses,
        );
        push_clauses(
            &mut sql,
            &mut params,
            &mut numbers,
            " WHERE ",
            " AND ",
            &self.where_clauses,
        );

        self.push_returning(&mut sql);
        BuiltQuery::new(sql, params)
    }

    fn render_delete(&self) -> BuiltQuery {
        let mut sql = String::with_capacity(64);
        let mut params = Vec::new();
        let mut numbers = self.renumberer();

        sql.push_str("DELETE FROM ");
        sql.push_str(&self.table);

        push_clauses(
            &mut sql,
            &mut params,
            &mut numbers,
            " WHERE ",
            " AND ",
            &self.where_clauses,
        );

        self.push_returning(&mut sql);
        BuiltQuery::new(sql, params)
    }

    fn push_returning(&self, sql: &mut String) {
        if !self.returning_columns.is_empty() {
            sql.push_str(" RETURNING ");
            sql.push_str(&self.returning_columns.join(", "));
        }
    }
}

/// Append `keyword` and the clauses joined by `sep`, renumbering markers and
/// collecting arguments in clause order. No-op for an empty list.
fn push_clauses(
    sql: &mut String,
    params: &mut Vec<Value>,
    numbers: &mut Renumberer,
    keyword: &str,
    sep: &str,
    clauses: &[Clause],
) {
    if clauses.is_empty() {
        return;
    }
    sql.push_str(keyword);
    for (i, clause) in clauses.iter().enumerate() {
        if i > 0 {
            sql.push_str(sep);
        }
        numbers.write(&clause.template, sql);
        params.extend(clause.args.iter().cloned());
    }
}
