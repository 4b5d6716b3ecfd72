//! # pgfluent
//!
//! A fluent SQL statement builder for PostgreSQL.
//!
//! ## Features
//!
//! - **SQL explicit**: clause templates are plain SQL with `?` markers
//! - **Automatic numbering**: markers become `$1, $2, ...` left to right, SET
//!   clauses before WHERE clauses, with one counter per statement
//! - **Ordered arguments**: the argument list always follows placeholder order
//! - **Typed arguments**: arguments are a closed [`Value`] enum that binds
//!   directly with `tokio-postgres`
//! - **Immutable builder**: branch a shared prefix with `clone()`
//! - **Lenient or strict**: [`SqlBuilder::build`] never fails,
//!   [`SqlBuilder::try_build`] rejects malformed states
//!
//! ## Usage
//!
//! ```ignore
//! use pgfluent::{delete, insert, select, update};
//!
//! // SELECT
//! let q = select(["id", "name"])
//!     .from("users")
//!     .and_where("age > ?", 18)
//!     .and_where("status = ?", "active")
//!     .order_by("created_at DESC")
//!     .limit(10)
//!     .offset(20)
//!     .build();
//! // SELECT id, name FROM users WHERE age > $1 AND status = $2 ORDER BY created_at DESC LIMIT 10 OFFSET 20
//!
//! // INSERT
//! let q = insert("products")
//!     .columns(["name", "price"])
//!     .values(pgfluent::params!["Laptop", 999.99])
//!     .returning(["id"])
//!     .build();
//!
//! // UPDATE
//! let q = update("products")
//!     .set("price = ?", 899.99)
//!     .and_where("id = ?", 123)
//!     .build();
//!
//! // DELETE
//! let rows = delete()
//!     .from("products")
//!     .and_where("id = ?", 123)
//!     .try_build()?
//!     .execute(&client)
//!     .await?;
//! ```

pub mod builder;
pub mod built;
pub mod config;
pub mod error;
mod logging;
pub mod placeholder;
pub mod value;

pub use builder::{Clause, Operation, SqlBuilder, StatementKind, delete, insert, select, update};
pub use built::BuiltQuery;
pub use config::QbConfig;
pub use error::{QbError, QbResult};
pub use placeholder::PlaceholderStyle;
pub use value::Value;
