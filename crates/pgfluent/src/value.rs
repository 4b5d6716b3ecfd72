//! Tagged argument values.
//!
//! Every argument handed to the builder is converted into a [`Value`], a closed
//! set of the scalar kinds a CRUD repository binds. The execution layer can bind
//! a `Value` directly through its [`ToSql`] implementation.

use bytes::BytesMut;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use std::error::Error;
use std::fmt;
use tokio_postgres::types::{IsNull, ToSql, Type, WrongType};
use uuid::Uuid;

/// A single bound argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    TextArray(Vec<String>),
    Null,
}

impl Value {
    /// Short name of the variant, used in logs and error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Timestamp(_) => "timestamp",
            Value::TextArray(_) => "text[]",
            Value::Null => "null",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Timestamp(t) => write!(f, "'{}'", t.to_rfc3339()),
            Value::TextArray(items) => {
                f.write_str("{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "\"{}\"", item.replace('"', "\\\""))?;
                }
                f.write_str("}")
            }
            Value::Null => f.write_str("NULL"),
        }
    }
}

// ==================== Conversions ====================

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

/// Naive timestamps are taken to be UTC.
impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Timestamp(v.and_utc())
    }
}

/// UUIDs travel as text and are parsed back when bound to a `uuid` column.
impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::TextArray(v)
    }
}

impl From<Vec<&str>> for Value {
    fn from(v: Vec<&str>) -> Self {
        Value::TextArray(v.into_iter().map(str::to_string).collect())
    }
}

impl From<&[String]> for Value {
    fn from(v: &[String]) -> Self {
        Value::TextArray(v.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Build a `Vec<Value>` from mixed argument types.
///
/// ```ignore
/// let q = pgfluent::select(["id"])
///     .from("products")
///     .and_where_args("price BETWEEN ? AND ? AND category = ?", pgfluent::params![10, 99.5, "tools"])
///     .build();
/// ```
#[macro_export]
macro_rules! params {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($value)),+]
    };
}

// ==================== Binding ====================

fn encode<T: ToSql>(
    value: &T,
    ty: &Type,
    out: &mut BytesMut,
) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
    if !T::accepts(ty) {
        return Err(Box::new(WrongType::new::<T>(ty.clone())));
    }
    value.to_sql(ty, out)
}

/// Integers adapt to any integer or float column and floats to either float
/// width. Text binds to text-like columns and to `uuid` (parsed). Everything
/// else must match the server's parameter type; `numeric` is not supported.
impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Text(s) => match *ty {
                Type::UUID => encode(&Uuid::parse_str(s)?, ty, out),
                _ => encode(s, ty, out),
            },
            Value::Int(n) => match *ty {
                Type::INT2 => encode(&i16::try_from(*n)?, ty, out),
                Type::INT4 => encode(&i32::try_from(*n)?, ty, out),
                Type::FLOAT4 => encode(&(*n as f32), ty, out),
                Type::FLOAT8 => encode(&(*n as f64), ty, out),
                _ => encode(n, ty, out),
            },
            Value::Float(x) => match *ty {
                Type::FLOAT4 => encode(&(*x as f32), ty, out),
                _ => encode(x, ty, out),
            },
            Value::Bool(b) => encode(b, ty, out),
            Value::Timestamp(t) => match *ty {
                Type::TIMESTAMP => encode(&t.naive_utc(), ty, out),
                _ => encode(t, ty, out),
            },
            Value::TextArray(items) => encode(items, ty, out),
        }
    }

    // Per-variant checks happen in `to_sql`; NULL binds to any column.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    tokio_postgres::types::to_sql_checked!();
}
