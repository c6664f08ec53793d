/// Column Value Module
///
/// A single dynamically typed column value, as read back from a result row
/// or bound as a statement parameter.

use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use postgres::types::{Format, FromSql, IsNull, Kind, ToSql, Type};
use rust_decimal::Decimal;
use std::error::Error as StdError;
use std::fmt;
use uuid::Uuid;

type BoxError = Box<dyn StdError + Sync + Send>;

/// One column value of whatever type the server returned.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    /// Any integer column (`int2`, `int4`, `int8`, `oid`)
    Int(i64),
    /// `float4` and `float8`
    Float(f64),
    /// `numeric`
    Decimal(Decimal),
    /// Character types (`text`, `varchar`, `bpchar`, `name`, `citext`)
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<Utc>),
    Uuid(Uuid),
    /// `json` and `jsonb`
    Json(serde_json::Value),
    /// A value that reached `FromSql` with a type it cannot decode; holds
    /// the type name. `PgConnection` casts such columns to text first, so
    /// fetched rows carry their text form instead.
    Other(String),
}

/// An ordered result row, positionally aligned with the column list.
pub type Row = Vec<Value>;

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether `FromSql` reads this server type natively.
    pub fn decodes(ty: &Type) -> bool {
        let ty = base_type(ty);
        is_text_type(ty)
            || matches!(
                *ty,
                Type::BOOL
                    | Type::CHAR
                    | Type::INT2
                    | Type::INT4
                    | Type::INT8
                    | Type::OID
                    | Type::FLOAT4
                    | Type::FLOAT8
                    | Type::NUMERIC
                    | Type::BYTEA
                    | Type::DATE
                    | Type::TIMESTAMP
                    | Type::TIMESTAMPTZ
                    | Type::UUID
                    | Type::JSON
                    | Type::JSONB
            )
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Decimal(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "{v}"),
            Value::Bytes(v) => write!(f, "<bytea: {} bytes>", v.len()),
            Value::Date(v) => write!(f, "{v}"),
            Value::Timestamp(v) => write!(f, "{v}"),
            Value::TimestampTz(v) => write!(f, "{v}"),
            Value::Uuid(v) => write!(f, "{v}"),
            Value::Json(v) => write!(f, "{v}"),
            Value::Other(type_name) => write!(f, "<{type_name}>"),
        }
    }
}

macro_rules! impl_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Value::$variant(value.into())
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    f32 => Float,
    f64 => Float,
    Decimal => Decimal,
    String => Text,
    Vec<u8> => Bytes,
    NaiveDate => Date,
    NaiveDateTime => Timestamp,
    DateTime<Utc> => TimestampTz,
    Uuid => Uuid,
    serde_json::Value => Json,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Domains (e.g. `information_schema.sql_identifier`) share their base
/// type's wire format.
fn base_type(ty: &Type) -> &Type {
    match ty.kind() {
        Kind::Domain(inner) => base_type(inner),
        _ => ty,
    }
}

fn is_text_type(ty: &Type) -> bool {
    matches!(
        *ty,
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN
    ) || ty.name() == "citext"
}

fn bind<T: ToSql>(value: T, kind: &str, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    if !T::accepts(ty) {
        return Err(format!("cannot bind {kind} value to parameter of type {}", ty.name()).into());
    }
    value.to_sql(ty, out)
}

impl<'a> FromSql<'a> for Value {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        let ty = base_type(ty);
        if is_text_type(ty) {
            return Ok(Value::Text(<&str>::from_sql(&Type::TEXT, raw)?.to_string()));
        }
        Ok(match *ty {
            Type::BOOL => Value::Bool(bool::from_sql(ty, raw)?),
            Type::CHAR => Value::Text(char::from(i8::from_sql(ty, raw)? as u8).to_string()),
            Type::INT2 => Value::Int(i16::from_sql(ty, raw)?.into()),
            Type::INT4 => Value::Int(i32::from_sql(ty, raw)?.into()),
            Type::INT8 => Value::Int(i64::from_sql(ty, raw)?),
            Type::OID => Value::Int(u32::from_sql(ty, raw)?.into()),
            Type::FLOAT4 => Value::Float(f32::from_sql(ty, raw)?.into()),
            Type::FLOAT8 => Value::Float(f64::from_sql(ty, raw)?),
            Type::NUMERIC => Value::Decimal(Decimal::from_sql(ty, raw)?),
            Type::BYTEA => Value::Bytes(Vec::<u8>::from_sql(ty, raw)?),
            Type::DATE => Value::Date(NaiveDate::from_sql(ty, raw)?),
            Type::TIMESTAMP => Value::Timestamp(NaiveDateTime::from_sql(ty, raw)?),
            Type::TIMESTAMPTZ => Value::TimestampTz(DateTime::<Utc>::from_sql(ty, raw)?),
            Type::UUID => Value::Uuid(Uuid::from_sql(ty, raw)?),
            Type::JSON | Type::JSONB => Value::Json(serde_json::Value::from_sql(ty, raw)?),
            _ => Value::Other(ty.name().to_string()),
        })
    }

    fn from_sql_null(_ty: &Type) -> Result<Self, BoxError> {
        Ok(Value::Null)
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        let ty = base_type(ty);
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => bind(*v, "boolean", ty, out),
            Value::Int(v) => match *ty {
                Type::INT2 => bind(i16::try_from(*v)?, "integer", ty, out),
                Type::INT4 => bind(i32::try_from(*v)?, "integer", ty, out),
                Type::OID => bind(u32::try_from(*v)?, "integer", ty, out),
                Type::FLOAT4 => bind(*v as f32, "integer", ty, out),
                Type::FLOAT8 => bind(*v as f64, "integer", ty, out),
                Type::NUMERIC => bind(Decimal::from(*v), "integer", ty, out),
                _ if is_text_type(ty) => bind(v.to_string(), "integer", ty, out),
                _ => bind(*v, "integer", ty, out),
            },
            Value::Float(v) => match *ty {
                Type::FLOAT4 => bind(*v as f32, "float", ty, out),
                Type::NUMERIC => bind(Decimal::try_from(*v)?, "float", ty, out),
                _ if is_text_type(ty) => bind(v.to_string(), "float", ty, out),
                _ => bind(*v, "float", ty, out),
            },
            Value::Decimal(v) if is_text_type(ty) => bind(v.to_string(), "numeric", ty, out),
            Value::Decimal(v) => bind(*v, "numeric", ty, out),
            Value::Text(v) if <&str as ToSql>::accepts(ty) => bind(v.as_str(), "text", ty, out),
            // Sent in text format (see `encode_format`); the server parses it.
            Value::Text(v) => {
                out.extend_from_slice(v.as_bytes());
                Ok(IsNull::No)
            }
            Value::Bytes(v) => bind(v.as_slice(), "bytea", ty, out),
            Value::Date(v) => bind(*v, "date", ty, out),
            Value::Timestamp(v) => bind(*v, "timestamp", ty, out),
            Value::TimestampTz(v) => bind(*v, "timestamptz", ty, out),
            Value::Uuid(v) => bind(*v, "uuid", ty, out),
            Value::Json(v) => bind(v, "json", ty, out),
            Value::Other(type_name) => {
                Err(format!("cannot bind an undecoded {type_name} value").into())
            }
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    fn encode_format(&self, ty: &Type) -> Format {
        match self {
            Value::Text(_) if !<&str as ToSql>::accepts(base_type(ty)) => Format::Text,
            _ => Format::Binary,
        }
    }

    fn to_sql_checked(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        self.to_sql(ty, out)
    }
}
