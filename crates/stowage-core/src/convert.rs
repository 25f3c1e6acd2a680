use crate::{
    err,
    stmt::{Type, Value},
    Result,
};

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Debug;
use uuid::Uuid;

/// Encodes field values into their storage representation and decodes them
/// back.
///
/// Errors returned by a converter are wrapped by the caller in a type
/// mismatch error naming the field.
pub trait TypeConverter: Debug + Send + Sync + 'static {
    /// Encodes an in-memory value of type `ty` for the driver.
    fn dump(&self, ty: &Type, value: &Value) -> Result<Value>;

    /// Decodes a value returned by the driver into type `ty`.
    fn load(&self, ty: &Type, value: &Value) -> Result<Value>;

    /// Generates a value of type `ty` client side, if the type supports it.
    fn autogenerate(&self, ty: &Type) -> Option<Value> {
        match ty {
            Type::Uuid => Some(Value::Uuid(Uuid::new_v4())),
            _ => None,
        }
    }
}

/// The default converter.
///
/// Checks values against their declared type, widening integers where no
/// precision is lost. UUIDs are stored as hyphenated text and timestamps as
/// RFC 3339 strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct Builtin;

impl TypeConverter for Builtin {
    fn dump(&self, ty: &Type, value: &Value) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        Ok(match (ty, value) {
            (Type::Uuid, Value::Uuid(v)) => Value::String(v.hyphenated().to_string()),
            (Type::Uuid, Value::String(v)) => {
                Value::String(Uuid::parse_str(v)?.hyphenated().to_string())
            }
            (Type::DateTime, Value::DateTime(v)) => {
                Value::String(v.to_rfc3339_opts(SecondsFormat::Micros, true))
            }
            (Type::DateTime, Value::String(v)) => Value::String(
                parse_datetime(v)?.to_rfc3339_opts(SecondsFormat::Micros, true),
            ),
            _ => cast(ty, value)?,
        })
    }

    fn load(&self, ty: &Type, value: &Value) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        Ok(match (ty, value) {
            (Type::Uuid, Value::String(v)) => Value::Uuid(Uuid::parse_str(v)?),
            (Type::Uuid, Value::Bytes(v)) => Value::Uuid(Uuid::from_slice(v)?),
            (Type::DateTime, Value::String(v)) => Value::DateTime(parse_datetime(v)?),
            _ => cast(ty, value)?,
        })
    }
}

fn parse_datetime(src: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(src)?.with_timezone(&Utc))
}

/// Values already in the shape of `ty`, plus lossless integer conversions.
fn cast(ty: &Type, value: &Value) -> Result<Value> {
    Ok(match (ty, value) {
        (Type::Bool, Value::Bool(_))
        | (Type::I32, Value::I32(_))
        | (Type::I64, Value::I64(_))
        | (Type::F64, Value::F64(_))
        | (Type::String, Value::String(_))
        | (Type::Bytes, Value::Bytes(_))
        | (Type::Uuid, Value::Uuid(_))
        | (Type::DateTime, Value::DateTime(_)) => value.clone(),
        (Type::I64, Value::I32(v)) => Value::I64((*v).into()),
        (Type::I32, Value::I64(v)) => match i32::try_from(*v) {
            Ok(v) => Value::I32(v),
            Err(_) => return Err(err!("{v} is out of range for i32")),
        },
        _ => return Err(err!("expected {ty}")),
    })
}
