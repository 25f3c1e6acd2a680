use super::Error;
use crate::stmt::{Type, Value};

/// Error when a value cannot be dumped or loaded as its declared type.
#[derive(Debug)]
pub(super) struct TypeMismatch {
    field: Box<str>,
    ty: Type,
    value: Value,
}

impl std::error::Error for TypeMismatch {}

impl core::fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "value `{:?}` for `{}` does not match type {}",
            self.value, self.field, self.ty
        )
    }
}

impl Error {
    /// `field` is the qualified field name, e.g. `User.email`.
    pub fn type_mismatch(field: impl Into<String>, ty: Type, value: &Value) -> Error {
        Error::from(super::ErrorKind::TypeMismatch(TypeMismatch {
            field: field.into().into(),
            ty,
            value: value.clone(),
        }))
    }

    /// Returns `true` if this error is a type mismatch.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::TypeMismatch(_))
    }
}
