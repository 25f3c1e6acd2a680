use super::Error;
use crate::changeset::Action;

/// Error when a primary key field is null while building the filters of an
/// update or delete.
#[derive(Debug)]
pub(super) struct MissingPrimaryKey {
    action: Action,
    model: Box<str>,
    field: Box<str>,
}

impl std::error::Error for MissingPrimaryKey {}

impl core::fmt::Display for MissingPrimaryKey {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "cannot {} `{}`: primary key field `{}` is null",
            self.action, self.model, self.field
        )
    }
}

impl Error {
    pub fn missing_primary_key(action: Action, model: &str, field: &str) -> Error {
        Error::from(super::ErrorKind::MissingPrimaryKey(MissingPrimaryKey {
            action,
            model: model.into(),
            field: field.into(),
        }))
    }

    /// Returns `true` if this error is a missing primary key error.
    pub fn is_missing_primary_key(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::MissingPrimaryKey(_))
    }
}
