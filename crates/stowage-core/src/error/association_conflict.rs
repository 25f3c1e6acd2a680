use super::Error;
use crate::stmt::Value;

/// Error when a foreign key is set directly in the changes and also implied,
/// with a different value, by a change to the parent association.
#[derive(Debug)]
pub(super) struct AssociationConflict {
    association: Box<str>,
    foreign_key: Box<str>,
    current: Value,
    resolved: Value,
}

impl std::error::Error for AssociationConflict {}

impl core::fmt::Display for AssociationConflict {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "cannot change association `{}` because `{}` is already being changed to {:?} \
             (association resolves it to {:?})",
            self.association, self.foreign_key, self.current, self.resolved
        )
    }
}

impl Error {
    pub fn association_conflict(
        association: &str,
        foreign_key: &str,
        current: &Value,
        resolved: &Value,
    ) -> Error {
        Error::from(super::ErrorKind::AssociationConflict(AssociationConflict {
            association: association.into(),
            foreign_key: foreign_key.into(),
            current: current.clone(),
            resolved: resolved.clone(),
        }))
    }

    /// Returns `true` if this error is an association conflict.
    pub fn is_association_conflict(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::AssociationConflict(_))
    }
}
