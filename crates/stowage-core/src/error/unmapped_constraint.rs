use super::Error;
use crate::changeset::ConstraintKind;

/// Error when storage reports a constraint violation the changeset did not
/// declare.
#[derive(Debug)]
pub(super) struct UnmappedConstraint {
    kind: ConstraintKind,
    name: Box<str>,
}

impl std::error::Error for UnmappedConstraint {}

impl core::fmt::Display for UnmappedConstraint {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "constraint error: {} constraint `{}` was violated but no matching constraint \
             is declared on the changeset",
            self.kind, self.name
        )
    }
}

impl Error {
    pub fn unmapped_constraint(kind: ConstraintKind, name: &str) -> Error {
        Error::from(super::ErrorKind::UnmappedConstraint(UnmappedConstraint {
            kind,
            name: name.into(),
        }))
    }

    /// Returns `true` if this error is an unmapped constraint violation.
    pub fn is_unmapped_constraint(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnmappedConstraint(_))
    }
}
