use super::Error;
use crate::changeset::{Action, Changeset};

/// A changeset that failed validation, raised by the `*_strict` operations.
#[derive(Debug)]
pub(super) struct InvalidChangeset {
    action: Action,
    changeset: Box<Changeset>,
}

impl std::error::Error for InvalidChangeset {}

impl core::fmt::Display for InvalidChangeset {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "could not perform {} because changeset is invalid", self.action)?;

        for (i, error) in self.changeset.errors.iter().enumerate() {
            let sep = if i == 0 { ": " } else { ", " };
            write!(f, "{sep}{} {}", error.field, error.message)?;
        }

        Ok(())
    }
}

impl Error {
    pub fn invalid_changeset(action: Action, changeset: Changeset) -> Error {
        Error::from(super::ErrorKind::InvalidChangeset(InvalidChangeset {
            action,
            changeset: Box::new(changeset),
        }))
    }

    /// Returns `true` if this error wraps an invalid changeset.
    pub fn is_invalid_changeset(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidChangeset(_))
    }

    /// The invalid changeset, with its errors populated.
    pub fn changeset(&self) -> Option<&Changeset> {
        match self.kind() {
            super::ErrorKind::InvalidChangeset(err) => Some(&err.changeset),
            _ => None,
        }
    }
}
