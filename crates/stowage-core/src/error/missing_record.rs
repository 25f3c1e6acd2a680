use super::Error;
use crate::changeset::Action;

/// Error when a changeset has no underlying record to act on.
#[derive(Debug)]
pub(super) struct MissingRecord {
    action: Action,
}

impl std::error::Error for MissingRecord {}

impl core::fmt::Display for MissingRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "cannot {}: changeset has no record", self.action)
    }
}

impl Error {
    pub fn missing_record(action: Action) -> Error {
        Error::from(super::ErrorKind::MissingRecord(MissingRecord { action }))
    }

    /// Returns `true` if this error is a missing record error.
    pub fn is_missing_record(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::MissingRecord(_))
    }
}
