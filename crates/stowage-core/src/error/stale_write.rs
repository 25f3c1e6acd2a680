use super::Error;
use crate::{changeset::Action, schema::Source};

/// Error when an update or delete matched no rows.
///
/// The record was changed or removed concurrently. This is never returned as
/// a recoverable changeset error.
#[derive(Debug)]
pub(super) struct StaleWrite {
    action: Action,
    source: Source,
}

impl std::error::Error for StaleWrite {}

impl core::fmt::Display for StaleWrite {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "attempted to {} a stale record in `{}`: no rows matched the filters",
            self.action, self.source
        )
    }
}

impl Error {
    pub fn stale_write(action: Action, source: &Source) -> Error {
        Error::from(super::ErrorKind::StaleWrite(StaleWrite {
            action,
            source: source.clone(),
        }))
    }

    /// Returns `true` if this error is a stale write.
    pub fn is_stale_write(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::StaleWrite(_))
    }
}
