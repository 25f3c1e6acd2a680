use super::Error;
use crate::changeset::Action;

/// Error when a changeset already stamped with one action is used for another.
#[derive(Debug)]
pub(super) struct ActionConflict {
    current: Action,
    requested: Action,
}

impl std::error::Error for ActionConflict {}

impl core::fmt::Display for ActionConflict {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "changeset action is already `{}`; cannot change it to `{}`",
            self.current, self.requested
        )
    }
}

impl Error {
    pub fn action_conflict(current: Action, requested: Action) -> Error {
        Error::from(super::ErrorKind::ActionConflict(ActionConflict {
            current,
            requested,
        }))
    }

    /// Returns `true` if this error is an action conflict.
    pub fn is_action_conflict(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::ActionConflict(_))
    }
}
