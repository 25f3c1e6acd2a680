use stowage_core::{driver::Violation, Changeset, Error, Result};

use log::warn;

/// Maps the violations reported by storage onto the changeset's declared
/// constraints. Every violation must match a declaration; the first one that
/// does not is raised.
pub(super) fn translate(mut changeset: Changeset, violations: &[Violation]) -> Result<Changeset> {
    for violation in violations {
        let Some(constraint) = changeset
            .constraints
            .iter()
            .find(|constraint| constraint.matches(violation.kind, &violation.name))
        else {
            warn!(
                "storage reported {} constraint `{}` with no matching declaration",
                violation.kind, violation.name
            );
            return Err(Error::unmapped_constraint(violation.kind, &violation.name));
        };

        let (field, message) = (constraint.field.clone(), constraint.message.clone());
        changeset.push_error(field, message);
    }

    // A rejected write is never valid, even when the driver names nothing.
    changeset.valid = false;
    Ok(changeset)
}
