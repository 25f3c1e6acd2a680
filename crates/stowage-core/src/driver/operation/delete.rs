use super::*;

use crate::{schema::Source, stmt::Row};

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub source: Source,

    /// Equality filters. Every one must match for a record to be deleted.
    pub filters: Row,
}

impl From<Delete> for Operation {
    fn from(value: Delete) -> Self {
        Self::Delete(value)
    }
}
