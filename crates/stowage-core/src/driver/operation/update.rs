use super::*;

use crate::{schema::Source, stmt::Row};

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub source: Source,

    /// Dumped values, keyed by column
    pub changes: Row,

    /// Equality filters. Every one must match for a record to be updated.
    pub filters: Row,

    /// Columns the driver must read back after the write
    pub returning: Vec<String>,
}

impl From<Update> for Operation {
    fn from(value: Update) -> Self {
        Self::Update(value)
    }
}
