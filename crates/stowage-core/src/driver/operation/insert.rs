use super::*;

use crate::{schema::Source, stmt::Row};

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub source: Source,

    /// Dumped values, keyed by column
    pub changes: Row,

    /// Columns the driver must read back after the write
    pub returning: Vec<String>,
}

impl From<Insert> for Operation {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}
