use super::*;

use crate::{schema::Source, stmt::Value};

#[derive(Debug, Clone, PartialEq)]
pub struct InsertAll {
    pub source: Source,

    /// Column list shared by every row, in first-seen order
    pub header: Vec<String>,

    /// One entry per row, positionally aligned with `header`. `None` marks a
    /// column the row did not supply; the driver decides what to store.
    pub rows: Vec<Vec<Option<Value>>>,

    /// Columns to read back for every inserted row, if any
    pub returning: Option<Vec<String>>,
}

impl From<InsertAll> for Operation {
    fn from(value: InsertAll) -> Self {
        Self::InsertAll(value)
    }
}
