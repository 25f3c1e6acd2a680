use crate::{changeset::ConstraintKind, stmt::Row};

/// Outcome of a driver operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// A single-record write succeeded. Holds the returning columns, which
    /// may be empty.
    Row(Row),

    /// A bulk write succeeded
    Rows { count: u64, rows: Option<Vec<Row>> },

    /// The write was rejected by one or more constraints
    ConstraintViolation(Vec<Violation>),

    /// An update or delete matched no records
    Stale,

    /// A transaction op, or a filtered write with nothing to return
    Done,
}

/// A constraint violation as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ConstraintKind,
    pub name: String,
}

impl Response {
    pub fn row(row: Row) -> Self {
        Self::Row(row)
    }

    pub fn violation(kind: ConstraintKind, name: impl Into<String>) -> Self {
        Self::ConstraintViolation(vec![Violation {
            kind,
            name: name.into(),
        }])
    }
}
