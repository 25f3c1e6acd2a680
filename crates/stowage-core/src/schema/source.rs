use std::fmt;

/// Storage location of a record: an optional namespace plus a table name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Source {
    pub prefix: Option<String>,
    pub table: String,
}

impl Source {
    pub fn new(table: impl Into<String>) -> Source {
        Source {
            prefix: None,
            table: table.into(),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>, table: impl Into<String>) -> Source {
        Source {
            prefix: Some(prefix.into()),
            table: table.into(),
        }
    }

    /// Returns a copy of the source placed under `prefix`, or `self` unchanged
    /// when no prefix is given.
    pub fn prefixed(&self, prefix: Option<&str>) -> Source {
        match prefix {
            Some(prefix) => Source::with_prefix(prefix, self.table.clone()),
            None => self.clone(),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{prefix}.{}", self.table),
            None => f.write_str(&self.table),
        }
    }
}
