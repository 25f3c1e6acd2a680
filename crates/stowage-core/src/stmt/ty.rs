use std::fmt;

/// Declared type of a primitive field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    I32,
    I64,
    F64,
    String,
    Bytes,
    Uuid,

    /// UTC timestamp
    DateTime,
}

impl Type {
    #[must_use]
    pub fn is_uuid(&self) -> bool {
        matches!(self, Self::Uuid)
    }

    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::I32 | Self::I64)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F64 => "f64",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Uuid => "uuid",
            Self::DateTime => "datetime",
        };
        f.write_str(name)
    }
}
