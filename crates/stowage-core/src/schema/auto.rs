use crate::stmt::Value;

use std::{fmt, sync::Arc};
use uuid::Uuid;

/// How the primary key value of a new record is populated when the caller
/// does not supply one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoStrategy {
    /// Ask the driver (then the type converter) for a client-side value;
    /// fall back to storage generation.
    Id,

    /// Always generated client-side.
    Uuid(UuidVersion),

    /// Always generated by storage and read back after the write.
    Increment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UuidVersion {
    V4,
    V7,
}

impl AutoStrategy {}

impl UuidVersion {
    pub fn generate(&self) -> Uuid {
        match self {
            UuidVersion::V4 => Uuid::new_v4(),
            UuidVersion::V7 => Uuid::now_v7(),
        }
    }
}

/// A set of non-key fields populated by one producer call.
#[derive(Debug, Clone)]
pub struct Autogenerate {
    pub fields: Vec<String>,
    pub producer: Producer,
}

impl Autogenerate {
    pub fn new<'a>(fields: impl IntoIterator<Item = &'a str>, producer: Producer) -> Autogenerate {
        Autogenerate {
            fields: fields.into_iter().map(str::to_string).collect(),
            producer,
        }
    }
}

/// Produces values for autogenerated fields.
#[derive(Clone)]
pub struct Producer {
    func: Arc<dyn Fn(&[Value]) -> Value + Send + Sync>,
    args: Vec<Value>,
}

impl Producer {
    pub fn new(func: impl Fn() -> Value + Send + Sync + 'static) -> Producer {
        Producer {
            func: Arc::new(move |_| func()),
            args: vec![],
        }
    }

    /// A producer called with the given arguments each time it runs.
    pub fn with_args(
        func: impl Fn(&[Value]) -> Value + Send + Sync + 'static,
        args: Vec<Value>,
    ) -> Producer {
        Producer {
            func: Arc::new(func),
            args,
        }
    }

    /// Current UTC time.
    pub fn timestamp() -> Producer {
        Producer::new(|| Value::DateTime(chrono::Utc::now()))
    }

    pub fn produce(&self) -> Value {
        (self.func)(&self.args)
    }
}

impl fmt::Debug for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}
