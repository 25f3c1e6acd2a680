use stowage_core::schema::{Model, ModelId, Source};

/// Per-call settings for single-record writes.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Write even when the changeset carries no changes. Only has an effect
    /// when the model declares fields refreshed on update.
    pub force: bool,

    /// Fields read back from storage after the write, on top of the model's
    /// `read_after_writes`.
    pub returning: Returning,

    /// Overrides the namespace the record is written to.
    pub prefix: Option<String>,
}

/// Per-call settings for [`Db::insert_all`](crate::Db::insert_all).
#[derive(Debug, Clone, Default)]
pub struct InsertAllOptions {
    pub returning: Returning,
    pub prefix: Option<String>,
}

/// Which fields a write reads back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Returning {
    #[default]
    Nothing,

    /// Every primitive field of the model. Requires a registered model.
    All,

    /// The listed fields. Must not be empty.
    Fields(Vec<String>),
}

/// What [`Db::insert_all`](crate::Db::insert_all) writes to.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// A registered model: values are dumped according to its fields.
    Model(ModelId),

    /// A bare table: rows are passed to the driver untouched.
    Source(Source),
}

impl Options {
    pub fn new() -> Options {
        Options::default()
    }

    pub fn force(mut self) -> Self {
        self.force = true;
        self
    }

    pub fn returning(mut self, returning: Returning) -> Self {
        self.returning = returning;
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Options for writes of associated records: only the namespace carries
    /// over.
    pub(crate) fn nested(&self) -> Options {
        Options {
            prefix: self.prefix.clone(),
            ..Options::default()
        }
    }
}

impl InsertAllOptions {
    pub fn new() -> InsertAllOptions {
        InsertAllOptions::default()
    }

    pub fn returning(mut self, returning: Returning) -> Self {
        self.returning = returning;
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }
}

impl Returning {
    pub fn fields<'a>(fields: impl IntoIterator<Item = &'a str>) -> Returning {
        Returning::Fields(fields.into_iter().map(str::to_string).collect())
    }
}

impl From<&Model> for Target {
    fn from(value: &Model) -> Self {
        Target::Model(value.id)
    }
}

impl From<ModelId> for Target {
    fn from(value: ModelId) -> Self {
        Target::Model(value)
    }
}

impl From<Source> for Target {
    fn from(value: Source) -> Self {
        Target::Source(value)
    }
}

impl From<&str> for Target {
    fn from(value: &str) -> Self {
        Target::Source(Source::new(value))
    }
}
