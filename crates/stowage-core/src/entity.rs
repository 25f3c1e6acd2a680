use crate::{
    schema::{Model, ModelId, Source},
    stmt::Value,
};

use indexmap::IndexMap;

static NULL: Value = Value::Null;

/// An in-memory record of a registered model.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub meta: Metadata,
    model: ModelId,
    values: IndexMap<String, Value>,
    assocs: IndexMap<String, Assoc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub state: State,
    pub source: Source,
    pub context: Option<Value>,
}

/// Lifecycle state of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Constructed in memory, never written.
    Built,

    /// Read from, or written to, storage.
    Loaded,

    /// Removed from storage.
    Deleted,
}

/// Current value of an association field.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Assoc {
    #[default]
    NotLoaded,
    One(Option<Box<Entity>>),
    Many(Vec<Entity>),
}

impl Entity {
    /// A new, unsaved record with every field null and every association
    /// not loaded.
    pub fn new(model: &Model) -> Entity {
        let mut values = IndexMap::new();
        let mut assocs = IndexMap::new();

        for field in &model.fields {
            if field.ty.is_primitive() {
                values.insert(field.name.app_name.clone(), Value::Null);
            } else {
                assocs.insert(field.name.app_name.clone(), Assoc::NotLoaded);
            }
        }

        Entity {
            meta: Metadata {
                state: State::Built,
                source: model.source.clone(),
                context: None,
            },
            model: model.id,
            values,
            assocs,
        }
    }

    /// A record as read from storage.
    pub fn loaded<K, V>(model: &Model, values: impl IntoIterator<Item = (K, V)>) -> Entity
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut entity = Entity::new(model);
        entity.meta.state = State::Loaded;

        for (field, value) in values {
            entity.set(field, value);
        }

        entity
    }

    pub fn model(&self) -> ModelId {
        self.model
    }

    pub fn state(&self) -> State {
        self.meta.state
    }

    /// Returns the field value, or null if the field is unknown.
    pub fn get(&self, field: &str) -> &Value {
        self.values.get(field).unwrap_or(&NULL)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(field.into(), value.into());
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    pub fn assoc(&self, field: &str) -> &Assoc {
        static NOT_LOADED: Assoc = Assoc::NotLoaded;
        self.assocs.get(field).unwrap_or(&NOT_LOADED)
    }

    pub fn set_assoc(&mut self, field: impl Into<String>, assoc: Assoc) {
        self.assocs.insert(field.into(), assoc);
    }

    pub fn with_one(mut self, field: impl Into<String>, related: Option<Entity>) -> Self {
        self.set_assoc(field, Assoc::One(related.map(Box::new)));
        self
    }

    pub fn with_many(mut self, field: impl Into<String>, related: Vec<Entity>) -> Self {
        self.set_assoc(field, Assoc::Many(related));
        self
    }
}

impl Assoc {
    pub fn is_loaded(&self) -> bool {
        !matches!(self, Assoc::NotLoaded)
    }

    /// Returns `true` for the empty state: no record or no records.
    pub fn is_empty(&self) -> bool {
        match self {
            Assoc::NotLoaded => true,
            Assoc::One(one) => one.is_none(),
            Assoc::Many(many) => many.is_empty(),
        }
    }

    pub fn as_one(&self) -> Option<&Entity> {
        match self {
            Assoc::One(Some(entity)) => Some(entity),
            _ => None,
        }
    }

    pub fn as_many(&self) -> &[Entity] {
        match self {
            Assoc::Many(many) => many,
            _ => &[],
        }
    }
}
