use super::{AutoStrategy, Autogenerate, Field, Producer, Source};
use crate::stmt::Type;

use std::fmt;

#[derive(Debug, Clone)]
pub struct Model {
    /// Uniquely identifies the model within the schema. Assigned when the
    /// schema is built.
    pub id: ModelId,

    /// Name of the model
    pub name: String,

    /// Where records of this model are stored by default
    pub source: Source,

    /// Fields contained by the model
    pub fields: Vec<Field>,

    /// Producers applied on insert to fields absent from the changes
    pub autogenerate: Vec<Autogenerate>,

    /// Producers applied on update to fields absent from the changes
    pub autoupdate: Vec<Autogenerate>,

    /// Fields always requested back from storage after a write
    pub read_after_writes: Vec<String>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct ModelId(pub usize);

impl Model {
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Model {
        Model {
            id: ModelId(usize::MAX),
            name: name.into(),
            source: Source::new(table),
            fields: vec![],
            autogenerate: vec![],
            autoupdate: vec![],
            read_after_writes: vec![],
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.source.prefix = Some(prefix.into());
        self
    }

    pub fn add_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Declares `inserted_at` and `updated_at` timestamp fields. Both are set
    /// on insert; `updated_at` is refreshed on update.
    pub fn timestamps(self) -> Self {
        self.add_field(Field::new("inserted_at", Type::DateTime))
            .add_field(Field::new("updated_at", Type::DateTime))
            .autogenerate(["inserted_at", "updated_at"], Producer::timestamp())
            .autoupdate(["updated_at"], Producer::timestamp())
    }

    pub fn autogenerate<'a>(
        mut self,
        fields: impl IntoIterator<Item = &'a str>,
        producer: Producer,
    ) -> Self {
        self.autogenerate.push(Autogenerate::new(fields, producer));
        self
    }

    pub fn autoupdate<'a>(
        mut self,
        fields: impl IntoIterator<Item = &'a str>,
        producer: Producer,
    ) -> Self {
        self.autoupdate.push(Autogenerate::new(fields, producer));
        self
    }

    pub fn read_after_writes(mut self, field: impl Into<String>) -> Self {
        self.read_after_writes.push(field.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name.app_name == name)
    }

    /// Finds the field stored in the given column.
    pub fn field_by_column(&self, column: &str) -> Option<&Field> {
        self.primitives().find(|field| field.name.storage_name() == column)
    }

    pub fn primary_key_fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields.iter().filter(|field| field.primary_key)
    }

    /// Fields holding values, excluding associations.
    pub fn primitives(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields.iter().filter(|field| field.ty.is_primitive())
    }

    pub fn associations(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields.iter().filter(|field| field.ty.is_relation())
    }

    /// The autogenerated primary key field, if one is declared.
    pub fn autogenerate_id(&self) -> Option<(&Field, &AutoStrategy)> {
        self.fields
            .iter()
            .find_map(|field| field.auto.as_ref().map(|auto| (field, auto)))
    }
}

impl fmt::Debug for ModelId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ModelId({})", self.0)
    }
}

impl From<&Model> for ModelId {
    fn from(value: &Model) -> Self {
        value.id
    }
}
