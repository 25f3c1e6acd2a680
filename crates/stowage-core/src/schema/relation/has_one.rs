use super::*;
use crate::schema::FieldTy;

#[derive(Debug, Clone)]
pub struct HasOne {
    /// Name of the associated model
    pub target_name: String,

    /// Associated model, resolved when the schema is built
    pub target: ModelId,

    /// Field on the associated model referencing the owner
    pub foreign_key: String,

    /// Field on the owning model the foreign key points at
    pub references: String,

    pub on_delete: OnDelete,
}

impl HasOne {
    pub fn new(target: impl Into<String>, foreign_key: impl Into<String>) -> HasOne {
        HasOne {
            target_name: target.into(),
            target: ModelId(usize::MAX),
            foreign_key: foreign_key.into(),
            references: "id".to_string(),
            on_delete: OnDelete::Nothing,
        }
    }

    pub fn references(mut self, field: impl Into<String>) -> Self {
        self.references = field.into();
        self
    }

    pub fn on_delete(mut self, on_delete: OnDelete) -> Self {
        self.on_delete = on_delete;
        self
    }

    pub(crate) fn association<'a>(&'a self, field: &'a str) -> Association<'a> {
        Association {
            field,
            target: self.target,
            owner_key: &self.references,
            related_key: &self.foreign_key,
            relationship: Relationship::Child,
            cardinality: Cardinality::One,
            on_delete: self.on_delete,
        }
    }
}

impl From<HasOne> for FieldTy {
    fn from(value: HasOne) -> Self {
        Self::HasOne(value)
    }
}
