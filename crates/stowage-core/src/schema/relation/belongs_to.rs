use super::*;
use crate::schema::FieldTy;

#[derive(Debug, Clone)]
pub struct BelongsTo {
    /// Name of the associated model
    pub target_name: String,

    /// Associated model, resolved when the schema is built
    pub target: ModelId,

    /// Field on the owning model holding the associated key
    pub foreign_key: String,

    /// Field on the associated model the foreign key points at
    pub references: String,
}

impl BelongsTo {
    pub fn new(target: impl Into<String>, foreign_key: impl Into<String>) -> BelongsTo {
        BelongsTo {
            target_name: target.into(),
            target: ModelId(usize::MAX),
            foreign_key: foreign_key.into(),
            references: "id".to_string(),
        }
    }

    pub fn references(mut self, field: impl Into<String>) -> Self {
        self.references = field.into();
        self
    }

    pub(crate) fn association<'a>(&'a self, field: &'a str) -> Association<'a> {
        Association {
            field,
            target: self.target,
            owner_key: &self.foreign_key,
            related_key: &self.references,
            relationship: Relationship::Parent,
            cardinality: Cardinality::One,
            on_delete: OnDelete::Nothing,
        }
    }
}

impl From<BelongsTo> for FieldTy {
    fn from(value: BelongsTo) -> Self {
        Self::BelongsTo(value)
    }
}
