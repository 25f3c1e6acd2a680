mod belongs_to;
pub use belongs_to::BelongsTo;

mod has_many;
pub use has_many::HasMany;

mod has_one;
pub use has_one::HasOne;

use super::ModelId;

/// Which side of the write an associated record is persisted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    /// Persisted before the owner; supplies a foreign key to it.
    Parent,

    /// Persisted after the owner; consumes the owner's key.
    Child,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

/// What happens to child rows when their owner is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnDelete {
    #[default]
    Nothing,

    /// Delete every child row referencing the owner.
    DeleteAll,

    /// Set the foreign key of every child row referencing the owner to null.
    NilifyAll,
}

/// Reflection of a declared association.
///
/// `owner_key` is a field on the model declaring the association and
/// `related_key` a field on the associated model. For a parent association
/// `owner_key` is the foreign key; for a child association `related_key` is.
#[derive(Debug, Clone, Copy)]
pub struct Association<'a> {
    pub field: &'a str,
    pub target: ModelId,
    pub owner_key: &'a str,
    pub related_key: &'a str,
    pub relationship: Relationship,
    pub cardinality: Cardinality,
    pub on_delete: OnDelete,
}

impl Association<'_> {
    pub fn is_parent(&self) -> bool {
        self.relationship == Relationship::Parent
    }
}
