use super::{Association, AutoStrategy, BelongsTo, HasMany, HasOne};
use crate::stmt;

use std::fmt;

#[derive(Debug, Clone)]
pub struct Field {
    /// The field name
    pub name: FieldName,

    /// Primitive or relation
    pub ty: FieldTy,

    /// True if the field is part of the primary key
    pub primary_key: bool,

    /// Specified if and how the key value is generated for new records
    pub auto: Option<AutoStrategy>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldName {
    pub app_name: String,
    pub storage_name: Option<String>,
}

#[derive(Debug, Clone)]
pub enum FieldTy {
    Primitive(stmt::Type),
    BelongsTo(BelongsTo),
    HasMany(HasMany),
    HasOne(HasOne),
}

impl Field {
    pub fn new(name: impl Into<String>, ty: impl Into<FieldTy>) -> Field {
        Field {
            name: FieldName {
                app_name: name.into(),
                storage_name: None,
            },
            ty: ty.into(),
            primary_key: false,
            auto: None,
        }
    }

    /// Stores the field in a column with a different name.
    pub fn column(mut self, storage_name: impl Into<String>) -> Self {
        self.name.storage_name = Some(storage_name.into());
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn auto(mut self, strategy: AutoStrategy) -> Self {
        self.auto = Some(strategy);
        self
    }

    pub fn name(&self) -> &str {
        &self.name.app_name
    }

    pub fn column_name(&self) -> &str {
        self.name.storage_name()
    }

    /// Returns the association reflection when the field is a relation.
    pub fn association(&self) -> Option<Association<'_>> {
        let field = self.name.app_name.as_str();

        match &self.ty {
            FieldTy::Primitive(_) => None,
            FieldTy::BelongsTo(rel) => Some(rel.association(field)),
            FieldTy::HasOne(rel) => Some(rel.association(field)),
            FieldTy::HasMany(rel) => Some(rel.association(field)),
        }
    }
}

impl FieldName {
    pub fn storage_name(&self) -> &str {
        self.storage_name.as_ref().unwrap_or(&self.app_name)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.app_name)
    }
}

impl FieldTy {
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(..))
    }

    pub fn is_relation(&self) -> bool {
        matches!(self, Self::BelongsTo(..) | Self::HasMany(..) | Self::HasOne(..))
    }

    pub fn as_primitive(&self) -> Option<stmt::Type> {
        match *self {
            Self::Primitive(ty) => Some(ty),
            _ => None,
        }
    }
}

impl From<stmt::Type> for FieldTy {
    fn from(value: stmt::Type) -> Self {
        Self::Primitive(value)
    }
}
