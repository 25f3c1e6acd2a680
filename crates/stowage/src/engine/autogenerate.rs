use super::Engine;

use stowage_core::{
    changeset::{Change, Changeset},
    schema::{AutoStrategy, Autogenerate, Model},
    stmt::{Row, Type, Value},
};

use log::trace;

/// How the primary key of a new record gets its value. Exactly one applies
/// per write.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum IdSource {
    /// The model declares no autogenerated key.
    Undeclared,

    /// The caller put a value in the changes.
    Supplied,

    /// Generated before the write and added to the changes.
    Generated,

    /// Left to storage; the column is requested back.
    Returning(String),
}

impl Engine {
    /// Resolves the autogenerated primary key of an insert.
    pub(super) fn autogenerate_id(&self, model: &Model, changeset: &mut Changeset) -> IdSource {
        let Some((field, strategy)) = model.autogenerate_id() else {
            return IdSource::Undeclared;
        };

        if changeset.changes.contains_key(field.name()) {
            trace!("{}.{} supplied by caller", model.name, field.name());
            return IdSource::Supplied;
        }

        match field
            .ty
            .as_primitive()
            .and_then(|ty| self.generate_id(strategy, &ty))
        {
            Some(value) => {
                trace!("{}.{} generated before insert", model.name, field.name());
                changeset
                    .changes
                    .insert(field.name().to_string(), Change::Value(value));
                IdSource::Generated
            }
            None => {
                trace!("{}.{} left to storage", model.name, field.name());
                IdSource::Returning(field.column_name().to_string())
            }
        }
    }

    /// Fills in the autogenerated primary key of a bulk insert row keyed by
    /// field name. Rows without a generated value are left for storage.
    pub(super) fn autogenerate_row_id(&self, model: &Model, row: &mut Row) {
        let Some((field, strategy)) = model.autogenerate_id() else {
            return;
        };

        if row.contains_key(field.name()) {
            return;
        }

        if let Some(value) = field
            .ty
            .as_primitive()
            .and_then(|ty| self.generate_id(strategy, &ty))
        {
            row.insert(field.name().to_string(), value);
        }
    }

    fn generate_id(&self, strategy: &AutoStrategy, ty: &Type) -> Option<Value> {
        match strategy {
            AutoStrategy::Uuid(version) => Some(Value::Uuid(version.generate())),
            AutoStrategy::Increment => None,
            AutoStrategy::Id => self
                .db
                .driver()
                .autogenerate(ty)
                .or_else(|| self.converter().autogenerate(ty)),
        }
    }
}

/// Applies declared producers to the fields absent from the changes. Each
/// producer runs at most once per write; all of its fields share the value.
pub(super) fn apply(changeset: &mut Changeset, declared: &[Autogenerate]) {
    for autogenerate in declared {
        let missing: Vec<&String> = autogenerate
            .fields
            .iter()
            .filter(|field| !changeset.changes.contains_key(field.as_str()))
            .collect();

        if missing.is_empty() {
            continue;
        }

        let value = autogenerate.producer.produce();
        trace!("autogenerated {missing:?}");

        for field in missing {
            changeset
                .changes
                .insert(field.clone(), Change::Value(value.clone()));
        }
    }
}
