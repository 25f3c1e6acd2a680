mod auto;
pub use auto::{AutoStrategy, Autogenerate, Producer, UuidVersion};

mod field;
pub use field::{Field, FieldName, FieldTy};

mod model;
pub use model::{Model, ModelId};

mod relation;
pub use relation::{Association, BelongsTo, Cardinality, HasMany, HasOne, OnDelete, Relationship};

mod source;
pub use source::Source;

use crate::{Error, Result};

/// The set of models known to a database handle.
#[derive(Debug, Default)]
pub struct Schema {
    models: Vec<Model>,
}

impl Schema {
    /// Builds a schema, assigning model identifiers in registration order and
    /// resolving relation targets by model name.
    pub fn new(models: Vec<Model>) -> Result<Schema> {
        let mut models = models;

        for (index, model) in models.iter_mut().enumerate() {
            model.id = ModelId(index);
        }

        let names: Vec<String> = models.iter().map(|model| model.name.clone()).collect();
        let resolve = |target: &str| -> Result<ModelId> {
            names
                .iter()
                .position(|name| name == target)
                .map(ModelId)
                .ok_or_else(|| Error::invalid_schema(format!("unknown relation target `{target}`")))
        };

        for model in &mut models {
            for field in &mut model.fields {
                match &mut field.ty {
                    FieldTy::Primitive(_) => {}
                    FieldTy::BelongsTo(rel) => rel.target = resolve(&rel.target_name)?,
                    FieldTy::HasOne(rel) => rel.target = resolve(&rel.target_name)?,
                    FieldTy::HasMany(rel) => rel.target = resolve(&rel.target_name)?,
                }
            }
        }

        let schema = Schema { models };
        schema.verify()?;
        Ok(schema)
    }

    pub fn models(&self) -> impl ExactSizeIterator<Item = &Model> {
        self.models.iter()
    }

    #[track_caller]
    pub fn model(&self, id: impl Into<ModelId>) -> &Model {
        &self.models[id.into().0]
    }

    /// Returns the model with the given identifier, if it is registered.
    pub fn get(&self, id: ModelId) -> Option<&Model> {
        self.models.get(id.0)
    }

    pub fn model_by_name(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|model| model.name == name)
    }

    fn verify(&self) -> Result<()> {
        for model in &self.models {
            if model.primary_key_fields().next().is_none() {
                return Err(Error::invalid_schema(format!(
                    "model `{}` has no primary key",
                    model.name
                )));
            }

            if model.fields.iter().filter(|field| field.auto.is_some()).count() > 1 {
                return Err(Error::invalid_schema(format!(
                    "model `{}` declares more than one autogenerated key",
                    model.name
                )));
            }

            for field in &model.fields {
                if field.auto.is_some() && !field.primary_key {
                    return Err(Error::invalid_schema(format!(
                        "`{}.{}` is autogenerated but not part of the primary key",
                        model.name, field.name
                    )));
                }

                let Some(assoc) = field.association() else {
                    continue;
                };

                let target = self.model(assoc.target);

                for (m, key) in [(model, assoc.owner_key), (target, assoc.related_key)] {
                    let exists = m
                        .field(key)
                        .map(|field| field.ty.is_primitive())
                        .unwrap_or(false);

                    if !exists {
                        return Err(Error::invalid_schema(format!(
                            "association `{}.{}` references missing field `{}.{}`",
                            model.name, field.name, m.name, key
                        )));
                    }
                }
            }

            for entry in model.autogenerate.iter().chain(&model.autoupdate) {
                for name in &entry.fields {
                    if model.field(name).is_none() {
                        return Err(Error::invalid_schema(format!(
                            "autogenerated field `{}.{}` is not declared",
                            model.name, name
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}
