use super::{Db, Shared};
use crate::Result;

use stowage_core::{
    convert::Builtin,
    driver::Driver,
    schema::{Model, Schema},
    TypeConverter,
};

use std::sync::Arc;

#[derive(Default)]
pub struct Builder {
    /// Model definitions, in registration order
    models: Vec<Model>,

    /// Defaults to [`Builtin`] when not set
    converter: Option<Box<dyn TypeConverter>>,

    default_prefix: Option<String>,
}

impl Builder {
    pub fn register(&mut self, model: Model) -> &mut Self {
        self.models.push(model);
        self
    }

    /// Set the type converter used to dump and load field values
    pub fn type_converter(&mut self, converter: impl TypeConverter) -> &mut Self {
        self.converter = Some(Box::new(converter));
        self
    }

    /// Set the namespace for records whose model declares none
    pub fn default_prefix(&mut self, prefix: &str) -> &mut Self {
        self.default_prefix = Some(prefix.to_string());
        self
    }

    pub fn build(&mut self, driver: impl Driver) -> Result<Db> {
        let schema = Schema::new(std::mem::take(&mut self.models))?;

        log::debug!(
            "building db; models={}; capability={:?}",
            schema.models().len(),
            driver.capability()
        );

        Ok(Db {
            shared: Arc::new(Shared {
                driver: Box::new(driver),
                schema,
                converter: self.converter.take().unwrap_or_else(|| Box::new(Builtin)),
                default_prefix: self.default_prefix.clone(),
            }),
            in_transaction: false,
        })
    }
}
