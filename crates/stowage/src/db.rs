mod builder;
pub use builder::Builder;

mod transaction;
pub(crate) use transaction::Transaction;

use crate::{
    engine::{Engine, Nesting},
    InsertAllOptions, Options, Target,
};

use stowage_core::{
    changeset::Action,
    driver::Driver,
    stmt::Row,
    Changeset, Entity, Error, Result, Schema, TypeConverter,
};

use std::sync::Arc;

/// Shared state between all `Db` clones.
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) driver: Box<dyn Driver>,
    pub(crate) schema: Schema,
    pub(crate) converter: Box<dyn TypeConverter>,
    pub(crate) default_prefix: Option<String>,
}

/// A database handle.
///
/// Cloning is cheap; clones share the driver and schema. Writes that return
/// `Result<Result<Entity, Changeset>>` report fatal errors in the outer
/// `Result` and validation failures, including translated constraint
/// violations, as `Err(changeset)` in the inner one. The `*_strict` variants
/// turn the latter into [`Error::invalid_changeset`].
#[derive(Debug, Clone)]
pub struct Db {
    shared: Arc<Shared>,

    /// Set on the handle passed to a transaction body.
    in_transaction: bool,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Schema {
        &self.shared.schema
    }

    pub fn driver(&self) -> &dyn Driver {
        &*self.shared.driver
    }

    pub(crate) fn converter(&self) -> &dyn TypeConverter {
        &*self.shared.converter
    }

    pub(crate) fn default_prefix(&self) -> Option<&str> {
        self.shared.default_prefix.as_deref()
    }

    /// Returns `true` when this handle runs inside a transaction.
    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    /// Inserts the record, along with any associated records it carries.
    pub async fn insert(
        &self,
        changeset: impl Into<Changeset>,
        options: Options,
    ) -> Result<std::result::Result<Entity, Changeset>> {
        self.engine()
            .insert(changeset.into(), &options, Nesting::Root)
            .await
    }

    pub async fn insert_strict(
        &self,
        changeset: impl Into<Changeset>,
        options: Options,
    ) -> Result<Entity> {
        strict(Action::Insert, self.insert(changeset, options).await?)
    }

    /// Writes the changes of a loaded record.
    pub async fn update(
        &self,
        changeset: impl Into<Changeset>,
        options: Options,
    ) -> Result<std::result::Result<Entity, Changeset>> {
        self.engine()
            .update(changeset.into(), &options, Nesting::Root)
            .await
    }

    pub async fn update_strict(
        &self,
        changeset: impl Into<Changeset>,
        options: Options,
    ) -> Result<Entity> {
        strict(Action::Update, self.update(changeset, options).await?)
    }

    /// Deletes a loaded record, cascading to child records first.
    pub async fn delete(
        &self,
        changeset: impl Into<Changeset>,
        options: Options,
    ) -> Result<std::result::Result<Entity, Changeset>> {
        self.engine()
            .delete(changeset.into(), &options, Nesting::Root)
            .await
    }

    pub async fn delete_strict(
        &self,
        changeset: impl Into<Changeset>,
        options: Options,
    ) -> Result<Entity> {
        strict(Action::Delete, self.delete(changeset, options).await?)
    }

    /// Inserts a built record or updates a loaded one.
    pub async fn insert_or_update(
        &self,
        changeset: impl Into<Changeset>,
        options: Options,
    ) -> Result<std::result::Result<Entity, Changeset>> {
        self.engine()
            .insert_or_update(changeset.into(), &options, Nesting::Root)
            .await
    }

    pub async fn insert_or_update_strict(
        &self,
        changeset: impl Into<Changeset>,
        options: Options,
    ) -> Result<Entity> {
        match self.insert_or_update(changeset, options).await? {
            Ok(entity) => Ok(entity),
            Err(changeset) => {
                let action = changeset.action().unwrap_or(Action::Insert);
                Err(Error::invalid_changeset(action, changeset))
            }
        }
    }

    /// Inserts a batch of rows in a single driver call.
    ///
    /// Returns the number of rows written and, when requested, the returned
    /// fields of each row.
    pub async fn insert_all(
        &self,
        target: impl Into<Target>,
        rows: Vec<Row>,
        options: InsertAllOptions,
    ) -> Result<(u64, Option<Vec<Row>>)> {
        self.engine()
            .insert_all(target.into(), rows, &options)
            .await
    }

    fn engine(&self) -> Engine {
        Engine::new(self.clone())
    }
}

fn strict(action: Action, outcome: std::result::Result<Entity, Changeset>) -> Result<Entity> {
    outcome.map_err(|changeset| Error::invalid_changeset(action, changeset))
}
