mod autogenerate;
mod constraint;
mod delete;
mod dump;
mod insert;
mod insert_all;
mod relation;
mod transaction;
mod update;

use crate::{Db, Options, Returning};

use stowage_core::{
    changeset::{Action, Changeset},
    driver::{Operation, Response},
    entity::{Entity, State},
    schema::{Model, ModelId, Source},
    stmt::Row,
    Error, Result, TypeConverter,
};

use async_recursion::async_recursion;
use log::debug;

/// Result of a single-record write: fatal errors in the outer `Result`, a
/// changeset that failed validation in the inner one.
pub(crate) type Outcome = Result<std::result::Result<Entity, Changeset>>;

/// Whether a write was requested by the caller or issued while persisting
/// the associations of another write. Only root writes open transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Nesting {
    Root,
    Nested,
}

/// Sequences the driver calls realizing a changeset.
#[derive(Debug)]
pub(crate) struct Engine {
    db: Db,
}

impl Engine {
    pub(crate) fn new(db: Db) -> Engine {
        Engine { db }
    }

    pub(crate) async fn insert_or_update(
        &self,
        changeset: Changeset,
        options: &Options,
        nesting: Nesting,
    ) -> Outcome {
        let Some(data) = &changeset.data else {
            return Err(Error::missing_record(Action::Insert));
        };

        match data.state() {
            State::Built => self.insert(changeset, options, nesting).await,
            State::Loaded => self.update(changeset, options, nesting).await,
            State::Deleted => Err(Error::invalid_argument(format!(
                "cannot insert or update a deleted `{}` record",
                self.model(data.model())?.name
            ))),
        }
    }

    /// Persists an associated record according to its changeset's action,
    /// or its lifecycle state when no action is stamped yet.
    #[async_recursion]
    async fn persist(&self, changeset: Changeset, options: &Options) -> Outcome {
        match changeset.action() {
            Some(Action::Insert) => self.insert(changeset, options, Nesting::Nested).await,
            Some(Action::Update) => self.update(changeset, options, Nesting::Nested).await,
            Some(Action::Delete) => self.delete(changeset, options, Nesting::Nested).await,
            None => {
                self.insert_or_update(changeset, options, Nesting::Nested)
                    .await
            }
        }
    }

    async fn exec(&self, op: impl Into<Operation>) -> Result<Response> {
        let op = op.into();

        match &op {
            Operation::Insert(insert) => debug!(
                "insert source={}; columns={:?}; returning={:?}",
                insert.source,
                insert.changes.keys().collect::<Vec<_>>(),
                insert.returning
            ),
            Operation::Update(update) => debug!(
                "update source={}; columns={:?}; filters={:?}",
                update.source,
                update.changes.keys().collect::<Vec<_>>(),
                update.filters.keys().collect::<Vec<_>>()
            ),
            Operation::Delete(delete) => debug!(
                "delete source={}; filters={:?}",
                delete.source,
                delete.filters.keys().collect::<Vec<_>>()
            ),
            Operation::InsertAll(insert_all) => debug!(
                "insert_all source={}; header={:?}; rows={}",
                insert_all.source,
                insert_all.header,
                insert_all.rows.len()
            ),
            Operation::Transaction(op) => debug!("transaction op={op:?}"),
        }

        self.db.driver().exec(op).await
    }

    fn model(&self, id: ModelId) -> Result<&Model> {
        self.db
            .schema()
            .get(id)
            .ok_or_else(|| Error::invalid_argument(format!("model {id:?} is not registered")))
    }

    fn converter(&self) -> &dyn TypeConverter {
        self.db.converter()
    }

    /// Where a record is written: the per-call prefix wins over the record's
    /// own, which wins over the database default.
    fn source(&self, data: &Entity, options: &Options) -> Source {
        let prefix = options
            .prefix
            .as_deref()
            .or(data.meta.source.prefix.as_deref())
            .or(self.db.default_prefix());

        data.meta.source.prefixed(prefix)
    }

    /// Columns requested back after a single-record write.
    fn returning(&self, model: &Model, options: &Options) -> Result<Vec<String>> {
        let requested: Vec<&str> = match &options.returning {
            Returning::Nothing => vec![],
            Returning::All => model.primitives().map(|field| field.name()).collect(),
            Returning::Fields(fields) if fields.is_empty() => {
                return Err(Error::invalid_argument(
                    "`returning` expects at least one field",
                ))
            }
            Returning::Fields(fields) => fields.iter().map(String::as_str).collect(),
        };

        let mut columns = vec![];

        for name in requested
            .into_iter()
            .chain(model.read_after_writes.iter().map(String::as_str))
        {
            let column = dump::column(model, name)?;

            if !columns.iter().any(|existing| existing == column) {
                columns.push(column.to_string());
            }
        }

        Ok(columns)
    }

    /// Equality filters scoping an update or delete: the primary key, then
    /// any filters declared on the changeset.
    fn filters(&self, model: &Model, changeset: &Changeset, action: Action) -> Result<Row> {
        let Some(data) = &changeset.data else {
            return Err(Error::missing_record(action));
        };

        let mut filters = Row::new();

        for field in model.primary_key_fields() {
            let value = data.get(field.name());

            if value.is_null() {
                return Err(Error::missing_primary_key(action, &model.name, field.name()));
            }

            filters.insert(
                field.column_name().to_string(),
                dump::value(self.converter(), model, field.name(), value)?,
            );
        }

        for (name, value) in &changeset.filters {
            filters.insert(
                dump::column(model, name)?.to_string(),
                dump::value(self.converter(), model, name, value)?,
            );
        }

        Ok(filters)
    }
}

/// Runs the changeset's prepare hooks, in declaration order.
fn prepare(mut changeset: Changeset) -> Changeset {
    for hook in std::mem::take(&mut changeset.prepare) {
        changeset = hook.run(changeset);
    }

    changeset
}
