use super::{constraint, dump, prepare, Engine, Nesting, Outcome};
use crate::Options;

use stowage_core::{
    changeset::{Action, Changeset},
    driver::{operation, Response},
    entity::State,
    schema::{Association, Model, OnDelete, Source},
    stmt::{Row, Value},
    Error, Result,
};

use async_recursion::async_recursion;
use log::debug;

impl Engine {
    #[async_recursion]
    pub(crate) async fn delete(
        &self,
        mut changeset: Changeset,
        options: &Options,
        nesting: Nesting,
    ) -> Outcome {
        let Some(data) = &changeset.data else {
            return Err(Error::missing_record(Action::Delete));
        };

        let model = self.model(data.model())?;
        changeset.put_action(Action::Delete)?;

        if !changeset.valid {
            return Ok(Err(changeset));
        }

        let wrap = self.wraps(
            nesting,
            cascades(model).next().is_some() || !changeset.prepare.is_empty(),
        );

        self.transaction(wrap, self.perform_delete(changeset, options, model))
            .await
    }

    async fn perform_delete(
        &self,
        changeset: Changeset,
        options: &Options,
        model: &Model,
    ) -> Outcome {
        let mut changeset = prepare(changeset);

        if !changeset.valid {
            return Ok(Err(changeset));
        }

        // Deletion persists no field changes.
        changeset.changes.clear();

        let Some(data) = &changeset.data else {
            return Err(Error::missing_record(Action::Delete));
        };

        let source = self.source(data, options);
        let filters = self.filters(model, &changeset, Action::Delete)?;

        // Children go first so no row is left referencing the deleted one.
        for association in cascades(model) {
            let key = data.get(association.owner_key);

            if key.is_null() {
                continue;
            }

            match self.cascade(&association, &source, key).await? {
                Response::ConstraintViolation(violations) => {
                    return Ok(Err(constraint::translate(changeset, &violations)?));
                }
                Response::Row(_) | Response::Rows { .. } | Response::Stale | Response::Done => {}
            }
        }

        let op = operation::Delete {
            source: source.clone(),
            filters,
        };

        match self.exec(op).await? {
            Response::Row(_) | Response::Done => {}
            Response::Stale => return Err(Error::stale_write(Action::Delete, &source)),
            Response::ConstraintViolation(violations) => {
                return Ok(Err(constraint::translate(changeset, &violations)?));
            }
            other => {
                return Err(Error::invalid_result(format!(
                    "unexpected response to delete from `{source}`: {other:?}"
                )))
            }
        }

        let mut entity = data.clone();
        entity.meta.state = State::Deleted;
        entity.meta.source = source;

        Ok(Ok(entity))
    }

    /// Applies a child association's delete policy to the rows referencing
    /// `key`. Matching no rows is fine.
    async fn cascade(
        &self,
        association: &Association<'_>,
        owner: &Source,
        key: &Value,
    ) -> Result<Response> {
        let target = self.model(association.target)?;
        let source = target.source.prefixed(owner.prefix.as_deref());
        let column = dump::column(target, association.related_key)?;

        let mut filters = Row::new();
        filters.insert(
            column.to_string(),
            dump::value(self.converter(), target, association.related_key, key)?,
        );

        debug!(
            "cascading {:?} from `{owner}` to `{source}` via `{}`",
            association.on_delete, association.field
        );

        match association.on_delete {
            OnDelete::DeleteAll => self.exec(operation::Delete { source, filters }).await,
            OnDelete::NilifyAll => {
                let mut changes = Row::new();
                changes.insert(column.to_string(), Value::Null);

                self.exec(operation::Update {
                    source,
                    changes,
                    filters,
                    returning: vec![],
                })
                .await
            }
            OnDelete::Nothing => Ok(Response::Done),
        }
    }
}

/// Child associations declaring a delete policy.
fn cascades(model: &Model) -> impl Iterator<Item = Association<'_>> + '_ {
    model
        .associations()
        .filter_map(|field| field.association())
        .filter(|association| !association.is_parent() && association.on_delete != OnDelete::Nothing)
}
