use super::{autogenerate, constraint, dump, prepare, relation, Engine, Nesting, Outcome};
use crate::Options;

use stowage_core::{
    changeset::{Action, Change, Changeset},
    driver::{operation, Response},
    entity::State,
    schema::Model,
    stmt::Row,
    Error,
};

use async_recursion::async_recursion;
use log::debug;

impl Engine {
    /// Writes the changes as given; the record is never diffed.
    #[async_recursion]
    pub(crate) async fn update(
        &self,
        mut changeset: Changeset,
        options: &Options,
        nesting: Nesting,
    ) -> Outcome {
        let Some(data) = &changeset.data else {
            return Err(Error::missing_record(Action::Update));
        };

        let model = self.model(data.model())?;
        changeset.put_action(Action::Update)?;

        if !changeset.valid {
            return Ok(Err(changeset));
        }

        if changeset.changes.is_empty() && !options.force {
            debug!("update of `{}` has no changes; skipping", model.name);

            return changeset
                .data
                .map(Ok)
                .ok_or_else(|| Error::missing_record(Action::Update));
        }

        let wrap = self.wraps(
            nesting,
            relation::has_changes(&changeset, model) || !changeset.prepare.is_empty(),
        );

        self.transaction(wrap, self.perform_update(changeset, options, model))
            .await
    }

    async fn perform_update(
        &self,
        changeset: Changeset,
        options: &Options,
        model: &Model,
    ) -> Outcome {
        let mut changeset = prepare(changeset);

        if !changeset.valid {
            return Ok(Err(changeset));
        }

        let (parents, children) = relation::split(&mut changeset, model)?;
        let mut resolved = vec![];
        let mut parents = parents.into_iter();

        while let Some((field, change)) = parents.next() {
            match self
                .resolve_parent(&mut changeset, model, &field, change, options)
                .await?
            {
                Ok(assoc) => resolved.push((field, assoc)),
                Err(failed) => {
                    let rest = parents.chain(children);
                    return Ok(Err(relation::fail(changeset, (field, failed), rest)));
                }
            }
        }

        let Some(data) = &changeset.data else {
            return Err(Error::missing_record(Action::Update));
        };

        let source = self.source(data, options);
        let filters = self.filters(model, &changeset, Action::Update)?;

        // Fields refreshed on update only move when something else is
        // written, or the caller forces the write.
        let writes = changeset
            .changes
            .values()
            .any(|change| matches!(change, Change::Value(_)));

        if writes || options.force {
            autogenerate::apply(&mut changeset, &model.autoupdate);
        }

        let changes = dump::changes(self.converter(), model, &changeset.changes)?;
        let mut returned = Row::new();

        if changes.is_empty() {
            debug!("update of `{}` writes no fields; skipping", model.name);
        } else {
            let op = operation::Update {
                source: source.clone(),
                changes,
                filters,
                returning: self.returning(model, options)?,
            };

            match self.exec(op).await? {
                Response::Row(row) => returned = row,
                Response::Done => {}
                Response::Stale => return Err(Error::stale_write(Action::Update, &source)),
                Response::ConstraintViolation(violations) => {
                    return Ok(Err(constraint::translate(changeset, &violations)?));
                }
                other => {
                    return Err(Error::invalid_result(format!(
                        "unexpected response to update of `{source}`: {other:?}"
                    )))
                }
            }
        }

        let mut entity = changeset
            .data
            .clone()
            .ok_or_else(|| Error::missing_record(Action::Update))?;

        dump::apply_changes(&mut entity, &changeset.changes);
        dump::load_row(self.converter(), model, &mut entity, returned)?;
        entity.meta.state = State::Loaded;
        entity.meta.source = source;

        for (field, assoc) in resolved {
            entity.set_assoc(field, assoc);
        }

        let mut children = children.into_iter();

        while let Some((field, change)) = children.next() {
            match self
                .resolve_child(&entity, model, &field, change, options)
                .await?
            {
                Ok(assoc) => entity.set_assoc(field, assoc),
                Err(failed) => {
                    return Ok(Err(relation::fail(changeset, (field, failed), children)));
                }
            }
        }

        Ok(Ok(entity))
    }
}
