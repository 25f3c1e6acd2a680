use super::{
    autogenerate::{self, IdSource},
    constraint, dump, prepare, relation, Engine, Nesting, Outcome,
};
use crate::Options;

use stowage_core::{
    changeset::{Action, Changeset},
    driver::{operation, Response},
    entity::State,
    schema::Model,
    Error,
};

use async_recursion::async_recursion;

impl Engine {
    #[async_recursion]
    pub(crate) async fn insert(
        &self,
        mut changeset: Changeset,
        options: &Options,
        nesting: Nesting,
    ) -> Outcome {
        let Some(data) = &changeset.data else {
            return Err(Error::missing_record(Action::Insert));
        };

        let model = self.model(data.model())?;
        changeset.put_action(Action::Insert)?;

        if !changeset.valid {
            return Ok(Err(changeset));
        }

        relation::surface_changes(&mut changeset, model);

        if !changeset.valid {
            return Ok(Err(changeset));
        }

        let wrap = self.wraps(
            nesting,
            relation::has_changes(&changeset, model) || !changeset.prepare.is_empty(),
        );

        self.transaction(wrap, self.perform_insert(changeset, options, model))
            .await
    }

    async fn perform_insert(
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
            return Err(Error::missing_record(Action::Insert));
        };

        let source = self.source(data, options);

        autogenerate::apply(&mut changeset, &model.autogenerate);
        let id = self.autogenerate_id(model, &mut changeset);

        let mut returning = self.returning(model, options)?;

        if let IdSource::Returning(column) = id {
            if !returning.contains(&column) {
                returning.push(column);
            }
        }

        let changes = dump::changes(self.converter(), model, &changeset.changes)?;

        let op = operation::Insert {
            source: source.clone(),
            changes,
            returning,
        };

        let returned = match self.exec(op).await? {
            Response::Row(row) => row,
            Response::Done => Default::default(),
            Response::ConstraintViolation(violations) => {
                return Ok(Err(constraint::translate(changeset, &violations)?));
            }
            other => {
                return Err(Error::invalid_result(format!(
                    "unexpected response to insert into `{source}`: {other:?}"
                )))
            }
        };

        let mut entity = changeset
            .data
            .clone()
            .ok_or_else(|| Error::missing_record(Action::Insert))?;

        dump::apply_changes(&mut entity, &changeset.changes);
        dump::load_row(self.converter(), model, &mut entity, returned)?;
        entity.meta.state = State::Loaded;
        entity.meta.source = source;

        for (field, assoc) in resolved {
            entity.set_assoc(field, assoc);
        }

        // Children last: they need the key the write produced.
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
