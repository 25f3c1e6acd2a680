use super::{dump, Engine, Outcome};
use crate::Options;

use stowage_core::{
    changeset::{Action, Change, Changeset},
    entity::{Assoc, Entity, State},
    schema::{Association, Model},
    stmt::Value,
    Error, Result, TypeConverter,
};

/// Association changes pulled out of a changeset, in declaration order.
pub(super) type Pending = Vec<(String, Change)>;

/// Resolution of one association: the value to attach to the written
/// record, or the change that failed, carrying the invalid changeset.
pub(super) type Resolved = Result<std::result::Result<Assoc, Change>>;

/// Surfaces the record's state into the changes of an insert.
///
/// Non-null values not already changed are merged in. Loaded associations
/// become nested changesets; one holding a record of the wrong model adds a
/// field error instead.
pub(super) fn surface_changes(changeset: &mut Changeset, model: &Model) {
    let Some(data) = &changeset.data else {
        return;
    };

    let mut surfaced = vec![];
    let mut errors = vec![];

    for field in &model.fields {
        let name = field.name();

        if changeset.changes.contains_key(name) {
            continue;
        }

        match field.association() {
            None => {
                let value = data.get(name);

                if !value.is_null() {
                    surfaced.push((name.to_string(), Change::Value(value.clone())));
                }
            }
            Some(association) => match diff(data.assoc(name), &association) {
                Ok(Some(change)) => surfaced.push((name.to_string(), change)),
                Ok(None) => {}
                Err(message) => errors.push((name.to_string(), message)),
            },
        }
    }

    changeset.changes.extend(surfaced);

    for (field, message) in errors {
        changeset.push_error(field, message);
    }
}

/// Compares an association's current value with its empty state.
fn diff(current: &Assoc, association: &Association<'_>) -> std::result::Result<Option<Change>, &'static str> {
    Ok(Some(match current {
        Assoc::NotLoaded | Assoc::One(None) => return Ok(None),
        Assoc::One(Some(related)) => Change::One(Some(Box::new(changeset_for(related, association)?))),
        Assoc::Many(related) if related.is_empty() => return Ok(None),
        Assoc::Many(related) => Change::Many(
            related
                .iter()
                .map(|related| changeset_for(related, association))
                .collect::<std::result::Result<_, _>>()?,
        ),
    }))
}

fn changeset_for(
    related: &Entity,
    association: &Association<'_>,
) -> std::result::Result<Changeset, &'static str> {
    if related.model() != association.target {
        return Err("is invalid");
    }

    let action = match related.state() {
        State::Built => Action::Insert,
        State::Loaded => Action::Update,
        State::Deleted => Action::Delete,
    };

    Ok(Changeset::with_action(related.clone(), action))
}

/// Returns `true` if the changeset holds any association change.
pub(super) fn has_changes(changeset: &Changeset, model: &Model) -> bool {
    changeset
        .changes
        .keys()
        .any(|name| model.field(name).is_some_and(|field| field.ty.is_relation()))
}

/// Pulls association changes out of the changeset, split into parents and
/// children.
pub(super) fn split(changeset: &mut Changeset, model: &Model) -> Result<(Pending, Pending)> {
    let mut parents = vec![];
    let mut children = vec![];

    for field in model.associations() {
        let Some(association) = field.association() else {
            continue;
        };

        let Some(change) = changeset.changes.shift_remove(field.name()) else {
            continue;
        };

        if let Change::Value(_) = change {
            return Err(Error::invalid_argument(format!(
                "`{}.{}` is an association; expected a nested changeset",
                model.name,
                field.name()
            )));
        }

        if association.is_parent() {
            parents.push((field.name().to_string(), change));
        } else {
            children.push((field.name().to_string(), change));
        }
    }

    Ok((parents, children))
}

/// Puts a failed association change and every change not yet resolved back
/// into the changeset, and invalidates it.
pub(super) fn fail(
    mut changeset: Changeset,
    failed: (String, Change),
    rest: impl IntoIterator<Item = (String, Change)>,
) -> Changeset {
    changeset.changes.insert(failed.0, failed.1);
    changeset.changes.extend(rest);
    changeset.valid = false;
    changeset
}

impl Engine {
    /// Persists a parent record and puts its key into the changes.
    pub(super) async fn resolve_parent(
        &self,
        changeset: &mut Changeset,
        model: &Model,
        field: &str,
        change: Change,
        options: &Options,
    ) -> Resolved {
        let association = self.association(model, field)?;

        match change {
            Change::One(None) => {
                put_key(self.converter(), changeset, model, &association, Value::Null)?;
                Ok(Ok(Assoc::One(None)))
            }
            Change::One(Some(related)) => match self.persist(*related, &options.nested()).await? {
                Ok(parent) => {
                    let (key, assoc) = match parent.state() {
                        State::Deleted => (Value::Null, Assoc::One(None)),
                        _ => (
                            parent.get(association.related_key).clone(),
                            Assoc::One(Some(Box::new(parent))),
                        ),
                    };

                    put_key(self.converter(), changeset, model, &association, key)?;
                    Ok(Ok(assoc))
                }
                Err(failed) => Ok(Err(Change::One(Some(Box::new(failed))))),
            },
            Change::Many(_) | Change::Value(_) => Err(Error::invalid_argument(format!(
                "`{}.{field}` expects a single record",
                model.name
            ))),
        }
    }

    /// Persists child records, pointing each at the owner's key.
    pub(super) async fn resolve_child(
        &self,
        owner: &Entity,
        model: &Model,
        field: &str,
        change: Change,
        options: &Options,
    ) -> Resolved {
        let association = self.association(model, field)?;
        let key = owner.get(association.owner_key);
        let options = options.nested();

        match change {
            Change::One(None) => Ok(Ok(Assoc::One(None))),
            Change::One(Some(related)) => {
                match self.persist_child(*related, &association, key, &options).await? {
                    Ok(child) if child.state() == State::Deleted => Ok(Ok(Assoc::One(None))),
                    Ok(child) => Ok(Ok(Assoc::One(Some(Box::new(child))))),
                    Err(failed) => Ok(Err(Change::One(Some(Box::new(failed))))),
                }
            }
            Change::Many(related) => {
                let mut children = vec![];
                let mut pending = related.into_iter();

                while let Some(related) = pending.next() {
                    match self.persist_child(related, &association, key, &options).await? {
                        Ok(child) if child.state() == State::Deleted => {}
                        Ok(child) => children.push(child),
                        Err(failed) => {
                            let mut changes = vec![failed];
                            changes.extend(pending);
                            return Ok(Err(Change::Many(changes)));
                        }
                    }
                }

                Ok(Ok(Assoc::Many(children)))
            }
            Change::Value(_) => Err(Error::invalid_argument(format!(
                "`{}.{field}` expects nested changesets",
                model.name
            ))),
        }
    }

    async fn persist_child(
        &self,
        mut related: Changeset,
        association: &Association<'_>,
        key: &Value,
        options: &Options,
    ) -> Outcome {
        let current = related
            .data
            .as_ref()
            .map(|data| data.get(association.related_key));

        if related.action() != Some(Action::Delete) && current != Some(key) {
            related.changes.insert(
                association.related_key.to_string(),
                Change::Value(key.clone()),
            );
        }

        self.persist(related, options).await
    }

    fn association<'a>(&self, model: &'a Model, field: &str) -> Result<Association<'a>> {
        model
            .field(field)
            .and_then(|field| field.association())
            .ok_or_else(|| {
                Error::invalid_argument(format!("`{}.{field}` is not an association", model.name))
            })
    }
}

/// Puts a foreign key resolved from a parent association into the changes.
/// A value already put there by the caller must store the same as the
/// resolved key; anything else is a conflict.
fn put_key(
    converter: &dyn TypeConverter,
    changeset: &mut Changeset,
    model: &Model,
    association: &Association<'_>,
    key: Value,
) -> Result<()> {
    if let Some(Change::Value(current)) = changeset.changes.get(association.owner_key) {
        let stored = dump::value(converter, model, association.owner_key, current)?;

        if stored != dump::value(converter, model, association.owner_key, &key)? {
            return Err(Error::association_conflict(
                &format!("{}.{}", model.name, association.field),
                association.owner_key,
                current,
                &key,
            ));
        }
    }

    changeset
        .changes
        .insert(association.owner_key.to_string(), Change::Value(key));
    Ok(())
}
