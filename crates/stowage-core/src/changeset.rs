mod action;
pub use action::Action;

mod constraint;
pub use constraint::{Constraint, ConstraintKind, Match};

use crate::{
    entity::Entity,
    stmt::{Row, Value},
    Error, Result,
};

use indexmap::IndexMap;
use std::{fmt, sync::Arc};

/// Pending changes to one entity: the unit of work handed to the database
/// handle.
///
/// Once `valid` is `false` the changeset is inert; no write is issued for it.
#[derive(Debug, Clone)]
pub struct Changeset {
    /// The record being acted on
    pub data: Option<Entity>,

    /// Field changes, not yet dumped. Association fields map to nested
    /// changesets.
    pub changes: IndexMap<String, Change>,

    pub errors: Vec<FieldError>,

    pub valid: bool,

    action: Option<Action>,

    /// Extra filters scoping an update or delete, on top of the primary key
    pub filters: Row,

    /// Constraints consulted when storage reports a violation
    pub constraints: Vec<Constraint>,

    /// Hooks run, in order, right before the write
    pub prepare: Vec<Prepare>,
}

#[derive(Debug, Clone)]
pub enum Change {
    Value(Value),

    /// Change to a single-record association. `None` clears it.
    One(Option<Box<Changeset>>),

    Many(Vec<Changeset>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// A hook transforming a changeset before it is written.
#[derive(Clone)]
pub struct Prepare(Arc<dyn Fn(Changeset) -> Changeset + Send + Sync>);

impl Changeset {
    pub fn new(data: Entity) -> Changeset {
        Changeset {
            data: Some(data),
            ..Changeset::empty()
        }
    }

    /// A changeset over `data` already stamped with `action`.
    pub fn with_action(data: Entity, action: Action) -> Changeset {
        Changeset {
            data: Some(data),
            action: Some(action),
            ..Changeset::empty()
        }
    }

    /// A changeset without a record. Every write rejects it.
    pub fn empty() -> Changeset {
        Changeset {
            data: None,
            changes: IndexMap::new(),
            errors: vec![],
            valid: true,
            action: None,
            filters: Row::new(),
            constraints: vec![],
            prepare: vec![],
        }
    }

    pub fn action(&self) -> Option<Action> {
        self.action
    }

    /// Stamps the changeset with `action`. Stamping it again with the same
    /// action is allowed; a different one is a caller error.
    pub fn put_action(&mut self, action: Action) -> Result<()> {
        match self.action {
            Some(current) if current != action => Err(Error::action_conflict(current, action)),
            _ => {
                self.action = Some(action);
                Ok(())
            }
        }
    }

    /// Sets a field change.
    pub fn put(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.changes
            .insert(field.into(), Change::Value(value.into()));
        self
    }

    /// Sets (or clears) a single-record association.
    pub fn put_one(mut self, field: impl Into<String>, related: Option<Changeset>) -> Self {
        self.changes
            .insert(field.into(), Change::One(related.map(Box::new)));
        self
    }

    pub fn put_many(mut self, field: impl Into<String>, related: Vec<Changeset>) -> Self {
        self.changes.insert(field.into(), Change::Many(related));
        self
    }

    /// Adds an error and invalidates the changeset.
    pub fn add_error(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.push_error(field, message);
        self
    }

    pub fn push_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
        self.valid = false;
    }

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Maps the unique index `{table}_{field}_index` onto `field`.
    pub fn unique_constraint(self, field: &str) -> Self {
        let name = self.default_constraint_name(field, "index");
        self.constraint(Constraint::new(ConstraintKind::Unique, name, field))
    }

    /// Maps the foreign key `{table}_{field}_fkey` onto `field`.
    pub fn foreign_key_constraint(self, field: &str) -> Self {
        let name = self.default_constraint_name(field, "fkey");
        self.constraint(Constraint::new(ConstraintKind::ForeignKey, name, field))
    }

    pub fn check_constraint(self, field: &str, name: &str) -> Self {
        self.constraint(Constraint::new(ConstraintKind::Check, name, field))
    }

    pub fn exclusion_constraint(self, field: &str, name: &str) -> Self {
        self.constraint(Constraint::new(ConstraintKind::Exclusion, name, field))
    }

    pub fn prepare_changes(
        mut self,
        hook: impl Fn(Changeset) -> Changeset + Send + Sync + 'static,
    ) -> Self {
        self.prepare.push(Prepare(Arc::new(hook)));
        self
    }

    /// Guards the write with the record's current `field` value and bumps it.
    ///
    /// When the stored version moved on in the meantime the write matches no
    /// rows and fails as stale.
    pub fn optimistic_lock(mut self, field: &str) -> Self {
        let current = self
            .data
            .as_ref()
            .map(|data| data.get(field).clone())
            .unwrap_or_default();

        let next = match current {
            Value::I32(v) => v.checked_add(1).map(Value::I32),
            Value::I64(v) => v.checked_add(1).map(Value::I64),
            _ => return self.add_error(field, "must be an integer to be used as a lock"),
        };

        let Some(next) = next else {
            return self.add_error(field, "lock version is exhausted");
        };

        self.filters.insert(field.to_string(), current);
        self.put(field, next)
    }

    /// Returns the plain value change for `field`, if any.
    pub fn value_change(&self, field: &str) -> Option<&Value> {
        match self.changes.get(field)? {
            Change::Value(value) => Some(value),
            _ => None,
        }
    }

    fn default_constraint_name(&self, field: &str, suffix: &str) -> String {
        match &self.data {
            Some(data) => format!("{}_{field}_{suffix}", data.meta.source.table),
            None => format!("{field}_{suffix}"),
        }
    }
}

impl From<Entity> for Changeset {
    fn from(value: Entity) -> Self {
        Changeset::new(value)
    }
}

impl Prepare {
    pub fn run(&self, changeset: Changeset) -> Changeset {
        (self.0)(changeset)
    }
}

impl fmt::Debug for Prepare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Prepare(..)")
    }
}
