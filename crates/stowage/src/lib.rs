pub mod db;
pub use db::Db;

mod engine;

pub mod options;
pub use options::{InsertAllOptions, Options, Returning, Target};

pub use stowage_core::{
    changeset::{self, Action, Change, Constraint, ConstraintKind},
    convert, driver,
    entity::{self, Assoc, State},
    schema, stmt, Changeset, Entity, Error, Result,
};
