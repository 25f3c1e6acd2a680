//! Models shared by the integration tests.
//!
//! - `Team` has an integer key the driver generates.
//! - `User` belongs to a team, has many posts (deleted with the user) and one
//!   profile (detached from the user on delete). It carries timestamps.
//! - `Post` has a client-generated UUID v4 key.
//! - `Profile` has a UUID key produced by the type converter, and a field
//!   stored under a different column name.
//! - `Tag` has an incrementing key and lives in the `blog` namespace.

use stowage::{
    schema::{
        AutoStrategy, BelongsTo, Field, HasMany, HasOne, Model, OnDelete, UuidVersion,
    },
    stmt::{Type, Value},
    Db, Entity,
};

pub fn models() -> Vec<Model> {
    vec![team(), user(), post(), profile(), tag()]
}

fn team() -> Model {
    Model::new("Team", "teams")
        .add_field(Field::new("id", Type::I64).primary_key().auto(AutoStrategy::Id))
        .add_field(Field::new("name", Type::String))
}

fn user() -> Model {
    Model::new("User", "users")
        .add_field(Field::new("id", Type::I64).primary_key().auto(AutoStrategy::Id))
        .add_field(Field::new("name", Type::String))
        .add_field(Field::new("email", Type::String))
        .add_field(Field::new("version", Type::I64))
        .add_field(Field::new("team_id", Type::I64))
        .add_field(Field::new("team", BelongsTo::new("Team", "team_id")))
        .add_field(Field::new(
            "posts",
            HasMany::new("Post", "user_id").on_delete(OnDelete::DeleteAll),
        ))
        .add_field(Field::new(
            "profile",
            HasOne::new("Profile", "user_id").on_delete(OnDelete::NilifyAll),
        ))
        .timestamps()
}

fn post() -> Model {
    Model::new("Post", "posts")
        .add_field(
            Field::new("id", Type::Uuid)
                .primary_key()
                .auto(AutoStrategy::Uuid(UuidVersion::V4)),
        )
        .add_field(Field::new("title", Type::String))
        .add_field(Field::new("user_id", Type::I64))
        .add_field(Field::new("user", BelongsTo::new("User", "user_id")))
}

fn profile() -> Model {
    Model::new("Profile", "profiles")
        .add_field(Field::new("id", Type::Uuid).primary_key().auto(AutoStrategy::Id))
        .add_field(Field::new("bio", Type::String).column("biography"))
        .add_field(Field::new("user_id", Type::I64))
}

fn tag() -> Model {
    Model::new("Tag", "tags")
        .prefix("blog")
        .add_field(
            Field::new("id", Type::I64)
                .primary_key()
                .auto(AutoStrategy::Increment),
        )
        .add_field(Field::new("label", Type::String))
        .read_after_writes("label")
}

/// Returns the registered model named `name`.
pub fn model<'a>(db: &'a Db, name: &str) -> &'a Model {
    db.schema().model_by_name(name).unwrap()
}

/// A new, unsaved record of the model named `name`.
pub fn build(db: &Db, name: &str) -> Entity {
    Entity::new(model(db, name))
}

/// A record as if read from storage.
pub fn loaded<K, V>(db: &Db, name: &str, values: impl IntoIterator<Item = (K, V)>) -> Entity
where
    K: Into<String>,
    V: Into<Value>,
{
    Entity::loaded(model(db, name), values)
}
