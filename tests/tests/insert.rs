use pretty_assertions::assert_eq;
use stowage::{
    driver::{operation, Operation},
    schema::{Field, Model, Source},
    stmt::{Type, Value},
    Action, Changeset, Entity, Options,
};
use tests::{
    fixtures::{build, loaded},
    *,
};

#[tokio::test]
async fn insert_reads_back_storage_generated_key() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let team = build(&db, "Team").with("name", "core");
    let team = assert_written!(db.insert(team, Options::new()).await);

    assert_eq!(
        team,
        loaded(&db, "Team", [("id", Value::from(1_i64)), ("name", "core".into())])
    );

    assert_eq!(
        driver.log().operations(),
        [Operation::Insert(operation::Insert {
            source: Source::new("teams"),
            changes: row([("name", "core".into())]),
            returning: vec!["id".to_string()],
        })]
    );
}

#[tokio::test]
async fn insert_with_supplied_key() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let team = build(&db, "Team").with("id", 42_i64).with("name", "core");
    let team = assert_written!(db.insert(team, Options::new()).await);

    assert_eq!(team.get("id"), &Value::I64(42));

    let Some(Operation::Insert(insert)) = driver.log().pop_write() else {
        panic!("expected an insert");
    };
    assert_eq!(insert.changes, row([("id", 42_i64.into()), ("name", "core".into())]));
    assert!(insert.returning.is_empty());
}

#[tokio::test]
async fn null_fields_are_not_written() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    assert_written!(db.insert(build(&db, "Team"), Options::new()).await);

    let Some(Operation::Insert(insert)) = driver.log().pop_write() else {
        panic!("expected an insert");
    };
    assert!(insert.changes.is_empty());
}

#[tokio::test]
async fn changes_override_record_values() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let changeset = Changeset::new(build(&db, "Team").with("name", "old")).put("name", "new");
    let team = assert_written!(db.insert(changeset, Options::new()).await);

    assert_eq!(team.get("name"), &Value::from("new"));
}

#[tokio::test]
async fn invalid_changeset_never_reaches_the_driver() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let changeset = Changeset::new(build(&db, "Team")).add_error("name", "can't be blank");
    let changeset = assert_invalid!(db.insert(changeset, Options::new()).await);

    assert!(driver.log().is_empty());
    assert_eq!(changeset.action(), Some(Action::Insert));
    assert_eq!(changeset.errors.len(), 1);
    assert_eq!(changeset.errors[0].field, "name");
    assert_eq!(changeset.errors[0].message, "can't be blank");
}

#[tokio::test]
async fn unregistered_model_fails() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let ghost = Model::new("Ghost", "ghosts")
        .add_field(Field::new("id", Type::I64).primary_key());
    let record = Entity::new(&ghost).with("id", 1_i64);

    let err = assert_err!(db.insert(record.clone(), Options::new()).await);
    assert!(err.is_invalid_argument());

    let err = assert_err!(db.delete(record, Options::new()).await);
    assert!(err.is_invalid_argument());

    assert!(driver.log().is_empty());
}

#[tokio::test]
async fn insert_strict_raises_invalid_changeset() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let changeset = Changeset::new(build(&db, "Team")).add_error("name", "can't be blank");
    let err = assert_err!(db.insert_strict(changeset, Options::new()).await);

    assert!(err.is_invalid_changeset());
    assert_eq!(
        err.to_string(),
        "could not perform insert because changeset is invalid: name can't be blank"
    );
    assert_eq!(err.changeset().unwrap().errors.len(), 1);
}

#[tokio::test]
async fn insert_without_record_fails() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let err = assert_err!(db.insert(Changeset::empty(), Options::new()).await);
    assert!(err.is_missing_record());
    assert!(driver.log().is_empty());
}

#[tokio::test]
async fn conflicting_action_fails() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let team = loaded(&db, "Team", [("id", 1_i64)]);
    let changeset = Changeset::with_action(team, Action::Update);

    let err = assert_err!(db.insert(changeset, Options::new()).await);
    assert!(err.is_action_conflict());
    assert!(driver.log().is_empty());
}

#[tokio::test]
async fn value_of_wrong_type_fails() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let team = build(&db, "Team").with("name", 5_i64);
    let err = assert_err!(db.insert(team, Options::new()).await);

    assert!(err.is_type_mismatch());
    assert!(err.to_string().starts_with("value `I64(5)` for `Team.name` does not match type string"));
    assert!(driver.log().is_empty());
}

#[tokio::test]
async fn unknown_field_fails() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let changeset = Changeset::new(build(&db, "Team")).put("nickname", "x");
    let err = assert_err!(db.insert(changeset, Options::new()).await);

    assert!(err.is_invalid_argument());
}

#[tokio::test]
async fn fields_are_written_to_their_columns() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let profile = build(&db, "Profile").with("bio", "hello");
    let profile = assert_written!(
        db.insert(profile, Options::new().returning(stowage::Returning::All))
            .await
    );

    let Some(Operation::Insert(insert)) = driver.log().pop_write() else {
        panic!("expected an insert");
    };
    assert_eq!(insert.changes["biography"], Value::from("hello"));
    assert!(!insert.changes.contains_key("bio"));
    assert_eq!(insert.returning, ["id", "biography", "user_id"]);

    // Loaded back under the field name
    assert_eq!(profile.get("bio"), &Value::from("hello"));
}

#[tokio::test]
async fn read_after_writes_fields_are_requested() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let tag = build(&db, "Tag").with("label", "rust");
    let tag = assert_written!(db.insert(tag, Options::new()).await);

    let Some(Operation::Insert(insert)) = driver.log().pop_write() else {
        panic!("expected an insert");
    };
    assert_eq!(insert.source, Source::with_prefix("blog", "tags"));
    assert_eq!(insert.returning, ["label", "id"]);
    assert_eq!(tag.get("id"), &Value::I64(1));
}

#[tokio::test]
async fn prefix_option_overrides_the_record_namespace() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let tag = build(&db, "Tag").with("label", "rust");
    let tag = assert_written!(db.insert(tag, Options::new().prefix("tenant_a")).await);

    assert_eq!(tag.meta.source, Source::with_prefix("tenant_a", "tags"));

    let Some(Operation::Insert(insert)) = driver.log().pop_write() else {
        panic!("expected an insert");
    };
    assert_eq!(insert.source, Source::with_prefix("tenant_a", "tags"));
}

#[tokio::test]
async fn default_prefix_applies_to_models_without_one() {
    let driver = MockDriver::new();
    let db = setup_with(&driver, |builder| {
        builder.default_prefix("shared");
    });

    assert_written!(db.insert(build(&db, "Team"), Options::new()).await);
    assert_written!(db.insert(build(&db, "Tag"), Options::new()).await);

    assert_eq!(driver.log().sequence(), ["insert shared.teams", "insert blog.tags"]);
}
