use pretty_assertions::assert_eq;
use stowage::{
    driver::{operation, Operation, Response},
    schema::Source,
    stmt::Value,
    Action, Changeset, Options, Returning, State,
};
use tests::{fixtures::loaded, *};

fn pop_update(driver: &MockDriver) -> operation::Update {
    match driver.log().pop_write() {
        Some(Operation::Update(update)) => update,
        other => panic!("expected an update; actual={other:?}"),
    }
}

#[tokio::test]
async fn update_writes_changes_filtered_by_primary_key() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let team = loaded(&db, "Team", [("id", Value::from(1_i64)), ("name", "old".into())]);
    let changeset = Changeset::new(team).put("name", "new");
    let team = assert_written!(db.update(changeset, Options::new()).await);

    assert_eq!(team.get("name"), &Value::from("new"));
    assert_eq!(team.state(), State::Loaded);

    assert_eq!(
        driver.log().operations(),
        [Operation::Update(operation::Update {
            source: Source::new("teams"),
            changes: row([("name", "new".into())]),
            filters: row([("id", 1_i64.into())]),
            returning: vec![],
        })]
    );
}

#[tokio::test]
async fn update_without_changes_is_skipped() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let user = loaded(&db, "User", [("id", Value::from(1_i64)), ("name", "ann".into())]);
    let result = assert_written!(db.update(user.clone(), Options::new()).await);

    assert_eq!(result, user);
    assert!(driver.log().is_empty());
}

#[tokio::test]
async fn changes_are_written_as_given() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    // Same value as the record: update does not diff
    let team = loaded(&db, "Team", [("id", Value::from(1_i64)), ("name", "core".into())]);
    let changeset = Changeset::new(team).put("name", "core");
    assert_written!(db.update(changeset, Options::new()).await);

    assert_eq!(pop_update(&driver).changes, row([("name", "core".into())]));
}

#[tokio::test]
async fn update_refreshes_updated_at_only() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let user = loaded(&db, "User", [("id", Value::from(1_i64)), ("name", "ann".into())]);
    let changeset = Changeset::new(user).put("name", "bob");
    let user = assert_written!(db.update(changeset, Options::new()).await);

    let update = pop_update(&driver);
    assert_eq!(
        update.changes.keys().collect::<Vec<_>>(),
        ["name", "updated_at"]
    );
    assert!(matches!(user.get("updated_at"), Value::DateTime(_)));
    assert!(user.get("inserted_at").is_null());
}

#[tokio::test]
async fn forced_update_refreshes_autoupdate_fields() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let user = loaded(&db, "User", [("id", 1_i64)]);
    assert_written!(db.update(user, Options::new().force()).await);

    assert_eq!(driver.log().sequence(), ["update users"]);
    assert_eq!(
        pop_update(&driver).changes.keys().collect::<Vec<_>>(),
        ["updated_at"]
    );
}

#[tokio::test]
async fn forced_update_without_autoupdate_fields_is_skipped() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let team = loaded(&db, "Team", [("id", 1_i64)]);
    let result = assert_written!(db.update(team.clone(), Options::new().force()).await);

    assert_eq!(result, team);
    assert!(driver.log().is_empty());
}

#[tokio::test]
async fn stale_update_raises_in_both_forms() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let team = loaded(&db, "Team", [("id", 1_i64)]);

    driver.respond(Response::Stale);
    let changeset = Changeset::new(team.clone()).put("name", "new");
    let err = assert_err!(db.update(changeset, Options::new()).await);
    assert!(err.is_stale_write());
    assert_eq!(
        err.to_string(),
        "attempted to update a stale record in `teams`: no rows matched the filters"
    );

    driver.respond(Response::Stale);
    let changeset = Changeset::new(team).put("name", "new");
    let err = assert_err!(db.update_strict(changeset, Options::new()).await);
    assert!(err.is_stale_write());
}

#[tokio::test]
async fn null_primary_key_fails() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let team = loaded(&db, "Team", [("name", "core")]);
    let changeset = Changeset::new(team).put("name", "new");
    let err = assert_err!(db.update(changeset, Options::new()).await);

    assert!(err.is_missing_primary_key());
    assert!(driver.log().is_empty());
}

#[tokio::test]
async fn invalid_changeset_is_returned_untouched() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let team = loaded(&db, "Team", [("id", 1_i64)]);
    let changeset = Changeset::new(team)
        .put("name", "")
        .add_error("name", "can't be blank");
    let changeset = assert_invalid!(db.update(changeset, Options::new()).await);

    assert_eq!(changeset.action(), Some(Action::Update));
    assert_eq!(changeset.errors.len(), 1);
    assert!(driver.log().is_empty());
}

#[tokio::test]
async fn optimistic_lock_filters_on_current_version() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let user = loaded(&db, "User", [("id", 1_i64), ("version", 3_i64)]);
    let changeset = Changeset::new(user.clone())
        .put("name", "bob")
        .optimistic_lock("version");
    let user = assert_written!(db.update(changeset, Options::new()).await);

    assert_eq!(user.get("version"), &Value::I64(4));

    let update = pop_update(&driver);
    assert_eq!(update.filters, row([("id", 1_i64.into()), ("version", 3_i64.into())]));
    assert_eq!(update.changes["version"], Value::I64(4));
}

#[tokio::test]
async fn optimistic_lock_conflict_is_stale() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let user = loaded(&db, "User", [("id", 1_i64), ("version", 3_i64)]);
    driver.respond(Response::Stale);

    let changeset = Changeset::new(user).optimistic_lock("version");
    let err = assert_err!(db.update(changeset, Options::new()).await);
    assert!(err.is_stale_write());
}

#[tokio::test]
async fn returning_fields_are_loaded() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let team = loaded(&db, "Team", [("id", 1_i64)]);
    driver.respond(Response::row(row([("name", "renamed".into())])));

    let changeset = Changeset::new(team).put("name", "new");
    let team = assert_written!(
        db.update(
            changeset,
            Options::new().returning(Returning::fields(["name"]))
        )
        .await
    );

    assert_eq!(pop_update(&driver).returning, ["name"]);
    assert_eq!(team.get("name"), &Value::from("renamed"));
}

#[tokio::test]
async fn empty_returning_list_fails() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let team = loaded(&db, "Team", [("id", 1_i64)]);
    let changeset = Changeset::new(team).put("name", "new");
    let err = assert_err!(
        db.update(changeset, Options::new().returning(Returning::Fields(vec![])))
            .await
    );

    assert!(err.is_invalid_argument());
    assert!(driver.log().is_empty());
}
