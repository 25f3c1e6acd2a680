use pretty_assertions::assert_eq;
use stowage::{
    driver::Operation,
    schema::{Field, Model, Producer},
    stmt::{Type, Value},
    Changeset, Entity, Options,
};
use tests::{fixtures::build, *};

fn pop_insert(driver: &MockDriver) -> stowage::driver::operation::Insert {
    match driver.log().pop_write() {
        Some(Operation::Insert(insert)) => insert,
        other => panic!("expected an insert; actual={other:?}"),
    }
}

#[tokio::test]
async fn uuid_key_is_generated_before_insert() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let post = assert_written!(
        db.insert(build(&db, "Post").with("title", "hello"), Options::new())
            .await
    );

    let insert = pop_insert(&driver);
    let Value::String(dumped) = &insert.changes["id"] else {
        panic!("expected the key dumped as text; changes={:?}", insert.changes);
    };

    // Generated up front, so nothing is read back
    assert!(insert.returning.is_empty());
    assert_eq!(post.get("id").as_uuid().unwrap().to_string(), *dumped);
}

#[tokio::test]
async fn key_without_client_value_is_read_back() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    assert_written!(db.insert(build(&db, "Team"), Options::new()).await);

    let insert = pop_insert(&driver);
    assert!(!insert.changes.contains_key("id"));
    assert_eq!(insert.returning, ["id"]);
}

#[tokio::test]
async fn driver_generated_key_takes_precedence() {
    let driver = MockDriver::new().autogenerates(99_i64);
    let db = setup(&driver);

    let team = assert_written!(db.insert(build(&db, "Team"), Options::new()).await);

    let insert = pop_insert(&driver);
    assert_eq!(insert.changes["id"], Value::I64(99));
    assert!(insert.returning.is_empty());
    assert_eq!(team.get("id"), &Value::I64(99));
}

#[tokio::test]
async fn converter_generates_uuid_keys() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let profile = assert_written!(db.insert(build(&db, "Profile"), Options::new()).await);

    let insert = pop_insert(&driver);
    assert!(matches!(insert.changes["id"], Value::String(_)));
    assert!(insert.returning.is_empty());
    assert!(profile.get("id").as_uuid().is_some());
}

#[tokio::test]
async fn increment_key_is_always_left_to_storage() {
    let driver = MockDriver::new().autogenerates(99_i64);
    let db = setup(&driver);

    let tag = assert_written!(db.insert(build(&db, "Tag"), Options::new()).await);

    let insert = pop_insert(&driver);
    assert!(!insert.changes.contains_key("id"));
    assert!(insert.returning.contains(&"id".to_string()));
    assert_eq!(tag.get("id"), &Value::I64(1));
}

#[tokio::test]
async fn supplied_key_is_never_generated_nor_read_back() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let id = uuid::Uuid::nil();
    let post = build(&db, "Post").with("id", id);
    assert_written!(db.insert(post, Options::new()).await);

    let insert = pop_insert(&driver);
    assert_eq!(
        insert.changes["id"],
        Value::from("00000000-0000-0000-0000-000000000000")
    );
    assert!(insert.returning.is_empty());
}

#[tokio::test]
async fn timestamps_share_one_value_on_insert() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let user = assert_written!(db.insert(build(&db, "User").with("name", "ann"), Options::new()).await);

    let insert = pop_insert(&driver);
    assert!(matches!(insert.changes["inserted_at"], Value::String(_)));
    assert_eq!(insert.changes["inserted_at"], insert.changes["updated_at"]);

    assert!(matches!(user.get("inserted_at"), Value::DateTime(_)));
    assert_eq!(user.get("inserted_at"), user.get("updated_at"));
}

#[tokio::test]
async fn supplied_timestamp_is_kept() {
    let driver = MockDriver::new();
    let db = setup(&driver);

    let at = "2020-01-01T00:00:00Z"
        .parse::<chrono::DateTime<chrono::Utc>>()
        .unwrap();

    let changeset = Changeset::new(build(&db, "User").with("name", "ann")).put("inserted_at", at);
    let user = assert_written!(db.insert(changeset, Options::new()).await);

    let insert = pop_insert(&driver);
    assert_eq!(
        insert.changes["inserted_at"],
        Value::from("2020-01-01T00:00:00.000000Z")
    );
    assert_ne!(insert.changes["updated_at"], insert.changes["inserted_at"]);
    assert_eq!(user.get("inserted_at"), &Value::DateTime(at));
}

#[tokio::test]
async fn producers_are_called_with_their_arguments() {
    let driver = MockDriver::new();
    let mut builder = stowage::Db::builder();
    builder.register(
        Model::new("Invoice", "invoices")
            .add_field(Field::new("id", Type::I64).primary_key())
            .add_field(Field::new("number", Type::String))
            .autogenerate(
                ["number"],
                Producer::with_args(
                    |args| Value::String(format!("{}-0001", args[0].as_str().unwrap_or_default())),
                    vec![Value::from("INV")],
                ),
            ),
    );
    let db = builder.build(driver.clone()).unwrap();

    let invoice = Entity::new(db.schema().model_by_name("Invoice").unwrap()).with("id", 1_i64);
    let invoice = assert_written!(db.insert(invoice, Options::new()).await);

    assert_eq!(invoice.get("number"), &Value::from("INV-0001"));
    assert_eq!(pop_insert(&driver).changes["number"], Value::from("INV-0001"));
}
