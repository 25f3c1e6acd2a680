use stowage::{Changeset, Db, InsertAllOptions, Options};
use tests::{fixtures::build, *};

fn assert_sync_send<T: Send>(val: T) -> T {
    val
}

#[tokio::test]
async fn ensure_types_sync_send() {
    let driver = MockDriver::new();
    let db = assert_sync_send(setup(&driver));

    let changeset = Changeset::new(build(&db, "Team")).put("name", "core");
    let team = assert_sync_send(db.insert(changeset, Options::new()))
        .await
        .unwrap()
        .unwrap();

    let changeset = Changeset::new(team).put("name", "renamed");
    assert_sync_send(db.update_strict(changeset, Options::new()))
        .await
        .unwrap();

    assert_sync_send(db.insert_all("events", vec![row([])], InsertAllOptions::new()))
        .await
        .unwrap();

    // Handles are shared across tasks
    let handle = tokio::spawn({
        let db: Db = db.clone();
        async move { db.schema().models().len() }
    });
    assert_eq!(handle.await.unwrap(), 5);
}
