use docsense::{
    data::{FileStore, SqliteFileStore},
    error::ServiceError,
};

#[tokio::test]
async fn store_round_trips_and_reports_missing_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("files.db");
    let store = SqliteFileStore::open(&path).unwrap();

    let contents = "line one\nline two with ünïcödé";
    let id = store.add_entry("notes.txt", contents).await.unwrap();
    let record = store.get_entry_by_id(id).await.unwrap();
    assert_eq!(record.file_name, "notes.txt");
    assert_eq!(record.contents, contents);

    match store.get_entry_by_id(id + 100).await {
        Err(ServiceError::NotFound(missing)) => assert_eq!(missing, id + 100),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn reopening_keeps_previous_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("files.db");
    let first_id = {
        let store = SqliteFileStore::open(&path).unwrap();
        store.add_entry("a.txt", "alpha").await.unwrap()
    };
    let store = SqliteFileStore::open(&path).unwrap();
    let second_id = store.add_entry("b.txt", "beta").await.unwrap();

    let all = store.get_all_entries().await.unwrap();
    let ids: Vec<_> = all.iter().map(|r| r.id).collect();
    assert_eq!(ids, [first_id, second_id]);
}
