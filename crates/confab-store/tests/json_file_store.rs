use std::path::PathBuf;

use confab_store::{
    build_record, ChatMessage, ConversationStore, JsonFileStore, RecordDraft,
};

fn scratch_file() -> PathBuf {
    std::env::temp_dir().join(format!("confab-store-test-{}.json", uuid::Uuid::new_v4()))
}

fn sample_record(id: &str, text: &str) -> confab_store::ConversationRecord {
    let messages = vec![
        ChatMessage::user(1, text),
        ChatMessage::assistant(2, "noted"),
    ];
    build_record(RecordDraft {
        existing: None,
        id,
        title: confab_store::DEFAULT_TITLE,
        messages: &messages,
        context_history: &[],
    })
}

#[tokio::test]
async fn round_trips_saved_records() {
    let path = scratch_file();
    let store = JsonFileStore::new(&path);

    let records = vec![sample_record("a", "first"), sample_record("b", "second")];
    store.save_all(&records).await.unwrap();

    let loaded = store.load().await.unwrap();
    assert_eq!(loaded, records);

    tokio::fs::remove_file(&path).await.unwrap();
}

#[tokio::test]
async fn missing_file_loads_as_empty() {
    let store = JsonFileStore::new(scratch_file());
    assert!(store.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_file_degrades_to_empty() {
    let path = scratch_file();
    tokio::fs::write(&path, b"{definitely not json").await.unwrap();

    let store = JsonFileStore::new(&path);
    assert!(store.load().await.unwrap().is_empty());

    tokio::fs::remove_file(&path).await.unwrap();
}

#[tokio::test]
async fn save_overwrites_the_previous_collection() {
    let path = scratch_file();
    let store = JsonFileStore::new(&path);

    store.save_all(&[sample_record("a", "first")]).await.unwrap();
    store.save_all(&[sample_record("b", "second")]).await.unwrap();

    let loaded = store.load().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, "b");

    tokio::fs::remove_file(&path).await.unwrap();
}

#[tokio::test]
async fn clear_removes_the_collection_and_is_idempotent() {
    let path = scratch_file();
    let store = JsonFileStore::new(&path);

    store.save_all(&[sample_record("a", "first")]).await.unwrap();
    store.clear().await.unwrap();
    store.clear().await.unwrap();

    assert!(store.load().await.unwrap().is_empty());
}
