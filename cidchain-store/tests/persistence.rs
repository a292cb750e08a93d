use cidchain_core::Document;
use cidchain_embeddings::HashEmbedder;
use cidchain_store::{DocstoreSnapshot, FlatVectorStore, DOCSTORE_FILE_NAME, INDEX_FILE_NAME};

#[tokio::test]
async fn save_and_load_local_roundtrip() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = FlatVectorStore::from_documents(
        HashEmbedder::new(16),
        vec![
            Document::new("one", "first document"),
            Document::new("two", "second document").with_metadata("source", "two.txt"),
        ],
    )
    .await
    .unwrap();

    store.save_local(dir.path()).await.unwrap();
    assert!(dir.path().join(INDEX_FILE_NAME).exists());
    assert!(dir.path().join(DOCSTORE_FILE_NAME).exists());

    let restored = FlatVectorStore::load_local(dir.path(), HashEmbedder::new(16))
        .await
        .unwrap();
    assert_eq!(restored.ntotal().await, 2);
    assert_eq!(restored.document_ids().await, store.document_ids().await);
    assert_eq!(
        restored.get("two").await.unwrap().metadata_str("source"),
        Some("two.txt")
    );

    let hits = restored.similarity_search("second document", 1).await.unwrap();
    assert_eq!(hits[0].id, "two");
}

#[tokio::test]
async fn docstore_bytes_are_json_with_mapping_and_documents() {
    let store = FlatVectorStore::from_documents(
        HashEmbedder::new(4),
        vec![Document::new("only", "text")],
    )
    .await
    .unwrap();

    let bytes = store.docstore_bytes().await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["index_to_docstore_id"][0], "only");
    assert_eq!(json["docstore"]["only"]["content"], "text");

    let snapshot = DocstoreSnapshot::from_slice(&bytes).unwrap();
    assert_eq!(snapshot.docstore.len(), 1);
}

#[tokio::test]
async fn load_local_fails_when_files_are_missing() {
    let dir = tempfile::tempdir().expect("temp dir");
    let result = FlatVectorStore::load_local(dir.path(), HashEmbedder::new(4)).await;
    assert!(result.is_err());
}
