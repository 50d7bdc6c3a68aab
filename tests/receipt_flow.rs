mod common;

use takeback_core::blob::LocalBlobStore;
use takeback_core::errors::CoreError;
use takeback_core::records::ReceiptKind;
use takeback_core::services::{ReceiptService, ReceiptUpload, MAX_RECEIPT_BYTES};
use takeback_core::store::MemoryStore;
use tempfile::TempDir;

fn upload(file_name: &str, bytes: Vec<u8>) -> ReceiptUpload {
    ReceiptUpload {
        file_name: file_name.into(),
        bytes,
        content_type: "application/octet-stream".into(),
        description: None,
        amount: Some(12.5),
        date_of_purchase: None,
    }
}

#[test]
fn upload_list_delete_round_trip() {
    let store = MemoryStore::new();
    let dir = TempDir::new().unwrap();
    let blobs = LocalBlobStore::new(dir.path(), "http://localhost/blobs");
    let session = common::signup(&store, "casey@example.com");
    let account_id = session.account.id;

    let receipt = ReceiptService
        .upload(&store, &blobs, account_id, upload("lunch.PNG", b"bytes".to_vec()))
        .unwrap();
    assert_eq!(receipt.kind, ReceiptKind::Image);
    assert!(receipt.storage_path.starts_with(&format!("receipts/{account_id}/")));
    assert!(receipt.url.ends_with("lunch.PNG") || receipt.url.contains("lunch"));
    assert!(dir.path().join(&receipt.storage_path).exists());

    let listed = ReceiptService.list(&store, account_id).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "lunch.PNG");

    ReceiptService
        .delete(&store, &blobs, account_id, receipt.id)
        .unwrap();
    assert!(ReceiptService.list(&store, account_id).unwrap().is_empty());
    assert!(!dir.path().join(&receipt.storage_path).exists());
}

#[test]
fn pdf_uploads_are_documents() {
    let store = MemoryStore::new();
    let dir = TempDir::new().unwrap();
    let blobs = LocalBlobStore::new(dir.path(), "http://localhost/blobs");
    let session = common::signup(&store, "casey@example.com");

    let receipt = ReceiptService
        .upload(
            &store,
            &blobs,
            session.account.id,
            upload("invoice.pdf", b"%PDF-1.4".to_vec()),
        )
        .unwrap();
    assert_eq!(receipt.kind, ReceiptKind::Document);
}

#[test]
fn unsupported_extensions_are_rejected() {
    let store = MemoryStore::new();
    let dir = TempDir::new().unwrap();
    let blobs = LocalBlobStore::new(dir.path(), "http://localhost/blobs");
    let session = common::signup(&store, "casey@example.com");

    for name in ["notes.txt", "archive.zip", "no_extension"] {
        let err = ReceiptService
            .upload(&store, &blobs, session.account.id, upload(name, b"x".to_vec()))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)), "{name}");
    }
}

#[test]
fn oversized_uploads_are_rejected() {
    let store = MemoryStore::new();
    let dir = TempDir::new().unwrap();
    let blobs = LocalBlobStore::new(dir.path(), "http://localhost/blobs");
    let session = common::signup(&store, "casey@example.com");

    let err = ReceiptService
        .upload(
            &store,
            &blobs,
            session.account.id,
            upload("big.jpg", vec![0u8; MAX_RECEIPT_BYTES + 1]),
        )
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput(_)));
}

#[test]
fn foreign_receipts_are_denied() {
    let store = MemoryStore::new();
    let dir = TempDir::new().unwrap();
    let blobs = LocalBlobStore::new(dir.path(), "http://localhost/blobs");
    let owner = common::signup(&store, "owner@example.com");
    let intruder = common::signup(&store, "intruder@example.com");

    let receipt = ReceiptService
        .upload(&store, &blobs, owner.account.id, upload("lunch.jpg", b"x".to_vec()))
        .unwrap();

    let err = ReceiptService
        .delete(&store, &blobs, intruder.account.id, receipt.id)
        .unwrap_err();
    assert!(matches!(err, CoreError::AccessDenied(_)));
}
