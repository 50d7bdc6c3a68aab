//! Receipt upload and retrieval. Bytes live in the blob store; metadata
//! rows live in the record store.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::blob::BlobStore;
use crate::errors::{CoreError, Result};
use crate::records::{decode_row, decode_rows, Receipt, ReceiptKind};
use crate::store::{RecordStore, Selection, Table};
use crate::utils::sanitize_filename;

/// Upload size cap, 10 MiB.
pub const MAX_RECEIPT_BYTES: usize = 10 * 1024 * 1024;

const ALLOWED_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "gif", "bmp", "webp", "pdf"];

#[derive(Debug, Clone, Deserialize)]
pub struct ReceiptUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub description: Option<String>,
    pub amount: Option<f64>,
    /// Defaults to the upload time when omitted.
    pub date_of_purchase: Option<DateTime<Utc>>,
}

pub struct ReceiptService;

impl ReceiptService {
    /// Stores the receipt bytes and records its metadata.
    ///
    /// If the metadata insert fails after the bytes landed, the blob is
    /// removed so the store does not accumulate orphans.
    pub fn upload(
        &self,
        store: &dyn RecordStore,
        blobs: &dyn BlobStore,
        account_id: Uuid,
        upload: ReceiptUpload,
    ) -> Result<Receipt> {
        let extension = upload
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
            .ok_or_else(|| {
                CoreError::InvalidInput(format!(
                    "unsupported file type, allowed: {}",
                    ALLOWED_EXTENSIONS.join(", ")
                ))
            })?;
        if upload.bytes.is_empty() {
            return Err(CoreError::InvalidInput("file is empty".into()));
        }
        if upload.bytes.len() > MAX_RECEIPT_BYTES {
            return Err(CoreError::InvalidInput(
                "file exceeds the 10 MiB limit".into(),
            ));
        }

        let kind = if extension == "pdf" {
            ReceiptKind::Document
        } else {
            ReceiptKind::Image
        };
        let now = Utc::now();
        let storage_path = format!(
            "receipts/{account_id}/{}_{}",
            now.timestamp(),
            sanitize_filename(&upload.file_name)
        );

        blobs.upload(&storage_path, &upload.bytes, &upload.content_type)?;

        let inserted = store.insert(
            Table::Receipts,
            json!({
                "account_id": account_id,
                "name": upload.file_name,
                "kind": kind,
                "description": upload.description,
                "amount": upload.amount,
                "storage_path": storage_path,
                "url": blobs.public_url(&storage_path),
                "date_added": now,
                "date_of_purchase": upload.date_of_purchase.unwrap_or(now),
            }),
        );
        let row = match inserted {
            Ok(row) => row,
            Err(err) => {
                if let Err(cleanup) = blobs.remove(&storage_path) {
                    tracing::warn!(%storage_path, error = %cleanup, "orphaned blob left behind");
                }
                return Err(err);
            }
        };

        let receipt: Receipt = decode_row(row)?;
        tracing::info!(receipt_id = %receipt.id, "receipt stored");
        Ok(receipt)
    }

    /// Lists the account's receipts, newest first.
    pub fn list(&self, store: &dyn RecordStore, account_id: Uuid) -> Result<Vec<Receipt>> {
        let rows = store.select(
            Table::Receipts,
            &Selection::new()
                .eq("account_id", json!(account_id))
                .order_desc("date_added"),
        )?;
        decode_rows(rows)
    }

    pub fn get(
        &self,
        store: &dyn RecordStore,
        account_id: Uuid,
        receipt_id: Uuid,
    ) -> Result<Receipt> {
        let rows = store.select(Table::Receipts, &Selection::new().eq("id", json!(receipt_id)))?;
        let receipt: Receipt = match rows.into_iter().next() {
            Some(row) => decode_row(row)?,
            None => return Err(CoreError::NotFound("receipt".into())),
        };
        if receipt.account_id != account_id {
            return Err(CoreError::AccessDenied("receipt".into()));
        }
        Ok(receipt)
    }

    /// Deletes the metadata row and then the blob.
    pub fn delete(
        &self,
        store: &dyn RecordStore,
        blobs: &dyn BlobStore,
        account_id: Uuid,
        receipt_id: Uuid,
    ) -> Result<()> {
        let receipt = self.get(store, account_id, receipt_id)?;
        store.delete(Table::Receipts, &Selection::new().eq("id", json!(receipt_id)))?;
        blobs.remove(&receipt.storage_path)?;
        tracing::info!(receipt_id = %receipt_id, "receipt deleted");
        Ok(())
    }
}
