use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An uploaded supporting document tied to an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub id: Uuid,
    pub account_id: Uuid,
    pub name: String,
    pub kind: ReceiptKind,
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub storage_path: String,
    pub url: String,
    pub date_added: DateTime<Utc>,
    pub date_of_purchase: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptKind {
    Image,
    Document,
}
