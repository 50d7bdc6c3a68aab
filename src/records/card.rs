use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A spending instrument belonging to one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: Uuid,
    pub account_id: Uuid,
    pub name: String,
    pub status: CardStatus,
    #[serde(default)]
    pub balance: f64,
    pub cardholder_name: String,
    pub cvv: String,
    pub expiry: String,
    pub zipcode: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle status of a card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    #[default]
    Issued,
    Frozen,
    Cancelled,
}
