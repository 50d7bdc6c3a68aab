use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A dated spend record attributed through a card-budget association.
///
/// A transaction that no longer resolves to an association is orphaned;
/// analytics skip it rather than fail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub card_budget_id: Uuid,
    pub amount: f64,
    pub name: String,
    pub date: DateTime<Utc>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub merchant: Option<String>,
    pub receipt_id: Option<Uuid>,
}
