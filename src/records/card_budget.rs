use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Link scoping transactions to one (card, budget) pair.
///
/// Carries no attributes of its own beyond identity; all spend is attributed
/// through it rather than directly to a card or budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardBudget {
    pub id: Uuid,
    pub card_id: Uuid,
    pub budget_id: Uuid,
    pub created_at: DateTime<Utc>,
}
