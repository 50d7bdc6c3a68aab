use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A spending policy: memo prompts and thresholds applied to card activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    pub id: Uuid,
    pub account_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub memo_threshold: Option<f64>,
    pub memo_prompt: Option<String>,
    pub created_at: DateTime<Utc>,
}
