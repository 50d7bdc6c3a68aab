use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named spending cap with a native recurrence period.
///
/// `limit_amount` expresses the cap for exactly one instance of `period`;
/// analytics rescale it when reporting over a different window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub account_id: Uuid,
    pub name: String,
    pub limit_amount: f64,
    pub period: BudgetPeriod,
    #[serde(default)]
    pub require_receipts: bool,
    pub created_at: DateTime<Utc>,
}

/// Native recurrence periods a budget can be defined over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Weekly,
    Monthly,
    Quarterly,
}
