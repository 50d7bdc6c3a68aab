use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated owner entity; every other record is scoped to one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub organization_legal_name: String,
    pub organization_ein_number: String,
    pub password_hash: String,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub zip_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Account fields safe to hand back to callers (no password hash).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub organization_legal_name: String,
    pub organization_ein_number: String,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub zip_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountProfile {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
            phone: account.phone,
            organization_legal_name: account.organization_legal_name,
            organization_ein_number: account.organization_ein_number,
            date_of_birth: account.date_of_birth,
            address: account.address,
            zip_code: account.zip_code,
            created_at: account.created_at,
        }
    }
}
