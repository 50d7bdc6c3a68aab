//! Signup, login, and profile management.

use serde::Deserialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::auth::{self, TokenAuthority};
use crate::errors::{CoreError, Result};
use crate::records::{decode_row, decode_rows, Account, AccountProfile};
use crate::store::{RecordStore, Selection, Table};

/// Fields collected at signup. Required organization fields mirror the
/// hosted onboarding form.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub organization_legal_name: String,
    pub organization_ein_number: String,
    pub password: String,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub zip_code: Option<String>,
}

/// Optional replacements for profile fields; `None` leaves a field alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub organization_legal_name: Option<String>,
    pub organization_ein_number: Option<String>,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub zip_code: Option<String>,
}

/// A freshly authenticated session: bearer token plus the profile it is for.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AuthSession {
    pub token: String,
    pub account: AccountProfile,
}

pub struct AccountService;

impl AccountService {
    /// Registers a new account and signs it in.
    ///
    /// Email addresses are unique; a second signup with the same address is
    /// rejected as invalid input rather than leaking which step failed.
    pub fn signup(
        &self,
        store: &dyn RecordStore,
        authority: &TokenAuthority,
        input: SignupInput,
    ) -> Result<AuthSession> {
        let existing = store.select(
            Table::Accounts,
            &Selection::new().eq("email", json!(input.email)),
        )?;
        if !existing.is_empty() {
            return Err(CoreError::InvalidInput("email already registered".into()));
        }
        if input.password.is_empty() {
            return Err(CoreError::InvalidInput("password must not be empty".into()));
        }

        let password_hash = auth::hash_password(&input.password)?;
        let row = store.insert(
            Table::Accounts,
            json!({
                "first_name": input.first_name,
                "last_name": input.last_name,
                "email": input.email,
                "phone": input.phone,
                "organization_legal_name": input.organization_legal_name,
                "organization_ein_number": input.organization_ein_number,
                "password_hash": password_hash,
                "date_of_birth": input.date_of_birth,
                "address": input.address,
                "zip_code": input.zip_code,
            }),
        )?;
        let account: Account = decode_row(row)?;
        tracing::info!(account_id = %account.id, "account created");

        let token = authority.issue(account.id, &account.email)?;
        Ok(AuthSession {
            token,
            account: account.into(),
        })
    }

    /// Exchanges credentials for a session. Unknown email and wrong password
    /// are indistinguishable to the caller.
    pub fn login(
        &self,
        store: &dyn RecordStore,
        authority: &TokenAuthority,
        email: &str,
        password: &str,
    ) -> Result<AuthSession> {
        let rows = store.select(Table::Accounts, &Selection::new().eq("email", json!(email)))?;
        let account: Account = match rows.into_iter().next() {
            Some(row) => decode_row(row)?,
            None => return Err(CoreError::InvalidCredentials),
        };
        if !auth::verify_password(password, &account.password_hash)? {
            return Err(CoreError::InvalidCredentials);
        }

        let token = authority.issue(account.id, &account.email)?;
        Ok(AuthSession {
            token,
            account: account.into(),
        })
    }

    pub fn profile(&self, store: &dyn RecordStore, account_id: Uuid) -> Result<AccountProfile> {
        let rows = store.select(
            Table::Accounts,
            &Selection::new().eq("id", json!(account_id)),
        )?;
        let account: Account = match rows.into_iter().next() {
            Some(row) => decode_row(row)?,
            None => return Err(CoreError::NotFound("account".into())),
        };
        Ok(account.into())
    }

    pub fn update_profile(
        &self,
        store: &dyn RecordStore,
        account_id: Uuid,
        patch: ProfilePatch,
    ) -> Result<AccountProfile> {
        let mut changes = Map::new();
        let fields: [(&str, Option<String>); 8] = [
            ("first_name", patch.first_name),
            ("last_name", patch.last_name),
            ("phone", patch.phone),
            ("organization_legal_name", patch.organization_legal_name),
            ("organization_ein_number", patch.organization_ein_number),
            ("date_of_birth", patch.date_of_birth),
            ("address", patch.address),
            ("zip_code", patch.zip_code),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                changes.insert(field.to_string(), json!(value));
            }
        }
        if changes.is_empty() {
            return self.profile(store, account_id);
        }

        let rows = store.update(
            Table::Accounts,
            &Selection::new().eq("id", json!(account_id)),
            Value::Object(changes),
        )?;
        let accounts: Vec<Account> = decode_rows(rows)?;
        accounts
            .into_iter()
            .next()
            .map(Into::into)
            .ok_or_else(|| CoreError::NotFound("account".into()))
    }
}
