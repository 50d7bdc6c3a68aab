//! Spend policies: memo prompts that kick in above a threshold.

use serde::Deserialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::errors::{CoreError, Result};
use crate::records::{decode_row, decode_rows, Policy};
use crate::store::{RecordStore, Selection, Table};

#[derive(Debug, Clone, Deserialize)]
pub struct NewPolicy {
    pub name: String,
    pub description: Option<String>,
    pub memo_threshold: Option<f64>,
    pub memo_prompt: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub memo_threshold: Option<f64>,
    pub memo_prompt: Option<String>,
}

pub struct PolicyService;

impl PolicyService {
    pub fn create(
        &self,
        store: &dyn RecordStore,
        account_id: Uuid,
        input: NewPolicy,
    ) -> Result<Policy> {
        if let Some(threshold) = input.memo_threshold {
            if threshold < 0.0 {
                return Err(CoreError::InvalidInput(
                    "memo_threshold must not be negative".into(),
                ));
            }
        }
        let row = store.insert(
            Table::Policies,
            json!({
                "account_id": account_id,
                "name": input.name,
                "description": input.description,
                "memo_threshold": input.memo_threshold,
                "memo_prompt": input.memo_prompt,
            }),
        )?;
        let policy: Policy = decode_row(row)?;
        tracing::info!(policy_id = %policy.id, "policy created");
        Ok(policy)
    }

    pub fn list(&self, store: &dyn RecordStore, account_id: Uuid) -> Result<Vec<Policy>> {
        let rows = store.select(
            Table::Policies,
            &Selection::new()
                .eq("account_id", json!(account_id))
                .order_desc("created_at"),
        )?;
        decode_rows(rows)
    }

    pub fn get(&self, store: &dyn RecordStore, account_id: Uuid, policy_id: Uuid) -> Result<Policy> {
        let rows = store.select(Table::Policies, &Selection::new().eq("id", json!(policy_id)))?;
        let policy: Policy = match rows.into_iter().next() {
            Some(row) => decode_row(row)?,
            None => return Err(CoreError::NotFound("policy".into())),
        };
        if policy.account_id != account_id {
            return Err(CoreError::AccessDenied("policy".into()));
        }
        Ok(policy)
    }

    pub fn update(
        &self,
        store: &dyn RecordStore,
        account_id: Uuid,
        policy_id: Uuid,
        patch: PolicyPatch,
    ) -> Result<Policy> {
        let current = self.get(store, account_id, policy_id)?;
        if let Some(threshold) = patch.memo_threshold {
            if threshold < 0.0 {
                return Err(CoreError::InvalidInput(
                    "memo_threshold must not be negative".into(),
                ));
            }
        }

        let mut changes = Map::new();
        if let Some(name) = patch.name {
            changes.insert("name".into(), json!(name));
        }
        if let Some(description) = patch.description {
            changes.insert("description".into(), json!(description));
        }
        if let Some(threshold) = patch.memo_threshold {
            changes.insert("memo_threshold".into(), json!(threshold));
        }
        if let Some(prompt) = patch.memo_prompt {
            changes.insert("memo_prompt".into(), json!(prompt));
        }
        if changes.is_empty() {
            return Ok(current);
        }

        let rows = store.update(
            Table::Policies,
            &Selection::new().eq("id", json!(policy_id)),
            Value::Object(changes),
        )?;
        let policies: Vec<Policy> = decode_rows(rows)?;
        policies
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::NotFound("policy".into()))
    }

    pub fn delete(&self, store: &dyn RecordStore, account_id: Uuid, policy_id: Uuid) -> Result<()> {
        self.get(store, account_id, policy_id)?;
        store.delete(Table::Policies, &Selection::new().eq("id", json!(policy_id)))?;
        tracing::info!(policy_id = %policy_id, "policy deleted");
        Ok(())
    }
}
