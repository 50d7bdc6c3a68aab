//! Budget CRUD. Limits are positive amounts over a native cadence.

use serde::Deserialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::errors::{CoreError, Result};
use crate::records::{decode_row, decode_rows, Budget, BudgetPeriod};
use crate::store::{RecordStore, Selection, Table};

#[derive(Debug, Clone, Deserialize)]
pub struct NewBudget {
    pub name: String,
    pub limit_amount: f64,
    pub period: BudgetPeriod,
    #[serde(default)]
    pub require_receipts: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetPatch {
    pub name: Option<String>,
    pub limit_amount: Option<f64>,
    pub period: Option<BudgetPeriod>,
    pub require_receipts: Option<bool>,
}

pub struct BudgetService;

impl BudgetService {
    pub fn create(
        &self,
        store: &dyn RecordStore,
        account_id: Uuid,
        input: NewBudget,
    ) -> Result<Budget> {
        if input.limit_amount <= 0.0 {
            return Err(CoreError::InvalidInput(
                "limit_amount must be positive".into(),
            ));
        }
        let row = store.insert(
            Table::Budgets,
            json!({
                "account_id": account_id,
                "name": input.name,
                "limit_amount": input.limit_amount,
                "period": input.period,
                "require_receipts": input.require_receipts,
            }),
        )?;
        let budget: Budget = decode_row(row)?;
        tracing::info!(budget_id = %budget.id, "budget created");
        Ok(budget)
    }

    /// Lists the account's budgets, newest first.
    pub fn list(&self, store: &dyn RecordStore, account_id: Uuid) -> Result<Vec<Budget>> {
        let rows = store.select(
            Table::Budgets,
            &Selection::new()
                .eq("account_id", json!(account_id))
                .order_desc("created_at"),
        )?;
        decode_rows(rows)
    }

    pub fn get(&self, store: &dyn RecordStore, account_id: Uuid, budget_id: Uuid) -> Result<Budget> {
        let rows = store.select(Table::Budgets, &Selection::new().eq("id", json!(budget_id)))?;
        let budget: Budget = match rows.into_iter().next() {
            Some(row) => decode_row(row)?,
            None => return Err(CoreError::NotFound("budget".into())),
        };
        if budget.account_id != account_id {
            return Err(CoreError::AccessDenied("budget".into()));
        }
        Ok(budget)
    }

    pub fn update(
        &self,
        store: &dyn RecordStore,
        account_id: Uuid,
        budget_id: Uuid,
        patch: BudgetPatch,
    ) -> Result<Budget> {
        let current = self.get(store, account_id, budget_id)?;
        if let Some(limit) = patch.limit_amount {
            if limit <= 0.0 {
                return Err(CoreError::InvalidInput(
                    "limit_amount must be positive".into(),
                ));
            }
        }

        let mut changes = Map::new();
        if let Some(name) = patch.name {
            changes.insert("name".into(), json!(name));
        }
        if let Some(limit) = patch.limit_amount {
            changes.insert("limit_amount".into(), json!(limit));
        }
        if let Some(period) = patch.period {
            changes.insert("period".into(), json!(period));
        }
        if let Some(require_receipts) = patch.require_receipts {
            changes.insert("require_receipts".into(), json!(require_receipts));
        }
        if changes.is_empty() {
            return Ok(current);
        }

        let rows = store.update(
            Table::Budgets,
            &Selection::new().eq("id", json!(budget_id)),
            Value::Object(changes),
        )?;
        let budgets: Vec<Budget> = decode_rows(rows)?;
        budgets
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::NotFound("budget".into()))
    }

    /// Deletes a budget along with its card associations. Transactions keep
    /// their association id and degrade in analytics instead of cascading.
    pub fn delete(&self, store: &dyn RecordStore, account_id: Uuid, budget_id: Uuid) -> Result<()> {
        self.get(store, account_id, budget_id)?;
        store.delete(
            Table::CardBudgets,
            &Selection::new().eq("budget_id", json!(budget_id)),
        )?;
        store.delete(Table::Budgets, &Selection::new().eq("id", json!(budget_id)))?;
        tracing::info!(budget_id = %budget_id, "budget deleted");
        Ok(())
    }
}
