//! Transaction recording and listing, attributed through card-budget
//! associations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::errors::{CoreError, Result};
use crate::records::{decode_row, decode_rows, Card, CardBudget, Transaction};
use crate::store::{RecordStore, Selection, Table};

#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    pub card_budget_id: Uuid,
    pub amount: f64,
    pub name: String,
    /// Defaults to the current time when omitted.
    pub date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub merchant: Option<String>,
    pub receipt_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionPatch {
    pub card_budget_id: Option<Uuid>,
    pub amount: Option<f64>,
    pub name: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub merchant: Option<String>,
    pub receipt_id: Option<Uuid>,
}

/// Optional narrowing filters for listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionQuery {
    pub card_id: Option<Uuid>,
    pub budget_id: Option<Uuid>,
    pub card_budget_id: Option<Uuid>,
}

/// A transaction enriched with the card and budget it resolves to.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionView {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub card_id: Uuid,
    pub budget_id: Uuid,
}

pub struct TransactionService;

impl TransactionService {
    pub fn create(
        &self,
        store: &dyn RecordStore,
        account_id: Uuid,
        input: NewTransaction,
    ) -> Result<TransactionView> {
        let association = self.owned_association(store, account_id, input.card_budget_id)?;
        let date = input.date.unwrap_or_else(Utc::now);

        let row = store.insert(
            Table::Transactions,
            json!({
                "card_budget_id": input.card_budget_id,
                "amount": input.amount,
                "name": input.name,
                "date": date,
                "description": input.description,
                "category": input.category,
                "merchant": input.merchant,
                "receipt_id": input.receipt_id,
            }),
        )?;
        let transaction: Transaction = decode_row(row)?;
        tracing::info!(transaction_id = %transaction.id, "transaction recorded");
        Ok(TransactionView {
            transaction,
            card_id: association.card_id,
            budget_id: association.budget_id,
        })
    }

    /// Lists the account's transactions, newest first, optionally narrowed
    /// by card, budget, or association.
    pub fn list(
        &self,
        store: &dyn RecordStore,
        account_id: Uuid,
        query: TransactionQuery,
    ) -> Result<Vec<TransactionView>> {
        let associations = self.account_associations(store, account_id)?;
        let scoped: Vec<&CardBudget> = associations
            .iter()
            .filter(|a| query.card_id.is_none_or(|id| a.card_id == id))
            .filter(|a| query.budget_id.is_none_or(|id| a.budget_id == id))
            .filter(|a| query.card_budget_id.is_none_or(|id| a.id == id))
            .collect();

        let association_ids: Vec<Value> = scoped.iter().map(|a| json!(a.id)).collect();
        let rows = store.select(
            Table::Transactions,
            &Selection::new()
                .within("card_budget_id", association_ids)
                .order_desc("date"),
        )?;
        let transactions: Vec<Transaction> = decode_rows(rows)?;

        Ok(transactions
            .into_iter()
            .filter_map(|transaction| {
                let association = scoped.iter().find(|a| a.id == transaction.card_budget_id)?;
                Some(TransactionView {
                    card_id: association.card_id,
                    budget_id: association.budget_id,
                    transaction,
                })
            })
            .collect())
    }

    pub fn update(
        &self,
        store: &dyn RecordStore,
        account_id: Uuid,
        transaction_id: Uuid,
        patch: TransactionPatch,
    ) -> Result<TransactionView> {
        let (transaction, _) = self.owned_transaction(store, account_id, transaction_id)?;

        // Re-pointing at another association re-checks ownership of the target.
        let association = match patch.card_budget_id {
            Some(target) => self.owned_association(store, account_id, target)?,
            None => self.owned_association(store, account_id, transaction.card_budget_id)?,
        };

        let mut changes = Map::new();
        if let Some(card_budget_id) = patch.card_budget_id {
            changes.insert("card_budget_id".into(), json!(card_budget_id));
        }
        if let Some(amount) = patch.amount {
            changes.insert("amount".into(), json!(amount));
        }
        if let Some(name) = patch.name {
            changes.insert("name".into(), json!(name));
        }
        if let Some(date) = patch.date {
            changes.insert("date".into(), json!(date));
        }
        if let Some(description) = patch.description {
            changes.insert("description".into(), json!(description));
        }
        if let Some(category) = patch.category {
            changes.insert("category".into(), json!(category));
        }
        if let Some(merchant) = patch.merchant {
            changes.insert("merchant".into(), json!(merchant));
        }
        if let Some(receipt_id) = patch.receipt_id {
            changes.insert("receipt_id".into(), json!(receipt_id));
        }
        if changes.is_empty() {
            return Ok(TransactionView {
                transaction,
                card_id: association.card_id,
                budget_id: association.budget_id,
            });
        }

        let rows = store.update(
            Table::Transactions,
            &Selection::new().eq("id", json!(transaction_id)),
            Value::Object(changes),
        )?;
        let updated: Transaction = match rows.into_iter().next() {
            Some(row) => decode_row(row)?,
            None => return Err(CoreError::NotFound("transaction".into())),
        };
        Ok(TransactionView {
            transaction: updated,
            card_id: association.card_id,
            budget_id: association.budget_id,
        })
    }

    pub fn delete(
        &self,
        store: &dyn RecordStore,
        account_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<()> {
        self.owned_transaction(store, account_id, transaction_id)?;
        store.delete(
            Table::Transactions,
            &Selection::new().eq("id", json!(transaction_id)),
        )?;
        tracing::info!(transaction_id = %transaction_id, "transaction deleted");
        Ok(())
    }

    fn account_associations(
        &self,
        store: &dyn RecordStore,
        account_id: Uuid,
    ) -> Result<Vec<CardBudget>> {
        let rows = store.select(
            Table::Cards,
            &Selection::new().eq("account_id", json!(account_id)),
        )?;
        let cards: Vec<Card> = decode_rows(rows)?;
        let card_ids: Vec<Value> = cards.iter().map(|card| json!(card.id)).collect();
        let rows = store.select(
            Table::CardBudgets,
            &Selection::new().within("card_id", card_ids),
        )?;
        decode_rows(rows)
    }

    fn owned_association(
        &self,
        store: &dyn RecordStore,
        account_id: Uuid,
        association_id: Uuid,
    ) -> Result<CardBudget> {
        let rows = store.select(
            Table::CardBudgets,
            &Selection::new().eq("id", json!(association_id)),
        )?;
        let association: CardBudget = match rows.into_iter().next() {
            Some(row) => decode_row(row)?,
            None => return Err(CoreError::NotFound("card budget association".into())),
        };

        let rows = store.select(
            Table::Cards,
            &Selection::new().eq("id", json!(association.card_id)),
        )?;
        let card: Card = match rows.into_iter().next() {
            Some(row) => decode_row(row)?,
            None => return Err(CoreError::NotFound("card".into())),
        };
        if card.account_id != account_id {
            return Err(CoreError::AccessDenied("card budget association".into()));
        }
        Ok(association)
    }

    fn owned_transaction(
        &self,
        store: &dyn RecordStore,
        account_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<(Transaction, CardBudget)> {
        let rows = store.select(
            Table::Transactions,
            &Selection::new().eq("id", json!(transaction_id)),
        )?;
        let transaction: Transaction = match rows.into_iter().next() {
            Some(row) => decode_row(row)?,
            None => return Err(CoreError::NotFound("transaction".into())),
        };
        let association =
            self.owned_association(store, account_id, transaction.card_budget_id)?;
        Ok((transaction, association))
    }
}
