//! Card CRUD plus maintenance of the card's budget attachments.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::errors::{CoreError, Result};
use crate::records::{decode_row, decode_rows, Budget, Card, CardBudget, CardStatus};
use crate::store::{RecordStore, Selection, Table};

#[derive(Debug, Clone, Deserialize)]
pub struct NewCard {
    pub name: String,
    pub cardholder_name: String,
    pub cvv: String,
    pub expiry: String,
    pub zipcode: String,
    pub address: String,
    #[serde(default)]
    pub budget_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardPatch {
    pub name: Option<String>,
    pub status: Option<CardStatus>,
    pub cardholder_name: Option<String>,
    pub cvv: Option<String>,
    pub expiry: Option<String>,
    pub zipcode: Option<String>,
    pub address: Option<String>,
    /// When present, replaces the card's budget attachments wholesale.
    pub budget_ids: Option<Vec<Uuid>>,
}

/// A card together with the budgets currently attached to it.
#[derive(Debug, Clone, Serialize)]
pub struct CardWithBudgets {
    pub card: Card,
    pub budget_ids: Vec<Uuid>,
}

pub struct CardService;

impl CardService {
    /// Creates a card and attaches the requested budgets. Budget ids the
    /// caller does not own are skipped silently.
    pub fn create(
        &self,
        store: &dyn RecordStore,
        account_id: Uuid,
        input: NewCard,
    ) -> Result<CardWithBudgets> {
        let row = store.insert(
            Table::Cards,
            json!({
                "account_id": account_id,
                "name": input.name,
                "status": CardStatus::Issued,
                "balance": 0.0,
                "cardholder_name": input.cardholder_name,
                "cvv": input.cvv,
                "expiry": input.expiry,
                "zipcode": input.zipcode,
                "address": input.address,
            }),
        )?;
        let card: Card = decode_row(row)?;
        tracing::info!(card_id = %card.id, "card created");

        let budget_ids = self.attach_budgets(store, account_id, card.id, &input.budget_ids)?;
        Ok(CardWithBudgets { card, budget_ids })
    }

    /// Lists the account's cards with their attached budget ids.
    pub fn list(&self, store: &dyn RecordStore, account_id: Uuid) -> Result<Vec<CardWithBudgets>> {
        let rows = store.select(
            Table::Cards,
            &Selection::new()
                .eq("account_id", json!(account_id))
                .order_desc("created_at"),
        )?;
        let cards: Vec<Card> = decode_rows(rows)?;

        let card_ids: Vec<Value> = cards.iter().map(|card| json!(card.id)).collect();
        let rows = store.select(
            Table::CardBudgets,
            &Selection::new().within("card_id", card_ids),
        )?;
        let associations: Vec<CardBudget> = decode_rows(rows)?;

        Ok(cards
            .into_iter()
            .map(|card| {
                let budget_ids = associations
                    .iter()
                    .filter(|a| a.card_id == card.id)
                    .map(|a| a.budget_id)
                    .collect();
                CardWithBudgets { card, budget_ids }
            })
            .collect())
    }

    pub fn get(
        &self,
        store: &dyn RecordStore,
        account_id: Uuid,
        card_id: Uuid,
    ) -> Result<CardWithBudgets> {
        let card = self.owned_card(store, account_id, card_id)?;
        let rows = store.select(
            Table::CardBudgets,
            &Selection::new().eq("card_id", json!(card_id)),
        )?;
        let associations: Vec<CardBudget> = decode_rows(rows)?;
        Ok(CardWithBudgets {
            card,
            budget_ids: associations.into_iter().map(|a| a.budget_id).collect(),
        })
    }

    pub fn update(
        &self,
        store: &dyn RecordStore,
        account_id: Uuid,
        card_id: Uuid,
        patch: CardPatch,
    ) -> Result<CardWithBudgets> {
        self.owned_card(store, account_id, card_id)?;

        let mut changes = Map::new();
        if let Some(name) = patch.name {
            changes.insert("name".into(), json!(name));
        }
        if let Some(status) = patch.status {
            changes.insert("status".into(), json!(status));
        }
        if let Some(cardholder_name) = patch.cardholder_name {
            changes.insert("cardholder_name".into(), json!(cardholder_name));
        }
        if let Some(cvv) = patch.cvv {
            changes.insert("cvv".into(), json!(cvv));
        }
        if let Some(expiry) = patch.expiry {
            changes.insert("expiry".into(), json!(expiry));
        }
        if let Some(zipcode) = patch.zipcode {
            changes.insert("zipcode".into(), json!(zipcode));
        }
        if let Some(address) = patch.address {
            changes.insert("address".into(), json!(address));
        }
        if !changes.is_empty() {
            store.update(
                Table::Cards,
                &Selection::new().eq("id", json!(card_id)),
                Value::Object(changes),
            )?;
        }

        if let Some(budget_ids) = patch.budget_ids {
            store.delete(
                Table::CardBudgets,
                &Selection::new().eq("card_id", json!(card_id)),
            )?;
            self.attach_budgets(store, account_id, card_id, &budget_ids)?;
        }

        self.get(store, account_id, card_id)
    }

    /// Deletes a card and its budget attachments.
    pub fn delete(&self, store: &dyn RecordStore, account_id: Uuid, card_id: Uuid) -> Result<()> {
        self.owned_card(store, account_id, card_id)?;
        store.delete(
            Table::CardBudgets,
            &Selection::new().eq("card_id", json!(card_id)),
        )?;
        store.delete(Table::Cards, &Selection::new().eq("id", json!(card_id)))?;
        tracing::info!(card_id = %card_id, "card deleted");
        Ok(())
    }

    fn owned_card(
        &self,
        store: &dyn RecordStore,
        account_id: Uuid,
        card_id: Uuid,
    ) -> Result<Card> {
        let rows = store.select(Table::Cards, &Selection::new().eq("id", json!(card_id)))?;
        let card: Card = match rows.into_iter().next() {
            Some(row) => decode_row(row)?,
            None => return Err(CoreError::NotFound("card".into())),
        };
        if card.account_id != account_id {
            return Err(CoreError::AccessDenied("card".into()));
        }
        Ok(card)
    }

    fn attach_budgets(
        &self,
        store: &dyn RecordStore,
        account_id: Uuid,
        card_id: Uuid,
        budget_ids: &[Uuid],
    ) -> Result<Vec<Uuid>> {
        if budget_ids.is_empty() {
            return Ok(Vec::new());
        }

        let requested: Vec<Value> = budget_ids.iter().map(|id| json!(id)).collect();
        let rows = store.select(
            Table::Budgets,
            &Selection::new()
                .within("id", requested)
                .eq("account_id", json!(account_id)),
        )?;
        let owned: HashSet<Uuid> = decode_rows::<Budget>(rows)?
            .into_iter()
            .map(|budget| budget.id)
            .collect();

        let mut attached = Vec::new();
        for budget_id in budget_ids {
            if !owned.contains(budget_id) || attached.contains(budget_id) {
                continue;
            }
            store.insert(
                Table::CardBudgets,
                json!({ "card_id": card_id, "budget_id": budget_id }),
            )?;
            attached.push(*budget_id);
        }
        Ok(attached)
    }
}
