//! Card-budget associations: the join records spending is attributed through.

use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::{CoreError, Result};
use crate::records::{decode_row, decode_rows, Budget, Card, CardBudget};
use crate::store::{RecordStore, Selection, Table};

/// An association enriched with display names for both sides.
#[derive(Debug, Clone, Serialize)]
pub struct AssociationView {
    pub id: Uuid,
    pub card_id: Uuid,
    pub card_name: String,
    pub budget_id: Uuid,
    pub budget_name: String,
}

pub struct CardBudgetService;

impl CardBudgetService {
    /// Links a card to a budget. Both sides must belong to the caller and
    /// the pair must not already be linked.
    pub fn create(
        &self,
        store: &dyn RecordStore,
        account_id: Uuid,
        card_id: Uuid,
        budget_id: Uuid,
    ) -> Result<CardBudget> {
        self.owned_card(store, account_id, card_id)?;
        self.owned_budget(store, account_id, budget_id)?;

        let existing = store.select(
            Table::CardBudgets,
            &Selection::new()
                .eq("card_id", json!(card_id))
                .eq("budget_id", json!(budget_id)),
        )?;
        if !existing.is_empty() {
            return Err(CoreError::InvalidInput(
                "card is already linked to this budget".into(),
            ));
        }

        let row = store.insert(
            Table::CardBudgets,
            json!({ "card_id": card_id, "budget_id": budget_id }),
        )?;
        let association: CardBudget = decode_row(row)?;
        tracing::info!(association_id = %association.id, "card linked to budget");
        Ok(association)
    }

    /// Lists the caller's associations with card and budget names attached.
    pub fn list(&self, store: &dyn RecordStore, account_id: Uuid) -> Result<Vec<AssociationView>> {
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
        let associations: Vec<CardBudget> = decode_rows(rows)?;

        let rows = store.select(
            Table::Budgets,
            &Selection::new().eq("account_id", json!(account_id)),
        )?;
        let budgets: Vec<Budget> = decode_rows(rows)?;

        Ok(associations
            .into_iter()
            .filter_map(|association| {
                let card = cards.iter().find(|card| card.id == association.card_id)?;
                let budget = budgets
                    .iter()
                    .find(|budget| budget.id == association.budget_id)?;
                Some(AssociationView {
                    id: association.id,
                    card_id: card.id,
                    card_name: card.name.clone(),
                    budget_id: budget.id,
                    budget_name: budget.name.clone(),
                })
            })
            .collect())
    }

    pub fn delete(
        &self,
        store: &dyn RecordStore,
        account_id: Uuid,
        association_id: Uuid,
    ) -> Result<()> {
        let rows = store.select(
            Table::CardBudgets,
            &Selection::new().eq("id", json!(association_id)),
        )?;
        let association: CardBudget = match rows.into_iter().next() {
            Some(row) => decode_row(row)?,
            None => return Err(CoreError::NotFound("card budget association".into())),
        };
        self.owned_card(store, account_id, association.card_id)?;

        store.delete(
            Table::CardBudgets,
            &Selection::new().eq("id", json!(association_id)),
        )?;
        tracing::info!(association_id = %association_id, "card unlinked from budget");
        Ok(())
    }

    fn owned_card(&self, store: &dyn RecordStore, account_id: Uuid, card_id: Uuid) -> Result<Card> {
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

    fn owned_budget(
        &self,
        store: &dyn RecordStore,
        account_id: Uuid,
        budget_id: Uuid,
    ) -> Result<Budget> {
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
}
