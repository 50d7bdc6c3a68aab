use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::records::{Budget, Card, CardBudget, Transaction};

/// Number of transactions returned when the caller gives no limit.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

const UNKNOWN_CARD: &str = "Unknown Card";
const UNKNOWN_BUDGET: &str = "Unknown Budget";

/// A transaction enriched with the display names of its card and budget.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionSummary {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub card_name: String,
    pub budget_name: String,
    pub category: Option<String>,
    pub merchant: Option<String>,
}

/// Lists the caller's most recent transactions, newest first, capped at
/// `limit`.
///
/// Transactions whose association is gone are skipped entirely; a resolvable
/// association pointing at a deleted card or budget degrades to a
/// placeholder name rather than failing the whole listing.
pub fn list_recent_transactions(
    associations: &[CardBudget],
    cards: &[Card],
    budgets: &[Budget],
    transactions: &[Transaction],
    limit: usize,
) -> Vec<TransactionSummary> {
    let associations_by_id: HashMap<Uuid, &CardBudget> =
        associations.iter().map(|a| (a.id, a)).collect();
    let card_ids: HashSet<Uuid> = cards.iter().map(|card| card.id).collect();
    let card_names: HashMap<Uuid, &str> =
        cards.iter().map(|card| (card.id, card.name.as_str())).collect();
    let budget_names: HashMap<Uuid, &str> = budgets
        .iter()
        .map(|budget| (budget.id, budget.name.as_str()))
        .collect();

    let mut scoped: Vec<&Transaction> = transactions
        .iter()
        .filter(|txn| {
            associations_by_id
                .get(&txn.card_budget_id)
                .is_some_and(|a| card_ids.contains(&a.card_id))
        })
        .collect();
    scoped.sort_by(|a, b| b.date.cmp(&a.date));

    scoped
        .into_iter()
        .take(limit)
        .map(|txn| {
            let association = associations_by_id[&txn.card_budget_id];
            TransactionSummary {
                id: txn.id,
                name: txn.name.clone(),
                amount: txn.amount,
                date: txn.date,
                card_name: card_names
                    .get(&association.card_id)
                    .copied()
                    .unwrap_or(UNKNOWN_CARD)
                    .to_string(),
                budget_name: budget_names
                    .get(&association.budget_id)
                    .copied()
                    .unwrap_or(UNKNOWN_BUDGET)
                    .to_string(),
                category: txn.category.clone(),
                merchant: txn.merchant.clone(),
            }
        })
        .collect()
}
