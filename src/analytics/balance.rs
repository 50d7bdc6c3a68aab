use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::period::{limit_multiplier, ReportingPeriod};
use crate::records::{Budget, BudgetPeriod, Card, CardBudget, Transaction};

/// One budget's figures within a card balance, rescaled to the reporting
/// period. A negative `remaining_amount` signals overspend, not an error.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetBalance {
    pub budget_id: Uuid,
    pub budget_name: String,
    pub limit_amount: f64,
    pub spent_amount: f64,
    pub remaining_amount: f64,
    pub period: BudgetPeriod,
}

/// Per-card totals with the underlying per-budget breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct CardBalance {
    pub card_id: Uuid,
    pub card_name: String,
    pub total_spent: f64,
    pub total_limit: f64,
    pub remaining_amount: f64,
    pub budget_balances: Vec<BudgetBalance>,
}

/// Account-wide balance summary for one reporting period.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BalanceReport {
    pub card_balances: Vec<CardBalance>,
    pub total_spent: f64,
    pub total_limit: f64,
    pub total_remaining: f64,
}

/// Computes per-budget, per-card, and grand balance figures over the
/// reporting period's lookback window (measured back from `now`).
///
/// Inputs must already be scoped to one account. Associations whose budget
/// row is gone are skipped; empty inputs produce a zeroed report.
pub fn compute_balances(
    cards: &[Card],
    budgets: &[Budget],
    associations: &[CardBudget],
    transactions: &[Transaction],
    period: ReportingPeriod,
    now: DateTime<Utc>,
) -> BalanceReport {
    let window_start = period.window_start(now);

    let budgets_by_id: HashMap<Uuid, &Budget> =
        budgets.iter().map(|budget| (budget.id, budget)).collect();

    let mut spent_by_association: HashMap<Uuid, f64> = HashMap::new();
    for txn in transactions {
        if txn.date >= window_start {
            *spent_by_association.entry(txn.card_budget_id).or_insert(0.0) += txn.amount;
        }
    }

    let mut report = BalanceReport::default();

    for card in cards {
        let mut budget_balances = Vec::new();
        let mut card_total_spent = 0.0;
        let mut card_total_limit = 0.0;

        for association in associations.iter().filter(|a| a.card_id == card.id) {
            let Some(budget) = budgets_by_id.get(&association.budget_id) else {
                continue;
            };

            let spent_amount = spent_by_association
                .get(&association.id)
                .copied()
                .unwrap_or(0.0);
            let adjusted_limit = budget.limit_amount * limit_multiplier(budget.period, period);

            budget_balances.push(BudgetBalance {
                budget_id: budget.id,
                budget_name: budget.name.clone(),
                limit_amount: adjusted_limit,
                spent_amount,
                remaining_amount: adjusted_limit - spent_amount,
                period: budget.period,
            });

            card_total_spent += spent_amount;
            card_total_limit += adjusted_limit;
        }

        report.total_spent += card_total_spent;
        report.total_limit += card_total_limit;

        report.card_balances.push(CardBalance {
            card_id: card.id,
            card_name: card.name.clone(),
            total_spent: card_total_spent,
            total_limit: card_total_limit,
            remaining_amount: card_total_limit - card_total_spent,
            budget_balances,
        });
    }

    report.total_remaining = report.total_limit - report.total_spent;
    report
}
