use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::period::{ReportingPeriod, SLICE_PALETTE};
use crate::records::{Budget, Card, CardBudget, Transaction};

/// One budget's share of in-window spend, colored for chart rendering.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetSlice {
    pub budget_id: Uuid,
    pub budget_name: String,
    pub total_spent: f64,
    pub percentage: f64,
    pub color: String,
}

/// Computes the per-budget spending breakdown over the reporting period's
/// lookback window, restricted to associations on the caller's own cards.
///
/// Budgets with zero in-window spend are omitted; slice colors cycle the
/// fixed palette by the budget's position in `budgets` (so a skipped budget
/// still advances the color index). Percentages sum to 100 whenever any
/// spend exists; with no spend the result is empty.
pub fn compute_spending_breakdown(
    budgets: &[Budget],
    associations: &[CardBudget],
    cards: &[Card],
    transactions: &[Transaction],
    period: ReportingPeriod,
    now: DateTime<Utc>,
) -> Vec<BudgetSlice> {
    let window_start = period.window_start(now);
    let card_ids: HashSet<Uuid> = cards.iter().map(|card| card.id).collect();

    let mut spent_by_association: HashMap<Uuid, f64> = HashMap::new();
    for txn in transactions {
        if txn.date >= window_start {
            *spent_by_association.entry(txn.card_budget_id).or_insert(0.0) += txn.amount;
        }
    }

    let mut slices = Vec::new();
    let mut total_spent = 0.0;

    for (index, budget) in budgets.iter().enumerate() {
        let budget_total: f64 = associations
            .iter()
            .filter(|a| a.budget_id == budget.id && card_ids.contains(&a.card_id))
            .filter_map(|a| spent_by_association.get(&a.id))
            .sum();

        total_spent += budget_total;

        if budget_total > 0.0 {
            slices.push(BudgetSlice {
                budget_id: budget.id,
                budget_name: budget.name.clone(),
                total_spent: budget_total,
                percentage: 0.0,
                color: SLICE_PALETTE[index % SLICE_PALETTE.len()].to_string(),
            });
        }
    }

    if total_spent > 0.0 {
        for slice in &mut slices {
            slice.percentage = slice.total_spent / total_spent * 100.0;
        }
    }

    slices
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::records::{BudgetPeriod, CardStatus};

    fn card(account: Uuid) -> Card {
        Card {
            id: Uuid::new_v4(),
            account_id: account,
            name: "Ops".into(),
            status: CardStatus::Issued,
            balance: 0.0,
            cardholder_name: "Casey Harper".into(),
            cvv: "123".into(),
            expiry: "12/27".into(),
            zipcode: "73301".into(),
            address: "600 Congress Ave".into(),
            created_at: Utc::now(),
        }
    }

    fn budget(account: Uuid, name: &str) -> Budget {
        Budget {
            id: Uuid::new_v4(),
            account_id: account,
            name: name.into(),
            limit_amount: 500.0,
            period: BudgetPeriod::Monthly,
            require_receipts: false,
            created_at: Utc::now(),
        }
    }

    fn association(card: &Card, budget: &Budget) -> CardBudget {
        CardBudget {
            id: Uuid::new_v4(),
            card_id: card.id,
            budget_id: budget.id,
            created_at: Utc::now(),
        }
    }

    fn spend(association: &CardBudget, amount: f64, date: DateTime<Utc>) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            card_budget_id: association.id,
            amount,
            name: "Purchase".into(),
            date,
            description: None,
            category: None,
            merchant: None,
            receipt_id: None,
        }
    }

    #[test]
    fn zero_spend_budgets_are_omitted_and_colors_keep_their_index() {
        let account = Uuid::new_v4();
        let now = Utc::now();
        let c = card(account);
        let groceries = budget(account, "Groceries");
        let travel = budget(account, "Travel");
        let software = budget(account, "Software");
        let link_g = association(&c, &groceries);
        let link_t = association(&c, &travel);
        let link_s = association(&c, &software);
        let txns = vec![
            spend(&link_g, 30.0, now - Duration::days(1)),
            spend(&link_s, 70.0, now - Duration::days(2)),
        ];

        let slices = compute_spending_breakdown(
            &[groceries, travel, software],
            &[link_g, link_t, link_s],
            &[c],
            &txns,
            ReportingPeriod::Month,
            now,
        );

        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].budget_name, "Groceries");
        assert_eq!(slices[0].total_spent, 30.0);
        assert!((slices[0].percentage - 30.0).abs() < 1e-9);
        assert_eq!(slices[0].color, SLICE_PALETTE[0]);
        assert_eq!(slices[1].budget_name, "Software");
        assert!((slices[1].percentage - 70.0).abs() < 1e-9);
        // Travel at index 1 was skipped but still consumed its palette slot.
        assert_eq!(slices[1].color, SLICE_PALETTE[2]);
    }

    #[test]
    fn percentages_sum_to_one_hundred() {
        let account = Uuid::new_v4();
        let now = Utc::now();
        let c = card(account);
        let budgets: Vec<Budget> = (0..4)
            .map(|i| budget(account, &format!("Budget {i}")))
            .collect();
        let links: Vec<CardBudget> = budgets.iter().map(|b| association(&c, b)).collect();
        let txns: Vec<Transaction> = links
            .iter()
            .enumerate()
            .map(|(i, link)| spend(link, 10.0 + i as f64 * 7.5, now - Duration::days(1)))
            .collect();

        let slices =
            compute_spending_breakdown(&budgets, &links, &[c], &txns, ReportingPeriod::Month, now);
        let percentage_sum: f64 = slices.iter().map(|s| s.percentage).sum();
        assert!((percentage_sum - 100.0).abs() < 1e-9);
        assert!(slices.iter().all(|s| s.total_spent > 0.0));
    }

    #[test]
    fn no_in_window_spend_yields_empty_breakdown() {
        let account = Uuid::new_v4();
        let now = Utc::now();
        let c = card(account);
        let b = budget(account, "Travel");
        let link = association(&c, &b);
        let txns = vec![spend(&link, 25.0, now - Duration::days(45))];

        let slices =
            compute_spending_breakdown(&[b], &[link], &[c], &txns, ReportingPeriod::Month, now);
        assert!(slices.is_empty());
    }

    #[test]
    fn spend_on_another_accounts_card_is_ignored() {
        let account = Uuid::new_v4();
        let now = Utc::now();
        let mine = card(account);
        let theirs = card(Uuid::new_v4());
        let b = budget(account, "Shared");
        let foreign_link = association(&theirs, &b);
        let txns = vec![spend(&foreign_link, 40.0, now - Duration::days(1))];

        let slices = compute_spending_breakdown(
            &[b],
            &[foreign_link],
            &[mine],
            &txns,
            ReportingPeriod::Month,
            now,
        );
        assert!(slices.is_empty());
    }
}
