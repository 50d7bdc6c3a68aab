//! Store-facing wrapper around the pure aggregation functions.
//!
//! Loading walks ownership outward: cards and budgets by account, then
//! associations by card, then transactions by association. Windowed calls
//! push the date bound into the store query so out-of-window rows never
//! cross the wire.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::analytics::{
    compute_balances, compute_spending_breakdown, list_recent_transactions, BalanceReport,
    BudgetSlice, ReportingPeriod, TransactionSummary, DEFAULT_RECENT_LIMIT,
};
use crate::errors::Result;
use crate::records::{decode_rows, Budget, Card, CardBudget, Transaction};
use crate::store::{RecordStore, Selection, Table};

pub struct AnalyticsService;

struct AnalyticsInputs {
    cards: Vec<Card>,
    budgets: Vec<Budget>,
    associations: Vec<CardBudget>,
    transactions: Vec<Transaction>,
}

impl AnalyticsService {
    /// Per-budget, per-card, and grand balance figures for the period named
    /// by `period_token` (unrecognized tokens fall back to monthly).
    pub fn balances(
        &self,
        store: &dyn RecordStore,
        account_id: Uuid,
        period_token: &str,
    ) -> Result<BalanceReport> {
        self.balances_at(store, account_id, period_token, Utc::now())
    }

    pub fn balances_at(
        &self,
        store: &dyn RecordStore,
        account_id: Uuid,
        period_token: &str,
        now: DateTime<Utc>,
    ) -> Result<BalanceReport> {
        let period = ReportingPeriod::parse(period_token);
        let inputs = self.load_inputs(store, account_id, Some(period.window_start(now)))?;
        Ok(compute_balances(
            &inputs.cards,
            &inputs.budgets,
            &inputs.associations,
            &inputs.transactions,
            period,
            now,
        ))
    }

    /// Per-budget spending shares over the period, colored for charting.
    pub fn spending_breakdown(
        &self,
        store: &dyn RecordStore,
        account_id: Uuid,
        period_token: &str,
    ) -> Result<Vec<BudgetSlice>> {
        self.spending_breakdown_at(store, account_id, period_token, Utc::now())
    }

    pub fn spending_breakdown_at(
        &self,
        store: &dyn RecordStore,
        account_id: Uuid,
        period_token: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<BudgetSlice>> {
        let period = ReportingPeriod::parse(period_token);
        let inputs = self.load_inputs(store, account_id, Some(period.window_start(now)))?;
        Ok(compute_spending_breakdown(
            &inputs.budgets,
            &inputs.associations,
            &inputs.cards,
            &inputs.transactions,
            period,
            now,
        ))
    }

    /// The account's most recent transactions with display names attached.
    pub fn recent_transactions(
        &self,
        store: &dyn RecordStore,
        account_id: Uuid,
        limit: Option<usize>,
    ) -> Result<Vec<TransactionSummary>> {
        let inputs = self.load_inputs(store, account_id, None)?;
        Ok(list_recent_transactions(
            &inputs.associations,
            &inputs.cards,
            &inputs.budgets,
            &inputs.transactions,
            limit.unwrap_or(DEFAULT_RECENT_LIMIT),
        ))
    }

    fn load_inputs(
        &self,
        store: &dyn RecordStore,
        account_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> Result<AnalyticsInputs> {
        let rows = store.select(
            Table::Cards,
            &Selection::new().eq("account_id", json!(account_id)),
        )?;
        let cards: Vec<Card> = decode_rows(rows)?;

        let rows = store.select(
            Table::Budgets,
            &Selection::new().eq("account_id", json!(account_id)),
        )?;
        let budgets: Vec<Budget> = decode_rows(rows)?;

        let card_ids: Vec<Value> = cards.iter().map(|card| json!(card.id)).collect();
        let rows = store.select(
            Table::CardBudgets,
            &Selection::new().within("card_id", card_ids),
        )?;
        let associations: Vec<CardBudget> = decode_rows(rows)?;

        let association_ids: Vec<Value> = associations.iter().map(|a| json!(a.id)).collect();
        let mut selection = Selection::new().within("card_budget_id", association_ids);
        if let Some(since) = since {
            selection = selection.at_least("date", json!(since));
        }
        let rows = store.select(Table::Transactions, &selection)?;
        let transactions: Vec<Transaction> = decode_rows(rows)?;

        Ok(AnalyticsInputs {
            cards,
            budgets,
            associations,
            transactions,
        })
    }
}
