//! Narrow interface to the hosted table store.
//!
//! Services receive an explicitly constructed store client; nothing in the
//! crate holds a process-wide handle. The query surface is deliberately
//! small: equality, set membership, `>=` ranges, descending order, limit.

pub mod memory;

use serde_json::Value;

use crate::errors::Result;

pub use memory::MemoryStore;

/// Tables the backend persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Accounts,
    Cards,
    Budgets,
    CardBudgets,
    Transactions,
    Policies,
    Receipts,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Accounts => "accounts",
            Table::Cards => "cards",
            Table::Budgets => "budgets",
            Table::CardBudgets => "card_budgets",
            Table::Transactions => "transactions",
            Table::Policies => "policies",
            Table::Receipts => "receipts",
        }
    }
}

/// A single row predicate.
#[derive(Debug, Clone)]
pub enum Filter {
    /// Field equals the value.
    Eq(String, Value),
    /// Field is one of the values.
    In(String, Vec<Value>),
    /// Field is greater than or equal to the value (numbers, or timestamp
    /// strings; text comparison is only sound when every writer emits the
    /// same RFC 3339 form, which is why all timestamps go through serde).
    Gte(String, Value),
}

/// Ordering directive applied after filtering.
#[derive(Debug, Clone)]
pub struct Order {
    pub field: String,
    pub descending: bool,
}

/// Declarative row selection built up by the service layer.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    filters: Vec<Filter>,
    order: Option<Order>,
    limit: Option<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: Value) -> Self {
        self.filters.push(Filter::Eq(field.to_string(), value));
        self
    }

    pub fn within(mut self, field: &str, values: Vec<Value>) -> Self {
        self.filters.push(Filter::In(field.to_string(), values));
        self
    }

    pub fn at_least(mut self, field: &str, value: Value) -> Self {
        self.filters.push(Filter::Gte(field.to_string(), value));
        self
    }

    pub fn order_desc(mut self, field: &str) -> Self {
        self.order = Some(Order {
            field: field.to_string(),
            descending: true,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    pub fn max_rows(&self) -> Option<usize> {
        self.limit
    }
}

/// Abstraction over the hosted table store.
///
/// Rows are JSON objects; typed decoding happens at the caller's boundary
/// via [`crate::records::decode_rows`]. Implementations report transport
/// failures as [`crate::errors::CoreError::Upstream`].
pub trait RecordStore: Send + Sync {
    fn select(&self, table: Table, selection: &Selection) -> Result<Vec<Value>>;
    fn insert(&self, table: Table, row: Value) -> Result<Value>;
    fn update(&self, table: Table, selection: &Selection, patch: Value) -> Result<Vec<Value>>;
    fn delete(&self, table: Table, selection: &Selection) -> Result<usize>;
}
