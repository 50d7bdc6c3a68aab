//! Pure balance/analytics aggregation over in-memory records.
//!
//! Nothing in this module performs I/O or touches a clock: callers supply
//! the account's records (already scoped to one account) together with the
//! reporting period and a reference instant. Absence of data yields empty
//! or zero-valued output, never an error.

pub mod balance;
pub mod period;
pub mod recent;
pub mod spending;

pub use balance::{compute_balances, BalanceReport, BudgetBalance, CardBalance};
pub use period::{limit_multiplier, ReportingPeriod, SLICE_PALETTE};
pub use recent::{list_recent_transactions, TransactionSummary, DEFAULT_RECENT_LIMIT};
pub use spending::{compute_spending_breakdown, BudgetSlice};
