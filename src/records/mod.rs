//! Typed records for the tables the hosted store persists.
//!
//! Rows arrive as JSON maps; [`decode_row`]/[`decode_rows`] are the boundary
//! where dynamic shapes become structured records. Nothing past this module
//! works with untyped maps.

pub mod account;
pub mod budget;
pub mod card;
pub mod card_budget;
pub mod policy;
pub mod receipt;
pub mod transaction;

pub use account::{Account, AccountProfile};
pub use budget::{Budget, BudgetPeriod};
pub use card::{Card, CardStatus};
pub use card_budget::CardBudget;
pub use policy::Policy;
pub use receipt::{Receipt, ReceiptKind};
pub use transaction::Transaction;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::{CoreError, Result};

/// Decodes one store row into a typed record.
pub fn decode_row<T: DeserializeOwned>(row: Value) -> Result<T> {
    serde_json::from_value(row).map_err(|err| CoreError::MalformedRecord(err.to_string()))
}

/// Decodes a batch of store rows, failing fast on the first malformed one.
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>> {
    rows.into_iter().map(decode_row).collect()
}
