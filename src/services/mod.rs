//! Account-scoped operations over the record store.
//!
//! Services are stateless; every method takes the caller's account id and
//! enforces ownership before touching rows. Visibility errors follow one
//! convention: a row that does not exist is `NotFound`, a row that exists
//! but belongs to someone else is `AccessDenied`.

pub mod account;
pub mod analytics;
pub mod budget;
pub mod card;
pub mod card_budget;
pub mod policy;
pub mod receipt;
pub mod transaction;

pub use account::{AccountService, AuthSession, ProfilePatch, SignupInput};
pub use analytics::AnalyticsService;
pub use budget::{BudgetPatch, BudgetService, NewBudget};
pub use card::{CardPatch, CardService, CardWithBudgets, NewCard};
pub use card_budget::{AssociationView, CardBudgetService};
pub use policy::{NewPolicy, PolicyPatch, PolicyService};
pub use receipt::{ReceiptService, ReceiptUpload, MAX_RECEIPT_BYTES};
pub use transaction::{NewTransaction, TransactionPatch, TransactionQuery, TransactionService, TransactionView};
