//! Shared fixtures for the integration suites.
#![allow(dead_code)]

use once_cell::sync::Lazy;
use takeback_core::auth::{TokenAuthority, DEFAULT_TOKEN_TTL_DAYS};
use takeback_core::records::BudgetPeriod;
use takeback_core::services::{AccountService, AuthSession, NewBudget, NewCard, SignupInput};
use takeback_core::store::MemoryStore;

pub static AUTHORITY: Lazy<TokenAuthority> =
    Lazy::new(|| TokenAuthority::new("integration-test-secret", DEFAULT_TOKEN_TTL_DAYS));

pub fn init() {
    takeback_core::init();
}

pub fn signup_input(email: &str) -> SignupInput {
    SignupInput {
        first_name: "Casey".into(),
        last_name: "Rivera".into(),
        email: email.into(),
        phone: "555-0100".into(),
        organization_legal_name: "Rivera Consulting LLC".into(),
        organization_ein_number: "12-3456789".into(),
        password: "correct horse battery staple".into(),
        date_of_birth: None,
        address: None,
        zip_code: None,
    }
}

pub fn signup(store: &MemoryStore, email: &str) -> AuthSession {
    AccountService
        .signup(store, &AUTHORITY, signup_input(email))
        .expect("signup should succeed")
}

pub fn new_budget(name: &str, limit: f64, period: BudgetPeriod) -> NewBudget {
    NewBudget {
        name: name.into(),
        limit_amount: limit,
        period,
        require_receipts: false,
    }
}

pub fn new_card(name: &str) -> NewCard {
    NewCard {
        name: name.into(),
        cardholder_name: "Casey Rivera".into(),
        cvv: "123".into(),
        expiry: "12/28".into(),
        zipcode: "94110".into(),
        address: "1 Main St".into(),
        budget_ids: Vec::new(),
    }
}
