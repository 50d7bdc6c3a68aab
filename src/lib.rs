#![doc(test(attr(deny(warnings))))]

//! TakeBack Core offers the budgeting and expense-tracking primitives behind
//! the TakeBack API: typed account/card/budget records, a pure
//! balance-analytics engine, and account-scoped services over a pluggable
//! record store.

pub mod analytics;
pub mod auth;
pub mod blob;
pub mod config;
pub mod errors;
pub mod records;
pub mod services;
pub mod store;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("TakeBack Core tracing initialized.");
    });
}
