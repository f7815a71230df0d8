//! # budget-client
//!
//! Typed client for the Actual Budget HTTP API.
//!
//! A [`BudgetClient`] is bound to one server, one API key and one budget
//! (`budget_sync_id`). Every operation is a single request/response exchange:
//! the JSON `{"data": ...}` envelope is validated and mapped into typed records
//! from [`models`], and monetary values are converted with [`money`].
//!
//! ```text
//!   caller ──► BudgetClient ──► reqwest ──► {host}/budgets/{budget_sync_id}/...
//!                  │
//!                  └── models / money (validation + decimal mapping)
//! ```
//!
//! ## Modules
//! - `client`: `BudgetClient` and `ClientError`
//! - `models`: request/response records
//! - `money`: minor-unit ↔ decimal conversion
//! - `config`: environment-driven configuration

pub mod client;
pub mod config;
pub mod models;
pub mod money;

pub use client::{BudgetClient, ClientError};
pub use config::Config;
pub use models::{Account, ExistingTransaction, Payee, RawResponse, Transaction};
