//! Request and response records for the budget API.
//!
//! Everything here is an ephemeral DTO: built from a response body or in memory
//! to be serialized into a request. Nothing is persisted locally.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// An account as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    /// Tracking account excluded from the budget.
    pub offbudget: bool,
    pub closed: bool,
}

/// A transaction counterparty.
///
/// A locally built `Payee` has no `id` and is a request payload; one returned by
/// the server always has its `id` set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Default category applied to this payee's transactions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Set when the payee represents a transfer to another account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_acct: Option<String>,
}

impl Payee {
    /// Build an uncreated payee with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// A transaction submitted for import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub account: String,
    /// Amount in minor currency units (cents).
    pub amount: i64,
    /// Payee by name; the server resolves or creates it.
    pub payee_name: String,
    pub date: NaiveDate,
    pub cleared: bool,
    /// Caller-chosen identifier the server uses to skip duplicates on re-import.
    pub imported_id: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A transaction as returned by the server.
///
/// Refers to its payee by id (`payee`) rather than by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingTransaction {
    pub id: String,
    pub account: String,
    pub amount: i64,
    pub payee: String,
    pub date: NaiveDate,
    pub cleared: bool,
    #[serde(default)]
    pub imported_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A successful response whose body is handed back to the caller untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// The `{"data": ...}` wrapper every response body uses.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

/// Body of `POST /payees`.
#[derive(Debug, Serialize)]
pub(crate) struct CreatePayeeRequest<'a> {
    pub payee: &'a Payee,
}

/// Body of `POST /accounts/{id}/transactions/import`.
#[derive(Debug, Serialize)]
pub(crate) struct ImportTransactionsRequest<'a> {
    pub transactions: &'a [Transaction],
}

/// `data` of a payee creation: the server answers with the new id, some
/// versions with the whole payee.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum CreatedPayee {
    Id(String),
    Payee(Payee),
}

impl CreatedPayee {
    pub fn into_id(self) -> Option<String> {
        match self {
            CreatedPayee::Id(id) => Some(id),
            CreatedPayee::Payee(payee) => payee.id,
        }
    }
}
