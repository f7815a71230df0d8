//! HTTP client for a single budget on an Actual Budget HTTP API server.
//!
//! Every operation is one request/response exchange against
//! `{host}/budgets/{budget_sync_id}/...`. Response bodies are validated into
//! typed records at the deserialization boundary; anything that does not match
//! surfaces as [`ClientError::Schema`], and non-2xx statuses as
//! [`ClientError::Remote`]. Nothing is retried.

mod error;
#[cfg(test)]
mod mock;

pub use error::{ClientError, Result};

use chrono::NaiveDate;
use reqwest::header::HeaderValue;
use reqwest::{Client, Method, RequestBuilder};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::{
    Account, CreatePayeeRequest, CreatedPayee, Envelope, ExistingTransaction,
    ImportTransactionsRequest, Payee, RawResponse, Transaction,
};
use crate::money::minor_units_to_decimal;

const API_KEY_HEADER: &str = "x-api-key";

/// Client bound to one server, API key and budget.
///
/// Owns its transport; reuse one instance for sequential calls.
#[derive(Clone)]
pub struct BudgetClient {
    http: Client,
    host: String,
    api_key: HeaderValue,
    budget_sync_id: String,
}

impl std::fmt::Debug for BudgetClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BudgetClient")
            .field("host", &self.host)
            .field("budget_sync_id", &self.budget_sync_id)
            .finish_non_exhaustive()
    }
}

impl BudgetClient {
    /// Create a client with a default transport.
    ///
    /// `host` must be an absolute `http` or `https` URL with no query or
    /// fragment; a trailing `/` is ignored. The API key must be a valid header
    /// value and the budget sync id must not be blank.
    pub fn new(
        host: impl Into<String>,
        api_key: impl Into<String>,
        budget_sync_id: impl Into<String>,
    ) -> Result<Self> {
        Self::with_http_client(Client::new(), host, api_key, budget_sync_id)
    }

    /// Create a client over a caller-configured transport (timeouts, proxies, TLS).
    pub fn with_http_client(
        http: Client,
        host: impl Into<String>,
        api_key: impl Into<String>,
        budget_sync_id: impl Into<String>,
    ) -> Result<Self> {
        let mut api_key =
            HeaderValue::from_str(&api_key.into()).map_err(|_| ClientError::InvalidApiKey)?;
        api_key.set_sensitive(true);

        let budget_sync_id = budget_sync_id.into();
        if budget_sync_id.trim().is_empty() {
            return Err(ClientError::InvalidBudgetId(budget_sync_id));
        }

        Ok(Self {
            http,
            host: normalize_host(host.into())?,
            api_key,
            budget_sync_id: budget_sync_id.trim().to_string(),
        })
    }

    /// Create a client from [`Config`], applying its transport timeout.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Self::with_http_client(
            builder.build()?,
            config.host.clone(),
            config.api_key.clone(),
            config.budget_sync_id.clone(),
        )
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn budget_sync_id(&self) -> &str {
        &self.budget_sync_id
    }

    /// List all accounts in the budget.
    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        self.get_data("/accounts", &[]).await
    }

    /// List accounts that are not closed, in server order.
    pub async fn list_open_accounts(&self) -> Result<Vec<Account>> {
        let accounts = self.list_accounts().await?;
        Ok(accounts.into_iter().filter(|a| !a.closed).collect())
    }

    /// Current balance of an account, in currency units with two decimal places.
    pub async fn get_account_balance(&self, account_id: &str) -> Result<Decimal> {
        let path = format!("/accounts/{}/balance", urlencoding::encode(account_id));
        let minor_units: i64 = self.get_data(&path, &[]).await?;
        Ok(minor_units_to_decimal(minor_units))
    }

    pub async fn list_payees(&self) -> Result<Vec<Payee>> {
        self.get_data("/payees", &[]).await
    }

    /// Create a payee and return it with the server-assigned id.
    ///
    /// Only the fields set on `payee` are sent.
    pub async fn create_payee(&self, payee: &Payee) -> Result<Payee> {
        let path = "/payees";
        let endpoint = format!("POST {}", path);
        let request = self
            .request(Method::POST, path)
            .json(&CreatePayeeRequest { payee });
        let raw = self.execute(&endpoint, request).await?;

        let created: CreatedPayee = decode_data(&endpoint, &raw)?;
        let id = created
            .into_id()
            .ok_or_else(|| ClientError::schema(&endpoint, "created payee has no id"))?;
        Ok(Payee {
            id: Some(id),
            ..payee.clone()
        })
    }

    /// Return the first payee named exactly `name`, creating it if none exists.
    ///
    /// This is a read followed by a write with no server-side guard: two callers
    /// racing on the same new name can both create it.
    pub async fn ensure_payee_exists(&self, name: &str) -> Result<Payee> {
        let payees = self.list_payees().await?;
        if let Some(existing) = payees
            .into_iter()
            .find(|p| p.name.as_deref() == Some(name))
        {
            debug!(payee = name, "Payee already exists");
            return Ok(existing);
        }

        let created = self.create_payee(&Payee::named(name)).await?;
        info!(
            payee = name,
            id = created.id.as_deref().unwrap_or_default(),
            "Created payee"
        );
        Ok(created)
    }

    /// List an account's transactions from `since_date`, optionally up to `until_date`.
    pub async fn list_transactions(
        &self,
        account_id: &str,
        since_date: NaiveDate,
        until_date: Option<NaiveDate>,
    ) -> Result<Vec<ExistingTransaction>> {
        let path = format!("/accounts/{}/transactions", urlencoding::encode(account_id));
        let mut query = vec![("since_date", since_date.format("%Y-%m-%d").to_string())];
        if let Some(until) = until_date {
            query.push(("until_date", until.format("%Y-%m-%d").to_string()));
        }
        self.get_data(&path, &query).await
    }

    /// Import transactions into an account. The server skips ones whose
    /// `imported_id` it has already seen.
    pub async fn import_transactions(
        &self,
        account_id: &str,
        transactions: &[Transaction],
    ) -> Result<RawResponse> {
        let path = format!(
            "/accounts/{}/transactions/import",
            urlencoding::encode(account_id)
        );
        let endpoint = format!("POST {}", path);
        debug!(count = transactions.len(), "Importing transactions");
        let request = self
            .request(Method::POST, &path)
            .json(&ImportTransactionsRequest { transactions });
        self.execute(&endpoint, request).await
    }

    /// Start a bank sync for every linked account in the budget.
    pub async fn trigger_all_bank_syncs(&self) -> Result<RawResponse> {
        let path = "/accounts/banksync";
        let endpoint = format!("POST {}", path);
        self.execute(&endpoint, self.request(Method::POST, path))
            .await
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/budgets/{}{}",
            self.host,
            urlencoding::encode(&self.budget_sync_id),
            path
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header(API_KEY_HEADER, self.api_key.clone())
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let endpoint = format!("GET {}", path);
        let request = self.request(Method::GET, path).query(query);
        let raw = self.execute(&endpoint, request).await?;
        decode_data(&endpoint, &raw)
    }

    /// Send a request and fail on any non-2xx status.
    async fn execute(&self, endpoint: &str, request: RequestBuilder) -> Result<RawResponse> {
        debug!(endpoint, "Sending request");
        let response = request.send().await.map_err(|e| {
            warn!(endpoint, "Request failed: {}", e);
            ClientError::Network(e)
        })?;

        let status = response.status();
        let body = response.text().await?;
        debug!(endpoint, status = status.as_u16(), "Received response");

        if !status.is_success() {
            warn!(
                endpoint,
                status = status.as_u16(),
                "Server rejected request: {}",
                body.chars().take(500).collect::<String>()
            );
            return Err(ClientError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        Ok(RawResponse {
            status: status.as_u16(),
            body,
        })
    }
}

/// Unwrap the `{"data": ...}` envelope into `T`.
fn decode_data<T: DeserializeOwned>(endpoint: &str, raw: &RawResponse) -> Result<T> {
    serde_json::from_str::<Envelope<T>>(&raw.body)
        .map(|envelope| envelope.data)
        .map_err(|e| {
            warn!(endpoint, "Response does not match schema: {}", e);
            ClientError::schema(endpoint, e.to_string())
        })
}

fn normalize_host(host: String) -> Result<String> {
    let trimmed = host.trim().trim_end_matches('/');
    match url::Url::parse(trimmed) {
        Ok(parsed)
            if matches!(parsed.scheme(), "http" | "https")
                && parsed.has_host()
                && parsed.query().is_none()
                && parsed.fragment().is_none() =>
        {
            Ok(trimmed.to_string())
        }
        _ => Err(ClientError::InvalidHost(host)),
    }
}
