use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::ServiceError;
use crate::models::account::Account;
use crate::models::customer::Customer;
use crate::models::loan::Loan;
use crate::models::transaction::{RawLedgerEntry, TransactionKind};

/// Read-only access to the banking sandbox, as the aggregation pipeline
/// consumes it.
///
/// Implementations absorb their own transport failures: a fetch that fails
/// yields an empty collection, never an error. Callers therefore cannot
/// distinguish "no data" from "fetch failed" here; that ambiguity is the
/// price of keeping one broken sub-resource from aborting an aggregate.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    async fn fetch_customers(&self) -> Vec<Customer>;
    async fn fetch_customer_accounts(&self, customer_id: &str) -> Vec<Account>;
    async fn fetch_ledger(&self, account_id: &str, kind: TransactionKind) -> Vec<RawLedgerEntry>;
}

/// HTTP client for the Nessie banking sandbox.
#[derive(Clone)]
pub struct NessieService {
    client: Client,
    api_key: String,
    base_url: String,
}

impl NessieService {
    pub fn new(api_key: String, base_url: String, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap(),
            api_key,
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}?key={}", self.base_url, path, self.api_key)
    }

    /// GET a JSON collection from the sandbox, collapsing every failure to
    /// an empty list. Transport errors, non-2xx statuses, non-array bodies,
    /// and individual undecodable records are all absorbed; the only trace
    /// they leave is a warning in the logs.
    async fn fetch_collection<T: DeserializeOwned>(&self, path: &str) -> Vec<T> {
        let url = self.url(path);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("Sandbox request to /{} failed: {}", path, err);
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            tracing::warn!("Sandbox returned {} for /{}", response.status(), path);
            return Vec::new();
        }

        match response.json::<serde_json::Value>().await {
            Ok(serde_json::Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match serde_json::from_value(item) {
                    Ok(record) => Some(record),
                    Err(err) => {
                        tracing::warn!("Skipping malformed record from /{}: {}", path, err);
                        None
                    }
                })
                .collect(),
            Ok(_) => {
                tracing::warn!("Sandbox returned a non-array body for /{}", path);
                Vec::new()
            }
            Err(err) => {
                tracing::warn!("Failed to decode body from /{}: {}", path, err);
                Vec::new()
            }
        }
    }

    /// GET the full loan book. Unlike the aggregation fetches this call
    /// propagates failure, so callers can tell "no loans" apart from
    /// "sandbox unreachable".
    pub async fn fetch_loans(&self) -> Result<Vec<Loan>, ServiceError> {
        let url = self.url("loans");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| ServiceError::Upstream(format!("loan fetch failed: {}", err)))?;

        if !response.status().is_success() {
            return Err(ServiceError::Upstream(format!(
                "sandbox returned {} for /loans",
                response.status()
            )));
        }

        response
            .json::<Vec<Loan>>()
            .await
            .map_err(|err| ServiceError::Schema(format!("invalid loan payload: {}", err)))
    }
}

#[async_trait]
impl TransactionSource for NessieService {
    async fn fetch_customers(&self) -> Vec<Customer> {
        self.fetch_collection("customers").await
    }

    async fn fetch_customer_accounts(&self, customer_id: &str) -> Vec<Account> {
        self.fetch_collection(&format!("customers/{}/accounts", customer_id))
            .await
    }

    async fn fetch_ledger(&self, account_id: &str, kind: TransactionKind) -> Vec<RawLedgerEntry> {
        self.fetch_collection(&format!("accounts/{}/{}", account_id, kind.resource()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_assembly() {
        let service = NessieService::new(
            "secret".to_string(),
            "http://api.nessieisreal.com".to_string(),
            10,
        );
        assert_eq!(
            service.url("customers/c1/accounts"),
            "http://api.nessieisreal.com/customers/c1/accounts?key=secret"
        );
        assert_eq!(
            service.url("accounts/a1/deposits"),
            "http://api.nessieisreal.com/accounts/a1/deposits?key=secret"
        );
    }
}
