//! Customer account discovery and the transaction fan-out pipeline.
//!
//! For one customer the pipeline resolves the eligible accounts, fans out
//! over every account x ledger-kind pair, normalizes each raw record into
//! the canonical transaction shape, and merges everything into a single
//! date-descending list. Sub-fetches are independent and individually
//! allowed to fail empty, so one broken sub-resource never drops the rest.

use std::time::Duration;

use futures_util::stream::{self, StreamExt};
use rust_decimal::Decimal;
use tokio::time::Instant;

use crate::error::ServiceError;
use crate::models::account::Account;
use crate::models::customer::{Customer, CustomerSummary};
use crate::models::transaction::{
    NormalizedTransaction, RawLedgerEntry, TransactionFeed, TransactionKind,
};
use crate::services::nessie::TransactionSource;

/// Nickname used when the sandbox record has none.
const UNNAMED_ACCOUNT: &str = "Unnamed";

/// Tuning for the per-request fan-out.
#[derive(Clone, Copy, Debug)]
pub struct AggregationOptions {
    /// Concurrent sub-fetches allowed per request.
    pub concurrency: usize,
    /// Budget for the whole fan-out. Sub-fetches still pending at the
    /// deadline are treated as empty, consistent with the fail-open policy.
    pub timeout: Duration,
}

impl Default for AggregationOptions {
    fn default() -> Self {
        Self {
            concurrency: 8,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Resolve a customer by position in the sandbox customer listing, together
/// with the accounts that qualify for aggregation.
///
/// Every failure here is terminal for the request: an empty customer
/// collection, an empty account list, or no eligible accounts map to
/// NotFound; an out-of-range index maps to InvalidInput.
pub async fn resolve_customer_accounts<S>(
    source: &S,
    customer_index: usize,
) -> Result<(Customer, Vec<Account>), ServiceError>
where
    S: TransactionSource + ?Sized,
{
    let mut customers = source.fetch_customers().await;

    if customers.is_empty() {
        return Err(ServiceError::NotFound(
            "No customers found in the sandbox.".to_string(),
        ));
    }

    if customer_index >= customers.len() {
        return Err(ServiceError::InvalidInput(format!(
            "Customer index {} exceeds the {} available customers.",
            customer_index,
            customers.len()
        )));
    }

    let customer = customers.swap_remove(customer_index);
    tracing::info!(
        "Selected customer {} ({})",
        customer.display_name(),
        customer.id
    );

    let accounts = source.fetch_customer_accounts(&customer.id).await;

    if accounts.is_empty() {
        return Err(ServiceError::NotFound(format!(
            "No accounts found for customer {}.",
            customer.display_name()
        )));
    }

    let eligible: Vec<Account> = accounts
        .into_iter()
        .filter(|account| account.is_eligible())
        .collect();

    if eligible.is_empty() {
        return Err(ServiceError::NotFound(
            "Customer has no Savings or Credit Card accounts.".to_string(),
        ));
    }

    Ok((customer, eligible))
}

/// Fan out over every account x ledger-kind pair and merge the normalized
/// records into one date-descending list.
///
/// Fetches run with bounded concurrency under a shared deadline. Results
/// are reassembled in emission order (discovery order x kind order) before
/// sorting, so the output is deterministic regardless of completion order.
pub async fn aggregate_transactions<S>(
    source: &S,
    customer: &Customer,
    accounts: &[Account],
    options: AggregationOptions,
) -> Vec<NormalizedTransaction>
where
    S: TransactionSource + ?Sized,
{
    let deadline = Instant::now() + options.timeout;
    let customer_name = customer.display_name();

    let slot_info: Vec<(&Account, TransactionKind)> = accounts
        .iter()
        .flat_map(|account| TransactionKind::ALL.into_iter().map(move |kind| (account, kind)))
        .collect();

    let jobs: Vec<(usize, String, TransactionKind)> = slot_info
        .iter()
        .enumerate()
        .map(|(slot, (account, kind))| (slot, account.id.clone(), *kind))
        .collect();

    let mut batches: Vec<Vec<RawLedgerEntry>> = vec![Vec::new(); jobs.len()];

    let fetched = stream::iter(jobs.into_iter().map(|(slot, account_id, kind)| async move {
        let entries =
            match tokio::time::timeout_at(deadline, source.fetch_ledger(&account_id, kind)).await {
                Ok(entries) => entries,
                Err(_) => {
                    tracing::warn!(
                        "Fetch of {} for account {} missed the request deadline",
                        kind.resource(),
                        account_id
                    );
                    Vec::new()
                }
            };
        (slot, entries)
    }))
    .buffer_unordered(options.concurrency.max(1))
    .collect::<Vec<_>>()
    .await;

    for (slot, entries) in fetched {
        batches[slot] = entries;
    }

    let mut transactions = Vec::new();
    for (batch, (account, kind)) in batches.into_iter().zip(slot_info) {
        for entry in batch {
            transactions.push(normalize(customer, &customer_name, account, kind, entry));
        }
    }

    sort_by_date_desc(&mut transactions);
    transactions
}

/// Discovery plus fan-out, wrapped into the feed envelope.
pub async fn build_transaction_feed<S>(
    source: &S,
    customer_index: usize,
    options: AggregationOptions,
) -> Result<TransactionFeed, ServiceError>
where
    S: TransactionSource + ?Sized,
{
    let (customer, accounts) = resolve_customer_accounts(source, customer_index).await?;
    let transactions = aggregate_transactions(source, &customer, &accounts, options).await;

    tracing::info!(
        "Aggregated {} transactions across {} accounts for {}",
        transactions.len(),
        accounts.len(),
        customer.display_name()
    );

    Ok(TransactionFeed {
        customer: CustomerSummary {
            id: customer.id.clone(),
            name: customer.display_name(),
            total_accounts: accounts.len(),
            account_names: accounts
                .iter()
                .map(|account| {
                    account
                        .nickname
                        .clone()
                        .unwrap_or_else(|| UNNAMED_ACCOUNT.to_string())
                })
                .collect(),
        },
        total_transactions: transactions.len(),
        transactions,
    })
}

fn normalize(
    customer: &Customer,
    customer_name: &str,
    account: &Account,
    kind: TransactionKind,
    entry: RawLedgerEntry,
) -> NormalizedTransaction {
    // Sub-resources disagree on the amount field name; first present wins.
    let amount = entry
        .amount
        .or(entry.payment_amount)
        .unwrap_or(Decimal::ZERO);

    NormalizedTransaction {
        customer_id: customer.id.clone(),
        customer_name: customer_name.to_string(),
        account_id: account.id.clone(),
        account_type: account.account_type.clone(),
        nickname: account
            .nickname
            .clone()
            .unwrap_or_else(|| UNNAMED_ACCOUNT.to_string()),
        kind,
        amount,
        is_credit: kind.is_credit(),
        transaction_date: entry.transaction_date.or(entry.date),
        description: entry.description.unwrap_or_default(),
    }
}

/// Stable date-descending order. Absent dates compare as the empty string,
/// so records without a date sink to the end; ties keep emission order.
fn sort_by_date_desc(transactions: &mut [NormalizedTransaction]) {
    transactions.sort_by(|a, b| {
        let date_a = a.transaction_date.as_deref().unwrap_or("");
        let date_b = b.transaction_date.as_deref().unwrap_or("");
        date_b.cmp(date_a)
    });
}
