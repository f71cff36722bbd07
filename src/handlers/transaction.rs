use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::AppState;
use crate::error::ServiceError;
use crate::models::transaction::TransactionFeed;
use crate::services::aggregator;

#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    /// Position of the customer in the sandbox listing; first by default.
    #[serde(default)]
    pub customer_index: usize,
}

/// Handler for GET /api/transactions
///
/// The aggregated, date-descending transaction feed over the customer's
/// Savings and Credit Card accounts.
pub async fn get_transactions(
    State(state): State<AppState>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<TransactionFeed>, ServiceError> {
    tracing::info!(
        "Fetching transactions for customer index {}",
        query.customer_index
    );

    let feed =
        aggregator::build_transaction_feed(&state.bank, query.customer_index, state.aggregation)
            .await?;

    Ok(Json(feed))
}
