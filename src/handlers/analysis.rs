use axum::{Json, extract::State};

use crate::AppState;
use crate::error::ServiceError;
use crate::models::analysis::{AnalysisRequest, AnalysisResult};
use crate::services::aggregator;

/// Handler for POST /api/generate-analysis
///
/// Natural-language analysis of the customer's transaction history, with
/// an optional chart. The transaction context is best-effort: when the
/// aggregation fails the analysis proceeds with an empty history rather
/// than failing the call. Model and extraction failures are terminal.
pub async fn generate_analysis(
    State(state): State<AppState>,
    Json(payload): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResult>, ServiceError> {
    let user_query = payload.request.trim().to_string();
    if user_query.is_empty() {
        return Err(ServiceError::InvalidInput(
            "Missing 'request' in body".to_string(),
        ));
    }

    let customer_index = payload.customer_index.unwrap_or(0);

    let transactions = match aggregator::build_transaction_feed(
        &state.bank,
        customer_index,
        state.aggregation,
    )
    .await
    {
        Ok(feed) => feed.transactions,
        Err(err) => {
            tracing::warn!("Could not assemble transaction context: {}", err);
            Vec::new()
        }
    };

    let result = state
        .llm
        .generate_analysis(&user_query, &transactions)
        .await?;

    Ok(Json(result))
}
