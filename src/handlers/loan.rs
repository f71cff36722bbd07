use axum::{Json, extract::State};
use chrono::Utc;

use crate::AppState;
use crate::error::ServiceError;
use crate::models::loan::{CreditScoreResponse, Loan};
use crate::services::loan_metrics;

/// Handler for GET /api/loans
///
/// The raw loan book from the sandbox. This fetch is strict: a transport
/// failure surfaces as 503 instead of an empty list.
pub async fn get_loans(State(state): State<AppState>) -> Result<Json<Vec<Loan>>, ServiceError> {
    let loans = state.bank.fetch_loans().await?;
    Ok(Json(loans))
}

/// Handler for GET /api/credit-score
///
/// Summary metrics over the loan book: totals plus the score band.
pub async fn get_credit_score(
    State(state): State<AppState>,
) -> Result<Json<CreditScoreResponse>, ServiceError> {
    let loans = state.bank.fetch_loans().await?;

    if loans.is_empty() {
        return Err(ServiceError::NotFound(
            "No loans found in the sandbox.".to_string(),
        ));
    }

    let summary = loan_metrics::summarize_loans(&loans);
    tracing::debug!(
        "Summarized {} loans, score {:?}",
        summary.total_loans,
        summary.credit_score
    );

    Ok(Json(CreditScoreResponse {
        summary,
        last_updated: Utc::now(),
    }))
}
