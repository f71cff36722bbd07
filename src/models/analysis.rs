use serde::{Deserialize, Serialize};

use crate::models::graph::Graph;

/// Typed result of a financial-analysis request. `analysis` is always
/// present on success; `chart` only when the model emitted one and it
/// materialized cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub chart: Option<Graph>,
    pub analysis: String,
    #[serde(rename = "userQuery")]
    pub user_query: String,
}

/// Body for the analysis endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub request: String,
    /// Which customer's transaction history to use as context.
    #[serde(default)]
    pub customer_index: Option<usize>,
}
