//! Client for the Gemini generateContent endpoint and the analysis prompt.
//!
//! The prompt text is the contract with the model: it pins the reply to a
//! single JSON object with `chart` and `analysis` keys, which the
//! extraction cascade then enforces.

use std::time::Duration;

use reqwest::Client;
use serde_json::{Value, json};

use crate::error::ServiceError;
use crate::models::analysis::AnalysisResult;
use crate::models::transaction::NormalizedTransaction;
use crate::services::extraction;

/// How many transactions are inlined into the prompt as context.
const PROMPT_SAMPLE_SIZE: usize = 10;

const ANALYSIS_PREAMBLE: &str = "You are a sophisticated Financial Analysis Agent. Based on the \
user's query and their personal transaction history, provide a highly personalized response that \
feels tailored specifically to their financial situation.";

const ANALYSIS_SCHEMA_INSTRUCTIONS: &str = r#"RESPONSE FORMAT REQUIREMENTS:

Return a JSON object with exactly these keys:
{
  "chart": null or {chart object},  // Optional chart generation
  "analysis": "string"              // Detailed analysis text
}

Chart object format (when included):
{
  "type": "line|bar|pie|area|scatter",
  "title": "Human readable chart title",
  "data": [
    // For pie charts: [{"name": "Category A", "value": 100}, {"name": "Category B", "value": 200}]
    // For line/bar/area charts: [{"month": "Jan", "amount": 100}, {"month": "Feb", "amount": 200}]
    // For scatter charts: [{"x": 10, "y": 20}, {"x": 15, "y": 25}]
  ],
  "xAxisKey": "month",  // Key for x-axis (line/bar/area charts)
  "yAxisKey": "amount", // Key for y-axis (line/bar/area charts)
  "justification": "Why this chart type was chosen"
}

Analysis Requirements:
- Write directly to the user as if in a personal conversation
- Use PLAIN TEXT ONLY - NO markdown, NO asterisks, NO special formatting characters
- Include specific numbers and key trends from the data
- Give practical, actionable recommendations
- Keep analysis under 150 words - be direct and focus on the most important insights only
- Tailor all insights to the user's specific transaction history and spending patterns

Justification Requirements:
- Keep it very brief: 1-2 simple sentences explaining why this chart type was chosen

Set chart to null if no visualization adds value to the analysis."#;

/// Client for the LLM provider: one prompt in, one text reply out.
#[derive(Clone)]
pub struct GeminiService {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl GeminiService {
    pub fn new(api_key: Option<String>, base_url: String, model: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap(),
            api_key,
            base_url,
            model,
        }
    }

    /// Single prompt-in/text-out call. No retry: a transport failure, a
    /// non-2xx status, or an empty candidate is terminal.
    pub async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ServiceError::Upstream("GOOGLE_API_KEY is not set".to_string()))?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );

        tracing::info!("Requesting analysis from model {}", self.model);

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|err| ServiceError::Upstream(format!("model request failed: {}", err)))?;

        if !response.status().is_success() {
            return Err(ServiceError::Upstream(format!(
                "model provider returned {}",
                response.status()
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| ServiceError::Upstream(format!("unreadable model response: {}", err)))?;

        let text = collect_candidate_text(&payload);
        if text.trim().is_empty() {
            return Err(ServiceError::Upstream(
                "empty response from the model provider".to_string(),
            ));
        }

        Ok(text)
    }

    /// Full analysis flow: prompt the model with the user query plus a
    /// transaction sample, then coerce the reply into a typed result.
    pub async fn generate_analysis(
        &self,
        user_query: &str,
        transactions: &[NormalizedTransaction],
    ) -> Result<AnalysisResult, ServiceError> {
        let prompt = build_analysis_prompt(user_query, transactions);
        let raw = self.generate(&prompt).await?;
        extraction::extract_analysis(&raw, user_query)
    }
}

/// Concatenate the text parts of the first candidate.
fn collect_candidate_text(payload: &Value) -> String {
    payload["candidates"][0]["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part["text"].as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

fn build_analysis_prompt(user_query: &str, transactions: &[NormalizedTransaction]) -> String {
    let sample = &transactions[..transactions.len().min(PROMPT_SAMPLE_SIZE)];
    let sample_json =
        serde_json::to_string_pretty(sample).unwrap_or_else(|_| "[]".to_string());

    format!(
        "{}\n\nUser request: {}\n\nTransaction data sample (first {} of {} transactions - use \
         this to understand their spending patterns):\n{}\n\nAnalyze their specific financial \
         behavior and provide personalized insights based on their actual transaction \
         history.\n\n{}\n\nCRITICAL: Return responses in PLAIN TEXT ONLY. Absolutely NO asterisks, \
         NO markdown, NO special formatting characters.",
        ANALYSIS_PREAMBLE,
        user_query,
        sample.len(),
        transactions.len(),
        sample_json,
        ANALYSIS_SCHEMA_INSTRUCTIONS
    )
}
