use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Loan record from the sandbox `/loans` resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "type", default)]
    pub loan_type: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub credit_score: Option<i64>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub monthly_payment: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub description: Option<String>,
}

/// FICO-style score bands, inclusive on the lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreRange {
    Exceptional,
    #[serde(rename = "Very Good")]
    VeryGood,
    Good,
    Fair,
    Poor,
}

impl ScoreRange {
    pub fn classify(score: i64) -> Self {
        match score {
            s if s >= 800 => ScoreRange::Exceptional,
            s if s >= 740 => ScoreRange::VeryGood,
            s if s >= 670 => ScoreRange::Good,
            s if s >= 580 => ScoreRange::Fair,
            _ => ScoreRange::Poor,
        }
    }
}

/// Aggregate view over the loan book.
///
/// The reported credit score is the first loan's score, not an average
/// across loans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSummary {
    pub total_loans: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_loan_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_monthly_payment: Decimal,
    pub credit_score: Option<i64>,
    pub score_range: Option<ScoreRange>,
}

/// Response body for the credit-score endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditScoreResponse {
    #[serde(flatten)]
    pub summary: LoanSummary,
    pub last_updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bands_inclusive_on_lower_bound() {
        assert_eq!(ScoreRange::classify(850), ScoreRange::Exceptional);
        assert_eq!(ScoreRange::classify(800), ScoreRange::Exceptional);
        assert_eq!(ScoreRange::classify(799), ScoreRange::VeryGood);
        assert_eq!(ScoreRange::classify(740), ScoreRange::VeryGood);
        assert_eq!(ScoreRange::classify(739), ScoreRange::Good);
        assert_eq!(ScoreRange::classify(670), ScoreRange::Good);
        assert_eq!(ScoreRange::classify(669), ScoreRange::Fair);
        assert_eq!(ScoreRange::classify(580), ScoreRange::Fair);
        assert_eq!(ScoreRange::classify(579), ScoreRange::Poor);
        assert_eq!(ScoreRange::classify(300), ScoreRange::Poor);
    }

    #[test]
    fn test_score_range_wire_names() {
        assert_eq!(
            serde_json::to_string(&ScoreRange::VeryGood).unwrap(),
            "\"Very Good\""
        );
        assert_eq!(
            serde_json::to_string(&ScoreRange::Exceptional).unwrap(),
            "\"Exceptional\""
        );
    }
}
