use serde::Deserialize;

/// Account types that feed the transaction aggregation.
pub const ELIGIBLE_ACCOUNT_TYPES: [&str; 2] = ["Savings", "Credit Card"];

/// Account record as the banking sandbox returns it. The sandbox's type
/// vocabulary is open (Checking, Savings, Credit Card, ...), so the type
/// stays a wire string and eligibility is a predicate.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "type", default)]
    pub account_type: String,
    #[serde(default)]
    pub nickname: Option<String>,
}

impl Account {
    pub fn is_eligible(&self) -> bool {
        ELIGIBLE_ACCOUNT_TYPES.contains(&self.account_type.as_str())
    }
}
