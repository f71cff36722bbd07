use serde::{Deserialize, Serialize};

/// Customer record as the banking sandbox returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl Customer {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Customer block embedded in the transaction feed response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub id: String,
    pub name: String,
    pub total_accounts: usize,
    pub account_names: Vec<String>,
}
