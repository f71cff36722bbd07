use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::customer::CustomerSummary;

/// The five ledger sub-resources the sandbox exposes per account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Purchase,
    Transfer,
    Loan,
}

impl TransactionKind {
    /// Fan-out order. Also the tie-break order within an account when
    /// transactions share a date.
    pub const ALL: [TransactionKind; 5] = [
        TransactionKind::Deposit,
        TransactionKind::Withdrawal,
        TransactionKind::Purchase,
        TransactionKind::Transfer,
        TransactionKind::Loan,
    ];

    /// Resource path segment under `/accounts/{id}/`.
    pub fn resource(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposits",
            TransactionKind::Withdrawal => "withdrawals",
            TransactionKind::Purchase => "purchases",
            TransactionKind::Transfer => "transfers",
            TransactionKind::Loan => "loans",
        }
    }

    /// Deposits and loans add funds; the other kinds draw them down.
    pub fn is_credit(&self) -> bool {
        matches!(self, TransactionKind::Deposit | TransactionKind::Loan)
    }
}

/// Raw ledger record from the sandbox. The sub-resources disagree on field
/// names (purchases carry `amount`, loans `payment_amount`, deposits
/// `transaction_date`, purchases `date`, ...), so every field is optional
/// and unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLedgerEntry {
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub payment_amount: Option<Decimal>,
    #[serde(default)]
    pub transaction_date: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Canonical transaction shape every sub-resource record normalizes into.
/// Built fresh per aggregation request, never mutated, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTransaction {
    pub customer_id: String,
    pub customer_name: String,
    pub account_id: String,
    pub account_type: String,
    pub nickname: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Sign-neutral as fetched; the direction lives in `is_credit`.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Derived from the kind, not from source data.
    pub is_credit: bool,
    /// Source-dependent ISO-ish date string; absent when the record had none.
    pub transaction_date: Option<String>,
    pub description: String,
}

/// Response envelope for the transaction feed endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionFeed {
    pub customer: CustomerSummary,
    pub total_transactions: usize,
    pub transactions: Vec<NormalizedTransaction>,
}
