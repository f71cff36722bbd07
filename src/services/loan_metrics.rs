//! Derived metrics over the sandbox loan book.

use rust_decimal::Decimal;

use crate::models::loan::{Loan, LoanSummary, ScoreRange};

/// Sum amounts and monthly payments across the loan book and classify the
/// credit score. Missing amounts and payments count as zero; the reported
/// score is the first loan's score, not an average.
pub fn summarize_loans(loans: &[Loan]) -> LoanSummary {
    let total_loan_amount: Decimal = loans.iter().filter_map(|loan| loan.amount).sum();
    let total_monthly_payment: Decimal =
        loans.iter().filter_map(|loan| loan.monthly_payment).sum();
    let credit_score = loans.first().and_then(|loan| loan.credit_score);

    LoanSummary {
        total_loans: loans.len(),
        total_loan_amount,
        total_monthly_payment,
        credit_score,
        score_range: credit_score.map(ScoreRange::classify),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn loan(
        amount: Option<Decimal>,
        monthly_payment: Option<Decimal>,
        credit_score: Option<i64>,
    ) -> Loan {
        Loan {
            id: "l1".to_string(),
            loan_type: "auto".to_string(),
            status: None,
            credit_score,
            monthly_payment,
            amount,
            description: None,
        }
    }

    #[test]
    fn test_summary_sums_and_first_score() {
        let loans = vec![
            loan(Some(dec!(100)), Some(dec!(10)), Some(750)),
            loan(Some(dec!(200)), Some(dec!(20)), None),
        ];
        let summary = summarize_loans(&loans);

        assert_eq!(summary.total_loans, 2);
        assert_eq!(summary.total_loan_amount, dec!(300));
        assert_eq!(summary.total_monthly_payment, dec!(30));
        assert_eq!(summary.credit_score, Some(750));
        assert_eq!(summary.score_range, Some(ScoreRange::VeryGood));
    }

    #[test]
    fn test_missing_fields_count_as_zero() {
        let loans = vec![loan(None, None, None), loan(Some(dec!(50)), None, Some(600))];
        let summary = summarize_loans(&loans);

        assert_eq!(summary.total_loan_amount, dec!(50));
        assert_eq!(summary.total_monthly_payment, Decimal::ZERO);
        // First loan has no score, and the first loan is the only one consulted.
        assert_eq!(summary.credit_score, None);
        assert_eq!(summary.score_range, None);
    }

    #[test]
    fn test_empty_loan_book() {
        let summary = summarize_loans(&[]);
        assert_eq!(summary.total_loans, 0);
        assert_eq!(summary.total_loan_amount, Decimal::ZERO);
        assert_eq!(summary.credit_score, None);
    }
}
