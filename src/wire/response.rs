use crate::core::currency::CurrencyCode;
use crate::core::error::SettlementError;
use crate::engine::normalizer::RemainderAllocation;
use crate::engine::SettlementPlan;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One transfer on the wire: `[from, to, amount]`.
///
/// The amount is a JSON number written with exactly the currency's
/// minor-unit digits, e.g. `50.00`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRow(
    pub String,
    pub String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")] pub Decimal,
);

/// Successful settlement response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementResponse {
    pub transactions: Vec<TransferRow>,
    pub currency: CurrencyCode,
    /// Whether any even split left minor units that were assigned by
    /// beneficiary order. Informational; balances are exact either way.
    pub remainder_redistributed: bool,
    /// Per-record detail of those assignments, in minor units.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remainders: Vec<RemainderAllocation>,
}

impl SettlementResponse {
    /// Shape a plan into the response contract. Purely structural.
    pub fn render(plan: &SettlementPlan) -> Self {
        let currency = plan.currency();
        Self {
            transactions: plan
                .transactions()
                .iter()
                .map(|tx| {
                    TransferRow(
                        tx.from().to_string(),
                        tx.to().to_string(),
                        currency.from_minor_units(tx.amount()),
                    )
                })
                .collect(),
            currency: currency.code().clone(),
            remainder_redistributed: plan.remainder_redistributed(),
            remainders: plan.remainders().to_vec(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Failure response: one reason per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// `invalid_record`, `malformed_request`, `amount_overflow` or `internal`.
    pub kind: String,
    pub error: String,
    /// Index of the offending edge, for record errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<usize>,
}

impl From<&SettlementError> for ErrorResponse {
    fn from(err: &SettlementError) -> Self {
        let (kind, record) = match err {
            SettlementError::InvalidRecord { index, .. } => ("invalid_record", Some(*index)),
            SettlementError::MalformedRequest(_) => ("malformed_request", None),
            SettlementError::AmountOverflow => ("amount_overflow", None),
            SettlementError::InvariantViolation { .. } | SettlementError::DuplicateBalance(_) => {
                ("internal", None)
            }
        };
        Self {
            kind: kind.to_string(),
            error: err.to_string(),
            record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::Currency;
    use crate::core::error::RecordDefect;
    use crate::core::expense::ExpenseRecord;
    use crate::engine::{EngineConfig, SettlementEngine};

    fn engine(currency: Currency) -> SettlementEngine {
        SettlementEngine::new(EngineConfig {
            currency,
            ..Default::default()
        })
    }

    #[test]
    fn test_render_two_party() {
        let plan = engine(Currency::usd())
            .settle(&[ExpenseRecord::new("A", ["A", "B"], 10000)])
            .unwrap();
        let json = SettlementResponse::render(&plan).to_json().unwrap();
        assert_eq!(
            json,
            r#"{"transactions":[["B","A",50.00]],"currency":"USD","remainder_redistributed":false}"#
        );
    }

    #[test]
    fn test_render_zero_digit_currency() {
        let plan = engine(Currency::standard("JPY"))
            .settle(&[ExpenseRecord::new("A", ["A", "B"], 1000)])
            .unwrap();
        let json = SettlementResponse::render(&plan).to_json().unwrap();
        assert!(json.contains(r#"["B","A",500]"#));
    }

    #[test]
    fn test_render_reports_remainders() {
        let plan = engine(Currency::usd())
            .settle(&[ExpenseRecord::new("P", ["A", "B", "C"], 101)])
            .unwrap();
        let response = SettlementResponse::render(&plan);
        assert!(response.remainder_redistributed);
        assert_eq!(response.remainders.len(), 1);

        let json = response.to_json().unwrap();
        assert!(json.contains(r#""remainders":[{"record_index":0,"remainder":2,"recipients":["A","B"]}]"#));
    }

    #[test]
    fn test_empty_plan_renders_empty_list() {
        let plan = engine(Currency::usd()).settle(&[]).unwrap();
        let response = SettlementResponse::render(&plan);
        assert!(response.transactions.is_empty());
        assert!(response.to_json().unwrap().starts_with(r#"{"transactions":[]"#));
    }

    #[test]
    fn test_error_response_identifies_record() {
        let err = SettlementError::invalid_record(2, RecordDefect::NoBeneficiaries);
        let response = ErrorResponse::from(&err);
        assert_eq!(response.kind, "invalid_record");
        assert_eq!(response.record, Some(2));
        assert_eq!(response.error, "invalid record #2: record has no beneficiaries");
    }

    #[test]
    fn test_duplicate_balance_is_internal() {
        let err = SettlementError::DuplicateBalance("A".into());
        let response = ErrorResponse::from(&err);
        assert_eq!(response.kind, "internal");
        assert_eq!(response.record, None);
    }
}
