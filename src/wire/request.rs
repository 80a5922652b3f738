use crate::core::currency::{Currency, PrecisionPolicy};
use crate::core::error::{RecordDefect, SettlementError};
use crate::core::expense::ExpenseRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// A settlement request as sent by the client.
///
/// Each edge is `[beneficiary..., payer, amount]`. A beneficiary field is a
/// member name or an array of member names; arrays are flattened in order.
/// The amount is a JSON number or numeric string in major currency units.
///
/// ```json
/// { "names": ["ana", "ben"], "edges": [["ana", "ben", "ana", 12.50]] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettlementRequest {
    /// Known member names. Informational only.
    #[serde(default)]
    pub names: Vec<String>,
    pub edges: Vec<Vec<Value>>,
}

impl SettlementRequest {
    pub fn from_json(json: &str) -> Result<Self, SettlementError> {
        serde_json::from_str(json).map_err(|e| SettlementError::MalformedRequest(e.to_string()))
    }

    /// Build a request from records, rendering amounts in `currency`.
    pub fn from_records(names: Vec<String>, records: &[ExpenseRecord], currency: &Currency) -> Self {
        let edges = records
            .iter()
            .map(|record| {
                let mut edge: Vec<Value> = record
                    .beneficiaries()
                    .iter()
                    .map(|m| Value::String(m.to_string()))
                    .collect();
                edge.push(Value::String(record.payer().to_string()));
                let amount = currency.from_minor_units(record.amount()).to_string();
                edge.push(
                    serde_json::Number::from_str(&amount)
                        .map(Value::Number)
                        .unwrap_or(Value::String(amount)),
                );
                edge
            })
            .collect();
        Self { names, edges }
    }

    /// Decode every edge into an expense record in minor units.
    ///
    /// Fails on the first structurally invalid edge, naming its index.
    /// Semantic checks (positive amount, distinct beneficiaries) are left to
    /// the normalizer, which reports the same index.
    pub fn to_records(
        &self,
        currency: &Currency,
        policy: PrecisionPolicy,
    ) -> Result<Vec<ExpenseRecord>, SettlementError> {
        self.edges
            .iter()
            .enumerate()
            .map(|(index, edge)| {
                decode_edge(edge, currency, policy)
                    .map_err(|defect| SettlementError::invalid_record(index, defect))
            })
            .collect()
    }
}

fn decode_edge(
    edge: &[Value],
    currency: &Currency,
    policy: PrecisionPolicy,
) -> Result<ExpenseRecord, RecordDefect> {
    if edge.len() < 3 {
        return Err(RecordDefect::TooFewFields(edge.len()));
    }
    let payer_at = edge.len() - 2;

    let text = amount_text(&edge[payer_at + 1])?;
    // Checked on the text: parsing may already round away digits beyond
    // what a Decimal can hold.
    if policy == PrecisionPolicy::Reject {
        let allowed = currency.minor_digits();
        if fractional_digits(&text) > u64::from(allowed) {
            return Err(RecordDefect::ExcessPrecision { amount: text, allowed });
        }
    }
    let minor = currency.to_minor_units(parse_amount(text)?, policy)?;

    let payer = match &edge[payer_at] {
        Value::String(name) if name.is_empty() => return Err(RecordDefect::MissingPayer),
        Value::String(name) => name.clone(),
        Value::Null => return Err(RecordDefect::MissingPayer),
        _ => return Err(RecordDefect::NotAMember { position: payer_at }),
    };

    let mut beneficiaries = Vec::new();
    for (position, field) in edge[..payer_at].iter().enumerate() {
        match field {
            Value::String(name) if !name.is_empty() => beneficiaries.push(name.clone()),
            Value::Array(names) => {
                for name in names {
                    let name = name
                        .as_str()
                        .filter(|name| !name.is_empty())
                        .ok_or(RecordDefect::NotAMember { position })?;
                    beneficiaries.push(name.to_string());
                }
            }
            _ => return Err(RecordDefect::NotAMember { position }),
        }
    }

    Ok(ExpenseRecord::new(payer, beneficiaries, minor))
}

fn amount_text(value: &Value) -> Result<String, RecordDefect> {
    match value {
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s.trim().to_string()),
        other => Err(RecordDefect::NotAnAmount(other.to_string())),
    }
}

/// Significant digits after the decimal point, net of any exponent.
/// Trailing zeros do not count: `12.50` has one, `1.5e2` has none.
fn fractional_digits(text: &str) -> u64 {
    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(at) => match text[at + 1..].parse::<i64>() {
            Ok(exponent) => (&text[..at], exponent),
            Err(_) => return 0,
        },
        None => (text, 0),
    };
    let digits = mantissa
        .split_once('.')
        .map_or(0, |(_, fraction)| fraction.trim_end_matches('0').len());
    (digits as i64).saturating_sub(exponent).max(0) as u64
}

fn parse_amount(text: String) -> Result<Decimal, RecordDefect> {
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| RecordDefect::NotAnAmount(text))
}
