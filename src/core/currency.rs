use crate::core::error::RecordDefect;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest supported minor-unit exponent. `10^18` still fits in an `i64`.
pub const MAX_MINOR_DIGITS: u32 = 18;

/// ISO 4217-style currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// What to do with an amount carrying more fractional digits than the
/// currency's minor unit can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrecisionPolicy {
    /// Reject the record.
    #[default]
    Reject,
    /// Round to the minor unit, ties to even.
    RoundHalfEven,
}

/// The single currency a group is denominated in, with its minor-unit precision.
///
/// All engine arithmetic happens in integer minor units; `Currency` is the
/// only place where decimal amounts are converted in or out.
///
/// # Examples
///
/// ```
/// use debt_settlement::core::currency::{Currency, PrecisionPolicy};
/// use rust_decimal_macros::dec;
///
/// let usd = Currency::new("USD", 2);
/// let cents = usd.to_minor_units(dec!(12.5), PrecisionPolicy::Reject).unwrap();
/// assert_eq!(cents, 1250);
/// assert_eq!(usd.from_minor_units(cents).to_string(), "12.50");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Currency {
    code: CurrencyCode,
    minor_digits: u32,
}

impl Currency {
    /// Create a currency with `minor_digits` fractional digits.
    ///
    /// # Panics
    ///
    /// Panics if `minor_digits` exceeds [`MAX_MINOR_DIGITS`].
    pub fn new(code: impl Into<String>, minor_digits: u32) -> Self {
        assert!(
            minor_digits <= MAX_MINOR_DIGITS,
            "minor_digits must be at most {}, got {}",
            MAX_MINOR_DIGITS,
            minor_digits
        );
        Self {
            code: CurrencyCode::new(code),
            minor_digits,
        }
    }

    /// Currency with the ISO 4217 exponent for well-known codes, 2 otherwise.
    pub fn standard(code: &str) -> Self {
        let minor_digits = match code.to_ascii_uppercase().as_str() {
            "JPY" | "KRW" | "VND" | "CLP" | "ISK" | "UGX" | "XAF" | "XOF" => 0,
            "BHD" | "IQD" | "JOD" | "KWD" | "LYD" | "OMR" | "TND" => 3,
            _ => 2,
        };
        Self::new(code.to_ascii_uppercase(), minor_digits)
    }

    pub fn usd() -> Self {
        Self::new("USD", 2)
    }

    pub fn code(&self) -> &CurrencyCode {
        &self.code
    }

    pub fn minor_digits(&self) -> u32 {
        self.minor_digits
    }

    /// Minor units per major unit, e.g. 100 for cents.
    pub fn factor(&self) -> i64 {
        10_i64.pow(self.minor_digits)
    }

    /// Convert a decimal amount in major units to integer minor units.
    pub fn to_minor_units(
        &self,
        amount: Decimal,
        policy: PrecisionPolicy,
    ) -> Result<i64, RecordDefect> {
        let amount = if amount.normalize().scale() > self.minor_digits {
            match policy {
                PrecisionPolicy::Reject => {
                    return Err(RecordDefect::ExcessPrecision {
                        amount: amount.to_string(),
                        allowed: self.minor_digits,
                    })
                }
                PrecisionPolicy::RoundHalfEven => amount.round_dp_with_strategy(
                    self.minor_digits,
                    RoundingStrategy::MidpointNearestEven,
                ),
            }
        } else {
            amount
        };

        amount
            .checked_mul(Decimal::from(self.factor()))
            .and_then(|scaled| scaled.to_i64())
            .ok_or_else(|| RecordDefect::AmountOutOfRange(amount.to_string()))
    }

    /// Render integer minor units as a decimal with exactly `minor_digits` digits.
    pub fn from_minor_units(&self, minor: i64) -> Decimal {
        Decimal::new(minor, self.minor_digits)
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::usd()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}
