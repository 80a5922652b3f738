use crate::core::member::MemberId;
use thiserror::Error;

/// Why a single expense record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordDefect {
    #[error("amount must be positive, got {0} minor units")]
    NonPositiveAmount(i64),
    #[error("record has no beneficiaries")]
    NoBeneficiaries,
    #[error("beneficiary {0} is listed more than once")]
    DuplicateBeneficiary(MemberId),
    #[error("amount {amount} has more than {allowed} fractional digits")]
    ExcessPrecision { amount: String, allowed: u32 },
    #[error("amount {0} does not fit in minor units")]
    AmountOutOfRange(String),
    #[error("record has no payer")]
    MissingPayer,
    #[error("edge needs at least one beneficiary, a payer and an amount, got {0} fields")]
    TooFewFields(usize),
    #[error("field {position} is not a member name")]
    NotAMember { position: usize },
    #[error("last field is not a decimal amount: {0}")]
    NotAnAmount(String),
}

/// Failure of a settlement computation.
///
/// Every variant aborts the whole request: no partial plan is ever produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    /// Client error: the record at `index` is malformed.
    #[error("invalid record #{index}: {defect}")]
    InvalidRecord { index: usize, defect: RecordDefect },

    /// Internal defect: balances do not sum to zero.
    #[error("net balances sum to {imbalance} minor units instead of zero")]
    InvariantViolation { imbalance: i64 },

    /// Internal defect: the planner received two balances for one member.
    #[error("member {0} has more than one net balance")]
    DuplicateBalance(MemberId),

    #[error("minor-unit arithmetic overflowed while netting balances")]
    AmountOverflow,

    #[error("malformed settlement request: {0}")]
    MalformedRequest(String),
}

impl SettlementError {
    pub fn invalid_record(index: usize, defect: RecordDefect) -> Self {
        Self::InvalidRecord { index, defect }
    }

    /// True when the failure is the caller's fault rather than an engine defect.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRecord { .. } | Self::MalformedRequest(_) | Self::AmountOverflow
        )
    }
}
