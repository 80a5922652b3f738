use crate::core::member::MemberId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A member's net position in minor units.
///
/// Positive means the member is owed money (creditor), negative means the
/// member owes money (debtor), zero means settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetBalance {
    pub member: MemberId,
    pub amount: i64,
}

impl NetBalance {
    pub fn new(member: impl Into<MemberId>, amount: i64) -> Self {
        Self {
            member: member.into(),
            amount,
        }
    }

    pub fn is_creditor(&self) -> bool {
        self.amount > 0
    }

    pub fn is_debtor(&self) -> bool {
        self.amount < 0
    }

    pub fn is_settled(&self) -> bool {
        self.amount == 0
    }
}

/// An instruction: `from` pays `to` the given amount of minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementTransaction {
    from: MemberId,
    to: MemberId,
    amount: i64,
}

impl SettlementTransaction {
    /// # Panics
    ///
    /// Panics on a self-payment or a non-positive amount. Both indicate a
    /// planner defect, never bad input.
    pub fn new(from: MemberId, to: MemberId, amount: i64) -> Self {
        assert_ne!(from, to, "settlement transaction cannot pay oneself");
        assert!(
            amount > 0,
            "settlement amount must be positive, got {}",
            amount
        );
        Self { from, to, amount }
    }

    pub fn from(&self) -> &MemberId {
        &self.from
    }

    pub fn to(&self) -> &MemberId {
        &self.to
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }
}

impl fmt::Display for SettlementTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.from, self.to, self.amount)
    }
}
