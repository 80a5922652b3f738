use crate::core::balance::NetBalance;
use crate::core::error::SettlementError;
use crate::core::member::MemberId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Running net position of every member of one group, in minor units.
///
/// A positive balance means the member is owed (net creditor).
/// A negative balance means the member owes (net debtor).
///
/// Positions are kept in a `BTreeMap` so every listing comes out in member
/// order, which keeps the balance report reproducible run to run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    positions: BTreeMap<MemberId, i64>,
}

impl BalanceSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to a member's position.
    pub fn apply(&mut self, member: &MemberId, amount: i64) -> Result<(), SettlementError> {
        let position = self.positions.entry(member.clone()).or_insert(0);
        *position = position
            .checked_add(amount)
            .ok_or(SettlementError::AmountOverflow)?;
        Ok(())
    }

    /// Make sure `member` is listed, with a zero position if it had none.
    pub fn register(&mut self, member: &MemberId) {
        self.positions.entry(member.clone()).or_insert(0);
    }

    pub fn position(&self, member: &MemberId) -> i64 {
        self.positions.get(member).copied().unwrap_or(0)
    }

    pub fn contains(&self, member: &MemberId) -> bool {
        self.positions.contains_key(member)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// One balance per member, including settled members, in member order.
    pub fn balances(&self) -> Vec<NetBalance> {
        self.positions
            .iter()
            .map(|(member, &amount)| NetBalance::new(member.clone(), amount))
            .collect()
    }

    /// Balances that still need to pay or receive.
    pub fn active_balances(&self) -> Vec<NetBalance> {
        self.positions
            .iter()
            .filter(|(_, &amount)| amount != 0)
            .map(|(member, &amount)| NetBalance::new(member.clone(), amount))
            .collect()
    }

    pub fn creditors(&self) -> impl Iterator<Item = (&MemberId, i64)> {
        self.positions
            .iter()
            .filter(|(_, &amount)| amount > 0)
            .map(|(member, &amount)| (member, amount))
    }

    pub fn debtors(&self) -> impl Iterator<Item = (&MemberId, i64)> {
        self.positions
            .iter()
            .filter(|(_, &amount)| amount < 0)
            .map(|(member, &amount)| (member, amount))
    }

    /// Sum of all positions. Zero for every correctly built sheet.
    pub fn imbalance(&self) -> i128 {
        self.positions.values().map(|&v| i128::from(v)).sum()
    }

    pub fn is_balanced(&self) -> bool {
        self.imbalance() == 0
    }

    /// Total amount owed to creditors (equal to the total owed by debtors).
    pub fn total_outstanding(&self) -> i128 {
        self.creditors().map(|(_, amount)| i128::from(amount)).sum()
    }
}
