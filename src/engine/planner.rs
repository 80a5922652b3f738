//! Greedy extremal-pairing settlement planner.
//!
//! # Algorithm
//!
//! 1. Split members into creditors (balance > 0) and debtors (balance < 0),
//!    each held in a max-heap keyed by outstanding magnitude.
//! 2. Pop the largest creditor and the largest debtor. Equal magnitudes are
//!    broken by member id, lexicographically ascending.
//! 3. The debtor pays the creditor `min(credit, debt)`.
//! 4. Whoever still has something outstanding goes back on its heap.
//!
//! Every step settles at least one member completely, so `N` members with
//! non-zero balances need at most `N - 1` transfers.

use crate::core::balance::{NetBalance, SettlementTransaction};
use crate::core::error::SettlementError;
use crate::core::member::MemberId;
use crate::engine::netting::invariant_violation;
use log::{debug, error};
use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap};

/// A member's outstanding magnitude on one side of the book.
#[derive(Debug, PartialEq, Eq)]
struct Outstanding {
    amount: i128,
    member: MemberId,
}

impl Ord for Outstanding {
    fn cmp(&self, other: &Self) -> Ordering {
        // Larger amounts first; on ties the smaller id ranks higher.
        self.amount
            .cmp(&other.amount)
            .then_with(|| other.member.cmp(&self.member))
    }
}

impl PartialOrd for Outstanding {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compute the ordered list of transfers that zeroes every balance.
///
/// Settled members are ignored. An empty or fully settled input yields an
/// empty plan. Balances that do not sum to zero are rejected before any
/// transfer is produced.
///
/// # Examples
///
/// ```
/// use debt_settlement::core::balance::NetBalance;
/// use debt_settlement::engine::planner::plan_settlement;
///
/// let plan = plan_settlement(&[NetBalance::new("A", 50), NetBalance::new("B", -50)]).unwrap();
/// assert_eq!(plan.len(), 1);
/// assert_eq!(plan[0].from().as_str(), "B");
/// assert_eq!(plan[0].to().as_str(), "A");
/// assert_eq!(plan[0].amount(), 50);
/// ```
pub fn plan_settlement(
    balances: &[NetBalance],
) -> Result<Vec<SettlementTransaction>, SettlementError> {
    let mut seen = BTreeSet::new();
    for balance in balances {
        if !seen.insert(&balance.member) {
            error!("member {} reached the planner with two balances", balance.member);
            return Err(SettlementError::DuplicateBalance(balance.member.clone()));
        }
    }

    let imbalance: i128 = balances.iter().map(|b| i128::from(b.amount)).sum();
    if imbalance != 0 {
        return Err(invariant_violation(imbalance));
    }

    // Magnitudes are i128 so that a debt of exactly i64::MIN stays representable.
    let mut creditors = BinaryHeap::new();
    let mut debtors = BinaryHeap::new();
    for balance in balances {
        let outstanding = Outstanding {
            amount: i128::from(balance.amount).abs(),
            member: balance.member.clone(),
        };
        match balance.amount.cmp(&0) {
            Ordering::Greater => creditors.push(outstanding),
            Ordering::Less => debtors.push(outstanding),
            Ordering::Equal => {}
        }
    }

    let active = creditors.len() + debtors.len();
    let mut plan = Vec::with_capacity(active.saturating_sub(1));

    loop {
        let (mut creditor, mut debtor) = match (creditors.pop(), debtors.pop()) {
            (Some(creditor), Some(debtor)) => (creditor, debtor),
            (None, None) => break,
            (creditor, debtor) => {
                // Unreachable after the zero-sum check above.
                let left = creditor.map(|c| c.amount).unwrap_or(0)
                    - debtor.map(|d| d.amount).unwrap_or(0);
                return Err(invariant_violation(left));
            }
        };

        // Bounded by the creditor's balance, which came from an i64.
        let transfer = creditor.amount.min(debtor.amount);
        let amount = i64::try_from(transfer).map_err(|_| invariant_violation(transfer))?;
        plan.push(SettlementTransaction::new(
            debtor.member.clone(),
            creditor.member.clone(),
            amount,
        ));

        creditor.amount -= transfer;
        debtor.amount -= transfer;
        if creditor.amount > 0 {
            creditors.push(creditor);
        }
        if debtor.amount > 0 {
            debtors.push(debtor);
        }
    }

    debug!(
        "planned {} transfers for {} active members",
        plan.len(),
        active
    );
    Ok(plan)
}
