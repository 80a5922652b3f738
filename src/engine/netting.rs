use crate::core::error::SettlementError;
use crate::core::ledger::BalanceSheet;
use crate::core::member::MemberId;
use crate::engine::normalizer::RecordContribution;
use log::{debug, error, warn};

/// Aggregate per-record contributions into one balance per member.
///
/// The resulting sheet must sum to exactly zero. Integer arithmetic makes
/// any other outcome an engine defect, so it is reported as
/// [`SettlementError::InvariantViolation`] and the computation stops.
pub fn net_balances(contributions: &[RecordContribution]) -> Result<BalanceSheet, SettlementError> {
    let mut sheet = BalanceSheet::new();
    for contribution in contributions {
        for (member, amount) in contribution.entries() {
            sheet.apply(member, *amount)?;
        }
    }
    check_balanced(&sheet)?;

    debug!(
        "netted {} members, {} outstanding minor units",
        sheet.len(),
        sheet.total_outstanding()
    );
    Ok(sheet)
}

/// Fail with `InvariantViolation` unless the sheet sums to zero.
pub fn check_balanced(sheet: &BalanceSheet) -> Result<(), SettlementError> {
    match sheet.imbalance() {
        0 => Ok(()),
        imbalance => Err(invariant_violation(imbalance)),
    }
}

/// Log an out-of-balance condition and build the matching error.
pub(crate) fn invariant_violation(imbalance: i128) -> SettlementError {
    error!("balances out of balance by {} minor units", imbalance);
    let imbalance = i64::try_from(imbalance).unwrap_or(if imbalance > 0 {
        i64::MAX
    } else {
        i64::MIN
    });
    SettlementError::InvariantViolation { imbalance }
}

/// Add known members without records as settled, and flag record members
/// the roster does not mention. An empty roster is ignored.
pub fn apply_roster(sheet: &mut BalanceSheet, roster: &[MemberId]) {
    if roster.is_empty() {
        return;
    }
    for balance in sheet.balances() {
        if !roster.contains(&balance.member) {
            warn!("member {} appears in records but not in the roster", balance.member);
        }
    }
    for member in roster {
        sheet.register(member);
    }
}
