//! Turns expense records into signed per-member contributions.
//!
//! A record of `A` minor units split across `k` beneficiaries charges each
//! beneficiary `A / k`; the `A % k` leftover units go one each to the first
//! beneficiaries in declared order. The payer is credited the full `A`.

use crate::core::error::SettlementError;
use crate::core::expense::ExpenseRecord;
use crate::core::member::MemberId;
use log::debug;
use serde::{Deserialize, Serialize};

/// Who absorbed the indivisible part of an even split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemainderAllocation {
    /// Position of the record in the submitted sequence.
    pub record_index: usize,
    /// Leftover minor units, `0 < remainder < beneficiaries`.
    pub remainder: i64,
    /// Beneficiaries charged one extra minor unit each.
    pub recipients: Vec<MemberId>,
}

/// Signed contributions of a single record, in first-touch member order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordContribution {
    entries: Vec<(MemberId, i64)>,
    remainder: Option<RemainderAllocation>,
}

impl RecordContribution {
    pub fn entries(&self) -> &[(MemberId, i64)] {
        &self.entries
    }

    pub fn remainder(&self) -> Option<&RemainderAllocation> {
        self.remainder.as_ref()
    }

    /// Contribution of one member; zero when the record does not touch it.
    pub fn contribution(&self, member: &MemberId) -> i64 {
        self.entries
            .iter()
            .find(|(m, _)| m == member)
            .map(|(_, amount)| *amount)
            .unwrap_or(0)
    }

    fn add(&mut self, member: &MemberId, amount: i64) {
        match self.entries.iter_mut().find(|(m, _)| m == member) {
            Some((_, total)) => *total += amount,
            None => self.entries.push((member.clone(), amount)),
        }
    }
}

/// Share charged to each beneficiary, in declared order.
///
/// ```
/// use debt_settlement::engine::normalizer::split_evenly;
///
/// assert_eq!(split_evenly(101, 3), vec![34, 34, 33]);
/// ```
pub fn split_evenly(amount: i64, parts: usize) -> Vec<i64> {
    if parts == 0 {
        return Vec::new();
    }
    let k = parts as i64;
    let base = amount / k;
    let remainder = (amount % k) as usize;
    (0..parts)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

/// Normalize one record. `index` is only used to identify the record in
/// errors and remainder notes.
pub fn normalize_record(
    index: usize,
    record: &ExpenseRecord,
) -> Result<RecordContribution, SettlementError> {
    record
        .validate()
        .map_err(|defect| SettlementError::invalid_record(index, defect))?;

    let beneficiaries = record.beneficiaries();
    let shares = split_evenly(record.amount(), beneficiaries.len());

    let mut contribution = RecordContribution {
        entries: Vec::with_capacity(beneficiaries.len() + 1),
        remainder: None,
    };
    // Shares never exceed the amount, so these sums cannot overflow.
    contribution.add(record.payer(), record.amount());
    for (member, share) in beneficiaries.iter().zip(&shares) {
        contribution.add(member, -share);
    }

    let remainder = record.amount() % beneficiaries.len() as i64;
    if remainder > 0 {
        contribution.remainder = Some(RemainderAllocation {
            record_index: index,
            remainder,
            recipients: beneficiaries[..remainder as usize].to_vec(),
        });
    }

    Ok(contribution)
}

/// Normalize every record of a group. Fails on the first invalid record;
/// no contributions are returned in that case.
pub fn normalize(records: &[ExpenseRecord]) -> Result<Vec<RecordContribution>, SettlementError> {
    let contributions = records
        .iter()
        .enumerate()
        .map(|(index, record)| normalize_record(index, record))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "normalized {} records, {} with split remainders",
        contributions.len(),
        contributions.iter().filter(|c| c.remainder.is_some()).count()
    );
    Ok(contributions)
}
