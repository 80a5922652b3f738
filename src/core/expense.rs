use crate::core::error::RecordDefect;
use crate::core::member::MemberId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A shared expense: `payer` fronted `amount` minor units, split evenly
/// across `beneficiaries` in their declared order.
///
/// The payer may or may not be one of the beneficiaries. Beneficiary order
/// matters: it decides who absorbs the indivisible remainder of the split.
///
/// # Examples
///
/// ```
/// use debt_settlement::core::expense::ExpenseRecord;
///
/// let dinner = ExpenseRecord::new("ana", ["ana", "ben", "cleo"], 9000);
/// assert!(dinner.validate().is_ok());
/// assert_eq!(dinner.beneficiaries().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// Member who paid.
    payer: MemberId,
    /// Members sharing the cost, in declared order.
    beneficiaries: Vec<MemberId>,
    /// Amount in minor currency units.
    amount: i64,
}

impl ExpenseRecord {
    /// Create a record. Validation is deferred to [`ExpenseRecord::validate`]
    /// so that a whole request can be decoded before any record is rejected.
    pub fn new<P, I, B>(payer: P, beneficiaries: I, amount: i64) -> Self
    where
        P: Into<MemberId>,
        I: IntoIterator<Item = B>,
        B: Into<MemberId>,
    {
        Self {
            payer: payer.into(),
            beneficiaries: beneficiaries.into_iter().map(Into::into).collect(),
            amount,
        }
    }

    pub fn payer(&self) -> &MemberId {
        &self.payer
    }

    pub fn beneficiaries(&self) -> &[MemberId] {
        &self.beneficiaries
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// Check the record invariants: positive amount, at least one
    /// beneficiary, no beneficiary listed twice.
    pub fn validate(&self) -> Result<(), RecordDefect> {
        if self.amount <= 0 {
            return Err(RecordDefect::NonPositiveAmount(self.amount));
        }
        if self.beneficiaries.is_empty() {
            return Err(RecordDefect::NoBeneficiaries);
        }
        let mut seen = HashSet::with_capacity(self.beneficiaries.len());
        for member in &self.beneficiaries {
            if !seen.insert(member) {
                return Err(RecordDefect::DuplicateBeneficiary(member.clone()));
            }
        }
        Ok(())
    }

    /// Every member this record touches, payer first.
    pub fn members(&self) -> impl Iterator<Item = &MemberId> {
        std::iter::once(&self.payer).chain(self.beneficiaries.iter())
    }
}
