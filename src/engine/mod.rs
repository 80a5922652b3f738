//! The settlement pipeline: records → contributions → balances → plan.
//!
//! Each call builds fresh data and holds no state between calls, so one
//! [`SettlementEngine`] can serve concurrent requests for different groups.

pub mod netting;
pub mod normalizer;
pub mod planner;

use crate::core::balance::SettlementTransaction;
use crate::core::currency::{Currency, PrecisionPolicy};
use crate::core::error::SettlementError;
use crate::core::expense::ExpenseRecord;
use crate::core::ledger::BalanceSheet;
use crate::core::member::MemberId;
use crate::wire::request::SettlementRequest;
use crate::wire::response::SettlementResponse;
use log::{debug, warn};
use normalizer::RemainderAllocation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Settings supplied by the host service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Currency every record of a group is denominated in.
    pub currency: Currency,
    /// Handling of request amounts finer than the currency's minor unit.
    pub precision: PrecisionPolicy,
}

/// Settlement of one group: the balances and the transfers that clear them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementPlan {
    currency: Currency,
    balances: BalanceSheet,
    transactions: Vec<SettlementTransaction>,
    remainders: Vec<RemainderAllocation>,
    gross_expenses: i128,
}

impl SettlementPlan {
    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Net balance of every member, settled members included.
    pub fn balances(&self) -> &BalanceSheet {
        &self.balances
    }

    /// Transfers in the order the planner produced them.
    pub fn transactions(&self) -> &[SettlementTransaction] {
        &self.transactions
    }

    /// Records whose even split left indivisible minor units.
    pub fn remainders(&self) -> &[RemainderAllocation] {
        &self.remainders
    }

    pub fn remainder_redistributed(&self) -> bool {
        !self.remainders.is_empty()
    }

    /// Sum of all expense amounts, in minor units.
    pub fn gross_expenses(&self) -> i128 {
        self.gross_expenses
    }

    /// Sum of all planned transfers, in minor units.
    pub fn total_transferred(&self) -> i128 {
        self.transactions
            .iter()
            .map(|t| i128::from(t.amount()))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }
}

impl fmt::Display for SettlementPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let money = |minor: i64| self.currency.from_minor_units(minor);

        writeln!(f, "=== Settlement Plan ({}) ===", self.currency)?;
        writeln!(f, "Members:        {}", self.balances.len())?;
        writeln!(f, "Transfers:      {}", self.transactions.len())?;
        writeln!(f, "Remainders:     {}", self.remainders.len())?;

        writeln!(f, "\n--- Balances ---")?;
        for balance in self.balances.balances() {
            let status = if balance.is_creditor() {
                "OWED"
            } else if balance.is_debtor() {
                "OWES"
            } else {
                "SETTLED"
            };
            writeln!(
                f,
                "  {:<20} {:>14}  [{}]",
                balance.member,
                money(balance.amount),
                status
            )?;
        }

        writeln!(f, "\n--- Transfers ---")?;
        if self.transactions.is_empty() {
            writeln!(f, "  Everyone is settled.")?;
        }
        for tx in &self.transactions {
            writeln!(f, "  {} pays {}: {}", tx.from(), tx.to(), money(tx.amount()))?;
        }
        Ok(())
    }
}

/// Runs the normalizer, the netter and the planner for one group at a time.
///
/// # Examples
///
/// ```
/// use debt_settlement::prelude::*;
///
/// let engine = SettlementEngine::default();
/// let plan = engine
///     .settle(&[ExpenseRecord::new("A", ["A", "B"], 100)])
///     .unwrap();
///
/// assert_eq!(plan.len(), 1);
/// assert_eq!(plan.transactions()[0].from().as_str(), "B");
/// assert_eq!(plan.transactions()[0].amount(), 50);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SettlementEngine {
    config: EngineConfig,
}

impl SettlementEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Settle a group given its records in minor units.
    pub fn settle(&self, records: &[ExpenseRecord]) -> Result<SettlementPlan, SettlementError> {
        self.settle_with_roster(records, &[])
    }

    /// Like [`settle`](Self::settle), also listing roster members that have
    /// no records as settled.
    pub fn settle_with_roster(
        &self,
        records: &[ExpenseRecord],
        roster: &[MemberId],
    ) -> Result<SettlementPlan, SettlementError> {
        let contributions = normalizer::normalize(records)?;
        let mut balances = netting::net_balances(&contributions)?;
        netting::apply_roster(&mut balances, roster);

        let transactions = planner::plan_settlement(&balances.active_balances())?;

        let remainders = contributions
            .iter()
            .filter_map(|c| c.remainder().cloned())
            .collect();
        let gross_expenses = records.iter().map(|r| i128::from(r.amount())).sum();

        Ok(SettlementPlan {
            currency: self.config.currency.clone(),
            balances,
            transactions,
            remainders,
            gross_expenses,
        })
    }

    /// Decode a wire request, settle it and render the wire response.
    pub fn handle(
        &self,
        request: &SettlementRequest,
    ) -> Result<SettlementResponse, SettlementError> {
        let records = request.to_records(&self.config.currency, self.config.precision)?;
        debug!(
            "settling {} records for {} named members",
            records.len(),
            request.names.len()
        );

        let roster: Vec<MemberId> = request.names.iter().map(MemberId::new).collect();
        let plan = self.settle_with_roster(&records, &roster).map_err(|e| {
            if e.is_client_error() {
                warn!("rejected settlement request: {}", e);
            }
            e
        })?;
        Ok(SettlementResponse::render(&plan))
    }
}
