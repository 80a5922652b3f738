//! Random expense groups for benchmarks, the CLI and load testing.

use crate::core::expense::ExpenseRecord;
use crate::core::member::MemberId;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Shape of a generated group.
#[derive(Debug, Clone)]
pub struct GroupConfig {
    /// Number of members in the group.
    pub member_count: usize,
    /// Number of expense records.
    pub expense_count: usize,
    /// Minimum expense amount in minor units.
    pub min_amount: i64,
    /// Maximum expense amount in minor units (inclusive).
    pub max_amount: i64,
    /// Upper bound on beneficiaries per expense.
    pub max_beneficiaries: usize,
    /// Seed for reproducible groups; `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            member_count: 6,
            expense_count: 20,
            min_amount: 100,
            max_amount: 50_000,
            max_beneficiaries: 6,
            seed: None,
        }
    }
}

/// Member names used by generated groups: `MEMBER-000`, `MEMBER-001`, ...
pub fn member_names(count: usize) -> Vec<MemberId> {
    (0..count)
        .map(|i| MemberId::new(format!("MEMBER-{:03}", i)))
        .collect()
}

/// Generate a random, valid set of expense records.
pub fn generate_random_group(config: &GroupConfig) -> Vec<ExpenseRecord> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let members = member_names(config.member_count);
    if members.is_empty() {
        return Vec::new();
    }

    let min_amount = config.min_amount.max(1);
    let max_amount = config.max_amount.max(min_amount);
    let max_beneficiaries = config.max_beneficiaries.clamp(1, members.len());

    (0..config.expense_count)
        .map(|_| {
            let payer = members[rng.gen_range(0..members.len())].clone();
            let k = rng.gen_range(1..=max_beneficiaries);
            let beneficiaries: Vec<MemberId> =
                members.choose_multiple(&mut rng, k).cloned().collect();
            let amount = rng.gen_range(min_amount..=max_amount);
            ExpenseRecord::new(payer, beneficiaries, amount)
        })
        .collect()
}
