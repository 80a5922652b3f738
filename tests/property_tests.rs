use debt_settlement::core::expense::ExpenseRecord;
use debt_settlement::core::member::MemberId;
use debt_settlement::engine::normalizer::{normalize_record, split_evenly};
use debt_settlement::engine::SettlementEngine;
use debt_settlement::wire::request::SettlementRequest;
use debt_settlement::wire::response::SettlementResponse;
use proptest::prelude::*;
use std::collections::HashMap;

const POOL: [&str; 7] = ["A", "B", "C", "D", "E", "F", "G"];

/// Generate a valid expense record over a small member pool.
fn arb_record() -> impl Strategy<Value = ExpenseRecord> {
    (
        prop::sample::select(POOL.to_vec()),
        prop::sample::subsequence(POOL.to_vec(), 1..=POOL.len()).prop_shuffle(),
        1i64..10_000_000i64,
    )
        .prop_map(|(payer, beneficiaries, amount)| {
            ExpenseRecord::new(payer, beneficiaries, amount)
        })
}

/// Generate a group of 1..40 records.
fn arb_group() -> impl Strategy<Value = Vec<ExpenseRecord>> {
    prop::collection::vec(arb_record(), 1..40)
}

proptest! {
    // ===================================================================
    // INVARIANT 1: Net balances always sum to exactly zero.
    // ===================================================================
    #[test]
    fn balances_sum_to_zero(records in arb_group()) {
        let plan = SettlementEngine::default().settle(&records).unwrap();
        prop_assert!(plan.balances().is_balanced());
    }

    // ===================================================================
    // INVARIANT 2: Transfers settle every balance exactly.
    //
    // What each member receives minus what it pays equals its balance.
    // ===================================================================
    #[test]
    fn transfers_clear_every_balance(records in arb_group()) {
        let plan = SettlementEngine::default().settle(&records).unwrap();
        let mut flow: HashMap<MemberId, i64> = HashMap::new();
        for tx in plan.transactions() {
            *flow.entry(tx.to().clone()).or_insert(0) += tx.amount();
            *flow.entry(tx.from().clone()).or_insert(0) -= tx.amount();
        }
        for balance in plan.balances().balances() {
            prop_assert_eq!(
                flow.get(&balance.member).copied().unwrap_or(0),
                balance.amount,
                "member {} not settled",
                balance.member
            );
        }
    }

    // ===================================================================
    // INVARIANT 3: No member ever pays itself, no zero transfers.
    // ===================================================================
    #[test]
    fn no_self_payment(records in arb_group()) {
        let plan = SettlementEngine::default().settle(&records).unwrap();
        for tx in plan.transactions() {
            prop_assert_ne!(tx.from(), tx.to());
            prop_assert!(tx.amount() > 0);
        }
    }

    // ===================================================================
    // INVARIANT 4: At most N - 1 transfers for N unsettled members.
    // ===================================================================
    #[test]
    fn at_most_n_minus_one_transfers(records in arb_group()) {
        let plan = SettlementEngine::default().settle(&records).unwrap();
        let active = plan.balances().active_balances().len();
        prop_assert!(plan.len() <= active.saturating_sub(1));
    }

    // ===================================================================
    // INVARIANT 5: Settlement is deterministic, byte for byte.
    // ===================================================================
    #[test]
    fn settlement_is_deterministic(records in arb_group()) {
        let engine = SettlementEngine::default();
        let first = SettlementResponse::render(&engine.settle(&records).unwrap());
        let second = SettlementResponse::render(&engine.settle(&records).unwrap());
        prop_assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }

    // ===================================================================
    // INVARIANT 6: Even splits differ by at most one minor unit, the
    // larger shares come first and the shares add up to the amount.
    // ===================================================================
    #[test]
    fn split_is_fair_and_ordered(amount in 1i64..1_000_000i64, parts in 1usize..20) {
        let shares = split_evenly(amount, parts);
        prop_assert_eq!(shares.iter().sum::<i64>(), amount);
        let max = *shares.iter().max().unwrap();
        let min = *shares.iter().min().unwrap();
        prop_assert!(max - min <= 1);
        prop_assert!(shares.windows(2).all(|w| w[0] >= w[1]));
    }

    // ===================================================================
    // INVARIANT 7: Each record nets to zero on its own.
    // ===================================================================
    #[test]
    fn record_contribution_nets_to_zero(record in arb_record()) {
        let contribution = normalize_record(0, &record).unwrap();
        let total: i64 = contribution.entries().iter().map(|(_, v)| v).sum();
        prop_assert_eq!(total, 0);
    }

    // ===================================================================
    // INVARIANT 8: The wire encoding preserves the computation.
    // ===================================================================
    #[test]
    fn wire_request_matches_direct_settlement(records in arb_group()) {
        let engine = SettlementEngine::default();
        let currency = engine.config().currency.clone();
        let request = SettlementRequest::from_records(Vec::new(), &records, &currency);
        let json = serde_json::to_string(&request).unwrap();
        let decoded = SettlementRequest::from_json(&json).unwrap();

        let via_wire = engine.handle(&decoded).unwrap();
        let direct = SettlementResponse::render(&engine.settle(&records).unwrap());
        prop_assert_eq!(via_wire, direct);
    }
}
