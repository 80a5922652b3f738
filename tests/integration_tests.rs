use debt_settlement::core::currency::{Currency, PrecisionPolicy};
use debt_settlement::core::error::{RecordDefect, SettlementError};
use debt_settlement::core::expense::ExpenseRecord;
use debt_settlement::core::member::MemberId;
use debt_settlement::engine::{EngineConfig, SettlementEngine};
use debt_settlement::wire::request::SettlementRequest;
use debt_settlement::wire::response::TransferRow;
use rust_decimal_macros::dec;
use serde_json::json;

fn engine() -> SettlementEngine {
    let _ = env_logger::try_init();
    SettlementEngine::default()
}

fn request(value: serde_json::Value) -> SettlementRequest {
    serde_json::from_value(value).unwrap()
}

/// Full pipeline: wire request → records → balances → plan → wire response.
#[test]
fn weekend_trip_end_to_end() {
    let req = request(json!({
        "names": ["ana", "ben", "cleo", "dev"],
        "edges": [
            ["ana", "ben", "cleo", "dev", "ana", 120.00],
            ["ben", "cleo", "ben", 45.50],
            ["ana", "cleo", "dev", "dev", "60"],
            [["ana", "ben"], "cleo", "cleo", 10.01]
        ]
    }));

    let response = engine().handle(&req).unwrap();

    // ana: +120 - 30 - 20 - 3.34         = +66.66
    // ben: -30 + 45.50 - 22.75 - 3.34    = -10.59
    // cleo: -30 - 22.75 - 20 + 10.01 - 3.33 = -66.07
    // dev: -30 + 60 - 20                 = +10.00
    assert_eq!(
        response.transactions,
        vec![
            TransferRow("cleo".into(), "ana".into(), dec!(66.07)),
            TransferRow("ben".into(), "dev".into(), dec!(10.00)),
            TransferRow("ben".into(), "ana".into(), dec!(0.59)),
        ]
    );
    assert!(response.remainder_redistributed);
    assert_eq!(response.remainders.len(), 1);
    assert_eq!(response.remainders[0].record_index, 3);
}

#[test]
fn two_party_scenario_over_the_wire() {
    let req = request(json!({ "names": ["A", "B"], "edges": [["A", "B", "A", 1.00]] }));
    let json = engine().handle(&req).unwrap().to_json().unwrap();
    assert!(json.starts_with(r#"{"transactions":[["B","A",0.50]]"#));
}

#[test]
fn three_party_chain_collapse() {
    let plan = engine()
        .settle(&[
            ExpenseRecord::new("A", ["A", "B", "C"], 90),
            ExpenseRecord::new("B", ["A", "B", "C"], 90),
        ])
        .unwrap();

    let balances = plan.balances();
    assert_eq!(balances.position(&MemberId::new("A")), 30);
    assert_eq!(balances.position(&MemberId::new("B")), 30);
    assert_eq!(balances.position(&MemberId::new("C")), -60);

    assert!(plan.len() <= 2);
    assert_eq!(plan.total_transferred(), 60);
    for tx in plan.transactions() {
        assert_eq!(tx.from().as_str(), "C");
    }
}

#[test]
fn remainder_split_101_over_three() {
    let plan = engine()
        .settle(&[ExpenseRecord::new("P", ["A", "B", "C"], 101)])
        .unwrap();
    let balances = plan.balances();
    assert_eq!(balances.position(&MemberId::new("A")), -34);
    assert_eq!(balances.position(&MemberId::new("B")), -34);
    assert_eq!(balances.position(&MemberId::new("C")), -33);
    assert_eq!(balances.position(&MemberId::new("P")), 101);
}

#[test]
fn already_settled_group_yields_empty_plan() {
    let req = request(json!({
        "names": ["A", "B", "C"],
        "edges": [["B", "A", 25], ["A", "B", 25]]
    }));
    let response = engine().handle(&req).unwrap();
    assert!(response.transactions.is_empty());
    assert!(!response.remainder_redistributed);
}

#[test]
fn roster_only_members_do_not_appear_in_transfers() {
    let req = request(json!({
        "names": ["A", "B", "ghost"],
        "edges": [["B", "A", 5]]
    }));
    let response = engine().handle(&req).unwrap();
    assert_eq!(response.transactions.len(), 1);
    assert!(response.transactions.iter().all(|t| t.0 != "ghost" && t.1 != "ghost"));
}

#[test]
fn invalid_record_rejects_the_whole_request() {
    let req = request(json!({
        "edges": [
            ["A", "B", "A", 10],
            ["A", "A", "B", 10],
            ["A", "B", -3]
        ]
    }));
    let err = engine().handle(&req).unwrap_err();
    assert_eq!(
        err,
        SettlementError::InvalidRecord {
            index: 1,
            defect: RecordDefect::DuplicateBeneficiary(MemberId::new("A")),
        }
    );
    assert!(err.is_client_error());
}

#[test]
fn non_positive_amount_is_rejected() {
    let req = request(json!({ "edges": [["A", "B", 0]] }));
    let err = engine().handle(&req).unwrap_err();
    assert_eq!(
        err,
        SettlementError::invalid_record(0, RecordDefect::NonPositiveAmount(0))
    );
}

#[test]
fn over_precise_amount_follows_policy() {
    let req = request(json!({ "edges": [["A", "B", "B", 0.015]] }));

    let strict = engine().handle(&req).unwrap_err();
    assert!(matches!(
        strict,
        SettlementError::InvalidRecord { defect: RecordDefect::ExcessPrecision { .. }, .. }
    ));

    let lenient = SettlementEngine::new(EngineConfig {
        currency: Currency::usd(),
        precision: PrecisionPolicy::RoundHalfEven,
    });
    let response = lenient.handle(&req).unwrap();
    // 0.015 rounds to 0.02, one cent each for A and B.
    assert_eq!(
        response.transactions,
        vec![TransferRow("A".into(), "B".into(), dec!(0.01))]
    );
}

#[test]
fn identical_requests_give_identical_bytes() {
    let req = request(json!({
        "names": ["w", "x", "y", "z"],
        "edges": [
            ["w", "x", "y", "z", "w", 100],
            ["x", "y", "x", 33.33],
            ["z", "w", "y", 17]
        ]
    }));
    let first = engine().handle(&req).unwrap().to_json().unwrap();
    let second = engine().handle(&req).unwrap().to_json().unwrap();
    assert_eq!(first, second);
}

#[test]
fn plan_serializes() {
    let plan = engine()
        .settle(&[ExpenseRecord::new("A", ["A", "B"], 100)])
        .unwrap();
    let json = serde_json::to_string(&plan).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(parsed.get("balances").is_some());
    assert!(parsed.get("transactions").is_some());
    assert_eq!(parsed["currency"]["code"], "USD");
}
