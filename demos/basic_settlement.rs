//! A weekend trip settled end to end.
//!
//! Shows the balances each member ends up with and the transfers that
//! clear them, then the JSON response a client would receive.

use debt_settlement::prelude::*;

fn main() {
    println!("╔══════════════════════════════════════════════╗");
    println!("║  debt-settlement: Weekend Trip Example       ║");
    println!("╚══════════════════════════════════════════════╝\n");

    let engine = SettlementEngine::default();

    // Amounts are in cents.
    let records = vec![
        ExpenseRecord::new("ana", ["ana", "ben", "cleo", "dev"], 24_000), // cabin
        ExpenseRecord::new("ben", ["ana", "ben", "cleo", "dev"], 8_650),  // groceries
        ExpenseRecord::new("cleo", ["ben", "cleo"], 3_001),               // kayak rental
        ExpenseRecord::new("dev", ["ana", "cleo", "dev"], 6_000),         // fuel
    ];

    let plan = match engine.settle(&records) {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("settlement failed: {}", e);
            return;
        }
    };

    println!("{}", plan);

    println!("━━━ Response ━━━\n");
    match SettlementResponse::render(&plan).to_json_pretty() {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("could not encode response: {}", e),
    }
}
