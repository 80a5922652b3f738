//! # debt-settlement
//!
//! Deterministic debt-settlement engine for shared group expenses.
//!
//! Given the expenses a group has logged, this engine computes each
//! member's net balance and a short list of payments that makes everyone
//! even. All money is handled as integer minor currency units.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: members, currency, expense records, balances
//! - **engine** — Normalizer, balance netting and the settlement planner
//! - **wire** — JSON request decoding and response rendering
//! - **simulation** — Random expense groups for benchmarks and testing

pub mod core;
pub mod engine;
pub mod simulation;
pub mod wire;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::balance::{NetBalance, SettlementTransaction};
    pub use crate::core::currency::{Currency, CurrencyCode, PrecisionPolicy};
    pub use crate::core::error::{RecordDefect, SettlementError};
    pub use crate::core::expense::ExpenseRecord;
    pub use crate::core::ledger::BalanceSheet;
    pub use crate::core::member::MemberId;
    pub use crate::engine::{EngineConfig, SettlementEngine, SettlementPlan};
    pub use crate::wire::request::SettlementRequest;
    pub use crate::wire::response::{ErrorResponse, SettlementResponse};
}
