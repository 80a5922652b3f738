pub mod balance;
pub mod currency;
pub mod error;
pub mod expense;
pub mod ledger;
pub mod member;
