pub mod config;
pub mod engine;
pub mod humanize;
pub mod ledger;
pub mod observability;
pub mod voucher;

pub use engine::{Engine, EngineError};
