//! bartrader: intraday bar aggregation and bracket-order signal engine.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`]. [`worker`] runs one engine per
//! instrument on a tokio task.

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
pub mod logging;
pub mod worker;
