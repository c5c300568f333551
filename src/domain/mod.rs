//! Core domain types and logic.

pub mod ohlcv;
pub mod history;
pub mod bar_builder;
pub mod indicator;
pub mod session_clock;
pub mod session;
pub mod timezone;
pub mod strategy;
pub mod signal;
pub mod order;
pub mod order_manager;
pub mod config;
pub mod config_validation;
pub mod trader;
pub mod error;
