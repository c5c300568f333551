//! Concrete adapter implementations for ports.

pub mod clock;
pub mod csv_feed_adapter;
pub mod file_config_adapter;
pub mod paper_execution_adapter;
