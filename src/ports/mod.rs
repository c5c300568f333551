//! Port traits at the edges of the domain.

pub mod clock_port;
pub mod config_port;
pub mod execution_port;
pub mod feed_port;
