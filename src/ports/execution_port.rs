//! Execution boundary port: order transmission to the broker.

use crate::domain::error::BarTraderError;
use crate::domain::order::OrderGroup;

pub trait ExecutionPort {
    /// Next order id the broker will accept. Queried once at connection time.
    fn next_order_id(&mut self) -> Result<i64, BarTraderError>;

    /// Transmit all legs of `group` as one unit. Retrying is the
    /// implementation's business.
    fn submit_order_group(&mut self, group: &OrderGroup) -> Result<(), BarTraderError>;
}
