//! Order lifecycle: turns an entry decision into a bracket group and submits
//! it.
//!
//! The manager submits once per decision and records the position as open.
//! It does not track fills or cancels; clearing the position is the job of
//! whoever receives the broker's exit notification.

use tracing::{error, info};

use super::error::BarTraderError;
use super::order::{oca_group_name, round_to_cents, Action, Order, OrderGroup, OrderType};
use super::session::SessionState;
use super::signal::EntryOrder;
use super::strategy::StopSpec;
use crate::ports::execution_port::ExecutionPort;

/// Monotonic order-id source, seeded from the broker at connection time.
/// Ids are never handed out twice within a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderIdCounter {
    next: i64,
}

impl OrderIdCounter {
    pub fn seeded(next_valid_id: i64) -> Self {
        OrderIdCounter {
            next: next_valid_id,
        }
    }

    pub fn peek(&self) -> i64 {
        self.next
    }

    /// Reserve `count` consecutive ids and return the first.
    pub fn reserve(&mut self, count: i64) -> i64 {
        let first = self.next;
        self.next += count;
        first
    }
}

/// Build the entry/target/stop group for `entry`, using ids
/// `entry_id..entry_id + 3`.
pub fn build_bracket(symbol: &str, entry_id: i64, entry: &EntryOrder) -> OrderGroup {
    let oca_group = oca_group_name(entry_id);
    let exit_action = Action::Buy.opposite();
    let stop_type = match entry.stop {
        StopSpec::Fixed { price } => OrderType::Stop {
            price: round_to_cents(price),
        },
        StopSpec::Trailing { percent } => OrderType::TrailingStop { percent },
    };

    OrderGroup {
        symbol: symbol.to_string(),
        oca_group: oca_group.clone(),
        entry: Order {
            order_id: entry_id,
            parent_id: None,
            action: Action::Buy,
            order_type: OrderType::Market,
            quantity: entry.quantity,
            oca_group: oca_group.clone(),
            transmit: false,
        },
        target: Order {
            order_id: entry_id + 1,
            parent_id: Some(entry_id),
            action: exit_action,
            order_type: OrderType::Limit {
                price: round_to_cents(entry.target_price),
            },
            quantity: entry.quantity,
            oca_group: oca_group.clone(),
            transmit: false,
        },
        stop: Order {
            order_id: entry_id + 2,
            parent_id: Some(entry_id),
            action: exit_action,
            order_type: stop_type,
            quantity: entry.quantity,
            oca_group,
            transmit: true,
        },
    }
}

#[derive(Debug, Clone)]
pub struct OrderLifecycleManager {
    symbol: String,
    ids: OrderIdCounter,
}

impl OrderLifecycleManager {
    pub fn new(symbol: &str, ids: OrderIdCounter) -> Self {
        OrderLifecycleManager {
            symbol: symbol.to_string(),
            ids,
        }
    }

    /// Seed the id counter from the broker's next valid id.
    pub fn connect(symbol: &str, port: &mut dyn ExecutionPort) -> Result<Self, BarTraderError> {
        let next = port.next_order_id()?;
        info!(symbol, next_order_id = next, "order id counter seeded");
        Ok(Self::new(symbol, OrderIdCounter::seeded(next)))
    }

    pub fn next_order_id(&self) -> i64 {
        self.ids.peek()
    }

    /// Submit a bracket for `entry`.
    ///
    /// Refuses with `InvariantViolation` when a position is already open or the
    /// daily cap is used up; the signal gating should make both unreachable.
    /// Otherwise the group is handed to `port` and the session is marked as
    /// holding a position whether or not the port accepted it; a port failure
    /// comes back as `Execution` with the state already committed.
    pub fn submit(
        &mut self,
        entry: &EntryOrder,
        state: &mut SessionState,
        max_trades_per_day: Option<u32>,
        port: &mut dyn ExecutionPort,
    ) -> Result<OrderGroup, BarTraderError> {
        if state.position_active {
            return Err(BarTraderError::InvariantViolation {
                reason: "entry submitted while a position is active".to_string(),
            });
        }
        if state.cap_reached(max_trades_per_day) {
            return Err(BarTraderError::InvariantViolation {
                reason: format!(
                    "entry submitted after daily cap of {} trades",
                    state.trades_today
                ),
            });
        }

        let entry_id = self.ids.reserve(3);
        let group = build_bracket(&self.symbol, entry_id, entry);
        let outcome = port.submit_order_group(&group);
        state.record_submission();

        match outcome {
            Ok(()) => {
                info!(
                    symbol = %self.symbol,
                    oca_group = %group.oca_group,
                    quantity = entry.quantity,
                    trades_today = state.trades_today,
                    "placed bracket order"
                );
                Ok(group)
            }
            Err(e) => {
                error!(oca_group = %group.oca_group, error = %e, "order group submission failed");
                Err(BarTraderError::Execution {
                    oca_group: group.oca_group,
                    reason: e.to_string(),
                })
            }
        }
    }
}
