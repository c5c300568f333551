//! Bracket order groups handed to the execution boundary.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Buy,
    Sell,
}

impl Action {
    pub fn opposite(self) -> Self {
        match self {
            Action::Buy => Action::Sell,
            Action::Sell => Action::Buy,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderType {
    Market,
    Limit { price: f64 },
    Stop { price: f64 },
    TrailingStop { percent: f64 },
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Market => write!(f, "MKT"),
            OrderType::Limit { price } => write!(f, "LMT {:.2}", price),
            OrderType::Stop { price } => write!(f, "STP {:.2}", price),
            OrderType::TrailingStop { percent } => write!(f, "TRAIL {}%", percent),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub order_id: i64,
    pub parent_id: Option<i64>,
    pub action: Action,
    pub order_type: OrderType,
    pub quantity: u32,
    pub oca_group: String,
    /// Only the last leg of a group transmits; earlier legs are held until it
    /// arrives.
    pub transmit: bool,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {} x{} [{}]",
            self.order_id, self.action, self.order_type, self.quantity, self.oca_group
        )
    }
}

/// Entry, profit target and stop linked as one one-cancels-all group.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderGroup {
    pub symbol: String,
    pub oca_group: String,
    pub entry: Order,
    pub target: Order,
    pub stop: Order,
}

impl OrderGroup {
    /// Legs in transmission order.
    pub fn legs(&self) -> [&Order; 3] {
        [&self.entry, &self.target, &self.stop]
    }

    pub fn entry_id(&self) -> i64 {
        self.entry.order_id
    }
}

/// OCA group name shared by every leg of the group opened by `entry_id`.
pub fn oca_group_name(entry_id: i64) -> String {
    format!("OCA_{}", entry_id)
}

/// Exchanges quote in cents.
pub fn round_to_cents(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}
