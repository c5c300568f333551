//! Paper execution adapter: accepts every order group and keeps it.

use tracing::info;

use crate::domain::error::BarTraderError;
use crate::domain::order::OrderGroup;
use crate::ports::execution_port::ExecutionPort;

#[derive(Debug, Default)]
pub struct PaperExecutionAdapter {
    first_order_id: i64,
    submitted: Vec<OrderGroup>,
}

impl PaperExecutionAdapter {
    pub fn new(first_order_id: i64) -> Self {
        Self {
            first_order_id,
            submitted: Vec::new(),
        }
    }

    pub fn submitted(&self) -> &[OrderGroup] {
        &self.submitted
    }
}

impl ExecutionPort for PaperExecutionAdapter {
    fn next_order_id(&mut self) -> Result<i64, BarTraderError> {
        Ok(self.first_order_id)
    }

    fn submit_order_group(&mut self, group: &OrderGroup) -> Result<(), BarTraderError> {
        for leg in group.legs() {
            info!(symbol = %group.symbol, order = %leg, "paper order");
        }
        self.submitted.push(group.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order_manager::build_bracket;
    use crate::domain::signal::EntryOrder;
    use crate::domain::strategy::StopSpec;

    #[test]
    fn keeps_submitted_groups() {
        let mut paper = PaperExecutionAdapter::new(42);
        assert_eq!(paper.next_order_id().unwrap(), 42);
        let entry = EntryOrder {
            quantity: 1,
            entry_reference: 50.0,
            target_price: 51.0,
            stop: StopSpec::Fixed { price: 49.5 },
        };
        let group = build_bracket("QQQ", 42, &entry);
        paper.submit_order_group(&group).unwrap();
        assert_eq!(paper.submitted(), &[group]);
    }
}
