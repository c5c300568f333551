//! Single-writer instrument worker.
//!
//! One tokio task owns the [`Trader`] for an instrument and drains an
//! unbounded channel of feed events in arrival order, so updates are never
//! reordered and the engine needs no locks. Dropping every sender ends the
//! task, which hands the trader back for inspection.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::domain::ohlcv::Update;
use crate::domain::order::OrderGroup;
use crate::domain::trader::Trader;
use crate::ports::clock_port::ClockPort;
use crate::ports::execution_port::ExecutionPort;

#[derive(Debug, Clone)]
pub enum FeedEvent {
    Historical(Update),
    Live(Update),
    /// The broker reported the open bracket as exited.
    PositionClosed,
}

pub struct InstrumentWorker<E: ExecutionPort, C: ClockPort> {
    events: mpsc::UnboundedSender<FeedEvent>,
    orders: mpsc::UnboundedReceiver<OrderGroup>,
    handle: JoinHandle<Trader<E, C>>,
}

impl<E, C> InstrumentWorker<E, C>
where
    E: ExecutionPort + Send + 'static,
    C: ClockPort + Send + 'static,
{
    /// Must be called inside a tokio runtime.
    pub fn spawn(mut trader: Trader<E, C>) -> Self {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel::<FeedEvent>();
        let (order_tx, order_rx) = mpsc::unbounded_channel::<OrderGroup>();

        let handle = tokio::spawn(async move {
            let symbol = trader.config().symbol.clone();
            info!(symbol = %symbol, "instrument worker started");
            while let Some(event) = event_rx.recv().await {
                match event {
                    FeedEvent::Historical(update) => trader.on_historical(&update),
                    FeedEvent::Live(update) => match trader.on_live(&update) {
                        Ok(Some(group)) => {
                            // receiver may be gone; the order is already placed
                            let _ = order_tx.send(group);
                        }
                        Ok(None) => {}
                        Err(e) => error!(symbol = %symbol, error = %e, "live update failed"),
                    },
                    FeedEvent::PositionClosed => trader.on_position_closed(),
                }
            }
            info!(symbol = %symbol, "feed closed, instrument worker stopping");
            trader
        });

        InstrumentWorker {
            events: event_tx,
            orders: order_rx,
            handle,
        }
    }

    /// A sender for the feed producer. The worker runs until all senders,
    /// including the one held here, are dropped.
    pub fn sender(&self) -> mpsc::UnboundedSender<FeedEvent> {
        self.events.clone()
    }

    /// Returns false once the worker has stopped.
    pub fn send(&self, event: FeedEvent) -> bool {
        self.events.send(event).is_ok()
    }

    /// Next order group submitted by the worker, `None` once it has stopped.
    pub async fn next_order(&mut self) -> Option<OrderGroup> {
        self.orders.recv().await
    }

    /// Close the feed and wait for the worker to drain it. Order groups not
    /// yet taken with [`next_order`](Self::next_order) are returned too.
    pub async fn shutdown(self) -> Result<(Trader<E, C>, Vec<OrderGroup>), tokio::task::JoinError> {
        let InstrumentWorker {
            events,
            mut orders,
            handle,
        } = self;
        drop(events);
        let trader = handle.await?;
        let mut pending = Vec::new();
        while let Ok(group) = orders.try_recv() {
            pending.push(group);
        }
        Ok((trader, pending))
    }
}
