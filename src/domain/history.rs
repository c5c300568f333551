//! Bounded, ordered store of completed bars.

use std::collections::VecDeque;

use super::ohlcv::Bar;

/// Completed bars, oldest first. Once `capacity` is reached the oldest bar is
/// dropped on every push, so retention tracks the longest lookback in use.
#[derive(Debug, Clone)]
pub struct BarHistory {
    bars: VecDeque<Bar>,
    capacity: usize,
}

impl BarHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        BarHistory {
            bars: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, bar: Bar) {
        if self.bars.len() == self.capacity {
            self.bars.pop_front();
        }
        self.bars.push_back(bar);
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.back()
    }

    /// The bar completed just before the latest one.
    pub fn previous(&self) -> Option<&Bar> {
        self.bars.len().checked_sub(2).and_then(|i| self.bars.get(i))
    }

    /// `count` bars ending `offset` bars before the newest one, oldest first.
    /// `None` when the history is too short to supply all of them.
    pub fn window(&self, count: usize, offset: usize) -> Option<impl Iterator<Item = &Bar>> {
        let end = self.bars.len().checked_sub(offset)?;
        let start = end.checked_sub(count)?;
        Some(self.bars.range(start..end))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }
}
