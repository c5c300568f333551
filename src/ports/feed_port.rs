//! Market feed port: recorded or streamed price/volume updates.

use std::path::Path;

use crate::domain::error::BarTraderError;
use crate::domain::ohlcv::Update;

pub trait FeedPort {
    /// Updates from `source` in delivery order, timestamps already in the
    /// venue zone. Rows are not reordered.
    fn read_updates(&self, source: &Path) -> Result<Vec<Update>, BarTraderError>;
}
