//! OHLCV provider port.

use crate::domain::Bar;
use crate::error::Result;

/// Supplies an ordered OHLCV series. Fetching, paging and rate limiting are
/// the provider's concern.
pub trait SeriesSource {
    /// Load the full series, oldest bar first.
    ///
    /// # Errors
    /// Returns an error if the source cannot be read or holds malformed bars.
    fn load(&self) -> Result<Vec<Bar>>;
}
