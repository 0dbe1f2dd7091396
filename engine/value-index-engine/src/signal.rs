//! Outcome type shared by the trend analyzers

/// Result of a trend computation over a lookback window.
///
/// `NoData` and a computed all-zero metric collapse to the same numbers via
/// [`metrics`](TrendOutcome::metrics) (the composite calculator depends on
/// that shared sentinel), but the two states stay distinguishable for
/// logging and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrendOutcome<T> {
    /// Not enough records in the window to compute a signal
    NoData,
    /// Metrics computed from real records
    Computed(T),
}

impl<T: Copy + Default> TrendOutcome<T> {
    /// The metric values, with `NoData` mapped to the all-zero struct.
    pub fn metrics(&self) -> T {
        match self {
            TrendOutcome::NoData => T::default(),
            TrendOutcome::Computed(metrics) => *metrics,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, TrendOutcome::NoData)
    }
}
