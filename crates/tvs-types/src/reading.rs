use crate::category::CategoryBreakdown;

/// Result of a successful fetch, rebuilt from scratch on every cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricReading {
    /// Aggregated value in USD
    pub total: f64,
    pub breakdown: Option<CategoryBreakdown>,
    /// Name of the source that produced the reading
    pub source: &'static str,
}

impl MetricReading {
    /// The total is taken from the breakdown itself so that it always equals
    /// the sum of the sub-totals.
    pub fn from_breakdown(breakdown: CategoryBreakdown, source: &'static str) -> Self {
        Self {
            total: breakdown.total(),
            breakdown: Some(breakdown),
            source,
        }
    }

    pub const fn from_total(total: f64, source: &'static str) -> Self {
        Self {
            total,
            breakdown: None,
            source,
        }
    }
}
