pub mod category;
pub mod format;
pub mod reading;

pub use category::{Category, CategoryBreakdown};
pub use format::format_usd;
pub use reading::MetricReading;
