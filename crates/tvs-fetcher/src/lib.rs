pub mod config;
pub mod error;
pub mod fetcher;
pub mod sources;
pub mod traits;

pub use config::{SourceConfig, SourceKind};
pub use error::FetchError;
pub use fetcher::MetricFetcher;
pub use sources::{FallbackSource, ScrapedPageSource, StructuredApiSource};
pub use traits::MetricSource;
