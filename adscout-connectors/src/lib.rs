pub mod adlibrary;
pub mod error;
pub mod pagespeed;
pub mod record;

pub use adlibrary::AdLibraryClient;
pub use error::ConnectorError;
pub use pagespeed::PerformanceClient;
pub use record::{AdvertiserRecord, CreativeSample, PerformanceRecord};
