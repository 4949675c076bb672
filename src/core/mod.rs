//! Core business logic: records, backend resolution, filtering and export

pub mod backend;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod log;
pub mod money;
pub mod record;
pub mod resolver;
pub mod session;
pub mod summary;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types for cleaner imports
pub use backend::{BackendKind, ClientBackend, ClientStore};
pub use error::{CapabilityAbsent, FetchError};
pub use filter::PrefixSet;
pub use record::{ClientRecord, MonthlyEntry, RawRecord};
pub use resolver::DataSourceResolver;
pub use session::{ClientSnapshot, LoadOutcome, Session};
pub use summary::Summary;
