//! Core rate model, formulas and ambient plumbing

pub mod cache;
pub mod cancel;
pub mod config;
pub mod conversion;
pub mod error;
pub mod log;
pub mod rate;
pub mod source;

// Re-export main types for cleaner imports
pub use cache::{Clock, SnapshotCache, SystemClock};
pub use cancel::{CancelHandle, CancelSignal};
pub use conversion::Conversion;
pub use error::{RateError, RateResult};
pub use rate::{Currency, DollarRate, EuroRate, RateSnapshot};
pub use source::RateSource;
