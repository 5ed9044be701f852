//! Bookkeeping core: domain records and the pure computations behind the dashboard

pub mod aggregate;
pub mod calendar;
pub mod catalog;
pub mod config;
pub mod listing;
pub mod log;
pub mod model;
pub mod money;
pub mod period;
pub mod price_history;

// Re-export main types for cleaner imports
pub use aggregate::{SeriesPoint, Summary};
pub use listing::KindFilter;
pub use model::{Comparison, Direction, Kind, PriceRecord, Product, Transaction, Unit};
pub use period::{CustomRange, Period};
pub use price_history::ComparedPrice;
