//! Filter-and-aggregate core of the COB call-center dashboard.
//!
//! The call log is loaded once into an immutable [`RecordStore`]; every
//! filter change runs [`recompute`] over it and returns the eight chart
//! datasets.

pub mod config;
pub mod dashboard;
pub mod errors;
pub mod filter;
pub mod loader;
pub mod logging;
pub mod output;
pub mod reports;
pub mod server;
pub mod types;
pub mod util;

pub use dashboard::{recompute, Dashboard, DashboardQuery, Summary, Theme};
pub use errors::{AppError, AppResult};
pub use filter::{filter, Selection};
pub use loader::{load, load_from_reader, RecordStore};
