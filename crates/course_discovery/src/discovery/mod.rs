//! Course discovery: load the catalog, then search, filter, sort and paginate it
//! client-side while keeping the page's query string in sync.

mod client;
mod config;
mod controller;
mod error;
pub mod filter;
pub mod pagination;
pub mod query;
pub mod sort;
mod state;
mod types;

pub use client::{CourseApi, HttpCourseApi};
pub use config::{ConfigFile, DiscoveryConfig, DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE};
pub use controller::{DiscoveryController, LoadOutcome};
pub use error::DiscoveryError;
pub use filter::{derive_view, parse_decimal_input, FilterCriteria};
pub use pagination::{PageRange, PageWindow};
pub use query::QueryParams;
pub use sort::{sort_view, SortOrder};
pub use state::{CourseDiscoveryState, LoadStatus, ViewStatus};
pub use types::{Course, Instructor};
