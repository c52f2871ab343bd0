//! List request construction from filters, pagination and sorting.

mod pagination;
mod request;
mod sorting;

pub use pagination::Pagination;
pub use request::{GetIntegrationsRequest, build_list_request};
pub use sorting::{IntegrationSortBy, IntegrationSortField, SortBy, SortOrder};

/// Tracing target for list request construction.
pub const TRACING_TARGET: &str = "beacon_core::query";
