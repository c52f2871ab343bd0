//! Filter state composition for the integrations list.
//!
//! Each filterable column is bound to its own persisted state accessor,
//! normally a URL query parameter. [`FilterComposer`] merges the accessors
//! into one [`Filters`] value and debounces writes per column.

mod column;
mod composer;
mod state;

pub use column::{FilterColumn, FilterContent, Filters, IntegrationFilterColumn};
pub use composer::{DEFAULT_DEBOUNCE, FilterComposer};
pub use state::{FilterState, SharedFilterState, UrlQueryState, state_factory};

/// Tracing target for filter composition.
pub const TRACING_TARGET: &str = "beacon_core::filter";
