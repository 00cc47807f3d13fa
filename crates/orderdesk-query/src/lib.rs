//! Orderdesk query layer
//!
//! Turns raw, repeatable, loosely-typed HTTP query strings into typed list
//! parameters and storage-agnostic filter descriptors. The normalizer and
//! filter builder are pure: no I/O, no side effects, every failure is a
//! caller-safe validation error.

pub mod filter;
pub mod params;
pub mod search;

pub use filter::{
    build_filter, total_pages, FieldPolicy, FilterDescriptor, FilterValue, PageSpec, Predicate,
    SortSpec,
};
pub use params::{
    normalize_list_params, DateRange, ListQuerySpec, NormalizedListParams, NumericRange,
    QueryInput, RawValue, SortOrder,
};
pub use search::{sanitize_search, SearchTerm, MAX_SEARCH_CHARS};
