// Query module.
// Builds GitHub search requests from user-selected filters.

#![allow(dead_code, unused_imports)]

pub mod builder;
pub mod window;

pub use builder::{PAGE_SIZE, RequestKey, SearchRequest, SortKey, search_request, trending_request};
pub use window::{TimeRange, date_since};
