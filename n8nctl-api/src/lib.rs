//! n8nctl api library: the remote workflow API seam and its HTTP client.
//!
//! - [`client`]: the [`WorkflowApi`] trait and outbound payload shaping
//! - [`http`]: [`HttpClient`], blocking `ureq` implementation
//! - [`pagination`]: cursor draining with a cycle guard
//! - `fake`: in-memory implementation (tests and the `fake` feature)

pub mod client;
pub mod error;
pub mod http;
pub mod pagination;

#[cfg(any(test, feature = "fake"))]
pub mod fake;

pub use client::{outbound_payload, Page, WorkflowApi};
pub use error::ApiError;
pub use http::HttpClient;
pub use pagination::{collect_pages, fetch_all, fetch_all_tags, PAGE_LIMIT};
