//! Extractors for routes registered on [`Router`](crate::Router).
//!
//! [`Path`] and [`MatchedPath`] read from request extensions inserted by this
//! crate's router, not axum's internal types, so use these instead of the
//! ones in `axum::extract`.

/// Matched-path extractor that records which route template was matched.
pub mod matched_path;
/// Path parameter extractor with percent-decoding and serde deserialization.
pub mod path;

pub use matched_path::MatchedPath;
pub use path::Path;
