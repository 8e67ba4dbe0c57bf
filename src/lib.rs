//! # `axum-pathpattern`
//!
//! Express-style route templates compiled to regular expressions, plus a
//! template injector and an [Axum](https://docs.rs/axum) router built on
//! them.
//!
//! ## Templates
//!
//! | Segment        | Meaning                                        |
//! |----------------|------------------------------------------------|
//! | `books`        | literal text                                   |
//! | `:title`       | required parameter, one path segment           |
//! | `:title?`      | optional parameter                             |
//! | `:title.mp4`   | parameter followed by a fixed extension        |
//! | `:id(\d+)`     | parameter with its own sub-pattern             |
//! | `*` / `*?`     | the rest of the path, keyed as [`WILDCARD_KEY`]|
//!
//! ```rust
//! use axum_pathpattern::{Keys, Mode, inject, parse};
//! use serde_json::json;
//!
//! let parsed = parse("/books/:genre/:title?", Mode::Strict)?;
//! assert_eq!(parsed.keys, Keys::Named(vec!["genre".into(), "title".into()]));
//!
//! let params = parsed.exec("/books/horror/dracula").expect("matches");
//! assert_eq!(params.get("title"), Some("dracula"));
//!
//! assert_eq!(inject("/books/:genre/:title?", &json!({ "genre": "horror" }))?, "/books/horror");
//! # Ok::<(), axum_pathpattern::Error>(())
//! ```
//!
//! ## Router
//!
//! Swap two imports and keep handlers, method filters (`get`, `post`, …),
//! middleware, `Json`, `State` and the rest of axum unchanged:
//!
//! ```rust,ignore
//! // Before:
//! use axum::{Router, extract::Path};
//!
//! // After:
//! use axum_pathpattern::{Router, extract::Path};
//! ```
//!
//! Routes are tried in registration order; the first match wins.

mod error;
pub mod extract;
mod inject;
mod params;
mod parse;
mod pattern;
mod router;
mod segment;
mod strip_prefix;

pub use error::Error;
pub use inject::inject;
pub use params::Params;
pub use parse::{Keys, Mode, Parsed, Route, WILDCARD_KEY, parse};
pub use pattern::{Captures, Pattern};
pub use router::{IntoMakeService, Router};
