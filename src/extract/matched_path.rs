// ==============================================================================
// MatchedPath Extractor
// ==============================================================================
//
// axum's `MatchedPath` can only be built inside axum, so the router inserts
// this one instead. It carries the registered template together with its
// compiled form, which lets handlers and middleware see the parameter names
// without parsing the template again.

use axum_core::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    response::{IntoResponse, Response},
};
use http::{StatusCode, request::Parts};
use std::{convert::Infallible, sync::Arc};

use crate::parse::{Keys, Parsed};

/// The route template that matched the current request.
///
/// This is the template as registered (`"/users/:id?"`), not the request
/// path. Routes added through [`Router::nest`](crate::Router::nest) report
/// the prefix and the inner template joined (`"/:version/users/:id?"`).
///
/// ```rust,no_run
/// use axum_pathpattern::{Keys, Router, extract::MatchedPath};
/// use axum::routing::get;
///
/// let app = Router::new().route(
///     "/users/:id?",
///     get(|matched: MatchedPath| async move {
///         assert_eq!(matched.as_str(), "/users/:id?");
///         assert_eq!(matched.keys(), &Keys::Named(vec!["id".into()]));
///     }),
/// );
/// # let _: Router = app;
/// ```
#[derive(Clone, Debug)]
pub struct MatchedPath {
    template: Arc<str>,
    parsed: Arc<Parsed>,
}

impl MatchedPath {
    pub(crate) fn new(template: &Arc<str>, parsed: &Arc<Parsed>) -> Self {
        Self {
            template: Arc::clone(template),
            parsed: Arc::clone(parsed),
        }
    }

    /// The template text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Parameter names of the template, in capture order.
    #[must_use]
    pub fn keys(&self) -> &Keys {
        &self.parsed.keys
    }
}

impl<S> FromRequestParts<S> for MatchedPath
where
    S: Send + Sync,
{
    type Rejection = MatchedPathRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or(MatchedPathRejection)
    }
}

impl<S> OptionalFromRequestParts<S> for MatchedPath
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned())
    }
}

/// The request reached the handler without passing through a route, e.g.
/// from a fallback.
#[derive(Debug, thiserror::Error)]
#[error("no route template matched this request")]
pub struct MatchedPathRejection;

impl IntoResponse for MatchedPathRejection {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
