// ==============================================================================
// StripPrefix Middleware
// ==============================================================================
//
// Used by `Router::nest` and `Router::nest_service`. The mount prefix is a
// template compiled in loose mode, so its match stops at a segment boundary
// and everything after it is what the nested service sees. A prefix with
// parameters (`/:version`) or odd casing (`/API`) strips like a literal one.

use http::{Request, Uri, uri::PathAndQuery};
use std::{
    borrow::Cow,
    sync::Arc,
    task::{Context, Poll},
};
use tower_service::Service;

use crate::pattern::Pattern;

/// Layer that removes the part of the path matched by a loose-mode prefix.
#[allow(clippy::redundant_pub_crate)] // Explicit crate visibility on private-module item.
#[derive(Clone, Debug)]
pub(crate) struct StripPrefixLayer {
    prefix: Arc<Pattern>,
}

impl StripPrefixLayer {
    #[allow(clippy::redundant_pub_crate)] // Explicit crate visibility on private-module item.
    pub(crate) fn new(prefix: Pattern) -> Self {
        Self {
            prefix: Arc::new(prefix),
        }
    }

    /// The path left once the prefix is removed, always starting with `/`.
    fn remainder<'p>(&self, path: &'p str) -> Option<Cow<'p, str>> {
        let matched = self.prefix.exec(path)?;
        let rest = path.get(matched.end()..)?;

        Some(if rest.starts_with('/') {
            Cow::Borrowed(rest)
        } else {
            Cow::Owned(format!("/{rest}"))
        })
    }

    /// `uri` with its path replaced by the remainder. Scheme, authority and
    /// query are kept.
    fn rewrite(&self, uri: &Uri) -> Option<Uri> {
        let rest = self.remainder(uri.path())?;
        let path_and_query = match uri.query() {
            Some(query) => PathAndQuery::try_from(format!("{rest}?{query}")),
            None => PathAndQuery::try_from(rest.as_ref()),
        }
        .ok()?;

        let mut parts = uri.clone().into_parts();
        parts.path_and_query = Some(path_and_query);
        Uri::from_parts(parts).ok()
    }
}

impl<S> tower_layer::Layer<S> for StripPrefixLayer {
    type Service = StripPrefix<S>;

    fn layer(&self, inner: S) -> Self::Service {
        StripPrefix {
            inner,
            layer: self.clone(),
        }
    }
}

/// Service produced by [`StripPrefixLayer`].
#[allow(clippy::redundant_pub_crate)] // Explicit crate visibility on private-module item.
#[derive(Clone, Debug)]
pub(crate) struct StripPrefix<S> {
    inner: S,
    layer: StripPrefixLayer,
}

impl<S, B> Service<Request<B>> for StripPrefix<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    #[inline]
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        // Paths outside the prefix go through untouched.
        if let Some(uri) = self.layer.rewrite(req.uri()) {
            tracing::trace!(from = %req.uri(), to = %uri, "stripped nest prefix");
            *req.uri_mut() = uri;
        }
        self.inner.call(req)
    }
}
