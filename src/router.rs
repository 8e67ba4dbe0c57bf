// ==============================================================================
// Router<S>
// ==============================================================================
//
// Same builder surface as `axum::Router`, but every route is a path template
// compiled by `parse`. There is no ranking: a request goes to the first
// endpoint, in registration order, whose pattern matches.
//
// Each endpoint keeps its handler as an axum `MethodRouter`, so method
// filters, state and layers behave exactly as in axum. Raw services are
// wrapped with `any_service`, since axum's own `Route` cannot be built
// outside axum.

use std::{
    convert::Infallible,
    fmt,
    future::{Future, ready},
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use axum::routing::{MethodRouter, any, any_service};
use axum_core::{extract::Request, response::IntoResponse};
use http::StatusCode;
use tower_service::Service;

use crate::{
    extract::{matched_path::MatchedPath, path::UrlParams},
    parse::{Mode, Parsed, parse},
    segment::{Segment, segments},
    strip_prefix::StripPrefixLayer,
};

/// Template that catches everything under a nest prefix.
const NEST_CATCH_ALL: &str = "/*?";

// ==============================================================================
// Endpoint
// ==============================================================================

/// A template, its compiled pattern and the handler it dispatches to.
struct Endpoint<S> {
    template: Arc<str>,
    parsed: Arc<Parsed>,
    handler: MethodRouter<S>,
}

impl<S> Clone for Endpoint<S>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            template: Arc::clone(&self.template),
            parsed: Arc::clone(&self.parsed),
            handler: self.handler.clone(),
        }
    }
}

impl<S> Endpoint<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn map_handler<S2>(self, f: impl FnOnce(MethodRouter<S>) -> MethodRouter<S2>) -> Endpoint<S2> {
        Endpoint {
            template: self.template,
            parsed: self.parsed,
            handler: f(self.handler),
        }
    }
}

// ==============================================================================
// Router<S>
// ==============================================================================

/// An HTTP router whose routes are path templates.
///
/// Handlers, extractors and middleware are axum's. Only the path syntax and
/// the dispatch order differ:
///
/// ```rust,no_run
/// use axum_pathpattern::Router;
/// use axum::routing::get;
///
/// let app = Router::new()
///     .route("/", get(|| async { "home" }))
///     .route("/users/:id(\\d+)", get(|| async { "user by id" }))
///     .route("/users/:name", get(|| async { "user by name" }))
///     .route("/books/:author/:title?", get(|| async { "books" }))
///     .route("/videos/:clip.mp4", get(|| async { "video" }))
///     .route("/files/*", get(|| async { "file" }));
/// # let _: Router = app;
/// ```
///
/// `/users/42` reaches the first users route and `/users/ada` the second,
/// because routes are tried in the order they were added.
pub struct Router<S = ()> {
    endpoints: Vec<Endpoint<S>>,
    /// `None` answers unmatched requests with a bare 404.
    fallback: Option<MethodRouter<S>>,
}

impl<S> fmt::Debug for Router<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let templates: Vec<&str> = self.endpoints.iter().map(|e| &*e.template).collect();
        f.debug_struct("Router")
            .field("templates", &templates)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

impl<S> Clone for Router<S>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            endpoints: self.endpoints.clone(),
            fallback: self.fallback.clone(),
        }
    }
}

impl Default for Router<()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    #[must_use]
    pub const fn new() -> Self {
        Self {
            endpoints: Vec::new(),
            fallback: None,
        }
    }

    // =========================================================================
    // Routes
    // =========================================================================

    /// Adds `method_router` under `template`.
    ///
    /// The template is compiled in [`Mode::Strict`]: a trailing slash and
    /// ASCII case are ignored, and nothing may follow the last segment.
    /// Adding a template that is already registered merges the method
    /// routers, so `.route("/a", get(..)).route("/a", post(..))` works.
    ///
    /// # Panics
    ///
    /// Panics if the template is not a valid pattern, e.g. `/books/(`.
    #[must_use]
    pub fn route(mut self, template: &str, method_router: MethodRouter<S>) -> Self {
        if let Some(existing) = self.endpoint_mut(template) {
            existing.handler = std::mem::take(&mut existing.handler).merge(method_router);
            return self;
        }

        let parsed = compile(template, Mode::Strict);
        tracing::debug!(template, pattern = %parsed.pattern, "registered route");

        self.endpoints.push(Endpoint {
            template: Arc::from(template),
            parsed: Arc::new(parsed),
            handler: method_router,
        });
        self
    }

    /// Adds a tower `Service` under `template`, for every HTTP method.
    ///
    /// # Panics
    ///
    /// Same as [`Router::route`].
    #[must_use]
    pub fn route_service<T>(self, template: &str, service: T) -> Self
    where
        T: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
        T::Response: IntoResponse + 'static,
        T::Future: Send + 'static,
    {
        self.route(template, any_service(service))
    }

    /// Appends the routes of `other`.
    ///
    /// They are tried after the routes already here. Templates present in
    /// both have their method routers merged. A fallback set on `other`
    /// replaces this router's.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        for endpoint in other.endpoints {
            match self.endpoint_mut(&endpoint.template) {
                Some(existing) => {
                    existing.handler =
                        std::mem::take(&mut existing.handler).merge(endpoint.handler);
                }
                None => self.endpoints.push(endpoint),
            }
        }

        if other.fallback.is_some() {
            self.fallback = other.fallback;
        }
        self
    }

    fn endpoint_mut(&mut self, template: &str) -> Option<&mut Endpoint<S>> {
        self.endpoints.iter_mut().find(|e| &*e.template == template)
    }

    // =========================================================================
    // Nesting
    // =========================================================================

    /// Mounts `router` under `prefix`.
    ///
    /// Each inner template is registered here with `prefix` in front, so
    /// [`MatchedPath`] and [`Path`] see the whole template, including any
    /// parameters in the prefix (`/:version`). The inner handlers get the
    /// request URI with the part matched by the prefix removed.
    ///
    /// The prefix is matched loosely: `/api` strips `/API/users` to `/users`,
    /// and an optional `/:version?` strips whether or not it is present.
    /// If `router` has a fallback, it answers every other path under `prefix`.
    ///
    /// [`Path`]: crate::extract::Path
    ///
    /// # Panics
    ///
    /// Panics if `prefix` is `/` or empty, contains `*`, or is not a valid
    /// pattern.
    #[must_use]
    pub fn nest(mut self, prefix: &str, router: Self) -> Self {
        let strip = nest_layer(prefix);
        tracing::debug!(prefix, routes = router.endpoints.len(), "nesting router");

        for endpoint in router.endpoints {
            let template = join(prefix, &endpoint.template);
            self = self.route(&template, endpoint.handler.layer(strip.clone()));
        }
        if let Some(fallback) = router.fallback {
            self = self.route(&join(prefix, NEST_CATCH_ALL), fallback.layer(strip));
        }
        self
    }

    /// Mounts a tower `Service` under `prefix`.
    ///
    /// The service sees every request under `prefix`, with the prefix
    /// stripped as in [`Router::nest`].
    ///
    /// # Panics
    ///
    /// Same as [`Router::nest`].
    #[must_use]
    pub fn nest_service<T>(self, prefix: &str, service: T) -> Self
    where
        T: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
        T::Response: IntoResponse + 'static,
        T::Future: Send + 'static,
    {
        let strip = nest_layer(prefix);
        tracing::debug!(prefix, "nesting service");

        self.route(
            &join(prefix, NEST_CATCH_ALL),
            any_service(service).layer(strip),
        )
    }

    // =========================================================================
    // Fallback
    // =========================================================================

    /// Handles requests no template matched.
    #[must_use]
    pub fn fallback<H, T>(mut self, handler: H) -> Self
    where
        H: axum::handler::Handler<T, S>,
        T: 'static,
    {
        self.fallback = Some(any(handler));
        self
    }

    /// Like [`Router::fallback`], with a tower `Service`.
    #[must_use]
    pub fn fallback_service<T>(mut self, service: T) -> Self
    where
        T: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
        T::Response: IntoResponse + 'static,
        T::Future: Send + 'static,
    {
        self.fallback = Some(any_service(service));
        self
    }

    // =========================================================================
    // Layers
    // =========================================================================

    /// Wraps the routes registered so far in `layer`. The fallback and
    /// routes added later are not wrapped.
    #[must_use]
    pub fn route_layer<L>(mut self, layer: L) -> Self
    where
        L: tower_layer::Layer<axum::routing::Route> + Clone + Send + Sync + 'static,
        L::Service: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
        <L::Service as Service<Request>>::Response: IntoResponse + 'static,
        <L::Service as Service<Request>>::Future: Send + 'static,
    {
        self.endpoints = self
            .endpoints
            .into_iter()
            .map(|e| e.map_handler(|handler| handler.route_layer(layer.clone())))
            .collect();
        self
    }

    /// Wraps the routes registered so far and the fallback in `layer`.
    ///
    /// Without a fallback, the default 404 is wrapped as well.
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: tower_layer::Layer<axum::routing::Route> + Clone + Send + Sync + 'static,
        L::Service: Service<Request> + Clone + Send + Sync + 'static,
        <L::Service as Service<Request>>::Response: IntoResponse + 'static,
        <L::Service as Service<Request>>::Error: Into<Infallible> + 'static,
        <L::Service as Service<Request>>::Future: Send + 'static,
    {
        self.endpoints = self
            .endpoints
            .into_iter()
            .map(|e| e.map_handler(|handler| handler.layer(layer.clone())))
            .collect();

        let fallback = self
            .fallback
            .unwrap_or_else(|| any(|| async { StatusCode::NOT_FOUND }));
        self.fallback = Some(fallback.layer(layer));
        self
    }

    // =========================================================================
    // Serving
    // =========================================================================

    /// Provides the state, turning this into a `Router<()>` that can serve
    /// requests.
    pub fn with_state(self, state: S) -> Router<()> {
        Router {
            endpoints: self
                .endpoints
                .into_iter()
                .map(|e| e.map_handler(|handler| handler.with_state(state.clone())))
                .collect(),
            fallback: self.fallback.map(|fallback| fallback.with_state(state)),
        }
    }

    /// For [`axum::serve`].
    #[must_use]
    pub const fn into_make_service(self) -> IntoMakeService<Self> {
        IntoMakeService { svc: self }
    }
}

// ==============================================================================
// Helpers
// ==============================================================================

#[allow(clippy::panic)] // Intentional: builder panics on invalid routes, matching axum's API.
fn compile(template: &str, mode: Mode) -> Parsed {
    parse(template, mode).unwrap_or_else(|err| panic!("failed to insert route `{template}`: {err}"))
}

/// Checks a nest prefix and builds the layer that strips it.
fn nest_layer(prefix: &str) -> StripPrefixLayer {
    assert!(
        !prefix.trim_matches('/').is_empty(),
        "nesting at the root is not supported"
    );
    assert!(
        !segments(prefix).any(|segment| matches!(segment, Segment::Wildcard { .. })),
        "nest path must not contain wildcards"
    );

    StripPrefixLayer::new(compile(prefix, Mode::Loose).pattern)
}

/// `prefix` followed by `template`, with exactly one `/` between them.
fn join(prefix: &str, template: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    match template.trim_start_matches('/') {
        "" => prefix.to_owned(),
        rest => format!("{prefix}/{rest}"),
    }
}

// ==============================================================================
// Dispatch
// ==============================================================================

impl Service<Request> for Router<()> {
    type Response = axum::response::Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let path = req.uri().path();
        let found = self.endpoints.iter().find_map(|endpoint| {
            let params = endpoint.parsed.exec(path)?;
            Some((endpoint, UrlParams::decode(&params)))
        });

        let Some((endpoint, params)) = found else {
            tracing::trace!(path, "no route matched");
            return match self.fallback.clone() {
                Some(mut fallback) => Box::pin(async move { fallback.call(req).await }),
                None => Box::pin(ready(Ok(StatusCode::NOT_FOUND.into_response()))),
            };
        };
        tracing::trace!(path, template = &*endpoint.template, "route matched");

        let matched = MatchedPath::new(&endpoint.template, &endpoint.parsed);
        let mut handler = endpoint.handler.clone();

        req.extensions_mut().insert(params);
        req.extensions_mut().insert(matched);
        Box::pin(async move { handler.call(req).await })
    }
}

/// Hands out clones of the router, one per connection.
#[derive(Debug, Clone)]
pub struct IntoMakeService<S> {
    svc: S,
}

impl<S, T> Service<T> for IntoMakeService<S>
where
    S: Clone,
{
    type Response = S;
    type Error = Infallible;
    type Future = std::future::Ready<Result<S, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _target: T) -> Self::Future {
        ready(Ok(self.svc.clone()))
    }
}
