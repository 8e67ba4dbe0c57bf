// ==============================================================================
// Path<T> Extractor
// ==============================================================================
//
// The router decodes the parameters of the matching template once and stores
// them as a `UrlParams` extension. `Path<T>` runs them through the serde
// deserializer in `de`. Parameters a template left unfilled (`:name?`, `*?`,
// an empty `*`) are not in the list at all.

pub(crate) mod de;

use axum_core::{
    extract::FromRequestParts,
    response::{IntoResponse, Response},
};
use http::{StatusCode, request::Parts};
use serde::de::DeserializeOwned;
use std::{fmt, ops::Deref, sync::Arc};

use crate::params::Params;

/// A parameter name and its decoded value.
pub(crate) type Param = (Arc<str>, PercentDecodedStr);

// ==============================================================================
// PercentDecodedStr
// ==============================================================================

/// A path parameter after percent-decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PercentDecodedStr(Arc<str>);

impl PercentDecodedStr {
    /// Percent-decodes `raw`.
    ///
    /// # Errors
    ///
    /// Fails when the decoded bytes are not UTF-8.
    pub fn new<S: AsRef<str>>(raw: S) -> Result<Self, std::str::Utf8Error> {
        let decoded = percent_encoding::percent_decode_str(raw.as_ref()).decode_utf8()?;
        Ok(Self(Arc::from(decoded)))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for PercentDecodedStr {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        &self.0
    }
}

// ==============================================================================
// UrlParams
// ==============================================================================

/// Decoded parameters of the matched template, or the key whose value did
/// not decode.
#[derive(Clone, Debug)]
pub(crate) struct UrlParams(Result<Vec<Param>, Arc<str>>);

impl UrlParams {
    pub(crate) fn decode(matched: &Params<'_, '_>) -> Self {
        let decoded = matched
            .iter()
            .map(|(key, value)| match PercentDecodedStr::new(value) {
                Ok(value) => Ok((Arc::from(key), value)),
                Err(_) => Err(Arc::from(key)),
            })
            .collect();
        Self(decoded)
    }

    fn as_slice(&self) -> Result<&[Param], ErrorKind> {
        self.0.as_deref().map_err(|key| ErrorKind::InvalidUtf8 {
            key: key.to_string(),
        })
    }
}

// ==============================================================================
// Path<T>
// ==============================================================================

/// Deserializes the parameters captured by the matched template.
///
/// `T` can be a single value, a tuple, a struct or a map, as with
/// [`axum::extract::Path`]. Parameters are keyed by their template name;
/// the wildcard is keyed [`WILDCARD_KEY`](crate::WILDCARD_KEY).
///
/// A parameter that captured nothing is absent rather than empty. That covers
/// a skipped `:name?`, a skipped `*?`, and a `*` that matched zero characters
/// (`/files/*` on `/files/`). Use `Option` wherever that can happen: a bare
/// `Path<String>` on `/files/*` rejects `/files/` with a 500, while
/// `Path<Option<String>>` yields `None`.
///
/// ```rust,no_run
/// use axum_pathpattern::{Router, extract::Path};
/// use axum::routing::get;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Book {
///     author: String,
///     title: Option<String>,
/// }
///
/// async fn book(Path(book): Path<Book>) -> String {
///     format!("{} {:?}", book.author, book.title)
/// }
///
/// async fn file(Path(rest): Path<Option<String>>) -> String {
///     rest.unwrap_or_else(|| "index".to_owned())
/// }
///
/// let app = Router::new()
///     .route("/books/:author/:title?", get(book))
///     .route("/files/*", get(file));
/// # let _: Router = app;
/// ```
#[derive(Debug)]
pub struct Path<T>(pub T);

impl<T> Deref for Path<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = PathRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let params = parts
            .extensions
            .get::<UrlParams>()
            .ok_or(PathRejection::Missing)?
            .as_slice()?;

        Ok(Self(T::deserialize(de::PathDeserializer::new(params))?))
    }
}

// ==============================================================================
// Errors
// ==============================================================================

/// Why the captured parameters could not become a `T`.
///
/// Also the error type of the deserializer itself.
#[must_use]
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// `T` wants a different number of values than the template captured.
    #[error("the route captured {got} path parameters but `Path` expects {expected}")]
    ParamCount {
        /// Captured, non-empty parameters.
        got: usize,
        /// Values `T` asks for.
        expected: usize,
    },

    /// A named value does not parse as its field's type.
    #[error("cannot parse `{key}` value `{value}` as `{expected_type}`")]
    InvalidValue {
        key: String,
        value: String,
        expected_type: &'static str,
    },

    /// A positional value does not parse as its element's type.
    #[error("cannot parse parameter {index} value `{value}` as `{expected_type}`")]
    InvalidValueAt {
        index: usize,
        value: String,
        expected_type: &'static str,
    },

    /// A value is not UTF-8 once percent-decoded.
    #[error("`{key}` is not valid UTF-8 once percent-decoded")]
    InvalidUtf8 { key: String },

    /// `T` has a shape a path segment cannot fill, such as a nested map.
    #[error("`Path` cannot deserialize into `{name}`")]
    Unsupported { name: &'static str },

    /// Anything else serde reports, such as an unknown enum variant.
    #[error("{0}")]
    Custom(String),
}

impl ErrorKind {
    /// Count and shape mismatches come from the handler's choice of `T`,
    /// so they are server errors.
    const fn is_client_error(&self) -> bool {
        !matches!(self, Self::ParamCount { .. } | Self::Unsupported { .. })
    }
}

impl serde::de::Error for ErrorKind {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}

/// Rejection for the [`Path`] extractor.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PathRejection {
    /// The parameters did not deserialize into `T`.
    #[error(transparent)]
    Params(#[from] ErrorKind),
    /// The request was not dispatched by [`Router`](crate::Router).
    #[error("no path parameters were recorded for this request")]
    Missing,
}

impl PathRejection {
    /// The deserialization failure, if that is the cause.
    #[must_use]
    pub const fn kind(&self) -> Option<&ErrorKind> {
        match self {
            Self::Params(kind) => Some(kind),
            Self::Missing => None,
        }
    }

    /// `400` when the URL is at fault, `500` when the handler is.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Params(kind) if kind.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The response body.
    #[must_use]
    pub fn body_text(&self) -> String {
        if self.status() == StatusCode::BAD_REQUEST {
            format!("Invalid URL: {self}")
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for PathRejection {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self, "rejected path parameters");
        (self.status(), self.body_text()).into_response()
    }
}
