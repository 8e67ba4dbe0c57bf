// ==============================================================================
// Error
// ==============================================================================

/// Errors returned by [`parse`](crate::parse) and [`inject`](crate::inject).
///
/// Template translation itself never fails. The compiler only errors when the
/// regex engine rejects the generated pattern, which happens when a literal
/// segment or a custom sub-pattern carries broken regex syntax (e.g. an
/// unbalanced `(`).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The pattern generated from a template was rejected by the regex engine.
    #[error("route template `{template}` does not compile: {source}")]
    InvalidPattern {
        /// The template as given.
        template: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// The injection values could not be serialized.
    #[error("failed to serialize injection values: {0}")]
    Values(#[from] serde_json::Error),

    /// The injection values serialized to something other than a map.
    #[error("injection values must serialize to a map, got {found}")]
    ValuesNotAMap {
        /// The JSON kind that was found instead.
        found: &'static str,
    },
}
