// ==============================================================================
// Template Compiler
// ==============================================================================
//
// Turns a route template into an ordered key list and a case-insensitive,
// start-anchored regex:
//
//   /books              -> ^/books/?$
//   /books/:title       -> ^/books/([^/]+?)/?$
//   /books/:title?      -> ^/books(?:/([^/]+?))?/?$
//   /movies/:title.mp4  -> ^/movies/([^/]+?)\.mp4/?$
//   /books/*            -> ^/books/(.*)/?$
//
// Loose mode swaps the `/?$` ending for `(/|$)` so the route also matches
// as a prefix of longer paths.

use std::borrow::Cow;

use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use crate::{
    error::Error,
    params::Params,
    pattern::Pattern,
    segment::{self, Param, Segment},
};

/// The key recorded for a `*` wildcard segment.
pub const WILDCARD_KEY: &str = "wild";

/// Sub-pattern for a parameter without a custom `(...)` group.
const SEGMENT: &str = "[^/]+?";

const STRICT_END: &str = "/?$";
const LOOSE_END: &str = "(/|$)";

// ==============================================================================
// Inputs
// ==============================================================================

/// A route definition: a template string or a ready-made regex.
#[derive(Clone, Debug)]
pub enum Route<'a> {
    /// A template such as `/books/:title?`.
    Template(&'a str),
    /// A pre-built matcher. It is used as-is; its parameter names cannot be
    /// recovered, so [`parse`] reports [`Keys::Unknown`].
    Regex(Regex),
}

impl<'a> From<&'a str> for Route<'a> {
    fn from(template: &'a str) -> Self {
        Self::Template(template)
    }
}

impl<'a> From<&'a String> for Route<'a> {
    fn from(template: &'a String) -> Self {
        Self::Template(template)
    }
}

impl From<Regex> for Route<'_> {
    fn from(regex: Regex) -> Self {
        Self::Regex(regex)
    }
}

/// How the end of a route is matched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// The path must end after the route, with at most one trailing `/`.
    #[default]
    Strict,
    /// The route may be followed by `/` and anything else.
    Loose,
}

// ==============================================================================
// Output
// ==============================================================================

/// Parameter names of a parsed route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Keys {
    /// Names in template order. Wildcards appear as [`WILDCARD_KEY`].
    Named(Vec<String>),
    /// The route was a pre-built regex, so the names are not known.
    Unknown,
}

impl Keys {
    /// The names, or `None` for [`Keys::Unknown`].
    #[must_use]
    pub fn as_slice(&self) -> Option<&[String]> {
        match self {
            Self::Named(names) => Some(names),
            Self::Unknown => None,
        }
    }

    /// Returns `true` for [`Keys::Unknown`].
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

/// A compiled route: its parameter names and its matcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parsed {
    /// Parameter names, in the order their groups appear in `pattern`.
    pub keys: Keys,
    /// The matcher.
    pub pattern: Pattern,
}

impl Parsed {
    /// Matches `path` and pairs each captured value with its key.
    ///
    /// Parameters whose group did not participate, or captured nothing, are
    /// left out. For [`Keys::Unknown`] the regex's named groups are used.
    ///
    /// ```rust
    /// use axum_pathpattern::{Mode, parse};
    ///
    /// let parsed = parse("/books/:genre/:title?", Mode::Strict)?;
    /// let params = parsed.exec("/books/horror").expect("matches");
    /// assert_eq!(params.get("genre"), Some("horror"));
    /// assert_eq!(params.get("title"), None);
    /// # Ok::<(), axum_pathpattern::Error>(())
    /// ```
    #[must_use]
    pub fn exec<'p>(&self, path: &'p str) -> Option<Params<'_, 'p>> {
        let captures = self.pattern.exec(path)?;

        Some(match &self.keys {
            Keys::Named(names) => Params::from_keys(names, &captures),
            Keys::Unknown => Params::from_named_groups(&self.pattern, &captures),
        })
    }
}

// ==============================================================================
// parse
// ==============================================================================

/// Compiles a route into its keys and matcher.
///
/// Templates are `/`-separated; a leading `/` is optional. Segments may be
/// literals, `:name`, `:name?`, `:name.ext`, `:name(sub-pattern)`, `*` or
/// `*?`. Literal text is inserted into the regex unescaped.
///
/// A [`Route::Regex`] comes back untouched with [`Keys::Unknown`]; `mode` is
/// ignored for it.
///
/// ```rust
/// use axum_pathpattern::{Keys, Mode, parse};
///
/// let parsed = parse("/books/:title", Mode::Strict)?;
/// assert_eq!(parsed.keys, Keys::Named(vec!["title".to_owned()]));
/// assert!(parsed.pattern.is_match("/books/narnia/"));
/// assert!(!parsed.pattern.is_match("/books/narnia/reviews"));
///
/// let loose = parse("/books", Mode::Loose)?;
/// assert!(loose.pattern.is_match("/books/narnia/reviews"));
/// # Ok::<(), axum_pathpattern::Error>(())
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidPattern`] if the generated pattern is not a valid
/// regex. This only happens when literal text or a custom sub-pattern in the
/// template carries broken regex syntax.
pub fn parse<'a>(route: impl Into<Route<'a>>, mode: Mode) -> Result<Parsed, Error> {
    let template = match route.into() {
        Route::Regex(regex) => {
            return Ok(Parsed {
                keys: Keys::Unknown,
                pattern: Pattern::opaque(regex),
            });
        }
        Route::Template(template) => template,
    };

    let (keys, mut source) = translate(template);
    source.push_str(match mode {
        Mode::Strict => STRICT_END,
        Mode::Loose => LOOSE_END,
    });

    tracing::trace!(template, pattern = %source, ?mode, "compiled route template");

    let regex = RegexBuilder::new(&source)
        .case_insensitive(true)
        .build()
        .map_err(|source| Error::InvalidPattern {
            template: template.to_owned(),
            source,
        })?;

    let pattern = match mode {
        Mode::Strict => Pattern::strict(regex),
        Mode::Loose => Pattern::loose(regex),
    };

    Ok(Parsed {
        keys: Keys::Named(keys),
        pattern,
    })
}

/// Builds the key list and the regex source, minus its terminator.
fn translate(template: &str) -> (Vec<String>, String) {
    let mut keys = Vec::new();
    let mut source = String::with_capacity(template.len() * 2 + 8);
    source.push('^');

    for segment in segment::segments(template) {
        match segment {
            Segment::Empty => {}
            Segment::Static(text) => {
                source.push('/');
                source.push_str(text);
            }
            Segment::Wildcard { optional } => {
                keys.push(WILDCARD_KEY.to_owned());
                source.push_str(if optional { "(?:/(.*))?" } else { "/(.*)" });
            }
            Segment::Param(param) => {
                keys.push(param.name.to_owned());
                push_param(&mut source, &param);
            }
        }
    }

    (keys, source)
}

fn push_param(source: &mut String, param: &Param<'_>) {
    // Groups inside a custom sub-pattern must not shift the keys after it.
    let sub = param.matcher.map_or(Cow::Borrowed(SEGMENT), non_capturing);

    match (param.optional, param.suffix) {
        // `:name?` drops the whole segment, slash included.
        (true, None) => {
            source.push_str("(?:/(");
            source.push_str(&sub);
            source.push_str("))?");
        }
        (optional, suffix) => {
            source.push_str("/(");
            source.push_str(&sub);
            source.push(')');
            // `:name?.ext` makes the value optional but keeps the extension.
            if optional {
                source.push('?');
            }
            if let Some(suffix) = suffix {
                // The suffix always starts with the `.` that introduced it.
                source.push_str(r"\.");
                source.push_str(&non_capturing(&suffix[1..]));
            }
        }
    }
}

/// Rewrites plain and named groups as `(?:` so that only the group wrapping
/// a parameter captures. Escapes, character classes and flag groups such as
/// `(?i:...)` are left alone.
fn non_capturing(text: &str) -> Cow<'_, str> {
    if !text.contains('(') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 4);
    let mut chars = text.chars().peekable();
    let mut escaped = false;
    let mut in_class = false;

    while let Some(ch) = chars.next() {
        out.push(ch);
        match ch {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '[' => in_class = true,
            ']' => in_class = false,
            '(' if !in_class => {
                if chars.peek() != Some(&'?') {
                    out.push_str("?:");
                    continue;
                }
                // `(?<name>` and `(?P<name>` lose their name.
                let mut ahead = chars.clone();
                ahead.next();
                if ahead.peek() == Some(&'P') {
                    ahead.next();
                }
                if ahead.next() == Some('<') && !matches!(ahead.peek(), Some('=' | '!')) {
                    out.push_str("?:");
                    chars = ahead;
                    for skipped in chars.by_ref() {
                        if skipped == '>' {
                            break;
                        }
                    }
                }
            }
            _ => {}
        }
    }

    Cow::Owned(out)
}
