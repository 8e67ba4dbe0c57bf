// ==============================================================================
// Template Segments
// ==============================================================================
//
// A route template is a `/`-separated list of segments. Both the compiler and
// the injector look at one segment at a time, so the classification lives
// here and is shared:
//
//   books          -> Static
//   :title         -> Param { name: "title" }
//   :title?        -> Param { optional }
//   :title.mp4     -> Param { suffix: ".mp4" }
//   :id(\d+)       -> Param { matcher: "\d+" }
//   *  /  *?       -> Wildcard
//
// Templates are trusted input. Malformed segments still parse into
// *something*; nothing here validates.

/// One classified segment of a route template.
#[allow(clippy::redundant_pub_crate)] // Explicit crate visibility on private-module item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    /// Nothing between two slashes (or a leading/trailing slash).
    Empty,
    /// Literal text, matched verbatim.
    Static(&'a str),
    /// A `:name` parameter.
    Param(Param<'a>),
    /// `*` or `*?`, capturing the rest of the path.
    Wildcard {
        /// `true` for `*?`.
        optional: bool,
    },
}

/// The pieces of a `:name` segment.
#[allow(clippy::redundant_pub_crate)] // Explicit crate visibility on private-module item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Param<'a> {
    pub(crate) name: &'a str,
    pub(crate) optional: bool,
    /// Body of a `(...)` group directly after the name.
    pub(crate) matcher: Option<&'a str>,
    /// Literal text from the first `.` after the name, dot included.
    pub(crate) suffix: Option<&'a str>,
}

impl<'a> Segment<'a> {
    #[allow(clippy::redundant_pub_crate)] // Explicit crate visibility on private-module item.
    pub(crate) fn parse(raw: &'a str) -> Self {
        if raw.is_empty() {
            return Self::Empty;
        }

        if let Some(rest) = raw.strip_prefix('*') {
            return Self::Wildcard {
                optional: rest.starts_with('?'),
            };
        }

        raw.strip_prefix(':')
            .map_or(Self::Static(raw), |body| Self::Param(Param::parse(body)))
    }
}

// ==============================================================================
// Param scanner
// ==============================================================================

/// Where the scanner is inside a `:name...` segment body.
#[derive(Clone, Copy, Debug)]
enum State {
    /// Reading the parameter name.
    Name,
    /// Inside a `(...)` sub-pattern. `open` is the byte offset just past the
    /// opening paren; `depth` counts nested parens.
    Matcher { open: usize, depth: usize },
    /// Past the name (and sub-pattern), waiting for `?` or `.`.
    Modifiers,
}

impl<'a> Param<'a> {
    /// Scans the text after the leading `:`.
    fn parse(body: &'a str) -> Self {
        let mut state = State::Name;
        let mut name_end = body.len();
        let mut matcher = None;
        let mut optional = false;
        let mut suffix = None;

        for (at, ch) in body.char_indices() {
            state = match (state, ch) {
                (State::Name, '(') => {
                    name_end = at;
                    State::Matcher {
                        open: at + 1,
                        depth: 0,
                    }
                }
                (State::Name, '?') => {
                    name_end = at;
                    optional = true;
                    State::Modifiers
                }
                (State::Name | State::Modifiers, '.') => {
                    if matches!(state, State::Name) {
                        name_end = at;
                    }
                    suffix = Some(&body[at..]);
                    break;
                }
                (State::Name, _) => State::Name,
                (State::Matcher { open, depth }, '(') => State::Matcher {
                    open,
                    depth: depth + 1,
                },
                (State::Matcher { open, depth: 0 }, ')') => {
                    matcher = Some(&body[open..at]);
                    State::Modifiers
                }
                (State::Matcher { open, depth }, ')') => State::Matcher {
                    open,
                    depth: depth - 1,
                },
                (State::Matcher { .. }, _) => state,
                (State::Modifiers, '?') => {
                    optional = true;
                    State::Modifiers
                }
                // Stray text between the modifiers and a suffix is dropped.
                (State::Modifiers, _) => State::Modifiers,
            };
        }

        // Unterminated group: take everything after the `(`.
        if let State::Matcher { open, .. } = state {
            matcher = Some(&body[open..]);
        }

        Self {
            name: &body[..name_end],
            optional,
            matcher,
            suffix,
        }
    }
}

/// Splits a template into its segments, dropping the leading empty segment
/// produced by a leading `/`.
#[allow(clippy::redundant_pub_crate)] // Explicit crate visibility on private-module item.
pub(crate) fn segments(template: &str) -> impl Iterator<Item = Segment<'_>> {
    let mut raw = template.split('/').peekable();
    if raw.peek().is_some_and(|first| first.is_empty()) {
        raw.next();
    }
    raw.map(Segment::parse)
}
