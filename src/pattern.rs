// ==============================================================================
// Pattern -- the compiled matcher
// ==============================================================================
//
// A thin wrapper over `regex::Regex`. The `regex` engine has no lookaround,
// so loose-mode patterns end in a real group, `(/|$)`, instead of a
// lookahead. `Pattern` hides that trailing group: callers only ever see the
// capture groups that came from the template, and the reported match ends
// where the terminator begins.

use std::fmt;

use regex::Regex;

/// How a pattern terminates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tail {
    /// `/?$`: an optional trailing slash, then end of path.
    Strict,
    /// `(/|$)`: the path may continue after a `/`. The terminator is the last
    /// capture group.
    Loose,
    /// A caller-supplied regex; nothing is known about its ending.
    Opaque,
}

/// A compiled route matcher.
///
/// Produced by [`parse`](crate::parse), either from a template or by wrapping
/// a caller-supplied [`Regex`] unchanged.
///
/// ```rust
/// use axum_pathpattern::{Mode, parse};
///
/// let parsed = parse("/books/:title", Mode::Strict)?;
/// let caps = parsed.pattern.exec("/books/narnia/").expect("matches");
/// assert_eq!(caps.get(1), Some("narnia"));
/// # Ok::<(), axum_pathpattern::Error>(())
/// ```
#[derive(Clone)]
pub struct Pattern {
    regex: Regex,
    tail: Tail,
}

impl Pattern {
    #[allow(clippy::redundant_pub_crate)] // Explicit crate visibility on private-module item.
    pub(crate) const fn strict(regex: Regex) -> Self {
        Self {
            regex,
            tail: Tail::Strict,
        }
    }

    #[allow(clippy::redundant_pub_crate)] // Explicit crate visibility on private-module item.
    pub(crate) const fn loose(regex: Regex) -> Self {
        Self {
            regex,
            tail: Tail::Loose,
        }
    }

    #[allow(clippy::redundant_pub_crate)] // Explicit crate visibility on private-module item.
    pub(crate) const fn opaque(regex: Regex) -> Self {
        Self {
            regex,
            tail: Tail::Opaque,
        }
    }

    /// Returns `true` if `path` matches.
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Matches `path` and returns its capture groups.
    #[must_use]
    pub fn exec<'p>(&self, path: &'p str) -> Option<Captures<'p>> {
        let inner = self.regex.captures(path)?;
        let whole = inner.get(0)?;

        let end = match self.tail {
            Tail::Loose => inner
                .get(self.tail_index())
                .map_or(whole.end(), |terminator| terminator.start()),
            Tail::Strict | Tail::Opaque => whole.end(),
        };

        Some(Captures {
            matched: &path[whole.start()..end],
            end,
            groups: self.captures_len(),
            inner,
        })
    }

    /// The number of capture groups visible to callers, not counting the
    /// implicit whole-match group.
    #[must_use]
    pub fn captures_len(&self) -> usize {
        match self.tail {
            Tail::Loose => self.regex.captures_len().saturating_sub(2),
            Tail::Strict | Tail::Opaque => self.regex.captures_len().saturating_sub(1),
        }
    }

    /// Returns `true` if the pattern was compiled in loose (prefix) mode.
    #[must_use]
    pub fn is_loose(&self) -> bool {
        self.tail == Tail::Loose
    }

    /// The regex source this pattern was built from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// The underlying regex.
    #[must_use]
    pub const fn as_regex(&self) -> &Regex {
        &self.regex
    }

    /// Names of the regex's named capture groups, in group order.
    #[allow(clippy::redundant_pub_crate)] // Explicit crate visibility on private-module item.
    pub(crate) fn group_names(&self) -> impl Iterator<Item = (usize, &str)> {
        self.regex
            .capture_names()
            .enumerate()
            .take(self.captures_len() + 1)
            .filter_map(|(index, name)| name.map(|name| (index, name)))
    }

    fn tail_index(&self) -> usize {
        self.regex.captures_len() - 1
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("source", &self.regex.as_str())
            .field("tail", &self.tail)
            .finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.regex.as_str())
    }
}

/// Two patterns are equal when they were built from the same source in the
/// same mode.
impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.tail == other.tail && self.regex.as_str() == other.regex.as_str()
    }
}

impl Eq for Pattern {}

// ==============================================================================
// Captures
// ==============================================================================

/// The result of running a [`Pattern`] against a path.
#[derive(Debug)]
pub struct Captures<'p> {
    inner: regex::Captures<'p>,
    matched: &'p str,
    end: usize,
    groups: usize,
}

impl<'p> Captures<'p> {
    /// The matched portion of the path.
    ///
    /// In loose mode this stops before the `/` that separates the route from
    /// the rest of the path.
    #[must_use]
    pub const fn as_str(&self) -> &'p str {
        self.matched
    }

    /// Byte offset in the path where the match ends.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// The text of capture group `index` (1-based), if it participated and
    /// is visible to callers.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&'p str> {
        if index == 0 || index > self.groups {
            return None;
        }
        self.inner.get(index).map(|m| m.as_str())
    }

    /// The text of a named capture group.
    #[must_use]
    pub fn name(&self, name: &str) -> Option<&'p str> {
        self.inner.name(name).map(|m| m.as_str())
    }

    /// Number of visible capture groups.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.groups
    }

    /// Returns `true` if the pattern has no capture groups.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.groups == 0
    }

    /// Iterates over the visible groups in order, `None` for groups that did
    /// not participate.
    pub fn iter(&self) -> impl Iterator<Item = Option<&'p str>> + '_ {
        (1..=self.groups).map(|index| self.get(index))
    }
}
