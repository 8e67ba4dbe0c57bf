// ==============================================================================
// Params -- keys zipped with captured values
// ==============================================================================

use crate::pattern::{Captures, Pattern};

/// Route parameters extracted from a matched path, in template order.
///
/// Values are the raw path text; no percent-decoding happens here. A
/// parameter that matched nothing (an absent optional segment, or a wildcard
/// over an empty remainder) is not listed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params<'k, 'p> {
    entries: Vec<(&'k str, &'p str)>,
}

impl<'k, 'p> Params<'k, 'p> {
    /// Pairs `keys[i]` with capture group `i + 1`.
    #[allow(clippy::redundant_pub_crate)] // Explicit crate visibility on private-module item.
    pub(crate) fn from_keys(keys: &'k [String], captures: &Captures<'p>) -> Self {
        let entries = keys
            .iter()
            .zip(captures.iter())
            .filter_map(|(key, value)| present(value).map(|value| (key.as_str(), value)))
            .collect();

        Self { entries }
    }

    /// Uses the named groups of an opaque regex.
    #[allow(clippy::redundant_pub_crate)] // Explicit crate visibility on private-module item.
    pub(crate) fn from_named_groups(pattern: &'k Pattern, captures: &Captures<'p>) -> Self {
        let entries = pattern
            .group_names()
            .filter_map(|(index, name)| present(captures.get(index)).map(|value| (name, value)))
            .collect();

        Self { entries }
    }

    /// The value for `key`, if it was captured.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'p str> {
        self.entries
            .iter()
            .find_map(|&(k, v)| (k == key).then_some(v))
    }

    /// Iterates over `(key, value)` pairs in template order.
    pub fn iter(&self) -> impl Iterator<Item = (&'k str, &'p str)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of captured parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'k, 'p> IntoIterator for Params<'k, 'p> {
    type Item = (&'k str, &'p str);
    type IntoIter = std::vec::IntoIter<(&'k str, &'p str)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Empty captures count as absent.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}
