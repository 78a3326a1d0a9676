//! Request header sets.

use std::collections::BTreeSet;

/// Header lines in `"Key: Value"` form. Exact duplicates collapse.
///
/// [`HeaderSet::default`] holds the JSON headers sent when a caller does not
/// pick its own; [`HeaderSet::new`] is empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderSet {
    lines: BTreeSet<String>,
}

impl HeaderSet {
    pub fn new() -> Self {
        Self {
            lines: BTreeSet::new(),
        }
    }

    /// Add a header line. Returns `false` when the exact line was already present.
    pub fn insert(&mut self, line: impl Into<String>) -> bool {
        self.lines.insert(line.into())
    }

    pub fn contains(&self, line: &str) -> bool {
        self.lines.contains(line)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Default for HeaderSet {
    fn default() -> Self {
        [
            "Content-Type: application/json",
            "Accept: application/json",
            "Accept-Charset: utf-8",
        ]
        .into_iter()
        .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for HeaderSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for HeaderSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.lines.extend(iter.into_iter().map(Into::into));
    }
}

impl<const N: usize> From<[&str; N]> for HeaderSet {
    fn from(lines: [&str; N]) -> Self {
        lines.into_iter().collect()
    }
}
