//! Allow-lists — explicit enumerations of permitted names.
//!
//! An empty allow-list denies everything. There is no wildcard.
//! Names are compared after trimming and lowercasing, so `" Echo"` in a
//! config file permits the `echo` tool.

use std::collections::BTreeSet;

/// Normalize a tool or command name for allow-list comparison.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// An immutable, normalized set of permitted names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    names: BTreeSet<String>,
}

impl AllowList {
    /// Build an allow-list. Blank entries are dropped, duplicates collapse.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|n| normalize_name(n.as_ref()))
            .filter(|n| !n.is_empty())
            .collect();
        Self { names }
    }

    /// An allow-list that denies everything.
    pub fn deny_all() -> Self {
        Self::default()
    }

    /// True iff at least one name is permitted.
    pub fn is_configured(&self) -> bool {
        !self.names.is_empty()
    }

    pub fn allows(&self, name: &str) -> bool {
        self.names.contains(&normalize_name(name))
    }

    /// Keep only the permitted names, sorted ascending and deduplicated.
    pub fn filter<'a, I>(&self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let kept: BTreeSet<String> = names
            .into_iter()
            .map(normalize_name)
            .filter(|n| self.names.contains(n))
            .collect();
        kept.into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
