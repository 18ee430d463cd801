//! Identifier list parsing
//!
//! The back end stores many-to-many relations as delimited strings
//! (`"P1; P2"`, `"[\"AB12\",\"AB13\"]"`, `"F1/F2"`). [`IdList::parse`] turns
//! those into an ordered list of cleaned identifiers so every downstream
//! join works on tokens instead of raw strings.

use std::fmt;
use std::ops::Deref;

/// Characters accepted between two identifiers
const DELIMITERS: [char; 4] = [';', ',', '/', '|'];

/// Characters stripped from both ends of every token after whitespace trimming
const QUOTES: [char; 2] = ['"', '\''];

/// Ordered identifiers parsed from a delimited string.
///
/// Order of first appearance is kept and duplicates are kept too: the same
/// identifier may legitimately resolve in several display contexts, so
/// callers deduplicate on resolved names when they need to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdList(Vec<String>);

impl IdList {
    /// Parse a raw, possibly absent, identifier list.
    ///
    /// # Examples
    ///
    /// ```
    /// use companion_common::IdList;
    ///
    /// assert_eq!(IdList::parse(Some("A; B, C")).as_slice(), ["A", "B", "C"]);
    /// assert_eq!(IdList::parse(Some("[A/B|C]")).as_slice(), ["A", "B", "C"]);
    /// assert_eq!(IdList::parse(Some("'A', \"B\"")).as_slice(), ["A", "B"]);
    /// assert!(IdList::parse(None).is_empty());
    /// ```
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        if raw.trim().is_empty() {
            return Self::default();
        }

        let unwrapped = raw.replace(['[', ']'], "");
        let ids = unwrapped
            .split(DELIMITERS)
            .map(|token| token.trim().trim_matches(QUOTES))
            .filter(|token| !token.trim().is_empty())
            .map(str::to_string)
            .collect();

        Self(ids)
    }

    /// Identifiers as a slice
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Consume the list, returning the identifiers
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl Deref for IdList {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for IdList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a IdList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for IdList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("; "))
    }
}
