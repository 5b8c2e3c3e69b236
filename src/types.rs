use std::collections::HashSet;

use crate::alignment::tokenization::casefold;

/// Ordered, case-folded tokens of one corpus line. May be empty.
pub type Sentence = Vec<String>;

/// Known connectors for one language role.
///
/// Members are case-folded and whitespace-normalized on insertion, so a
/// phrase like `"On  the other hand"` is stored as `"on the other hand"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectorSet {
    members: HashSet<String>,
    max_window: usize,
}

impl ConnectorSet {
    pub fn new<I, S>(connectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let members: HashSet<String> = connectors
            .into_iter()
            .map(|c| normalize_connector(c.as_ref()))
            .filter(|c| !c.is_empty())
            .collect();
        let max_window = compute_max_window(members.iter().map(String::as_str));
        Self {
            members,
            max_window,
        }
    }

    pub fn contains(&self, candidate: &str) -> bool {
        self.members.contains(candidate)
    }

    /// Token count of the longest member; 1 for an empty set.
    pub fn max_window(&self) -> usize {
        self.max_window
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(String::as_str)
    }

    /// Members in lexicographic order, for stable reports.
    pub fn sorted(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.iter().collect();
        out.sort_unstable();
        out
    }
}

impl<S: AsRef<str>> FromIterator<S> for ConnectorSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Maximum space-separated word count across `connectors`, at least 1.
pub fn compute_max_window<'a>(connectors: impl IntoIterator<Item = &'a str>) -> usize {
    connectors
        .into_iter()
        .map(|c| c.split(' ').filter(|w| !w.is_empty()).count())
        .max()
        .unwrap_or(1)
        .max(1)
}

fn normalize_connector(raw: &str) -> String {
    casefold(raw).split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One "no equivalent found" outcome, reported through the observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoMatch {
    pub connector: String,
    /// 1-based corpus line (or record) number.
    pub line: usize,
}
