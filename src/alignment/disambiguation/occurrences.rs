use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use regex::Regex;

use crate::alignment::tokenization::{casefold, token_spans};
use crate::config::DisambiguationConfig;
use crate::error::AlignmentError;
use crate::types::ConnectorSet;

/// Occurrence statistics for one source connector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectorOccurrences {
    /// Every token occurrence in the corpus.
    pub total: usize,
    /// Occurrences with a single character and a space on both sides.
    pub bracketed: usize,
    /// 0-based occurrence indices classified as a non-connector reading.
    pub non_connector: BTreeSet<usize>,
}

/// Per-connector occurrence classification of a source corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccurrenceClassification {
    per_connector: BTreeMap<String, ConnectorOccurrences>,
}

impl OccurrenceClassification {
    /// Whether the `index`-th occurrence of `connector` should be skipped.
    pub fn is_non_connector(&self, connector: &str, index: usize) -> bool {
        self.per_connector
            .get(connector)
            .is_some_and(|occ| occ.non_connector.contains(&index))
    }

    pub fn get(&self, connector: &str) -> Option<&ConnectorOccurrences> {
        self.per_connector.get(connector)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConnectorOccurrences)> {
        self.per_connector.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn flagged_total(&self) -> usize {
        self.per_connector
            .values()
            .map(|occ| occ.non_connector.len())
            .sum()
    }
}

/// Classifies source connector occurrences by their immediate context.
pub struct OccurrenceClassifier {
    connectors: ConnectorSet,
    adjacency: HashMap<String, Regex>,
}

impl OccurrenceClassifier {
    pub fn new(
        connectors: &ConnectorSet,
        config: &DisambiguationConfig,
    ) -> Result<Self, AlignmentError> {
        let adjacency = connectors
            .iter()
            .map(|connector| {
                let pattern = format!(
                    "(?i)^{} {} {}$",
                    config.left_context,
                    regex::escape(connector),
                    config.right_context
                );
                Regex::new(&pattern)
                    .map(|re| (connector.to_string(), re))
                    .map_err(|e| AlignmentError::pattern(pattern, e))
            })
            .collect::<Result<HashMap<_, _>, _>>()?;
        Ok(Self {
            connectors: connectors.clone(),
            adjacency,
        })
    }

    pub fn classify_file(&self, path: &Path) -> Result<OccurrenceClassification, AlignmentError> {
        let file = File::open(path)
            .map_err(|e| AlignmentError::io("opening source corpus", path, e))?;
        self.classify(BufReader::new(file))
    }

    /// Scan `reader` once and classify every connector occurrence in corpus order.
    pub fn classify<R: BufRead>(
        &self,
        reader: R,
    ) -> Result<OccurrenceClassification, AlignmentError> {
        let mut per_connector: BTreeMap<String, ConnectorOccurrences> = self
            .connectors
            .iter()
            .map(|c| (c.to_string(), ConnectorOccurrences::default()))
            .collect();

        for line in reader.lines() {
            let line = line.map_err(|e| AlignmentError::read("reading source corpus", e))?;
            let folded = casefold(&line);
            for (start, end) in token_spans(&folded) {
                let token = &folded[start..end];
                let Some(occ) = per_connector.get_mut(token) else {
                    continue;
                };
                let index = occ.total;
                occ.total += 1;

                let Some((left, right)) = bracketing_chars(&folded, start, end) else {
                    continue;
                };
                occ.bracketed += 1;
                let snippet = format!("{left} {token} {right}");
                if self
                    .adjacency
                    .get(token)
                    .is_some_and(|re| re.is_match(&snippet))
                {
                    occ.non_connector.insert(index);
                }
            }
        }

        for (connector, occ) in &per_connector {
            tracing::debug!(
                connector = %connector,
                total = occ.total,
                bracketed = occ.bracketed,
                flagged = occ.non_connector.len(),
                "disambiguation: occurrences classified"
            );
        }
        Ok(OccurrenceClassification { per_connector })
    }
}

/// Characters at distance two on both sides of `line[start..end]`, when both
/// neighbours at distance one are spaces.
fn bracketing_chars(line: &str, start: usize, end: usize) -> Option<(char, char)> {
    let mut before = line[..start].chars().rev();
    let mut after = line[end..].chars();
    if before.next()? != ' ' || after.next()? != ' ' {
        return None;
    }
    Some((before.next()?, after.next()?))
}
