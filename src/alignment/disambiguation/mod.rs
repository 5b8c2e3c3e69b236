use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Serialize;

use crate::alignment::ledger::MatchLedger;
use crate::config::DisambiguationConfig;
use crate::error::AlignmentError;

mod occurrences;
mod patterns;

pub use occurrences::{ConnectorOccurrences, OccurrenceClassification, OccurrenceClassifier};

use patterns::CandidateRules;

/// Ledger rows (equivalents) to remove before export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DropList {
    rows: BTreeSet<String>,
}

impl DropList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, row: impl Into<String>) -> bool {
        self.rows.insert(row.into())
    }

    pub fn contains(&self, row: &str) -> bool {
        self.rows.contains(row)
    }

    pub fn union(&mut self, other: &DropList) {
        self.rows.extend(other.rows.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for DropList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Why a candidate was kept or dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateEvidence {
    pub candidate: String,
    /// Support pattern matches, counted up to `c_filter`.
    pub support: usize,
    /// Lexical pattern matches, counted up to `p_filter + 1`.
    pub lexical: usize,
    pub dropped: bool,
}

/// The candidate list for post-alignment disambiguation: every ledger row key.
pub fn candidates(ledger: &MatchLedger) -> Vec<&str> {
    ledger.row_keys().into_iter().collect()
}

/// Post-alignment filter over the target corpus.
///
/// A candidate is dropped when it appears in the support patterns fewer than
/// `c_filter` times, or in the lexical patterns more than `p_filter` times.
/// The empty candidate ("no equivalent") is never dropped.
#[derive(Debug, Clone)]
pub struct ContextDisambiguator {
    config: DisambiguationConfig,
}

impl ContextDisambiguator {
    pub fn new(config: DisambiguationConfig) -> Result<Self, AlignmentError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DisambiguationConfig {
        &self.config
    }

    pub fn disambiguate<S: AsRef<str>>(
        &self,
        target_path: &Path,
        candidates: &[S],
    ) -> Result<DropList, AlignmentError> {
        let file = File::open(target_path)
            .map_err(|e| AlignmentError::io("opening context corpus", target_path, e))?;
        self.disambiguate_reader(BufReader::new(file), candidates)
    }

    pub fn disambiguate_reader<R: BufRead, S: AsRef<str>>(
        &self,
        reader: R,
        candidates: &[S],
    ) -> Result<DropList, AlignmentError> {
        let evidence = self.evaluate_reader(reader, candidates)?;
        Ok(evidence
            .into_iter()
            .filter(|e| e.dropped)
            .map(|e| e.candidate)
            .collect())
    }

    /// Count pattern evidence for every non-empty candidate in one pass over `reader`.
    pub fn evaluate_reader<R: BufRead, S: AsRef<str>>(
        &self,
        reader: R,
        candidates: &[S],
    ) -> Result<Vec<CandidateEvidence>, AlignmentError> {
        let unique: BTreeSet<&str> = candidates
            .iter()
            .map(|c| c.as_ref())
            .filter(|c| !c.is_empty())
            .collect();
        let mut rules = unique
            .into_iter()
            .map(|candidate| {
                CandidateRules::new(
                    candidate,
                    &self.config.support_patterns,
                    &self.config.lexical_patterns,
                    self.config.c_filter,
                    self.config.p_filter,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut line_count = 0usize;
        for line in reader.lines() {
            let line = line.map_err(|e| AlignmentError::read("reading context corpus", e))?;
            let line = line.trim();
            for rule in &mut rules {
                rule.observe(line);
            }
            line_count += 1;
        }

        let evidence: Vec<CandidateEvidence> = rules
            .into_iter()
            .map(|rule| {
                let dropped = rule.lacks_support() || rule.is_lexical();
                if dropped {
                    tracing::debug!(
                        candidate = %rule.candidate,
                        support = rule.support_count,
                        lexical = rule.lexical_count,
                        "disambiguation: candidate dropped"
                    );
                }
                CandidateEvidence {
                    candidate: rule.candidate,
                    support: rule.support_count,
                    lexical: rule.lexical_count,
                    dropped,
                }
            })
            .collect();

        tracing::info!(
            lines = line_count,
            candidates = evidence.len(),
            dropped = evidence.iter().filter(|e| e.dropped).count(),
            "disambiguation: context scan complete"
        );
        Ok(evidence)
    }
}
