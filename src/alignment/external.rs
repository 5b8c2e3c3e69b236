use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::alignment::ledger::MatchLedger;
use crate::alignment::tokenization::casefold;
use crate::config::RecordPolicy;
use crate::error::AlignmentError;
use crate::pipeline::traits::AlignmentObserver;
use crate::types::ConnectorSet;

const RECORD_MARKER: &str = "NULL";
const GROUP_OPEN: &str = "({";
const GROUP_CLOSE: &str = "})";

/// Reads connector equivalents back from a GIZA++-style `A3.final` file.
///
/// Each sentence pair is three lines: a `#` metadata line, the target
/// sentence, and an alignment record starting with `NULL` that lists every
/// source word followed by `({ i j ... })`, the 1-based target positions it
/// is aligned to.
#[derive(Debug, Clone)]
pub struct ExternalResultParser {
    connectors: ConnectorSet,
    policy: RecordPolicy,
}

impl ExternalResultParser {
    pub fn new(connectors: ConnectorSet, policy: RecordPolicy) -> Self {
        Self { connectors, policy }
    }

    pub fn parse_file(
        &self,
        path: &Path,
        observer: &mut dyn AlignmentObserver,
    ) -> Result<MatchLedger, AlignmentError> {
        let file = File::open(path)
            .map_err(|e| AlignmentError::io("opening external alignment result", path, e))?;
        self.parse_reader(BufReader::new(file), observer)
    }

    pub fn parse_reader<R: BufRead>(
        &self,
        reader: R,
        observer: &mut dyn AlignmentObserver,
    ) -> Result<MatchLedger, AlignmentError> {
        let mut ledger = MatchLedger::new();
        let mut target: Option<Vec<String>> = None;
        let mut records = 0usize;
        let mut skipped = 0usize;

        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line
                .map_err(|e| AlignmentError::read("reading external alignment result", e))?;

            if line.starts_with('#') {
                observer.on_line_processed(line_no);
                continue;
            }

            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.first() != Some(&RECORD_MARKER) {
                target = Some(tokens.iter().map(|t| t.to_string()).collect());
                observer.on_line_processed(line_no);
                continue;
            }

            records += 1;
            let parsed = match target.take() {
                Some(target_tokens) => self.parse_record(&tokens, &target_tokens),
                None => Err("alignment record without a preceding target sentence".to_string()),
            };
            match parsed {
                Ok(matches) => {
                    for (connector, equivalent) in matches {
                        ledger.note_match(&connector, &equivalent);
                        if equivalent.is_empty() {
                            tracing::debug!(
                                line = line_no,
                                connector = %connector,
                                "external: no match"
                            );
                            observer.on_no_match(&connector, line_no);
                        }
                    }
                }
                Err(message) => match self.policy {
                    RecordPolicy::Strict => {
                        return Err(AlignmentError::malformed(line_no, message));
                    }
                    RecordPolicy::BestEffort => {
                        skipped += 1;
                        tracing::warn!(
                            line = line_no,
                            error = %message,
                            "external: skipping malformed record"
                        );
                    }
                },
            }
            observer.on_line_processed(line_no);
        }

        tracing::info!(
            records,
            skipped,
            connectors = ledger.connectors().count(),
            "external: result file parsed"
        );
        Ok(ledger)
    }

    /// All (connector, equivalent) pairs of one record, or why it is malformed.
    fn parse_record(
        &self,
        tokens: &[&str],
        target: &[String],
    ) -> Result<Vec<(String, String)>, String> {
        let mut matches = Vec::new();
        let mut i = 1;
        while i < tokens.len() {
            let word = casefold(tokens[i]);
            if !self.connectors.contains(&word) {
                i += 1;
                continue;
            }
            if tokens.get(i + 1) != Some(&GROUP_OPEN) {
                return Err(format!("missing '{GROUP_OPEN}' after '{}'", tokens[i]));
            }
            i += 2;

            let mut aligned: Vec<&str> = Vec::new();
            loop {
                match tokens.get(i) {
                    None => {
                        return Err(format!("index list of '{word}' is not closed"));
                    }
                    Some(&GROUP_CLOSE) => break,
                    Some(raw) => {
                        let index: usize = raw
                            .parse()
                            .map_err(|_| format!("non-numeric target index '{raw}'"))?;
                        if index == 0 || index > target.len() {
                            return Err(format!(
                                "target index {index} outside sentence of {} tokens",
                                target.len()
                            ));
                        }
                        aligned.push(&target[index - 1]);
                        i += 1;
                    }
                }
            }
            i += 1;
            matches.push((word, casefold(&aligned.join(" "))));
        }
        Ok(matches)
    }
}
