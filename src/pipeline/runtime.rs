use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::alignment::disambiguation::OccurrenceClassification;
use crate::alignment::external::ExternalResultParser;
use crate::alignment::ledger::MatchLedger;
use crate::alignment::tokenization::casefold;
use crate::error::AlignmentError;
use crate::pipeline::traits::{Aligner, AlignmentObserver, AlignmentPass, Tokenizer};
use crate::types::ConnectorSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelCorpus {
    pub source: PathBuf,
    pub target: PathBuf,
}

impl ParallelCorpus {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn checked_line_count(&self) -> Result<usize, AlignmentError> {
        let source_lines = count_lines(&self.source)?;
        let target_lines = count_lines(&self.target)?;
        if source_lines != target_lines {
            return Err(AlignmentError::mismatch(source_lines, target_lines));
        }
        Ok(source_lines)
    }

    fn open(&self) -> Result<(BufReader<File>, BufReader<File>), AlignmentError> {
        let source = File::open(&self.source)
            .map_err(|e| AlignmentError::io("opening source corpus", &self.source, e))?;
        let target = File::open(&self.target)
            .map_err(|e| AlignmentError::io("opening target corpus", &self.target, e))?;
        Ok((BufReader::new(source), BufReader::new(target)))
    }
}

/// Number of lines `BufRead::lines` would yield, without decoding.
pub fn count_lines(path: &Path) -> Result<usize, AlignmentError> {
    let file = File::open(path).map_err(|e| AlignmentError::io("counting lines of", path, e))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut count = 0usize;
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| AlignmentError::io("counting lines of", path, e))?;
        if read == 0 {
            return Ok(count);
        }
        count += 1;
    }
}

pub struct ConnectorAligner {
    source_connectors: ConnectorSet,
    tokenizer: Box<dyn Tokenizer>,
    aligner: Box<dyn Aligner>,
    occurrence_filter: Option<OccurrenceClassification>,
}

pub(crate) struct ConnectorAlignerParts {
    pub source_connectors: ConnectorSet,
    pub tokenizer: Box<dyn Tokenizer>,
    pub aligner: Box<dyn Aligner>,
    pub occurrence_filter: Option<OccurrenceClassification>,
}

impl ConnectorAligner {
    pub(crate) fn from_parts(parts: ConnectorAlignerParts) -> Self {
        Self {
            source_connectors: parts.source_connectors,
            tokenizer: parts.tokenizer,
            aligner: parts.aligner,
            occurrence_filter: parts.occurrence_filter,
        }
    }

    pub fn align_files(
        &self,
        corpus: &ParallelCorpus,
        observer: &mut dyn AlignmentObserver,
    ) -> Result<MatchLedger, AlignmentError> {
        let line_count = corpus.checked_line_count()?;
        tracing::info!(
            source = %corpus.source.display(),
            target = %corpus.target.display(),
            lines = line_count,
            "alignment: starting corpus pass"
        );
        observer.on_pass_started(line_count);
        let (source, target) = corpus.open()?;
        self.align_readers(source, target, observer)
    }

    // A stream that ends before the other is a `CorpusMismatch`; no ledger is returned.
    pub fn align_readers<S: BufRead, T: BufRead>(
        &self,
        source: S,
        target: T,
        observer: &mut dyn AlignmentObserver,
    ) -> Result<MatchLedger, AlignmentError> {
        let mut ledger = MatchLedger::new();
        let mut occurrences: HashMap<String, usize> = HashMap::new();
        let mut source_lines = source.lines();
        let mut target_lines = target.lines();
        let mut line_no = 0usize;
        let mut no_matches = 0usize;
        let mut skipped = 0usize;

        loop {
            let (source_line, target_line) = match (source_lines.next(), target_lines.next()) {
                (None, None) => break,
                (Some(s), Some(t)) => (s, t),
                (Some(_), None) => return Err(AlignmentError::mismatch(line_no + 1, line_no)),
                (None, Some(_)) => return Err(AlignmentError::mismatch(line_no, line_no + 1)),
            };
            line_no += 1;
            let source_line =
                source_line.map_err(|e| AlignmentError::read("reading source corpus", e))?;
            let target_line =
                target_line.map_err(|e| AlignmentError::read("reading target corpus", e))?;

            let source_tokens = self.tokenizer.tokenize(&casefold(&source_line));
            let target_tokens = self.tokenizer.tokenize(&casefold(&target_line));

            for (position, token) in source_tokens.iter().enumerate() {
                if !self.source_connectors.contains(token) {
                    continue;
                }
                if let Some(filter) = &self.occurrence_filter {
                    let seen = occurrences.entry(token.clone()).or_insert(0);
                    let index = *seen;
                    *seen += 1;
                    if filter.is_non_connector(token, index) {
                        skipped += 1;
                        tracing::trace!(
                            line = line_no,
                            connector = %token,
                            occurrence = index,
                            "alignment: skipping non-connector occurrence"
                        );
                        continue;
                    }
                }

                let equivalent = self.aligner.align(&source_tokens, &target_tokens, position);
                ledger.note_match(token, &equivalent);
                if equivalent.is_empty() {
                    no_matches += 1;
                    tracing::debug!(line = line_no, connector = %token, "alignment: no match");
                    observer.on_no_match(token, line_no);
                }
            }
            observer.on_line_processed(line_no);
        }

        tracing::info!(
            lines = line_no,
            no_matches,
            skipped,
            "alignment: corpus pass complete"
        );
        Ok(ledger)
    }
}

pub struct CorpusAlignment {
    aligner: ConnectorAligner,
    corpus: ParallelCorpus,
}

impl CorpusAlignment {
    pub fn new(aligner: ConnectorAligner, corpus: ParallelCorpus) -> Self {
        Self { aligner, corpus }
    }

    pub fn corpus(&self) -> &ParallelCorpus {
        &self.corpus
    }
}

impl AlignmentPass for CorpusAlignment {
    fn run(&self, observer: &mut dyn AlignmentObserver) -> Result<MatchLedger, AlignmentError> {
        self.aligner.align_files(&self.corpus, observer)
    }
}

pub struct ExternalAlignment {
    parser: ExternalResultParser,
    result_path: PathBuf,
}

impl ExternalAlignment {
    pub fn new(parser: ExternalResultParser, result_path: impl Into<PathBuf>) -> Self {
        Self {
            parser,
            result_path: result_path.into(),
        }
    }
}

impl AlignmentPass for ExternalAlignment {
    fn run(&self, observer: &mut dyn AlignmentObserver) -> Result<MatchLedger, AlignmentError> {
        tracing::info!(
            path = %self.result_path.display(),
            "alignment: reading external result file"
        );
        observer.on_pass_started(count_lines(&self.result_path)?);
        self.parser.parse_file(&self.result_path, observer)
    }
}
