use crate::alignment::positional::positional_equivalent;
use crate::alignment::tokenization::tokenize;
use crate::alignment::window::search_equivalent;
use crate::error::AlignmentError;
use crate::pipeline::traits::{Aligner, AlignmentObserver, Tokenizer};
use crate::types::{ConnectorSet, NoMatch, Sentence};

pub struct SeparatorTokenizer;

impl Tokenizer for SeparatorTokenizer {
    fn tokenize(&self, line: &str) -> Sentence {
        tokenize(line)
    }
}

pub struct PositionalAligner;

impl Aligner for PositionalAligner {
    fn align(&self, _source: &[String], target: &[String], position: usize) -> String {
        positional_equivalent(target, position)
    }
}

#[derive(Debug, Clone)]
pub struct WindowedListAligner {
    connectors: ConnectorSet,
    frame: usize,
    start: isize,
    max_window: usize,
}

impl WindowedListAligner {
    pub fn new(
        connectors: ConnectorSet,
        frame: usize,
        start: isize,
        max_window: usize,
    ) -> Result<Self, AlignmentError> {
        if connectors.is_empty() {
            return Err(AlignmentError::invalid_config(
                "target connector set is empty",
            ));
        }
        if frame == 0 {
            return Err(AlignmentError::invalid_config("frame must be >= 1"));
        }
        if max_window == 0 {
            return Err(AlignmentError::invalid_config("max_window must be >= 1"));
        }
        Ok(Self {
            connectors,
            frame,
            start,
            max_window,
        })
    }

    pub fn max_window(&self) -> usize {
        self.max_window
    }
}

impl Aligner for WindowedListAligner {
    fn align(&self, _source: &[String], target: &[String], position: usize) -> String {
        search_equivalent(
            target,
            position,
            self.frame,
            self.start,
            self.max_window,
            &self.connectors,
        )
    }
}

pub struct NoopObserver;

impl AlignmentObserver for NoopObserver {}

pub struct LoggingObserver;

impl AlignmentObserver for LoggingObserver {
    fn on_pass_started(&mut self, total_lines: usize) {
        tracing::debug!(lines = total_lines, "alignment: pass started");
    }

    fn on_line_processed(&mut self, line_no: usize) {
        tracing::trace!(line = line_no, "alignment: line processed");
    }

    fn on_no_match(&mut self, connector: &str, line_no: usize) {
        tracing::info!(line = line_no, connector = %connector, "alignment: no match");
    }
}

#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub total_lines: Option<usize>,
    pub lines_processed: usize,
    pub no_matches: Vec<NoMatch>,
}

impl AlignmentObserver for RecordingObserver {
    fn on_pass_started(&mut self, total_lines: usize) {
        self.total_lines = Some(total_lines);
    }

    fn on_line_processed(&mut self, _line_no: usize) {
        self.lines_processed += 1;
    }

    fn on_no_match(&mut self, connector: &str, line_no: usize) {
        self.no_matches.push(NoMatch {
            connector: connector.to_string(),
            line: line_no,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn separator_tokenizer_tokenize() {
        let tokenizer = SeparatorTokenizer;
        assert_eq!(
            tokenizer.tokenize("er ist müde, aber glücklich."),
            ["er", "ist", "müde", "aber", "glücklich"]
        );
    }

    #[test]
    fn positional_aligner_ignores_source() {
        let aligner = PositionalAligner;
        let target = sentence("he is tired but happy");
        assert_eq!(aligner.align(&[], &target, 3), "but");
        assert_eq!(aligner.align(&[], &[], 3), "");
    }

    #[test]
    fn windowed_list_aligner_align() {
        let aligner = WindowedListAligner::new(ConnectorSet::new(["but"]), 33, -16, 1)
            .expect("valid parameters");
        let source = sentence("er ist müde aber glücklich");
        let target = sentence("he is tired but happy");
        assert_eq!(aligner.align(&source, &target, 3), "but");
    }

    #[test]
    fn windowed_list_aligner_rejects_invalid_parameters() {
        assert!(WindowedListAligner::new(ConnectorSet::default(), 33, -16, 1).is_err());
        assert!(WindowedListAligner::new(ConnectorSet::new(["but"]), 0, -16, 1).is_err());
        assert!(WindowedListAligner::new(ConnectorSet::new(["but"]), 33, -16, 0).is_err());
    }

    #[test]
    fn recording_observer_collects_events() {
        let mut observer = RecordingObserver::default();
        observer.on_pass_started(2);
        observer.on_line_processed(1);
        observer.on_no_match("aber", 1);
        observer.on_line_processed(2);
        assert_eq!(observer.total_lines, Some(2));
        assert_eq!(observer.lines_processed, 2);
        assert_eq!(
            observer.no_matches,
            [NoMatch {
                connector: "aber".to_string(),
                line: 1
            }]
        );
    }
}
