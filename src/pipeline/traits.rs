use crate::alignment::ledger::MatchLedger;
use crate::error::AlignmentError;
use crate::types::Sentence;

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, line: &str) -> Sentence;
}

// Returns the empty string when no equivalent is found.
pub trait Aligner: Send + Sync {
    fn align(&self, source: &[String], target: &[String], position: usize) -> String;
}

pub trait AlignmentObserver {
    fn on_pass_started(&mut self, _total_lines: usize) {}

    fn on_line_processed(&mut self, _line_no: usize) {}

    fn on_no_match(&mut self, _connector: &str, _line_no: usize) {}
}

pub trait AlignmentPass {
    fn run(&self, observer: &mut dyn AlignmentObserver) -> Result<MatchLedger, AlignmentError>;
}
