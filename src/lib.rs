pub mod alignment;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

pub use alignment::disambiguation::{
    candidates, ContextDisambiguator, DropList, OccurrenceClassification, OccurrenceClassifier,
};
pub use alignment::external::ExternalResultParser;
pub use alignment::ledger::MatchLedger;
pub use alignment::report::{ConnectorTop, FrequencyTable, Meta, Report};
pub use config::{AlignerConfig, DisambiguationConfig, RecordPolicy, RunConfig, Strategy};
pub use error::AlignmentError;
pub use pipeline::builder::{ConnectorAlignerBuilder, PassInput};
pub use pipeline::defaults::{LoggingObserver, NoopObserver, RecordingObserver};
pub use pipeline::runtime::{ConnectorAligner, CorpusAlignment, ExternalAlignment, ParallelCorpus};
pub use pipeline::traits::{Aligner, AlignmentObserver, AlignmentPass, Tokenizer};
pub use types::{ConnectorSet, NoMatch, Sentence};
