use std::path::PathBuf;

use crate::alignment::disambiguation::OccurrenceClassification;
use crate::alignment::external::ExternalResultParser;
use crate::config::{AlignerConfig, Strategy};
use crate::error::AlignmentError;
use crate::pipeline::defaults::{PositionalAligner, SeparatorTokenizer, WindowedListAligner};
use crate::pipeline::runtime::{
    ConnectorAligner, ConnectorAlignerParts, CorpusAlignment, ExternalAlignment, ParallelCorpus,
};
use crate::pipeline::traits::{Aligner, AlignmentPass, Tokenizer};

#[derive(Debug, Clone)]
pub enum PassInput {
    Corpus(ParallelCorpus),
    ExternalResult(PathBuf),
}

pub struct ConnectorAlignerBuilder {
    config: AlignerConfig,
    tokenizer: Option<Box<dyn Tokenizer>>,
    aligner: Option<Box<dyn Aligner>>,
    occurrence_filter: Option<OccurrenceClassification>,
}

impl ConnectorAlignerBuilder {
    pub fn new(config: AlignerConfig) -> Self {
        Self {
            config,
            tokenizer: None,
            aligner: None,
            occurrence_filter: None,
        }
    }

    pub fn with_tokenizer(mut self, tokenizer: Box<dyn Tokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    pub fn with_aligner(mut self, aligner: Box<dyn Aligner>) -> Self {
        self.aligner = Some(aligner);
        self
    }

    pub fn with_occurrence_filter(mut self, classification: OccurrenceClassification) -> Self {
        self.occurrence_filter = Some(classification);
        self
    }

    pub fn build(self) -> Result<ConnectorAligner, AlignmentError> {
        self.config.validate()?;
        let aligner = match self.aligner {
            Some(aligner) => aligner,
            None => default_aligner(&self.config)?,
        };
        Ok(ConnectorAligner::from_parts(ConnectorAlignerParts {
            source_connectors: self.config.source_set(),
            tokenizer: self
                .tokenizer
                .unwrap_or_else(|| Box::new(SeparatorTokenizer)),
            aligner,
            occurrence_filter: self.occurrence_filter,
        }))
    }

    pub fn build_pass(self, input: PassInput) -> Result<Box<dyn AlignmentPass>, AlignmentError> {
        match (self.config.strategy, input) {
            (Strategy::External, PassInput::ExternalResult(path)) => {
                self.config.validate()?;
                if self.occurrence_filter.is_some() {
                    return Err(AlignmentError::invalid_config(
                        "occurrence filter needs a parallel corpus, not an external result file",
                    ));
                }
                let parser =
                    ExternalResultParser::new(self.config.source_set(), self.config.record_policy);
                Ok(Box::new(ExternalAlignment::new(parser, path)))
            }
            (Strategy::External, PassInput::Corpus(_)) => Err(AlignmentError::invalid_config(
                "external strategy needs an alignment result file",
            )),
            (_, PassInput::Corpus(corpus)) => {
                Ok(Box::new(CorpusAlignment::new(self.build()?, corpus)))
            }
            (strategy, PassInput::ExternalResult(_)) => Err(AlignmentError::invalid_config(
                format!("{} strategy needs a parallel corpus", strategy.as_str()),
            )),
        }
    }
}

fn default_aligner(config: &AlignerConfig) -> Result<Box<dyn Aligner>, AlignmentError> {
    match config.strategy {
        Strategy::Positional => Ok(Box::new(PositionalAligner)),
        Strategy::WindowedList => Ok(Box::new(WindowedListAligner::new(
            config.target_set(),
            config.frame,
            config.start,
            config.effective_max_window(),
        )?)),
        Strategy::External => Err(AlignmentError::invalid_config(
            "external strategy has no sentence-level aligner",
        )),
    }
}
