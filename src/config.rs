use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AlignmentError;
use crate::types::ConnectorSet;

/// German connectors studied on Europarl de-en.
pub const DEFAULT_SOURCE_CONNECTORS: [&str; 6] = [
    "aber",
    "doch",
    "jedoch",
    "allerdings",
    "andererseits",
    "hingegen",
];

/// Admissible English equivalents, single words and phrases.
pub const DEFAULT_TARGET_CONNECTORS: [&str; 30] = [
    "but",
    "however",
    "though",
    "although",
    "yet",
    "nevertheless",
    "nonetheless",
    "albeit",
    "otherwise",
    "whereas",
    "again",
    "still",
    "instead",
    "alternatively",
    "after all",
    "then again",
    "there again",
    "by contrast",
    "on the contrary",
    "on the other hand",
    "at the same time",
    "even so",
    "even if",
    "by the same token",
    "on a different note",
    "on the other side",
    "on the downside",
    "having said this",
    "having said that",
    "apart from that",
];

/// Placeholder replaced by the escaped candidate in pattern templates.
pub const CANDIDATE_PLACEHOLDER: &str = "{}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Same-position baseline.
    Positional,
    /// Closed-list search in a window around the connector.
    #[default]
    WindowedList,
    /// Counts read back from an external word aligner's result file.
    External,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positional => "positional",
            Self::WindowedList => "windowed-list",
            Self::External => "external",
        }
    }
}

/// What the external result parser does with a malformed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordPolicy {
    /// Abort the whole parse.
    #[default]
    Strict,
    /// Log, discard the record's matches, continue.
    BestEffort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignerConfig {
    pub source_connectors: Vec<String>,
    pub target_connectors: Vec<String>,
    pub strategy: Strategy,
    /// Search window width in target tokens.
    pub frame: usize,
    /// Offset of the window's left edge relative to the connector position.
    pub start: isize,
    /// Longest candidate phrase in tokens; derived from the target set when unset.
    pub max_window: Option<usize>,
    pub record_policy: RecordPolicy,
}

impl AlignerConfig {
    pub const DEFAULT_FRAME: usize = 33;
    pub const DEFAULT_START: isize = -16;

    pub fn source_set(&self) -> ConnectorSet {
        ConnectorSet::new(&self.source_connectors)
    }

    pub fn target_set(&self) -> ConnectorSet {
        ConnectorSet::new(&self.target_connectors)
    }

    pub fn effective_max_window(&self) -> usize {
        self.max_window
            .unwrap_or_else(|| self.target_set().max_window())
    }

    pub fn validate(&self) -> Result<(), AlignmentError> {
        if self.source_set().is_empty() {
            return Err(AlignmentError::invalid_config(
                "source connector set is empty",
            ));
        }
        if self.strategy == Strategy::WindowedList && self.target_set().is_empty() {
            return Err(AlignmentError::invalid_config(
                "windowed-list strategy needs a non-empty target connector set",
            ));
        }
        if self.frame == 0 {
            return Err(AlignmentError::invalid_config("frame must be >= 1"));
        }
        if self.max_window == Some(0) {
            return Err(AlignmentError::invalid_config("max_window must be >= 1"));
        }
        Ok(())
    }
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            source_connectors: DEFAULT_SOURCE_CONNECTORS.map(String::from).to_vec(),
            target_connectors: DEFAULT_TARGET_CONNECTORS.map(String::from).to_vec(),
            strategy: Strategy::default(),
            frame: Self::DEFAULT_FRAME,
            start: Self::DEFAULT_START,
            max_window: None,
            record_policy: RecordPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisambiguationConfig {
    /// Templates whose matches support a discourse-marker reading.
    pub support_patterns: Vec<String>,
    /// Templates whose matches indicate an ordinary lexical reading.
    pub lexical_patterns: Vec<String>,
    /// Character class left of a bracketed source occurrence.
    pub left_context: String,
    /// Character class right of a bracketed source occurrence.
    pub right_context: String,
    /// Minimum support count to keep a candidate.
    pub c_filter: usize,
    /// Maximum lexical count before a candidate is dropped.
    pub p_filter: usize,
}

impl DisambiguationConfig {
    pub const DEFAULT_C_FILTER: usize = 10;
    pub const DEFAULT_P_FILTER: usize = 2;

    pub fn validate(&self) -> Result<(), AlignmentError> {
        for template in self.support_patterns.iter().chain(&self.lexical_patterns) {
            if !template.contains(CANDIDATE_PLACEHOLDER) {
                return Err(AlignmentError::invalid_config(format!(
                    "pattern template '{template}' has no '{CANDIDATE_PLACEHOLDER}' placeholder"
                )));
            }
        }
        if self.support_patterns.is_empty() {
            return Err(AlignmentError::invalid_config(
                "at least one support pattern is required",
            ));
        }
        Ok(())
    }
}

impl Default for DisambiguationConfig {
    fn default() -> Self {
        Self {
            support_patterns: vec![", {}".to_string(), "{},".to_string()],
            lexical_patterns: vec!["[a-zA-Z] {} [a-zA-Z]".to_string()],
            left_context: r#"[a-zA-Zß0-9()'"öüä ]"#.to_string(),
            right_context: "[a-zA-Z0-9(öüäÄÜÖ)]".to_string(),
            c_filter: Self::DEFAULT_C_FILTER,
            p_filter: Self::DEFAULT_P_FILTER,
        }
    }
}

/// Everything one run needs, loadable from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub aligner: AlignerConfig,
    pub disambiguation: DisambiguationConfig,
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self, AlignmentError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| AlignmentError::io("reading run config", path, e))?;
        let config: Self = serde_json::from_str(&data)
            .map_err(|e| AlignmentError::json("parsing run config", e))?;
        config.aligner.validate()?;
        config.disambiguation.validate()?;
        Ok(config)
    }
}
