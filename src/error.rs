use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlignmentError {
    #[error("I/O error while {context} '{}': {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error while {context}: {source}")]
    Read {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error while {context}: {source}")]
    Write {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("CSV error while {context}: {source}")]
    Csv {
        context: &'static str,
        #[source]
        source: csv::Error,
    },
    #[error(
        "parallel corpus is misaligned: source has {source_lines} lines, target has {target_lines}"
    )]
    CorpusMismatch {
        source_lines: usize,
        target_lines: usize,
    },
    #[error("malformed alignment record at line {line}: {message}")]
    MalformedRecord { line: usize, message: String },
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl AlignmentError {
    pub(crate) fn io(context: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            context,
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn read(context: &'static str, source: std::io::Error) -> Self {
        Self::Read { context, source }
    }

    pub(crate) fn write(context: &'static str, source: std::io::Error) -> Self {
        Self::Write { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn csv(context: &'static str, source: csv::Error) -> Self {
        Self::Csv { context, source }
    }

    pub(crate) fn mismatch(source_lines: usize, target_lines: usize) -> Self {
        Self::CorpusMismatch {
            source_lines,
            target_lines,
        }
    }

    pub(crate) fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            source,
        }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_message_names_both_counts() {
        let err = AlignmentError::mismatch(3, 2);
        assert_eq!(
            err.to_string(),
            "parallel corpus is misaligned: source has 3 lines, target has 2"
        );
    }

    #[test]
    fn io_message_includes_path() {
        let err = AlignmentError::io(
            "opening source corpus",
            Path::new("/nonexistent/corpus.de"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        let message = err.to_string();
        assert!(message.contains("opening source corpus"));
        assert!(message.contains("/nonexistent/corpus.de"));
    }
}
