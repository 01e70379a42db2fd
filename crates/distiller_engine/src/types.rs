use std::io;
use std::path::PathBuf;

use crate::decode::DecodeError;
use crate::persist::PersistError;
use crate::rules::NormalizeError;

/// Per-document pipeline stage. Every document ends in one of the terminal
/// stages `Skipped`, `Written`, or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Discovered,
    Skipped,
    Normalizing,
    Serializing,
    Written,
    Failed,
}

/// Terminal outcome of one document's conversion.
#[derive(Debug)]
pub enum DocStatus {
    /// Output already carries the current content hash; nothing written.
    Skipped,
    Written {
        output: PathBuf,
        side_files: usize,
    },
}

/// A document-scoped failure, carrying the offending source and its cause.
#[derive(Debug)]
pub struct DocFailure {
    pub source: PathBuf,
    pub error: ConvertError,
}

/// Batch result: counts plus every collected failure. The batch never
/// aborts on the first failing document.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub written: usize,
    pub skipped: usize,
    pub failures: Vec<DocFailure>,
}

impl BatchSummary {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("no usable element tree in document body")]
    EmptyDocument,
    #[error("missing required title heading")]
    MissingTitle,
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error("failed to write output {path}")]
    Output {
        path: PathBuf,
        #[source]
        source: PersistError,
    },
}
