//! Error types for reading tracks and sample index files.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::constants::{MAX_PLAY_ORDER, NUM_DIVISIONS, TEMPO_LIMIT};

/// Error raised while reading or constructing a [`Track`](crate::Track).
#[derive(Debug, Error)]
pub enum TrackError {
    /// A header field could not be read.
    #[error("Failed to read {field}: {source}")]
    Read {
        field: &'static str,
        #[source]
        source: io::Error,
    },

    /// Pattern data ended early or could not be read.
    #[error("Failed to read channel {channel} (division {division} of pattern {pattern}): {source}")]
    PatternData {
        pattern: usize,
        division: usize,
        channel: usize,
        #[source]
        source: io::Error,
    },

    /// Tempo byte cannot be represented as a tracker speed.
    #[error("Tempo {tempo} is too slow in input file (limit is {})", TEMPO_LIMIT - 1)]
    TempoTooSlow { tempo: u8 },

    /// Highest pattern index is negative.
    #[error("Invalid pattern count: last pattern index {last_pattern} is negative")]
    InvalidPatternCount { last_pattern: i64 },

    /// A pattern was built from the wrong number of divisions.
    #[error("Pattern has {divisions} divisions (expected {})", NUM_DIVISIONS)]
    PatternSize { divisions: usize },

    /// Play order supplied to [`Track::new`](crate::Track::new) is too long.
    #[error("Play order has {len} entries (capacity is {})", MAX_PLAY_ORDER)]
    PlayOrderTooLong { len: usize },

    /// Failure while writing a track.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// What was wrong with a sample index line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFault {
    Syntax,
    BadId,
    IdAlreadyUsed,
    BadRepeatOffset,
    BadSampleType,
    BadTuning,
}

impl IndexFault {
    /// Human-readable description, as printed before the line number.
    pub fn describe(&self) -> &'static str {
        match self {
            IndexFault::Syntax => "Syntax error",
            IndexFault::BadId => "Bad ID",
            IndexFault::IdAlreadyUsed => "ID already used",
            IndexFault::BadRepeatOffset => "Bad repeat offset",
            IndexFault::BadSampleType => "Bad sample type",
            IndexFault::BadTuning => "Bad tuning value",
        }
    }
}

impl std::fmt::Display for IndexFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// Error raised while loading a sample index file.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The index file itself could not be opened.
    #[error("Failed to open samples index file '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A line was rejected. `line` is 1-based.
    #[error("{fault} at line {line} of samples index file")]
    Line { fault: IndexFault, line: usize },

    /// The sample data file named on a line could not be measured.
    #[error("Failed to open sample data file '{file_name}' (line {line}): {source}")]
    SampleFile {
        file_name: String,
        line: usize,
        #[source]
        source: io::Error,
    },

    /// Reading a line of the index failed.
    #[error("Error reading line {line} from samples index file: {source}")]
    Io {
        line: usize,
        #[source]
        source: io::Error,
    },
}

impl IndexError {
    /// The rejected-line fault, if this error is one.
    pub fn fault(&self) -> Option<IndexFault> {
        match self {
            IndexError::Line { fault, .. } => Some(*fault),
            _ => None,
        }
    }
}
