//! Error types for conversion.

use std::io;

use sfconv_track::TrackError;
use thiserror::Error;

/// Errors that abort a conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Writing the output failed.
    #[error("Failed writing to output file: {0}")]
    Io(#[from] io::Error),

    /// The source track could not be read.
    #[error(transparent)]
    Track(#[from] TrackError),

    /// A sample data file could not be opened, read or seeked.
    #[error("Failed to read sample data file '{file_name}': {source}")]
    SampleData {
        file_name: String,
        #[source]
        source: io::Error,
    },

    #[error("Unterminated pattern play order in input file")]
    UnterminatedPlayOrder,

    #[error("Too many patterns to be played in input file ({positions} positions, limit is {limit})")]
    TooManyPositions { positions: usize, limit: usize },

    /// The blank end pattern's number would not fit in a position byte.
    #[error("Too many patterns in input file to add a blank pattern (last is {last_pattern}, limit is {limit})")]
    NoRoomForBlankEnd { last_pattern: usize, limit: usize },

    /// Creating another sample variant would overflow the sample table.
    #[error(
        "Song requires too many ProTracker samples (limit is {limit}); \
         sample data file '{file_name}' in pattern {pattern} did not fit"
    )]
    TooManySamples {
        limit: usize,
        file_name: String,
        pattern: usize,
    },

    #[error("Cannot create output file containing no samples")]
    NoUsableSamples,

    /// A variant's length in words does not fit in 16 bits.
    #[error(
        "Sample data file '{file_name}' is too long with {repeats} repeats \
         from offset {repeat_offset} (when pre-tuned by {pre_tune} octaves)"
    )]
    LengthOverflow {
        file_name: String,
        repeats: u8,
        repeat_offset: u32,
        pre_tune: i32,
    },

    /// Emission met a note whose variant was never selected. Only possible
    /// when a variant table built for a different track is passed in.
    #[error(
        "No sample variant for sample {sample_id} with {repeats} repeats \
         (pre-tuned by {pre_tune} octaves) at pattern {pattern}, division {division}, \
         channel {channel}"
    )]
    MissingVariant {
        sample_id: u8,
        repeats: u8,
        pre_tune: i32,
        pattern: usize,
        division: usize,
        channel: usize,
    },
}

/// Result alias for conversion.
pub type ConvertResult<T> = Result<T, ConvertError>;
