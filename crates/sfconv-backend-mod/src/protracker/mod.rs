//! ProTracker "M.K." module writer.
//!
//! A module is a fixed 1084-byte header (song name, 31 sample headers,
//! position list and format tag), followed by 1024-byte patterns of
//! 64 divisions × 4 channels, followed by the raw 8-bit sample data in
//! sample-table order.
//!
//! The sample data is not held by [`PtModule`]; callers stream it after
//! the module itself has been written.

mod header;
mod pattern;
mod period;
mod sample;
mod writer;

pub use header::{
    PtHeader, FORMAT_TAG, HEADER_SIZE, LEGACY_RESTART, MAX_SAMPLES, MAX_SONG_LEN,
    MAX_SONG_NAME_CHARS, SONG_NAME_LEN,
};
pub use pattern::{effects, PtCommand, PtPattern, PATTERN_SIZE, ROWS_PER_PATTERN};
pub use period::{period, PERIOD_TABLE, PERIOD_TABLE_OCTAVES};
pub use sample::{PtSampleHeader, SAMPLE_HEADER_SIZE, SAMPLE_NAME_LEN, SAMPLE_VOLUME};
pub use writer::PtModule;
