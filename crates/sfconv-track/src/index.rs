//! Sample index file parser.
//!
//! Each non-comment line describes one sample:
//!
//! ```text
//! # id  file        repeat-offset  type  tuning
//!   0   Bass1       1200           m     -64
//!   7   Explode     0              e     0
//! ```
//!
//! Lines whose first character is `#` are comments and whitespace-only lines
//! are skipped. The type is `m` (music) or `e` (effect). The repeat offset is
//! in frames and must lie within the first half of the sample data file,
//! whose length is taken from the samples directory.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::catalog::{tuning_in_range, SampleCatalog, SampleDescriptor, SampleKind};
use crate::error::{IndexError, IndexFault};

/// Longest sample file name accepted.
pub const MAX_FILE_NAME: usize = 11;

/// Load an index file, measuring each sample file in `samples_dir`.
pub fn load_index(index_path: &Path, samples_dir: &Path) -> Result<SampleCatalog, IndexError> {
    debug!(path = %index_path.display(), "opening samples index file");
    let file = File::open(index_path).map_err(|source| IndexError::Open {
        path: index_path.to_path_buf(),
        source,
    })?;

    parse_index(BufReader::new(file), |file_name| {
        let path = samples_dir.join(file_name);
        debug!(path = %path.display(), "measuring sample data file");
        fs::metadata(path).map(|m| m.len())
    })
}

/// Parse index text, asking `sample_len` for the byte length of each named
/// sample file.
pub fn parse_index<R, F>(reader: R, mut sample_len: F) -> Result<SampleCatalog, IndexError>
where
    R: BufRead,
    F: FnMut(&str) -> io::Result<u64>,
{
    let mut catalog = SampleCatalog::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line.map_err(|source| IndexError::Io {
            line: line_no,
            source,
        })?;

        if line.starts_with('#') {
            continue;
        }
        if line.trim_start().is_empty() {
            continue;
        }

        let entry = parse_line(&line).ok_or(IndexError::Line {
            fault: IndexFault::Syntax,
            line: line_no,
        })?;
        let reject = |fault| IndexError::Line {
            fault,
            line: line_no,
        };

        let id = u8::try_from(entry.id).map_err(|_| reject(IndexFault::BadId))?;
        if catalog.defined(id as usize).is_some() {
            return Err(reject(IndexFault::IdAlreadyUsed));
        }

        let len = sample_len(entry.file_name).map_err(|source| IndexError::SampleFile {
            file_name: entry.file_name.to_string(),
            line: line_no,
            source,
        })?;

        // Offset is in frames; it must land in the first half of the data.
        if entry.repeat_offset < 0 || entry.repeat_offset / 2 >= (len / 4) as i64 {
            return Err(reject(IndexFault::BadRepeatOffset));
        }

        let kind = SampleKind::from_code(entry.kind);
        if kind == SampleKind::Unused {
            return Err(reject(IndexFault::BadSampleType));
        }

        let tuning = i32::try_from(entry.tuning)
            .ok()
            .filter(|&t| tuning_in_range(t))
            .ok_or_else(|| reject(IndexFault::BadTuning))?;

        debug!(
            id,
            file_name = entry.file_name,
            len,
            tuning,
            repeat_offset = entry.repeat_offset,
            "sample defined"
        );

        catalog.insert(
            id,
            SampleDescriptor::new(entry.file_name, len, entry.repeat_offset as u32, tuning, kind),
        );
    }

    Ok(catalog)
}

struct IndexLine<'a> {
    id: i64,
    file_name: &'a str,
    repeat_offset: i64,
    kind: char,
    tuning: i64,
}

fn parse_line(line: &str) -> Option<IndexLine<'_>> {
    let mut fields = line.split_whitespace();

    let id = fields.next()?.parse().ok()?;

    let file_name = fields.next()?;
    if file_name.chars().count() > MAX_FILE_NAME {
        return None;
    }

    let repeat_offset = fields.next()?.parse().ok()?;

    let mut type_field = fields.next()?.chars();
    let kind = type_field.next()?;
    if type_field.next().is_some() {
        return None;
    }

    let tuning = fields.next()?.parse().ok()?;

    Some(IndexLine {
        id,
        file_name,
        repeat_offset,
        kind,
        tuning,
    })
}
