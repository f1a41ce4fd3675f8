//! Sample data: where it comes from and how it is rewritten for a variant.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Cursor, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use byteorder::WriteBytesExt;
use sfconv_track::constants::BYTES_PER_FRAME;
use sfconv_track::SampleDescriptor;
use tracing::debug;

use crate::error::{ConvertError, ConvertResult};
use crate::variant::SampleVariant;

/// Source of raw sample data files.
pub trait SampleStore {
    type Reader: Read + Seek;

    /// Open the data file of a sample.
    fn open(&self, sample: &SampleDescriptor) -> io::Result<Self::Reader>;
}

/// Sample data files in a directory, named by their catalog file name.
#[derive(Debug, Clone)]
pub struct DirSampleStore {
    dir: PathBuf,
}

impl DirSampleStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SampleStore for DirSampleStore {
    type Reader = BufReader<File>;

    fn open(&self, sample: &SampleDescriptor) -> io::Result<Self::Reader> {
        let path = self.dir.join(&sample.file_name);
        debug!(path = %path.display(), "opening sample data file");
        Ok(BufReader::new(File::open(path)?))
    }
}

/// Sample data held in memory, keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct MemorySampleStore {
    files: HashMap<String, Vec<u8>>,
}

impl MemorySampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file_name: impl Into<String>, data: Vec<u8>) {
        self.files.insert(file_name.into(), data);
    }

    pub fn with(mut self, file_name: impl Into<String>, data: Vec<u8>) -> Self {
        self.insert(file_name, data);
        self
    }
}

impl SampleStore for MemorySampleStore {
    type Reader = Cursor<Vec<u8>>;

    fn open(&self, sample: &SampleDescriptor) -> io::Result<Self::Reader> {
        self.files
            .get(&sample.file_name)
            .map(|data| Cursor::new(data.clone()))
            .ok_or_else(|| io::Error::new(ErrorKind::NotFound, "no such sample data file"))
    }
}

/// Write the 8-bit data of a variant from 16-bit little-endian source
/// frames. Returns the number of bytes written.
///
/// Only the high byte of each frame is kept. A variant pitched down by `n`
/// octaves repeats each byte `2^n` times; one pitched up skips `2^n - 1`
/// frames after each frame it keeps. Finite repeats are unrolled by
/// reading from the repeat offset again each time the data runs out.
///
/// The budget of source frames to read is the variant's length in bytes,
/// shared across repeats; running out of source data ends a pass early
/// rather than failing.
pub fn encode_variant<R, W>(
    variant: &SampleVariant,
    reader: &mut R,
    writer: &mut W,
) -> ConvertResult<u64>
where
    R: Read + Seek,
    W: Write,
{
    let sample = &variant.source;
    let source_err = |source| ConvertError::SampleData {
        file_name: sample.file_name.clone(),
        source,
    };

    let pre_tune = variant.key.pre_tune;
    let copies: u64 = if pre_tune < 0 {
        1u64 << pre_tune.unsigned_abs().min(16)
    } else {
        1
    };
    let skip: i64 = if pre_tune > 0 {
        ((1i64 << pre_tune.min(32)) - 1) * BYTES_PER_FRAME as i64
    } else {
        0
    };
    let passes = if variant.key.loops_forever() {
        1
    } else {
        u32::from(variant.key.repeats) + 1
    };

    let mut budget = variant.data_len();
    let mut written = 0u64;
    let mut frame = [0u8; BYTES_PER_FRAME as usize];

    for pass in 0..passes {
        if pass != 0 {
            let offset = u64::from(sample.repeat_offset) * BYTES_PER_FRAME;
            reader.seek(SeekFrom::Start(offset)).map_err(source_err)?;
        }

        while budget > 0 {
            match reader.read_exact(&mut frame) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(source_err(e)),
            }
            budget -= 1;

            let high = frame[1];
            for _ in 0..copies {
                writer.write_u8(high)?;
            }
            written += copies;

            if skip > 0 {
                reader.seek(SeekFrom::Current(skip)).map_err(source_err)?;
            }
        }
    }

    debug!(name = %variant.name, written, "sample data written");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sfconv_track::SampleKind;

    use crate::variant::VariantKey;

    /// Frames whose high bytes count up from 1.
    fn frames(count: u8) -> Vec<u8> {
        (1..=count).flat_map(|i| [0xee, i]).collect()
    }

    fn encode(data: Vec<u8>, repeat_offset: u32, key: VariantKey) -> Vec<u8> {
        let sample = SampleDescriptor::new(
            "Test",
            data.len() as u64,
            repeat_offset,
            0,
            SampleKind::Music,
        );
        let variant = SampleVariant::derive(&sample, key, 0).unwrap();
        let mut out = Vec::new();
        let written = encode_variant(&variant, &mut Cursor::new(data), &mut out).unwrap();
        assert_eq!(written, out.len() as u64);
        out
    }

    #[test]
    fn test_keeps_high_bytes() {
        let out = encode(frames(8), 0, VariantKey::new(0, 15, 0));
        assert_eq!(out, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_unrolls_repeats_from_offset() {
        let out = encode(frames(8), 4, VariantKey::new(0, 2, 0));
        assert_eq!(out, vec![1, 2, 3, 4, 5, 6, 7, 8, 5, 6, 7, 8, 5, 6, 7, 8]);
    }

    #[test]
    fn test_pitch_down_duplicates() {
        let out = encode(frames(4), 0, VariantKey::new(0, 0, -1));
        assert_eq!(out, vec![1, 1, 2, 2, 3, 3, 4, 4]);
    }

    #[test]
    fn test_pitch_up_skips() {
        let out = encode(frames(8), 0, VariantKey::new(0, 0, 1));
        assert_eq!(out, vec![1, 3, 5, 7]);
    }

    #[test]
    fn test_short_source_is_not_an_error() {
        let sample = SampleDescriptor::new("Short", 16, 0, 0, SampleKind::Music);
        let variant = SampleVariant::derive(&sample, VariantKey::new(0, 0, 0), 0).unwrap();
        let mut out = Vec::new();
        // Catalog says 8 frames, file has 3 and a half
        let mut data = frames(3);
        data.push(0xee);
        encode_variant(&variant, &mut Cursor::new(data), &mut out).unwrap();
        assert_eq!(out, vec![1, 2, 3]);
    }

    #[test]
    fn test_memory_store_missing_file() {
        let store = MemorySampleStore::new().with("Here", vec![0; 4]);
        let here = SampleDescriptor::new("Here", 4, 0, 0, SampleKind::Music);
        let gone = SampleDescriptor::new("Gone", 4, 0, 0, SampleKind::Music);
        assert!(store.open(&here).is_ok());
        assert_eq!(store.open(&gone).unwrap_err().kind(), ErrorKind::NotFound);
    }
}
