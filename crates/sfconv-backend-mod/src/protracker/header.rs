//! Module header: song name, sample table, positions and format tag.

use byteorder::WriteBytesExt;
use std::io::{self, Write};

use super::sample::{PtSampleHeader, SAMPLE_HEADER_SIZE};

/// Format tag for 4-channel, 31-sample modules.
pub const FORMAT_TAG: &[u8; 4] = b"M.K.";

/// Bytes reserved for the song name.
pub const SONG_NAME_LEN: usize = 20;

/// Longest song name stored; the last byte is always a terminator.
pub const MAX_SONG_NAME_CHARS: usize = SONG_NAME_LEN - 1;

/// Slots in the sample table.
pub const MAX_SAMPLES: usize = 31;

/// Entries in the position list.
pub const MAX_SONG_LEN: usize = 128;

/// Byte stored after the song length. Old trackers read it as a restart
/// position; ProTracker writes 127.
pub const LEGACY_RESTART: u8 = 127;

/// Total header size.
pub const HEADER_SIZE: usize =
    SONG_NAME_LEN + MAX_SAMPLES * SAMPLE_HEADER_SIZE + 2 + MAX_SONG_LEN + FORMAT_TAG.len();

/// Module header data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PtHeader {
    /// Song name (19 characters max).
    pub name: String,
    /// Used sample slots, in sample-number order.
    pub samples: Vec<PtSampleHeader>,
    /// Pattern numbers in play order.
    pub positions: Vec<u8>,
}

impl PtHeader {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Write the header.
    ///
    /// Fails with `InvalidInput` if there are more than [`MAX_SAMPLES`]
    /// samples or more than [`MAX_SONG_LEN`] positions.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        if self.samples.len() > MAX_SAMPLES {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} samples (max {})", self.samples.len(), MAX_SAMPLES),
            ));
        }
        if self.positions.len() > MAX_SONG_LEN {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} song positions (max {})", self.positions.len(), MAX_SONG_LEN),
            ));
        }

        // Song name (20 bytes, null-padded)
        let name_bytes = self.name.as_bytes();
        let mut name_buf = [0u8; SONG_NAME_LEN];
        let copy_len = name_bytes.len().min(MAX_SONG_NAME_CHARS);
        name_buf[..copy_len].copy_from_slice(&name_bytes[..copy_len]);
        writer.write_all(&name_buf)?;

        for sample in &self.samples {
            sample.write(writer)?;
        }
        for _ in self.samples.len()..MAX_SAMPLES {
            PtSampleHeader::write_empty(writer)?;
        }

        writer.write_u8(self.positions.len() as u8)?;
        writer.write_u8(LEGACY_RESTART)?;

        let mut positions = [0u8; MAX_SONG_LEN];
        positions[..self.positions.len()].copy_from_slice(&self.positions);
        writer.write_all(&positions)?;

        writer.write_all(FORMAT_TAG)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_size() {
        assert_eq!(HEADER_SIZE, 1084);

        let mut buf = Vec::new();
        PtHeader::new("Empty").write(&mut buf).unwrap();
        assert_eq!(buf.len(), HEADER_SIZE);
        assert_eq!(&buf[1080..], FORMAT_TAG);
    }

    #[test]
    fn test_header_fields() {
        let header = PtHeader {
            name: "A very long song name indeed".to_string(),
            samples: vec![PtSampleHeader {
                name: "Bass".to_string(),
                half_len: 16,
                ..Default::default()
            }],
            positions: vec![0, 2, 1],
        };

        let mut buf = Vec::new();
        header.write(&mut buf).unwrap();

        assert_eq!(&buf[..19], b"A very long song na");
        assert_eq!(buf[19], 0);
        assert_eq!(&buf[20..24], b"Bass");
        assert_eq!(&buf[42..44], &[0, 16]);
        // Second slot is empty
        assert!(buf[50..80].iter().all(|&b| b == 0));
        assert_eq!(buf[950], 3);
        assert_eq!(buf[951], LEGACY_RESTART);
        assert_eq!(&buf[952..956], &[0, 2, 1, 0]);
    }

    #[test]
    fn test_too_many_samples_rejected() {
        let header = PtHeader {
            samples: vec![PtSampleHeader::default(); MAX_SAMPLES + 1],
            ..Default::default()
        };
        let err = header.write(&mut Vec::new()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
