//! ProTracker sample headers.

use byteorder::{BigEndian, WriteBytesExt};
use std::io::{self, Write};

/// Bytes in one sample header.
pub const SAMPLE_HEADER_SIZE: usize = 30;

/// Bytes reserved for a sample name.
pub const SAMPLE_NAME_LEN: usize = 22;

/// Volume written for every sample.
pub const SAMPLE_VOLUME: u8 = 64;

/// One entry in the sample table. Lengths and offsets are in 16-bit words,
/// as stored in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PtSampleHeader {
    /// Sample name (22 bytes max).
    pub name: String,
    pub half_len: u16,
    /// Signed finetune, -8..=7.
    pub finetune: i8,
    pub volume: u8,
    pub half_repeat_offset: u16,
    /// 0 when the sample does not loop.
    pub half_repeat_len: u16,
}

impl PtSampleHeader {
    /// Write the 30-byte header.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let name_bytes = self.name.as_bytes();
        let mut name_buf = [0u8; SAMPLE_NAME_LEN];
        let copy_len = name_bytes.len().min(SAMPLE_NAME_LEN);
        name_buf[..copy_len].copy_from_slice(&name_bytes[..copy_len]);
        writer.write_all(&name_buf)?;

        writer.write_u16::<BigEndian>(self.half_len)?;
        writer.write_i8(self.finetune)?;
        writer.write_u8(self.volume)?;
        writer.write_u16::<BigEndian>(self.half_repeat_offset)?;
        writer.write_u16::<BigEndian>(self.half_repeat_len)?;
        Ok(())
    }

    /// Write an all-zero header for an unused slot.
    pub fn write_empty<W: Write>(writer: &mut W) -> io::Result<()> {
        writer.write_all(&[0u8; SAMPLE_HEADER_SIZE])
    }
}
