//! The whole music track: tempo, voice table, play order and patterns.
//!
//! # Layout
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0      | 1    | tempo (centiseconds per division, < 32) |
//! | 16     | 16   | voice table |
//! | 32     | 4    | last pattern index (little-endian) |
//! | 40     | 64   | play order (255 terminates) |
//! | 104    | ...  | `(last + 1) × 64 × 4` channel commands of 4 bytes |

use std::io::{Read, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use tracing::debug;

use crate::command::ChannelCommand;
use crate::constants::*;
use crate::error::TrackError;
use crate::pattern::{Division, Pattern};

/// A parsed source track. Read-only once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    tempo: u8,
    voice_table: [u8; NUM_VOICES],
    play_order: [u8; MAX_PLAY_ORDER],
    patterns: Vec<Pattern>,
}

impl Track {
    /// Assemble a track in memory.
    ///
    /// `play_order` may be shorter than [`MAX_PLAY_ORDER`]; unused slots are
    /// filled with the terminator.
    pub fn new(
        tempo: u8,
        voice_table: [u8; NUM_VOICES],
        play_order: &[u8],
        patterns: Vec<Pattern>,
    ) -> Result<Self, TrackError> {
        check_tempo(tempo)?;
        check_last_pattern(patterns.len() as i64 - 1)?;

        if play_order.len() > MAX_PLAY_ORDER {
            return Err(TrackError::PlayOrderTooLong {
                len: play_order.len(),
            });
        }
        let mut order = [PLAY_ORDER_END; MAX_PLAY_ORDER];
        order[..play_order.len()].copy_from_slice(play_order);

        Ok(Self {
            tempo,
            voice_table,
            play_order: order,
            patterns,
        })
    }

    /// Read a track from an uncompressed source stream.
    pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Self, TrackError> {
        let tempo = reader
            .read_u8()
            .map_err(|source| TrackError::Read { field: "tempo", source })?;
        check_tempo(tempo)?;
        debug!(tempo, "read tempo (cs per division)");

        reader
            .seek(SeekFrom::Start(VOICE_TABLE_OFFSET))
            .map_err(|source| TrackError::Read {
                field: "voice table",
                source,
            })?;

        let mut voice_table = [0u8; NUM_VOICES];
        reader
            .read_exact(&mut voice_table)
            .map_err(|source| TrackError::Read {
                field: "voice table",
                source,
            })?;

        let last_pattern = reader
            .read_i32::<LittleEndian>()
            .map_err(|source| TrackError::Read {
                field: "no. of patterns",
                source,
            })?;

        reader
            .seek(SeekFrom::Current(4))
            .map_err(|source| TrackError::Read {
                field: "play order",
                source,
            })?;

        let mut play_order = [0u8; MAX_PLAY_ORDER];
        reader
            .read_exact(&mut play_order)
            .map_err(|source| TrackError::Read {
                field: "play order",
                source,
            })?;

        let last_pattern = check_last_pattern(last_pattern as i64)?;

        // The count comes from the file; let the data prove it before allocating.
        let mut patterns = Vec::new();
        for pattern_no in 0..=last_pattern {
            debug!(pattern = pattern_no, "reading pattern");
            patterns.push(read_pattern(reader, pattern_no)?);
        }

        Ok(Self {
            tempo,
            voice_table,
            play_order,
            patterns,
        })
    }

    /// Parse a track held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self, TrackError> {
        Self::read(&mut std::io::Cursor::new(data))
    }

    /// Write the track in the source layout. Reserved bytes are zero.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), TrackError> {
        writer.write_u8(self.tempo)?;
        writer.write_all(&[0u8; VOICE_TABLE_OFFSET as usize - 1])?;
        writer.write_all(&self.voice_table)?;
        writer.write_i32::<LittleEndian>(self.last_pattern() as i32)?;
        writer.write_all(&[0u8; 4])?;
        writer.write_all(&self.play_order)?;

        for pattern in &self.patterns {
            for division in pattern.divisions() {
                for com in &division.channels {
                    writer.write_all(&com.to_bytes())?;
                }
            }
        }
        Ok(())
    }

    /// Serialize the track to a byte vector.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TrackError> {
        let mut buffer =
            Vec::with_capacity(HEADER_SIZE + self.patterns.len() * NUM_DIVISIONS * NUM_CHANNELS * COMMAND_SIZE);
        self.write(&mut buffer)?;
        Ok(buffer)
    }

    /// Interval between divisions, in centiseconds.
    pub fn tempo(&self) -> u8 {
        self.tempo
    }

    /// Sample id that a voice number maps to.
    pub fn sample_for_voice(&self, voice: usize) -> u8 {
        self.voice_table[voice % NUM_VOICES]
    }

    /// Raw play order, terminator and trailing bytes included.
    pub fn play_order(&self) -> &[u8; MAX_PLAY_ORDER] {
        &self.play_order
    }

    /// Number of play order entries before the terminator, or `None` if the
    /// play order has no terminator.
    pub fn song_length(&self) -> Option<usize> {
        self.play_order.iter().position(|&p| p == PLAY_ORDER_END)
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn pattern(&self, index: usize) -> Option<&Pattern> {
        self.patterns.get(index)
    }

    /// Highest pattern index.
    pub fn last_pattern(&self) -> usize {
        self.patterns.len().saturating_sub(1)
    }
}

fn check_tempo(tempo: u8) -> Result<(), TrackError> {
    if tempo >= TEMPO_LIMIT {
        return Err(TrackError::TempoTooSlow { tempo });
    }
    Ok(())
}

fn check_last_pattern(last_pattern: i64) -> Result<usize, TrackError> {
    usize::try_from(last_pattern).map_err(|_| TrackError::InvalidPatternCount { last_pattern })
}

fn read_pattern<R: Read>(reader: &mut R, pattern_no: usize) -> Result<Pattern, TrackError> {
    let mut divisions = Vec::with_capacity(NUM_DIVISIONS);
    for division_no in 0..NUM_DIVISIONS {
        let mut channels = [ChannelCommand::empty(); NUM_CHANNELS];
        for (channel_no, com) in channels.iter_mut().enumerate() {
            let mut raw = [0u8; COMMAND_SIZE];
            reader
                .read_exact(&mut raw)
                .map_err(|source| TrackError::PatternData {
                    pattern: pattern_no,
                    division: division_no,
                    channel: channel_no,
                    source,
                })?;
            *com = ChannelCommand::from_bytes(raw);
        }
        divisions.push(Division::new(channels));
    }
    Pattern::from_divisions(divisions)
}
