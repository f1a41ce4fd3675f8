//! ProTracker pattern data.

use std::io::{self, Write};

/// Divisions (rows) per pattern.
pub const ROWS_PER_PATTERN: usize = 64;

/// Channels in an M.K. module.
pub const CHANNELS: usize = 4;

/// Bytes in one stored pattern.
pub const PATTERN_SIZE: usize = ROWS_PER_PATTERN * CHANNELS * 4;

/// Effect numbers used by the converter.
pub mod effects {
    /// No effect (arpeggio with a zero parameter).
    pub const NONE: u8 = 0x0;
    /// Tone portamento towards the note's period.
    pub const TONE_PORTAMENTO: u8 = 0x3;
    /// Set channel volume, 0-64.
    pub const SET_VOLUME: u8 = 0xC;
    /// Break to the next pattern at the given division.
    pub const PATTERN_BREAK: u8 = 0xD;
    /// Set speed (parameter < 32) or tempo in BPM (parameter >= 32).
    pub const SET_SPEED: u8 = 0xF;
}

/// One channel of one division.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PtCommand {
    /// Amiga period, 12 bits. 0 = no new note.
    pub period: u16,
    /// 1-based sample number. 0 = keep the current sample.
    pub sample: u8,
    pub effect: u8,
    pub param: u8,
}

impl PtCommand {
    pub fn new(period: u16, sample: u8, effect: u8, param: u8) -> Self {
        Self {
            period,
            sample,
            effect,
            param,
        }
    }

    /// Create a command with no note, sample or effect.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create an effect-only command.
    pub fn effect(effect: u8, param: u8) -> Self {
        Self::new(0, 0, effect, param)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }

    /// Pack into the 4-byte stored form:
    ///
    /// ```text
    /// ssss pppp  pppp pppp  ssss eeee  xxxx xxxx
    /// ```
    ///
    /// The sample number is split across the high nibbles of bytes 0 and 2.
    pub fn to_bytes(&self) -> [u8; 4] {
        [
            ((self.period >> 8) & 0x0f) as u8 | (self.sample & 0xf0),
            (self.period & 0xff) as u8,
            (self.effect & 0x0f) | ((self.sample & 0x0f) << 4),
            self.param,
        ]
    }
}

/// A full pattern of commands, indexed by `[row][channel]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PtPattern {
    rows: [[PtCommand; CHANNELS]; ROWS_PER_PATTERN],
}

impl Default for PtPattern {
    fn default() -> Self {
        Self::empty()
    }
}

impl PtPattern {
    /// Create a pattern with every command empty.
    pub fn empty() -> Self {
        Self {
            rows: [[PtCommand::empty(); CHANNELS]; ROWS_PER_PATTERN],
        }
    }

    /// Get the command at a row and channel.
    pub fn get(&self, row: usize, channel: usize) -> Option<&PtCommand> {
        self.rows.get(row)?.get(channel)
    }

    /// Set the command at a row and channel. Out-of-range positions are
    /// ignored.
    pub fn set(&mut self, row: usize, channel: usize, command: PtCommand) {
        if let Some(slot) = self.rows.get_mut(row).and_then(|r| r.get_mut(channel)) {
            *slot = command;
        }
    }

    /// Write the pattern, row by row.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for row in &self.rows {
            for command in row {
                writer.write_all(&command.to_bytes())?;
            }
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(PATTERN_SIZE);
        for row in &self.rows {
            for command in row {
                buf.extend_from_slice(&command.to_bytes());
            }
        }
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_command_packing() {
        let command = PtCommand::new(428, 1, effects::SET_VOLUME, 64);
        assert_eq!(command.to_bytes(), [0x01, 0xac, 0x1c, 0x40]);
    }

    #[test]
    fn test_command_packing_high_sample_number() {
        // High nibble of the sample number goes above the period, not into it
        let command = PtCommand::new(0x0d6, 0x1f, effects::TONE_PORTAMENTO, 2);
        assert_eq!(command.to_bytes(), [0x10, 0xd6, 0xf3, 0x02]);

        let command = PtCommand::new(0x358, 0x10, effects::SET_VOLUME, 64);
        assert_eq!(command.to_bytes(), [0x13, 0x58, 0x0c, 0x40]);
    }

    #[test]
    fn test_empty_command_is_zero() {
        assert_eq!(PtCommand::empty().to_bytes(), [0; 4]);
        assert!(PtCommand::empty().is_empty());
        assert!(!PtCommand::effect(effects::PATTERN_BREAK, 0).is_empty());
    }

    #[test]
    fn test_pattern_write_order() {
        let mut pattern = PtPattern::empty();
        pattern.set(0, 1, PtCommand::effect(effects::SET_SPEED, 6));
        pattern.set(1, 0, PtCommand::effect(effects::SET_SPEED, 7));
        pattern.set(64, 0, PtCommand::effect(effects::SET_SPEED, 8));

        let bytes = pattern.to_bytes();
        assert_eq!(bytes.len(), PATTERN_SIZE);
        assert_eq!(&bytes[4..8], &[0, 0, 0x0f, 6]);
        assert_eq!(&bytes[16..20], &[0, 0, 0x0f, 7]);

        let mut written = Vec::new();
        pattern.write(&mut written).unwrap();
        assert_eq!(written, bytes);
    }
}
