//! Channel commands: the 4-byte cells of a source pattern.

use crate::constants::{COMMAND_SIZE, GLISSANDO_THRESHOLD};

/// One channel's command within a division.
///
/// The raw bytes are kept exactly as stored; the accessors decode the
/// packed nibbles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ChannelCommand {
    /// Note within the octave (low nibble significant).
    pub note: u8,
    /// Octave + 1 in the low nibble, volume in the high nibble.
    pub oct_vol: u8,
    /// Voice number in the low nibble, action class in the high nibble.
    pub voice_act: u8,
    /// Repeat count in the high nibble.
    pub repeats: u8,
}

impl ChannelCommand {
    /// Create a command from its four raw bytes.
    pub fn new(note: u8, oct_vol: u8, voice_act: u8, repeats: u8) -> Self {
        Self {
            note,
            oct_vol,
            voice_act,
            repeats,
        }
    }

    /// An all-zero command (no-op).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Decode a command from its stored byte order.
    pub fn from_bytes(bytes: [u8; COMMAND_SIZE]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    /// Encode the command in stored byte order.
    pub fn to_bytes(&self) -> [u8; COMMAND_SIZE] {
        [self.note, self.oct_vol, self.voice_act, self.repeats]
    }

    /// A note-playing command.
    ///
    /// `octave` is the decoded octave (stored as `octave + 1`); all other
    /// arguments are nibbles.
    pub fn play(note: u8, octave: u8, volume: u8, voice: u8, repeats: u8) -> Self {
        Self::new(
            note & 0x0f,
            ((volume & 0x0f) << 4) | ((octave + 1) & 0x0f),
            voice & 0x0f,
            (repeats & 0x0f) << 4,
        )
    }

    /// A pitch-slide directive towards `note`/`octave` for the sample
    /// behind `voice`.
    pub fn glissando(note: u8, octave: u8, voice: u8) -> Self {
        Self::new(
            note & 0x0f,
            (octave + 1) & 0x0f,
            (GLISSANDO_THRESHOLD << 4) | (voice & 0x0f),
            0,
        )
    }

    /// Check if all four bytes are zero.
    pub fn is_empty(&self) -> bool {
        self.note == 0 && self.oct_vol == 0 && self.voice_act == 0 && self.repeats == 0
    }

    /// Note number within the octave.
    pub fn note(&self) -> i32 {
        (self.note & 0x0f) as i32
    }

    /// Decoded octave; -1 when the octave nibble is zero.
    pub fn octave(&self) -> i32 {
        (self.oct_vol & 0x0f) as i32 - 1
    }

    /// Volume nibble (0-15).
    pub fn volume(&self) -> u8 {
        self.oct_vol >> 4
    }

    /// Index into the voice table.
    pub fn voice(&self) -> usize {
        (self.voice_act & 0x0f) as usize
    }

    /// Action class.
    pub fn action(&self) -> u8 {
        self.voice_act >> 4
    }

    /// Check if this is a pitch-slide directive rather than a playable note.
    pub fn is_glissando(&self) -> bool {
        self.action() >= GLISSANDO_THRESHOLD
    }

    /// Number of times the sample's loop body should play (15 = forever).
    pub fn repeat_count(&self) -> u8 {
        self.repeats >> 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_packs_nibbles() {
        let com = ChannelCommand::play(9, 2, 12, 5, 3);
        assert_eq!(com.to_bytes(), [0x09, 0xc3, 0x05, 0x30]);
        assert_eq!(com.note(), 9);
        assert_eq!(com.octave(), 2);
        assert_eq!(com.volume(), 12);
        assert_eq!(com.voice(), 5);
        assert_eq!(com.repeat_count(), 3);
        assert!(!com.is_glissando());
    }

    #[test]
    fn test_glissando_action_class() {
        let com = ChannelCommand::glissando(0, 1, 7);
        assert!(com.is_glissando());
        assert_eq!(com.voice(), 7);
        assert_eq!(com.action(), 2);

        // Action class 1 still plays a note
        let com = ChannelCommand::new(0, 0x12, 0x17, 0);
        assert!(!com.is_glissando());
    }

    #[test]
    fn test_zero_octave_nibble_is_below_octave_zero() {
        let com = ChannelCommand::new(3, 0xf0, 0, 0);
        assert_eq!(com.octave(), -1);
        assert!(!com.is_empty());
    }

    #[test]
    fn test_empty() {
        assert!(ChannelCommand::empty().is_empty());
        assert!(!ChannelCommand::new(0, 0, 0, 0x10).is_empty());
    }
}
