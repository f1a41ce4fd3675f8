//! Limits and magic numbers dictated by the Star Fighter 3000 music format.

/// Channels per division.
pub const NUM_CHANNELS: usize = 4;

/// Divisions per pattern.
pub const NUM_DIVISIONS: usize = 64;

/// Entries in the voice table.
pub const NUM_VOICES: usize = 16;

/// Capacity of the play order, including the terminator.
pub const MAX_PLAY_ORDER: usize = 64;

/// Play order terminator.
pub const PLAY_ORDER_END: u8 = 255;

/// Tempo bytes at or above this value cannot be expressed as a tracker speed.
pub const TEMPO_LIMIT: u8 = 32;

/// Action classes at or above this value are pitch-slide directives
/// rather than "play note".
pub const GLISSANDO_THRESHOLD: u8 = 2;

/// Repeat count meaning "loop for as long as the note is held".
pub const REPEAT_FOREVER: u8 = 15;

/// Largest volume nibble.
pub const MAX_VOLUME: u8 = 15;

/// Tuning units per octave.
pub const TUNING_PER_OCTAVE: i32 = 4096;

/// Player clock rate in Hz (really 100, but 90 compensates for latency).
pub const CLOCK_FREQ: u32 = 90;

/// Byte offset of the voice table.
pub const VOICE_TABLE_OFFSET: u64 = 16;

/// Size of the fixed header preceding the pattern data.
pub const HEADER_SIZE: usize = 104;

/// Bytes per channel command.
pub const COMMAND_SIZE: usize = 4;

/// Bytes per stored sample frame (16-bit little-endian).
pub const BYTES_PER_FRAME: u64 = 2;
