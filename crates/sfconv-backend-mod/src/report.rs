//! Conversion warnings and the summary of a finished conversion.

use std::fmt;

use serde::Serialize;

use crate::options::ConvertOptions;

/// Where in the source track something happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub pattern: usize,
    pub division: usize,
    pub channel: usize,
}

impl Location {
    pub fn new(pattern: usize, division: usize, channel: usize) -> Self {
        Self {
            pattern,
            division,
            channel,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "channel {} (division {} of pattern {})",
            self.channel, self.division, self.pattern
        )
    }
}

/// Something that did not stop the conversion but changed its output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConvertWarning {
    /// A note names a sample that the catalog does not define. The note is
    /// dropped.
    UndefinedSample { sample_id: u8, at: Location },
    /// A note uses a sound effect sample while effects are not allowed.
    EffectDropped { sample_id: u8, at: Location },
    /// A glissando target fell outside the usable octaves and was clamped.
    GlissandoClamped {
        octave: i32,
        clamped: i32,
        at: Location,
    },
    /// An extension octave (0 or 4) was used; not every player supports it.
    NonStandardOctave { octave: i32, at: Location },
}

impl fmt::Display for ConvertWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertWarning::UndefinedSample { sample_id, at } => {
                write!(f, "Undefined sample {} at {}", sample_id, at)
            }
            ConvertWarning::EffectDropped { sample_id, at } => {
                write!(f, "Dropped sound effect sample {} at {}", sample_id, at)
            }
            ConvertWarning::GlissandoClamped { octave, clamped, at } => write!(
                f,
                "Glissando target octave {} out of range, clamped to {} at {}",
                octave, clamped, at
            ),
            ConvertWarning::NonStandardOctave { octave, at } => {
                write!(f, "Non-standard octave {} at {}", octave, at)
            }
        }
    }
}

/// One entry of the written sample table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantSummary {
    /// 1-based sample number in the module.
    pub number: u8,
    pub name: String,
    pub sample_id: u8,
    pub repeats: u8,
    pub pre_tune: i32,
    pub half_len: u16,
    pub half_repeat_offset: u16,
    pub half_repeat_len: u16,
    pub finetune: i8,
}

/// Summary of a finished conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    pub song_name: String,
    /// Ticks per division, from the source track.
    pub speed: u8,
    /// Positions written to the module, including the tempo pattern.
    pub song_length: usize,
    /// Patterns written, including the tempo pattern.
    pub patterns: usize,
    pub options: ConvertOptions,
    pub variants: Vec<VariantSummary>,
    pub warnings: Vec<ConvertWarning>,
    pub bytes_written: u64,
    /// BLAKE3 hash of every byte written.
    pub blake3: String,
}
