//! Conversion options.

use serde::Serialize;

/// Switches that change how a track is transcoded.
///
/// All default to off, which gives the most portable output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConvertOptions {
    /// Only glissando on the channel that carries the directive, instead of
    /// every channel playing the same sample.
    pub single_channel_glissando: bool,
    /// Append a silent pattern after the song, carrying on any glissando in
    /// progress at the end of the last played pattern.
    pub blank_end: bool,
    /// Allow notes to use sound effect samples.
    pub allow_sfx: bool,
    /// Use octaves 0 and 4 as well as the standard 1-3.
    pub extra_octaves: bool,
}
