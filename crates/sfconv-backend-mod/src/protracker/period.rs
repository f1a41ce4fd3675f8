//! Amiga period table.

/// Octaves covered by [`PERIOD_TABLE`].
pub const PERIOD_TABLE_OCTAVES: usize = 5;

/// Periods for finetune 0, indexed by `[octave][note]` with C as note 0.
///
/// Octaves 1-3 are the standard ProTracker range; 0 and 4 are extensions
/// that some players accept.
pub const PERIOD_TABLE: [[u16; 12]; PERIOD_TABLE_OCTAVES] = [
    [1712, 1616, 1525, 1440, 1357, 1281, 1209, 1141, 1077, 1017, 961, 907],
    [856, 808, 762, 720, 678, 640, 604, 570, 538, 508, 480, 453],
    [428, 404, 381, 360, 339, 320, 302, 285, 269, 254, 240, 226],
    [214, 202, 190, 180, 170, 160, 151, 143, 135, 127, 120, 113],
    [107, 101, 95, 90, 85, 80, 76, 71, 67, 64, 60, 57],
];

/// Look up the period for an octave and note.
///
/// Out-of-table positions give period 0 (no note); octaves are expected to
/// have been clamped before this point.
pub fn period(octave: i32, note: i32) -> u16 {
    usize::try_from(octave)
        .ok()
        .zip(usize::try_from(note).ok())
        .and_then(|(o, n)| PERIOD_TABLE.get(o)?.get(n).copied())
        .unwrap_or(0)
}
