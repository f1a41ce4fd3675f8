//! Pitch mapping between the game's note numbering and tracker periods.
//!
//! Sample tuning is in 1/4096 octave units. The tracker works in eighths of
//! a semitone: whole semitones shift the note and the remainder becomes the
//! sample's finetune.

use sfconv_track::constants::TUNING_PER_OCTAVE;
use sfconv_track::ChannelCommand;

/// Semitones per octave.
pub const SEMITONES: i64 = 12;

/// Tracker finetune steps per semitone.
pub const FINETUNE_STEPS: i64 = 8;

/// Octaves every ProTracker player supports.
pub const STANDARD_OCTAVES: std::ops::RangeInclusive<i32> = 1..=3;

/// Convert a sample tuning to tracker tuning units (eighths of a semitone),
/// rounding half away from zero.
pub fn tracker_tuning(tuning: i32) -> i64 {
    let scaled = i64::from(tuning) * SEMITONES * FINETUNE_STEPS;
    let half = TUNING_PER_OCTAVE as i64 / 2;
    let rounded = if scaled >= 0 { scaled + half } else { scaled - half };
    rounded / TUNING_PER_OCTAVE as i64
}

/// Whole semitones in a tracker tuning, truncated toward zero.
pub fn semitone_offset(tracker_tuning: i64) -> i64 {
    tracker_tuning / FINETUNE_STEPS
}

/// Remainder of a tracker tuning after whole semitones; keeps the sign of
/// the tuning.
pub fn finetune(tracker_tuning: i64) -> i8 {
    (tracker_tuning % FINETUNE_STEPS) as i8
}

/// An octave and a note within it (C = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pitch {
    pub octave: i32,
    pub note: i32,
}

/// Shift a command's note by a semitone offset, carrying into or borrowing
/// from the octave so the note stays within 0-11. The octave is not
/// limited.
pub fn map_pitch(command: &ChannelCommand, semitones: i64) -> Pitch {
    let note = i64::from(command.note()) + semitones;
    Pitch {
        octave: (i64::from(command.octave()) + note.div_euclid(SEMITONES)) as i32,
        note: note.rem_euclid(SEMITONES) as i32,
    }
}

/// Range of octaves a note may be played at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OctaveBand {
    pub min: i32,
    pub max: i32,
}

impl OctaveBand {
    pub fn new(extra_octaves: bool) -> Self {
        if extra_octaves {
            Self { min: 0, max: 4 }
        } else {
            Self {
                min: *STANDARD_OCTAVES.start(),
                max: *STANDARD_OCTAVES.end(),
            }
        }
    }

    pub fn contains(&self, octave: i32) -> bool {
        (self.min..=self.max).contains(&octave)
    }

    /// Limit an octave to the band.
    pub fn clamp(&self, octave: i32) -> i32 {
        octave.clamp(self.min, self.max)
    }

    /// Limit an octave to the band and return the clamped octave with the
    /// number of octaves the sample must be pre-tuned by to compensate.
    /// A negative delta means the sample is pitched down.
    pub fn fit(&self, octave: i32) -> (i32, i32) {
        let clamped = self.clamp(octave);
        (clamped, octave - clamped)
    }
}

/// Where a note lands once a sample's tuning is applied: the pitch to play
/// (octave already clamped) and the octave pre-tune of the sample variant
/// that makes it sound right.
pub fn fit_note(command: &ChannelCommand, tracker_tuning: i64, band: OctaveBand) -> (Pitch, i32) {
    let pitch = map_pitch(command, semitone_offset(tracker_tuning));
    let (octave, pre_tune) = band.fit(pitch.octave);
    (
        Pitch {
            octave,
            note: pitch.note,
        },
        pre_tune,
    )
}
