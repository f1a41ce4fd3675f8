//! Second pass over a track: emit tracker patterns.

use sfconv_track::constants::{CLOCK_FREQ, MAX_VOLUME, NUM_DIVISIONS};
use sfconv_track::{ChannelCommand, Pattern, SampleCatalog, Track};
use tracing::debug;

use crate::error::{ConvertError, ConvertResult};
use crate::glissando::{apply_directive, Channels, Directive, GlissandoRules};
use crate::options::ConvertOptions;
use crate::pitch::{map_pitch, semitone_offset, tracker_tuning, OctaveBand, STANDARD_OCTAVES};
use crate::protracker::{effects, period, PtCommand, PtPattern, MAX_SONG_LEN};
use crate::report::{ConvertWarning, Location};
use crate::select::resolve_note;
use crate::variant::VariantTable;

/// Tracker volume for the loudest source volume.
pub const PT_MAX_VOLUME: u16 = 64;

/// Beats per minute that make one tracker tick last one game clock tick.
/// A tick lasts 2.5 / bpm seconds.
pub const TRACKER_BPM: u8 = (60 * CLOCK_FREQ / 24) as u8;

/// Highest source pattern index that leaves a position byte free for the
/// blank end pattern, which is numbered `last + 2`.
pub const MAX_LAST_PATTERN_WITH_BLANK_END: usize = u8::MAX as usize - 2;

/// Pattern 0 of every module: set BPM and speed, then break straight into
/// the next pattern.
pub fn tempo_pattern(speed: u8) -> PtPattern {
    let mut pattern = PtPattern::empty();
    pattern.set(0, 0, PtCommand::effect(effects::SET_SPEED, TRACKER_BPM));
    pattern.set(0, 1, PtCommand::effect(effects::SET_SPEED, speed));
    pattern.set(0, 2, PtCommand::effect(effects::PATTERN_BREAK, 0));
    pattern
}

/// The module's position list.
///
/// Position 0 plays the tempo pattern; source pattern `n` becomes module
/// pattern `n + 1`. With `blank_end` a final position plays the blank
/// pattern that follows the last source pattern.
pub fn song_positions(track: &Track, options: &ConvertOptions) -> ConvertResult<Vec<u8>> {
    let song_len = track
        .song_length()
        .ok_or(ConvertError::UnterminatedPlayOrder)?;

    let mut positions = Vec::with_capacity(song_len + 2);
    positions.push(0);
    positions.extend(track.play_order()[..song_len].iter().map(|&p| p + 1));
    if options.blank_end {
        let last_pattern = track.last_pattern();
        if last_pattern > MAX_LAST_PATTERN_WITH_BLANK_END {
            return Err(ConvertError::NoRoomForBlankEnd {
                last_pattern,
                limit: MAX_LAST_PATTERN_WITH_BLANK_END,
            });
        }
        positions.push((last_pattern + 2) as u8);
    }

    if positions.len() > MAX_SONG_LEN {
        return Err(ConvertError::TooManyPositions {
            positions: positions.len(),
            limit: MAX_SONG_LEN,
        });
    }
    Ok(positions)
}

/// Transcode every source pattern, plus the blank end pattern if enabled.
///
/// Channel state starts afresh at each source pattern. The blank end
/// pattern instead carries on from the state at the end of the last
/// pattern in the play order, so a slide in progress there continues.
pub fn transcode_patterns(
    track: &Track,
    catalog: &SampleCatalog,
    variants: &VariantTable,
    options: &ConvertOptions,
    warnings: &mut Vec<ConvertWarning>,
) -> ConvertResult<Vec<PtPattern>> {
    let transcoder = Transcoder {
        track,
        catalog,
        variants,
        options,
        rules: GlissandoRules {
            band: OctaveBand::new(options.extra_octaves),
            single_channel: options.single_channel_glissando,
        },
    };

    let last_played = track
        .song_length()
        .and_then(|len| len.checked_sub(1))
        .map(|i| track.play_order()[i] as usize);

    let mut patterns = Vec::with_capacity(track.patterns().len() + 1);
    let mut final_state = Channels::default();

    for (pattern_no, pattern) in track.patterns().iter().enumerate() {
        let mut channels = Channels::default();
        patterns.push(transcoder.pattern(pattern_no, pattern, &mut channels, warnings)?);
        if Some(pattern_no) == last_played {
            final_state = channels;
        }
    }

    if options.blank_end {
        debug!(?last_played, "transcoding blank end pattern");
        let blank_no = track.patterns().len();
        patterns.push(transcoder.pattern(blank_no, &Pattern::blank(), &mut final_state, warnings)?);
    }

    Ok(patterns)
}

struct Transcoder<'a> {
    track: &'a Track,
    catalog: &'a SampleCatalog,
    variants: &'a VariantTable,
    options: &'a ConvertOptions,
    rules: GlissandoRules,
}

impl Transcoder<'_> {
    fn pattern(
        &self,
        pattern_no: usize,
        pattern: &Pattern,
        channels: &mut Channels,
        warnings: &mut Vec<ConvertWarning>,
    ) -> ConvertResult<PtPattern> {
        let mut out = PtPattern::empty();
        debug_assert_eq!(pattern.divisions().len(), NUM_DIVISIONS);

        for (division_no, division) in pattern.divisions().iter().enumerate() {
            // Directives first, so that a slide starts in the same division
            for (channel, command) in division.channels.iter().enumerate() {
                if let Some(directive) = self.directive(channel, command) {
                    apply_directive(
                        channels,
                        &directive,
                        self.variants,
                        &self.rules,
                        pattern_no,
                        division_no,
                        warnings,
                    );
                }
            }

            for (channel, command) in division.channels.iter().enumerate() {
                let state = &mut channels[channel];
                let note = match resolve_note(self.track, self.catalog, command, self.options) {
                    Ok(note) => note,
                    Err(_) => {
                        out.set(division_no, channel, state.step());
                        continue;
                    }
                };

                let at = Location::new(pattern_no, division_no, channel);
                let number = self.variants.find(&note.key).ok_or(ConvertError::MissingVariant {
                    sample_id: note.key.sample_id,
                    repeats: note.key.repeats,
                    pre_tune: note.key.pre_tune,
                    pattern: pattern_no,
                    division: division_no,
                    channel,
                })?;

                if !STANDARD_OCTAVES.contains(&note.pitch.octave) {
                    warnings.push(ConvertWarning::NonStandardOctave {
                        octave: note.pitch.octave,
                        at,
                    });
                }

                let volume = u16::from(command.volume()) * PT_MAX_VOLUME / u16::from(MAX_VOLUME);
                out.set(
                    division_no,
                    channel,
                    PtCommand::new(
                        period(note.pitch.octave, note.pitch.note),
                        number,
                        effects::SET_VOLUME,
                        volume as u8,
                    ),
                );
                state.play(note.key.sample_id, number);
            }
        }

        Ok(out)
    }

    /// A glissando directive on `channel`, if the command is one and its
    /// sample is defined. Effect samples may be slid even when they cannot
    /// be played.
    fn directive(&self, channel: usize, command: &ChannelCommand) -> Option<Directive> {
        if !command.is_glissando() {
            return None;
        }
        let sample_id = self.track.sample_for_voice(command.voice());
        let sample = self.catalog.defined(sample_id as usize)?;
        let semitones = semitone_offset(tracker_tuning(sample.tuning));
        Some(Directive {
            channel,
            sample_id,
            pitch: map_pitch(command, semitones),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tempo_pattern() {
        let pattern = tempo_pattern(6);
        let bytes = pattern.to_bytes();
        assert_eq!(&bytes[0..12], &[0, 0, 0x0f, 225, 0, 0, 0x0f, 6, 0, 0, 0x0d, 0]);
        assert!(bytes[12..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_tracker_bpm() {
        assert_eq!(TRACKER_BPM, 225);
    }

    fn track_with_patterns(count: usize) -> Track {
        Track::new(6, [0; 16], &[0, 3], vec![Pattern::blank(); count]).unwrap()
    }

    #[test]
    fn test_positions_with_blank_end() {
        let options = ConvertOptions {
            blank_end: true,
            ..Default::default()
        };
        let positions = song_positions(&track_with_patterns(4), &options).unwrap();
        assert_eq!(positions, vec![0, 1, 4, 5]);

        let positions = song_positions(&track_with_patterns(254), &options).unwrap();
        assert_eq!(positions[3], 255);
    }

    #[test]
    fn test_blank_end_needs_a_free_pattern_number() {
        let track = track_with_patterns(255);
        let options = ConvertOptions {
            blank_end: true,
            ..Default::default()
        };
        match song_positions(&track, &options) {
            Err(ConvertError::NoRoomForBlankEnd {
                last_pattern,
                limit,
            }) => {
                assert_eq!(last_pattern, 254);
                assert_eq!(limit, 253);
            }
            other => panic!("expected NoRoomForBlankEnd, got {:?}", other),
        }
    }

    #[test]
    fn test_many_patterns_without_blank_end() {
        let track = track_with_patterns(300);
        let positions = song_positions(&track, &ConvertOptions::default()).unwrap();
        assert_eq!(positions, vec![0, 1, 4]);
    }
}
