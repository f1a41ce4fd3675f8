//! First pass over a track: decide which sample variants the module needs.

use sfconv_track::{ChannelCommand, SampleCatalog, SampleDescriptor, SampleKind, Track};
use tracing::{debug, warn};

use crate::error::{ConvertError, ConvertResult};
use crate::options::ConvertOptions;
use crate::pitch::{fit_note, tracker_tuning, OctaveBand, Pitch};
use crate::protracker::MAX_SAMPLES;
use crate::report::{ConvertWarning, Location};
use crate::variant::{SampleVariant, VariantKey, VariantTable};

/// Why a command produces no note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Silent {
    Empty,
    Glissando,
    /// The voice maps to a sample the catalog does not define.
    Undefined(u8),
    /// A sound effect sample while effects are not allowed.
    Effect(u8),
}

/// A command that plays a note.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Note<'a> {
    pub key: VariantKey,
    pub sample: &'a SampleDescriptor,
    pub tracker_tuning: i64,
    /// Pitch to play, octave already clamped.
    pub pitch: Pitch,
}

/// Resolve a command to the note it plays, if any.
///
/// Selection and emission both go through here so that they agree on which
/// commands need a variant.
pub(crate) fn resolve_note<'a>(
    track: &Track,
    catalog: &'a SampleCatalog,
    command: &ChannelCommand,
    options: &ConvertOptions,
) -> Result<Note<'a>, Silent> {
    if command.is_empty() {
        return Err(Silent::Empty);
    }
    if command.is_glissando() {
        return Err(Silent::Glissando);
    }

    let sample_id = track.sample_for_voice(command.voice());
    let sample = catalog
        .defined(sample_id as usize)
        .ok_or(Silent::Undefined(sample_id))?;
    if sample.kind == SampleKind::Effect && !options.allow_sfx {
        return Err(Silent::Effect(sample_id));
    }

    let tracker_tuning = tracker_tuning(sample.tuning);
    let (pitch, pre_tune) = fit_note(command, tracker_tuning, OctaveBand::new(options.extra_octaves));

    Ok(Note {
        key: VariantKey::new(sample_id, command.repeat_count(), pre_tune),
        sample,
        tracker_tuning,
        pitch,
    })
}

/// Walk every command of every pattern and build the variant table, in
/// order of first use.
///
/// Fails with [`ConvertError::TooManySamples`] if more than
/// [`MAX_SAMPLES`] variants are needed and with
/// [`ConvertError::NoUsableSamples`] if none are.
pub fn select_variants(
    track: &Track,
    catalog: &SampleCatalog,
    options: &ConvertOptions,
    warnings: &mut Vec<ConvertWarning>,
) -> ConvertResult<VariantTable> {
    let mut table = VariantTable::new();

    for (pattern_no, pattern) in track.patterns().iter().enumerate() {
        for (division_no, division) in pattern.divisions().iter().enumerate() {
            for (channel, command) in division.channels.iter().enumerate() {
                let at = Location::new(pattern_no, division_no, channel);
                let note = match resolve_note(track, catalog, command, options) {
                    Ok(note) => note,
                    Err(Silent::Undefined(sample_id)) => {
                        warn!(sample_id, %at, "undefined sample");
                        warnings.push(ConvertWarning::UndefinedSample { sample_id, at });
                        continue;
                    }
                    Err(Silent::Effect(sample_id)) => {
                        debug!(sample_id, %at, "ignoring sound effect sample");
                        warnings.push(ConvertWarning::EffectDropped { sample_id, at });
                        continue;
                    }
                    Err(Silent::Empty | Silent::Glissando) => continue,
                };

                if table.find(&note.key).is_some() {
                    continue;
                }
                if table.is_full() {
                    return Err(ConvertError::TooManySamples {
                        limit: MAX_SAMPLES,
                        file_name: note.sample.file_name.clone(),
                        pattern: pattern_no,
                    });
                }

                let variant = SampleVariant::derive(note.sample, note.key, note.tracker_tuning)?;
                debug!(
                    name = %variant.name,
                    half_len = variant.half_len,
                    half_repeat_offset = variant.half_repeat_offset,
                    half_repeat_len = variant.half_repeat_len,
                    "new sample variant"
                );
                table.push(variant);
            }
        }
    }

    if table.is_empty() {
        return Err(ConvertError::NoUsableSamples);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sfconv_track::{Pattern, SampleDescriptor};

    fn catalog() -> SampleCatalog {
        SampleCatalog::new()
            .with(0, SampleDescriptor::new("Bass", 64, 0, 0, SampleKind::Music))
            .with(2, SampleDescriptor::new("Boom", 64, 0, 0, SampleKind::Effect))
    }

    fn track(pattern: Pattern) -> Track {
        // voice n -> sample n
        let voices: [u8; 16] = std::array::from_fn(|i| i as u8);
        Track::new(6, voices, &[0], vec![pattern]).unwrap()
    }

    #[test]
    fn test_same_use_shares_a_variant() {
        let pattern = Pattern::blank()
            .with_command(0, 0, ChannelCommand::play(0, 2, 15, 0, 15))
            .with_command(0, 1, ChannelCommand::play(5, 2, 8, 0, 15))
            .with_command(9, 3, ChannelCommand::play(0, 1, 15, 0, 15));
        let mut warnings = Vec::new();
        let table =
            select_variants(&track(pattern), &catalog(), &ConvertOptions::default(), &mut warnings)
                .unwrap();
        assert_eq!(table.len(), 1);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_variants_in_order_of_first_use() {
        let pattern = Pattern::blank()
            .with_command(0, 3, ChannelCommand::play(0, 2, 15, 0, 2))
            .with_command(1, 0, ChannelCommand::play(0, 0, 15, 0, 15))
            .with_command(2, 0, ChannelCommand::play(0, 2, 15, 0, 15));
        let table = select_variants(
            &track(pattern),
            &catalog(),
            &ConvertOptions::default(),
            &mut Vec::new(),
        )
        .unwrap();

        let keys: Vec<VariantKey> = table.iter().map(|(_, v)| v.key).collect();
        assert_eq!(
            keys,
            vec![
                VariantKey::new(0, 2, 0),
                VariantKey::new(0, 15, -1),
                VariantKey::new(0, 15, 0),
            ]
        );
    }

    #[test]
    fn test_effects_need_permission() {
        let pattern = Pattern::blank()
            .with_command(0, 0, ChannelCommand::play(0, 2, 15, 2, 0))
            .with_command(1, 0, ChannelCommand::play(0, 2, 15, 0, 0));

        let mut warnings = Vec::new();
        let table = select_variants(
            &track(pattern.clone()),
            &catalog(),
            &ConvertOptions::default(),
            &mut warnings,
        )
        .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(
            warnings,
            vec![ConvertWarning::EffectDropped {
                sample_id: 2,
                at: Location::new(0, 0, 0)
            }]
        );

        let options = ConvertOptions {
            allow_sfx: true,
            ..Default::default()
        };
        let table = select_variants(&track(pattern), &catalog(), &options, &mut Vec::new()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1).unwrap().name, "Boom-R0-O0");
    }

    #[test]
    fn test_undefined_and_glissando_commands_are_skipped() {
        let pattern = Pattern::blank()
            .with_command(0, 0, ChannelCommand::play(0, 2, 15, 1, 0))
            .with_command(0, 1, ChannelCommand::play(0, 2, 15, 9, 0))
            .with_command(0, 2, ChannelCommand::glissando(0, 2, 0))
            .with_command(1, 0, ChannelCommand::play(0, 2, 15, 0, 0));

        let mut warnings = Vec::new();
        let table =
            select_variants(&track(pattern), &catalog(), &ConvertOptions::default(), &mut warnings)
                .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(warnings.len(), 2);
        assert!(matches!(
            warnings[1],
            ConvertWarning::UndefinedSample { sample_id: 9, .. }
        ));
    }

    #[test]
    fn test_no_usable_samples() {
        let pattern = Pattern::blank().with_command(0, 0, ChannelCommand::glissando(0, 2, 0));
        let err = select_variants(
            &track(pattern),
            &catalog(),
            &ConvertOptions::default(),
            &mut Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::NoUsableSamples));
    }

    #[test]
    fn test_too_many_samples() {
        // 16 repeat counts at two pre-tunes need 32 variants
        let mut pattern = Pattern::blank();
        for division in 0..32 {
            let repeats = (division % 16) as u8;
            let octave = if division < 16 { 2 } else { 0 };
            pattern.set_command(division, 0, ChannelCommand::play(0, octave, 15, 0, repeats));
        }

        let err = select_variants(
            &track(pattern),
            &catalog(),
            &ConvertOptions::default(),
            &mut Vec::new(),
        )
        .unwrap_err();
        match err {
            ConvertError::TooManySamples {
                limit,
                file_name,
                pattern,
            } => {
                assert_eq!(limit, 31);
                assert_eq!(file_name, "Bass");
                assert_eq!(pattern, 0);
            }
            other => panic!("expected TooManySamples, got {:?}", other),
        }
    }
}
