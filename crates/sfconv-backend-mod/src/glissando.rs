//! Per-channel glissando state.
//!
//! A glissando directive in the source track slides every channel that is
//! playing the directive's sample towards a new note. The tracker has no
//! such broadcast, so each affected channel gets a tone portamento: the
//! first division carries the target period and later blank divisions keep
//! the slide going until the channel plays a new note.

use sfconv_track::constants::NUM_CHANNELS;
use tracing::{debug, warn};

use crate::pitch::{OctaveBand, Pitch, STANDARD_OCTAVES};
use crate::protracker::{effects, period, PtCommand};
use crate::report::{ConvertWarning, Location};
use crate::variant::VariantTable;

/// Tone portamento speed used for every slide.
pub const PORTAMENTO_SPEED: u8 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GlissandoPhase {
    #[default]
    None,
    /// Emit the target period on the next blank division.
    Start,
    /// Keep sliding on each blank division.
    Continue,
}

/// The sample a channel is playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Held {
    /// Source sample id.
    pub sample_id: u8,
    /// 1-based variant number.
    pub variant: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelState {
    pub held: Option<Held>,
    pub phase: GlissandoPhase,
    pub target_period: u16,
}

/// State of all channels, carried from division to division.
pub type Channels = [ChannelState; NUM_CHANNELS];

impl ChannelState {
    /// A note started: remember its sample and stop any slide.
    pub fn play(&mut self, sample_id: u8, variant: u8) {
        self.held = Some(Held { sample_id, variant });
        self.phase = GlissandoPhase::None;
    }

    /// Produce the command for a division in which this channel plays no
    /// note, advancing the slide.
    pub fn step(&mut self) -> PtCommand {
        match self.phase {
            GlissandoPhase::None => PtCommand::empty(),
            GlissandoPhase::Start => {
                self.phase = GlissandoPhase::Continue;
                let variant = self.held.map_or(0, |h| h.variant);
                PtCommand::new(
                    self.target_period,
                    variant,
                    effects::TONE_PORTAMENTO,
                    PORTAMENTO_SPEED,
                )
            }
            GlissandoPhase::Continue => {
                PtCommand::effect(effects::TONE_PORTAMENTO, PORTAMENTO_SPEED)
            }
        }
    }
}

/// A glissando directive found on one channel of a division.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive {
    pub channel: usize,
    pub sample_id: u8,
    /// Target pitch with the sample's tuning applied; octave not clamped.
    pub pitch: Pitch,
}

/// Rules for applying directives.
#[derive(Debug, Clone, Copy)]
pub struct GlissandoRules {
    pub band: OctaveBand,
    /// Only the channel carrying the directive slides.
    pub single_channel: bool,
}

/// Retarget every channel holding the directive's sample.
///
/// Each channel's target octave is taken relative to the pre-tune of the
/// variant it is playing, then clamped to the band.
pub fn apply_directive(
    channels: &mut Channels,
    directive: &Directive,
    variants: &VariantTable,
    rules: &GlissandoRules,
    pattern: usize,
    division: usize,
    warnings: &mut Vec<ConvertWarning>,
) {
    for (channel, state) in channels.iter_mut().enumerate() {
        let Some(held) = state.held else {
            continue;
        };
        if held.sample_id != directive.sample_id {
            continue;
        }

        if channel != directive.channel {
            if rules.single_channel {
                debug!(
                    from = directive.channel,
                    to = channel,
                    "cross-channel glissando suppressed"
                );
                continue;
            }
            debug!(from = directive.channel, to = channel, "cross-channel glissando");
        }

        let at = Location::new(pattern, division, channel);
        let pre_tune = variants.get(held.variant).map_or(0, |v| v.key.pre_tune);
        let octave = directive.pitch.octave - pre_tune;
        let clamped = rules.band.clamp(octave);
        if clamped != octave {
            warn!(octave, clamped, %at, "glissando target out of range");
            warnings.push(ConvertWarning::GlissandoClamped {
                octave,
                clamped,
                at,
            });
        }
        if !STANDARD_OCTAVES.contains(&clamped) {
            warnings.push(ConvertWarning::NonStandardOctave {
                octave: clamped,
                at,
            });
        }

        state.target_period = period(clamped, directive.pitch.note);
        state.phase = GlissandoPhase::Start;
    }
}
