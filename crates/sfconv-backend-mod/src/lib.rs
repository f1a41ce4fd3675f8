//! ProTracker backend for sfconv.
//!
//! Converts a Star Fighter 3000 [`Track`](sfconv_track::Track) and its
//! [`SampleCatalog`](sfconv_track::SampleCatalog) into a 4-channel,
//! 31-sample "M.K." module in two passes:
//!
//! 1. [`select_variants`] finds every distinct use of a sample (repeat
//!    count and the octave shift needed to keep the note playable) and
//!    assigns each a tracker sample number.
//! 2. [`transcode_patterns`] emits the pattern data, turning glissando
//!    directives into tone portamento on every channel they affect.
//!
//! [`convert`] runs both and streams the module and sample data to a
//! writer. Sample data comes from a [`SampleStore`].
//!
//! # Example
//!
//! ```
//! use sfconv_backend_mod::{convert, ConvertOptions, MemorySampleStore};
//! use sfconv_track::{ChannelCommand, Pattern, SampleCatalog, SampleDescriptor, SampleKind, Track};
//!
//! let catalog = SampleCatalog::new()
//!     .with(0, SampleDescriptor::new("Bass", 64, 0, 0, SampleKind::Music));
//! let store = MemorySampleStore::new().with("Bass", vec![0; 64]);
//! let pattern = Pattern::blank().with_command(0, 0, ChannelCommand::play(0, 2, 15, 0, 15));
//! let track = Track::new(6, [0; 16], &[0], vec![pattern]).unwrap();
//!
//! let mut out = Vec::new();
//! let report = convert(&track, &catalog, &store, &ConvertOptions::default(), "Demo", &mut out)
//!     .unwrap();
//! assert_eq!(report.variants.len(), 1);
//! assert_eq!(&out[1080..1084], b"M.K.");
//! ```

pub mod convert;
pub mod encode;
pub mod error;
pub mod glissando;
pub mod options;
pub mod pitch;
pub mod protracker;
pub mod report;
pub mod select;
pub mod transcode;
pub mod variant;

pub use convert::{convert, plan_conversion, ConversionPlan};
pub use encode::{encode_variant, DirSampleStore, MemorySampleStore, SampleStore};
pub use error::{ConvertError, ConvertResult};
pub use options::ConvertOptions;
pub use report::{ConversionReport, ConvertWarning, Location, VariantSummary};
pub use select::select_variants;
pub use transcode::{song_positions, tempo_pattern, transcode_patterns};
pub use variant::{SampleVariant, VariantKey, VariantTable};
