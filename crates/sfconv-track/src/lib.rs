//! Star Fighter 3000 music track model.
//!
//! This crate holds everything the converter knows about its *input*:
//!
//! - [`Track`]: tempo, voice table, play order and patterns, read from the
//!   game's uncompressed music data with [`Track::read`].
//! - [`Pattern`], [`Division`], [`ChannelCommand`]: the fixed 64 × 4 grid of
//!   4-byte commands. Sizes are enforced when a pattern is built.
//! - [`SampleCatalog`]: the game's sound samples by id, normally loaded from
//!   a sample index file with [`load_index`].
//!
//! Nothing here knows about the output format; see `sfconv-backend-mod`.
//!
//! # Example
//!
//! ```
//! use sfconv_track::{ChannelCommand, Pattern, Track};
//!
//! let pattern = Pattern::blank().with_command(0, 0, ChannelCommand::play(0, 2, 15, 0, 0));
//! let track = Track::new(6, [0; 16], &[0], vec![pattern]).unwrap();
//!
//! let bytes = track.to_bytes().unwrap();
//! assert_eq!(Track::from_bytes(&bytes).unwrap(), track);
//! ```

pub mod catalog;
pub mod command;
pub mod constants;
pub mod error;
pub mod index;
pub mod pattern;
pub mod track;

pub use catalog::{tuning_in_range, SampleCatalog, SampleDescriptor, SampleKind, TUNING_LIMIT};
pub use command::ChannelCommand;
pub use error::{IndexError, IndexFault, TrackError};
pub use index::{load_index, parse_index};
pub use pattern::{Division, Pattern};
pub use track::Track;
