//! Divisions and patterns.

use crate::command::ChannelCommand;
use crate::constants::{NUM_CHANNELS, NUM_DIVISIONS};
use crate::error::TrackError;

/// One time-slice of a pattern: a command per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Division {
    pub channels: [ChannelCommand; NUM_CHANNELS],
}

impl Division {
    /// A division in which every channel is a no-op.
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn new(channels: [ChannelCommand; NUM_CHANNELS]) -> Self {
        Self { channels }
    }

    /// Check if every channel is a no-op.
    pub fn is_blank(&self) -> bool {
        self.channels.iter().all(ChannelCommand::is_empty)
    }
}

/// A pattern of exactly [`NUM_DIVISIONS`] divisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    divisions: [Division; NUM_DIVISIONS],
}

impl Default for Pattern {
    fn default() -> Self {
        Self::blank()
    }
}

impl Pattern {
    /// An all-blank pattern.
    pub fn blank() -> Self {
        Self {
            divisions: [Division::blank(); NUM_DIVISIONS],
        }
    }

    /// Build a pattern from a list of divisions, which must have exactly
    /// [`NUM_DIVISIONS`] entries.
    pub fn from_divisions(divisions: Vec<Division>) -> Result<Self, TrackError> {
        let divisions: [Division; NUM_DIVISIONS] = divisions
            .try_into()
            .map_err(|rejected: Vec<Division>| TrackError::PatternSize {
                divisions: rejected.len(),
            })?;
        Ok(Self { divisions })
    }

    pub fn divisions(&self) -> &[Division] {
        &self.divisions
    }

    pub fn division(&self, index: usize) -> Option<&Division> {
        self.divisions.get(index)
    }

    /// Get a command at the given position.
    pub fn command(&self, division: usize, channel: usize) -> Option<&ChannelCommand> {
        self.divisions
            .get(division)
            .and_then(|d| d.channels.get(channel))
    }

    /// Set a command at the given position. Out-of-range positions are ignored.
    pub fn set_command(&mut self, division: usize, channel: usize, command: ChannelCommand) {
        if let Some(slot) = self
            .divisions
            .get_mut(division)
            .and_then(|d| d.channels.get_mut(channel))
        {
            *slot = command;
        }
    }

    /// Builder form of [`Pattern::set_command`].
    pub fn with_command(mut self, division: usize, channel: usize, command: ChannelCommand) -> Self {
        self.set_command(division, channel, command);
        self
    }
}
