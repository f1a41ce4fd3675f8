//! Module writer - assembles the header and patterns.

use std::io::{self, Write};

use super::header::PtHeader;
use super::pattern::PtPattern;
use super::sample::PtSampleHeader;

/// A module without its sample data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PtModule {
    pub header: PtHeader,
    /// Stored patterns, in pattern-number order.
    pub patterns: Vec<PtPattern>,
}

impl PtModule {
    pub fn new(name: &str) -> Self {
        Self {
            header: PtHeader::new(name),
            patterns: Vec::new(),
        }
    }

    /// Add a pattern and return its pattern number.
    pub fn add_pattern(&mut self, pattern: PtPattern) -> usize {
        self.patterns.push(pattern);
        self.patterns.len() - 1
    }

    /// Add a sample header and return its 1-based sample number.
    pub fn add_sample(&mut self, sample: PtSampleHeader) -> usize {
        self.header.samples.push(sample);
        self.header.samples.len()
    }

    /// Set the position list (pattern playback order).
    pub fn set_positions(&mut self, positions: &[u8]) {
        self.header.positions = positions.to_vec();
    }

    /// Write the header and every pattern.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.header.write(writer)?;
        for pattern in &self.patterns {
            pattern.write(writer)?;
        }
        Ok(())
    }

    /// Write the module to a byte vector.
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write(&mut buffer)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protracker::{effects, PtCommand, HEADER_SIZE, PATTERN_SIZE};

    #[test]
    fn test_module_layout() {
        let mut module = PtModule::new("Song");
        assert_eq!(module.add_sample(PtSampleHeader::default()), 1);

        let mut first = PtPattern::empty();
        first.set(0, 0, PtCommand::effect(effects::SET_SPEED, 6));
        assert_eq!(module.add_pattern(first), 0);
        assert_eq!(module.add_pattern(PtPattern::empty()), 1);
        module.set_positions(&[0, 1]);

        let bytes = module.to_bytes().unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE + 2 * PATTERN_SIZE);
        assert_eq!(bytes[950], 2);
        assert_eq!(&bytes[HEADER_SIZE..HEADER_SIZE + 4], &[0, 0, 0x0f, 6]);
    }
}
