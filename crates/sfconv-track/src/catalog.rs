//! Sample catalog: what the game knows about each sound sample.

/// Largest tuning magnitude whose conversion to tracker tuning units fits
/// comfortably in 32 bits.
pub const TUNING_LIMIT: i32 = (i32::MAX - 2048) / 96;

/// How a sample may be used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SampleKind {
    /// Sound effect; only used in music when explicitly allowed.
    Effect,
    /// Musical instrument.
    Music,
    /// No sample is defined for this id.
    #[default]
    Unused,
}

impl SampleKind {
    /// Decode the type letter used in sample index files.
    pub fn from_code(code: char) -> Self {
        match code {
            'e' | 'E' => SampleKind::Effect,
            'm' | 'M' => SampleKind::Music,
            _ => SampleKind::Unused,
        }
    }
}

/// One catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleDescriptor {
    /// Leaf name of the sample data file.
    pub file_name: String,
    /// Length of the sample data file in bytes (16-bit frames).
    pub len: u64,
    /// Loop start, in frames.
    pub repeat_offset: u32,
    /// Fine tuning in 1/4096 octave units.
    pub tuning: i32,
    pub kind: SampleKind,
}

impl SampleDescriptor {
    pub fn new(
        file_name: impl Into<String>,
        len: u64,
        repeat_offset: u32,
        tuning: i32,
        kind: SampleKind,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            len,
            repeat_offset,
            tuning,
            kind,
        }
    }

    /// Check if a note may select this sample.
    pub fn is_defined(&self) -> bool {
        self.kind != SampleKind::Unused
    }
}

/// Check that a tuning value is within [`TUNING_LIMIT`].
pub fn tuning_in_range(tuning: i32) -> bool {
    tuning.unsigned_abs() <= TUNING_LIMIT as u32
}

/// Samples indexed by id. Ids that were never defined read back as
/// [`SampleKind::Unused`] entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleCatalog {
    samples: Vec<SampleDescriptor>,
}

impl SampleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// One more than the highest defined id.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Look up a sample by id. `None` if the id is past the end of the
    /// catalog; gaps below the end come back as `Unused` entries.
    pub fn by_id(&self, id: usize) -> Option<&SampleDescriptor> {
        self.samples.get(id)
    }

    /// Look up a sample that a note may actually use.
    pub fn defined(&self, id: usize) -> Option<&SampleDescriptor> {
        self.by_id(id).filter(|s| s.is_defined())
    }

    /// Store a descriptor under `id`, growing the catalog as needed.
    /// Returns the previously defined descriptor, if any.
    pub fn insert(&mut self, id: u8, descriptor: SampleDescriptor) -> Option<SampleDescriptor> {
        let index = id as usize;
        if index >= self.samples.len() {
            self.samples.resize_with(index + 1, SampleDescriptor::default);
        }
        let previous = std::mem::replace(&mut self.samples[index], descriptor);
        previous.is_defined().then_some(previous)
    }

    /// Builder form of [`SampleCatalog::insert`].
    pub fn with(mut self, id: u8, descriptor: SampleDescriptor) -> Self {
        self.insert(id, descriptor);
        self
    }

    /// Iterate over `(id, descriptor)` for defined samples.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &SampleDescriptor)> {
        self.samples
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_defined())
    }
}
