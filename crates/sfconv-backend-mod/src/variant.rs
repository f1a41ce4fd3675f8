//! Sample variants: one source sample as loop-unrolled and pitch-shifted
//! for a particular use.
//!
//! The tracker cannot loop a sample a fixed number of times or play it
//! outside its octave range, so each distinct (sample, repeats, pre-tune)
//! combination becomes its own tracker sample.

use sfconv_track::constants::REPEAT_FOREVER;
use sfconv_track::SampleDescriptor;

use crate::error::{ConvertError, ConvertResult};
use crate::pitch::finetune;
use crate::protracker::{PtSampleHeader, MAX_SAMPLES, SAMPLE_VOLUME};
use crate::report::VariantSummary;

/// What makes two uses of a sample need different tracker samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariantKey {
    pub sample_id: u8,
    /// Repeat count from the note; [`REPEAT_FOREVER`] loops indefinitely.
    pub repeats: u8,
    /// Octaves to shift the sample data by. Negative pitches it down.
    pub pre_tune: i32,
}

impl VariantKey {
    pub fn new(sample_id: u8, repeats: u8, pre_tune: i32) -> Self {
        Self {
            sample_id,
            repeats,
            pre_tune,
        }
    }

    pub fn loops_forever(&self) -> bool {
        self.repeats == REPEAT_FOREVER
    }
}

/// A tracker sample derived from a source sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleVariant {
    pub key: VariantKey,
    /// The sample the data is read from.
    pub source: SampleDescriptor,
    /// `<file>-R<repeats>-O<pre-tune>`
    pub name: String,
    /// Source tuning in tracker units.
    pub tracker_tuning: i64,
    pub half_len: u16,
    pub half_repeat_offset: u16,
    pub half_repeat_len: u16,
}

impl SampleVariant {
    /// Work out the lengths of a variant of `sample`.
    ///
    /// Pitching down by an octave doubles the data, pitching up halves it.
    /// Finite repeats are unrolled into the data and leave the variant
    /// unlooped; [`REPEAT_FOREVER`] loops from the repeat offset instead.
    pub fn derive(
        sample: &SampleDescriptor,
        key: VariantKey,
        tracker_tuning: i64,
    ) -> ConvertResult<Self> {
        // Source data is 16-bit; the tracker stores 8 bits per frame
        let mut len = sample.len / 2;
        let mut offset = u64::from(sample.repeat_offset);

        let shift = key.pre_tune.unsigned_abs();
        if key.pre_tune < 0 {
            for _ in 0..shift.min(u64::BITS) {
                len = len.saturating_mul(2);
                offset = offset.saturating_mul(2);
            }
        } else {
            len = len.checked_shr(shift).unwrap_or(0);
            offset = offset.checked_shr(shift).unwrap_or(0);
        }

        // Bytes to 16-bit words
        len /= 2;
        offset /= 2;

        let (half_len, half_offset, half_repeat_len) = if key.loops_forever() {
            (len, offset, len.saturating_sub(offset))
        } else {
            let looped = len.saturating_sub(offset);
            let unrolled = len.saturating_add(looped.saturating_mul(u64::from(key.repeats)));
            (unrolled, 0, 0)
        };

        let overflow = || ConvertError::LengthOverflow {
            file_name: sample.file_name.clone(),
            repeats: key.repeats,
            repeat_offset: sample.repeat_offset,
            pre_tune: key.pre_tune,
        };

        Ok(Self {
            key,
            source: sample.clone(),
            name: format!("{}-R{}-O{}", sample.file_name, key.repeats, key.pre_tune),
            tracker_tuning,
            half_len: u16::try_from(half_len).map_err(|_| overflow())?,
            half_repeat_offset: u16::try_from(half_offset).map_err(|_| overflow())?,
            half_repeat_len: u16::try_from(half_repeat_len).map_err(|_| overflow())?,
        })
    }

    pub fn finetune(&self) -> i8 {
        finetune(self.tracker_tuning)
    }

    /// Bytes of sample data written for this variant.
    pub fn data_len(&self) -> u64 {
        u64::from(self.half_len) * 2
    }

    /// Sample-table entry for this variant.
    pub fn header(&self) -> PtSampleHeader {
        PtSampleHeader {
            name: self.name.clone(),
            half_len: self.half_len,
            finetune: self.finetune(),
            volume: SAMPLE_VOLUME,
            half_repeat_offset: self.half_repeat_offset,
            half_repeat_len: self.half_repeat_len,
        }
    }

    pub fn summary(&self, number: u8) -> VariantSummary {
        VariantSummary {
            number,
            name: self.name.clone(),
            sample_id: self.key.sample_id,
            repeats: self.key.repeats,
            pre_tune: self.key.pre_tune,
            half_len: self.half_len,
            half_repeat_offset: self.half_repeat_offset,
            half_repeat_len: self.half_repeat_len,
            finetune: self.finetune(),
        }
    }
}

/// Variants in sample-number order. Numbers are 1-based, as in the
/// module's pattern data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantTable {
    variants: Vec<SampleVariant>,
}

impl VariantTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.variants.len() >= MAX_SAMPLES
    }

    /// Sample number of the first variant with this key.
    pub fn find(&self, key: &VariantKey) -> Option<u8> {
        self.variants
            .iter()
            .position(|v| v.key == *key)
            .map(|i| (i + 1) as u8)
    }

    /// Look up a variant by 1-based sample number.
    pub fn get(&self, number: u8) -> Option<&SampleVariant> {
        (number as usize)
            .checked_sub(1)
            .and_then(|i| self.variants.get(i))
    }

    /// Append a variant and return its sample number.
    ///
    /// Callers check [`VariantTable::is_full`] first so the error can name
    /// the sample that did not fit.
    pub fn push(&mut self, variant: SampleVariant) -> Option<u8> {
        if self.is_full() {
            return None;
        }
        self.variants.push(variant);
        Some(self.variants.len() as u8)
    }

    /// Iterate over `(number, variant)`.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &SampleVariant)> {
        self.variants
            .iter()
            .enumerate()
            .map(|(i, v)| ((i + 1) as u8, v))
    }
}
