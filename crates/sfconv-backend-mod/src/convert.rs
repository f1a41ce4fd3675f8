//! Whole-track conversion.

use std::io::{self, Write};

use sfconv_track::{SampleCatalog, Track};
use tracing::{debug, info};

use crate::encode::{encode_variant, SampleStore};
use crate::error::{ConvertError, ConvertResult};
use crate::options::ConvertOptions;
use crate::protracker::PtModule;
use crate::report::{ConversionReport, ConvertWarning};
use crate::select::select_variants;
use crate::transcode::{song_positions, tempo_pattern, transcode_patterns};
use crate::variant::VariantTable;

/// Everything about a module except its sample data, worked out before
/// any output is written.
#[derive(Debug, Clone)]
pub struct ConversionPlan {
    pub module: PtModule,
    pub variants: VariantTable,
    pub warnings: Vec<ConvertWarning>,
    pub options: ConvertOptions,
    pub speed: u8,
}

/// Plan the module for a track.
///
/// Checks the play order, selects sample variants and transcodes every
/// pattern. Nothing is read from the sample store.
pub fn plan_conversion(
    track: &Track,
    catalog: &SampleCatalog,
    options: &ConvertOptions,
    song_name: &str,
) -> ConvertResult<ConversionPlan> {
    let positions = song_positions(track, options)?;
    debug!(positions = positions.len(), "song positions");

    let mut warnings = Vec::new();
    let variants = select_variants(track, catalog, options, &mut warnings)?;
    debug!(variants = variants.len(), "sample variants selected");

    let patterns = transcode_patterns(track, catalog, &variants, options, &mut warnings)?;

    let mut module = PtModule::new(song_name);
    for (_, variant) in variants.iter() {
        module.add_sample(variant.header());
    }
    module.add_pattern(tempo_pattern(track.tempo()));
    for pattern in patterns {
        module.add_pattern(pattern);
    }
    module.set_positions(&positions);

    Ok(ConversionPlan {
        module,
        variants,
        warnings,
        options: *options,
        speed: track.tempo(),
    })
}

impl ConversionPlan {
    /// Write the module followed by the data of every variant, in sample
    /// number order.
    pub fn write<S, W>(&self, store: &S, writer: W) -> ConvertResult<ConversionReport>
    where
        S: SampleStore,
        W: Write,
    {
        let mut out = HashingWriter::new(writer);
        self.module.write(&mut out)?;

        for (number, variant) in self.variants.iter() {
            let mut reader = store.open(&variant.source).map_err(|source| {
                ConvertError::SampleData {
                    file_name: variant.source.file_name.clone(),
                    source,
                }
            })?;
            debug!(number, name = %variant.name, "writing sample data");
            encode_variant(variant, &mut reader, &mut out)?;
        }
        out.flush()?;

        let (bytes_written, hash) = out.finish();
        info!(
            bytes_written,
            samples = self.variants.len(),
            patterns = self.module.patterns.len(),
            "module written"
        );

        Ok(ConversionReport {
            song_name: self.module.header.name.clone(),
            speed: self.speed,
            song_length: self.module.header.positions.len(),
            patterns: self.module.patterns.len(),
            options: self.options,
            variants: self
                .variants
                .iter()
                .map(|(number, v)| v.summary(number))
                .collect(),
            warnings: self.warnings.clone(),
            bytes_written,
            blake3: hash,
        })
    }
}

/// Convert a track to a module, writing it to `writer`.
pub fn convert<S, W>(
    track: &Track,
    catalog: &SampleCatalog,
    store: &S,
    options: &ConvertOptions,
    song_name: &str,
    writer: W,
) -> ConvertResult<ConversionReport>
where
    S: SampleStore,
    W: Write,
{
    plan_conversion(track, catalog, options, song_name)?.write(store, writer)
}

/// Counts and hashes everything written through it.
struct HashingWriter<W> {
    inner: W,
    hasher: blake3::Hasher,
    written: u64,
}

impl<W: Write> HashingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: blake3::Hasher::new(),
            written: 0,
        }
    }

    fn finish(self) -> (u64, String) {
        (self.written, self.hasher.finalize().to_hex().to_string())
    }
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
