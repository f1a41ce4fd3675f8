//! Convert command implementation
//!
//! Converts one track (file or stdin to file or stdout), or a batch of
//! files each written next to its input with a `.mod` extension.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use sfconv_backend_mod::{
    convert, ConversionReport, ConvertError, ConvertOptions, DirSampleStore, SampleStore,
};
use sfconv_track::{load_index, SampleCatalog, Track};
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

use super::json_output::{error_codes, ConvertOutput, FileOutput, JsonError};
use crate::filetype::set_module_file_type;

/// Song name used when reading from stdin.
pub const DEFAULT_SONG_NAME: &str = "Star Fighter 3000";

/// Leaf name of the index file looked for in the samples directory.
pub const DEFAULT_INDEX_NAME: &str = "index";

/// Extension appended to input file names in batch mode.
pub const BATCH_EXTENSION: &str = "mod";

/// Parsed command line.
#[derive(Debug, Clone, Default)]
pub struct ConvertArgs {
    /// Directory holding the sample data files.
    pub samples_dir: PathBuf,
    /// Input and optional output in single mode; inputs in batch mode.
    pub files: Vec<PathBuf>,
    pub batch: bool,
    pub index_file: Option<PathBuf>,
    /// Song name for every module written.
    pub name: Option<String>,
    pub outfile: Option<PathBuf>,
    /// Debug output; failed output files are kept for inspection.
    pub verbose: bool,
    pub json: bool,
    pub options: ConvertOptions,
}

/// One conversion to perform. `None` means stdin or stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileJob {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl ConvertArgs {
    /// Work out the conversions the arguments ask for.
    pub fn jobs(&self) -> Result<Vec<FileJob>> {
        if self.batch {
            if self.outfile.is_some() {
                bail!("Cannot specify an output file in batch processing mode");
            }
            if self.files.is_empty() {
                bail!("Must specify file(s) in batch processing mode");
            }
            return Ok(self
                .files
                .iter()
                .map(|input| FileJob {
                    input: Some(input.clone()),
                    output: Some(batch_output_path(input)),
                })
                .collect());
        }

        let mut files = self.files.iter();
        let input = files.next().cloned();
        let mut output = self.outfile.clone();
        if let Some(path) = files.next() {
            if output.is_some() {
                bail!("Cannot specify more than one output file");
            }
            output = Some(path.clone());
        }
        if files.next().is_some() {
            bail!("Too many arguments (did you intend --batch?)");
        }

        // Module data on stdout must not be mixed up with other text
        if output.is_none() && self.verbose {
            bail!("Must specify an output file in verbose mode");
        }
        if output.is_none() && self.json {
            bail!("Must specify an output file with --json");
        }

        Ok(vec![FileJob { input, output }])
    }

    /// Index file to load.
    pub fn index_path(&self) -> PathBuf {
        self.index_file
            .clone()
            .unwrap_or_else(|| self.samples_dir.join(DEFAULT_INDEX_NAME))
    }

    fn song_name(&self, input: Option<&Path>) -> String {
        self.name.clone().unwrap_or_else(|| song_name_for(input))
    }
}

/// Output path for a batch input: the input path with `.mod` appended.
pub fn batch_output_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(".");
    name.push(BATCH_EXTENSION);
    PathBuf::from(name)
}

/// Default song name: the input's leaf name, or [`DEFAULT_SONG_NAME`] for
/// stdin.
pub fn song_name_for(input: Option<&Path>) -> String {
    input
        .and_then(Path::file_name)
        .map(|leaf| leaf.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_SONG_NAME.to_string())
}

/// A failed conversion of one file.
#[derive(Debug)]
pub struct FileError {
    /// Stable code from [`error_codes`].
    pub code: &'static str,
    pub error: anyhow::Error,
}

impl FileError {
    pub fn new(code: &'static str, error: impl Into<anyhow::Error>) -> Self {
        Self {
            code,
            error: error.into(),
        }
    }

    fn output(error: impl Into<anyhow::Error>) -> Self {
        Self::new(error_codes::OUTPUT_WRITE, error)
    }
}

impl From<ConvertError> for FileError {
    fn from(error: ConvertError) -> Self {
        let code = match &error {
            ConvertError::Io(_) => error_codes::OUTPUT_WRITE,
            ConvertError::Track(_) => error_codes::TRACK_FORMAT,
            ConvertError::SampleData { .. } => error_codes::SAMPLE_DATA,
            _ => error_codes::MODULE_LIMIT,
        };
        Self::new(code, error)
    }
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#}", self.error)
    }
}

/// Run the convert command
///
/// # Returns
/// Exit code: 0 if every file converted, 1 otherwise
pub fn run(args: &ConvertArgs) -> Result<ExitCode> {
    let jobs = args.jobs()?;

    if args.verbose && !args.json {
        println!(
            "{} {}",
            "Star Fighter 3000 to ProTracker converter".cyan().bold(),
            env!("CARGO_PKG_VERSION")
        );
    }

    let index_path = args.index_path();
    let catalog = load_index(&index_path, &args.samples_dir)?;
    info!(
        path = %index_path.display(),
        samples = catalog.iter().count(),
        "samples index loaded"
    );
    let store = DirSampleStore::new(&args.samples_dir);

    let mut files = Vec::with_capacity(jobs.len());
    for job in &jobs {
        let result = process_file(job, args, &catalog, &store);
        if !args.json {
            print_result(job, &result, args.verbose);
        }
        files.push(file_output(job, result));
    }

    let output = ConvertOutput::new(files);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if args.verbose {
        if output.success {
            println!("{}", "Conversion completed successfully".green().bold());
        } else {
            println!("{}", "Conversion failed".red().bold());
        }
    }

    Ok(if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// Convert one file.
///
/// The track is parsed before the output file is created. A partly
/// written output file is removed on failure unless verbose mode is on.
pub fn process_file<S: SampleStore>(
    job: &FileJob,
    args: &ConvertArgs,
    catalog: &SampleCatalog,
    store: &S,
) -> Result<ConversionReport, FileError> {
    let song_name = args.song_name(job.input.as_deref());
    let data = read_input(job.input.as_deref())
        .map_err(|e| FileError::new(error_codes::INPUT_READ, e))?;
    let track =
        Track::from_bytes(&data).map_err(|e| FileError::new(error_codes::TRACK_FORMAT, e))?;
    debug!(
        tempo = track.tempo(),
        patterns = track.patterns().len(),
        "track loaded"
    );

    match &job.output {
        Some(path) => {
            let result = write_file(path, &track, &song_name, args, catalog, store);
            if result.is_err() && !args.verbose {
                debug!(path = %path.display(), "removing failed output file");
                if let Err(e) = fs::remove_file(path) {
                    debug!(error = %e, "could not remove output file");
                }
            }
            result
        }
        None => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            let report = convert(&track, catalog, store, &args.options, &song_name, &mut out)?;
            out.flush()
                .context("Failed writing to standard output")
                .map_err(FileError::output)?;
            Ok(report)
        }
    }
}

fn read_input(input: Option<&Path>) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    match input {
        Some(path) => {
            debug!(path = %path.display(), "opening input file");
            File::open(path)
                .and_then(|mut file| file.read_to_end(&mut data))
                .with_context(|| format!("Failed to open input file '{}'", path.display()))?;
        }
        None => {
            eprintln!("Reading from stdin...");
            io::stdin()
                .lock()
                .read_to_end(&mut data)
                .context("Failed to read from stdin")?;
        }
    }
    Ok(data)
}

fn write_file<S: SampleStore>(
    path: &Path,
    track: &Track,
    song_name: &str,
    args: &ConvertArgs,
    catalog: &SampleCatalog,
    store: &S,
) -> Result<ConversionReport, FileError> {
    debug!(path = %path.display(), "opening output file");
    let file = File::create(path)
        .with_context(|| format!("Failed to open output file '{}'", path.display()))
        .map_err(FileError::output)?;

    let mut out = BufWriter::new(file);
    let report = convert(track, catalog, store, &args.options, song_name, &mut out)?;

    debug!("closing output file");
    out.into_inner()
        .map_err(|e| e.into_error())
        .context("Failed to close output file")
        .map_err(FileError::output)?;

    set_module_file_type(path)
        .with_context(|| format!("Failed to set type of output file '{}'", path.display()))
        .map_err(FileError::output)?;

    Ok(report)
}

fn display_input(job: &FileJob) -> String {
    job.input
        .as_ref()
        .map_or_else(|| "<stdin>".to_string(), |p| p.display().to_string())
}

fn display_output(job: &FileJob) -> String {
    job.output
        .as_ref()
        .map_or_else(|| "<stdout>".to_string(), |p| p.display().to_string())
}

fn file_output(job: &FileJob, result: Result<ConversionReport, FileError>) -> FileOutput {
    let input = job.input.as_ref().map(|p| p.display().to_string());
    let output = display_output(job);
    match result {
        Ok(report) => FileOutput {
            input,
            output,
            success: true,
            error: None,
            report: Some(report),
        },
        Err(e) => FileOutput {
            input,
            output,
            success: false,
            error: Some(JsonError::new(e.code, e.to_string())),
            report: None,
        },
    }
}

/// Print the outcome of one file. The summary goes to stderr when the
/// module itself went to stdout.
fn print_result(job: &FileJob, result: &Result<ConversionReport, FileError>, verbose: bool) {
    let report = match result {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{}: {}: {}", "error".red(), display_input(job), e);
            return;
        }
    };

    let mut lines = vec![
        format!(
            "{} {} -> {}",
            "Converted".green().bold(),
            display_input(job),
            display_output(job)
        ),
        format!(
            "  {} samples, {} patterns, {} positions, {} bytes",
            report.variants.len(),
            report.patterns,
            report.song_length,
            report.bytes_written
        ),
        format!("  {} {}", "blake3:".dimmed(), report.blake3),
    ];

    if verbose {
        for v in &report.variants {
            lines.push(format!(
                "  {:>2} {:<22} len {:>5} loop {:>5}+{:<5} finetune {:>2}",
                v.number, v.name, v.half_len, v.half_repeat_offset, v.half_repeat_len, v.finetune
            ));
        }
    }
    for warning in &report.warnings {
        lines.push(format!("  {} {}", "!".yellow(), warning));
    }

    for line in lines {
        if job.output.is_some() {
            println!("{}", line);
        } else {
            eprintln!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(files: &[&str]) -> ConvertArgs {
        ConvertArgs {
            samples_dir: PathBuf::from("Samples"),
            files: files.iter().map(PathBuf::from).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_single_mode_jobs() {
        assert_eq!(
            args(&[]).jobs().unwrap(),
            vec![FileJob {
                input: None,
                output: None
            }]
        );
        assert_eq!(
            args(&["Title", "Title.mod"]).jobs().unwrap(),
            vec![FileJob {
                input: Some(PathBuf::from("Title")),
                output: Some(PathBuf::from("Title.mod")),
            }]
        );

        let mut with_outfile = args(&["Title"]);
        with_outfile.outfile = Some(PathBuf::from("Out.mod"));
        assert_eq!(
            with_outfile.jobs().unwrap()[0].output,
            Some(PathBuf::from("Out.mod"))
        );
    }

    #[test]
    fn test_argument_rules() {
        let mut two_outputs = args(&["Title", "Title.mod"]);
        two_outputs.outfile = Some(PathBuf::from("Out.mod"));
        assert!(two_outputs.jobs().is_err());

        assert!(args(&["a", "b", "c"]).jobs().is_err());

        let mut verbose = args(&["Title"]);
        verbose.verbose = true;
        assert!(verbose.jobs().is_err());

        let mut json = args(&["Title"]);
        json.json = true;
        assert!(json.jobs().is_err());
    }

    #[test]
    fn test_batch_jobs() {
        let mut batch = args(&["Music/Title", "Music/Level1"]);
        batch.batch = true;
        let jobs = batch.jobs().unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[1].output, Some(PathBuf::from("Music/Level1.mod")));

        batch.outfile = Some(PathBuf::from("x.mod"));
        assert!(batch.jobs().is_err());

        let mut empty = args(&[]);
        empty.batch = true;
        assert!(empty.jobs().is_err());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(args(&[]).index_path(), PathBuf::from("Samples").join("index"));
        assert_eq!(song_name_for(Some(Path::new("Music/Title"))), "Title");
        assert_eq!(song_name_for(None), DEFAULT_SONG_NAME);

        let mut named = args(&[]);
        named.name = Some("Theme".to_string());
        assert_eq!(named.song_name(Some(Path::new("Music/Title"))), "Theme");
    }
}
