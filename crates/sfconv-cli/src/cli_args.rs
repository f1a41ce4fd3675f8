//! CLI argument definitions for the sfconv command-line interface.

use clap::Parser;
use sfconv_backend_mod::ConvertOptions;
use sfconv_cli::commands::convert::ConvertArgs;
use std::path::PathBuf;

/// Converts Star Fighter 3000 music to Amiga ProTracker format
#[derive(Parser, Debug)]
#[command(name = "sfconv")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "If no input file is specified, it reads from stdin.\n\
If no output file is specified, it writes to stdout.\n\
In batch processing mode, output file names are generated by appending\n\
extension 'mod' to the input file names.")]
pub(crate) struct Cli {
    /// Directory containing the sound sample files
    pub samples_dir: PathBuf,

    /// Input file and optional output file, or the files to convert in batch mode
    pub files: Vec<PathBuf>,

    /// Allow notes to be played using sound effect samples
    #[arg(long)]
    pub allow_sfx: bool,

    /// Process a batch of files
    #[arg(long)]
    pub batch: bool,

    /// Append a blank pattern to the end of the song
    #[arg(long)]
    pub blank_end: bool,

    /// Restrict glissando effects to the same channel
    #[arg(long)]
    pub channel_glissando: bool,

    /// Utilise non-standard ProTracker octaves 0 and 4
    #[arg(long)]
    pub extra_octaves: bool,

    /// Index file to use instead of looking in the samples directory
    #[arg(long, value_name = "FILE")]
    pub index_file: Option<PathBuf>,

    /// Name to give the song (default is the input file name)
    #[arg(long, value_name = "SONG")]
    pub name: Option<String>,

    /// Specify a name for the output file
    #[arg(short, long, value_name = "FILE")]
    pub outfile: Option<PathBuf>,

    /// Emit debug output (and keep bad output)
    #[arg(short, long, visible_alias = "debug")]
    pub verbose: bool,

    /// Output a machine-readable JSON report (no colored output)
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn into_args(self) -> ConvertArgs {
        ConvertArgs {
            samples_dir: self.samples_dir,
            files: self.files,
            batch: self.batch,
            index_file: self.index_file,
            name: self.name,
            outfile: self.outfile,
            verbose: self.verbose,
            json: self.json,
            options: ConvertOptions {
                single_channel_glissando: self.channel_glissando,
                blank_end: self.blank_end,
                allow_sfx: self.allow_sfx,
                extra_octaves: self.extra_octaves,
            },
        }
    }
}
