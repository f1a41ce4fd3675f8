//! sfconv - converts Star Fighter 3000 music to Amiga ProTracker modules.

use clap::Parser;
use std::process::ExitCode;

use sfconv_cli::{commands, logging};

mod cli_args;

use cli_args::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if cli.json {
        colored::control::set_override(false);
    }

    match commands::convert::run(&cli.into_args()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_cli_parses_single_mode() {
        let cli = Cli::try_parse_from(["sfconv", "Samples", "Title", "Title.mod"]).unwrap();
        let args = cli.into_args();
        assert_eq!(args.samples_dir, PathBuf::from("Samples"));
        assert_eq!(args.files.len(), 2);
        assert!(!args.batch);
        assert!(!args.options.blank_end);
    }

    #[test]
    fn test_cli_maps_switches() {
        let cli = Cli::try_parse_from([
            "sfconv",
            "--allow-sfx",
            "--blank-end",
            "--channel-glissando",
            "--extra-octaves",
            "--debug",
            "-o",
            "Out.mod",
            "Samples",
        ])
        .unwrap();
        let args = cli.into_args();
        assert!(args.options.allow_sfx);
        assert!(args.options.blank_end);
        assert!(args.options.single_channel_glissando);
        assert!(args.options.extra_octaves);
        assert!(args.verbose);
        assert_eq!(args.outfile, Some(PathBuf::from("Out.mod")));
    }

    #[test]
    fn test_cli_parses_batch_mode() {
        let cli =
            Cli::try_parse_from(["sfconv", "--batch", "Samples", "Title", "Level1", "Level2"])
                .unwrap();
        let args = cli.into_args();
        assert!(args.batch);
        assert_eq!(args.files.len(), 3);
    }

    #[test]
    fn test_cli_requires_samples_dir() {
        assert!(Cli::try_parse_from(["sfconv"]).is_err());
    }
}
