//! Tests for the convert command against files on disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use sfconv_backend_mod::{ConvertOptions, DirSampleStore};
use sfconv_cli::commands::convert::{process_file, run, ConvertArgs, FileJob};
use sfconv_cli::commands::json_output::error_codes;
use sfconv_track::{load_index, ChannelCommand, Pattern, Track};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

/// A samples directory with an index defining Bass (id 0) and an unused id 1.
fn samples_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index"), "# id file offset type tuning\n0 Bass 0 m 0\n").unwrap();
    let ramp: Vec<u8> = (0..32u8).flat_map(|i| [0, i]).collect();
    fs::write(dir.path().join("Bass"), ramp).unwrap();
    dir
}

/// Write a one-pattern track playing a note on `voice`.
fn write_track(path: &Path, voice: u8) {
    let voices: [u8; 16] = std::array::from_fn(|i| i as u8);
    let pattern = Pattern::blank().with_command(0, 0, ChannelCommand::play(0, 2, 15, voice, 15));
    let track = Track::new(6, voices, &[0], vec![pattern]).unwrap();
    fs::write(path, track.to_bytes().unwrap()).unwrap();
}

fn args(samples: &Path, files: &[PathBuf]) -> ConvertArgs {
    ConvertArgs {
        samples_dir: samples.to_path_buf(),
        files: files.to_vec(),
        ..Default::default()
    }
}

fn exit_code_is(code: ExitCode, expected: u8) -> bool {
    format!("{:?}", code) == format!("{:?}", ExitCode::from(expected))
}

// =============================================================================
// Single File Tests
// =============================================================================

#[test]
fn test_converts_file_to_module() {
    let samples = samples_dir();
    let work = tempfile::tempdir().unwrap();
    let input = work.path().join("Title");
    let output = work.path().join("Title.mod");
    write_track(&input, 0);

    let code = run(&args(samples.path(), &[input, output.clone()])).unwrap();
    assert!(exit_code_is(code, 0));

    let module = fs::read(&output).unwrap();
    assert_eq!(&module[..5], b"Title");
    assert_eq!(&module[1080..1084], b"M.K.");
    // header + tempo pattern + one pattern + 32 bytes of sample data
    assert_eq!(module.len(), 1084 + 2 * 1024 + 32);
}

#[test]
fn test_song_name_option() {
    let samples = samples_dir();
    let work = tempfile::tempdir().unwrap();
    let input = work.path().join("Title");
    let output = work.path().join("Out.mod");
    write_track(&input, 0);

    let mut args = args(samples.path(), &[input]);
    args.outfile = Some(output.clone());
    args.name = Some("Theme".to_string());
    run(&args).unwrap();

    let module = fs::read(&output).unwrap();
    assert_eq!(&module[..6], b"Theme\0");
}

#[test]
fn test_failed_output_is_removed() {
    let samples = samples_dir();
    let work = tempfile::tempdir().unwrap();
    let input = work.path().join("Silent");
    let output = work.path().join("Silent.mod");
    // Voice 1 maps to an unused sample, so nothing is playable
    write_track(&input, 1);

    let code = run(&args(samples.path(), &[input, output.clone()])).unwrap();
    assert!(exit_code_is(code, 1));
    assert!(!output.exists());
}

#[test]
fn test_verbose_keeps_failed_output() {
    let samples = samples_dir();
    let work = tempfile::tempdir().unwrap();
    let input = work.path().join("Silent");
    let output = work.path().join("Silent.mod");
    write_track(&input, 1);

    let mut args = args(samples.path(), &[input, output.clone()]);
    args.verbose = true;
    let code = run(&args).unwrap();
    assert!(exit_code_is(code, 1));
    assert!(output.exists());
}

#[test]
fn test_missing_input_file() {
    let samples = samples_dir();
    let work = tempfile::tempdir().unwrap();
    let job = FileJob {
        input: Some(work.path().join("Nowhere")),
        output: Some(work.path().join("Nowhere.mod")),
    };

    let catalog = load_index(&samples.path().join("index"), samples.path()).unwrap();
    let store = DirSampleStore::new(samples.path());
    let err = process_file(&job, &args(samples.path(), &[]), &catalog, &store).unwrap_err();

    assert_eq!(err.code, error_codes::INPUT_READ);
    assert!(err.to_string().contains("Failed to open input file"));
    assert!(!work.path().join("Nowhere.mod").exists());
}

#[test]
fn test_malformed_track_creates_no_output() {
    let samples = samples_dir();
    let work = tempfile::tempdir().unwrap();
    let input = work.path().join("Garbled");
    let output = work.path().join("Garbled.mod");
    // Tempo byte 40 is past the limit
    fs::write(&input, [40u8; 200]).unwrap();

    let job = FileJob {
        input: Some(input),
        output: Some(output.clone()),
    };
    let catalog = load_index(&samples.path().join("index"), samples.path()).unwrap();
    let store = DirSampleStore::new(samples.path());
    let mut args = args(samples.path(), &[]);
    args.verbose = true;
    let err = process_file(&job, &args, &catalog, &store).unwrap_err();

    assert_eq!(err.code, error_codes::TRACK_FORMAT);
    assert!(!output.exists());
}

#[test]
fn test_missing_index_is_an_error() {
    let work = tempfile::tempdir().unwrap();
    let input = work.path().join("Title");
    write_track(&input, 0);

    let result = run(&args(work.path(), &[input, work.path().join("Title.mod")]));
    assert!(result.is_err());
}

// =============================================================================
// Batch Tests
// =============================================================================

#[test]
fn test_batch_continues_after_failure() {
    let samples = samples_dir();
    let work = tempfile::tempdir().unwrap();
    let bad = work.path().join("Silent");
    let good = work.path().join("Title");
    write_track(&bad, 1);
    write_track(&good, 0);

    let mut args = args(samples.path(), &[bad, good]);
    args.batch = true;
    args.options = ConvertOptions {
        blank_end: true,
        ..Default::default()
    };
    let code = run(&args).unwrap();

    assert!(exit_code_is(code, 1));
    assert!(!work.path().join("Silent.mod").exists());
    let module = fs::read(work.path().join("Title.mod")).unwrap();
    // Blank end adds a pattern
    assert_eq!(module.len(), 1084 + 3 * 1024 + 32);
}

#[test]
fn test_json_report() {
    let samples = samples_dir();
    let work = tempfile::tempdir().unwrap();
    let input = work.path().join("Title");
    write_track(&input, 0);

    let mut args = args(samples.path(), &[input, work.path().join("Title.mod")]);
    args.json = true;
    let code = run(&args).unwrap();
    assert!(exit_code_is(code, 0));
}
