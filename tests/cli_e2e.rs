//! End-to-end CLI tests for postpack.
//!
//! These tests verify the complete CLI workflow by running the actual
//! binary with various arguments and checking the output.
//!
//! # Test Categories
//!
//! - **Basic functionality**: ingest + dedup + output for each layout
//! - **Output formats**: CSV, JSON, JSONL generation
//! - **Flags**: delimiter, explicit layout, tolerance flags
//! - **Error handling**: proper error messages for bad input
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test cli_e2e
//! ```

#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::{TempDir, tempdir};

// ============================================================================
// Test Fixtures
// ============================================================================

/// Creates a temporary directory with export fixtures.
fn setup_fixtures() -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");

    // Compact layout, clean batch with one duplicate and one blank line
    let compact = "\
2024-01-05T10:00:00+00:00,Hello world,42,https://x.com/alice/status/999
2024-01-05T11:00:00+00:00,Second post,7,https://x.com/bob/status/1000

2024-01-05T10:00:00+00:00,Hello world,42,https://x.com/alice/status/999
";
    fs::write(dir.path().join("compact.txt"), compact).unwrap();

    // Classic nine-column layout
    let classic = "\
2024-03-01 08:30:00,x,15,Morning update,201,https://x.com/team/status/201,,88,@teamlead
2024-03-01 09:00:00,x,3,Second post,202,https://x.com/team/status/202,,88,@teamlead
";
    fs::write(dir.path().join("classic.txt"), classic).unwrap();

    // Messy batch: bad timestamps, missing identifiers, quoted commas
    let messy = r#"2024-01-05T10:00:00,"Commas, in, quotes",9,https://x.com/u/status/42
nat,skipped for timestamp,1,https://x.com/u/status/43
2024-01-05T10:05:00,skipped for identifier,2,https://x.com/u/profile
"#;
    fs::write(dir.path().join("messy.txt"), messy).unwrap();

    // Semicolon-delimited batch
    let semicolon = "2024-01-05T10:00:00;text, with commas;3;https://x.com/u/status/31\n";
    fs::write(dir.path().join("semicolon.txt"), semicolon).unwrap();

    // Nothing detectable
    fs::write(dir.path().join("prose.txt"), "just some prose\nmore prose\n").unwrap();

    // Empty file
    fs::write(dir.path().join("empty.txt"), "").unwrap();

    dir
}

fn postpack_cmd() -> Command {
    let cmd = std::process::Command::new(env!("CARGO_BIN_EXE_postpack"));
    Command::from_std(cmd)
}

fn output_path(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

// ============================================================================
// Basic Functionality Tests
// ============================================================================

mod basic_functionality {
    use super::*;

    #[test]
    fn test_compact_auto_detected() {
        let fixtures = setup_fixtures();
        let input = fixtures.path().join("compact.txt");
        let output = output_path(&fixtures, "out.csv");

        postpack_cmd()
            .args([input.to_str().unwrap(), "-o", output.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("Done"))
            .stdout(predicate::str::contains("records found"));

        assert!(output.exists());
        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains("999"));
        assert!(content.contains("Hello world"));
        // Duplicate removed: exactly one occurrence of the id line
        assert_eq!(content.matches("Hello world").count(), 1);
    }

    #[test]
    fn test_classic_explicit_layout() {
        let fixtures = setup_fixtures();
        let input = fixtures.path().join("classic.txt");
        let output = output_path(&fixtures, "out.csv");

        postpack_cmd()
            .args([
                input.to_str().unwrap(),
                "--layout",
                "classic",
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .success();

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains("201"));
        assert!(content.contains("teamlead"));
        assert!(content.contains("Morning update"));
    }

    #[test]
    fn test_messy_batch_skips_and_reports() {
        let fixtures = setup_fixtures();
        let input = fixtures.path().join("messy.txt");
        let output = output_path(&fixtures, "out.csv");

        postpack_cmd()
            .args([
                input.to_str().unwrap(),
                "--layout",
                "compact",
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("2 lines skipped"))
            .stdout(predicate::str::contains("unparsed timestamp"))
            .stdout(predicate::str::contains("no identifier"));

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains("Commas, in, quotes"));
        assert!(!content.contains("skipped for timestamp"));
    }

    #[test]
    fn test_semicolon_delimiter_flag() {
        let fixtures = setup_fixtures();
        let input = fixtures.path().join("semicolon.txt");
        let output = output_path(&fixtures, "out.csv");

        postpack_cmd()
            .args([
                input.to_str().unwrap(),
                "--layout",
                "compact",
                "--delimiter",
                ";",
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .success();

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains("31"));
        assert!(content.contains("text, with commas"));
    }
}

// ============================================================================
// Output Format Tests
// ============================================================================

mod output_formats {
    use super::*;

    #[test]
    fn test_json_output() {
        let fixtures = setup_fixtures();
        let input = fixtures.path().join("compact.txt");
        let output = output_path(&fixtures, "out.json");

        postpack_cmd()
            .args([
                input.to_str().unwrap(),
                "--format",
                "json",
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .success();

        let content = fs::read_to_string(&output).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_jsonl_output() {
        let fixtures = setup_fixtures();
        let input = fixtures.path().join("compact.txt");
        let output = output_path(&fixtures, "out.jsonl");

        postpack_cmd()
            .args([
                input.to_str().unwrap(),
                "--format",
                "jsonl",
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .success();

        let content = fs::read_to_string(&output).unwrap();
        assert_eq!(content.lines().count(), 2);
        for line in content.lines() {
            let _: serde_json::Value = serde_json::from_str(line).unwrap();
        }
    }

    #[test]
    fn test_default_output_extension_follows_format() {
        let fixtures = setup_fixtures();
        let input = fixtures.path().join("compact.txt");

        postpack_cmd()
            .current_dir(fixtures.path())
            .args([input.to_str().unwrap(), "--format", "jsonl"])
            .assert()
            .success()
            .stdout(predicate::str::contains("records.jsonl"));

        assert!(fixtures.path().join("records.jsonl").exists());
    }
}

// ============================================================================
// Tolerance Flags
// ============================================================================

mod tolerance_flags {
    use super::*;

    #[test]
    fn test_keep_missing_timestamps_accepts_more() {
        let fixtures = setup_fixtures();
        let input = fixtures.path().join("messy.txt");
        let output = output_path(&fixtures, "out.csv");

        postpack_cmd()
            .args([
                input.to_str().unwrap(),
                "--layout",
                "compact",
                "--keep-missing-timestamps",
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            // The nat line now passes validation; only the
            // identifier-less line is skipped
            .stdout(predicate::str::contains("2 records found"))
            .stdout(predicate::str::contains("1 lines skipped"));

        // The finalize pass still keeps it out of the output file
        let content = fs::read_to_string(&output).unwrap();
        assert!(!content.contains("skipped for timestamp"));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

mod error_handling {
    use super::*;

    #[test]
    fn test_missing_input_file() {
        postpack_cmd()
            .args(["does_not_exist.txt"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error"));
    }

    #[test]
    fn test_undetectable_layout() {
        let fixtures = setup_fixtures();
        let input = fixtures.path().join("prose.txt");

        postpack_cmd()
            .args([input.to_str().unwrap()])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Could not detect"));
    }

    #[test]
    fn test_empty_file_with_explicit_layout() {
        let fixtures = setup_fixtures();
        let input = fixtures.path().join("empty.txt");
        let output = output_path(&fixtures, "out.csv");

        // Empty input is not an error: zero records plus a report
        postpack_cmd()
            .args([
                input.to_str().unwrap(),
                "--layout",
                "compact",
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("0 records found"));
    }

    #[test]
    fn test_unknown_layout_name_rejected() {
        let fixtures = setup_fixtures();
        let input = fixtures.path().join("compact.txt");

        postpack_cmd()
            .args([input.to_str().unwrap(), "--layout", "v9"])
            .assert()
            .failure();
    }
}
