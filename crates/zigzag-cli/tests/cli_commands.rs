//! End-to-end command tests: parse real argv, run against in-memory streams.

use std::io::Cursor;

use clap::Parser;
use pretty_assertions::assert_eq;
use tempfile::tempdir;
use zigzag_cli::{Cli, CliError, execute};

fn run_with_input(argv: &[&str], input: &str) -> Result<String, CliError> {
    let mut full = vec!["zigzag"];
    full.extend_from_slice(argv);
    let cli = Cli::try_parse_from(full).expect("argv should parse");
    let mut out = Vec::new();
    execute(cli, &mut out, &mut Cursor::new(input.to_owned()))?;
    Ok(String::from_utf8(out).expect("utf-8 output"))
}

fn run(argv: &[&str]) -> Result<String, CliError> {
    run_with_input(argv, "")
}

// ═══════════════════════════════════════════════════════════════════════
// encode / decode
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn encode_plots_one_row_per_letter() {
    let out = run(&["--seed", "1", "encode", "Hi!"]).unwrap();
    assert_eq!(out, "320,100 360,124\n");
}

#[test]
fn encode_reads_stdin_when_no_argument() {
    let out = run_with_input(&["--seed", "1", "encode"], "ab\n").unwrap();
    assert_eq!(out, "40,100 80,124\n");
}

#[test]
fn decode_sorts_rows_before_lookup() {
    let out = run(&["decode", "360,124 320,100"]).unwrap();
    assert_eq!(out, "hi\n");
}

#[test]
fn decode_reads_stdin() {
    let out = run_with_input(&["decode"], "40,100 80,124\n").unwrap();
    assert_eq!(out, "ab\n");
}

#[test]
fn decode_parse_errors_exit_two_with_one_line_each() {
    let err = run(&["decode", "40,100 nope 1,2,3"]).unwrap_err();
    assert_eq!(err.exit_code(), 2);
    let message = err.to_string();
    let lines: Vec<&str> = message.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("nope"));
    assert!(lines[1].contains("1,2,3"));
}

#[test]
fn decode_with_custom_key() {
    let encoded = run(&["--seed", "9", "encode", "--key", "zyx", "xyz"]).unwrap();
    let decoded = run(&["decode", "--key", "zyx", encoded.trim()]).unwrap();
    assert_eq!(decoded, "xyz\n");
}

#[test]
fn seeded_encodes_are_reproducible() {
    let argv = ["--seed", "42", "encode", "--key", "aabbaabb", "abab"];
    assert_eq!(run(&argv).unwrap(), run(&argv).unwrap());
}

// ═══════════════════════════════════════════════════════════════════════
// key tools
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn stats_text_and_json() {
    assert_eq!(
        run(&["stats", "aab"]).unwrap(),
        "length: 3\nduplicates: 1\nmissing: 24\n"
    );
    let json: serde_json::Value = serde_json::from_str(&run(&["stats", "--json"]).unwrap()).unwrap();
    assert_eq!(json["length"], 26);
    assert_eq!(json["duplicate_count"], 0);
    assert_eq!(json["missing_count"], 0);
}

#[test]
fn shuffle_is_a_seeded_permutation() {
    let first = run(&["--seed", "5", "shuffle", "hello"]).unwrap();
    let second = run(&["--seed", "5", "shuffle", "hello"]).unwrap();
    assert_eq!(first, second);

    let mut letters: Vec<char> = first.trim().chars().collect();
    letters.sort_unstable();
    assert_eq!(letters, ['E', 'H', 'L', 'L', 'O']);
}

// ═══════════════════════════════════════════════════════════════════════
// export-svg
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn export_svg_to_stdout() {
    let out = run(&["--seed", "0", "export-svg", "ab"]).unwrap();
    assert!(out.starts_with("<svg"));
    assert!(out.contains("<style>"));
    assert!(out.contains("<polyline points=\"40,100 80,124\""));
}

#[test]
fn export_svg_dark_to_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("path.svg");
    let out = run(&[
        "export-svg",
        "ab",
        "--theme",
        "dark",
        "-o",
        path.to_str().unwrap(),
    ])
    .unwrap();
    assert_eq!(out, "");
    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.contains("#0f172a"));
}

#[test]
fn export_svg_without_points_fails() {
    let err = run(&["export-svg", "123"]).unwrap_err();
    assert!(matches!(err, CliError::InvalidArgument { .. }));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn unknown_theme_is_rejected_by_the_parser() {
    assert!(Cli::try_parse_from(["zigzag", "export-svg", "ab", "--theme", "sepia"]).is_err());
}

// ═══════════════════════════════════════════════════════════════════════
// play
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn play_encode_prints_each_step_then_the_path() {
    let out = run(&["--seed", "0", "play", "--instant", "ab"]).unwrap();
    assert_eq!(out, "   1  40,100\n   2  80,124\n40,100 80,124\n");
}

#[test]
fn play_decode_prints_letters_in_row_order() {
    let out = run(&["play", "--decode", "--instant", "80,124 40,100"]).unwrap();
    assert_eq!(out, "   1  40,100  a\n   2  80,124  b\nab\n");
}

#[test]
fn play_nothing() {
    assert_eq!(
        run(&["play", "--instant", "123"]).unwrap(),
        "nothing to play\n"
    );
}

#[test]
fn play_decode_bad_input_exits_two() {
    let err = run(&["play", "--decode", "--instant", "x"]).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn play_rejects_zero_interval() {
    assert!(Cli::try_parse_from(["zigzag", "play", "ab", "--interval-ms", "0"]).is_err());
}

// ═══════════════════════════════════════════════════════════════════════
// theme
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn theme_toggle_persists() {
    let dir = tempdir().unwrap();
    let prefs = dir.path().join("nested").join("prefs.json");
    let prefs = prefs.to_str().unwrap();

    assert_eq!(run(&["theme", "--prefs", prefs, "show"]).unwrap(), "light\n");
    assert_eq!(
        run(&["theme", "--prefs", prefs, "show", "--ambient-dark"]).unwrap(),
        "dark\n"
    );

    // Nothing stored counts as dark, so the first toggle lands on light.
    assert_eq!(run(&["theme", "--prefs", prefs, "toggle"]).unwrap(), "light\n");
    assert_eq!(run(&["theme", "--prefs", prefs, "toggle"]).unwrap(), "dark\n");
    assert_eq!(
        run(&["theme", "--prefs", prefs, "show"]).unwrap(),
        "dark\n"
    );
}

#[test]
fn theme_with_corrupt_file_fails_toggle() {
    let dir = tempdir().unwrap();
    let prefs = dir.path().join("prefs.json");
    std::fs::write(&prefs, "{oops").unwrap();
    let prefs = prefs.to_str().unwrap();

    assert_eq!(run(&["theme", "--prefs", prefs, "show"]).unwrap(), "light\n");
    let err = run(&["theme", "--prefs", prefs, "toggle"]).unwrap_err();
    assert!(matches!(err, CliError::Preferences(_)));
}

// ═══════════════════════════════════════════════════════════════════════
// config
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn toml_config_sets_key_and_layout() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("zigzag.toml");
    std::fs::write(&path, "key = \"zyx\"\n\n[layout]\ncol_gap = 10\n").unwrap();
    let path = path.to_str().unwrap();

    let out = run(&["--config", path, "--seed", "0", "encode", "x"]).unwrap();
    assert_eq!(out, "60,100\n");
    assert_eq!(run(&["--config", path, "shuffle", "--seed", "1"]).unwrap().len(), 4);
}

#[test]
fn json_config_is_validated() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("zigzag.json");
    std::fs::write(&path, r#"{"tick_interval_ms": 0}"#).unwrap();
    let err = run(&["--config", path.to_str().unwrap(), "stats"]).unwrap_err();
    assert!(matches!(err, CliError::Config(_)));
}
