// crates/i18n-gen-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for bounded reads, output files, and locale selection.
// Purpose: Ensure CLI helpers fail closed and merge configuration predictably.
// Dependencies: i18n-gen-cli main helpers
// ============================================================================

//! ## Overview
//! Validates `read_bytes_with_limit`, generated-file writes and drift checks,
//! locale resolution, and emitter config merging.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;

use i18n_gen_cli::i18n::Locale;
use i18n_gen_config::EmitConfig;

use super::LangArg;
use super::ReadLimitError;
use super::check_generated_output;
use super::emitter_config;
use super::read_bytes_with_limit;
use super::resolve_locale;
use super::write_generated_output;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn read_bytes_with_limit_allows_small_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("small.rs");
    fs::write(&path, b"ok").expect("write small file");

    let bytes = read_bytes_with_limit(&path, 16).expect("read small file");
    assert_eq!(bytes, b"ok");
}

#[test]
fn read_bytes_with_limit_rejects_large_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("large.rs");
    let limit = 8_usize;
    fs::write(&path, vec![0_u8; limit + 1]).expect("write large file");

    let err = read_bytes_with_limit(&path, limit).expect_err("expected size limit failure");
    match err {
        ReadLimitError::TooLarge {
            size,
            limit: reported,
        } => {
            assert_eq!(size, 9);
            assert_eq!(reported, limit);
        }
        ReadLimitError::Io(err) => panic!("unexpected IO error: {err}"),
    }
}

#[test]
fn write_generated_output_creates_parents_and_leaves_no_temp_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("src").join("i18n").join("translation.rs");

    write_generated_output(&path, b"pub struct A;\n").expect("write output");
    assert_eq!(fs::read(&path).expect("read output"), b"pub struct A;\n");
    assert!(!path.with_extension("tmp").exists());

    write_generated_output(&path, b"pub struct B;\n").expect("overwrite output");
    assert_eq!(fs::read(&path).expect("read output"), b"pub struct B;\n");
}

#[test]
fn check_generated_output_detects_drift() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("translation.rs");
    fs::write(&path, b"fresh").expect("write output");

    check_generated_output(&path, b"fresh").expect("matching output");
    let err = check_generated_output(&path, b"stale").expect_err("expected drift");
    assert!(err.to_string().contains("out of date"));
}

#[test]
fn check_generated_output_reports_missing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.rs");
    let err = check_generated_output(&path, b"fresh").expect_err("expected read failure");
    assert!(err.to_string().contains("Failed to read generated output"));
}

#[test]
fn resolve_locale_prefers_flag_over_env() {
    assert_eq!(resolve_locale(Some(LangArg::Ca), Some("en")).expect("flag"), Locale::Ca);
    assert_eq!(resolve_locale(None, Some("ca_ES.UTF-8")).expect("env"), Locale::Ca);
    assert_eq!(resolve_locale(None, None).expect("default"), Locale::En);
}

#[test]
fn resolve_locale_rejects_unknown_env_value() {
    let err = resolve_locale(None, Some("de")).expect_err("expected invalid env");
    let message = err.to_string();
    assert!(message.contains("I18N_GEN_LANG"));
    assert!(message.contains("de"));
}

#[test]
fn emitter_config_merges_over_defaults() {
    let mut config = EmitConfig {
        runtime_crate: Some(" crate::runtime ".to_string()),
        header: Some("Owned by the web team.".to_string()),
        ..EmitConfig::default()
    };
    config.types.insert("money".to_string(), "u64".to_string());
    config.types.insert("int".to_string(), "i32".to_string());

    let merged = emitter_config(&config);
    assert_eq!(merged.runtime_crate, "crate::runtime");
    assert_eq!(merged.opaque_type, "&dyn ::std::fmt::Display");
    assert_eq!(merged.type_aliases.get("money").map(String::as_str), Some("u64"));
    assert_eq!(merged.type_aliases.get("int").map(String::as_str), Some("i32"));
    assert_eq!(merged.type_aliases.get("bool").map(String::as_str), Some("bool"));
    assert_eq!(merged.header.as_deref(), Some("Owned by the web team."));
}
