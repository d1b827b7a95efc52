// crates/i18n-gen-core/tests/pipeline.rs
// ============================================================================
// Module: Generation Pipeline Tests
// Description: Stage ordering, fail-fast behavior, and telemetry events.
// Purpose: Ensure each stage reports exactly once and errors stop the run.
// Dependencies: i18n-gen-core, tempfile
// ============================================================================

//! Pipeline orchestration tests.

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

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;

use i18n_gen_core::CatalogLoader;
use i18n_gen_core::Emitter;
use i18n_gen_core::GenError;
use i18n_gen_core::Generator;
use i18n_gen_core::TranslationIr;
use i18n_gen_core::telemetry::EventSink;
use i18n_gen_core::telemetry::FileEventSink;
use i18n_gen_core::telemetry::GenerationEvent;
use i18n_gen_core::telemetry::GenerationOutcome;
use i18n_gen_core::telemetry::GenerationStage;
use tempfile::TempDir;

/// Sink that keeps every event.
#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<GenerationEvent>>,
}

impl RecordingSink {
    fn stages(&self) -> Vec<(GenerationStage, GenerationOutcome)> {
        self.events.lock().unwrap().iter().map(|event| (event.stage, event.outcome)).collect()
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: &GenerationEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Emits the IR as JSON.
struct JsonEmitter;

impl Emitter for JsonEmitter {
    type Error = GenError;

    fn render(&self, ir: &TranslationIr) -> Result<Vec<u8>, Self::Error> {
        ir.to_json().map(String::into_bytes)
    }
}

/// Emitter that always fails.
struct FailingEmitter;

impl Emitter for FailingEmitter {
    type Error = String;

    fn render(&self, _ir: &TranslationIr) -> Result<Vec<u8>, Self::Error> {
        Err("target unavailable".to_string())
    }
}

fn catalog_dir(es_source: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("en.i18n.yaml"),
        "messages:\n  hello:\n    template: \"Hi {{ .Name }}\"\n",
    )
    .unwrap();
    fs::write(dir.path().join("es.i18n.yaml"), es_source).unwrap();
    dir
}

#[test]
fn successful_run_reports_every_stage_in_order() {
    let dir = catalog_dir("messages:\n  hello:\n    template: \"Hola {{ .Name }}\"\n");
    let sink = Arc::new(RecordingSink::default());
    let generator =
        Generator::new(CatalogLoader::new(dir.path()), "translation").with_sink(sink.clone());

    let output = generator.generate(Path::new(""), &JsonEmitter).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["message_ids"][0], "hello");
    assert_eq!(
        sink.stages(),
        vec![
            (GenerationStage::Load, GenerationOutcome::Ok),
            (GenerationStage::Schema, GenerationOutcome::Ok),
            (GenerationStage::Build, GenerationOutcome::Ok),
            (GenerationStage::Emit, GenerationOutcome::Ok),
        ]
    );
    let events = sink.events.lock().unwrap();
    assert_eq!(events[3].locale_count, 2);
    assert_eq!(events[3].message_count, 1);
}

#[test]
fn schema_failure_stops_before_build() {
    let dir = catalog_dir("messages:\n  bye:\n    template: Adiós\n");
    let sink = Arc::new(RecordingSink::default());
    let generator =
        Generator::new(CatalogLoader::new(dir.path()), "translation").with_sink(sink.clone());

    let err = generator.generate(Path::new(""), &JsonEmitter).unwrap_err();
    assert_eq!(err.kind(), "schema_mismatch");
    assert_eq!(
        sink.stages(),
        vec![
            (GenerationStage::Load, GenerationOutcome::Ok),
            (GenerationStage::Schema, GenerationOutcome::Error),
        ]
    );
    assert_eq!(sink.events.lock().unwrap()[1].error_kind, Some("schema_mismatch"));
}

#[test]
fn emitter_failures_become_emit_errors() {
    let dir = catalog_dir("messages:\n  hello:\n    template: \"Hola {{ .Name }}\"\n");
    let generator = Generator::new(CatalogLoader::new(dir.path()), "translation");

    let err = generator.generate(Path::new(""), &FailingEmitter).unwrap_err();
    assert_eq!(err, GenError::Emit("target unavailable".to_string()));
}

#[test]
fn repeated_runs_are_byte_identical() {
    let dir = catalog_dir("messages:\n  hello:\n    template: \"Hola {{ .Name }}\"\n");
    let generator = Generator::new(CatalogLoader::new(dir.path()), "translation");

    let first = generator.build(Path::new("")).unwrap();
    let second = generator.build(Path::new("")).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        generator.emit(&first, &JsonEmitter).unwrap(),
        generator.generate(Path::new(""), &JsonEmitter).unwrap()
    );
}

#[test]
fn file_sink_appends_json_lines() {
    let dir = catalog_dir("messages:\n  hello:\n    template: \"Hola {{ .Name }}\"\n");
    let log_dir = TempDir::new().unwrap();
    let log_path = log_dir.path().join("events.jsonl");
    let sink = Arc::new(FileEventSink::new(&log_path).unwrap());
    let generator = Generator::new(CatalogLoader::new(dir.path()), "translation").with_sink(sink);

    generator.build(Path::new("")).unwrap();
    let log = fs::read_to_string(&log_path).unwrap();
    let lines: Vec<serde_json::Value> =
        log.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["event"], "i18n_gen_stage");
    assert_eq!(lines[2]["stage"], "build");
    assert_eq!(lines[2]["outcome"], "ok");
    assert!(lines[2].get("error_kind").is_none());
}
