// crates/i18n-gen-core/src/telemetry.rs
// ============================================================================
// Module: Generation Telemetry
// Description: Structured events for pipeline stages.
// Purpose: Emit JSON-line stage logs without a hard logging dependency.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The pipeline records one [`GenerationEvent`] per stage it finishes or
//! fails. Sinks decide where events go; the CLI wires them from
//! configuration. Sinks never fail the pipeline: serialization or write
//! errors are dropped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::error::GenError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Pipeline stage an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStage {
    /// Discovery, reading, and parsing of catalog files.
    Load,
    /// Structural comparison across locales.
    Schema,
    /// Template, guard, and identifier resolution into the IR.
    Build,
    /// Rendering the IR through an emitter.
    Emit,
}

/// Stage outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationOutcome {
    /// Stage completed.
    Ok,
    /// Stage failed.
    Error,
}

/// Stage event payload.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationEvent {
    /// Event type identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Stage reported.
    pub stage: GenerationStage,
    /// Stage outcome.
    pub outcome: GenerationOutcome,
    /// Locales known when the stage ended.
    pub locale_count: usize,
    /// Messages known when the stage ended.
    pub message_count: usize,
    /// Error kind label on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    /// Error text on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl GenerationEvent {
    /// Creates a success event with a consistent timestamp.
    #[must_use]
    pub fn succeeded(stage: GenerationStage, locale_count: usize, message_count: usize) -> Self {
        Self {
            event: "i18n_gen_stage",
            timestamp_ms: now_ms(),
            stage,
            outcome: GenerationOutcome::Ok,
            locale_count,
            message_count,
            error_kind: None,
            detail: None,
        }
    }

    /// Creates a failure event for `err`.
    #[must_use]
    pub fn failed(stage: GenerationStage, err: &GenError) -> Self {
        Self {
            event: "i18n_gen_stage",
            timestamp_ms: now_ms(),
            stage,
            outcome: GenerationOutcome::Error,
            locale_count: 0,
            message_count: 0,
            error_kind: Some(err.kind()),
            detail: Some(err.to_string()),
        }
    }
}

/// Milliseconds since the Unix epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Destination for stage events.
pub trait EventSink: Send + Sync {
    /// Records an event.
    fn record(&self, event: &GenerationEvent);
}

/// Sink that logs JSON lines to stderr.
pub struct StderrEventSink;

impl EventSink for StderrEventSink {
    fn record(&self, event: &GenerationEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Sink that appends JSON lines to a file.
pub struct FileEventSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileEventSink {
    /// Opens the log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl EventSink for FileEventSink {
    fn record(&self, event: &GenerationEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Sink that drops every event.
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn record(&self, _event: &GenerationEvent) {}
}
