// crates/i18n-gen-core/src/pipeline.rs
// ============================================================================
// Module: Generation Pipeline
// Description: Load, validate, build, and emit orchestration.
// Purpose: Run every stage in order, record telemetry, and stop at the first error.
// Dependencies: crate::catalog, crate::builder, crate::telemetry
// ============================================================================

//! ## Overview
//! [`Generator`] drives the fixed stage order load, schema, build, emit.
//! Each stage runs at most once per call and the first failure aborts the
//! run. Emitters plug in through the [`Emitter`] trait so the pipeline does
//! not depend on any target language.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::builder::build_ir;
use crate::catalog::CatalogLoader;
use crate::catalog::CatalogSet;
use crate::error::GenError;
use crate::ir::TranslationIr;
use crate::telemetry::EventSink;
use crate::telemetry::GenerationEvent;
use crate::telemetry::GenerationStage;
use crate::telemetry::NoopEventSink;

// ============================================================================
// SECTION: Emitter Contract
// ============================================================================

/// Renders an IR into source text for some target.
pub trait Emitter {
    /// Emitter-specific failure.
    type Error: fmt::Display;

    /// Renders `ir` into the bytes of one output file.
    ///
    /// # Errors
    /// Returns the emitter's error when rendering fails.
    fn render(&self, ir: &TranslationIr) -> Result<Vec<u8>, Self::Error>;
}

// ============================================================================
// SECTION: Generator
// ============================================================================

/// Stage driver over a catalog loader.
pub struct Generator {
    /// Loader for catalog discovery.
    loader: CatalogLoader,
    /// Package name placed in the IR.
    package: String,
    /// Telemetry destination.
    sink: Arc<dyn EventSink>,
}

impl Generator {
    /// Creates a generator that records no telemetry.
    #[must_use]
    pub fn new(loader: CatalogLoader, package: impl Into<String>) -> Self {
        Self {
            loader,
            package: package.into(),
            sink: Arc::new(NoopEventSink),
        }
    }

    /// Replaces the telemetry sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Loads and structurally validates catalogs under `base_path`.
    ///
    /// # Errors
    /// Returns the first load or schema failure.
    pub fn load(&self, base_path: &Path) -> Result<CatalogSet, GenError> {
        let loaded = self.loader.load_unvalidated(base_path);
        let catalogs = self.observe(GenerationStage::Load, loaded, catalog_counts)?;
        let validated = catalogs.validate_schema().map(|()| catalogs);
        self.observe(GenerationStage::Schema, validated, catalog_counts)
    }

    /// Loads catalogs and builds the IR.
    ///
    /// # Errors
    /// Returns the first load, schema, or build failure.
    pub fn build(&self, base_path: &Path) -> Result<TranslationIr, GenError> {
        let catalogs = self.load(base_path)?;
        self.observe(GenerationStage::Build, build_ir(&self.package, &catalogs), ir_counts)
    }

    /// Runs every stage and returns the emitter output.
    ///
    /// # Errors
    /// Returns the first failure; emitter failures become [`GenError::Emit`].
    pub fn generate<E: Emitter>(&self, base_path: &Path, emitter: &E) -> Result<Vec<u8>, GenError> {
        let ir = self.build(base_path)?;
        self.emit(&ir, emitter)
    }

    /// Runs only the emit stage over an already built IR.
    ///
    /// # Errors
    /// Returns [`GenError::Emit`] when the emitter fails.
    pub fn emit<E: Emitter>(&self, ir: &TranslationIr, emitter: &E) -> Result<Vec<u8>, GenError> {
        let rendered = emitter.render(ir).map_err(|err| GenError::Emit(err.to_string()));
        let counts = ir_counts(ir);
        self.observe(GenerationStage::Emit, rendered, |_| counts)
    }

    /// Records the outcome of a stage and passes the result through.
    fn observe<T>(
        &self,
        stage: GenerationStage,
        result: Result<T, GenError>,
        counts: impl Fn(&T) -> (usize, usize),
    ) -> Result<T, GenError> {
        let event = match &result {
            Ok(value) => {
                let (locale_count, message_count) = counts(value);
                GenerationEvent::succeeded(stage, locale_count, message_count)
            }
            Err(err) => GenerationEvent::failed(stage, err),
        };
        self.sink.record(&event);
        result
    }
}

/// Locale and message counts of a catalog set.
fn catalog_counts(catalogs: &CatalogSet) -> (usize, usize) {
    (catalogs.len(), catalogs.first().map_or(0, |reference| reference.messages.len()))
}

/// Locale and message counts of an IR.
fn ir_counts(ir: &TranslationIr) -> (usize, usize) {
    (ir.locales.len(), ir.message_ids.len())
}
