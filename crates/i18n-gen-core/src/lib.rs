// crates/i18n-gen-core/src/lib.rs
// ============================================================================
// Module: i18n-gen Core
// Description: Catalog loading, validation, and IR construction.
// Purpose: Provide the language-independent half of the translation generator.
// Dependencies: i18n-gen-runtime, serde, serde_json, serde_yaml, thiserror
// ============================================================================

//! ## Overview
//! i18n-gen turns per-locale YAML message catalogs into type-safe translator
//! code. This crate owns everything up to the emitter boundary:
//! - [`catalog`] discovers and parses catalog files.
//! - [`schema`] checks that every locale has the same structure.
//! - [`template`] and [`expression`] validate templates and guards.
//! - [`builder`] resolves variables and produces the [`ir::TranslationIr`].
//! - [`pipeline`] runs the stages and hands the IR to an [`pipeline::Emitter`].
//!
//! All inputs are treated as untrusted: file sizes, file counts, template
//! sizes, and guard nesting are bounded.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod builder;
pub mod catalog;
pub mod error;
pub mod expression;
pub mod ir;
pub mod locale;
pub mod naming;
pub mod pipeline;
pub mod schema;
pub mod telemetry;
pub mod template;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use builder::build_ir;
pub use catalog::CatalogLoader;
pub use catalog::CatalogSet;
pub use catalog::LoaderOptions;
pub use error::GenError;
pub use ir::TranslationIr;
pub use pipeline::Emitter;
pub use pipeline::Generator;
