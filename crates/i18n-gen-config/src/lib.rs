// crates/i18n-gen-config/src/lib.rs
// ============================================================================
// Module: i18n-gen Config Library
// Description: Canonical configuration model and validation.
// Purpose: Single source of truth for i18n-gen.toml semantics.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! `i18n-gen-config` defines the configuration model of the generator:
//! catalog discovery limits, emitter settings, and the telemetry sink. Loading
//! is strict and fail-closed; a missing default file means built-in defaults.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::CatalogConfig;
pub use config::ConfigError;
pub use config::EmitConfig;
pub use config::GeneratorConfig;
pub use config::TelemetryConfig;
pub use config::TelemetrySink;
