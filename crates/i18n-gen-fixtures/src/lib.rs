// crates/i18n-gen-fixtures/src/lib.rs
// ============================================================================
// Module: Generated Translator Fixture
// Description: Includes the translator module generated by the build script.
// Purpose: Give integration tests a real, compiled `Translator` to call.
// Dependencies: i18n-gen-runtime
// ============================================================================

//! Translators generated from `catalogs/en.i18n.yaml` and
//! `catalogs/es.i18n.yaml`.

include!(concat!(env!("OUT_DIR"), "/translation.rs"));
