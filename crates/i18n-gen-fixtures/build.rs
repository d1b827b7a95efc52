// crates/i18n-gen-fixtures/build.rs
// ============================================================================
// Module: Fixture Build Script
// Description: Generates the translator module from the bundled catalogs.
// Purpose: Compile emitter output as part of the workspace build.
// Dependencies: i18n-gen-core, i18n-gen-emit
// ============================================================================

//! Runs the generation pipeline over `catalogs/` and writes the module to
//! `OUT_DIR/translation.rs`.

use std::env;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use i18n_gen_core::CatalogLoader;
use i18n_gen_core::Generator;
use i18n_gen_emit::EmitterConfig;
use i18n_gen_emit::RustEmitter;

fn main() -> Result<(), Box<dyn Error>> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let catalogs = manifest_dir.join("catalogs");
    println!("cargo:rerun-if-changed={}", catalogs.display());

    let emitter = RustEmitter::new(EmitterConfig::default())?;
    let generator = Generator::new(CatalogLoader::new(&catalogs), "translation");
    let source = generator.generate(Path::new(""), &emitter)?;

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    fs::write(out_dir.join("translation.rs"), source)?;
    Ok(())
}
