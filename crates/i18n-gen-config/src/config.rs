// crates/i18n-gen-config/src/config.rs
// ============================================================================
// Module: i18n-gen Configuration
// Description: Configuration loading and validation for the generator.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The path comes from the `--config` flag, then the `I18N_GEN_CONFIG`
//! environment variable, then `i18n-gen.toml` in the working directory when
//! that file exists. Without any of them the built-in defaults apply.
//! Unknown keys and out-of-range values fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename looked up in the working directory.
pub const DEFAULT_CONFIG_NAME: &str = "i18n-gen.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "I18N_GEN_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default catalog file suffix.
pub const DEFAULT_CATALOG_SUFFIX: &str = "i18n.yaml";
/// Default per-file byte limit for catalogs.
pub const DEFAULT_MAX_FILE_BYTES: usize = 1024 * 1024;
/// Upper bound accepted for `catalog.max_file_bytes`.
pub const MAX_MAX_FILE_BYTES: usize = 64 * 1024 * 1024;
/// Default bound on discovered catalog files.
pub const DEFAULT_MAX_FILES: usize = 256;
/// Upper bound accepted for `catalog.max_files`.
pub const MAX_MAX_FILES: usize = 65_536;
/// Maximum number of `emit.types` aliases.
pub const MAX_TYPE_ALIASES: usize = 256;
/// Maximum length of emitter strings (paths, type tokens, header).
pub const MAX_EMIT_STRING_LENGTH: usize = 1024;

// ============================================================================
// SECTION: Configuration Model
// ============================================================================

/// Root of `i18n-gen.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Catalog discovery settings.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Rust emitter settings.
    #[serde(default)]
    pub emit: EmitConfig,
    /// Generation event settings.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    /// File the configuration was read from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl GeneratorConfig {
    /// Loads configuration using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = env::var(CONFIG_ENV_VAR).ok();
        match resolve_path(path, env_path.as_deref())? {
            Some(resolved) => Self::load_file(&resolved),
            None => Ok(Self::default()),
        }
    }

    /// Loads and validates the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// validated.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config = Self::parse(content)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parses and validates TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.catalog.validate()?;
        self.emit.validate()?;
        self.telemetry.validate()
    }
}

/// Catalog discovery settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// File suffix after the locale tag.
    #[serde(default = "default_suffix")]
    pub suffix: String,
    /// Per-file byte limit.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: usize,
    /// Maximum number of catalog files.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

impl CatalogConfig {
    /// Validates catalog settings.
    fn validate(&self) -> Result<(), ConfigError> {
        let suffix = self.suffix.trim();
        if suffix.is_empty() {
            return Err(ConfigError::Invalid("catalog.suffix must be non-empty".to_string()));
        }
        if suffix.starts_with('.') || suffix.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(
                "catalog.suffix must be a bare extension like i18n.yaml".to_string(),
            ));
        }
        if self.max_file_bytes == 0 || self.max_file_bytes > MAX_MAX_FILE_BYTES {
            return Err(ConfigError::Invalid(format!(
                "catalog.max_file_bytes must be between 1 and {MAX_MAX_FILE_BYTES}"
            )));
        }
        if self.max_files == 0 || self.max_files > MAX_MAX_FILES {
            return Err(ConfigError::Invalid(format!(
                "catalog.max_files must be between 1 and {MAX_MAX_FILES}"
            )));
        }
        Ok(())
    }
}

/// Rust emitter settings. Unset values use the emitter defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmitConfig {
    /// Runtime crate path used by generated code.
    #[serde(default)]
    pub runtime_crate: Option<String>,
    /// Parameter type for variables without a declared type.
    #[serde(default)]
    pub opaque_type: Option<String>,
    /// Extra type aliases, merged over the built-in ones.
    #[serde(default)]
    pub types: BTreeMap<String, String>,
    /// Comment text placed under the generated header.
    #[serde(default)]
    pub header: Option<String>,
}

impl EmitConfig {
    /// Validates emitter settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(runtime) = &self.runtime_crate {
            validate_emit_string("emit.runtime_crate", runtime)?;
        }
        if let Some(opaque) = &self.opaque_type {
            validate_emit_string("emit.opaque_type", opaque)?;
        }
        if let Some(header) = &self.header
            && header.len() > MAX_EMIT_STRING_LENGTH
        {
            return Err(ConfigError::Invalid("emit.header exceeds max length".to_string()));
        }
        if self.types.len() > MAX_TYPE_ALIASES {
            return Err(ConfigError::Invalid(format!(
                "emit.types exceeds max entries ({MAX_TYPE_ALIASES})"
            )));
        }
        for (alias, target) in &self.types {
            validate_emit_string("emit.types key", alias)?;
            validate_emit_string(&format!("emit.types.{alias}"), target)?;
        }
        Ok(())
    }
}

/// Destination of generation events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelemetrySink {
    /// Events are discarded.
    #[default]
    None,
    /// Events are written to stderr as JSON lines.
    Stderr,
    /// Events are appended to `telemetry.path` as JSON lines.
    File,
}

/// Generation event settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Event destination.
    #[serde(default)]
    pub sink: TelemetrySink,
    /// Log file path for the `file` sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl TelemetryConfig {
    /// Validates telemetry settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (TelemetrySink::File, None) => Err(ConfigError::Invalid(
                "telemetry.path is required when telemetry.sink = \"file\"".to_string(),
            )),
            (TelemetrySink::File, Some(path)) => {
                validate_path_string("telemetry.path", &path.to_string_lossy())
            }
            (_, Some(_)) => Err(ConfigError::Invalid(
                "telemetry.path is only valid when telemetry.sink = \"file\"".to_string(),
            )),
            (_, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the flag, the environment, or the default file.
fn resolve_path(path: Option<&Path>, env_path: Option<&str>) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = path {
        return Ok(Some(path.to_path_buf()));
    }
    if let Some(env_path) = env_path {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(Some(PathBuf::from(env_path)));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_NAME);
    Ok(default.is_file().then_some(default))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a configured path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a non-empty, single-line emitter string.
fn validate_emit_string(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if value.len() > MAX_EMIT_STRING_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    if value.contains(['\n', '\r']) {
        return Err(ConfigError::Invalid(format!("{field} must be a single line")));
    }
    Ok(())
}

/// Serde default for `catalog.suffix`.
fn default_suffix() -> String {
    DEFAULT_CATALOG_SUFFIX.to_string()
}

/// Serde default for `catalog.max_file_bytes`.
const fn default_max_file_bytes() -> usize {
    DEFAULT_MAX_FILE_BYTES
}

/// Serde default for `catalog.max_files`.
const fn default_max_files() -> usize {
    DEFAULT_MAX_FILES
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only panic-based assertions are permitted."
    )]

    use std::path::Path;
    use std::path::PathBuf;

    use super::MAX_TOTAL_PATH_LENGTH;
    use super::resolve_path;
    use super::validate_path_string;

    #[test]
    fn flag_wins_over_environment() {
        let resolved = resolve_path(Some(Path::new("flag.toml")), Some("env.toml")).unwrap();
        assert_eq!(resolved, Some(PathBuf::from("flag.toml")));
    }

    #[test]
    fn environment_is_used_without_flag() {
        let resolved = resolve_path(None, Some("env.toml")).unwrap();
        assert_eq!(resolved, Some(PathBuf::from("env.toml")));
    }

    #[test]
    fn overlong_environment_path_is_rejected() {
        let long_path = "a".repeat(MAX_TOTAL_PATH_LENGTH + 1);
        let err = resolve_path(None, Some(&long_path)).unwrap_err();
        assert!(err.to_string().contains("max length"));
    }

    #[test]
    fn path_strings_must_be_non_empty() {
        let err = validate_path_string("telemetry.path", "   ").unwrap_err();
        assert!(err.to_string().contains("non-empty"));
        assert!(validate_path_string("telemetry.path", "logs/i18n-gen.jsonl").is_ok());
    }
}
