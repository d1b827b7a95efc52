// crates/i18n-gen-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Message catalogs and translation utilities for the CLI.
// Purpose: Route every user-facing string through a localized catalog.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! The i18n-gen CLI stores user-facing strings in small per-locale catalogs.
//! All runtime output should be routed through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - Catalogs are initialized once and read-only thereafter.
//! - Missing keys fall back to English and then to the key itself.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Supported CLI locales.
///
/// # Invariants
/// - [`Locale::En`] is the default fallback locale.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// Catalan.
    Ca,
}

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ca => "ca",
        }
    }

    /// Attempts to parse a locale value (case-insensitive, tolerant of region tags).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.split(['-', '_']).next() {
            Some("en") => Some(Self::En),
            Some("ca") => Some(Self::Ca),
            _ => None,
        }
    }
}

/// Ordered list of supported CLI locales.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Ca];

/// A formatted message argument captured by the [`macro@crate::t`] macro.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Global locale selection for CLI output.
static CURRENT_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Sets the CLI locale. Only the first call wins.
pub fn set_locale(locale: Locale) {
    let _ = CURRENT_LOCALE.set(locale);
}

/// Returns the current CLI locale (defaults to English).
#[must_use]
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static English catalog entries.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "i18n-gen {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    (
        "input.read_too_large",
        "Refusing to read {kind} at {path} because it is {size} bytes (limit {limit}).",
    ),
    ("input.read_failed", "Failed to read {kind} at {path}: {error}"),
    ("input.kind.generated", "generated output"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("emit.config_invalid", "Invalid emitter configuration: {error}"),
    ("telemetry.open_failed", "Failed to open telemetry log {path}: {error}"),
    ("generate.failed", "Generation failed: {error}"),
    ("generate.io_failed", "Failed to write generated output to {path}: {error}"),
    ("generate.ok", "Translations for {locales} locales written to {path}"),
    ("check.failed", "Drift check failed: {error}"),
    (
        "check.drift",
        "Generated output at {path} is out of date. Run `i18n-gen generate` to refresh it.",
    ),
    ("check.ok", "Generated output at {path} is up to date."),
    ("validate.failed", "Validation failed: {error}"),
    ("validate.ok", "Catalogs valid: {locales} locales, {messages} messages."),
    ("ir.failed", "IR export failed: {error}"),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected 'en' or 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Note: non-English output is machine-translated and may be inaccurate.",
    ),
];

/// Static Catalan catalog entries.
const CATALOG_CA: &[(&str, &str)] = &[
    ("main.version", "i18n-gen {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "sortida"),
    ("output.write_failed", "No s'ha pogut escriure a {stream}: {error}"),
    (
        "input.read_too_large",
        "No es llegirà {kind} a {path} perquè ocupa {size} bytes (límit {limit}).",
    ),
    ("input.read_failed", "No s'ha pogut llegir {kind} a {path}: {error}"),
    ("input.kind.generated", "la sortida generada"),
    ("config.load_failed", "No s'ha pogut carregar la configuració: {error}"),
    ("emit.config_invalid", "Configuració de l'emissor no vàlida: {error}"),
    ("telemetry.open_failed", "No s'ha pogut obrir el registre de telemetria {path}: {error}"),
    ("generate.failed", "La generació ha fallat: {error}"),
    ("generate.io_failed", "No s'ha pogut escriure la sortida generada a {path}: {error}"),
    ("generate.ok", "Traduccions de {locales} idiomes escrites a {path}"),
    ("check.failed", "La comprovació de drift ha fallat: {error}"),
    (
        "check.drift",
        "La sortida generada a {path} no està al dia. Executeu `i18n-gen generate` per \
         actualitzar-la.",
    ),
    ("check.ok", "La sortida generada a {path} està al dia."),
    ("validate.failed", "La validació ha fallat: {error}"),
    ("validate.ok", "Catàlegs vàlids: {locales} idiomes, {messages} missatges."),
    ("ir.failed", "L'exportació de l'IR ha fallat: {error}"),
    ("i18n.lang.invalid_env", "Valor no vàlid per a {env}: {value}. S'esperava 'en' o 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Nota: la sortida que no és en anglès està traduïda automàticament i pot ser inexacta.",
    ),
];

/// Returns the message catalog for the requested locale.
#[must_use]
pub fn catalog_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_CA_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    match locale {
        Locale::En => CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect()),
        Locale::Ca => CATALOG_CA_MAP.get_or_init(|| CATALOG_CA.iter().copied().collect()),
    }
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the selected locale while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    translate_in(current_locale(), key, args)
}

/// Translates `key` in an explicit `locale`.
#[must_use]
pub fn translate_in(locale: Locale, key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog_for(locale)
        .get(key)
        .copied()
        .or_else(|| catalog_for(Locale::En).get(key).copied())
        .unwrap_or(key);
    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
