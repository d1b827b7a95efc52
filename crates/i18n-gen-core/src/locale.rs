// crates/i18n-gen-core/src/locale.rs
// ============================================================================
// Module: Locale Tags
// Description: Validation and canonicalization of BCP-47-style language tags.
// Purpose: Derive stable locale identities and identifiers from file names.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Catalog file names carry their locale (`pt-BR.i18n.yaml`). Tags are checked
//! against a BCP-47 subset: a 2-3 or 5-8 letter language, an optional 4 letter
//! script, an optional region (2 letters or 3 digits), then any number of
//! variants. `_` is accepted as a separator and normalized to `-`.
//!
//! Canonical casing follows the usual convention (`zh-Hant-TW`), so two files
//! spelling the same locale differently are detected as duplicates.

use std::fmt;

use serde::Serialize;
use serde::Serializer;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum accepted tag length in bytes.
pub const MAX_LOCALE_TAG_BYTES: usize = 64;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Reasons a tag is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleTagError {
    /// Tag is empty.
    Empty,
    /// Tag exceeds [`MAX_LOCALE_TAG_BYTES`].
    TooLong,
    /// Primary language subtag is malformed.
    InvalidLanguage(String),
    /// A subtag after the language is malformed or out of order.
    InvalidSubtag(String),
}

impl fmt::Display for LocaleTagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "tag is empty"),
            Self::TooLong => write!(f, "tag exceeds {MAX_LOCALE_TAG_BYTES} bytes"),
            Self::InvalidLanguage(subtag) => {
                write!(f, "language subtag `{subtag}` must be 2-3 or 5-8 ASCII letters")
            }
            Self::InvalidSubtag(subtag) => write!(f, "unexpected subtag `{subtag}`"),
        }
    }
}

impl std::error::Error for LocaleTagError {}

// ============================================================================
// SECTION: Tags
// ============================================================================

/// Canonical locale tag.
///
/// # Invariants
/// - `subtags` is non-empty and joined by `-` equals `canonical`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocaleTag {
    /// Canonical hyphenated form.
    canonical: String,
    /// Canonically cased subtags.
    subtags: Vec<String>,
}

/// Position reached while walking subtags.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Stage {
    /// Only the language has been read.
    Language,
    /// A script subtag has been read.
    Script,
    /// A region subtag has been read.
    Region,
    /// At least one variant has been read.
    Variant,
}

impl LocaleTag {
    /// Parses and canonicalizes `raw`.
    ///
    /// # Errors
    /// Returns [`LocaleTagError`] when the tag does not match the accepted grammar.
    pub fn parse(raw: &str) -> Result<Self, LocaleTagError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(LocaleTagError::Empty);
        }
        if raw.len() > MAX_LOCALE_TAG_BYTES {
            return Err(LocaleTagError::TooLong);
        }

        let mut parts = raw.split(['-', '_']);
        let language = parts.next().unwrap_or_default();
        if !is_language(language) {
            return Err(LocaleTagError::InvalidLanguage(language.to_string()));
        }
        let mut subtags = vec![language.to_ascii_lowercase()];

        let mut stage = Stage::Language;
        for part in parts {
            if stage < Stage::Script && is_script(part) {
                subtags.push(title_case(part));
                stage = Stage::Script;
            } else if stage < Stage::Region && is_region(part) {
                subtags.push(part.to_ascii_uppercase());
                stage = Stage::Region;
            } else if is_variant(part) {
                subtags.push(part.to_ascii_lowercase());
                stage = Stage::Variant;
            } else {
                return Err(LocaleTagError::InvalidSubtag(part.to_string()));
            }
        }

        Ok(Self {
            canonical: subtags.join("-"),
            subtags,
        })
    }

    /// Returns the canonical tag, e.g. `pt-BR`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// Returns the PascalCase identifier form, e.g. `PtBr`.
    #[must_use]
    pub fn ident(&self) -> String {
        self.subtags.iter().map(|subtag| title_case(subtag)).collect()
    }

    /// Returns the upper-case constant form, e.g. `PT_BR`.
    #[must_use]
    pub fn screaming(&self) -> String {
        self.subtags.iter().map(|subtag| subtag.to_ascii_uppercase()).collect::<Vec<_>>().join("_")
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl Serialize for LocaleTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical)
    }
}

// ============================================================================
// SECTION: Subtag Grammar
// ============================================================================

/// Returns true for 2-3 or 5-8 ASCII letters.
fn is_language(part: &str) -> bool {
    matches!(part.len(), 2 ..= 3 | 5 ..= 8) && part.bytes().all(|b| b.is_ascii_alphabetic())
}

/// Returns true for exactly 4 ASCII letters.
fn is_script(part: &str) -> bool {
    part.len() == 4 && part.bytes().all(|b| b.is_ascii_alphabetic())
}

/// Returns true for 2 ASCII letters or 3 ASCII digits.
fn is_region(part: &str) -> bool {
    (part.len() == 2 && part.bytes().all(|b| b.is_ascii_alphabetic()))
        || (part.len() == 3 && part.bytes().all(|b| b.is_ascii_digit()))
}

/// Returns true for 5-8 alphanumerics, or a digit followed by 3 alphanumerics.
fn is_variant(part: &str) -> bool {
    let alnum = part.bytes().all(|b| b.is_ascii_alphanumeric());
    let digit_led = part.len() == 4 && part.as_bytes().first().is_some_and(u8::is_ascii_digit);
    alnum && ((5 ..= 8).contains(&part.len()) || digit_led)
}

/// Upper-cases the first letter and lower-cases the rest.
fn title_case(part: &str) -> String {
    let mut out = String::with_capacity(part.len());
    for (index, ch) in part.chars().enumerate() {
        if index == 0 {
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push(ch.to_ascii_lowercase());
        }
    }
    out
}

// ============================================================================
// SECTION: Tests
// ============================================================================
