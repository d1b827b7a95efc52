// crates/i18n-gen-core/src/naming.rs
// ============================================================================
// Module: Identifier Folding
// Description: Word splitting and case conversion for catalog names.
// Purpose: Map message ids and variable names onto collision-checked identifiers.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Catalog authors write names in whatever style they like (`my_greeting`,
//! `myGreeting`, `HTTPStatus`). Each name is split into words at non
//! alphanumeric characters, lower-to-upper transitions, and the end of an
//! acronym. The lower-cased words joined by `_` form the folded key; two names
//! with the same key are the same identifier and must not coexist.
//!
//! Only ASCII letters and digits form words. A name whose key is empty or
//! starts with a digit cannot become an identifier.

use serde::Serialize;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Reasons a name cannot become an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentError {
    /// The name contains no ASCII letters or digits.
    Empty,
    /// The folded name begins with a digit.
    LeadingDigit,
}

impl IdentError {
    /// Returns a human readable reason.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::Empty => "name contains no ASCII letters or digits",
            Self::LeadingDigit => "name must not start with a digit",
        }
    }
}

// ============================================================================
// SECTION: Names
// ============================================================================

/// A raw name together with its derived identifier forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentNames {
    /// Name exactly as written in the catalog.
    pub raw: String,
    /// Folded collision key (lower snake case).
    pub key: String,
    /// `PascalCase` form.
    pub pascal: String,
    /// `camelCase` form.
    pub camel: String,
    /// `snake_case` form.
    pub snake: String,
}

impl IdentNames {
    /// Derives all forms of `raw`.
    ///
    /// # Errors
    /// Returns [`IdentError`] when `raw` cannot become an identifier.
    pub fn new(raw: &str) -> Result<Self, IdentError> {
        let words = split_words(raw);
        let Some(first) = words.first() else {
            return Err(IdentError::Empty);
        };
        if first.starts_with(|ch: char| ch.is_ascii_digit()) {
            return Err(IdentError::LeadingDigit);
        }
        let key = join_snake(&words);
        let pascal: String = words.iter().map(|word| capitalize(word)).collect();
        let camel = camel_from(&words);
        Ok(Self {
            raw: raw.to_string(),
            snake: key.clone(),
            key,
            pascal,
            camel,
        })
    }
}

// ============================================================================
// SECTION: Folding
// ============================================================================

/// Splits `raw` into words.
#[must_use]
pub fn split_words(raw: &str) -> Vec<String> {
    let chars: Vec<char> = raw.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    for (index, &ch) in chars.iter().enumerate() {
        if !ch.is_ascii_alphanumeric() {
            flush(&mut words, &mut current);
            continue;
        }
        if !current.is_empty() && index > 0 {
            let prev = chars[index - 1];
            let next_is_lower = chars.get(index + 1).is_some_and(char::is_ascii_lowercase);
            let lower_to_upper =
                (prev.is_ascii_lowercase() || prev.is_ascii_digit()) && ch.is_ascii_uppercase();
            let acronym_end = prev.is_ascii_uppercase() && ch.is_ascii_uppercase() && next_is_lower;
            if lower_to_upper || acronym_end {
                flush(&mut words, &mut current);
            }
        }
        current.push(ch);
    }
    flush(&mut words, &mut current);
    words
}

/// Returns the folded collision key of `raw`.
#[must_use]
pub fn fold(raw: &str) -> String {
    join_snake(&split_words(raw))
}

/// Moves a finished word into `words`.
fn flush(words: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}

/// Joins lower-cased words with `_`.
fn join_snake(words: &[String]) -> String {
    words.iter().map(|word| word.to_ascii_lowercase()).collect::<Vec<_>>().join("_")
}

/// Builds the camelCase form.
fn camel_from(words: &[String]) -> String {
    let mut out = String::new();
    for (index, word) in words.iter().enumerate() {
        if index == 0 {
            out.push_str(&word.to_ascii_lowercase());
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

/// Upper-cases the first character and lower-cases the rest.
fn capitalize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    let mut chars = lower.chars();
    chars.next().map_or_else(String::new, |first| {
        let mut out = String::with_capacity(lower.len());
        out.push(first.to_ascii_uppercase());
        out.push_str(chars.as_str());
        out
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================
