// crates/i18n-gen-core/src/template.rs
// ============================================================================
// Module: Template Analysis
// Description: Generation-time validation of message templates.
// Purpose: Extract placeholder references and reject malformed templates.
// Dependencies: i18n-gen-runtime
// ============================================================================

//! ## Overview
//! Templates are parsed with the runtime grammar so that anything accepted
//! here renders at runtime. On top of parsing, literal text is scanned for
//! sequences that look like a placeholder with a broken opening delimiter,
//! such as `{ .Name }}` or `{.Name}}`. Those are literal text to the parser
//! but almost always an authoring mistake, so they are rejected.
//!
//! Dotted paths such as `{{ .User.Name }}` parse, but generated translators
//! only take flat parameters, so they are reported as an invalid action.

use i18n_gen_runtime::template::Segment;
use i18n_gen_runtime::template::TemplateError;
use i18n_gen_runtime::template::parse_template;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Why a template was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateIssue {
    /// The template does not parse.
    Syntax(TemplateError),
    /// Literal text resembles a malformed placeholder.
    Suspicious {
        /// The offending text.
        snippet: String,
    },
}

/// Result of analyzing one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateAnalysis {
    /// Unique placeholder names in order of first appearance.
    pub placeholders: Vec<String>,
}

// ============================================================================
// SECTION: Analysis
// ============================================================================

/// Parses `source`, checks it for suspicious text, and collects placeholders.
///
/// # Errors
/// Returns [`TemplateIssue`] when the template is malformed.
pub fn analyze_template(source: &str) -> Result<TemplateAnalysis, TemplateIssue> {
    let segments = parse_template(source).map_err(TemplateIssue::Syntax)?;
    let mut placeholders: Vec<String> = Vec::new();
    for segment in &segments {
        match segment {
            Segment::Text(text) => {
                if let Some(snippet) = find_suspicious(text) {
                    return Err(TemplateIssue::Suspicious {
                        snippet: snippet.to_string(),
                    });
                }
            }
            Segment::Placeholder(placeholder) => {
                if !placeholder.rest().is_empty() {
                    return Err(TemplateIssue::Syntax(TemplateError::InvalidAction {
                        action: format!(".{}", placeholder.path()),
                        position: placeholder.position(),
                    }));
                }
                if !placeholders.iter().any(|known| known == placeholder.root()) {
                    placeholders.push(placeholder.root().to_string());
                }
            }
        }
    }
    Ok(TemplateAnalysis {
        placeholders,
    })
}

/// Returns the first placeholder-like snippet in literal `text`.
///
/// A snippet is `{`, optional whitespace, an optional `.`, one non-space
/// character, then anything up to the first `}` which must be doubled.
#[must_use]
pub fn find_suspicious(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    bytes
        .iter()
        .enumerate()
        .filter(|(_, byte)| **byte == b'{')
        .find_map(|(start, _)| suspicious_end(bytes, start).map(|end| &text[start .. end]))
}

/// Returns the end offset of a suspicious snippet opening at `start`.
fn suspicious_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut index = start + 1;
    while bytes.get(index).is_some_and(u8::is_ascii_whitespace) {
        index += 1;
    }
    if bytes.get(index) == Some(&b'.') {
        if let Some(end) = closing_after(bytes, index + 1) {
            return Some(end);
        }
    }
    closing_after(bytes, index)
}

/// Matches one non-space byte at `index`, then text up to a `}}`.
fn closing_after(bytes: &[u8], index: usize) -> Option<usize> {
    let first = *bytes.get(index)?;
    if first.is_ascii_whitespace() {
        return None;
    }
    let mut cursor = index + 1;
    while bytes.get(cursor).is_some_and(|byte| *byte != b'}') {
        cursor += 1;
    }
    (bytes.get(cursor) == Some(&b'}') && bytes.get(cursor + 1) == Some(&b'}')).then_some(cursor + 2)
}
