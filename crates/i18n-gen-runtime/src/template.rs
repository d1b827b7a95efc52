// crates/i18n-gen-runtime/src/template.rs
// ============================================================================
// Module: Message Template Grammar
// Description: Scanner for `{{ .Name }}` placeholder templates.
// Purpose: Share one template grammar between generation-time validation and
//          render-time substitution.
// Dependencies: Standard library only.
// ============================================================================

//! ## Overview
//!
//! Message templates are literal text interleaved with placeholder actions of
//! the form `{{ .Path }}`. Whitespace inside the delimiters is optional and the
//! path is one or more dotted identifier segments. Any other action content is
//! rejected, so a template either parses completely or fails with a positioned
//! [`TemplateError`].
//!
//! A stray `}}` outside an action is literal text. The generator flags such
//! sequences separately because they are usually a mistyped opening brace.
//!
//! ```
//! use i18n_gen_runtime::template::Segment;
//! use i18n_gen_runtime::template::parse_template;
//!
//! let segments = parse_template("Hello {{ .Name }}!").unwrap();
//! assert_eq!(segments.len(), 3);
//! assert!(matches!(&segments[1], Segment::Placeholder(p) if p.root() == "Name"));
//! ```

use std::fmt;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum accepted template size in bytes.
pub const MAX_TEMPLATE_BYTES: usize = 256 * 1024;

/// Opening placeholder delimiter.
const OPEN: &str = "{{";
/// Closing placeholder delimiter.
const CLOSE: &str = "}}";

// ============================================================================
// SECTION: Types
// ============================================================================

/// One parsed piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text copied verbatim.
    Text(&'a str),
    /// Placeholder action referencing a dotted path.
    Placeholder(Placeholder<'a>),
}

/// Placeholder action such as `{{ .User.Name }}`.
///
/// # Invariants
/// - `root` is a valid identifier.
/// - Every entry of `rest` is a valid identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// First path segment; names the referenced variable.
    root: &'a str,
    /// Remaining path segments after the root.
    rest: Vec<&'a str>,
    /// Byte offset of the opening delimiter.
    position: usize,
    /// Full action text including delimiters.
    raw: &'a str,
}

impl<'a> Placeholder<'a> {
    /// Returns the referenced variable name.
    #[must_use]
    pub const fn root(&self) -> &'a str {
        self.root
    }

    /// Returns path segments following the root.
    #[must_use]
    pub fn rest(&self) -> &[&'a str] {
        &self.rest
    }

    /// Returns the byte offset of the opening delimiter.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns the full action text, delimiters included.
    #[must_use]
    pub const fn raw(&self) -> &'a str {
        self.raw
    }

    /// Returns the dotted path as written, without the leading dot.
    #[must_use]
    pub fn path(&self) -> String {
        let mut path = self.root.to_string();
        for segment in &self.rest {
            path.push('.');
            path.push_str(segment);
        }
        path
    }
}

/// Errors raised while scanning a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Template exceeded [`MAX_TEMPLATE_BYTES`].
    InputTooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual template length in bytes.
        actual_bytes: usize,
    },
    /// An opening delimiter has no matching close.
    Unterminated {
        /// Byte offset of the opening delimiter.
        position: usize,
    },
    /// Action content is not a single dotted path.
    InvalidAction {
        /// Trimmed action content.
        action: String,
        /// Byte offset of the opening delimiter.
        position: usize,
    },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputTooLarge {
                max_bytes,
                actual_bytes,
            } => write!(f, "template exceeds size limit: {actual_bytes} bytes (max {max_bytes})"),
            Self::Unterminated {
                position,
            } => write!(f, "unclosed action `{{{{` at {position}"),
            Self::InvalidAction {
                action,
                position,
            } => write!(f, "invalid action `{action}` at {position}, expected `.Name`"),
        }
    }
}

impl std::error::Error for TemplateError {}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses a template into literal and placeholder segments.
///
/// # Errors
/// Returns [`TemplateError`] for oversized input, unterminated actions, or
/// action content that is not a dotted identifier path.
pub fn parse_template(source: &str) -> Result<Vec<Segment<'_>>, TemplateError> {
    if source.len() > MAX_TEMPLATE_BYTES {
        return Err(TemplateError::InputTooLarge {
            max_bytes: MAX_TEMPLATE_BYTES,
            actual_bytes: source.len(),
        });
    }

    let mut segments = Vec::new();
    let mut offset = 0;
    while let Some(relative) = source[offset ..].find(OPEN) {
        let open = offset + relative;
        if open > offset {
            segments.push(Segment::Text(&source[offset .. open]));
        }
        let content_start = open + OPEN.len();
        let close = source[content_start ..]
            .find(CLOSE)
            .map(|relative| content_start + relative)
            .ok_or(TemplateError::Unterminated {
                position: open,
            })?;
        let end = close + CLOSE.len();
        let placeholder = parse_action(&source[content_start .. close], open, &source[open .. end])?;
        segments.push(Segment::Placeholder(placeholder));
        offset = end;
    }
    if offset < source.len() {
        segments.push(Segment::Text(&source[offset ..]));
    }
    Ok(segments)
}

/// Parses the content between delimiters as a dotted path.
fn parse_action<'a>(
    content: &'a str,
    position: usize,
    raw: &'a str,
) -> Result<Placeholder<'a>, TemplateError> {
    let invalid = || TemplateError::InvalidAction {
        action: content.trim().to_string(),
        position,
    };
    let path = content.trim().strip_prefix('.').ok_or_else(invalid)?;
    let mut segments = path.split('.');
    let root = segments.next().filter(|segment| is_identifier(segment)).ok_or_else(invalid)?;
    let mut rest = Vec::new();
    for segment in segments {
        if !is_identifier(segment) {
            return Err(invalid());
        }
        rest.push(segment);
    }
    Ok(Placeholder {
        root,
        rest,
        position,
        raw,
    })
}

/// Returns true when `value` is an ASCII identifier.
#[must_use]
pub fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        }
        _ => false,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
