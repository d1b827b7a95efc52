// crates/i18n-gen-core/src/error.rs
// ============================================================================
// Module: Generation Errors
// Description: Error taxonomy for catalog loading, validation, and IR builds.
// Purpose: Carry enough context (file, locale, message) to be actionable.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Every stage of the pipeline fails fast with a [`GenError`]. Errors are
//! deterministic functions of the input, so nothing is retried; the CLI is
//! the only layer that renders them for people.

use std::fmt;

use thiserror::Error;

// ============================================================================
// SECTION: Template References
// ============================================================================

/// Identifies which template of a message an error refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateRef {
    /// The message's default template.
    Default,
    /// A conditional alternate template.
    Conditional {
        /// Zero-based declaration index.
        index: usize,
        /// Guard expression selecting the template.
        expression: String,
    },
}

impl fmt::Display for TemplateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default template"),
            Self::Conditional {
                index,
                expression,
            } => write!(f, "custom template #{index} ({expression})"),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised by the generation pipeline.
///
/// # Invariants
/// - Variant meanings and [`GenError::kind`] labels are stable for tests and telemetry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenError {
    /// Filesystem failure while discovering or reading catalogs.
    #[error("io error at {path}: {message}")]
    Io {
        /// Path being accessed.
        path: String,
        /// Underlying error text.
        message: String,
    },
    /// An input exceeded a configured limit.
    #[error("input too large at {path}: {detail}")]
    InputTooLarge {
        /// Path or directory that exceeded the limit.
        path: String,
        /// Which limit was exceeded.
        detail: String,
    },
    /// Catalog document is malformed.
    #[error("error parsing YAML file `{file}`: {message}")]
    Parse {
        /// Catalog file, relative to the loader root.
        file: String,
        /// Parser error text.
        message: String,
    },
    /// Locale tag derived from a file name is not a valid language tag.
    #[error("invalid locale tag `{tag}` derived from `{file}`: {reason}")]
    InvalidLocale {
        /// Catalog file, relative to the loader root.
        file: String,
        /// Tag as derived from the file name.
        tag: String,
        /// Why validation failed.
        reason: String,
    },
    /// Two catalog files resolve to the same canonical locale.
    #[error("duplicate locale {locale}: `{first}` and `{second}`")]
    DuplicateLocale {
        /// Canonical locale tag.
        locale: String,
        /// File that claimed the locale first.
        first: String,
        /// File that claimed it again.
        second: String,
    },
    /// Catalog structures diverge.
    #[error(
        "structure mismatch between translation files `{first_file}` and `{second_file}` at \
         {path}"
    )]
    SchemaMismatch {
        /// Reference catalog file.
        first_file: String,
        /// Reference catalog locale.
        first_locale: String,
        /// Diverging catalog file.
        second_file: String,
        /// Diverging catalog locale.
        second_locale: String,
        /// Dotted path of the first divergence.
        path: String,
    },
    /// A template failed to parse.
    #[error("unparseable template in {locale}/{message_id} {template}: {detail}")]
    TemplateSyntax {
        /// Locale of the catalog.
        locale: String,
        /// Message id.
        message_id: String,
        /// Which template failed.
        template: TemplateRef,
        /// Parser error text.
        detail: String,
    },
    /// A template contains text that looks like a broken placeholder.
    #[error("possible invalid syntax in {locale}/{message_id} {template}: {snippet}")]
    SuspiciousSyntax {
        /// Locale of the catalog.
        locale: String,
        /// Message id.
        message_id: String,
        /// Which template contains the snippet.
        template: TemplateRef,
        /// The suspicious text.
        snippet: String,
    },
    /// Two names fold to the same identifier.
    #[error("identifier collision in {scope}: `{first}` and `{second}` both fold to `{folded}`")]
    IdentifierCollision {
        /// Where the collision happened (a message or the message id set).
        scope: String,
        /// First spelling, in sorted order.
        first: String,
        /// Second spelling.
        second: String,
        /// Shared folded identifier.
        folded: String,
    },
    /// A name cannot be turned into an identifier.
    #[error("invalid identifier `{name}` in {scope}: {reason}")]
    InvalidIdentifier {
        /// Where the name appeared.
        scope: String,
        /// Raw name.
        name: String,
        /// Why it is rejected.
        reason: String,
    },
    /// A guard expression failed to parse.
    #[error("invalid expression `{expression}` in {locale}/{message_id}: {detail}")]
    ExpressionSyntax {
        /// Locale of the catalog.
        locale: String,
        /// Message id.
        message_id: String,
        /// Guard source text.
        expression: String,
        /// Parser error text.
        detail: String,
    },
    /// A guard references an identifier outside the message's variables.
    #[error(
        "unknown variable used in expression `{expression}` in {locale}/{message_id}: \
         {identifier}"
    )]
    UnknownVariable {
        /// Locale of the catalog.
        locale: String,
        /// Message id.
        message_id: String,
        /// Guard source text.
        expression: String,
        /// Offending identifier.
        identifier: String,
    },
    /// The IR violated an invariant the validators should have guaranteed.
    #[error("internal consistency error (this is a bug): {0}")]
    InternalConsistency(String),
    /// The emitter failed to render the IR.
    #[error("emit error: {0}")]
    Emit(String),
}

impl GenError {
    /// Returns a stable snake_case label for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Io {
                ..
            } => "io",
            Self::InputTooLarge {
                ..
            } => "input_too_large",
            Self::Parse {
                ..
            } => "parse",
            Self::InvalidLocale {
                ..
            } => "invalid_locale",
            Self::DuplicateLocale {
                ..
            } => "duplicate_locale",
            Self::SchemaMismatch {
                ..
            } => "schema_mismatch",
            Self::TemplateSyntax {
                ..
            } => "template_syntax",
            Self::SuspiciousSyntax {
                ..
            } => "suspicious_syntax",
            Self::IdentifierCollision {
                ..
            } => "identifier_collision",
            Self::InvalidIdentifier {
                ..
            } => "invalid_identifier",
            Self::ExpressionSyntax {
                ..
            } => "expression_syntax",
            Self::UnknownVariable {
                ..
            } => "unknown_variable",
            Self::InternalConsistency(_) => "internal_consistency",
            Self::Emit(_) => "emit",
        }
    }
}
