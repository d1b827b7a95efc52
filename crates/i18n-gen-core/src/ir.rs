// crates/i18n-gen-core/src/ir.rs
// ============================================================================
// Module: Translation IR
// Description: Emitter-facing model of validated catalogs.
// Purpose: Hand emitters a fully resolved, internally consistent description
//          of every locale, message, variable, and guard.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The IR is built once all catalogs validate and is immutable afterwards.
//! Every locale lists the same messages in the same order, and every message
//! has the same variable names and function name in every locale; only
//! template text, declared type tokens, and guard text differ.

use serde::Serialize;

use crate::error::GenError;
use crate::expression::Expr;
use crate::locale::LocaleTag;
use crate::naming::IdentNames;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Root of the intermediate representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationIr {
    /// Target package or module name.
    pub package: String,
    /// Locales in canonical order.
    pub locales: Vec<LangData>,
    /// Message ids in canonical order.
    pub message_ids: Vec<String>,
    /// Per-locale translations, parallel to `locales`.
    pub translations: Vec<LocaleTranslations>,
}

/// Identity of one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LangData {
    /// Canonical tag, e.g. `pt-BR`.
    pub tag: LocaleTag,
    /// Identifier form, e.g. `PtBr`.
    pub ident: String,
    /// Constant form, e.g. `PT_BR`.
    pub screaming: String,
}

impl LangData {
    /// Derives identity forms from a tag.
    #[must_use]
    pub fn from_tag(tag: &LocaleTag) -> Self {
        Self {
            ident: tag.ident(),
            screaming: tag.screaming(),
            tag: tag.clone(),
        }
    }
}

/// Messages of one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleTranslations {
    /// Locale identity.
    pub lang: LangData,
    /// Messages in canonical id order.
    pub messages: Vec<MessageData>,
}

/// One message in one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageData {
    /// Message id as written in the catalog.
    pub message_id: String,
    /// PascalCase method form.
    pub method_name: String,
    /// snake_case function form.
    pub function_name: String,
    /// Variables sorted by raw name.
    pub variables: Vec<Variable>,
    /// Default template.
    pub template: String,
    /// Conditional templates in declaration order.
    pub conditional_templates: Vec<ConditionalData>,
}

/// Variable accepted by a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Variable {
    /// Declared in `variables` with a type token.
    Declared {
        /// Name forms.
        names: IdentNames,
        /// Type token for this locale.
        type_token: String,
    },
    /// Referenced by a placeholder but not declared.
    Inferred {
        /// Name forms; `raw` is the placeholder spelling.
        names: IdentNames,
    },
}

impl Variable {
    /// Returns the name forms.
    #[must_use]
    pub const fn names(&self) -> &IdentNames {
        match self {
            Self::Declared {
                names,
                ..
            }
            | Self::Inferred {
                names,
            } => names,
        }
    }

    /// Returns the declared type token, if any.
    #[must_use]
    pub fn type_token(&self) -> Option<&str> {
        match self {
            Self::Declared {
                type_token,
                ..
            } => Some(type_token),
            Self::Inferred {
                ..
            } => None,
        }
    }
}

/// Conditional template with its parsed guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionalData {
    /// Selecting guard.
    pub guard: Guard,
    /// Template used when the guard holds.
    pub template: String,
}

/// Guard expression in source and parsed form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Guard {
    /// Expression as written.
    pub source: String,
    /// Parsed expression.
    pub expr: Expr,
}

// ============================================================================
// SECTION: Queries
// ============================================================================

impl TranslationIr {
    /// Returns the translations of `tag`.
    #[must_use]
    pub fn locale(&self, tag: &str) -> Option<&LocaleTranslations> {
        self.translations.iter().find(|translations| translations.lang.tag.as_str() == tag)
    }

    /// Serializes the IR as pretty JSON.
    ///
    /// # Errors
    /// Returns [`GenError::Emit`] if serialization fails.
    pub fn to_json(&self) -> Result<String, GenError> {
        serde_json::to_string_pretty(self).map_err(|err| GenError::Emit(err.to_string()))
    }
}

impl LocaleTranslations {
    /// Returns the message with `message_id`.
    #[must_use]
    pub fn message(&self, message_id: &str) -> Option<&MessageData> {
        self.messages.iter().find(|message| message.message_id == message_id)
    }
}
