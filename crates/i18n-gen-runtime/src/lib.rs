// crates/i18n-gen-runtime/src/lib.rs
// ============================================================================
// Module: i18n-gen Runtime
// Description: Render-dispatch helpers called by generated translators.
// Purpose: Substitute typed arguments into message templates at runtime.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Generated translation modules link against this crate. Each generated
//! locale owns a static [`MessageCatalog`] of default templates and renders
//! through a [`LocaleLoader`]; conditional variants selected by generated
//! guards are rendered directly with [`render_template`].
//!
//! Rendering is plain text substitution. Arguments are looked up by the
//! placeholder root (`{{ .Name }}` reads the argument keyed `Name`), and a
//! placeholder without a matching argument is an error rather than empty
//! output.
//!
//! ```
//! use i18n_gen_runtime::LocaleLoader;
//! use i18n_gen_runtime::MessageCatalog;
//! use i18n_gen_runtime::TemplateArg;
//!
//! static EN: MessageCatalog = MessageCatalog::new("en", &[("greeting", "Hi {{ .Name }}")]);
//!
//! let name = "Ada";
//! let loader = LocaleLoader::new(&EN);
//! let text = loader.render_message("greeting", &[TemplateArg::new("Name", &name)]).unwrap();
//! assert_eq!(text, "Hi Ada");
//! ```

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod template;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fmt::Write;

use thiserror::Error;

use crate::template::Segment;
use crate::template::TemplateError;
use crate::template::parse_template;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while rendering a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Template failed to parse.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
    /// A placeholder referenced an argument that was not supplied.
    #[error("missing template argument `{key}`")]
    MissingArgument {
        /// Placeholder root that had no argument.
        key: String,
    },
    /// A placeholder used a nested path; generated arguments are flat.
    #[error("nested placeholder path `{path}` is not supported")]
    NestedPath {
        /// Dotted path as written in the template.
        path: String,
    },
    /// The locale catalog has no template for the message id.
    #[error("unknown message `{id}` for locale `{locale}`")]
    UnknownMessage {
        /// Locale tag of the catalog.
        locale: String,
        /// Requested message id.
        id: String,
    },
    /// An argument's `Display` implementation reported an error.
    #[error("failed to format template argument `{key}`")]
    Format {
        /// Argument key being formatted.
        key: String,
    },
}

// ============================================================================
// SECTION: Arguments
// ============================================================================

/// Named argument substituted into a template placeholder.
#[derive(Clone, Copy)]
pub struct TemplateArg<'a> {
    /// Placeholder root this argument satisfies.
    key: &'static str,
    /// Value rendered through `Display`.
    value: &'a dyn fmt::Display,
}

impl<'a> TemplateArg<'a> {
    /// Creates an argument for the placeholder `{{ .key }}`.
    #[must_use]
    pub fn new(key: &'static str, value: &'a dyn fmt::Display) -> Self {
        Self {
            key,
            value,
        }
    }

    /// Returns the placeholder key.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }
}

impl fmt::Debug for TemplateArg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateArg").field("key", &self.key).finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders `source`, substituting placeholders from `args`.
///
/// # Errors
/// Returns [`RenderError`] when the template does not parse, a placeholder has
/// no argument, or a placeholder uses a nested path.
pub fn render_template(source: &str, args: &[TemplateArg<'_>]) -> Result<String, RenderError> {
    let segments = parse_template(source)?;
    let mut out = String::with_capacity(source.len());
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Placeholder(placeholder) => {
                if !placeholder.rest().is_empty() {
                    return Err(RenderError::NestedPath {
                        path: placeholder.path(),
                    });
                }
                let key = placeholder.root();
                let arg = args.iter().find(|arg| arg.key == key).ok_or_else(|| {
                    RenderError::MissingArgument {
                        key: key.to_string(),
                    }
                })?;
                write!(out, "{}", arg.value).map_err(|_| RenderError::Format {
                    key: key.to_string(),
                })?;
            }
        }
    }
    Ok(out)
}

// ============================================================================
// SECTION: Catalogs
// ============================================================================

/// Default templates for one locale, keyed by message id.
#[derive(Debug)]
pub struct MessageCatalog {
    /// Locale tag the templates belong to.
    locale: &'static str,
    /// `(message id, default template)` pairs.
    entries: &'static [(&'static str, &'static str)],
}

impl MessageCatalog {
    /// Creates a catalog from static entries.
    #[must_use]
    pub const fn new(locale: &'static str, entries: &'static [(&'static str, &'static str)]) -> Self {
        Self {
            locale,
            entries,
        }
    }

    /// Returns the locale tag.
    #[must_use]
    pub const fn locale(&self) -> &'static str {
        self.locale
    }

    /// Returns the default template for `id`, if present.
    #[must_use]
    pub fn template(&self, id: &str) -> Option<&'static str> {
        self.entries.iter().find(|(entry_id, _)| *entry_id == id).map(|(_, template)| *template)
    }

    /// Iterates message ids in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }
}

/// Locale-scoped renderer over a static catalog.
#[derive(Debug, Clone, Copy)]
pub struct LocaleLoader {
    /// Catalog backing this loader.
    catalog: &'static MessageCatalog,
}

impl LocaleLoader {
    /// Creates a loader for `catalog`.
    #[must_use]
    pub const fn new(catalog: &'static MessageCatalog) -> Self {
        Self {
            catalog,
        }
    }

    /// Returns the locale tag of the underlying catalog.
    #[must_use]
    pub const fn locale(&self) -> &'static str {
        self.catalog.locale()
    }

    /// Renders the default template of message `id`.
    ///
    /// # Errors
    /// Returns [`RenderError::UnknownMessage`] when the catalog lacks `id`, or
    /// any error from [`render_template`].
    pub fn render_message(&self, id: &str, args: &[TemplateArg<'_>]) -> Result<String, RenderError> {
        let template = self.catalog.template(id).ok_or_else(|| RenderError::UnknownMessage {
            locale: self.catalog.locale().to_string(),
            id: id.to_string(),
        })?;
        render_template(template, args)
    }
}
