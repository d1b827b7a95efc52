// crates/i18n-gen-emit/src/lib.rs
// ============================================================================
// Module: i18n-gen Rust Emitter
// Description: Deterministic Rust source generation from the translation IR.
// Purpose: Produce a translator module with one typed method per message.
// Dependencies: i18n-gen-core, thiserror
// ============================================================================

//! ## Overview
//! [`RustEmitter`] renders a [`TranslationIr`] into a single Rust module:
//! - a `Translator` trait with one method per message, parameters sorted by
//!   variable name;
//! - a `Lang` enum with `ALL`, `tag`, `from_tag`, and the `translator` /
//!   `translators` registry;
//! - per locale, a static runtime `MessageCatalog`, a unit struct, and its
//!   `Translator` impl.
//!
//! Each method tests its conditional templates in declaration order and
//! falls back to the locale catalog's default template. Output is a pure
//! function of the IR and the [`EmitterConfig`]; there is no global state.
//!
//! Every catalog-derived string is escaped before it reaches the output, and
//! every type token must look like a type, so catalogs cannot inject code.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod guard;
mod syntax;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use i18n_gen_core::Emitter;
use i18n_gen_core::TranslationIr;
use i18n_gen_core::ir::LocaleTranslations;
use i18n_gen_core::ir::MessageData;
use i18n_gen_core::ir::Variable;
use thiserror::Error;

use crate::guard::render_guard;
use crate::syntax::comment_text;
use crate::syntax::is_module_path;
use crate::syntax::is_type_token;
use crate::syntax::rust_ident;
use crate::syntax::rust_string_literal;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Runtime crate path used when none is configured.
pub const DEFAULT_RUNTIME_CRATE: &str = "::i18n_gen_runtime";

/// Parameter type of variables without a declared type.
pub const DEFAULT_OPAQUE_TYPE: &str = "&dyn ::std::fmt::Display";

/// Method name taken by `Translator::lang`.
const RESERVED_METHOD: &str = "lang";

/// Local holding the template arguments inside generated methods.
const ARGS_LOCAL: &str = "__args";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while rendering Rust source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmitError {
    /// The runtime crate path is not a `::`-separated identifier path.
    #[error("invalid runtime crate path `{0}`")]
    InvalidRuntimePath(String),
    /// A type token cannot be spliced into a parameter list.
    #[error("invalid type token `{token}` for `{context}`")]
    InvalidTypeToken {
        /// Where the token was used.
        context: String,
        /// Offending token.
        token: String,
    },
    /// Locales declare different types for one variable.
    #[error(
        "variable `{variable}` of message `{message_id}` is `{first}` in `{first_locale}` but `{second}` in `{second_locale}`"
    )]
    TypeMismatch {
        /// Message id.
        message_id: String,
        /// Variable raw name.
        variable: String,
        /// Locale that fixed the type.
        first_locale: String,
        /// Resolved type in that locale.
        first: String,
        /// Locale that disagrees.
        second_locale: String,
        /// Resolved type in the disagreeing locale.
        second: String,
    },
    /// A message function name clashes with a generated item.
    #[error("message `{message_id}` maps to reserved method name `{name}`")]
    ReservedName {
        /// Message id.
        message_id: String,
        /// Clashing function name.
        name: String,
    },
    /// A guard compares a variable that has no declared type.
    #[error("guard in message `{message_id}` uses `{identifier}`, which has no declared type")]
    UntypedGuardVariable {
        /// Message id.
        message_id: String,
        /// Identifier as written in the guard.
        identifier: String,
    },
    /// The IR violates its own alignment invariants.
    #[error("translation IR is inconsistent: {0}")]
    InconsistentIr(String),
}

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Construction-time settings of the Rust emitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitterConfig {
    /// Path of the runtime crate in generated code.
    pub runtime_crate: String,
    /// Parameter type of inferred variables.
    pub opaque_type: String,
    /// Catalog type tokens rewritten to Rust types before use.
    pub type_aliases: BTreeMap<String, String>,
    /// Extra comment lines placed under the generated header.
    pub header: Option<String>,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        let type_aliases = [
            ("bool", "bool"),
            ("float", "f64"),
            ("float64", "f64"),
            ("int", "i64"),
            ("int32", "i32"),
            ("int64", "i64"),
            ("str", "&str"),
            ("string", "&str"),
            ("uint", "u64"),
        ]
        .into_iter()
        .map(|(alias, target)| (alias.to_string(), target.to_string()))
        .collect();
        Self {
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
            opaque_type: DEFAULT_OPAQUE_TYPE.to_string(),
            type_aliases,
            header: None,
        }
    }
}

impl EmitterConfig {
    /// Resolves a catalog type token through the alias table.
    fn resolve_type<'a>(&'a self, token: &'a str) -> &'a str {
        let token = token.trim();
        self.type_aliases.get(token).map_or(token, String::as_str)
    }
}

// ============================================================================
// SECTION: Emitter
// ============================================================================

/// Emitter producing a Rust translator module.
#[derive(Debug, Clone)]
pub struct RustEmitter {
    /// Validated configuration.
    config: EmitterConfig,
}

impl RustEmitter {
    /// Creates an emitter after validating `config`.
    ///
    /// # Errors
    /// Returns [`EmitError`] when the runtime path, the opaque type, or an
    /// alias target cannot be spliced into Rust source.
    pub fn new(config: EmitterConfig) -> Result<Self, EmitError> {
        if !is_module_path(&config.runtime_crate) {
            return Err(EmitError::InvalidRuntimePath(config.runtime_crate));
        }
        check_type("opaque type", &config.opaque_type)?;
        for (alias, target) in &config.type_aliases {
            check_type(&format!("type alias `{alias}`"), target)?;
        }
        Ok(Self {
            config,
        })
    }

    /// Returns the emitter configuration.
    #[must_use]
    pub const fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Renders `ir` as Rust source text.
    ///
    /// # Errors
    /// Returns [`EmitError`] when a type token is invalid, locales disagree on
    /// a variable type, a name is reserved, or a guard cannot be typed.
    pub fn render_source(&self, ir: &TranslationIr) -> Result<String, EmitError> {
        let plan = ModulePlan::new(&self.config, ir)?;
        let mut out = String::new();
        self.write_header(&mut out, ir);
        plan.write_imports(&mut out, &self.config.runtime_crate);
        plan.write_trait(&mut out);
        write_lang(&mut out, ir);
        for translations in &ir.translations {
            plan.write_locale(&mut out, translations)?;
        }
        Ok(out)
    }

    /// Writes the generated-file banner.
    fn write_header(&self, out: &mut String, ir: &TranslationIr) {
        out.push_str("// @generated by i18n-gen. DO NOT EDIT.\n");
        out.push_str("// Package: ");
        out.push_str(&comment_text(&ir.package));
        out.push('\n');
        out.push_str("// Locales: ");
        let tags: Vec<&str> = ir.locales.iter().map(|lang| lang.tag.as_str()).collect();
        if tags.is_empty() {
            out.push_str("(none)");
        }
        out.push_str(&tags.join(", "));
        out.push('\n');
        if let Some(header) = &self.config.header {
            for line in header.lines() {
                out.push_str("// ");
                out.push_str(&comment_text(line));
                out.push('\n');
            }
        }
        out.push('\n');
    }
}

impl Emitter for RustEmitter {
    type Error = EmitError;

    fn render(&self, ir: &TranslationIr) -> Result<Vec<u8>, Self::Error> {
        self.render_source(ir).map(String::into_bytes)
    }
}

/// Rejects `token` unless it looks like a Rust type.
fn check_type(context: &str, token: &str) -> Result<(), EmitError> {
    if is_type_token(token) {
        Ok(())
    } else {
        Err(EmitError::InvalidTypeToken {
            context: context.to_string(),
            token: token.to_string(),
        })
    }
}

// ============================================================================
// SECTION: Planning
// ============================================================================

/// Signature shared by every locale's implementation of one message.
struct MethodPlan {
    /// Message id.
    message_id: String,
    /// Generated function name.
    function: String,
    /// Parameters in variable order.
    params: Vec<ParamPlan>,
    /// Guard spelling (raw name or PascalCase form) to parameter name, for
    /// declared variables only.
    typed_params: BTreeMap<String, String>,
}

/// One generated parameter.
struct ParamPlan {
    /// Parameter identifier.
    ident: String,
    /// Parameter type.
    ty: String,
    /// Template keys the parameter satisfies.
    keys: Vec<String>,
}

/// Locale-independent layout of the generated module.
struct ModulePlan {
    /// Methods in message id order.
    methods: Vec<MethodPlan>,
    /// True when any locale has a conditional template.
    has_guards: bool,
    /// True when locales and messages both exist.
    has_bodies: bool,
}

impl ModulePlan {
    /// Resolves signatures and checks them across locales.
    fn new(config: &EmitterConfig, ir: &TranslationIr) -> Result<Self, EmitError> {
        let Some(reference) = ir.translations.first() else {
            return Ok(Self {
                methods: Vec::new(),
                has_guards: false,
                has_bodies: false,
            });
        };
        let mut methods = Vec::with_capacity(reference.messages.len());
        for (index, message) in reference.messages.iter().enumerate() {
            methods.push(plan_method(config, ir, index, message)?);
        }
        let has_guards = ir.translations.iter().any(|translations| {
            translations.messages.iter().any(|message| !message.conditional_templates.is_empty())
        });
        Ok(Self {
            has_bodies: !methods.is_empty(),
            methods,
            has_guards,
        })
    }

    /// Writes the runtime imports the module needs.
    fn write_imports(&self, out: &mut String, runtime: &str) {
        let mut items = Vec::new();
        if self.has_bodies {
            items.extend(["LocaleLoader", "MessageCatalog", "RenderError", "TemplateArg"]);
        }
        if self.has_guards {
            items.push("render_template");
        }
        for item in &items {
            out.push_str("use ");
            out.push_str(runtime);
            out.push_str("::");
            out.push_str(item);
            out.push_str(";\n");
        }
        if !items.is_empty() {
            out.push('\n');
        }
    }

    /// Writes the `Translator` trait.
    fn write_trait(&self, out: &mut String) {
        out.push_str("/// Typed renderers for every message.\n");
        out.push_str("pub trait Translator: Send + Sync {\n");
        out.push_str("    /// Returns the locale of this translator.\n");
        out.push_str("    fn lang(&self) -> Lang;\n");
        for method in &self.methods {
            out.push('\n');
            out.push_str("    /// Renders message `");
            out.push_str(&comment_text(&method.message_id));
            out.push_str("`.\n");
            out.push_str("    ");
            method.write_signature(out);
            out.push_str(";\n");
        }
        out.push_str("}\n\n");
    }

    /// Writes the catalog, struct, and impl of one locale.
    fn write_locale(&self, out: &mut String, translations: &LocaleTranslations) -> Result<(), EmitError> {
        let lang = &translations.lang;
        let catalog = format!("{}_CATALOG", lang.screaming);
        let translator = format!("{}Translator", lang.ident);
        if self.has_bodies {
            out.push_str("static ");
            out.push_str(&catalog);
            out.push_str(": MessageCatalog = MessageCatalog::new(");
            out.push_str(&rust_string_literal(lang.tag.as_str()));
            out.push_str(", &[\n");
            for message in &translations.messages {
                out.push_str("    (");
                out.push_str(&rust_string_literal(&message.message_id));
                out.push_str(", ");
                out.push_str(&rust_string_literal(&message.template));
                out.push_str("),\n");
            }
            out.push_str("]);\n\n");
        }
        out.push_str("/// Translator for `");
        out.push_str(lang.tag.as_str());
        out.push_str("`.\n");
        out.push_str("#[derive(Debug, Clone, Copy, Default)]\n");
        out.push_str("pub struct ");
        out.push_str(&translator);
        out.push_str(";\n\n");
        out.push_str("impl Translator for ");
        out.push_str(&translator);
        out.push_str(" {\n");
        out.push_str("    fn lang(&self) -> Lang {\n");
        out.push_str("        Lang::");
        out.push_str(&lang.ident);
        out.push_str("\n    }\n");
        if translations.messages.len() != self.methods.len() {
            return Err(EmitError::InconsistentIr(format!(
                "locale `{}` has {} messages, expected {}",
                lang.tag,
                translations.messages.len(),
                self.methods.len()
            )));
        }
        for (method, message) in self.methods.iter().zip(&translations.messages) {
            out.push('\n');
            method.write_body(out, message, &catalog)?;
        }
        out.push_str("}\n\n");
        Ok(())
    }
}

/// Resolves the signature of the message at `index`.
fn plan_method(
    config: &EmitterConfig,
    ir: &TranslationIr,
    index: usize,
    message: &MessageData,
) -> Result<MethodPlan, EmitError> {
    let function = rust_ident(&message.function_name);
    if message.function_name == RESERVED_METHOD {
        return Err(EmitError::ReservedName {
            message_id: message.message_id.clone(),
            name: message.function_name.clone(),
        });
    }
    let mut params = Vec::with_capacity(message.variables.len());
    let mut typed_params = BTreeMap::new();
    for (position, variable) in message.variables.iter().enumerate() {
        let names = variable.names();
        let ident = rust_ident(&names.snake);
        let ty = match variable {
            Variable::Declared {
                ..
            } => {
                typed_params.insert(names.raw.clone(), ident.clone());
                typed_params.insert(names.pascal.clone(), ident.clone());
                agreed_type(config, ir, index, position, message)?
            }
            Variable::Inferred {
                ..
            } => config.opaque_type.clone(),
        };
        let mut keys = vec![names.raw.clone()];
        if matches!(variable, Variable::Declared { .. }) && names.pascal != names.raw {
            keys.push(names.pascal.clone());
        }
        params.push(ParamPlan {
            ident,
            ty,
            keys,
        });
    }
    Ok(MethodPlan {
        message_id: message.message_id.clone(),
        function,
        params,
        typed_params,
    })
}

/// Returns the resolved type of a declared variable, identical in every locale.
fn agreed_type(
    config: &EmitterConfig,
    ir: &TranslationIr,
    index: usize,
    position: usize,
    reference: &MessageData,
) -> Result<String, EmitError> {
    let mut agreed: Option<(&str, String)> = None;
    for translations in &ir.translations {
        let variable = translations
            .messages
            .get(index)
            .and_then(|message| message.variables.get(position))
            .ok_or_else(|| {
                EmitError::InconsistentIr(format!(
                    "message `{}` is misaligned in locale `{}`",
                    reference.message_id, translations.lang.tag
                ))
            })?;
        let token = variable.type_token().ok_or_else(|| {
            EmitError::InconsistentIr(format!(
                "variable `{}` of message `{}` is untyped in locale `{}`",
                variable.names().raw,
                reference.message_id,
                translations.lang.tag
            ))
        })?;
        let resolved = config.resolve_type(token);
        check_type(&format!("variable `{}`", variable.names().raw), resolved)?;
        let locale = translations.lang.tag.as_str();
        match &agreed {
            None => agreed = Some((locale, resolved.to_string())),
            Some((first_locale, first)) if first != resolved => {
                return Err(EmitError::TypeMismatch {
                    message_id: reference.message_id.clone(),
                    variable: variable.names().raw.clone(),
                    first_locale: (*first_locale).to_string(),
                    first: first.clone(),
                    second_locale: locale.to_string(),
                    second: resolved.to_string(),
                });
            }
            Some(_) => {}
        }
    }
    agreed.map(|(_, ty)| ty).ok_or_else(|| {
        EmitError::InconsistentIr(format!("message `{}` has no locales", reference.message_id))
    })
}

impl MethodPlan {
    /// Writes `fn name(&self, ...) -> Result<String, RenderError>`.
    fn write_signature(&self, out: &mut String) {
        out.push_str("fn ");
        out.push_str(&self.function);
        out.push_str("(&self");
        for param in &self.params {
            out.push_str(", ");
            out.push_str(&param.ident);
            out.push_str(": ");
            out.push_str(&param.ty);
        }
        out.push_str(") -> Result<String, RenderError>");
    }

    /// Writes one locale's method body.
    fn write_body(&self, out: &mut String, message: &MessageData, catalog: &str) -> Result<(), EmitError> {
        out.push_str("    ");
        self.write_signature(out);
        out.push_str(" {\n");
        let keyed: Vec<(&str, &str)> = self
            .params
            .iter()
            .flat_map(|param| param.keys.iter().map(|key| (key.as_str(), param.ident.as_str())))
            .collect();
        if keyed.is_empty() {
            out.push_str("        let ");
            out.push_str(ARGS_LOCAL);
            out.push_str(": [TemplateArg<'_>; 0] = [];\n");
        } else {
            out.push_str("        let ");
            out.push_str(ARGS_LOCAL);
            out.push_str(" = [\n");
            for (key, ident) in keyed {
                out.push_str("            TemplateArg::new(");
                out.push_str(&rust_string_literal(key));
                out.push_str(", &");
                out.push_str(ident);
                out.push_str("),\n");
            }
            out.push_str("        ];\n");
        }
        for custom in &message.conditional_templates {
            let condition =
                render_guard(&custom.guard.expr, &self.typed_params, &message.message_id)?;
            out.push_str("        if ");
            out.push_str(&condition);
            out.push_str(" {\n");
            out.push_str("            return render_template(");
            out.push_str(&rust_string_literal(&custom.template));
            out.push_str(", &");
            out.push_str(ARGS_LOCAL);
            out.push_str(");\n");
            out.push_str("        }\n");
        }
        out.push_str("        LocaleLoader::new(&");
        out.push_str(catalog);
        out.push_str(").render_message(");
        out.push_str(&rust_string_literal(&message.message_id));
        out.push_str(", &");
        out.push_str(ARGS_LOCAL);
        out.push_str(")\n");
        out.push_str("    }\n");
        Ok(())
    }
}

// ============================================================================
// SECTION: Language Registry
// ============================================================================

/// Writes the `Lang` enum and the translator registry.
fn write_lang(out: &mut String, ir: &TranslationIr) {
    let count = ir.locales.len();
    out.push_str("/// Locales with generated translators.\n");
    out.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]\n");
    out.push_str("pub enum Lang {\n");
    for lang in &ir.locales {
        out.push_str("    /// `");
        out.push_str(lang.tag.as_str());
        out.push_str("`\n    ");
        out.push_str(&lang.ident);
        out.push_str(",\n");
    }
    out.push_str("}\n\n");

    out.push_str("impl Lang {\n");
    out.push_str("    /// Every locale in canonical tag order.\n");
    out.push_str("    pub const ALL: [Lang; ");
    out.push_str(&count.to_string());
    out.push_str("] = [");
    let variants: Vec<String> = ir.locales.iter().map(|lang| format!("Lang::{}", lang.ident)).collect();
    out.push_str(&variants.join(", "));
    out.push_str("];\n\n");

    out.push_str("    /// Returns the canonical locale tag.\n");
    out.push_str("    #[must_use]\n");
    out.push_str("    pub const fn tag(self) -> &'static str {\n");
    out.push_str("        match self {\n");
    for lang in &ir.locales {
        out.push_str("            Lang::");
        out.push_str(&lang.ident);
        out.push_str(" => ");
        out.push_str(&rust_string_literal(lang.tag.as_str()));
        out.push_str(",\n");
    }
    out.push_str("        }\n    }\n\n");

    out.push_str("    /// Looks up a locale by canonical tag.\n");
    out.push_str("    #[must_use]\n");
    out.push_str("    pub fn from_tag(tag: &str) -> Option<Lang> {\n");
    if ir.locales.is_empty() {
        out.push_str("        let _ = tag;\n        None\n");
    } else {
        out.push_str("        match tag {\n");
        for lang in &ir.locales {
            out.push_str("            ");
            out.push_str(&rust_string_literal(lang.tag.as_str()));
            out.push_str(" => Some(Lang::");
            out.push_str(&lang.ident);
            out.push_str("),\n");
        }
        out.push_str("            _ => None,\n        }\n");
    }
    out.push_str("    }\n}\n\n");

    out.push_str("impl ::std::fmt::Display for Lang {\n");
    out.push_str("    fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {\n");
    out.push_str("        f.write_str(self.tag())\n");
    out.push_str("    }\n}\n\n");

    out.push_str("/// Returns the translator of `lang`.\n");
    out.push_str("#[must_use]\n");
    out.push_str("pub fn translator(lang: Lang) -> &'static dyn Translator {\n");
    out.push_str("    match lang {\n");
    for lang in &ir.locales {
        out.push_str("        Lang::");
        out.push_str(&lang.ident);
        out.push_str(" => &");
        out.push_str(&lang.ident);
        out.push_str("Translator,\n");
    }
    out.push_str("    }\n}\n\n");

    out.push_str("/// Returns every translator keyed by locale.\n");
    out.push_str("#[must_use]\n");
    out.push_str("pub fn translators() -> [(Lang, &'static dyn Translator); ");
    out.push_str(&count.to_string());
    out.push_str("] {\n");
    out.push_str("    Lang::ALL.map(|lang| (lang, translator(lang)))\n");
    out.push_str("}\n\n");
}
