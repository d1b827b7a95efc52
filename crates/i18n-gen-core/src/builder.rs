// crates/i18n-gen-core/src/builder.rs
// ============================================================================
// Module: IR Builder
// Description: Resolution of variables, placeholders, and guards into the IR.
// Purpose: Turn a structurally valid catalog set into a consistent IR.
// Dependencies: crate::catalog, crate::template, crate::expression
// ============================================================================

//! ## Overview
//! The builder works message by message. For each message it first settles
//! the variable set, which must be identical in every locale:
//! - Declared variables come from the reference catalog (the schema check
//!   guarantees the other locales declare the same names).
//! - Every placeholder root of every template in every locale resolves to a
//!   declared variable when it equals the declared name or its PascalCase
//!   form. Otherwise it becomes an inferred variable.
//! - Names are compared by folded key; two different spellings of one key are
//!   a collision rather than two variables.
//!
//! Guards are then validated per locale against the settled variable set.
//! A guard identifier follows the placeholder rule: it must be spelled as a
//! variable's raw name or PascalCase form, another spelling of a known key is
//! a collision, and anything else is an unknown variable. Finally the assembled IR is checked
//! for cross-locale consistency.

use std::collections::BTreeMap;

use i18n_gen_runtime::template::is_identifier;

use crate::catalog::Catalog;
use crate::catalog::CatalogSet;
use crate::catalog::Message;
use crate::error::GenError;
use crate::error::TemplateRef;
use crate::expression::GuardError;
use crate::expression::validate_guard;
use crate::ir::ConditionalData;
use crate::ir::Guard;
use crate::ir::LangData;
use crate::ir::LocaleTranslations;
use crate::ir::MessageData;
use crate::ir::TranslationIr;
use crate::ir::Variable;
use crate::naming::IdentError;
use crate::naming::IdentNames;
use crate::naming::fold;
use crate::template::TemplateIssue;
use crate::template::analyze_template;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Builds the IR for `catalogs`, which must already be schema-validated.
///
/// An empty catalog set yields an IR with no locales and no messages.
///
/// # Errors
/// Returns [`GenError`] for invalid or colliding identifiers, malformed
/// templates or guards, unknown guard variables, and internal inconsistencies.
pub fn build_ir(package: &str, catalogs: &CatalogSet) -> Result<TranslationIr, GenError> {
    if !is_identifier(package) {
        return Err(GenError::InvalidIdentifier {
            scope: "package name".to_string(),
            name: package.to_string(),
            reason: "must be an ASCII identifier".to_string(),
        });
    }
    let locales: Vec<LangData> =
        catalogs.iter().map(|catalog| LangData::from_tag(&catalog.locale)).collect();
    let message_ids: Vec<String> = catalogs
        .first()
        .map(|reference| reference.messages.keys().cloned().collect())
        .unwrap_or_default();
    let message_names = resolve_message_names(&message_ids)?;

    let mut translations: Vec<LocaleTranslations> = locales
        .iter()
        .map(|lang| LocaleTranslations {
            lang: lang.clone(),
            messages: Vec::with_capacity(message_ids.len()),
        })
        .collect();
    for (message_id, names) in message_ids.iter().zip(&message_names) {
        let plan = MessagePlan::resolve(message_id, catalogs)?;
        for (catalog, translation) in catalogs.iter().zip(translations.iter_mut()) {
            translation.messages.push(plan.message_data(catalog, names)?);
        }
    }

    let ir = TranslationIr {
        package: package.to_string(),
        locales,
        message_ids,
        translations,
    };
    check_consistency(&ir)?;
    Ok(ir)
}

// ============================================================================
// SECTION: Message Names
// ============================================================================

/// Derives message names and rejects folded collisions.
fn resolve_message_names(message_ids: &[String]) -> Result<Vec<IdentNames>, GenError> {
    let scope = "message ids";
    let mut seen: BTreeMap<String, &str> = BTreeMap::new();
    let mut names = Vec::with_capacity(message_ids.len());
    for id in message_ids {
        let derived = IdentNames::new(id).map_err(|err| invalid_identifier(scope, id, err))?;
        if let Some(existing) = seen.get(&derived.key) {
            return Err(collision(scope, existing, id, &derived.key));
        }
        seen.insert(derived.key.clone(), id);
        names.push(derived);
    }
    Ok(names)
}

// ============================================================================
// SECTION: Message Plans
// ============================================================================

/// Variable slot shared by every locale of a message.
enum Slot {
    /// Declared variable; its type token is read per locale.
    Declared(IdentNames),
    /// Inferred variable.
    Inferred(IdentNames),
}

impl Slot {
    /// Returns the name forms.
    const fn names(&self) -> &IdentNames {
        match self {
            Self::Declared(names) | Self::Inferred(names) => names,
        }
    }
}

/// Locale-independent resolution of one message.
struct MessagePlan<'a> {
    /// Message id.
    message_id: &'a str,
    /// Variables sorted by raw name.
    slots: Vec<Slot>,
}

impl<'a> MessagePlan<'a> {
    /// Settles the variable set of `message_id` across all locales.
    fn resolve(message_id: &'a str, catalogs: &CatalogSet) -> Result<Self, GenError> {
        let scope = format!("message `{message_id}`");
        let mut declared: BTreeMap<String, IdentNames> = BTreeMap::new();
        if let Some(reference) = catalogs.first() {
            for raw in lookup(reference, message_id)?.variables.keys() {
                let names =
                    IdentNames::new(raw).map_err(|err| invalid_identifier(&scope, raw, err))?;
                if let Some(existing) = declared.get(&names.key) {
                    return Err(collision(&scope, &existing.raw, raw, &names.key));
                }
                declared.insert(names.key.clone(), names);
            }
        }

        let mut inferred: BTreeMap<String, IdentNames> = BTreeMap::new();
        for catalog in catalogs {
            let message = lookup(catalog, message_id)?;
            for (template_ref, source) in message.templates() {
                let analysis = analyze_template(source)
                    .map_err(|issue| template_error(issue, catalog, message_id, template_ref))?;
                for root in &analysis.placeholders {
                    resolve_placeholder(root, &declared, &mut inferred, &scope)?;
                }
            }
        }

        let mut slots: Vec<Slot> = declared
            .into_values()
            .map(Slot::Declared)
            .chain(inferred.into_values().map(Slot::Inferred))
            .collect();
        slots.sort_by(|a, b| a.names().raw.cmp(&b.names().raw));
        Ok(Self {
            message_id,
            slots,
        })
    }

    /// Resolves a guard identifier with the same spelling rule as placeholders.
    fn resolve_guard_ident(&self, ident: &str) -> Result<(), GuardError> {
        let exact = self.slots.iter().any(|slot| {
            let names = slot.names();
            names.raw == ident || names.pascal == ident
        });
        if exact {
            return Ok(());
        }
        let folded = fold(ident);
        match self.slots.iter().find(|slot| slot.names().key == folded) {
            Some(slot) => Err(GuardError::Respelled {
                variable: slot.names().raw.clone(),
                identifier: ident.to_string(),
                folded,
            }),
            None => Err(GuardError::UnknownVariable(ident.to_string())),
        }
    }

    /// Produces the message as seen by one locale.
    fn message_data(&self, catalog: &Catalog, names: &IdentNames) -> Result<MessageData, GenError> {
        let message = lookup(catalog, self.message_id)?;
        let mut variables = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            variables.push(match slot {
                Slot::Declared(declared) => Variable::Declared {
                    names: declared.clone(),
                    type_token: message.variables.get(&declared.raw).cloned().ok_or_else(|| {
                        GenError::InternalConsistency(format!(
                            "{}: message `{}` lacks declared variable `{}`",
                            catalog.file, self.message_id, declared.raw
                        ))
                    })?,
                },
                Slot::Inferred(inferred) => Variable::Inferred {
                    names: inferred.clone(),
                },
            });
        }

        let mut conditional_templates = Vec::with_capacity(message.custom_templates.len());
        for custom in &message.custom_templates {
            let expr = validate_guard(&custom.expression, |ident| self.resolve_guard_ident(ident))
                .map_err(|err| guard_error(err, catalog, self.message_id, &custom.expression))?;
            conditional_templates.push(ConditionalData {
                guard: Guard {
                    source: custom.expression.clone(),
                    expr,
                },
                template: custom.template.clone(),
            });
        }

        Ok(MessageData {
            message_id: self.message_id.to_string(),
            method_name: names.pascal.clone(),
            function_name: names.snake.clone(),
            variables,
            template: message.template.clone(),
            conditional_templates,
        })
    }
}

/// Resolves one placeholder root against declared and inferred variables.
fn resolve_placeholder(
    root: &str,
    declared: &BTreeMap<String, IdentNames>,
    inferred: &mut BTreeMap<String, IdentNames>,
    scope: &str,
) -> Result<(), GenError> {
    if declared.values().any(|names| names.raw == root || names.pascal == root) {
        return Ok(());
    }
    let names = IdentNames::new(root).map_err(|err| invalid_identifier(scope, root, err))?;
    if let Some(existing) = declared.get(&names.key) {
        return Err(collision(scope, &existing.raw, root, &names.key));
    }
    match inferred.get(&names.key) {
        Some(existing) if existing.raw != root => {
            Err(collision(scope, &existing.raw, root, &names.key))
        }
        Some(_) => Ok(()),
        None => {
            inferred.insert(names.key.clone(), names);
            Ok(())
        }
    }
}

// ============================================================================
// SECTION: Consistency
// ============================================================================

/// Asserts that every locale agrees on ids, function names, and variables.
fn check_consistency(ir: &TranslationIr) -> Result<(), GenError> {
    if ir.translations.len() != ir.locales.len() {
        return Err(GenError::InternalConsistency(
            "translation count differs from locale count".to_string(),
        ));
    }
    for translation in &ir.translations {
        let ids = translation.messages.iter().map(|message| &message.message_id);
        if !ids.eq(ir.message_ids.iter()) {
            return Err(GenError::InternalConsistency(format!(
                "locale {} does not list the canonical message ids",
                translation.lang.tag
            )));
        }
    }
    let Some((reference, rest)) = ir.translations.split_first() else {
        return Ok(());
    };
    for translation in rest {
        for (expected, actual) in reference.messages.iter().zip(&translation.messages) {
            let same_names = expected
                .variables
                .iter()
                .map(|variable| &variable.names().raw)
                .eq(actual.variables.iter().map(|variable| &variable.names().raw));
            if !same_names || expected.function_name != actual.function_name {
                return Err(GenError::InternalConsistency(format!(
                    "message `{}` differs between {} and {}",
                    expected.message_id, reference.lang.tag, translation.lang.tag
                )));
            }
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns `message_id` from `catalog`, which the schema check guarantees.
fn lookup<'c>(catalog: &'c Catalog, message_id: &str) -> Result<&'c Message, GenError> {
    catalog.messages.get(message_id).ok_or_else(|| {
        GenError::InternalConsistency(format!("{} lacks message `{message_id}`", catalog.file))
    })
}

/// Builds an invalid identifier error.
fn invalid_identifier(scope: &str, name: &str, err: IdentError) -> GenError {
    GenError::InvalidIdentifier {
        scope: scope.to_string(),
        name: name.to_string(),
        reason: err.reason().to_string(),
    }
}

/// Builds an identifier collision error.
fn collision(scope: &str, first: &str, second: &str, folded: &str) -> GenError {
    GenError::IdentifierCollision {
        scope: scope.to_string(),
        first: first.to_string(),
        second: second.to_string(),
        folded: folded.to_string(),
    }
}

/// Maps a template issue to a located error.
fn template_error(
    issue: TemplateIssue,
    catalog: &Catalog,
    message_id: &str,
    template: TemplateRef,
) -> GenError {
    let locale = catalog.locale.to_string();
    let message_id = message_id.to_string();
    match issue {
        TemplateIssue::Syntax(err) => GenError::TemplateSyntax {
            locale,
            message_id,
            template,
            detail: err.to_string(),
        },
        TemplateIssue::Suspicious {
            snippet,
        } => GenError::SuspiciousSyntax {
            locale,
            message_id,
            template,
            snippet,
        },
    }
}

/// Maps a guard failure to a located error.
fn guard_error(err: GuardError, catalog: &Catalog, message_id: &str, expression: &str) -> GenError {
    let locale = catalog.locale.to_string();
    let message_id = message_id.to_string();
    let expression = expression.to_string();
    match err {
        GuardError::Syntax(err) => GenError::ExpressionSyntax {
            locale,
            message_id,
            expression,
            detail: err.to_string(),
        },
        GuardError::UnknownVariable(identifier) => GenError::UnknownVariable {
            locale,
            message_id,
            expression,
            identifier,
        },
        GuardError::Respelled {
            variable,
            identifier,
            folded,
        } => GenError::IdentifierCollision {
            scope: format!("guard `{expression}` in {locale}/{message_id}"),
            first: variable,
            second: identifier,
            folded,
        },
    }
}
