// crates/i18n-gen-core/src/schema.rs
// ============================================================================
// Module: Schema Validation
// Description: Structural comparison of catalog documents across locales.
// Purpose: Guarantee every locale declares the same messages, variables, and
//          conditional-template guards before any code is generated.
// Dependencies: serde_yaml
// ============================================================================

//! ## Overview
//! Each catalog is compared with the first catalog in locale order. Mappings
//! must have the same key sets at every depth; scalar values (template text,
//! type tokens) are free to differ. Conditional templates are compared as a
//! mapping keyed by their guard expression, so every locale must declare the
//! same guards whichever form it uses.
//!
//! The reported path is the first divergence in sorted key order, written as
//! dotted keys from the document root, e.g.
//! `.messages.my_greeting.custom_templates.count == 0`.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde_yaml::Mapping;
use serde_yaml::Value;

use crate::catalog::Catalog;
use crate::error::GenError;

/// Key holding the message table.
const MESSAGES_KEY: &str = "messages";
/// Key holding conditional templates within a message.
const CUSTOM_TEMPLATES_KEY: &str = "custom_templates";

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates every catalog against the first.
///
/// # Errors
/// Returns [`GenError::SchemaMismatch`] naming both files and the first
/// diverging path.
pub fn validate_catalogs(catalogs: &[Catalog]) -> Result<(), GenError> {
    let Some((reference, rest)) = catalogs.split_first() else {
        return Ok(());
    };
    let reference_view = normalize_document(reference.document());
    for other in rest {
        let other_view = normalize_document(other.document());
        if let Some(path) = first_mismatch(&reference_view, &other_view) {
            return Err(GenError::SchemaMismatch {
                first_file: reference.file.clone(),
                first_locale: reference.locale.to_string(),
                second_file: other.file.clone(),
                second_locale: other.locale.to_string(),
                path,
            });
        }
    }
    Ok(())
}

/// Returns the first structural divergence between two documents.
#[must_use]
pub fn first_mismatch(left: &Value, right: &Value) -> Option<String> {
    compare(left, right, "")
}

// ============================================================================
// SECTION: Normalization
// ============================================================================

/// Rewrites list-form `custom_templates` into a mapping keyed by expression.
#[must_use]
pub fn normalize_document(document: &Value) -> Value {
    let mut view = untag(document).clone();
    let messages = view
        .as_mapping_mut()
        .and_then(|root| root.get_mut(MESSAGES_KEY))
        .and_then(Value::as_mapping_mut);
    if let Some(messages) = messages {
        for (_, message) in messages.iter_mut() {
            let Some(message) = message.as_mapping_mut() else {
                continue;
            };
            if let Some(custom) = message.get_mut(CUSTOM_TEMPLATES_KEY) {
                let keyed = match untag(custom) {
                    Value::Sequence(entries) => Some(keyed_by_expression(entries)),
                    _ => None,
                };
                if let Some(keyed) = keyed {
                    *custom = Value::Mapping(keyed);
                }
            }
        }
    }
    view
}

/// Keys list entries by their `expression` field.
fn keyed_by_expression(entries: &[Value]) -> Mapping {
    let mut keyed = Mapping::new();
    for entry in entries {
        if let Some(expression) = entry.get("expression") {
            let template = entry.get("template").cloned().unwrap_or(Value::Null);
            keyed.insert(expression.clone(), template);
        }
    }
    keyed
}

// ============================================================================
// SECTION: Comparison
// ============================================================================

/// Compares two values, returning the first diverging path.
fn compare(left: &Value, right: &Value, path: &str) -> Option<String> {
    match (untag(left), untag(right)) {
        (Value::Mapping(left), Value::Mapping(right)) => compare_mappings(left, right, path),
        (Value::Sequence(_), Value::Sequence(_)) => None,
        (Value::Mapping(_) | Value::Sequence(_), _) | (_, Value::Mapping(_) | Value::Sequence(_)) => {
            Some(path.to_string())
        }
        _ => None,
    }
}

/// Compares mapping key sets in sorted order, recursing into shared keys.
fn compare_mappings(left: &Mapping, right: &Mapping, path: &str) -> Option<String> {
    let left = labeled(left);
    let right = labeled(right);
    let keys: BTreeSet<&String> = left.keys().chain(right.keys()).collect();
    for key in keys {
        let child = format!("{path}.{key}");
        match (left.get(key), right.get(key)) {
            (Some(left), Some(right)) => {
                if let Some(mismatch) = compare(left, right, &child) {
                    return Some(mismatch);
                }
            }
            _ => return Some(child),
        }
    }
    None
}

/// Indexes a mapping by printable key labels.
fn labeled(mapping: &Mapping) -> BTreeMap<String, &Value> {
    mapping.iter().map(|(key, value)| (key_label(key), value)).collect()
}

/// Renders a mapping key for paths.
fn key_label(key: &Value) -> String {
    match untag(key) {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other).map(|text| text.trim().to_string()).unwrap_or_default(),
    }
}

/// Strips YAML tags.
fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}
