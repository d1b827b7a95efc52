// crates/i18n-gen-core/tests/schema.rs
// ============================================================================
// Module: Schema Validation Tests
// Description: Cross-locale structural comparison of catalogs.
// Purpose: Ensure divergences are found and reported at a precise path.
// Dependencies: i18n-gen-core, serde_yaml
// ============================================================================

//! ## Overview
//! Compares in-memory catalogs. Scalars may differ between locales; key sets
//! and guard expressions may not.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use i18n_gen_core::CatalogSet;
use i18n_gen_core::GenError;
use i18n_gen_core::catalog::Catalog;
use i18n_gen_core::locale::LocaleTag;
use i18n_gen_core::schema::first_mismatch;
use i18n_gen_core::schema::normalize_document;
use serde_yaml::Value;

/// Parses `source` as the catalog `<tag>.i18n.yaml`.
fn catalog(tag: &str, source: &str) -> Catalog {
    let locale = LocaleTag::parse(tag).unwrap();
    Catalog::parse(&format!("data/{tag}.i18n.yaml"), locale, source).unwrap()
}

/// Validates the structure of the given catalogs as one set.
fn validate(catalogs: Vec<Catalog>) -> Result<(), GenError> {
    CatalogSet::new(catalogs).unwrap().validate_schema()
}

#[test]
fn diverging_guards_are_reported_at_the_first_sorted_path() {
    let en = catalog(
        "en",
        r#"
messages:
  my_greeting:
    template: "Hello"
    variables:
      count: int
    custom_templates:
      - expression: "count == 0"
        template: "none"
"#,
    );
    let es = catalog(
        "es",
        r#"
messages:
  my_greeting:
    template: "Hola"
    variables:
      count: int
    custom_templates:
      - expression: "count == 10000"
        template: "muchos"
"#,
    );

    let err = validate(vec![es, en]).unwrap_err();
    assert_eq!(
        err,
        GenError::SchemaMismatch {
            first_file: "data/en.i18n.yaml".to_string(),
            first_locale: "en".to_string(),
            second_file: "data/es.i18n.yaml".to_string(),
            second_locale: "es".to_string(),
            path: ".messages.my_greeting.custom_templates.count == 0".to_string(),
        }
    );
    assert_eq!(
        err.to_string(),
        "structure mismatch between translation files `data/en.i18n.yaml` and \
         `data/es.i18n.yaml` at .messages.my_greeting.custom_templates.count == 0"
    );
}

#[test]
fn template_text_and_type_tokens_may_differ() {
    let en = catalog("en", "messages:\n  hi:\n    template: Hi\n    variables:\n      n: int\n");
    let de = catalog("de", "messages:\n  hi:\n    template: Hallo\n    variables:\n      n: u64\n");
    validate(vec![en, de]).unwrap();
}

#[test]
fn list_and_mapping_guard_forms_compare_equal() {
    let en = catalog(
        "en",
        "messages:\n  hi:\n    template: Hi\n    custom_templates:\n      - expression: a\n        \
         template: x\n",
    );
    let fr = catalog("fr", "messages:\n  hi:\n    template: Salut\n    custom_templates:\n      a: y\n");
    validate(vec![en, fr]).unwrap();
}

#[test]
fn missing_variables_section_is_a_mismatch() {
    let en = catalog("en", "messages:\n  hi:\n    template: Hi\n    variables:\n      name: str\n");
    let it = catalog("it", "messages:\n  hi:\n    template: Ciao\n");

    let err = validate(vec![en, it]).unwrap_err();
    assert!(matches!(err, GenError::SchemaMismatch { ref path, .. } if path == ".messages.hi.variables"));
}

#[test]
fn extra_message_in_later_locale_is_a_mismatch() {
    let en = catalog("en", "messages:\n  hi:\n    template: Hi\n");
    let nl = catalog("nl", "messages:\n  bye:\n    template: Dag\n  hi:\n    template: Hoi\n");

    let err = validate(vec![en, nl]).unwrap_err();
    assert!(matches!(err, GenError::SchemaMismatch { ref path, .. } if path == ".messages.bye"));
}

#[test]
fn free_form_lists_may_differ_in_length_and_content() {
    let en = catalog("en", "messages:\n  hi:\n    template: Hi\n    notes: [formal, short]\n");
    let pt = catalog("pt", "messages:\n  hi:\n    template: Oi\n    notes:\n      - informal\n");
    let ja = catalog("ja", "messages:\n  hi:\n    template: Konnichiwa\n    notes: []\n");
    validate(vec![en, pt, ja]).unwrap();
}

#[test]
fn list_against_scalar_is_a_mismatch() {
    let en = catalog("en", "messages:\n  hi:\n    template: Hi\n    notes: [formal]\n");
    let sv = catalog("sv", "messages:\n  hi:\n    template: Hej\n    notes: formal\n");

    let err = validate(vec![en, sv]).unwrap_err();
    assert!(
        matches!(err, GenError::SchemaMismatch { ref path, .. } if path == ".messages.hi.notes"),
        "{err}"
    );
}

#[test]
fn scalar_against_mapping_is_a_mismatch() {
    let left: Value = serde_yaml::from_str("a:\n  b: 1\n").unwrap();
    let right: Value = serde_yaml::from_str("a: 1\n").unwrap();
    assert_eq!(first_mismatch(&left, &right), Some(".a".to_string()));
    assert_eq!(first_mismatch(&left, &left), None);
}

#[test]
fn normalization_keys_guards_by_expression() {
    let document: Value = serde_yaml::from_str(
        "messages:\n  hi:\n    template: Hi\n    custom_templates:\n      - expression: n > 1\n        \
         template: many\n",
    )
    .unwrap();
    let expected: Value =
        serde_yaml::from_str("messages:\n  hi:\n    template: Hi\n    custom_templates:\n      n > 1: many\n")
            .unwrap();
    assert_eq!(normalize_document(&document), expected);
}

#[test]
fn single_catalog_always_validates() {
    validate(vec![catalog("en", "messages: {}\n")]).unwrap();
    validate(Vec::new()).unwrap();
}
