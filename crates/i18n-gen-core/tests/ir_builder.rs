// crates/i18n-gen-core/tests/ir_builder.rs
// ============================================================================
// Module: IR Builder Tests
// Description: Variable resolution, guard validation, and IR consistency.
// Purpose: Ensure validated catalogs produce the expected IR and invalid
//          catalogs fail with the right error kind.
// Dependencies: i18n-gen-core
// ============================================================================

//! ## Overview
//! Builds IRs from in-memory catalogs:
//! - Declared and inferred variables are merged and sorted identically for
//!   every locale.
//! - Spelling collisions, unknown guard variables, and malformed templates or
//!   guards fail with located errors.

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

// ============================================================================
// SECTION: Imports
// ============================================================================

use i18n_gen_core::CatalogSet;
use i18n_gen_core::GenError;
use i18n_gen_core::TranslationIr;
use i18n_gen_core::build_ir;
use i18n_gen_core::catalog::Catalog;
use i18n_gen_core::error::TemplateRef;
use i18n_gen_core::ir::Variable;
use i18n_gen_core::locale::LocaleTag;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

const EN: &str = r#"
messages:
  my_greeting:
    template: "Hello {{ .Name }}! You have {{ .Count }} messages."
    variables:
      count: int
    custom_templates:
      - expression: "count == 0"
        template: "Hello {{ .Name }}! You have no messages."
      - expression: "count == 1"
        template: "Hello {{ .Name }}! You have one message."
  farewell:
    template: "Goodbye."
"#;

const ES: &str = r#"
messages:
  my_greeting:
    template: "Hola {{ .Name }}! Tienes {{ .Count }} mensajes."
    variables:
      count: i64
    custom_templates:
      "count == 1": "Hola {{ .Name }}! Tienes un mensaje."
      "count == 0": "Hola {{ .Name }}! No tienes mensajes."
  farewell:
    template: "Adiós, {{ .Name }}."
"#;

/// Parses `source` as the catalog for `tag`.
fn catalog(tag: &str, source: &str) -> Catalog {
    Catalog::parse(&format!("{tag}.i18n.yaml"), LocaleTag::parse(tag).unwrap(), source).unwrap()
}

/// Builds the IR of the given `(tag, source)` catalogs.
fn build(sources: &[(&str, &str)]) -> Result<TranslationIr, GenError> {
    let catalogs = sources.iter().map(|(tag, source)| catalog(tag, source)).collect();
    let set = CatalogSet::new(catalogs).unwrap();
    set.validate_schema().unwrap();
    build_ir("translation", &set)
}

/// Builds a single-locale IR with one message `msg`.
fn build_one(message_yaml: &str) -> Result<TranslationIr, GenError> {
    let source = format!("messages:\n  msg:\n{message_yaml}");
    build(&[("en", source.as_str())])
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn greeting_scenario_produces_consistent_ir() {
    let ir = build(&[("es", ES), ("en", EN)]).unwrap();

    assert_eq!(ir.package, "translation");
    let tags: Vec<&str> = ir.locales.iter().map(|lang| lang.tag.as_str()).collect();
    assert_eq!(tags, vec!["en", "es"]);
    assert_eq!(ir.message_ids, vec!["farewell", "my_greeting"]);

    let en = ir.locale("en").unwrap().message("my_greeting").unwrap();
    assert_eq!(en.method_name, "MyGreeting");
    assert_eq!(en.function_name, "my_greeting");
    let names: Vec<&str> = en.variables.iter().map(|variable| variable.names().raw.as_str()).collect();
    assert_eq!(names, vec!["Name", "count"]);
    assert_eq!(en.variables[1].type_token(), Some("int"));
    assert_eq!(en.variables[0].type_token(), None);
    let guards: Vec<&str> =
        en.conditional_templates.iter().map(|custom| custom.guard.source.as_str()).collect();
    assert_eq!(guards, vec!["count == 0", "count == 1"]);

    let es = ir.locale("es").unwrap().message("my_greeting").unwrap();
    assert_eq!(es.variables[1].type_token(), Some("i64"));
    let guards: Vec<&str> =
        es.conditional_templates.iter().map(|custom| custom.guard.source.as_str()).collect();
    assert_eq!(guards, vec!["count == 1", "count == 0"]);
}

#[test]
fn placeholders_in_one_locale_become_variables_everywhere() {
    let ir = build(&[("en", EN), ("es", ES)]).unwrap();
    for translation in &ir.translations {
        let farewell = translation.message("farewell").unwrap();
        assert_eq!(farewell.variables.len(), 1);
        assert!(matches!(&farewell.variables[0], Variable::Inferred { names } if names.raw == "Name"));
    }
}

#[test]
fn ir_serializes_to_json() {
    let ir = build(&[("en", EN)]).unwrap();
    let json: serde_json::Value = serde_json::from_str(&ir.to_json().unwrap()).unwrap();
    assert_eq!(json["locales"][0]["tag"], "en");
    assert_eq!(json["translations"][0]["messages"][1]["variables"][1]["kind"], "declared");
}

#[test]
fn empty_catalog_set_builds_empty_ir() {
    let ir = build_ir("translation", &CatalogSet::default()).unwrap();
    assert!(ir.locales.is_empty());
    assert!(ir.message_ids.is_empty());
    assert!(ir.translations.is_empty());
}

#[test]
fn package_must_be_an_identifier() {
    let err = build_ir("my-pkg", &CatalogSet::default()).unwrap_err();
    assert_eq!(err.kind(), "invalid_identifier");
}

#[test]
fn message_ids_that_fold_together_collide() {
    let err = build(&[(
        "en",
        "messages:\n  greeting_one:\n    template: a\n  greetingOne:\n    template: b\n",
    )])
    .unwrap_err();
    assert_eq!(
        err,
        GenError::IdentifierCollision {
            scope: "message ids".to_string(),
            first: "greetingOne".to_string(),
            second: "greeting_one".to_string(),
            folded: "greeting_one".to_string(),
        }
    );
}

#[test]
fn message_id_with_leading_digit_is_invalid() {
    let err = build(&[("en", "messages:\n  2fa_prompt:\n    template: a\n")]).unwrap_err();
    assert_eq!(err.kind(), "invalid_identifier");
}

#[test]
fn declared_variables_that_fold_together_collide() {
    let err = build_one("    template: x\n    variables:\n      userName: str\n      user_name: str\n")
        .unwrap_err();
    assert_eq!(err.kind(), "identifier_collision");
}

#[test]
fn placeholder_spelling_must_match_declaration() {
    let err = build_one("    template: \"{{ .userName }}\"\n    variables:\n      user_name: str\n")
        .unwrap_err();
    assert_eq!(
        err,
        GenError::IdentifierCollision {
            scope: "message `msg`".to_string(),
            first: "user_name".to_string(),
            second: "userName".to_string(),
            folded: "user_name".to_string(),
        }
    );
}

#[test]
fn declared_name_and_pascal_form_both_resolve() {
    let ir = build_one(
        "    template: \"{{ .user_name }} / {{ .UserName }}\"\n    variables:\n      user_name: str\n",
    )
    .unwrap();
    let message = &ir.translations[0].messages[0];
    assert_eq!(message.variables.len(), 1);
    assert_eq!(message.variables[0].type_token(), Some("str"));
}

#[test]
fn inferred_spellings_must_agree_across_locales() {
    let err = build(&[
        ("en", "messages:\n  msg:\n    template: \"{{ .user_name }}\"\n"),
        ("fr", "messages:\n  msg:\n    template: \"{{ .UserName }}\"\n"),
    ])
    .unwrap_err();
    assert_eq!(err.kind(), "identifier_collision");
}

#[test]
fn guards_may_reference_inferred_variables_by_placeholder_spelling() {
    let ir = build_one(
        "    template: \"{{ .Name }}\"\n    custom_templates:\n      - expression: 'Name == \"Bob\"'\n        template: Hey Bob\n",
    )
    .unwrap();
    assert_eq!(ir.translations[0].messages[0].conditional_templates.len(), 1);
}

#[test]
fn guards_may_use_raw_or_pascal_spelling_of_declared_variables() {
    for guard in ["user_name > 1", "UserName > 1"] {
        let source = format!(
            "    template: x\n    variables:\n      user_name: int\n    custom_templates:\n      - expression: {guard}\n        template: y\n"
        );
        assert!(build_one(&source).is_ok(), "{guard}");
    }
}

#[test]
fn respelled_guard_identifier_is_a_collision() {
    let err = build_one(
        "    template: x\n    variables:\n      user_name: int\n    custom_templates:\n      - expression: userName > 1\n        template: y\n",
    )
    .unwrap_err();
    assert_eq!(
        err,
        GenError::IdentifierCollision {
            scope: "guard `userName > 1` in en/msg".to_string(),
            first: "user_name".to_string(),
            second: "userName".to_string(),
            folded: "user_name".to_string(),
        }
    );
}

#[test]
fn guard_spelling_differing_only_in_case_or_underscores_is_a_collision() {
    let err = build_one(
        "    template: x\n    variables:\n      count: int\n    custom_templates:\n      - expression: COUNT__ == 1\n        template: y\n",
    )
    .unwrap_err();
    assert_eq!(err.kind(), "identifier_collision");

    let err = build_one(
        "    template: \"{{ .Name }}\"\n    custom_templates:\n      - expression: 'name == \"Bob\"'\n        template: Hey Bob\n",
    )
    .unwrap_err();
    assert_eq!(err.kind(), "identifier_collision");
}

#[test]
fn nested_placeholder_paths_are_rejected_at_build_time() {
    let err = build_one("    template: \"Hi {{ .User.Name }}\"\n").unwrap_err();
    assert_eq!(err.kind(), "template_syntax");
    assert!(err.to_string().contains(".User.Name"), "{err}");
}

#[test]
fn unknown_guard_variable_is_reported() {
    let err = build_one(
        "    template: x\n    variables:\n      count: int\n    custom_templates:\n      - expression: total > 1\n        template: y\n",
    )
    .unwrap_err();
    assert_eq!(
        err,
        GenError::UnknownVariable {
            locale: "en".to_string(),
            message_id: "msg".to_string(),
            expression: "total > 1".to_string(),
            identifier: "total".to_string(),
        }
    );
}

#[test]
fn malformed_guard_is_an_expression_error() {
    let err = build_one(
        "    template: x\n    variables:\n      count: int\n    custom_templates:\n      - expression: count !@ 0\n        template: y\n",
    )
    .unwrap_err();
    assert_eq!(err.kind(), "expression_syntax");
}

#[test]
fn malformed_conditional_template_names_its_guard() {
    let err = build_one(
        "    template: x\n    variables:\n      count: int\n    custom_templates:\n      - expression: count == 0\n        template: \"{{ .Count\"\n",
    )
    .unwrap_err();
    match err {
        GenError::TemplateSyntax {
            template,
            ..
        } => assert_eq!(
            template,
            TemplateRef::Conditional {
                index: 0,
                expression: "count == 0".to_string()
            }
        ),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn suspicious_default_template_is_rejected() {
    let err = build_one("    template: \"Hello { .Name }}\"\n").unwrap_err();
    assert_eq!(
        err,
        GenError::SuspiciousSyntax {
            locale: "en".to_string(),
            message_id: "msg".to_string(),
            template: TemplateRef::Default,
            snippet: "{ .Name }}".to_string(),
        }
    );
}
