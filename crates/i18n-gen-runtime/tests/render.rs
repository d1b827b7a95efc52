// crates/i18n-gen-runtime/tests/render.rs
// ============================================================================
// Module: Runtime Rendering Tests
// Description: Integration tests for template rendering and catalog dispatch.
// Purpose: Validate substitution, error reporting, and loader lookups.
// Dependencies: i18n-gen-runtime
// ============================================================================

//! ## Overview
//! Exercises the runtime helpers generated translators call into:
//! - Placeholder substitution through `Display`.
//! - Missing arguments and nested paths fail instead of rendering blanks.
//! - Locale loaders resolve default templates by message id.

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

use i18n_gen_runtime::LocaleLoader;
use i18n_gen_runtime::MessageCatalog;
use i18n_gen_runtime::RenderError;
use i18n_gen_runtime::TemplateArg;
use i18n_gen_runtime::render_template;
use i18n_gen_runtime::template::TemplateError;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

static ES: MessageCatalog = MessageCatalog::new(
    "es",
    &[
        ("farewell", "Adiós, {{ .Name }}."),
        ("my_greeting", "Hola {{ .Name }}! Tienes {{ .Count }} mensajes."),
    ],
);

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn render_substitutes_every_placeholder() {
    let count = 3_i64;
    let name = "Luis";
    let args = [TemplateArg::new("Count", &count), TemplateArg::new("Name", &name)];
    let text = render_template("{{ .Name }} has {{.Count}} items, {{ .Name }}.", &args).unwrap();
    assert_eq!(text, "Luis has 3 items, Luis.");
}

#[test]
fn render_without_placeholders_is_identity() {
    let text = render_template("No variables here", &[]).unwrap();
    assert_eq!(text, "No variables here");
}

#[test]
fn render_reports_missing_argument() {
    let err = render_template("Hi {{ .Name }}", &[]).unwrap_err();
    assert_eq!(
        err,
        RenderError::MissingArgument {
            key: "Name".to_string()
        }
    );
}

#[test]
fn render_rejects_nested_paths() {
    let user = "x";
    let err = render_template("{{ .User.Name }}", &[TemplateArg::new("User", &user)]).unwrap_err();
    assert_eq!(
        err,
        RenderError::NestedPath {
            path: "User.Name".to_string()
        }
    );
}

#[test]
fn render_surfaces_template_errors() {
    let err = render_template("{{ .Name ", &[]).unwrap_err();
    assert_eq!(
        err,
        RenderError::Template(TemplateError::Unterminated {
            position: 0
        })
    );
}

#[test]
fn loader_renders_default_template_by_id() {
    let loader = LocaleLoader::new(&ES);
    let count = 10_u32;
    let name = String::from("Luis");
    let args = [TemplateArg::new("Count", &count), TemplateArg::new("Name", &name)];
    assert_eq!(loader.locale(), "es");
    assert_eq!(
        loader.render_message("my_greeting", &args).unwrap(),
        "Hola Luis! Tienes 10 mensajes."
    );
}

#[test]
fn loader_reports_unknown_message() {
    let loader = LocaleLoader::new(&ES);
    let err = loader.render_message("missing", &[]).unwrap_err();
    assert_eq!(
        err,
        RenderError::UnknownMessage {
            locale: "es".to_string(),
            id: "missing".to_string()
        }
    );
}

#[test]
fn catalog_lists_ids_in_declaration_order() {
    let ids: Vec<&str> = ES.ids().collect();
    assert_eq!(ids, vec!["farewell", "my_greeting"]);
    assert_eq!(ES.template("farewell"), Some("Adiós, {{ .Name }}."));
    assert_eq!(ES.template("nope"), None);
}
