// crates/i18n-gen-core/tests/template.rs
// ============================================================================
// Module: Template Analysis Tests
// Description: Placeholder extraction and malformed-template detection.
// Purpose: Ensure templates accepted at generation time are unambiguous.
// Dependencies: i18n-gen-core, i18n-gen-runtime
// ============================================================================

//! Template analysis tests.

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

use i18n_gen_core::template::TemplateIssue;
use i18n_gen_core::template::analyze_template;
use i18n_gen_core::template::find_suspicious;
use i18n_gen_runtime::template::TemplateError;

#[test]
fn placeholders_are_unique_in_first_appearance_order() {
    let analysis =
        analyze_template("{{ .Name }} sent {{.Count}} notes to {{ .Name }} and {{ .Other }}")
            .unwrap();
    assert_eq!(analysis.placeholders, vec!["Name", "Count", "Other"]);
}

#[test]
fn template_without_placeholders_has_none() {
    let analysis = analyze_template("No variables here").unwrap();
    assert!(analysis.placeholders.is_empty());
}

#[test]
fn nested_paths_are_a_syntax_issue() {
    let issue = analyze_template("Hi {{ .Name }}, {{ .User.Name }}").unwrap_err();
    assert_eq!(
        issue,
        TemplateIssue::Syntax(TemplateError::InvalidAction {
            action: ".User.Name".to_string(),
            position: 16,
        })
    );
}

#[test]
fn unterminated_action_is_a_syntax_issue() {
    let issue = analyze_template("Hello {{ .Name").unwrap_err();
    assert_eq!(
        issue,
        TemplateIssue::Syntax(TemplateError::Unterminated {
            position: 6
        })
    );
}

#[test]
fn non_path_action_is_a_syntax_issue() {
    let issue = analyze_template("{{ if .Ok }}yes{{ end }}").unwrap_err();
    assert!(matches!(issue, TemplateIssue::Syntax(TemplateError::InvalidAction { .. })));
}

#[test]
fn broken_opening_delimiters_are_suspicious() {
    for (template, snippet) in [
        ("Hello { .Name }}!", "{ .Name }}"),
        ("Hello {.Name}}!", "{.Name}}"),
        ("Hello {Name}} and more", "{Name}}"),
        ("Hello {   .Name}}", "{   .Name}}"),
    ] {
        let issue = analyze_template(template).unwrap_err();
        assert_eq!(
            issue,
            TemplateIssue::Suspicious {
                snippet: snippet.to_string()
            },
            "template {template}"
        );
    }
}

#[test]
fn single_braces_without_double_close_are_fine() {
    assert_eq!(find_suspicious("a {b} c"), None);
    assert_eq!(find_suspicious("{ }}"), None);
    assert_eq!(find_suspicious("json: {\"a\": 1}"), None);
    analyze_template("Set {x} to {{ .Value }}").unwrap();
}

#[test]
fn suspicious_scan_ignores_real_placeholders() {
    assert!(analyze_template("{{ .A }}{{ .B }}").is_ok());
    assert_eq!(find_suspicious("}} {"), None);
}
