// crates/i18n-gen-core/tests/expression.rs
// ============================================================================
// Module: Guard Expression Tests
// Description: Parsing, precedence, limits, and identifier validation.
// Purpose: Ensure guards parse to the expected AST and reject bad input.
// Dependencies: i18n-gen-core
// ============================================================================

//! Guard expression parser tests.

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

use i18n_gen_core::expression::BinaryOp;
use i18n_gen_core::expression::Expr;
use i18n_gen_core::expression::ExprError;
use i18n_gen_core::expression::GuardError;
use i18n_gen_core::expression::MAX_EXPRESSION_NESTING;
use i18n_gen_core::expression::parse_expression;
use i18n_gen_core::expression::validate_guard;

fn ident(name: &str) -> Box<Expr> {
    Box::new(Expr::Ident(name.to_string()))
}

fn int(value: i64) -> Box<Expr> {
    Box::new(Expr::Int(value))
}

#[test]
fn comparison_parses_to_binary_node() {
    assert_eq!(
        parse_expression("count == 0").unwrap(),
        Expr::Binary {
            op: BinaryOp::Eq,
            lhs: ident("count"),
            rhs: int(0),
        }
    );
}

#[test]
fn and_binds_tighter_than_or() {
    let expr = parse_expression("a || b && c").unwrap();
    let Expr::Binary {
        op: BinaryOp::Or,
        rhs,
        ..
    } = expr
    else {
        panic!("expected top-level or");
    };
    assert!(matches!(*rhs, Expr::Binary { op: BinaryOp::And, .. }));
}

#[test]
fn parentheses_override_precedence() {
    let expr = parse_expression("(a || b) && c").unwrap();
    assert!(matches!(expr, Expr::Binary { op: BinaryOp::And, .. }));
}

#[test]
fn negation_binds_tighter_than_comparison() {
    assert_eq!(
        parse_expression("!a == b").unwrap(),
        Expr::Binary {
            op: BinaryOp::Eq,
            lhs: Box::new(Expr::Not(ident("a"))),
            rhs: ident("b"),
        }
    );
}

#[test]
fn literals_parse() {
    assert_eq!(
        parse_expression("n >= -5").unwrap(),
        Expr::Binary {
            op: BinaryOp::Ge,
            lhs: ident("n"),
            rhs: int(-5),
        }
    );
    assert_eq!(
        parse_expression(r#"name != "a\"b\n""#).unwrap(),
        Expr::Binary {
            op: BinaryOp::Ne,
            lhs: ident("name"),
            rhs: Box::new(Expr::Str("a\"b\n".to_string())),
        }
    );
    assert_eq!(parse_expression("!false").unwrap(), Expr::Not(Box::new(Expr::Bool(false))));
    assert_eq!(
        parse_expression("age > 18 && count != 0").unwrap().identifiers(),
        vec!["age", "count"]
    );
}

#[test]
fn malformed_guards_are_rejected() {
    assert!(matches!(
        parse_expression("count !@ 0"),
        Err(ExprError::UnexpectedToken { position: 7, .. })
    ));
    assert!(matches!(
        parse_expression("invalid-expression("),
        Err(ExprError::TrailingInput { position: 7 })
    ));
    assert!(matches!(parse_expression("a = 1"), Err(ExprError::UnexpectedToken { .. })));
    assert!(matches!(parse_expression("a & b"), Err(ExprError::UnexpectedToken { .. })));
    assert!(matches!(parse_expression("(a"), Err(ExprError::UnexpectedToken { .. })));
    assert_eq!(parse_expression("   "), Err(ExprError::EmptyInput));
}

#[test]
fn comparisons_do_not_chain() {
    assert!(matches!(
        parse_expression("a < b < c"),
        Err(ExprError::UnexpectedToken { position: 6, .. })
    ));
}

#[test]
fn string_errors_are_positioned() {
    assert_eq!(
        parse_expression("name == \"abc"),
        Err(ExprError::UnterminatedString {
            position: 8
        })
    );
    assert_eq!(
        parse_expression(r#"name == "\q""#),
        Err(ExprError::InvalidEscape {
            escape: 'q',
            position: 9
        })
    );
}

#[test]
fn integer_overflow_is_rejected() {
    assert!(matches!(
        parse_expression("n == 99999999999999999999"),
        Err(ExprError::InvalidNumber { .. })
    ));
    assert_eq!(
        parse_expression("n == -9223372036854775808").unwrap().identifiers(),
        vec!["n"]
    );
}

#[test]
fn nesting_is_bounded() {
    let deep = format!("{}a{}", "(".repeat(MAX_EXPRESSION_NESTING + 1), ")".repeat(MAX_EXPRESSION_NESTING + 1));
    assert!(matches!(parse_expression(&deep), Err(ExprError::NestingTooDeep { .. })));

    let ok = format!("{}a{}", "(".repeat(MAX_EXPRESSION_NESTING), ")".repeat(MAX_EXPRESSION_NESTING));
    parse_expression(&ok).unwrap();

    let negations = format!("{}a", "!".repeat(MAX_EXPRESSION_NESTING + 1));
    assert!(matches!(parse_expression(&negations), Err(ExprError::NestingTooDeep { .. })));
}

#[test]
fn oversized_input_is_rejected() {
    let long = format!("a == {}", "1".repeat(5000));
    assert!(matches!(parse_expression(&long), Err(ExprError::InputTooLarge { .. })));
}

#[test]
fn guard_validation_reports_first_unknown_identifier() {
    let known = |name: &str| {
        if name == "count" { Ok(()) } else { Err(GuardError::UnknownVariable(name.to_string())) }
    };
    assert!(validate_guard("count > 1", known).is_ok());
    assert_eq!(
        validate_guard("count > 1 && total < 2 && other", known),
        Err(GuardError::UnknownVariable("total".to_string()))
    );
    assert!(matches!(validate_guard("count >", known), Err(GuardError::Syntax(_))));
}
