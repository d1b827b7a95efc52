// crates/i18n-gen-emit/src/guard.rs
// ============================================================================
// Module: Guard Rendering
// Description: Prints guard ASTs as Rust boolean expressions.
// Purpose: Turn conditional-template guards into `if` conditions.
// Dependencies: i18n-gen-core
// ============================================================================

//! ## Overview
//! Guards print with the fewest parentheses Rust needs. Operator precedence
//! matches Rust (`||` < `&&` < comparisons < `!`), comparisons never chain,
//! and identifiers are replaced by the parameter bound to their spelling.
//! The IR builder has already rejected spellings other than a variable's raw
//! name or PascalCase form, so lookups are exact.

use std::collections::BTreeMap;

use i18n_gen_core::expression::BinaryOp;
use i18n_gen_core::expression::Expr;

use crate::EmitError;
use crate::syntax::rust_string_literal;

/// Renders `expr`, mapping identifiers through `params` (spelling to typed parameter).
pub fn render_guard(
    expr: &Expr,
    params: &BTreeMap<String, String>,
    message_id: &str,
) -> Result<String, EmitError> {
    let mut out = String::new();
    write_expr(&mut out, expr, params, message_id)?;
    Ok(out)
}

/// Appends `expr` to `out`.
fn write_expr(
    out: &mut String,
    expr: &Expr,
    params: &BTreeMap<String, String>,
    message_id: &str,
) -> Result<(), EmitError> {
    match expr {
        Expr::Ident(name) => {
            let param = params.get(name).ok_or_else(|| EmitError::UntypedGuardVariable {
                message_id: message_id.to_string(),
                identifier: name.clone(),
            })?;
            out.push_str(param);
        }
        Expr::Int(value) => out.push_str(&value.to_string()),
        Expr::Str(value) => out.push_str(&rust_string_literal(value)),
        Expr::Bool(value) => out.push_str(if *value { "true" } else { "false" }),
        Expr::Not(inner) => {
            out.push('!');
            write_operand(out, inner, matches!(**inner, Expr::Binary { .. }), params, message_id)?;
        }
        Expr::Binary {
            op,
            lhs,
            rhs,
        } => {
            let parent = op.precedence();
            let chains = is_comparison(*op);
            let lhs_parens = child_precedence(lhs).is_some_and(|child| child < parent || (child == parent && chains));
            let rhs_parens = child_precedence(rhs).is_some_and(|child| child <= parent);
            write_operand(out, lhs, lhs_parens, params, message_id)?;
            out.push(' ');
            out.push_str(op.as_str());
            out.push(' ');
            write_operand(out, rhs, rhs_parens, params, message_id)?;
        }
    }
    Ok(())
}

/// Appends an operand, parenthesized when `parens` is set.
fn write_operand(
    out: &mut String,
    expr: &Expr,
    parens: bool,
    params: &BTreeMap<String, String>,
    message_id: &str,
) -> Result<(), EmitError> {
    if parens {
        out.push('(');
        write_expr(out, expr, params, message_id)?;
        out.push(')');
        Ok(())
    } else {
        write_expr(out, expr, params, message_id)
    }
}

/// Returns the precedence of a binary node.
fn child_precedence(expr: &Expr) -> Option<u8> {
    match expr {
        Expr::Binary {
            op,
            ..
        } => Some(op.precedence()),
        _ => None,
    }
}

/// Returns true for non-associative comparison operators.
const fn is_comparison(op: BinaryOp) -> bool {
    !matches!(op, BinaryOp::Or | BinaryOp::And)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
