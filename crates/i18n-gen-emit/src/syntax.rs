// crates/i18n-gen-emit/src/syntax.rs
// ============================================================================
// Module: Rust Syntax Helpers
// Description: Identifier escaping, literals, and type-token checks.
// Purpose: Keep catalog-derived text from breaking out of its syntactic slot.
// Dependencies: Standard library only.
// ============================================================================

//! ## Overview
//! Everything the emitter splices into Rust source passes through here.
//! Names become raw identifiers when they collide with keywords, strings are
//! escaped into literals, and type tokens are limited to the characters type
//! syntax needs, with balanced brackets.

/// Keywords usable as raw identifiers.
const RAW_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do", "dyn",
    "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in", "let",
    "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return",
    "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use",
    "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers.
const PLAIN_RESERVED: &[&str] = &["self", "Self", "super", "crate", "_"];

/// Returns `name` as a usable identifier.
pub fn rust_ident(name: &str) -> String {
    if PLAIN_RESERVED.contains(&name) {
        format!("{name}_")
    } else if RAW_KEYWORDS.contains(&name) {
        format!("r#{name}")
    } else {
        name.to_string()
    }
}

/// Renders `value` as a Rust string literal.
pub fn rust_string_literal(value: &str) -> String {
    format!("\"{}\"", value.escape_debug())
}

/// Flattens `value` for a `//` or `///` comment line.
pub fn comment_text(value: &str) -> String {
    value.chars().map(|ch| if ch.is_control() { ' ' } else { ch }).collect()
}

/// Returns true when `token` only uses type syntax with balanced brackets.
pub fn is_type_token(token: &str) -> bool {
    let token = token.trim();
    if token.is_empty() {
        return false;
    }
    let mut stack = Vec::new();
    for ch in token.chars() {
        match ch {
            '<' | '[' | '(' => stack.push(ch),
            '>' | ']' | ')' => {
                let open = match ch {
                    '>' => '<',
                    ']' => '[',
                    _ => '(',
                };
                if stack.pop() != Some(open) {
                    return false;
                }
            }
            ch if ch.is_ascii_alphanumeric() => {}
            '_' | ':' | '&' | '\'' | ',' | ';' | ' ' => {}
            _ => return false,
        }
    }
    stack.is_empty()
}

/// Returns true for a `::`-separated path of identifiers.
pub fn is_module_path(path: &str) -> bool {
    let body = path.strip_prefix("::").unwrap_or(path);
    !body.is_empty()
        && body.split("::").all(|segment| {
            let mut chars = segment.chars();
            chars.next().is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
                && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        })
}

// ============================================================================
// SECTION: Tests
// ============================================================================
